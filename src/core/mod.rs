//! # Core Application Logic
//!
//! The UI-agnostic half of cloudnav. It knows nothing about ratatui.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • App (shared state)   │
//!                    │  • Selection            │
//!                    │  • RefreshCoordinator   │
//!                    │  • Command DSL          │
//!                    │  • Config, errors       │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  Registry  │      │  Adapters  │
//!     │ (ratatui)  │      │            │      │  (wrapped) │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `App`, everything views read and handlers write
//! - [`selection`]: active profiles/regions and what we know about them
//! - [`refresh`]: stale-result suppression for background context lookups
//! - [`command`]: the `:` command line language
//! - [`status`]: transient status slot and activity log
//! - [`config`]: config file and override resolution
//! - [`error`]: the navigation error taxonomy

pub mod command;
pub mod config;
pub mod error;
pub mod refresh;
pub mod selection;
pub mod state;
pub mod status;
