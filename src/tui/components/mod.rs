//! # TUI Components
//!
//! Chrome shared by every screen. Full screens live in `views/`.
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: app name, current view, active selection
//! - `StatusBar`: transient status message or the view's own status line
//! - `WarningsOverlay`: one-time startup warnings
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `CommandLine`: the `:` prompt with tab completion
//!
//! ```text
//! components/
//! ├── mod.rs           (this file, plus layout helpers)
//! ├── title_bar.rs
//! ├── status_bar.rs
//! ├── command_line.rs
//! └── warnings.rs
//! ```

use ratatui::layout::{Constraint, Layout, Rect};

pub mod command_line;
pub mod status_bar;
pub mod title_bar;
pub mod warnings;

pub use command_line::{CommandLine, CommandLineEvent};
pub use status_bar::StatusBar;
pub use title_bar::TitleBar;
pub use warnings::WarningsOverlay;

/// Compute a centered rect using percentage of the outer rect.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

/// Truncate a string to fit within `max_width` cells, adding "..." if needed.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if unicode_width::UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 3 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str("...");
    out
}
