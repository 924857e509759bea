//! cloudnav library exports for testing

pub mod adapter;
pub mod core;
pub mod registry;
pub mod render;
pub mod resource;
pub mod tui;

#[cfg(test)]
pub mod test_support;
