//! Ratatui widgets for the custsearch TUI.

pub mod dropdown;
pub mod help;
pub mod search_box;
