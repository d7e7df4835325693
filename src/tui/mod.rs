//! TUI (Terminal User Interface) module
//!
//! This module contains all TUI logic separated from the binary for better testability.
//! Screens hold view state only; conversation state lives in [`crate::chat`].

pub mod app;
pub mod clipboard;
pub mod screens;
pub mod types;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use screens::*;
pub use types::{MenuItem, Screen};
