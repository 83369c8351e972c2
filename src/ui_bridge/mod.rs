//! Bridge layer between UI front ends and the frame loop
//!
//! Front ends (the stdin console, or any embedding host) run on their own
//! threads. They never touch the scene: every request is validated here and
//! handed to the frame loop over a channel, which drains it once per frame.

pub mod actions;
pub mod commands;
pub mod console;

// Re-export commonly used types
pub use actions::{channel, UiAction, UiActions};
pub use commands::{request_view, submit_annotation, UiError};
