//! User Interface module
//!
//! Terminal catalog browser using ratatui.

pub mod app;
pub mod widgets;

pub use app::{App, InputMode};
