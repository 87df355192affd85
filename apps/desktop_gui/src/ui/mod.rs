//! UI layer for the desktop book page.

pub mod app;

pub use app::{BookPageApp, StartupConfig};
