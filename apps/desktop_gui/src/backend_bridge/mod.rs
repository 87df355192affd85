//! Backend side of the GUI: commands from the UI and the worker that executes them.

pub mod commands;
pub mod runtime;
