//! Command-line front end.
//!
//! Stands in for the UI layer: shows the current date and a day's events,
//! and turns user intents into service calls.

mod commands;
mod context;
mod render;

pub use commands::{load_settings, run, Cli, Command};
pub use context::AppContext;
