// Service module exports

pub mod advance;
pub mod database;
pub mod event;
pub mod scheduler;
pub mod session_notes;
pub mod settings;
pub mod state;
