// Module exports for models

pub mod event;
pub mod harptos;
pub mod settings;
pub mod state;
