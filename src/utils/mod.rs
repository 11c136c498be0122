// Utility helpers

pub mod date;
