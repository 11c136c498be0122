//! Session Notes bulk import.
//!
//! A notes file is a sequence of blocks separated by `---` lines. Each block
//! has `Key: value` headers and an optional free-text `Notes:` section:
//!
//! ```text
//! Date: 3 Hammer 1492
//! Real date: 2025-03-14
//! Title: Left Baldur's Gate
//! Notes:
//! The caravan master wants us in Waterdeep by Greengrass.
//! ---
//! Date: Greengrass 1492
//! Title: Festival
//! ```

mod parser;
mod service;

pub use parser::{parse, BlockError, NoteRecord, ParsedNotes};
pub use service::{ImportReport, SessionNotesService};
