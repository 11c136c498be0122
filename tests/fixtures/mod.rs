// Test fixtures - reusable test data
// Shared by the integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;
use harptos_almanac::models::harptos::HarptosDate;
use harptos_almanac::services::database::Database;
use tempfile::TempDir;

/// Sample Harptos dates
pub mod dates {
    use super::*;

    /// 1 Hammer 1492 DR, the usual campaign start
    pub fn hammer_1_1492() -> HarptosDate {
        HarptosDate::new(1492, 1, 1).unwrap()
    }

    /// Greengrass 1492 DR (festival after Tarsakh)
    pub fn greengrass_1492() -> HarptosDate {
        HarptosDate::new(1492, 4, 31).unwrap()
    }

    /// Last day of the year
    pub fn nightal_30_1492() -> HarptosDate {
        HarptosDate::new(1492, 12, 30).unwrap()
    }
}

/// Sample real-world dates
pub mod real {
    use super::*;

    pub fn oct_19_2025() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 19).unwrap()
    }

    pub fn days_after(start: NaiveDate, days: i64) -> NaiveDate {
        start + chrono::Duration::days(days)
    }
}

/// A file-backed database in its own temp directory.
pub struct TempDatabase {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TempDatabase {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("harptos.db");
        let db = Database::new(path.to_str().unwrap()).expect("Failed to create database");
        db.initialize_schema().expect("Failed to initialize schema");
        Self { dir, path }
    }

    /// Open another connection to the same file.
    pub fn open(&self) -> Database {
        Database::new(self.path.to_str().unwrap()).expect("Failed to open database")
    }
}

pub const SESSION_NOTES: &str = "\
Date: 1492-1-3
Real date: 2025-03-14
Title: Left Baldur's Gate
Notes: Hired a caravan guard.
Bought rope.
---
Date: Greengrass 1492
Title: Spring fair
---
Date: 1492-2-31
Title: Snowed in
---
Title: Missing date
";
