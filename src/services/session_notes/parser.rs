use chrono::NaiveDate;

use crate::models::event::Event;
use crate::models::harptos::{self, HarptosDate};
use crate::utils::date::parse_iso_date;

const BLOCK_SEPARATOR: &str = "---";

/// One parsed block. The date is kept raw; clamping happens on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteRecord {
    /// 1-based line where the block's content starts.
    pub line: usize,
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub real_world_date: Option<NaiveDate>,
}

impl NoteRecord {
    /// The raw components clamped onto the calendar.
    pub fn date(&self) -> HarptosDate {
        harptos::normalize(self.year, self.month, self.day)
    }

    /// True when any raw component (year included) had to be clamped.
    pub fn is_clamped(&self) -> bool {
        let date = self.date();
        (i64::from(date.year), i64::from(date.month), i64::from(date.day))
            != (self.year, self.month, self.day)
    }

    /// Event on the clamped date.
    pub fn to_event(&self) -> Event {
        let mut event = Event::new(self.date());
        event.title = self.title.clone();
        event.notes = self.notes.clone();
        event.real_world_date = self.real_world_date;
        event
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("block at line {line}: {message}")]
pub struct BlockError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedNotes {
    pub records: Vec<NoteRecord>,
    pub errors: Vec<BlockError>,
}

/// Parse a notes file. Bad blocks are reported and skipped.
pub fn parse(content: &str) -> ParsedNotes {
    let mut parsed = ParsedNotes::default();
    let mut block: Vec<(usize, &str)> = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        if line.trim() == BLOCK_SEPARATOR {
            flush_block(&mut block, &mut parsed);
        } else {
            block.push((idx + 1, line));
        }
    }
    flush_block(&mut block, &mut parsed);

    parsed
}

fn flush_block(block: &mut Vec<(usize, &str)>, parsed: &mut ParsedNotes) {
    let lines = std::mem::take(block);
    let Some(start) = lines
        .iter()
        .find(|(_, line)| !line.trim().is_empty())
        .map(|(number, _)| *number)
    else {
        return;
    };

    match parse_block(start, &lines) {
        Ok(record) => parsed.records.push(record),
        Err(message) => parsed.errors.push(BlockError { line: start, message }),
    }
}

fn parse_block(start: usize, lines: &[(usize, &str)]) -> Result<NoteRecord, String> {
    let mut date = None;
    let mut title = None;
    let mut real_world_date = None;
    let mut notes: Option<Vec<&str>> = None;

    for (number, raw) in lines {
        if let Some(notes) = notes.as_mut() {
            notes.push(raw.trim_end());
            continue;
        }

        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| format!("line {}: expected 'Key: value', got '{}'", number, line))?;
        let value = value.trim();

        match key.trim().to_ascii_lowercase().as_str() {
            "date" => {
                let components = harptos::parse_components(value)
                    .ok_or_else(|| format!("line {}: unrecognized date '{}'", number, value))?;
                date = Some(components);
            }
            "real date" | "real" | "real-world date" => {
                let parsed = parse_iso_date(value)
                    .ok_or_else(|| format!("line {}: unrecognized real date '{}'", number, value))?;
                real_world_date = Some(parsed);
            }
            "title" => {
                title = Some(value.to_string()).filter(|t| !t.is_empty());
            }
            "notes" => {
                notes = Some(if value.is_empty() { vec![] } else { vec![value] });
            }
            other => return Err(format!("line {}: unknown field '{}'", number, other)),
        }
    }

    let (year, month, day) = date.ok_or_else(|| "missing Date field".to_string())?;

    Ok(NoteRecord {
        line: start,
        year,
        month,
        day,
        title,
        notes: notes.and_then(join_notes),
        real_world_date,
    })
}

fn join_notes(lines: Vec<&str>) -> Option<String> {
    let text = lines.join("\n");
    let text = text.trim_matches('\n').trim_end();
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_block() {
        let content = "Date: 3 Hammer 1492\n\
                       Real date: 2025-03-14\n\
                       Title: Left Baldur's Gate\n\
                       Notes:\n\
                       First line.\n\
                       \n\
                       Second paragraph.\n";
        let parsed = parse(content);

        assert!(parsed.errors.is_empty());
        assert_eq!(
            parsed.records,
            vec![NoteRecord {
                line: 1,
                year: 1492,
                month: 1,
                day: 3,
                title: Some("Left Baldur's Gate".to_string()),
                notes: Some("First line.\n\nSecond paragraph.".to_string()),
                real_world_date: NaiveDate::from_ymd_opt(2025, 3, 14),
            }]
        );
    }

    #[test]
    fn test_parse_multiple_blocks() {
        let content = "Date: 1492-1-3\nTitle: One\n---\n\n---\nDate: Greengrass 1492\nNotes: inline\nmore\n---\n";
        let parsed = parse(content);

        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[1].line, 6);
        assert_eq!((parsed.records[1].month, parsed.records[1].day), (4, 31));
        assert_eq!(parsed.records[1].notes.as_deref(), Some("inline\nmore"));
    }

    #[test]
    fn test_invalid_day_is_kept_raw() {
        let parsed = parse("Date: 1492-2-31\n");
        let record = &parsed.records[0];
        assert_eq!(record.day, 31);
        assert!(record.is_clamped());

        let event = record.to_event();
        assert!(event.validate().is_ok());
        assert_eq!((event.month, event.day), (2, 30));
    }

    #[test]
    fn test_out_of_range_year_is_clamped() {
        let parsed = parse("Date: 3 Hammer -40\n");
        let record = &parsed.records[0];
        assert_eq!(record.year, -40);
        assert!(record.is_clamped());
        assert_eq!(record.date().year, 0);

        let valid = parse("Date: 3 Hammer 1492\n");
        assert!(!valid.records[0].is_clamped());
    }

    #[test]
    fn test_bad_blocks_reported_and_skipped() {
        let content = "Title: no date here\n---\nDate: sometime\n---\nDate: 1492-5-5\nMood: grim\n---\nDate: 1492-5-6\n";
        let parsed = parse(content);

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].day, 6);

        let lines: Vec<usize> = parsed.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![1, 3, 5]);
        assert!(parsed.errors[0].message.contains("missing Date"));
        assert!(parsed.errors[2].message.contains("unknown field"));
    }

    #[test]
    fn test_header_keys_are_case_insensitive() {
        let parsed = parse("DATE: 1492-9-31\ntitle:  Highharvestide \nREAL: 2025-09-01\n");
        let record = &parsed.records[0];
        assert_eq!(record.title.as_deref(), Some("Highharvestide"));
        assert_eq!(record.real_world_date, NaiveDate::from_ymd_opt(2025, 9, 1));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), ParsedNotes::default());
        assert_eq!(parse("\n---\n   \n"), ParsedNotes::default());
    }
}
