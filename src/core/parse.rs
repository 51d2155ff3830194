// Input ingestion: pasted text (`<number> <allocation>[GB]` per line) or a
// two-column CSV upload. Bad lines are counted and dropped, never fatal.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::model::{ParsedInput, RawAllocation};
use crate::utils::error::Result;

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*(.+?)[\s,;]+([0-9]+(?:\.[0-9]+)?)\s*(?:GB)?\s*$")
            .expect("line pattern is a valid regex")
    })
}

/// Parse pasted text. Blank lines are ignored; non-blank lines that do not
/// match `<number-text> <positive-allocation>[GB]` are counted as skipped.
pub fn parse_text(input: &str) -> ParsedInput {
    let mut lines = Vec::new();
    let mut skipped = 0;

    for line in input.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(raw) => lines.push(raw),
            None => skipped += 1,
        }
    }

    ParsedInput { lines, skipped }
}

fn parse_line(line: &str) -> Option<RawAllocation> {
    let caps = line_pattern().captures(line)?;
    let allocation_gb: f64 = caps[2].parse().ok()?;
    if allocation_gb <= 0.0 {
        return None;
    }
    Some(RawAllocation {
        raw_number: caps[1].trim().to_string(),
        allocation_gb,
    })
}

/// Parse an uploaded CSV: column 0 is the number, column 1 the allocation
/// (an optional `GB` suffix is accepted). A leading row that fails numeric
/// parse is treated as a header, not a skip.
pub fn parse_csv(bytes: &[u8]) -> Result<ParsedInput> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut lines = Vec::new();
    let mut skipped = 0;

    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let number = record.get(0).unwrap_or_default();
        let allocation = record.get(1).and_then(parse_allocation);
        match allocation {
            Some(allocation_gb) if !number.is_empty() => lines.push(RawAllocation {
                raw_number: number.to_string(),
                allocation_gb,
            }),
            _ if idx == 0 => {} // header row
            _ => skipped += 1,
        }
    }

    Ok(ParsedInput { lines, skipped })
}

fn parse_allocation(text: &str) -> Option<f64> {
    let lower = text.trim().to_ascii_lowercase();
    let number_part = lower.strip_suffix("gb").map(str::trim_end).unwrap_or(&lower);
    let value: f64 = number_part.parse().ok()?;
    (value > 0.0).then_some(value)
}
