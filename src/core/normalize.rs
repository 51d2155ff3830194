// MSISDN normalization. Source lists come out of spreadsheets that drop the
// leading zero or inject punctuation; the corrections here salvage those
// without guessing country codes.

use crate::domain::model::PhoneEntry;

const MSISDN_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub number: String,
    pub is_valid: bool,
    pub was_fixed: bool,
}

/// Normalize a raw number to the canonical form: exactly 10 digits with a
/// leading `0`. Unrecoverable input keeps its digits-only best effort and is
/// marked invalid, never dropped.
pub fn normalize(raw: &str) -> Normalized {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let stripped = digits != raw;

    if digits.len() == MSISDN_LEN && digits.starts_with('0') {
        return Normalized {
            number: digits,
            is_valid: true,
            was_fixed: stripped,
        };
    }

    if digits.len() == MSISDN_LEN - 1 {
        return Normalized {
            number: format!("0{digits}"),
            is_valid: true,
            was_fixed: true,
        };
    }

    if digits.len() == MSISDN_LEN {
        // Wrong leading digit, usually a stray country-code remnant.
        return Normalized {
            number: format!("0{}", &digits[1..]),
            is_valid: true,
            was_fixed: true,
        };
    }

    Normalized {
        number: digits,
        is_valid: false,
        was_fixed: stripped,
    }
}

/// Build a `PhoneEntry` from one accepted input pair.
pub fn normalize_entry(raw_number: String, allocation_gb: f64) -> PhoneEntry {
    let normalized = normalize(&raw_number);
    PhoneEntry {
        raw_number,
        number: normalized.number,
        allocation_gb,
        is_valid: normalized.is_valid,
        was_fixed: normalized.was_fixed,
        is_duplicate: false,
    }
}
