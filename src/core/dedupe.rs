use std::collections::HashSet;

use crate::domain::model::{IdentityMode, PhoneEntry};

/// Outcome of duplicate resolution, with the consolidated counts the operator
/// summary needs (one message per run, not one per entry).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveOutcome {
    /// Entries surviving resolution, in input order.
    pub kept: Vec<PhoneEntry>,
    /// Every entry that repeated an earlier identity key, whether it was
    /// kept-and-flagged or dropped.
    pub duplicates: Vec<PhoneEntry>,
    /// Occurrences removed entirely (`NumberAndAllocation` mode only).
    pub dropped: usize,
    /// Kept entries whose number was auto-corrected.
    pub fixed: usize,
}

pub fn identity_key(entry: &PhoneEntry, mode: IdentityMode) -> String {
    match mode {
        IdentityMode::NumberOnly => entry.number.clone(),
        IdentityMode::NumberAndAllocation => {
            format!("{}|{}", entry.number, entry.allocation_mb())
        }
    }
}

/// Collapse repeated entries under the given identity key. Two stable passes:
/// the first finds repeats, the second either tags them (`NumberOnly`) or
/// drops them keeping the first occurrence (`NumberAndAllocation`).
pub fn resolve(entries: Vec<PhoneEntry>, mode: IdentityMode) -> ResolveOutcome {
    let mut seen = HashSet::with_capacity(entries.len());
    let mut repeat = vec![false; entries.len()];
    for (idx, entry) in entries.iter().enumerate() {
        if !seen.insert(identity_key(entry, mode)) {
            repeat[idx] = true;
        }
    }

    let mut kept = Vec::with_capacity(entries.len());
    let mut duplicates = Vec::new();
    let mut dropped = 0;
    for (idx, mut entry) in entries.into_iter().enumerate() {
        if !repeat[idx] {
            kept.push(entry);
            continue;
        }
        match mode {
            IdentityMode::NumberOnly => {
                entry.is_duplicate = true;
                duplicates.push(entry.clone());
                kept.push(entry);
            }
            IdentityMode::NumberAndAllocation => {
                duplicates.push(entry);
                dropped += 1;
            }
        }
    }

    let fixed = kept.iter().filter(|e| e.was_fixed).count();

    ResolveOutcome {
        kept,
        duplicates,
        dropped,
        fixed,
    }
}
