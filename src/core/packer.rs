use std::cmp::Ordering;

use crate::domain::model::{Batch, PhoneEntry};

/// 1.5 TiB expressed in GiB, the provisioning system's per-file ceiling.
pub const DEFAULT_CAPACITY_GB: f64 = 1536.0;

#[derive(Debug, Clone)]
pub struct PackOptions {
    pub capacity_gb: f64,
    /// The multi-order merge path packs in input order; everything else packs
    /// largest-first.
    pub sort_before_packing: bool,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            capacity_gb: DEFAULT_CAPACITY_GB,
            sort_before_packing: true,
        }
    }
}

/// Group entries into capacity-bounded batches.
///
/// Problematic entries (invalid or duplicate) are appended to the last batch
/// with no capacity check: every billable number must appear in the export,
/// even when that pushes the final file past the threshold. An entry larger
/// than the capacity on its own still gets a batch.
pub fn pack(
    mut valid: Vec<PhoneEntry>,
    problematic: Vec<PhoneEntry>,
    options: &PackOptions,
) -> Vec<Batch> {
    if options.sort_before_packing {
        // Stable: equal sizes keep their input order.
        valid.sort_by(|a, b| {
            b.allocation_gb
                .partial_cmp(&a.allocation_gb)
                .unwrap_or(Ordering::Equal)
        });
    }

    let mut batches = Vec::new();
    let mut current = Batch::default();
    for entry in valid {
        if !current.is_empty() && current.total_gb + entry.allocation_gb > options.capacity_gb {
            batches.push(std::mem::take(&mut current));
        }
        current.push(entry);
    }
    if !current.is_empty() {
        batches.push(current);
    }

    if !problematic.is_empty() {
        if batches.is_empty() {
            batches.push(Batch::default());
        }
        if let Some(last) = batches.last_mut() {
            for entry in problematic {
                last.push(entry);
            }
        }
    }

    batches
}
