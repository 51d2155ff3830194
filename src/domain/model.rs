use serde::{Deserialize, Serialize};

/// One requested data-bundle allocation line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneEntry {
    pub raw_number: String,
    pub number: String,
    pub allocation_gb: f64,
    pub is_valid: bool,
    pub was_fixed: bool,
    pub is_duplicate: bool,
}

impl PhoneEntry {
    /// Allocation expressed in whole megabytes, as the provisioning sheet
    /// carries it. Also the value half of the number+allocation identity key,
    /// so duplicate detection never compares floats.
    pub fn allocation_mb(&self) -> u64 {
        (self.allocation_gb * 1024.0).round() as u64
    }
}

/// Field(s) that identify a repeated entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityMode {
    /// Repeated recipient regardless of allocation: flagged, kept for review.
    #[default]
    NumberOnly,
    /// Repeated (number, allocation) pair: later occurrences are dropped.
    NumberAndAllocation,
}

impl std::str::FromStr for IdentityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "number-only" => Ok(IdentityMode::NumberOnly),
            "number-and-allocation" => Ok(IdentityMode::NumberAndAllocation),
            other => Err(format!(
                "unknown identity mode '{other}', expected number-only or number-and-allocation"
            )),
        }
    }
}

impl std::fmt::Display for IdentityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityMode::NumberOnly => write!(f, "number-only"),
            IdentityMode::NumberAndAllocation => write!(f, "number-and-allocation"),
        }
    }
}

/// A raw (number text, allocation) pair accepted by the input parser.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAllocation {
    pub raw_number: String,
    pub allocation_gb: f64,
}

/// Parser output: accepted pairs plus the count of dropped lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedInput {
    pub lines: Vec<RawAllocation>,
    pub skipped: usize,
}

/// One capacity-bounded group of entries destined for a single export file.
///
/// Every batch except possibly the last stays within the capacity threshold;
/// the last one may exceed it once problematic entries are appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub entries: Vec<PhoneEntry>,
    pub total_gb: f64,
}

impl Batch {
    pub fn push(&mut self, entry: PhoneEntry) {
        self.total_gb += entry.allocation_gb;
        self.entries.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A rendered output file, ready for the output sink.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Aggregate counts for one processing run, surfaced to the operator and
/// handed to the persistence collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub kept: usize,
    pub invalid: usize,
    pub duplicate: usize,
    pub fixed: usize,
    pub skipped: usize,
    pub total_gb: f64,
}

/// Result of the transform stage: packed batches plus the kept entries and
/// their consolidated counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformResult {
    pub batches: Vec<Batch>,
    pub kept: Vec<PhoneEntry>,
    pub stats: RunStats,
}

/// Structured result of a complete run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutput {
    /// One export file per batch, before any archival.
    pub files: Vec<ExportFile>,
    /// Kept entries, for the persistence handoff.
    pub kept: Vec<PhoneEntry>,
    pub stats: RunStats,
    /// Where the delivered artifact (single file or archive) was written.
    pub output_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(gb: f64) -> PhoneEntry {
        PhoneEntry {
            raw_number: "0200000000".to_string(),
            number: "0200000000".to_string(),
            allocation_gb: gb,
            is_valid: true,
            was_fixed: false,
            is_duplicate: false,
        }
    }

    #[test]
    fn test_allocation_mb_rounds() {
        assert_eq!(entry(1.0).allocation_mb(), 1024);
        assert_eq!(entry(1.5).allocation_mb(), 1536);
        assert_eq!(entry(0.1).allocation_mb(), 102);
    }

    #[test]
    fn test_batch_push_accumulates_total() {
        let mut batch = Batch::default();
        batch.push(entry(5.0));
        batch.push(entry(2.5));
        assert_eq!(batch.entries.len(), 2);
        assert!((batch.total_gb - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_identity_mode_parsing() {
        assert_eq!(
            "number-only".parse::<IdentityMode>().unwrap(),
            IdentityMode::NumberOnly
        );
        assert_eq!(
            "Number_And_Allocation".parse::<IdentityMode>().unwrap(),
            IdentityMode::NumberAndAllocation
        );
        assert!("both".parse::<IdentityMode>().is_err());
        assert_eq!(IdentityMode::NumberOnly.to_string(), "number-only");
    }
}
