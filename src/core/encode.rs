// Spreadsheet rendering for the downstream provisioning system. The column
// schema is the wire contract: header text and order must not drift.

use std::collections::HashMap;

use chrono::Local;
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Formula, Workbook};

use crate::domain::model::{Batch, ExportFile, PhoneEntry};
use crate::utils::error::Result;

const SHEET_NAME: &str = "Bundles";
const MAX_COLUMN_WIDTH: f64 = 60.0;
const WIDTH_PADDING: usize = 2;

/// Alert style for an MSISDN that failed validation.
const ALERT_FONT: &str = "#9C0006";
const ALERT_FILL: &str = "#FFC7CE";
/// Highlight fill for a duplicate row.
const HIGHLIGHT_FILL: &str = "#FFEB9C";

/// Logical field → physical column. Keeps cell addressing compile-time
/// checked instead of scattering letter/number literals around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Msisdn,
    BeneficiaryName,
    VoiceMinutes,
    DataMb,
    SmsUnit,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Msisdn,
        Column::BeneficiaryName,
        Column::VoiceMinutes,
        Column::DataMb,
        Column::SmsUnit,
    ];

    pub const fn index(self) -> u16 {
        match self {
            Column::Msisdn => 0,
            Column::BeneficiaryName => 1,
            Column::VoiceMinutes => 2,
            Column::DataMb => 3,
            Column::SmsUnit => 4,
        }
    }

    pub const fn header(self) -> &'static str {
        match self {
            Column::Msisdn => "Beneficiary Msisdn",
            Column::BeneficiaryName => "Beneficiary Name",
            Column::VoiceMinutes => "Voice(Minutes)",
            Column::DataMb => "Data (MB) (1024MB = 1GB)",
            Column::SmsUnit => "Sms(Unit)",
        }
    }

    pub const fn letter(self) -> char {
        match self {
            Column::Msisdn => 'A',
            Column::BeneficiaryName => 'B',
            Column::VoiceMinutes => 'C',
            Column::DataMb => 'D',
            Column::SmsUnit => 'E',
        }
    }

    /// Minimum width so short columns stay readable.
    pub const fn floor_width(self) -> f64 {
        match self {
            Column::Msisdn => 20.0,
            Column::BeneficiaryName => 18.0,
            Column::VoiceMinutes => 14.0,
            Column::DataMb => 26.0,
            Column::SmsUnit => 12.0,
        }
    }
}

/// Output file naming. The stamp is injected rather than read from the clock
/// inside the encoder, so identical runs produce identical bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNaming {
    pub stamp: String,
}

impl FileNaming {
    pub fn now() -> Self {
        Self {
            stamp: Local::now().format("%Y%m%d_%H%M%S").to_string(),
        }
    }

    pub fn pinned(stamp: impl Into<String>) -> Self {
        Self { stamp: stamp.into() }
    }

    /// Name for one export file; `part` is 1-based.
    pub fn file_name(&self, part: usize, total: usize) -> String {
        if total <= 1 {
            format!("data_bundles_{}.xlsx", self.stamp)
        } else {
            format!("data_bundles_part{}_of_{}_{}.xlsx", part, total, self.stamp)
        }
    }

    pub fn archive_name(&self) -> String {
        format!("data_bundles_split_{}.zip", self.stamp)
    }
}

/// Human-readable total for the summary row: TB above 1023 GB, GB otherwise.
pub fn human_total(total_gb: f64) -> String {
    if total_gb > 1023.0 {
        format!("{:.2} TB", total_gb / 1024.0)
    } else {
        format!("{:.2} GB", total_gb)
    }
}

/// Review ordering: valid entries first, then invalid ones, then duplicates
/// grouped by number (first-seen group order, input order within a group).
/// Reviewers expect every exception contiguous at the bottom of the sheet.
fn order_for_review(entries: &[PhoneEntry]) -> Vec<&PhoneEntry> {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    let mut dup_keys: Vec<&str> = Vec::new();
    let mut dup_groups: HashMap<&str, Vec<&PhoneEntry>> = HashMap::new();

    for entry in entries {
        if entry.is_duplicate {
            let key = entry.number.as_str();
            if !dup_groups.contains_key(key) {
                dup_keys.push(key);
            }
            dup_groups.entry(key).or_default().push(entry);
        } else if entry.is_valid {
            valid.push(entry);
        } else {
            invalid.push(entry);
        }
    }

    let mut ordered = valid;
    ordered.append(&mut invalid);
    for key in dup_keys {
        if let Some(mut group) = dup_groups.remove(key) {
            ordered.append(&mut group);
        }
    }
    ordered
}

/// Render one batch into spreadsheet bytes; `part` is 1-based.
pub fn encode_batch(
    batch: &Batch,
    part: usize,
    total: usize,
    naming: &FileNaming,
) -> Result<ExportFile> {
    let fmt_base = Format::new();
    let fmt_header = Format::new().set_bold();
    let fmt_summary = Format::new().set_bold();
    let fmt_alert = Format::new()
        .set_font_color(ALERT_FONT)
        .set_background_color(ALERT_FILL);
    let fmt_highlight = Format::new().set_background_color(HIGHLIGHT_FILL);

    let mut workbook = Workbook::new();
    // Pinned creation date: repeated runs over the same input must produce
    // byte-identical files.
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let mut widths = [0usize; Column::ALL.len()];
    for column in Column::ALL {
        widths[column.index() as usize] = column.header().len();
        worksheet.write_string_with_format(0, column.index(), column.header(), &fmt_header)?;
    }

    let ordered = order_for_review(&batch.entries);
    for (offset, entry) in ordered.iter().enumerate() {
        let row = (offset + 1) as u32;
        let row_fmt = if entry.is_duplicate {
            &fmt_highlight
        } else {
            &fmt_base
        };
        // The alert wins on the number cell even inside a highlighted row.
        let msisdn_fmt = if entry.is_valid { row_fmt } else { &fmt_alert };

        worksheet.write_string_with_format(row, Column::Msisdn.index(), &entry.number, msisdn_fmt)?;
        worksheet.write_blank(row, Column::BeneficiaryName.index(), row_fmt)?;
        worksheet.write_number_with_format(row, Column::VoiceMinutes.index(), 0.0, row_fmt)?;
        worksheet.write_number_with_format(
            row,
            Column::DataMb.index(),
            entry.allocation_mb() as f64,
            row_fmt,
        )?;
        worksheet.write_number_with_format(row, Column::SmsUnit.index(), 0.0, row_fmt)?;

        widths[Column::Msisdn.index() as usize] =
            widths[Column::Msisdn.index() as usize].max(entry.number.len());
        widths[Column::DataMb.index() as usize] =
            widths[Column::DataMb.index() as usize].max(entry.allocation_mb().to_string().len());
    }

    // Data rows, one blank row, then the summary.
    let row_count = ordered.len();
    let summary_row = (row_count + 2) as u32;
    let count_label = format!("Total Numbers: {row_count}");
    let total_label = human_total(batch.total_gb);

    worksheet.write_string_with_format(summary_row, Column::Msisdn.index(), &count_label, &fmt_summary)?;
    if row_count > 0 {
        let sum = Formula::new(format!(
            "=SUM({col}2:{col}{end})",
            col = Column::DataMb.letter(),
            end = row_count + 1
        ));
        worksheet.write_formula_with_format(summary_row, Column::DataMb.index(), sum, &fmt_summary)?;
    } else {
        worksheet.write_number_with_format(summary_row, Column::DataMb.index(), 0.0, &fmt_summary)?;
    }
    worksheet.write_string_with_format(summary_row, Column::SmsUnit.index(), &total_label, &fmt_summary)?;

    widths[Column::Msisdn.index() as usize] =
        widths[Column::Msisdn.index() as usize].max(count_label.len());
    widths[Column::SmsUnit.index() as usize] =
        widths[Column::SmsUnit.index() as usize].max(total_label.len());

    for column in Column::ALL {
        let content = (widths[column.index() as usize] + WIDTH_PADDING) as f64;
        let width = content.max(column.floor_width()).min(MAX_COLUMN_WIDTH);
        worksheet.set_column_width(column.index(), width)?;
    }

    let bytes = workbook.save_to_buffer()?;
    Ok(ExportFile {
        name: naming.file_name(part, total),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(number: &str, gb: f64, is_valid: bool, is_duplicate: bool) -> PhoneEntry {
        PhoneEntry {
            raw_number: number.to_string(),
            number: number.to_string(),
            allocation_gb: gb,
            is_valid,
            was_fixed: false,
            is_duplicate,
        }
    }

    fn batch(entries: Vec<PhoneEntry>) -> Batch {
        let mut batch = Batch::default();
        for entry in entries {
            batch.push(entry);
        }
        batch
    }

    #[test]
    fn test_schema_is_fixed() {
        assert_eq!(Column::Msisdn.header(), "Beneficiary Msisdn");
        assert_eq!(Column::DataMb.header(), "Data (MB) (1024MB = 1GB)");
        assert_eq!(Column::DataMb.index(), 3);
        assert_eq!(Column::DataMb.letter(), 'D');
        assert_eq!(Column::SmsUnit.index(), 4);
    }

    #[test]
    fn test_human_total_switches_to_tb() {
        assert_eq!(human_total(5.0), "5.00 GB");
        assert_eq!(human_total(1023.0), "1023.00 GB");
        assert_eq!(human_total(1024.0), "1.00 TB");
        assert_eq!(human_total(1536.0), "1.50 TB");
    }

    #[test]
    fn test_file_naming() {
        let naming = FileNaming::pinned("20260401_120000");
        assert_eq!(naming.file_name(1, 1), "data_bundles_20260401_120000.xlsx");
        assert_eq!(
            naming.file_name(2, 3),
            "data_bundles_part2_of_3_20260401_120000.xlsx"
        );
        assert_eq!(
            naming.archive_name(),
            "data_bundles_split_20260401_120000.zip"
        );
    }

    #[test]
    fn test_review_ordering_groups_exceptions_last() {
        let entries = vec![
            entry("0200000001", 1.0, true, false),
            entry("0200000009", 1.0, true, true),
            entry("12345", 1.0, false, false),
            entry("0200000002", 1.0, true, false),
            entry("0200000008", 1.0, true, true),
            entry("0200000009", 2.0, true, true),
        ];

        let ordered = order_for_review(&entries);
        let numbers: Vec<&str> = ordered.iter().map(|e| e.number.as_str()).collect();

        // Valid, then invalid, then duplicates grouped by number.
        assert_eq!(
            numbers,
            vec![
                "0200000001",
                "0200000002",
                "12345",
                "0200000009",
                "0200000009",
                "0200000008",
            ]
        );
    }

    #[test]
    fn test_encode_mixed_batch_produces_bytes() {
        let batch = batch(vec![
            entry("0554739033", 2.0, true, false),
            entry("12345", 1.0, false, false),
        ]);
        let naming = FileNaming::pinned("20260401_120000");

        let file = encode_batch(&batch, 1, 1, &naming).unwrap();

        assert_eq!(file.name, "data_bundles_20260401_120000.xlsx");
        assert!(!file.bytes.is_empty());
    }

    #[test]
    fn test_encode_is_deterministic_for_pinned_stamp() {
        let batch = batch(vec![
            entry("0554739033", 2.0, true, false),
            entry("0244123456", 1.5, true, true),
        ]);
        let naming = FileNaming::pinned("20260401_120000");

        let first = encode_batch(&batch, 1, 2, &naming).unwrap();
        let second = encode_batch(&batch, 1, 2, &naming).unwrap();

        assert_eq!(first.name, second.name);
        assert_eq!(first.bytes, second.bytes);
    }

    #[test]
    fn test_encode_empty_batch() {
        let file = encode_batch(&Batch::default(), 1, 1, &FileNaming::pinned("s")).unwrap();
        assert!(!file.bytes.is_empty());
    }
}
