use std::io::Write;

use zip::write::{FileOptions, ZipWriter};

use crate::core::encode::FileNaming;
use crate::domain::model::ExportFile;
use crate::utils::error::{BundleError, Result};

/// Package multi-part exports into one downloadable archive. A single file is
/// returned unwrapped so operators can tell one-file runs apart at a glance.
pub fn bundle_files(mut files: Vec<ExportFile>, naming: &FileNaming) -> Result<ExportFile> {
    if files.is_empty() {
        return Err(BundleError::ProcessingError {
            message: "no export files to bundle".to_string(),
        });
    }
    if files.len() == 1 {
        return Ok(files.remove(0));
    }

    let zip_data = {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for file in &files {
            zip.start_file::<_, ()>(file.name.as_str(), FileOptions::default())?;
            zip.write_all(&file.bytes)?;
        }
        let cursor = zip.finish()?;
        cursor.into_inner()
    };

    Ok(ExportFile {
        name: naming.archive_name(),
        bytes: zip_data,
    })
}
