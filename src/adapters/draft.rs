use std::fs;
use std::path::Path;

use crate::domain::ports::DraftStore;
use crate::utils::error::Result;

/// Single-slot draft cache backed by one file. Holds unsubmitted input so a
/// failed run loses nothing; the caller clears it after success.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    path: String,
}

impl FileDraftStore {
    pub fn new(path: String) -> Self {
        Self { path }
    }
}

impl DraftStore for FileDraftStore {
    fn save(&self, content: &str) -> Result<()> {
        if let Some(parent) = Path::new(&self.path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<String>> {
        if !Path::new(&self.path).exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    fn clear(&self) -> Result<()> {
        if Path::new(&self.path).exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
