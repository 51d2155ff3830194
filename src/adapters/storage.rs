use std::fs;
use std::path::{Path, PathBuf};

use crate::core::Storage;
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    // Reads accept paths outside the base directory (the uploaded input can
    // live anywhere); writes always land under the base.
    fn resolve_read(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() || candidate.exists() {
            candidate.to_path_buf()
        } else {
            Path::new(&self.base_path).join(path)
        }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve_read(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}
