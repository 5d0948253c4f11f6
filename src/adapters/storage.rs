use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Folder-backed persistence sink. Keys are file names relative to the base folder.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    fn resolve(&self, key: &str) -> PathBuf {
        Path::new(&self.base_path).join(key)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        Ok(fs::read(self.resolve(path))?)
    }

    /// Writes through a sibling temp file so readers never see a half-written snapshot.
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let target = self.resolve(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut partial = target.clone().into_os_string();
        partial.push(".partial");
        fs::write(&partial, data)?;
        fs::rename(&partial, &target)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_data_folder_and_replaces_file() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("data");
        let storage = LocalStorage::new(base.to_str().unwrap().to_string());

        tokio_test::block_on(storage.write_file("Fund-January-2025.json", b"{}")).unwrap();
        tokio_test::block_on(storage.write_file("Fund-January-2025.json", b"{\"a\":1}")).unwrap();
        let back = tokio_test::block_on(storage.read_file("Fund-January-2025.json")).unwrap();

        assert_eq!(back, b"{\"a\":1}");
        assert!(!base.join("Fund-January-2025.json.partial").exists());
    }
}
