//! Local-filesystem file storage. Stored files get a server-generated key
//! (UUID plus the original extension), so keys are safe to echo back to
//! clients and to use as download path segments.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::core::config::Settings;

#[derive(Debug, Clone)]
pub(crate) struct StorageService {
    root: PathBuf,
}

impl StorageService {
    pub(crate) async fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let root = PathBuf::from(&settings.storage().upload_dir);
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    #[cfg(test)]
    pub(crate) async fn at_root(root: PathBuf) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Store `bytes` under a fresh key derived from `original_name`'s
    /// extension and return that key.
    pub(crate) async fn store(&self, bytes: &[u8], original_name: &str) -> anyhow::Result<String> {
        let key = generate_key(original_name);
        let target = self.root.join(&key);
        tokio::fs::write(&target, bytes).await?;
        tracing::info!(key = %key, original = %original_name, size = bytes.len(), "Stored file");
        Ok(key)
    }

    /// Remove a stored file. A missing file is treated as success.
    pub(crate) async fn delete(&self, key: &str) -> anyhow::Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    pub(crate) async fn read(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        let path = self.path_for(key)?;
        Ok(tokio::fs::read(&path).await?)
    }

    pub(crate) async fn exists(&self, key: &str) -> bool {
        self.path_for(key)
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    fn path_for(&self, key: &str) -> anyhow::Result<PathBuf> {
        if !is_valid_key(key) {
            anyhow::bail!("invalid storage key: {key}");
        }
        Ok(self.root.join(key))
    }
}

pub(crate) fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 100
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_')
        && !key.contains("..")
}

fn generate_key(original_name: &str) -> String {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 16)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
        None => Uuid::new_v4().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("classwork-storage-{}", Uuid::new_v4()))
    }

    #[test]
    fn generated_keys_keep_sane_extensions_only() {
        assert!(generate_key("report.PDF").ends_with(".pdf"));
        assert!(generate_key("noext").matches('.').count() == 0);
        assert!(generate_key("weird.e!xt").matches('.').count() == 0);
    }

    #[test]
    fn key_validation_rejects_traversal() {
        assert!(is_valid_key("0b5c9e9e-7d4e-4a6c-9f7a-000000000000.pdf"));
        assert!(!is_valid_key("../etc/passwd"));
        assert!(!is_valid_key("a/b.txt"));
        assert!(!is_valid_key(""));
    }

    #[tokio::test]
    async fn store_read_delete_roundtrip() {
        let storage = StorageService::at_root(temp_root()).await.expect("storage");

        let key = storage.store(b"solution body", "solution.txt").await.expect("store");
        assert!(key.ends_with(".txt"));
        assert!(storage.exists(&key).await);

        let contents = storage.read(&key).await.expect("read");
        assert_eq!(contents, b"solution body");

        storage.delete(&key).await.expect("delete");
        assert!(!storage.exists(&key).await);
        // Deleting again is not an error.
        storage.delete(&key).await.expect("idempotent delete");
    }
}
