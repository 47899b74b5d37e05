use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;

/// Where uploaded files end up. The production implementation writes to the
/// local upload directory; tests substitute a stub.
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn put_file(&self, filename: &str, body: Bytes) -> anyhow::Result<()>;
    async fn delete_file(&self, filename: &str) -> anyhow::Result<()>;
}

/// Filesystem-backed storage rooted at the configured upload directory.
/// Filenames are generated server-side, so no path components from the
/// client ever reach the filesystem.
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub async fn new(root: impl AsRef<Path>) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("create upload dir {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl StorageClient for LocalStorage {
    async fn put_file(&self, filename: &str, body: Bytes) -> anyhow::Result<()> {
        let path = self.root.join(filename);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write upload {}", path.display()))?;
        Ok(())
    }

    async fn delete_file(&self, filename: &str) -> anyhow::Result<()> {
        let path = self.root.join(filename);
        tokio::fs::remove_file(&path)
            .await
            .with_context(|| format!("remove upload {}", path.display()))?;
        Ok(())
    }
}
