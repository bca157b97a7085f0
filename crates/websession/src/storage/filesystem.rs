//! Filesystem-backed session store.

use std::{
    io::ErrorKind,
    path::PathBuf,
};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;
use websession_core::{SessionId, SessionPayload, SessionStore, StoreError};

use crate::codec;

/// Default filename prefix for session records.
pub const DEFAULT_PREFIX: &str = "_session";

/// Durable store keeping one file per session.
///
/// Records live at `dir/{prefix}{id}` and survive process restarts.
/// Writes go to a uniquely named temp file first and are renamed into
/// place, so a reader never observes a half-written record and two
/// writers for the same id cannot interleave.
pub struct FileSystemStore {
    dir: PathBuf,
    prefix: String,
}

impl FileSystemStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns error if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open_with_prefix(dir, DEFAULT_PREFIX).await
    }

    /// Open a store with a custom filename prefix.
    ///
    /// # Errors
    /// Returns error if the directory cannot be created.
    pub async fn open_with_prefix(
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;

        Ok(Self {
            dir,
            prefix: prefix.into(),
        })
    }

    fn record_path(&self, id: SessionId) -> PathBuf {
        self.dir.join(format!("{}{}", self.prefix, id))
    }

    fn temp_path(&self, id: SessionId) -> PathBuf {
        // Unique per writer so concurrent puts for the same id never share
        // a temp file.
        self.dir
            .join(format!("{}{}.{}.tmp", self.prefix, id, Uuid::new_v4().simple()))
    }
}

#[async_trait]
impl SessionStore for FileSystemStore {
    async fn put(&self, id: SessionId, payload: SessionPayload) -> Result<(), StoreError> {
        let bytes =
            codec::encode(&payload).map_err(|e| StoreError::Internal(e.to_string()))?;

        let tmp = self.temp_path(id);
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        if let Err(e) = tokio::fs::rename(&tmp, self.record_path(id)).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn get(&self, id: SessionId) -> Result<Option<SessionPayload>, StoreError> {
        match tokio::fs::read(self.record_path(id)).await {
            Ok(bytes) => codec::decode(&bytes)
                .map(Some)
                .map_err(|e| StoreError::Decode(e.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn del(&self, id: SessionId) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.record_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn payload(pairs: &[(&str, &str)]) -> SessionPayload {
        pairs.iter().copied().collect()
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::open(dir.path()).await.unwrap();
        let id = Uuid::new_v4();
        let p = payload(&[("user", "alice"), ("role", "admin")]);

        store.put(id, p.clone()).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), Some(p));
    }

    #[tokio::test]
    async fn test_get_unknown_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::open(dir.path()).await.unwrap();

        assert_eq!(store.get(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::open(dir.path()).await.unwrap();
        let id = Uuid::new_v4();

        store.put(id, payload(&[("n", "1")])).await.unwrap();
        store.put(id, payload(&[("n", "2")])).await.unwrap();

        assert_eq!(store.get(id).await.unwrap(), Some(payload(&[("n", "2")])));
    }

    #[tokio::test]
    async fn test_del_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::open(dir.path()).await.unwrap();
        let id = Uuid::new_v4();
        store.put(id, payload(&[("user", "bob")])).await.unwrap();

        store.del(id).await.unwrap();
        store.del(id).await.unwrap();

        assert_eq!(store.get(id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let id = Uuid::new_v4();
        let p = payload(&[("user", "carol")]);

        {
            let store = FileSystemStore::open(dir.path()).await.unwrap();
            store.put(id, p.clone()).await.unwrap();
        }

        let store = FileSystemStore::open(dir.path()).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), Some(p));
    }

    #[tokio::test]
    async fn test_corrupt_record_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::open(dir.path()).await.unwrap();
        let id = Uuid::new_v4();

        std::fs::write(
            dir.path().join(format!("{DEFAULT_PREFIX}{id}")),
            b"{\"trunc",
        )
        .unwrap();

        assert!(matches!(store.get(id).await, Err(StoreError::Decode(_))));
    }

    #[tokio::test]
    async fn test_custom_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::open_with_prefix(dir.path(), "acme-")
            .await
            .unwrap();
        let id = Uuid::new_v4();

        store.put(id, payload(&[("k", "v")])).await.unwrap();

        assert!(dir.path().join(format!("acme-{id}")).exists());
        assert_eq!(store.get(id).await.unwrap(), Some(payload(&[("k", "v")])));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_record_permissions_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::open(dir.path()).await.unwrap();
        let id = Uuid::new_v4();
        store.put(id, payload(&[("k", "v")])).await.unwrap();

        let meta = std::fs::metadata(dir.path().join(format!("{DEFAULT_PREFIX}{id}"))).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }
}
