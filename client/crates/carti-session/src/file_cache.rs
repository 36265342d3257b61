use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use carti_core::{BackendError, BackendResult, KeyValueCache};
use log::debug;
use tokio::fs;
use tokio::io::AsyncWriteExt;

const ENTRY_EXTENSION: &str = "entry";

/// On-device [`KeyValueCache`]: one file per key under a directory.
///
/// Writes go to a temp file that is synced and then renamed over the
/// entry, so a crash mid-write leaves the previous value in place.
#[derive(Debug)]
pub struct FileCache {
    dir: PathBuf,
    write_seq: AtomicU64,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_seq: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Characters outside `[A-Za-z0-9_-]` become `_`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.{ENTRY_EXTENSION}"))
    }
}

#[async_trait]
impl KeyValueCache for FileCache {
    async fn get(&self, key: &str) -> BackendResult<Option<String>> {
        let path = self.entry_path(key);
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BackendError::io(path, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> BackendResult<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| BackendError::io(self.dir.clone(), e))?;

        let final_path = self.entry_path(key);
        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        let temp_path = final_path.with_extension(format!(
            "{ENTRY_EXTENSION}.tmp.{}.{seq}",
            std::process::id()
        ));

        {
            let mut file = fs::File::create(&temp_path)
                .await
                .map_err(|e| BackendError::io(temp_path.clone(), e))?;

            file.write_all(value.as_bytes())
                .await
                .map_err(|e| BackendError::io(temp_path.clone(), e))?;

            file.sync_all()
                .await
                .map_err(|e| BackendError::io(temp_path.clone(), e))?;
        }

        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(BackendError::io(final_path, e));
        }

        debug!("Cached {key} at {final_path:?}");
        Ok(())
    }

    async fn delete(&self, key: &str) -> BackendResult<()> {
        let path = self.entry_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BackendError::io(path, e)),
        }
    }
}
