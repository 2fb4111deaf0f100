//! Directory-backed output store: one `<key>.csv` file per work item.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use trendq_core::{OutputKey, TimeSeries};

use crate::error::StorageError;
use crate::{render_csv, OutputStore};

/// Persists each series as a CSV file named after its output key.
///
/// The directory is created on first write. The body is rendered fully in
/// memory and written to a `.csv.tmp` sibling, then renamed into place, so
/// neither a rendering problem nor an interrupted write leaves a file behind
/// for `exists` to mistake for a finished result.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, key: &OutputKey) -> PathBuf {
        self.root.join(format!("{key}.csv"))
    }

    fn temp_path(&self, key: &OutputKey) -> PathBuf {
        self.root.join(format!("{key}.csv.tmp"))
    }
}

#[async_trait]
impl OutputStore for DirStore {
    async fn exists(&self, key: &OutputKey) -> Result<bool, StorageError> {
        let path = self.file_path(key);
        match tokio::fs::try_exists(&path).await {
            Ok(present) => Ok(present),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    async fn write(
        &self,
        key: &OutputKey,
        display_name: &str,
        series: &TimeSeries,
    ) -> Result<(), StorageError> {
        let body = render_csv(display_name, series);
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StorageError::Io {
                path: self.root.clone(),
                source,
            })?;
        // The body lands under a temp name first; only the rename publishes
        // the key, so an interrupted write never satisfies a later `exists`
        // probe.
        let temp = self.temp_path(key);
        tokio::fs::write(&temp, body)
            .await
            .map_err(|source| StorageError::Io {
                path: temp.clone(),
                source,
            })?;
        let path = self.file_path(key);
        tokio::fs::rename(&temp, &path)
            .await
            .map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(key = %key, path = %path.display(), "result persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use trendq_core::{DateRange, MonthDate, TimePoint};

    use super::*;

    fn key() -> OutputKey {
        let range = DateRange {
            start: MonthDate::new(2010, 1).unwrap(),
            end: MonthDate::new(2010, 3).unwrap(),
        };
        OutputKey::derive("tesla", None, &range)
    }

    fn series() -> TimeSeries {
        TimeSeries::new(vec![TimePoint {
            date: NaiveDate::from_ymd_opt(2010, 1, 3).unwrap(),
            value: 45,
        }])
    }

    #[tokio::test]
    async fn write_then_exists_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        let key = key();

        assert!(!store.exists(&key).await.unwrap());
        store.write(&key, "tesla", &series()).await.unwrap();
        assert!(store.exists(&key).await.unwrap());

        let content = std::fs::read_to_string(dir.path().join(format!("{key}.csv"))).unwrap();
        assert_eq!(content, "Date,tesla\n2010-01-03,45\n");
    }

    #[tokio::test]
    async fn write_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("results").join("2010");
        let store = DirStore::new(&nested);
        store.write(&key(), "tesla", &series()).await.unwrap();
        assert!(nested.join(format!("{}.csv", key())).is_file());
    }

    #[tokio::test]
    async fn interrupted_write_artifact_does_not_count_as_complete() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        let key = key();

        // A crash between the temp write and the rename leaves exactly this.
        std::fs::write(dir.path().join(format!("{key}.csv.tmp")), "Date,tesla\n2010-").unwrap();
        assert!(!store.exists(&key).await.unwrap());
    }

    #[tokio::test]
    async fn successful_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        let key = key();

        store.write(&key, "tesla", &series()).await.unwrap();
        assert!(dir.path().join(format!("{key}.csv")).is_file());
        assert!(!dir.path().join(format!("{key}.csv.tmp")).exists());
    }

    #[tokio::test]
    async fn unwritable_root_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("occupied");
        std::fs::write(&blocker, "not a directory").unwrap();

        let store = DirStore::new(&blocker);
        let err = store.write(&key(), "tesla", &series()).await.unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }), "{err}");
        assert!(!blocker.join(format!("{}.csv", key())).exists());
    }

    #[tokio::test]
    async fn exists_is_false_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path().join("never-created"));
        assert!(!store.exists(&key()).await.unwrap());
    }
}
