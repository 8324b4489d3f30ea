//! Document store persisting each collection as a JSON snapshot file.
//!
//! The snapshot lives at `<data_dir>/<collection>.json`. Every successful
//! mutation rewrites it through a temporary file followed by a rename, so a
//! crash leaves either the previous or the next snapshot on disk. The
//! in-memory copy only advances once the snapshot has been written.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use mockable::Clock;
use tokio::sync::RwLock;
use tokio::task;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ports::{DocumentStore, DocumentStoreError, WriteOutcome};
use crate::domain::{DocId, Document, Filter, Patch, ReadOptions, Record};

use super::collection::Collection;

/// Errors raised while opening a snapshot directory.
#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    /// The directory or snapshot could not be accessed.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The snapshot exists but does not decode.
    #[error("snapshot {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl FileStoreError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Write-through document store backed by a snapshot file.
pub struct FileDocumentStore<D> {
    collection: RwLock<Collection<D>>,
    dir: Arc<Dir>,
    root: PathBuf,
    file_name: String,
    clock: Arc<dyn Clock>,
}

impl<D: Document> FileDocumentStore<D> {
    /// Open (creating when needed) the snapshot for `D` under `data_dir`.
    pub fn open(data_dir: &Path, clock: Arc<dyn Clock>) -> Result<Self, FileStoreError> {
        Dir::create_ambient_dir_all(data_dir, ambient_authority())
            .map_err(|source| FileStoreError::io(data_dir, source))?;
        let dir = Dir::open_ambient_dir(data_dir, ambient_authority())
            .map_err(|source| FileStoreError::io(data_dir, source))?;
        let file_name = format!("{}.json", D::COLLECTION);
        let path = data_dir.join(&file_name);

        let collection = match dir.read_to_string(&file_name) {
            Ok(contents) => serde_json::from_str::<Collection<D>>(&contents).map_err(
                |source| FileStoreError::Corrupt {
                    path: path.clone(),
                    source,
                },
            )?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => Collection::default(),
            Err(error) => return Err(FileStoreError::io(path, error)),
        };
        info!(
            collection = D::COLLECTION,
            records = collection.len(),
            path = %path.display(),
            "document snapshot loaded"
        );

        Ok(Self {
            collection: RwLock::new(collection),
            dir: Arc::new(dir),
            root: data_dir.to_path_buf(),
            file_name,
            clock,
        })
    }

    /// Location of the snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.root.join(&self.file_name)
    }

    /// Serialise `collection` and hand the file writes to the blocking pool.
    async fn persist(&self, collection: &Collection<D>) -> Result<(), DocumentStoreError> {
        let bytes = serde_json::to_vec_pretty(collection)?;
        let dir = Arc::clone(&self.dir);
        let file_name = self.file_name.clone();
        task::spawn_blocking(move || write_snapshot(&dir, &file_name, &bytes))
            .await
            .map_err(|error| {
                DocumentStoreError::connection(format!("snapshot writer failed: {error}"))
            })?
    }

    /// Apply `change` to a copy of the collection and keep it once persisted.
    ///
    /// `change` reports whether anything was modified; unchanged collections
    /// are not rewritten.
    async fn commit<T, F>(&self, change: F) -> Result<T, DocumentStoreError>
    where
        F: FnOnce(&mut Collection<D>) -> Result<(T, bool), DocumentStoreError> + Send,
    {
        let mut guard = self.collection.write().await;
        let mut next = guard.clone();
        let (value, changed) = change(&mut next)?;
        if changed {
            self.persist(&next).await?;
            *guard = next;
        }
        Ok(value)
    }
}

/// Replace `file_name` with `bytes` through a staging file and a rename.
fn write_snapshot(dir: &Dir, file_name: &str, bytes: &[u8]) -> Result<(), DocumentStoreError> {
    let staging = format!(".{file_name}.{}.tmp", Uuid::new_v4().simple());
    dir.write(&staging, bytes)
        .map_err(|error| DocumentStoreError::connection(format!("writing {staging}: {error}")))?;
    if let Err(error) = dir.rename(&staging, dir, file_name) {
        let _cleanup_result = dir.remove_file(&staging);
        return Err(DocumentStoreError::connection(format!(
            "replacing {file_name}: {error}"
        )));
    }
    Ok(())
}

#[async_trait]
impl<D: Document> DocumentStore<D> for FileDocumentStore<D> {
    async fn create_one(&self, fields: D) -> Result<DocId, DocumentStoreError> {
        let now = self.clock.utc();
        let id = self
            .commit(|collection| Ok((collection.insert(fields, now), true)))
            .await?;
        debug!(collection = D::COLLECTION, %id, "record created");
        Ok(id)
    }

    async fn read_one(&self, filter: &Filter) -> Result<Option<Record<D>>, DocumentStoreError> {
        self.collection.read().await.read_one(filter)
    }

    async fn read_many(
        &self,
        filter: &Filter,
        options: &ReadOptions,
    ) -> Result<Vec<Record<D>>, DocumentStoreError> {
        self.collection.read().await.read_many(filter, options)
    }

    async fn update_one(
        &self,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<WriteOutcome, DocumentStoreError> {
        let now = self.clock.utc();
        let outcome = self
            .commit(|collection| {
                let outcome = collection.update_one(filter, patch, now)?;
                Ok((outcome, outcome.is_hit()))
            })
            .await?;
        debug!(collection = D::COLLECTION, matched = outcome.matched, "record updated");
        Ok(outcome)
    }

    async fn delete_one(&self, filter: &Filter) -> Result<WriteOutcome, DocumentStoreError> {
        let outcome = self
            .commit(|collection| {
                let outcome = collection.delete_one(filter)?;
                Ok((outcome, outcome.is_hit()))
            })
            .await?;
        debug!(collection = D::COLLECTION, matched = outcome.matched, "record deleted");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::DefaultClock;
    use rstest::{fixture, rstest};
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Entry {
        title: String,
    }

    impl Document for Entry {
        const COLLECTION: &'static str = "entries";
    }

    fn entry(title: &str) -> Entry {
        Entry {
            title: title.into(),
        }
    }

    #[fixture]
    fn data_dir() -> TempDir {
        TempDir::new().expect("temp dir")
    }

    fn open(dir: &TempDir) -> FileDocumentStore<Entry> {
        FileDocumentStore::open(dir.path(), Arc::new(DefaultClock)).expect("open store")
    }

    #[rstest]
    #[tokio::test]
    async fn records_survive_reopen(data_dir: TempDir) {
        let id = {
            let store = open(&data_dir);
            let id = store.create_one(entry("Dune")).await.expect("create");
            store
                .update_one_by_id(id, &Patch::new().set("title", "Dune Messiah"))
                .await
                .expect("update");
            id
        };

        let reopened = open(&data_dir);
        let record = reopened
            .read_one_by_id(id)
            .await
            .expect("read")
            .expect("present");
        assert_eq!(record.fields.title, "Dune Messiah");
    }

    #[rstest]
    #[tokio::test]
    async fn deletes_are_persisted(data_dir: TempDir) {
        let store = open(&data_dir);
        let id = store.create_one(entry("Emma")).await.expect("create");
        store.delete_one_by_id(id).await.expect("delete");

        let reopened = open(&data_dir);
        assert!(reopened.read_one_by_id(id).await.expect("read").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn snapshot_is_named_after_collection(data_dir: TempDir) {
        let store = open(&data_dir);
        store.create_one(entry("Ulysses")).await.expect("create");
        assert_eq!(store.snapshot_path(), data_dir.path().join("entries.json"));
        assert!(store.snapshot_path().exists());
    }

    #[rstest]
    fn corrupt_snapshot_is_reported(data_dir: TempDir) {
        let dir = Dir::open_ambient_dir(data_dir.path(), ambient_authority()).expect("open dir");
        dir.write("entries.json", b"{ not json").expect("write");

        let result = FileDocumentStore::<Entry>::open(data_dir.path(), Arc::new(DefaultClock));
        assert!(matches!(result, Err(FileStoreError::Corrupt { .. })));
    }

    #[rstest]
    #[tokio::test]
    async fn rejected_patch_is_not_written(data_dir: TempDir) {
        let store = open(&data_dir);
        let id = store.create_one(entry("Beloved")).await.expect("create");
        let result = store
            .update_one_by_id(id, &Patch::new().set("pages", 300))
            .await;
        assert!(matches!(result, Err(DocumentStoreError::InvalidPatch { .. })));

        let reopened = open(&data_dir);
        let record = reopened
            .read_one_by_id(id)
            .await
            .expect("read")
            .expect("present");
        assert_eq!(record.fields, entry("Beloved"));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_writers_all_reach_the_snapshot(data_dir: TempDir) {
        let store = Arc::new(open(&data_dir));
        let writers = (0..8).map(|n| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.create_one(entry(&format!("Book {n}"))).await })
        });
        for writer in futures_util::future::join_all(writers).await {
            writer.expect("writer task").expect("create");
        }

        let reopened = open(&data_dir);
        let records = reopened
            .read_many(&Filter::all(), &ReadOptions::default())
            .await
            .expect("read");
        assert_eq!(records.len(), 8);
    }
}
