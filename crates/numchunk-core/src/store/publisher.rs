//! Closing accumulators into durable, visible chunks.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::{AppendableColumn, ChunkKey, ChunkStore, StoredChunk};
use crate::accumulator::Accumulator;
use crate::compression::{CompressionStats, Selector};
use crate::config::ChunkConfig;
use crate::encoding::EncodingKind;
use crate::error::{Error, Result};

/// Hands closed chunks of one column to a [`ChunkStore`].
///
/// Cheap to clone; every producer of the column may hold its own copy.
#[derive(Clone)]
pub struct Publisher {
    store: Arc<dyn ChunkStore>,
    column: Arc<AppendableColumn>,
    selector: Selector,
    config: ChunkConfig,
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("column_id", &self.column.column_id())
            .field("selector", &self.selector)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Publisher {
    /// Creates a publisher for `column` writing into `store`.
    #[must_use]
    pub fn new(
        store: Arc<dyn ChunkStore>,
        column: Arc<AppendableColumn>,
        config: &ChunkConfig,
    ) -> Self {
        Self {
            store,
            column,
            selector: Selector::new(config),
            config: *config,
        }
    }

    /// Column this publisher closes chunks of.
    #[must_use]
    pub fn column(&self) -> &Arc<AppendableColumn> {
        &self.column
    }

    /// Starts a new chunk of the column.
    #[must_use]
    pub fn accumulator(&self, chunk_index: u32) -> Accumulator {
        Accumulator::new(chunk_index, &self.config)
    }

    /// Compresses `acc`, records its row count on the column and starts
    /// persisting it.
    ///
    /// The put runs on the tokio blocking pool; the returned handle resolves
    /// once the chunk is durable. Must be called from within a tokio runtime.
    /// Closing an index again with the same row count puts the chunk again,
    /// which is how a failed put is retried.
    ///
    /// # Errors
    ///
    /// - [`Error::Internal`] if no tokio runtime is available or packing fails
    /// - [`Error::StructuralInvariant`] if the chunk index was already closed
    ///   with a different row count; nothing is written in that case
    pub fn close(&self, acc: Accumulator) -> Result<PutHandle> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::Internal(format!("chunk close needs a tokio runtime: {e}")))?;

        let chunk_index = acc.chunk_index();
        let rows = acc.len();
        let compressed = acc.compress(&self.selector)?;
        let key = self.column.chunk_key(chunk_index);
        let stored = StoredChunk::from_chunk(&compressed.chunk);
        let kind = stored.kind;

        // Rows become visible before the put starts, so a rejected close
        // never reaches the store
        self.column.close_chunk(chunk_index, rows)?;

        let store = Arc::clone(&self.store);
        let task = runtime.spawn_blocking(move || {
            let result = store.put(key, stored);
            if let Err(ref e) = result {
                tracing::error!(%key, error = %e, "chunk put failed");
            }
            result
        });

        tracing::debug!(%key, rows, %kind, "chunk closed");

        Ok(PutHandle {
            key,
            rows,
            kind,
            stats: compressed.stats,
            task,
        })
    }
}

/// Completion of one chunk's background put.
#[derive(Debug)]
pub struct PutHandle {
    key: ChunkKey,
    rows: usize,
    kind: EncodingKind,
    stats: CompressionStats,
    task: JoinHandle<Result<()>>,
}

impl PutHandle {
    /// Key the chunk is stored under.
    #[must_use]
    pub fn key(&self) -> ChunkKey {
        self.key
    }

    /// Rows in the chunk.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Layout the chunk was encoded with.
    #[must_use]
    pub fn kind(&self) -> EncodingKind {
        self.kind
    }

    /// Compression statistics of the chunk.
    #[must_use]
    pub fn stats(&self) -> &CompressionStats {
        &self.stats
    }

    /// True once the put has completed, successfully or not.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the put to complete.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the put failed, or [`Error::Internal`]
    /// if the put task panicked or was cancelled.
    pub async fn wait(self) -> Result<()> {
        let key = self.key;
        self.task
            .await
            .map_err(|e| Error::Internal(format!("put task for {key} did not complete: {e}")))?
    }
}

/// A set of in-flight puts to join before treating a column as durable.
#[derive(Debug, Default)]
pub struct PendingPuts {
    handles: Vec<PutHandle>,
}

impl PendingPuts {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handle.
    pub fn push(&mut self, handle: PutHandle) {
        self.handles.push(handle);
    }

    /// Number of tracked puts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// True if no puts are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for every tracked put, then reports the first failure.
    ///
    /// Returns the number of rows made durable.
    ///
    /// # Errors
    ///
    /// Returns the first error in push order; all puts have completed by
    /// the time it is returned.
    pub async fn join_all(self) -> Result<usize> {
        let mut first_err = None;
        let mut rows = 0;
        for handle in self.handles {
            let handle_rows = handle.rows();
            match handle.wait().await {
                Ok(()) => rows += handle_rows,
                Err(e) => {
                    first_err.get_or_insert(e);
                }
            }
        }
        first_err.map_or(Ok(rows), Err)
    }
}

impl Extend<PutHandle> for PendingPuts {
    fn extend<I: IntoIterator<Item = PutHandle>>(&mut self, iter: I) {
        self.handles.extend(iter);
    }
}

impl FromIterator<PutHandle> for PendingPuts {
    fn from_iter<I: IntoIterator<Item = PutHandle>>(iter: I) -> Self {
        Self {
            handles: iter.into_iter().collect(),
        }
    }
}
