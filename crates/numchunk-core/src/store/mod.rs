//! Persistence and visibility of closed chunks.
//!
//! A chunk goes from "building" to "durable and visible" in one step,
//! [`Publisher::close`]: the accumulator is compressed, the encoded bytes are
//! handed to a [`ChunkStore`] on the blocking pool, and the owning
//! [`AppendableColumn`] records the chunk's row count.

mod column;
mod publisher;

pub use column::{AppendableColumn, ColumnLayout};
pub use publisher::{PendingPuts, Publisher, PutHandle};

use std::fmt;

use bytes::Bytes;
use dashmap::DashMap;

use crate::encoding::{ByteOrder, EncodedChunk, EncodingKind};
use crate::error::Result;

/// Address of one chunk in a [`ChunkStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey {
    /// Column the chunk belongs to.
    pub column_id: u64,
    /// Position of the chunk within the column.
    pub chunk_index: u32,
}

impl ChunkKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(column_id: u64, chunk_index: u32) -> Self {
        Self {
            column_id,
            chunk_index,
        }
    }
}

impl fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "column {}/chunk {}", self.column_id, self.chunk_index)
    }
}

/// The unit a [`ChunkStore`] persists: serialized bytes plus the layout
/// needed to read them back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredChunk {
    /// Layout of `payload`.
    pub kind: EncodingKind,
    /// Byte order of `payload`.
    pub byte_order: ByteOrder,
    /// Header and packed slots.
    pub payload: Bytes,
}

impl StoredChunk {
    /// Captures an encoded chunk for storage.
    #[must_use]
    pub fn from_chunk(chunk: &EncodedChunk) -> Self {
        Self {
            kind: chunk.kind(),
            byte_order: chunk.byte_order(),
            payload: chunk.serialize(),
        }
    }

    /// Reconstructs the encoded chunk.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::CorruptChunk`] if the payload does not match
    /// its declared layout.
    pub fn decode(&self) -> Result<EncodedChunk> {
        EncodedChunk::deserialize(self.kind, self.byte_order, self.payload.clone())
    }
}

/// Keyed storage for encoded chunks.
///
/// Calls block; the publisher runs them on the tokio blocking pool.
/// Timeouts and retries belong to the implementation.
pub trait ChunkStore: Send + Sync {
    /// Persists `chunk` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Persistence`] if the write fails.
    fn put(&self, key: ChunkKey, chunk: StoredChunk) -> Result<()>;

    /// Loads the chunk stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Persistence`] if the read fails.
    fn get(&self, key: &ChunkKey) -> Result<Option<StoredChunk>>;
}

/// Concurrent in-memory [`ChunkStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    chunks: DashMap<ChunkKey, StoredChunk>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Stored keys of `column_id`, ascending by chunk index.
    #[must_use]
    pub fn keys_for(&self, column_id: u64) -> Vec<ChunkKey> {
        let mut keys: Vec<ChunkKey> = self
            .chunks
            .iter()
            .map(|e| *e.key())
            .filter(|k| k.column_id == column_id)
            .collect();
        keys.sort_unstable();
        keys
    }
}

impl ChunkStore for MemoryStore {
    fn put(&self, key: ChunkKey, chunk: StoredChunk) -> Result<()> {
        self.chunks.insert(key, chunk);
        Ok(())
    }

    fn get(&self, key: &ChunkKey) -> Result<Option<StoredChunk>> {
        Ok(self.chunks.get(key).map(|e| e.value().clone()))
    }
}
