//! Column-level chunk directory.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::ChunkKey;
use crate::error::{Error, Result};

/// Directory of closed chunks for one column.
///
/// Shared by every producer of the column. `close_chunk` is the only
/// mutation and is idempotent per chunk index.
#[derive(Debug)]
pub struct AppendableColumn {
    column_id: u64,
    chunks: RwLock<BTreeMap<u32, usize>>,
}

impl AppendableColumn {
    /// Creates an empty directory.
    #[must_use]
    pub fn new(column_id: u64) -> Self {
        Self {
            column_id,
            chunks: RwLock::new(BTreeMap::new()),
        }
    }

    /// Column identifier.
    #[must_use]
    pub fn column_id(&self) -> u64 {
        self.column_id
    }

    /// Store key for `chunk_index` of this column.
    #[must_use]
    pub fn chunk_key(&self, chunk_index: u32) -> ChunkKey {
        ChunkKey::new(self.column_id, chunk_index)
    }

    /// Records that `chunk_index` closed with `rows` entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructuralInvariant`] if the chunk was already closed
    /// with a different row count. Repeating the same count is a no-op.
    pub fn close_chunk(&self, chunk_index: u32, rows: usize) -> Result<()> {
        let mut chunks = self.chunks.write();
        match chunks.get(&chunk_index) {
            Some(&existing) if existing == rows => Ok(()),
            Some(&existing) => Err(Error::StructuralInvariant(format!(
                "chunk {chunk_index} of column {} already closed with {existing} rows, \
                 cannot close again with {rows}",
                self.column_id
            ))),
            None => {
                chunks.insert(chunk_index, rows);
                Ok(())
            }
        }
    }

    /// Row count of a closed chunk.
    #[must_use]
    pub fn chunk_rows(&self, chunk_index: u32) -> Option<usize> {
        self.chunks.read().get(&chunk_index).copied()
    }

    /// Number of closed chunks.
    #[must_use]
    pub fn closed_chunks(&self) -> usize {
        self.chunks.read().len()
    }

    /// Total rows over closed chunks.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.chunks.read().values().sum()
    }

    /// Freezes the directory into row offsets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructuralInvariant`] if the closed chunk indices are
    /// not exactly `0..n`.
    pub fn layout(&self) -> Result<ColumnLayout> {
        let chunks = self.chunks.read();
        let mut starts = Vec::with_capacity(chunks.len() + 1);
        let mut next_row = 0usize;
        for (expected, (&index, &rows)) in (0u32..).zip(chunks.iter()) {
            if index != expected {
                return Err(Error::StructuralInvariant(format!(
                    "column {} is missing chunk {expected} (next closed chunk is {index})",
                    self.column_id
                )));
            }
            starts.push(next_row);
            next_row += rows;
        }
        starts.push(next_row);
        Ok(ColumnLayout { starts })
    }
}

/// Row offsets of a fully closed column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    // starts[i] is the first row of chunk i; the last element is the row count.
    starts: Vec<usize>,
}

impl ColumnLayout {
    /// Number of chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.starts.len() - 1
    }

    /// Total rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.starts[self.starts.len() - 1]
    }

    /// First row of `chunk_index`.
    #[must_use]
    pub fn chunk_start(&self, chunk_index: u32) -> Option<usize> {
        let i = chunk_index as usize;
        (i < self.chunk_count()).then(|| self.starts[i])
    }

    /// Chunk holding `row` and the row's offset inside it.
    #[must_use]
    pub fn chunk_for_row(&self, row: usize) -> Option<(u32, usize)> {
        if row >= self.row_count() {
            return None;
        }
        let chunk = self.starts[..self.chunk_count()].partition_point(|&s| s <= row) - 1;
        let index = u32::try_from(chunk).ok()?;
        Some((index, row - self.starts[chunk]))
    }
}
