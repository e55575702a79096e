//! Growable (mantissa, exponent) builder for one chunk.
//!
//! An [`Accumulator`] is owned by exactly one producer from creation until it
//! is handed to the publisher. Storage is two parallel boxed arrays that start
//! at [`INITIAL_CAPACITY`] and double when full, never beyond the chunk cap.

use crate::compression::{Compressed, Selector};
use crate::config::ChunkConfig;
use crate::entry::NumericEntry;
use crate::error::{Error, Result};

/// Slots allocated by a fresh accumulator.
pub const INITIAL_CAPACITY: usize = 4;

/// Builder of one chunk's entries.
#[derive(Debug)]
pub struct Accumulator {
    chunk_index: u32,
    chunk_cap: usize,
    mantissas: Box<[i64]>,
    exponents: Box<[i32]>,
    len: usize,
}

impl Accumulator {
    /// Creates an empty accumulator for `chunk_index`.
    #[must_use]
    pub fn new(chunk_index: u32, config: &ChunkConfig) -> Self {
        Self::with_cap(chunk_index, config.chunk_cap)
    }

    /// Creates an empty accumulator holding at most `chunk_cap` entries.
    #[must_use]
    pub fn with_cap(chunk_index: u32, chunk_cap: usize) -> Self {
        let initial = INITIAL_CAPACITY.min(chunk_cap);
        Self {
            chunk_index,
            chunk_cap,
            mantissas: vec![0; initial].into_boxed_slice(),
            exponents: vec![0; initial].into_boxed_slice(),
            len: 0,
        }
    }

    /// Appends `mantissa * 10^exponent`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructuralInvariant`] if the chunk already holds
    /// `chunk_cap` entries; the entry is not accepted.
    #[inline]
    pub fn append(&mut self, mantissa: i64, exponent: i32) -> Result<()> {
        if self.len == self.mantissas.len() {
            self.grow()?;
        }
        self.mantissas[self.len] = mantissa;
        self.exponents[self.len] = exponent;
        self.len += 1;
        Ok(())
    }

    /// Appends a [`NumericEntry`].
    ///
    /// # Errors
    ///
    /// See [`Accumulator::append`].
    pub fn push(&mut self, entry: NumericEntry) -> Result<()> {
        self.append(entry.mantissa, entry.exponent)
    }

    #[cold]
    fn grow(&mut self) -> Result<()> {
        if self.len >= self.chunk_cap {
            return Err(Error::StructuralInvariant(format!(
                "chunk {} is full: cannot append entry {} past cap {}",
                self.chunk_index,
                self.len + 1,
                self.chunk_cap
            )));
        }
        let capacity = (self.len * 2).clamp(1, self.chunk_cap);
        self.mantissas = resized(&self.mantissas[..self.len], capacity);
        self.exponents = resized(&self.exponents[..self.len], capacity);
        tracing::trace!(
            chunk_index = self.chunk_index,
            capacity,
            "accumulator grew"
        );
        Ok(())
    }

    /// Chunk index this accumulator builds.
    #[must_use]
    pub fn chunk_index(&self) -> u32 {
        self.chunk_index
    }

    /// Number of appended entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.mantissas.len()
    }

    /// Maximum entries this chunk accepts.
    #[must_use]
    pub fn chunk_cap(&self) -> usize {
        self.chunk_cap
    }

    /// Appended mantissas in row order.
    #[must_use]
    pub fn mantissas(&self) -> &[i64] {
        &self.mantissas[..self.len]
    }

    /// Appended exponents in row order.
    #[must_use]
    pub fn exponents(&self) -> &[i32] {
        &self.exponents[..self.len]
    }

    /// Consumes the accumulator and compresses its entries.
    ///
    /// # Errors
    ///
    /// See [`Selector::compress`].
    pub fn compress(self, selector: &Selector) -> Result<Compressed> {
        selector.compress(self.mantissas(), self.exponents())
    }
}

fn resized<T: Copy + Default>(live: &[T], capacity: usize) -> Box<[T]> {
    let mut next = vec![T::default(); capacity].into_boxed_slice();
    next[..live.len()].copy_from_slice(live);
    next
}
