//! Chunk compression.
//!
//! The [`Selector`] studies every (mantissa, exponent) pair of a chunk and
//! stores them in the narrowest fixed-width layout that holds them:
//! - Small non-negative integers in unbiased bytes
//! - Small integer ranges as biased bytes/shorts (`value - bias`)
//! - Decimals of uniform precision as scaled biased bytes/shorts
//! - Everything else as int/long, or float/double when no common scale exists

mod pack;
mod selector;

pub use selector::{
    ChunkAnalysis, Selection, BYTE_SPAN, FLOAT_EXPONENT_RANGE, MAX_FLOAT_MANTISSA,
    MAX_RESCALE_DIGITS, SHORT_SPAN,
};

use crate::config::ChunkConfig;
use crate::encoding::{ByteOrder, EncodedChunk};
use crate::entry::NumericEntry;
use crate::error::Result;

/// Bytes per uncompressed entry: 8-byte mantissa plus 4-byte exponent.
pub const RAW_ENTRY_BYTES: usize = 8 + 4;

/// Compression statistics for one chunk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompressionStats {
    /// Number of rows compressed.
    pub rows: usize,
    /// Size of the (mantissa, exponent) input in bytes.
    pub raw_bytes: usize,
    /// Size of the encoded chunk in bytes.
    pub encoded_bytes: usize,
    /// Compression ratio (raw / encoded).
    pub compression_ratio: f64,
}

impl CompressionStats {
    fn new(rows: usize, encoded_bytes: usize) -> Self {
        let raw_bytes = rows * RAW_ENTRY_BYTES;
        let compression_ratio = if encoded_bytes > 0 {
            raw_bytes as f64 / encoded_bytes as f64
        } else {
            0.0
        };
        Self {
            rows,
            raw_bytes,
            encoded_bytes,
            compression_ratio,
        }
    }
}

/// The output of compressing one chunk.
#[derive(Debug, Clone)]
pub struct Compressed {
    /// The encoded chunk.
    pub chunk: EncodedChunk,
    /// Bounds that drove the decision.
    pub analysis: ChunkAnalysis,
    /// Size statistics.
    pub stats: CompressionStats,
}

/// Chooses and materializes the layout of a chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct Selector {
    byte_order: ByteOrder,
}

impl Selector {
    /// Creates a selector writing chunks in the configured byte order.
    #[must_use]
    pub fn new(config: &ChunkConfig) -> Self {
        Self::with_byte_order(config.byte_order)
    }

    /// Creates a selector writing chunks in `byte_order`.
    #[must_use]
    pub const fn with_byte_order(byte_order: ByteOrder) -> Self {
        Self { byte_order }
    }

    /// Byte order of the chunks this selector produces.
    #[must_use]
    pub const fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Compresses parallel mantissa/exponent columns.
    ///
    /// Output is deterministic: the same input always yields the same bytes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Internal`] only if packing disagrees with the
    /// analysis, which indicates a bug.
    ///
    /// # Panics
    ///
    /// Panics if the two slices differ in length.
    pub fn compress(&self, mantissas: &[i64], exponents: &[i32]) -> Result<Compressed> {
        let analysis = ChunkAnalysis::analyze(mantissas, exponents);
        let selection = analysis.select();
        let chunk = pack::pack(selection, self.byte_order, mantissas, exponents)?;
        let stats = CompressionStats::new(analysis.rows, chunk.encoded_len());

        tracing::debug!(
            rows = analysis.rows,
            xmin = analysis.xmin,
            lemin = %analysis.lemin,
            lemax = %analysis.lemax,
            overflow = analysis.overflow,
            kind = %selection.kind,
            bias = selection.bias,
            encoded_bytes = stats.encoded_bytes,
            "chunk compressed"
        );
        if selection.kind.is_floating() {
            tracing::warn!(
                rows = analysis.rows,
                xmin = analysis.xmin,
                kind = %selection.kind,
                "chunk has no common decimal scale, stored as floating point"
            );
        }

        Ok(Compressed {
            chunk,
            analysis,
            stats,
        })
    }

    /// Compresses a slice of entries.
    ///
    /// # Errors
    ///
    /// See [`Selector::compress`].
    pub fn compress_entries(&self, entries: &[NumericEntry]) -> Result<Compressed> {
        let mantissas: Vec<i64> = entries.iter().map(|e| e.mantissa).collect();
        let exponents: Vec<i32> = entries.iter().map(|e| e.exponent).collect();
        self.compress(&mantissas, &exponents)
    }
}
