//! # numchunk Core
//!
//! Adaptive fixed-width compression for chunked numeric columns.
//!
//! Producers append exact decimal values, `mantissa * 10^exponent`, into a
//! per-chunk [`Accumulator`]. When a chunk closes, the [`Selector`] studies
//! its range and precision and packs it into the narrowest of eight layouts:
//!
//! - **Integers**: unbiased 1/2/4/8-byte slots
//! - **Narrow ranges**: 1/2-byte offsets from a stored bias
//! - **Decimals**: biased offsets with a power-of-ten scale
//! - **Fallback**: 4/8-byte IEEE floats
//!
//! The [`Publisher`] persists the encoded chunk asynchronously through a
//! [`ChunkStore`] and records it in the column's chunk directory.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use numchunk_core::{AppendableColumn, ChunkConfig, MemoryStore, Publisher};
//!
//! let store = Arc::new(MemoryStore::new());
//! let column = Arc::new(AppendableColumn::new(1));
//! let publisher = Publisher::new(store, column, &ChunkConfig::default());
//!
//! let mut acc = publisher.accumulator(0);
//! acc.append(120, -2)?; // 1.20
//! acc.append(2300, -2)?; // 23.00
//!
//! let handle = publisher.close(acc)?;
//! handle.wait().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
// Slot packing narrows and widens integers deliberately; every narrowing
// site is range-checked by the selector first.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::float_cmp)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::wildcard_imports)]

pub mod accumulator;
pub mod compression;
pub mod config;
#[cfg(test)]
mod config_tests;
pub mod encoding;
pub mod entry;
pub mod error;
#[cfg(test)]
mod error_tests;
pub mod logging;
pub mod store;

pub use accumulator::Accumulator;
pub use compression::{ChunkAnalysis, Compressed, CompressionStats, Selection, Selector};
pub use config::{ChunkConfig, ConfigError, LoggingConfig, NumchunkConfig};
pub use encoding::{ByteOrder, EncodedChunk, EncodingKind};
pub use entry::NumericEntry;
pub use error::{Error, Result};
pub use logging::init_tracing;
pub use store::{
    AppendableColumn, ChunkKey, ChunkStore, ColumnLayout, MemoryStore, PendingPuts, Publisher,
    PutHandle, StoredChunk,
};
