//! # Codebook-Core: ADPCM Predictor Codebook Estimation
//!
//! This library derives the predictor codebooks used by the N64 ADPCM codec.
//! Given a raw mono 16-bit PCM signal it performs linear-prediction analysis
//! over fixed 16-sample frames (autocorrelation, Yule-Walker solving,
//! Levinson-Durbin recursions, stability enforcement), clusters the per-frame
//! models, and synthesizes the fixed-point predictor table the codec selects
//! from when compressing that same audio.
//!
//! The library is pure analysis: it never performs I/O, and the ADPCM frame
//! encoder/decoder that *consumes* the codebook lives elsewhere in the
//! pipeline. The `.aifc`/`.tbl` chunk writers take the finished
//! [`AdpcmBook`] and serialize it verbatim.
//!
//! ## Usage
//!
//! ```rust
//! use codebook_core::{estimate_codebook, SampleEncoding};
//!
//! // Raw little-endian mono 16-bit PCM
//! let pcm: Vec<u8> = vec![0u8; 16 * 2 * 32];
//! let book = estimate_codebook(&pcm, SampleEncoding::LittleEndian, None, 2, 1)?;
//!
//! assert_eq!(book.entries().len(), 2 * 8 * 1);
//! # Ok::<(), codebook_core::CodebookError>(())
//! ```
//!
//! ## Guarantees
//!
//! - Identical input and parameters always produce a bit-identical book.
//! - Every reflection coefficient that reaches the book is strictly inside
//!   the unit circle; unstable frame models are dropped during the scan.
//! - Single-threaded, allocation-local, and reentrant: no state is shared
//!   between calls.

#![deny(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_range_loop)]

pub mod error;
pub mod estimator;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests;

// Re-export commonly used types and entry points
pub use error::{CodebookError, Result};
pub use estimator::estimate_codebook;
pub use types::{AdpcmBook, SampleEncoding, Threshold};

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library's diagnostics
///
/// Installs a default `tracing` fmt subscriber so the per-frame scan
/// diagnostics become visible. Entirely optional: the estimator never
/// requires it, and embedding applications that install their own
/// subscriber should skip it. Safe to call multiple times.
pub fn init() {
    let _ = tracing_subscriber::fmt::try_init();

    tracing::info!("codebook-core v{} initialized", VERSION);
}
