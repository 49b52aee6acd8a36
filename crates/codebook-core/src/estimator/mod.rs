//! The codebook estimation pipeline
//!
//! [`estimate_codebook`] composes the whole analysis: a sequential frame
//! scan with silence and stability gating, energy threshold filtering,
//! positional bucketing of the surviving frame models, and per-bucket
//! synthesis of the fixed-point predictor rows.
//!
//! The pipeline is pure and synchronous. Total work is bounded by the
//! buffer length, every intermediate lives and dies inside one call, and
//! identical inputs always produce a bit-identical book.

pub(crate) mod autocorr;
pub(crate) mod buckets;
pub(crate) mod frames;
pub(crate) mod solver;
pub(crate) mod synthesis;
pub(crate) mod transforms;

use tracing::debug;

use crate::error::Result;
use crate::types::{AdpcmBook, SampleEncoding, Threshold, MAX_ORDER};
use crate::utils::{pcm, validation};

/// Length of an AR parameter slice: the polynomial's fixed leading 1.0
/// plus up to [`MAX_ORDER`] coefficients
pub(crate) const POLY_LEN: usize = MAX_ORDER + 1;

/// Estimate an ADPCM predictor codebook from raw PCM
///
/// Scans `buffer` as mono 16-bit PCM in the given byte order, analyzes
/// every full 16-sample frame, and derives `npredictors` predictors of
/// `order` taps each. An optional [`Threshold`] restricts which frames
/// contribute, by absolute energy or by energy quantile.
///
/// # Arguments
///
/// * `buffer` - Raw sample bytes; a trailing partial frame is ignored
/// * `encoding` - Byte order of the 16-bit samples
/// * `threshold` - Optional frame-energy filter; `None` accepts everything
/// * `order` - Prediction order, 1 to 8
/// * `npredictors` - Number of predictors, 1 to 8
///
/// # Errors
///
/// Returns an error for out-of-range `order` or `npredictors`, or a
/// quantile threshold outside `[0, 1]`. Per-frame numerical failures are
/// not errors; those frames are skipped.
pub fn estimate_codebook(
    buffer: &[u8],
    encoding: SampleEncoding,
    threshold: Option<Threshold>,
    order: usize,
    npredictors: usize,
) -> Result<AdpcmBook> {
    validation::validate_order(order)?;
    validation::validate_predictor_count(npredictors)?;
    if let Some(params) = &threshold {
        validation::validate_threshold(params)?;
    }

    let samples = pcm::decode_samples(buffer, encoding);
    let mut scan = frames::scan_frames(&samples, order);
    let scanned = scan.all_norms.len();
    let accepted = scan.observations.len();

    let (min_norm, max_norm) = frames::resolve_threshold(threshold.as_ref(), &scan.all_norms);
    scan.observations
        .retain(|observation| observation.norm >= min_norm && observation.norm <= max_norm);

    debug!(
        scanned,
        accepted,
        kept = scan.observations.len(),
        "frame scan complete"
    );

    let signatures = buckets::average_buckets(&scan.observations, order, npredictors);

    let mut book = AdpcmBook::new(order, npredictors)?;
    let mut reflection = vec![0.0f64; order];
    let mut poly = vec![0.0f64; order + 1];

    for (predictor, signature) in signatures.iter().enumerate() {
        transforms::levinson_durbin_recursion(signature, &mut reflection);
        transforms::clamp_reflection(&mut reflection);
        transforms::afromk(&reflection, &mut poly);

        let row = synthesis::codebook_row_from_predictors(&poly[1..]);
        book.set_predictor(&row, predictor);
    }

    Ok(book)
}
