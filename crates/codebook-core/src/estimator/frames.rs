//! Frame collection and classification
//!
//! Walks the sample buffer one 16-sample frame at a time, keeping the
//! previous frame alive for lag continuity, and produces one observation
//! per frame that survives the silence and stability gates. Rejected
//! frames are simply skipped; nothing in the scan aborts.

use tracing::{debug, trace};

use super::{autocorr, solver, transforms, POLY_LEN};
use crate::types::{Threshold, FRAME_SIZE, MAX_ORDER, SILENCE_THRESHOLD};

/// One accepted frame's analysis result
///
/// `signature` is the frame's AR model re-expressed in the autocorrelation
/// domain (lags `1..=order`, unit lag 0 implicit), the one parameterization
/// that stays meaningful when averaged across frames.
#[derive(Debug, Clone)]
pub struct FrameObservation {
    /// Sample offset of the frame's first sample (diagnostic only)
    pub origin: usize,
    /// The frame's self-energy (lag-0 autocorrelation)
    pub norm: f64,
    /// Autocorrelation-domain model signature, `order` values
    pub signature: Vec<f64>,
}

/// Everything a full scan of the buffer produces
#[derive(Debug)]
pub struct FrameScan {
    /// Observations for frames that passed every gate, in buffer order
    pub observations: Vec<FrameObservation>,
    /// Self-energies of *all* full frames, silence-gated ones included;
    /// this is the population quantile thresholds resolve against
    pub all_norms: Vec<f64>,
}

/// Scan the buffer and analyze every full frame
///
/// A short trailing partial frame is silently dropped. The first frame is
/// analyzed against an all-zero previous frame.
pub fn scan_frames(samples: &[i16], order: usize) -> FrameScan {
    assert!(order >= 1 && order <= MAX_ORDER, "order {} out of range", order);

    let mut observations = Vec::new();
    let mut all_norms = Vec::new();

    let mut previous = [0.0f64; FRAME_SIZE];
    let mut current = [0.0f64; FRAME_SIZE];
    let mut acf = [0.0f64; POLY_LEN];

    for (index, frame) in samples.chunks_exact(FRAME_SIZE).enumerate() {
        for (dst, &src) in current.iter_mut().zip(frame) {
            *dst = f64::from(src);
        }
        let origin = index * FRAME_SIZE;

        let norm = autocorr::autocorrelation_vector(&previous, &current, order, &mut acf);
        all_norms.push(norm);

        if let Some(observation) = analyze_frame(origin, norm, &previous, &current, &acf, order) {
            observations.push(observation);
        }

        previous.copy_from_slice(&current);
    }

    FrameScan {
        observations,
        all_norms,
    }
}

/// Run one frame through the gate chain: silence gate, Yule-Walker solve,
/// stability check, and re-expression in the autocorrelation domain
fn analyze_frame(
    origin: usize,
    norm: f64,
    previous: &[f64],
    current: &[f64],
    acf: &[f64],
    order: usize,
) -> Option<FrameObservation> {
    if norm.abs() <= SILENCE_THRESHOLD {
        trace!(origin, "frame below silence threshold");
        return None;
    }

    // Negated lags form the Yule-Walker right-hand side
    let mut rhs = [0.0f64; MAX_ORDER];
    for i in 0..order {
        rhs[i] = -acf[i + 1];
    }

    let mut mat = [[0.0f64; MAX_ORDER]; MAX_ORDER];
    autocorr::autocorrelation_matrix(previous, current, order, &mut mat);

    let mut solution = [0.0f64; MAX_ORDER];
    if !solver::lu_decomp_solve(&mut mat, &rhs, order, &mut solution) {
        debug!(origin, "frame dropped: singular normal equations");
        return None;
    }

    let mut poly = [0.0f64; POLY_LEN];
    poly[0] = 1.0;
    poly[1..=order].copy_from_slice(&solution[..order]);

    let mut reflection = [0.0f64; MAX_ORDER];
    if !transforms::stable_kfroma(&poly[..=order], &mut reflection[..order]) {
        debug!(origin, "frame dropped: unstable predictor");
        return None;
    }
    transforms::clamp_reflection(&mut reflection[..order]);

    transforms::afromk(&reflection[..order], &mut poly[..=order]);

    let mut signature = vec![0.0f64; order];
    transforms::rfroma(&poly[..=order], &mut signature);

    Some(FrameObservation {
        origin,
        norm,
        signature,
    })
}

/// Resolve threshold parameters into a concrete `[min, max]` energy range
///
/// Quantile bounds are resolved nearest-rank against the sorted energies of
/// every scanned frame. No threshold, or a quantile threshold over an empty
/// scan, means `[0, +inf)`.
pub fn resolve_threshold(threshold: Option<&Threshold>, all_norms: &[f64]) -> (f64, f64) {
    match threshold {
        None => (0.0, f64::INFINITY),
        Some(&Threshold::Absolute { min, max }) => (min, max),
        Some(&Threshold::Quantile { min, max }) => {
            if all_norms.is_empty() {
                return (0.0, f64::INFINITY);
            }
            let mut sorted = all_norms.to_vec();
            sorted.sort_unstable_by(f64::total_cmp);
            (quantile_value(&sorted, min), quantile_value(&sorted, max))
        }
    }
}

/// Nearest-rank quantile over an ascending population
fn quantile_value(sorted: &[f64], q: f64) -> f64 {
    let index = (q * (sorted.len() - 1) as f64).round() as usize;
    sorted[index.min(sorted.len() - 1)]
}
