//! Bucket aggregation
//!
//! The surviving observations, still in buffer order, are split into
//! `npredictors` contiguous buckets and each bucket's signatures are
//! averaged into one autocorrelation-domain vector, one future codebook
//! predictor per bucket.

use super::frames::FrameObservation;

/// Map a list position to its bucket
///
/// `step` is the integer bucket width; the comparison is strictly
/// greater-than, so the division remainder is absorbed by the *first*
/// bucket. For `total = 10, npredictors = 3` the boundaries are
/// `0..=3 -> 0`, `4..=6 -> 1`, `7..=9 -> 2`. With fewer positions than
/// predictors the width degenerates to zero and positions map one per
/// bucket in order.
pub fn get_bucket_from_frame(position: usize, npredictors: usize, total: usize) -> usize {
    if npredictors <= 1 {
        return 0;
    }

    let step = total / npredictors;
    if step == 0 {
        return position.min(npredictors - 1);
    }

    let mut position = position;
    let mut bucket = 0;
    while position > step {
        position -= step;
        bucket += 1;
    }

    bucket.min(npredictors - 1)
}

/// Average each bucket's signatures element-wise
///
/// Returns `npredictors` autocorrelation-domain vectors of `order` values.
// TODO: decide what an empty bucket should produce. Dividing its zero sums
// by a zero count yields NaN entries, which flow through synthesis and
// quantize to an all-zero predictor.
pub fn average_buckets(
    observations: &[FrameObservation],
    order: usize,
    npredictors: usize,
) -> Vec<Vec<f64>> {
    let total = observations.len();
    let mut sums = vec![vec![0.0f64; order]; npredictors];
    let mut counts = vec![0usize; npredictors];

    for (position, observation) in observations.iter().enumerate() {
        let bucket = get_bucket_from_frame(position, npredictors, total);
        for (accumulated, &value) in sums[bucket].iter_mut().zip(&observation.signature) {
            *accumulated += value;
        }
        counts[bucket] += 1;
    }

    for (sum, &count) in sums.iter_mut().zip(&counts) {
        for value in sum.iter_mut() {
            *value /= count as f64;
        }
    }

    sums
}
