//! Codebook row synthesis
//!
//! Expands one predictor's coefficients into the precomputed table form the
//! N64 codec consumes: for each of the `order` history samples, its
//! contribution to each of the next 8 output samples, in the codec's Q11
//! fixed-point scale.

use crate::types::{MAX_ORDER, VECTOR_SIZE};

/// Fixed-point scale of the codec's table entries (Q11)
pub const TABLE_SCALE: f64 = 2048.0;

/// Expand predictor coefficients into one `order * 8` codebook row
///
/// Builds an 8-row staging matrix seeded with the negated, order-reversed
/// coefficient vector, then accumulates each later row as a combination of
/// the previous `order` rows, unrolling the all-pole model into per-sample
/// contributions. The first `order` columns are read out column-major and
/// scaled; quantization into the book happens separately.
pub fn codebook_row_from_predictors(coefficients: &[f64]) -> Vec<f64> {
    let order = coefficients.len();
    assert!(
        order >= 1 && order <= MAX_ORDER,
        "predictor order {} out of range",
        order
    );

    let mut table = [[0.0f64; MAX_ORDER]; VECTOR_SIZE];

    for i in 0..order {
        for j in i..order {
            table[i][j] = -coefficients[order - 1 - j + i];
        }
    }

    for i in 1..VECTOR_SIZE {
        for j in 1..=order {
            if i >= j {
                for k in 0..order {
                    table[i][k] -= coefficients[j - 1] * table[i - j][k];
                }
            }
        }
    }

    let mut row = Vec::with_capacity(order * VECTOR_SIZE);
    for column in 0..order {
        for line in 0..VECTOR_SIZE {
            row.push(table[line][column] * TABLE_SCALE);
        }
    }

    row
}
