//! Coefficient-domain transforms
//!
//! The estimator moves each frame's model between three parameterizations:
//! AR (predictor) coefficients, reflection coefficients, and the
//! autocorrelation domain. Reflection coefficients carry the stability
//! gate (each must lie strictly inside the unit circle); the
//! autocorrelation domain is the one stored per frame, because
//! autocorrelation vectors can be summed and averaged across frames and
//! still describe a valid aggregate signal.
//!
//! AR parameter slices hold the full prediction polynomial: `order + 1`
//! values with a fixed leading `1.0`. Reflection and autocorrelation
//! slices hold `order` values.

/// Clamp value applied to reflection coefficients that reach the unit
/// circle
pub const REFLECTION_CLAMP: f64 = 0.999_999_999_9;

/// Derive reflection coefficients from AR parameters, checking stability
///
/// An inverse Levinson step-down: starting from the full-order polynomial,
/// each iteration peels off the highest reflection coefficient and rebuilds
/// the next-lower-order polynomial, dividing by `1 - k^2`. Returns `false`
/// if that denominator is ever exactly zero or any reflection coefficient
/// leaves the unit circle; the caller drops the frame.
pub fn stable_kfroma(ar: &[f64], reflection: &mut [f64]) -> bool {
    let order = reflection.len();
    assert_eq!(ar.len(), order + 1, "AR polynomial must hold order + 1 values");

    let mut work = [0.0f64; super::POLY_LEN];
    let mut next = [0.0f64; super::POLY_LEN];
    work[..=order].copy_from_slice(ar);

    reflection[order - 1] = work[order];
    if reflection[order - 1].abs() > 1.0 {
        return false;
    }

    for i in (1..order).rev() {
        let k = reflection[i];
        let div = 1.0 - k * k;
        if div == 0.0 {
            return false;
        }
        for j in 0..=i {
            next[j] = (work[j] - work[i + 1 - j] * k) / div;
        }
        work[..=i].copy_from_slice(&next[..=i]);

        reflection[i - 1] = next[i];
        if reflection[i - 1].abs() > 1.0 {
            return false;
        }
    }

    true
}

/// Rebuild AR parameters from reflection coefficients
///
/// The forward Levinson order update. Always succeeds; feeding it clamped
/// reflection coefficients yields a stable polynomial.
pub fn afromk(reflection: &[f64], ar: &mut [f64]) {
    let order = reflection.len();
    assert_eq!(ar.len(), order + 1, "AR polynomial must hold order + 1 values");

    let mut prev = [0.0f64; super::POLY_LEN];

    ar[0] = 1.0;
    for i in 1..=order {
        ar[i] = reflection[i - 1];
        prev[..i].copy_from_slice(&ar[..i]);
        for j in 1..i {
            ar[j] = prev[j] + prev[i - j] * ar[i];
        }
    }
}

/// Re-express AR parameters as a normalized autocorrelation vector
///
/// Builds a staging matrix row by row, each row the next-lower-order
/// step-down of the one above it, then back-substitutes to produce
/// autocorrelation values at lags `1..=order` (lag 0 is normalized to 1
/// and implicit in the output).
pub fn rfroma(ar: &[f64], acf: &mut [f64]) {
    let order = acf.len();
    assert_eq!(ar.len(), order + 1, "AR polynomial must hold order + 1 values");

    let mut mat = [[0.0f64; super::POLY_LEN]; super::POLY_LEN];

    mat[order][0] = 1.0;
    for i in 1..=order {
        mat[order][i] = -ar[i];
    }

    for i in (2..=order).rev() {
        let k = mat[i][i];
        let div = 1.0 - k * k;
        for j in 1..i {
            mat[i - 1][j] = (mat[i][i - j] * k + mat[i][j]) / div;
        }
    }

    let mut expanded = [0.0f64; super::POLY_LEN];
    expanded[0] = 1.0;
    for i in 1..=order {
        let mut sum = 0.0;
        for j in 1..=i {
            sum += mat[i][j] * expanded[i - j];
        }
        expanded[i] = sum;
        acf[i - 1] = sum;
    }
}

/// Convert an averaged autocorrelation vector back to reflection
/// coefficients
///
/// The forward Levinson-Durbin recursion over lags `1..=order` (lag 0 is
/// taken as 1, so the residual prediction-error variance starts at 1.0 and
/// shrinks by `1 - k^2` each step). A residual that falls to zero or below
/// means the signal is degenerate at that model order; every remaining
/// coefficient is forced to zero rather than divided by a non-positive
/// variance. Returns the final residual variance.
pub fn levinson_durbin_recursion(acf: &[f64], reflection: &mut [f64]) -> f64 {
    let order = acf.len();
    assert_eq!(reflection.len(), order);

    let mut ar = [0.0f64; super::POLY_LEN];
    let mut prev = [0.0f64; super::POLY_LEN];
    ar[0] = 1.0;
    let mut residual = 1.0f64;

    for i in 1..=order {
        let mut sum = 0.0;
        for j in 1..i {
            sum += ar[j] * acf[i - j - 1];
        }

        ar[i] = if residual > 0.0 {
            -(acf[i - 1] + sum) / residual
        } else {
            0.0
        };
        reflection[i - 1] = ar[i];

        prev[..i].copy_from_slice(&ar[..i]);
        for j in 1..i {
            ar[j] = prev[j] + prev[i - j] * ar[i];
        }

        residual *= 1.0 - ar[i] * ar[i];
    }

    residual
}

/// Force reflection coefficients strictly inside the unit circle
///
/// Values at or beyond the circle describe a non-causal predictor and must
/// never reach the codebook.
pub fn clamp_reflection(reflection: &mut [f64]) {
    for k in reflection.iter_mut() {
        if *k >= 1.0 {
            *k = REFLECTION_CLAMP;
        } else if *k <= -1.0 {
            *k = -REFLECTION_CLAMP;
        }
    }
}
