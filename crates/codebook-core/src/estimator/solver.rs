//! Small dense linear solver
//!
//! LU decomposition with implicit-scaling partial pivoting, sized for the
//! order-by-order Yule-Walker systems (never larger than 8x8). A singular or
//! near-singular system is not an error: the solver reports failure and the
//! scan drops that frame.

use crate::types::MAX_ORDER;

/// Diagonal-ratio floor below which the decomposition is treated as
/// numerically singular
const CONDITION_FLOOR: f64 = 1.0e-10;

/// Solve `mat * out = rhs` for an `n`-by-`n` system
///
/// Decomposes `mat` in place and back-substitutes into `out`. Returns
/// `false` when the system is singular or too ill-conditioned to trust;
/// `mat` is left in a partially decomposed state either way.
pub fn lu_decomp_solve(
    mat: &mut [[f64; MAX_ORDER]; MAX_ORDER],
    rhs: &[f64],
    n: usize,
    out: &mut [f64],
) -> bool {
    assert!(n >= 1 && n <= MAX_ORDER, "system size {} out of range", n);
    assert!(rhs.len() >= n && out.len() >= n);

    let mut perm = [0usize; MAX_ORDER];
    if !decompose(mat, n, &mut perm) {
        return false;
    }

    out[..n].copy_from_slice(&rhs[..n]);
    substitute(mat, n, &perm, out);
    true
}

/// Crout decomposition with row pivoting; fills `perm` with the pivot rows
fn decompose(mat: &mut [[f64; MAX_ORDER]; MAX_ORDER], n: usize, perm: &mut [usize]) -> bool {
    let mut scale = [0.0f64; MAX_ORDER];

    // Per-row scale factors; a row of zeros means a singular system
    for i in 0..n {
        let mut big = 0.0f64;
        for j in 0..n {
            big = big.max(mat[i][j].abs());
        }
        if big < f64::EPSILON {
            return false;
        }
        scale[i] = 1.0 / big;
    }

    for j in 0..n {
        for i in 0..j {
            let mut sum = mat[i][j];
            for k in 0..i {
                sum -= mat[i][k] * mat[k][j];
            }
            mat[i][j] = sum;
        }

        let mut big = 0.0f64;
        let mut pivot = j;
        for i in j..n {
            let mut sum = mat[i][j];
            for k in 0..j {
                sum -= mat[i][k] * mat[k][j];
            }
            mat[i][j] = sum;

            let weighted = scale[i] * sum.abs();
            if weighted >= big {
                big = weighted;
                pivot = i;
            }
        }

        if pivot != j {
            mat.swap(pivot, j);
            scale[pivot] = scale[j];
        }
        perm[j] = pivot;

        if mat[j][j] == 0.0 {
            return false;
        }
        if j + 1 < n {
            let inv = 1.0 / mat[j][j];
            for i in (j + 1)..n {
                mat[i][j] *= inv;
            }
        }
    }

    // Reject decompositions whose diagonal spread says the system was
    // numerically singular even though no pivot hit exact zero
    let mut min_diag = f64::MAX;
    let mut max_diag = 0.0f64;
    for i in 0..n {
        let d = mat[i][i].abs();
        min_diag = min_diag.min(d);
        max_diag = max_diag.max(d);
    }
    min_diag / max_diag >= CONDITION_FLOOR
}

/// Forward and back substitution against a decomposed matrix
fn substitute(mat: &[[f64; MAX_ORDER]; MAX_ORDER], n: usize, perm: &[usize], x: &mut [f64]) {
    let mut first_nonzero: Option<usize> = None;

    for i in 0..n {
        let row = perm[i];
        let mut sum = x[row];
        x[row] = x[i];
        if let Some(start) = first_nonzero {
            for k in start..i {
                sum -= mat[i][k] * x[k];
            }
        } else if sum != 0.0 {
            first_nonzero = Some(i);
        }
        x[i] = sum;
    }

    for i in (0..n).rev() {
        let mut sum = x[i];
        for k in (i + 1)..n {
            sum -= mat[i][k] * x[k];
        }
        x[i] = sum / mat[i][i];
    }
}
