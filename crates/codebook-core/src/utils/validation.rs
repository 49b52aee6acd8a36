//! Input validation for estimation parameters

use crate::error::{CodebookError, Result};
use crate::types::{Threshold, MAX_ORDER, MAX_PREDICTORS};

/// Validate the prediction order
pub fn validate_order(order: usize) -> Result<()> {
    if order < 1 || order > MAX_ORDER {
        return Err(CodebookError::invalid_order(order));
    }

    Ok(())
}

/// Validate the predictor count
pub fn validate_predictor_count(npredictors: usize) -> Result<()> {
    if npredictors < 1 || npredictors > MAX_PREDICTORS {
        return Err(CodebookError::invalid_predictor_count(npredictors));
    }

    Ok(())
}

/// Validate threshold parameters
///
/// Quantile bounds must each lie in `[0, 1]`. An inverted range is not an
/// error in either mode; it simply filters out every frame.
pub fn validate_threshold(threshold: &Threshold) -> Result<()> {
    match *threshold {
        Threshold::Absolute { .. } => {}
        Threshold::Quantile { min, max } => {
            if !(0.0..=1.0).contains(&min) {
                return Err(CodebookError::invalid_quantile("min", min));
            }
            if !(0.0..=1.0).contains(&max) {
                return Err(CodebookError::invalid_quantile("max", max));
            }
        }
    }

    Ok(())
}
