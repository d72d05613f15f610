//! Market concentration calculator.
//!
//! Herfindahl-style index: the sum of squared market shares, in [1/n, 1]
//! for n markets. Labels use the industry-standard HHI thresholds scaled to
//! the [0,1] share domain.

use crate::config::AnalyticsConfig;
use crate::errors::AppError;
use crate::models::{ConcentrationLabel, ConcentrationResult};

/// Computes the concentration index over a set of market shares.
///
/// The shares must sum to 1 within the configured tolerance. That is a
/// defensive check on aggregator output: a failure is a bug upstream and is
/// reported as an `InvariantViolation`, never silently corrected.
pub fn concentration(
    shares: &[f64],
    config: &AnalyticsConfig,
) -> Result<ConcentrationResult, AppError> {
    let total: f64 = shares.iter().sum();
    if (total - 1.0).abs() > config.share_tolerance {
        return Err(AppError::InvariantViolation(format!(
            "market shares sum to {} instead of 1",
            total
        )));
    }

    let index: f64 = shares.iter().map(|s| s * s).sum();

    let label = if index < config.fragmented_below {
        ConcentrationLabel::Fragmented
    } else if index <= config.concentrated_above {
        ConcentrationLabel::Moderate
    } else {
        ConcentrationLabel::Concentrated
    };

    Ok(ConcentrationResult { index, label })
}
