//! Churn-risk model.
//!
//! Operates on the same feature vector as the scoring model. The probability
//! is a monotone function of staleness: holding the other features fixed, a
//! lead that has been quiet for longer is never assigned a lower risk.

use crate::config::AnalyticsConfig;
use crate::models::{ChurnLabel, LeadFeatures};

const STALENESS_WEIGHT: f64 = 0.6;
const DISENGAGEMENT_WEIGHT: f64 = 0.25;
const INACTIVITY_WEIGHT: f64 = 0.15;

/// Converts a feature vector into a churn probability in [0,1].
pub fn churn_probability(features: &LeadFeatures, config: &AnalyticsConfig) -> f64 {
    let staleness = (features.recency_days / config.staleness_cap_days).clamp(0.0, 1.0);
    let disengagement = 1.0 - features.engagement_norm;
    let inactivity = 1.0 - features.activity_frequency;

    (STALENESS_WEIGHT * staleness
        + DISENGAGEMENT_WEIGHT * disengagement
        + INACTIVITY_WEIGHT * inactivity)
        .clamp(0.0, 1.0)
}

/// Buckets a probability into its churn label. The bucketing is monotone:
/// a higher probability never maps to a lower label.
pub fn churn_label(probability: f64, config: &AnalyticsConfig) -> ChurnLabel {
    if probability >= config.churn_high_threshold {
        ChurnLabel::High
    } else if probability >= config.churn_medium_threshold {
        ChurnLabel::Medium
    } else {
        ChurnLabel::Low
    }
}
