//! Lead segmentation model.
//!
//! A small decision table over (score, churn label, staleness). The table is
//! exhaustive: the final branch catches every combination the earlier rows
//! do not, so exactly one segment is assigned for any input.

use crate::config::AnalyticsConfig;
use crate::models::{ChurnLabel, LeadFeatures, Segment};

/// Assigns exactly one segment to a lead.
pub fn segment(
    score: f64,
    churn_label: ChurnLabel,
    features: &LeadFeatures,
    config: &AnalyticsConfig,
) -> Segment {
    let high_score = score >= config.hot_threshold;
    let low_score = score < config.warm_threshold;
    let stale = features.recency_days >= config.dormancy_days;

    if high_score && churn_label == ChurnLabel::Low {
        Segment::Champion
    } else if high_score && churn_label == ChurnLabel::High {
        Segment::AtRisk
    } else if low_score && stale {
        Segment::Dormant
    } else {
        Segment::Nurture
    }
}
