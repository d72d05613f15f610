//! Lead scoring model.
//!
//! A weighted sum of the normalized feature vector, scaled to [0,100] and
//! clamped. Deterministic: identical features always yield the identical
//! score.

use crate::config::AnalyticsConfig;
use crate::models::{LeadFeatures, LeadScoreResult, PriorityTier};
use std::cmp::Ordering;

/// Converts a feature vector into a 0-100 lead score.
pub fn score(features: &LeadFeatures, config: &AnalyticsConfig) -> f64 {
    let w = &config.score_weights;
    let weighted = w.freshness * features.freshness
        + w.engagement * features.engagement_norm
        + w.deal_value * features.deal_value_norm
        + w.activity * features.activity_frequency
        + w.status * features.status_weight;

    (weighted * 100.0).clamp(0.0, 100.0)
}

/// Buckets a score into its triage tier.
pub fn priority_tier(score: f64, config: &AnalyticsConfig) -> PriorityTier {
    if score >= config.hot_threshold {
        PriorityTier::Hot
    } else if score >= config.warm_threshold {
        PriorityTier::Warm
    } else {
        PriorityTier::Cold
    }
}

/// Total ranking order over scored leads: score descending, then more
/// recent activity, then id ascending. Leads with no recorded activity rank
/// after any lead with one at the same score.
pub fn rank_order(a: &LeadScoreResult, b: &LeadScoreResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| match (b.last_activity_at, a.last_activity_at) {
            (Some(b_last), Some(a_last)) => b_last.cmp(&a_last),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.lead_id.cmp(&b.lead_id))
}
