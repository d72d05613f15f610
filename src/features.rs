//! Per-lead feature normalization.
//!
//! Batch-wide statistics (median engagement, largest deal) are computed in
//! one pre-pass over the snapshot; normalizing a single lead is then a pure
//! function of the lead, the pre-pass result and the invocation instant.

use crate::config::AnalyticsConfig;
use crate::models::{Lead, LeadFeatures, LeadStatus};
use chrono::{DateTime, Utc};

/// Batch-wide aggregates needed to normalize individual leads.
#[derive(Debug, Clone, Copy)]
pub struct BatchStats {
    /// Median of the engagement scores present in the batch. Substituted for
    /// leads whose source did not provide one, keeping all leads of a run
    /// comparable.
    pub median_engagement: f64,
    /// Largest deal value in the batch; the denominator for deal
    /// normalization.
    pub max_deal_value: f64,
}

impl BatchStats {
    /// One pre-pass over the snapshot.
    pub fn from_leads(leads: &[Lead]) -> Self {
        let mut engagements: Vec<f64> = leads
            .iter()
            .filter_map(|l| l.engagement_score)
            .filter(|e| e.is_finite())
            .collect();
        engagements.sort_by(|a, b| a.total_cmp(b));

        let median_engagement = if engagements.is_empty() {
            0.0
        } else {
            let mid = engagements.len() / 2;
            if engagements.len() % 2 == 0 {
                (engagements[mid - 1] + engagements[mid]) / 2.0
            } else {
                engagements[mid]
            }
        };

        let max_deal_value = leads
            .iter()
            .map(|l| l.deal_value)
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);

        Self {
            median_engagement,
            max_deal_value,
        }
    }
}

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / 86_400.0
}

/// Funnel-position weight of a status.
pub fn status_weight(status: LeadStatus) -> f64 {
    match status {
        LeadStatus::New => 0.2,
        LeadStatus::Contacted => 0.4,
        LeadStatus::Qualified => 0.8,
        LeadStatus::Won => 1.0,
        LeadStatus::Lost => 0.0,
    }
}

/// Derives the normalized feature vector for one lead.
///
/// Missing `last_activity_at` maps to the staleness cap rather than an
/// unbounded penalty; missing `engagement_score` takes the batch median.
pub fn normalize(
    lead: &Lead,
    as_of: DateTime<Utc>,
    stats: &BatchStats,
    config: &AnalyticsConfig,
) -> LeadFeatures {
    let cap = config.staleness_cap_days;

    let recency_days = match lead.last_activity_at {
        Some(last) => days_between(last, as_of).max(0.0).min(cap),
        None => cap,
    };
    let freshness = clamp01(1.0 - recency_days / cap);

    // Fraction of the lead's lifetime that had passed at its last touch.
    // A lead worked right up to "now" scores 1, one never touched scores 0.
    let activity_frequency = match lead.last_activity_at {
        Some(last) => {
            let age = days_between(lead.created_at, as_of).max(1.0);
            let active_span = days_between(lead.created_at, last).clamp(0.0, age);
            clamp01(active_span / age)
        }
        None => 0.0,
    };

    let deal_value_norm = if stats.max_deal_value > 0.0 {
        clamp01(lead.deal_value / stats.max_deal_value)
    } else {
        0.0
    };

    let engagement = lead.engagement_score.unwrap_or(stats.median_engagement);
    let engagement_norm = clamp01(engagement / 100.0);

    LeadFeatures {
        recency_days,
        freshness,
        activity_frequency,
        deal_value_norm,
        engagement_norm,
        status_weight: status_weight(lead.status),
    }
}
