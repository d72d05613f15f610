//! Lead-intelligence pipeline.
//!
//! Runs feature normalization, scoring, churn prediction, segmentation and
//! the recommendation rules once per lead, then aggregates the results into
//! a single report. Per-lead work is a pure function of the snapshot, the
//! invocation instant and the configuration; running the same snapshot
//! twice at the same instant yields an identical report.

use crate::config::AnalyticsConfig;
use crate::errors::AppError;
use crate::models::{
    ChurnLabel, Lead, LeadScoreResult, LeadSnapshot, MLReport, MLSummary, PriorityDistribution,
    PriorityTier, Recommendation, ReportStatus,
};
use crate::repository::LeadRepository;
use crate::{churn, features, recommendations, scoring, segmentation};
use chrono::{DateTime, Utc};

/// Scores a single lead against the batch statistics. Pure; no cross-lead
/// dependency beyond the pre-pass.
fn score_lead(
    lead: &Lead,
    as_of: DateTime<Utc>,
    stats: &features::BatchStats,
    config: &AnalyticsConfig,
) -> Option<LeadScoreResult> {
    let feats = features::normalize(lead, as_of, stats, config);
    if !feats.is_finite() {
        tracing::warn!("Excluding lead {} with unusable feature vector", lead.id);
        return None;
    }

    let score = scoring::score(&feats, config);
    let tier = scoring::priority_tier(score, config);
    let probability = churn::churn_probability(&feats, config);
    let label = churn::churn_label(probability, config);
    let segment = segmentation::segment(score, label, &feats, config);

    Some(LeadScoreResult {
        lead_id: lead.id,
        company: lead.company.clone(),
        country: lead.country.clone(),
        score,
        priority_tier: tier,
        churn_probability: probability,
        churn_label: label,
        segment,
        last_activity_at: lead.last_activity_at,
    })
}

/// Runs all four models over a snapshot and aggregates the output.
///
/// An empty snapshot is a successful, empty report with `average_score` 0.
pub fn run_all_models(
    snapshot: &LeadSnapshot,
    as_of: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> MLReport {
    let stats = features::BatchStats::from_leads(&snapshot.leads);

    let mut results: Vec<LeadScoreResult> = Vec::with_capacity(snapshot.leads.len());
    let mut excluded = 0;
    for lead in &snapshot.leads {
        match score_lead(lead, as_of, &stats, config) {
            Some(result) => results.push(result),
            None => excluded += 1,
        }
    }

    let mut distribution = PriorityDistribution::default();
    let mut score_total = 0.0;
    for result in &results {
        score_total += result.score;
        match result.priority_tier {
            PriorityTier::Hot => distribution.hot += 1,
            PriorityTier::Warm => distribution.warm += 1,
            PriorityTier::Cold => distribution.cold += 1,
        }
    }

    let average_score = if results.is_empty() {
        0.0
    } else {
        score_total / results.len() as f64
    };

    let mut at_risk_leads: Vec<LeadScoreResult> = results
        .iter()
        .filter(|r| r.churn_label == ChurnLabel::High)
        .cloned()
        .collect();
    at_risk_leads.sort_by(|a, b| {
        b.churn_probability
            .total_cmp(&a.churn_probability)
            .then_with(|| a.lead_id.cmp(&b.lead_id))
    });

    let mut scored_recs: Vec<(Recommendation, f64)> = results
        .iter()
        .flat_map(|r| {
            recommendations::recommendations_for(r)
                .into_iter()
                .map(|rec| (rec, r.score))
                .collect::<Vec<_>>()
        })
        .collect();
    scored_recs.sort_by(recommendations::global_order);
    let recs: Vec<Recommendation> = scored_recs.into_iter().map(|(rec, _)| rec).collect();

    let summary = MLSummary {
        total_leads: results.len(),
        average_score,
        priority_distribution: distribution,
        at_risk_count: at_risk_leads.len(),
        skipped_rows: snapshot.skipped_rows + excluded,
    };

    let mut top_leads = results;
    top_leads.sort_by(scoring::rank_order);

    tracing::info!(
        "ML analysis complete: {} leads scored, {} at risk, {} recommendations",
        summary.total_leads,
        summary.at_risk_count,
        recs.len()
    );

    MLReport {
        status: ReportStatus::Success,
        error: None,
        summary: Some(summary),
        top_leads,
        at_risk_leads,
        recommendations: recs,
        timestamp: as_of,
    }
}

/// Rejects out-of-contract top-leads limits before any computation runs.
pub fn validate_top_limit(limit: usize, config: &AnalyticsConfig) -> Result<(), AppError> {
    if limit > config.max_top_leads {
        return Err(AppError::Usage(format!(
            "Limit cannot exceed {}",
            config.max_top_leads
        )));
    }
    Ok(())
}

/// Entry point for the lead-intelligence pipeline: fetch one snapshot, run
/// the models, report. A repository failure is surfaced once as a failed
/// report; no retries happen inside the core.
pub async fn run_lead_intelligence(
    repository: &LeadRepository,
    config: &AnalyticsConfig,
) -> MLReport {
    let as_of = Utc::now();

    match repository.fetch_active_leads().await {
        Ok(snapshot) => run_all_models(&snapshot, as_of, config),
        Err(e) => {
            tracing::error!("ML analysis failed: {}", e);
            MLReport::failed(e.to_string(), as_of)
        }
    }
}
