//! Geographical analysis pipeline.
//!
//! Rolls the lead snapshot up by country, measures each market against the
//! global averages, computes the concentration of the overall pipeline and
//! derives a strategic stance per market.

use crate::concentration::concentration;
use crate::config::AnalyticsConfig;
use crate::errors::AppError;
use crate::models::{
    CountryMetrics, GeoReport, GeoSummary, Lead, LeadSnapshot, LeadStatus, MarketAction,
    MarketRecommendation, ReportStatus,
};
use crate::repository::LeadRepository;
use crate::{features, scoring};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Rolls the snapshot up into per-country metrics, largest market first.
///
/// Small markets are flagged low-confidence rather than suppressed; a group
/// is never empty, so the per-country rates cannot divide by zero.
pub fn country_metrics(
    snapshot: &LeadSnapshot,
    as_of: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> Vec<CountryMetrics> {
    let stats = features::BatchStats::from_leads(&snapshot.leads);

    let mut groups: BTreeMap<&str, Vec<&Lead>> = BTreeMap::new();
    for lead in &snapshot.leads {
        groups.entry(lead.country.as_str()).or_default().push(lead);
    }

    let total_leads = snapshot.leads.len();
    let mut metrics: Vec<CountryMetrics> = groups
        .into_iter()
        .map(|(country, leads)| {
            let lead_count = leads.len();
            let score_sum: f64 = leads
                .iter()
                .map(|l| scoring::score(&features::normalize(l, as_of, &stats, config), config))
                .sum();
            let won = leads
                .iter()
                .filter(|l| l.status == LeadStatus::Won)
                .count();

            CountryMetrics {
                country: country.to_string(),
                lead_count,
                average_score: score_sum / lead_count as f64,
                total_value: leads.iter().map(|l| l.deal_value).sum(),
                conversion_rate: won as f64 / lead_count as f64,
                share_of_total: lead_count as f64 / total_leads as f64,
                low_confidence: lead_count < config.min_market_leads,
            }
        })
        .collect();

    metrics.sort_by(|a, b| {
        b.lead_count
            .cmp(&a.lead_count)
            .then_with(|| a.country.cmp(&b.country))
    });

    metrics
}

/// Derives a strategic stance per market from its deltas against the global
/// averages. Both deltas must clear the configured margin to move a market
/// off the default "monitor" stance.
pub fn market_recommendations(
    metrics: &[CountryMetrics],
    global_average_score: f64,
    global_conversion_rate: f64,
    config: &AnalyticsConfig,
) -> Vec<MarketRecommendation> {
    metrics
        .iter()
        .map(|m| {
            let score_delta = m.average_score - global_average_score;
            let conversion_delta = m.conversion_rate - global_conversion_rate;

            let recommendation = if score_delta >= config.score_margin
                && conversion_delta >= config.conversion_margin
            {
                MarketAction::Expand
            } else if score_delta <= -config.score_margin
                && conversion_delta <= -config.conversion_margin
            {
                MarketAction::Deprioritize
            } else {
                MarketAction::Monitor
            };

            let rationale = format!(
                "average score {:.1} vs global {:.1} ({:+.1}), conversion {:.1}% vs global {:.1}% ({:+.1} pp)",
                m.average_score,
                global_average_score,
                score_delta,
                m.conversion_rate * 100.0,
                global_conversion_rate * 100.0,
                conversion_delta * 100.0
            );

            MarketRecommendation {
                country: m.country.clone(),
                recommendation,
                rationale,
            }
        })
        .collect()
}

/// Runs the full geographical analysis over a snapshot.
///
/// A snapshot with no countries yields a successful report with an empty
/// analysis and no concentration value. A share-sum failure inside the
/// concentration check aborts the run.
pub fn run_complete_analysis(
    snapshot: &LeadSnapshot,
    as_of: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> Result<GeoReport, AppError> {
    let metrics = country_metrics(snapshot, as_of, config);

    let total_leads = snapshot.leads.len();
    let global_average_score = if metrics.is_empty() {
        0.0
    } else {
        metrics
            .iter()
            .map(|m| m.average_score * m.lead_count as f64)
            .sum::<f64>()
            / total_leads as f64
    };
    let global_conversion_rate = if total_leads == 0 {
        0.0
    } else {
        snapshot
            .leads
            .iter()
            .filter(|l| l.status == LeadStatus::Won)
            .count() as f64
            / total_leads as f64
    };

    let market_concentration = if metrics.is_empty() {
        None
    } else {
        let shares: Vec<f64> = metrics.iter().map(|m| m.share_of_total).collect();
        Some(concentration(&shares, config)?)
    };

    let recommendations =
        market_recommendations(&metrics, global_average_score, global_conversion_rate, config);

    let summary = GeoSummary {
        total_leads,
        total_countries: metrics.len(),
        total_market_value: metrics.iter().map(|m| m.total_value).sum(),
        global_average_score,
        global_conversion_rate,
        concentration: market_concentration,
        skipped_rows: snapshot.skipped_rows,
    };

    tracing::info!(
        "Geographical analysis complete: {} countries over {} leads",
        summary.total_countries,
        summary.total_leads
    );

    Ok(GeoReport {
        status: ReportStatus::Success,
        error: None,
        country_analysis: metrics,
        recommendations,
        summary: Some(summary),
        timestamp: as_of,
    })
}

/// Entry point for the geographical pipeline: fetch one snapshot, analyze,
/// report. Repository failures and invariant violations both surface as a
/// failed report with a single explanatory error.
pub async fn run_geographical_analysis(
    repository: &LeadRepository,
    config: &AnalyticsConfig,
) -> GeoReport {
    let as_of = Utc::now();

    let snapshot = match repository.fetch_active_leads().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!("Geographical analysis failed: {}", e);
            return GeoReport::failed(e.to_string(), as_of);
        }
    };

    match run_complete_analysis(&snapshot, as_of, config) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Geographical analysis failed: {}", e);
            GeoReport::failed(e.to_string(), as_of)
        }
    }
}
