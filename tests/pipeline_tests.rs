/// End-to-end tests for the lead-intelligence pipeline over in-memory
/// snapshots: ranking, summary invariants, degraded batches and the empty
/// snapshot contract.
use chrono::{DateTime, Duration, TimeZone, Utc};
use lead_intel_api::config::AnalyticsConfig;
use lead_intel_api::errors::AppError;
use lead_intel_api::ml_engine;
use lead_intel_api::models::{ChurnLabel, Lead, LeadSnapshot, LeadStatus, ReportStatus};
use uuid::Uuid;

fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
}

fn lead(
    id: u128,
    status: LeadStatus,
    deal_value: f64,
    engagement: Option<f64>,
    days_since_activity: Option<i64>,
) -> Lead {
    Lead {
        id: Uuid::from_u128(id),
        company: format!("Company {}", id),
        industry: Some("Software".to_string()),
        country: "US".to_string(),
        region: None,
        status,
        deal_value,
        engagement_score: engagement,
        last_activity_at: days_since_activity.map(|d| as_of() - Duration::days(d)),
        created_at: as_of() - Duration::days(365),
        source: Some("inbound".to_string()),
    }
}

/// Three leads of clearly distinct quality.
fn three_tier_snapshot() -> LeadSnapshot {
    LeadSnapshot::new(vec![
        // Weak: never touched, no engagement on record, nothing in pipeline
        lead(3, LeadStatus::New, 0.0, Some(10.0), None),
        // Strong: fresh, engaged, won-stage, biggest deal
        lead(1, LeadStatus::Won, 100_000.0, Some(95.0), Some(0)),
        // Medium: warm mid-funnel lead
        lead(2, LeadStatus::Contacted, 50_000.0, Some(60.0), Some(30)),
    ])
}

#[test]
fn top_leads_are_ranked_descending() {
    let config = AnalyticsConfig::default();
    let report = ml_engine::run_all_models(&three_tier_snapshot(), as_of(), &config);

    assert_eq!(report.status, ReportStatus::Success);
    assert_eq!(report.top_leads.len(), 3);
    assert_eq!(report.top_leads[0].lead_id, Uuid::from_u128(1));
    assert_eq!(report.top_leads[1].lead_id, Uuid::from_u128(2));
    assert_eq!(report.top_leads[2].lead_id, Uuid::from_u128(3));
    for pair in report.top_leads.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }

    // Caller-side truncation to a requested count of 2
    let top_two: Vec<_> = report.top_leads.iter().take(2).collect();
    assert_eq!(top_two.len(), 2);
    assert_eq!(top_two[0].lead_id, Uuid::from_u128(1));
    assert_eq!(top_two[1].lead_id, Uuid::from_u128(2));
}

#[test]
fn scores_and_probabilities_are_bounded() {
    let config = AnalyticsConfig::default();
    let report = ml_engine::run_all_models(&three_tier_snapshot(), as_of(), &config);

    for result in &report.top_leads {
        assert!((0.0..=100.0).contains(&result.score));
        assert!((0.0..=1.0).contains(&result.churn_probability));
    }
}

#[test]
fn priority_distribution_sums_to_total() {
    let config = AnalyticsConfig::default();
    let report = ml_engine::run_all_models(&three_tier_snapshot(), as_of(), &config);

    let summary = report.summary.expect("successful report has a summary");
    assert_eq!(summary.priority_distribution.total(), summary.total_leads);
    assert_eq!(summary.total_leads, 3);
}

#[test]
fn at_risk_view_is_a_high_churn_subset() {
    let config = AnalyticsConfig::default();
    let report = ml_engine::run_all_models(&three_tier_snapshot(), as_of(), &config);

    let all_ids: Vec<Uuid> = report.top_leads.iter().map(|r| r.lead_id).collect();
    for at_risk in &report.at_risk_leads {
        assert_eq!(at_risk.churn_label, ChurnLabel::High);
        assert!(all_ids.contains(&at_risk.lead_id));
    }
    for pair in report.at_risk_leads.windows(2) {
        assert!(pair[0].churn_probability >= pair[1].churn_probability);
    }

    let summary = report.summary.expect("successful report has a summary");
    assert_eq!(summary.at_risk_count, report.at_risk_leads.len());
}

#[test]
fn recommendations_are_globally_ordered() {
    let config = AnalyticsConfig::default();
    let report = ml_engine::run_all_models(&three_tier_snapshot(), as_of(), &config);

    assert!(!report.recommendations.is_empty());
    for pair in report.recommendations.windows(2) {
        assert!(pair[0].priority >= pair[1].priority);
    }
    // Every referenced lead exists in the snapshot
    let all_ids: Vec<Uuid> = report.top_leads.iter().map(|r| r.lead_id).collect();
    for rec in &report.recommendations {
        assert!(all_ids.contains(&rec.lead_id));
    }
}

#[test]
fn empty_snapshot_is_a_successful_empty_report() {
    let config = AnalyticsConfig::default();
    let report = ml_engine::run_all_models(&LeadSnapshot::new(Vec::new()), as_of(), &config);

    assert_eq!(report.status, ReportStatus::Success);
    assert!(report.top_leads.is_empty());
    assert!(report.at_risk_leads.is_empty());
    assert!(report.recommendations.is_empty());

    let summary = report.summary.expect("empty report still has a summary");
    assert_eq!(summary.total_leads, 0);
    assert_eq!(summary.average_score, 0.0);
    assert_eq!(summary.priority_distribution.total(), 0);
}

#[test]
fn skipped_rows_are_observable_in_the_summary() {
    let config = AnalyticsConfig::default();
    let mut snapshot = three_tier_snapshot();
    snapshot.skipped_rows = 2;

    let report = ml_engine::run_all_models(&snapshot, as_of(), &config);
    let summary = report.summary.expect("successful report has a summary");
    assert_eq!(summary.skipped_rows, 2);
    assert_eq!(summary.total_leads, 3);
}

#[test]
fn same_snapshot_same_instant_yields_identical_reports() {
    let config = AnalyticsConfig::default();
    let snapshot = three_tier_snapshot();

    let first = ml_engine::run_all_models(&snapshot, as_of(), &config);
    let second = ml_engine::run_all_models(&snapshot, as_of(), &config);

    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn top_limit_above_maximum_is_a_usage_error() {
    let config = AnalyticsConfig::default();

    assert!(ml_engine::validate_top_limit(100, &config).is_ok());
    match ml_engine::validate_top_limit(101, &config) {
        Err(AppError::Usage(msg)) => assert!(msg.contains("100")),
        other => panic!("expected a usage error, got {:?}", other),
    }
}

#[test]
fn failed_report_carries_error_and_empty_fields() {
    let report = lead_intel_api::models::MLReport::failed("store unreachable", as_of());
    assert_eq!(report.status, ReportStatus::Failed);
    assert_eq!(report.error.as_deref(), Some("store unreachable"));
    assert!(report.summary.is_none());
    assert!(report.top_leads.is_empty());
}
