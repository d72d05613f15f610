use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============ Lead Snapshot Models ============

/// Pipeline status of a lead in the sales funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Won,
    Lost,
}

impl LeadStatus {
    /// Parses the status column as stored in the lead table.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "new" => Some(LeadStatus::New),
            "contacted" => Some(LeadStatus::Contacted),
            "qualified" => Some(LeadStatus::Qualified),
            "won" => Some(LeadStatus::Won),
            "lost" => Some(LeadStatus::Lost),
            _ => None,
        }
    }
}

/// A prospective customer record, read once per invocation from the lead
/// store and never written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    /// Unique identifier within a snapshot.
    pub id: Uuid,
    /// Company the lead belongs to.
    pub company: String,
    /// Industry sector.
    pub industry: Option<String>,
    /// Country of the lead. Rows with no country land in "Unknown".
    pub country: String,
    /// Sub-national region, when the source provides one.
    pub region: Option<String>,
    /// Position in the sales funnel.
    pub status: LeadStatus,
    /// Expected deal value. Never negative.
    pub deal_value: f64,
    /// Source-provided engagement score on a 0-100 scale.
    pub engagement_score: Option<f64>,
    /// Timestamp of the most recent recorded activity.
    pub last_activity_at: Option<DateTime<Utc>>,
    /// Timestamp the lead entered the funnel.
    pub created_at: DateTime<Utc>,
    /// Acquisition channel (free text).
    pub source: Option<String>,
}

/// Immutable point-in-time view of the lead store used as input to one
/// pipeline invocation. Rows that failed coercion are counted, not kept.
#[derive(Debug, Clone)]
pub struct LeadSnapshot {
    pub leads: Vec<Lead>,
    pub skipped_rows: usize,
}

impl LeadSnapshot {
    pub fn new(leads: Vec<Lead>) -> Self {
        Self {
            leads,
            skipped_rows: 0,
        }
    }
}

// ============ Derived Feature Models ============

/// Numeric feature vector derived from one lead.
///
/// All fields except `recency_days` are normalized to [0,1]; `recency_days`
/// is capped at the configured staleness window.
#[derive(Debug, Clone, Copy)]
pub struct LeadFeatures {
    /// Days since the last recorded activity, capped at the staleness window.
    /// Leads with no recorded activity sit exactly at the cap.
    pub recency_days: f64,
    /// 1 at the moment of the last activity, 0 at the staleness cap.
    pub freshness: f64,
    /// How far through its lifetime the lead was last touched.
    pub activity_frequency: f64,
    /// Deal value relative to the largest deal in the batch.
    pub deal_value_norm: f64,
    /// Engagement on a 0-1 scale; missing values take the batch median.
    pub engagement_norm: f64,
    /// Funnel-position weight.
    pub status_weight: f64,
}

impl LeadFeatures {
    /// A vector is usable only when every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.recency_days.is_finite()
            && self.freshness.is_finite()
            && self.activity_frequency.is_finite()
            && self.deal_value_norm.is_finite()
            && self.engagement_norm.is_finite()
            && self.status_weight.is_finite()
    }
}

// ============ ML Pipeline Models ============

/// Coarse triage bucket derived from the lead score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    Hot,
    Warm,
    Cold,
}

/// Churn-risk bucket derived from the churn probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChurnLabel {
    Low,
    Medium,
    High,
}

/// Mutually exclusive behavioral category assigned to a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Champion,
    Nurture,
    AtRisk,
    Dormant,
}

/// Combined output of the scoring, churn and segmentation models for one
/// lead. A pure function of the lead and its feature vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadScoreResult {
    pub lead_id: Uuid,
    pub company: String,
    pub country: String,
    /// Lead score in [0,100].
    pub score: f64,
    pub priority_tier: PriorityTier,
    /// Churn probability in [0,1].
    pub churn_probability: f64,
    pub churn_label: ChurnLabel,
    pub segment: Segment,
    /// Carried through for ranking tie-breaks.
    pub last_activity_at: Option<DateTime<Utc>>,
}

/// One suggested action for the sales team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub lead_id: Uuid,
    pub company: String,
    /// Action from the fixed rule catalogue.
    pub action: String,
    /// Higher fires earlier in the team's queue.
    pub priority: u8,
    pub rationale: String,
}

/// Lead counts per priority tier. The three counts sum to the total number
/// of scored leads.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PriorityDistribution {
    pub hot: usize,
    pub warm: usize,
    pub cold: usize,
}

impl PriorityDistribution {
    pub fn total(&self) -> usize {
        self.hot + self.warm + self.cold
    }
}

/// High-level metrics over one ML pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MLSummary {
    pub total_leads: usize,
    /// Mean lead score; defined as 0 for an empty snapshot.
    pub average_score: f64,
    pub priority_distribution: PriorityDistribution,
    /// Leads labeled high churn risk.
    pub at_risk_count: usize,
    /// Rows skipped during snapshot coercion plus leads excluded for
    /// unusable feature vectors. Observable here for testability.
    pub skipped_rows: usize,
}

/// Outcome marker carried by both report types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Success,
    Failed,
}

/// Full output of the lead-intelligence pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MLReport {
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<MLSummary>,
    /// Every scored lead in ranking order; callers truncate to taste.
    pub top_leads: Vec<LeadScoreResult>,
    /// High-churn leads, most urgent first.
    pub at_risk_leads: Vec<LeadScoreResult>,
    pub recommendations: Vec<Recommendation>,
    pub timestamp: DateTime<Utc>,
}

impl MLReport {
    pub fn failed(error: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            status: ReportStatus::Failed,
            error: Some(error.into()),
            summary: None,
            top_leads: Vec::new(),
            at_risk_leads: Vec::new(),
            recommendations: Vec::new(),
            timestamp,
        }
    }
}

// ============ Geographical Pipeline Models ============

/// Per-country rollup of the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryMetrics {
    pub country: String,
    pub lead_count: usize,
    /// Mean lead score within the country.
    pub average_score: f64,
    /// Sum of deal values within the country.
    pub total_value: f64,
    /// Fraction of the country's leads marked won, in [0,1].
    pub conversion_rate: f64,
    /// This country's fraction of all leads, in [0,1].
    pub share_of_total: f64,
    /// Set for markets below the configured minimum lead count. Metrics are
    /// still computed; small markets are flagged, never dropped.
    pub low_confidence: bool,
}

/// Qualitative market-concentration bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcentrationLabel {
    Fragmented,
    Moderate,
    Concentrated,
}

/// Herfindahl-style concentration of leads across markets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConcentrationResult {
    /// Sum of squared country shares, in [1/n, 1] for n markets.
    pub index: f64,
    pub label: ConcentrationLabel,
}

/// Strategic stance suggested for one market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketAction {
    Expand,
    Monitor,
    Deprioritize,
}

/// Per-country strategic recommendation with the metric deltas that drove it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketRecommendation {
    pub country: String,
    pub recommendation: MarketAction,
    pub rationale: String,
}

/// Snapshot-level rollup for the geographical report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoSummary {
    pub total_leads: usize,
    pub total_countries: usize,
    /// Sum of deal values across the snapshot.
    pub total_market_value: f64,
    pub global_average_score: f64,
    pub global_conversion_rate: f64,
    /// Absent when the snapshot has no countries to measure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentration: Option<ConcentrationResult>,
    pub skipped_rows: usize,
}

/// Full output of the geographical analysis pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoReport {
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Country metrics, largest market first.
    pub country_analysis: Vec<CountryMetrics>,
    pub recommendations: Vec<MarketRecommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<GeoSummary>,
    pub timestamp: DateTime<Utc>,
}

impl GeoReport {
    pub fn failed(error: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            status: ReportStatus::Failed,
            error: Some(error.into()),
            country_analysis: Vec::new(),
            recommendations: Vec::new(),
            summary: None,
            timestamp,
        }
    }
}
