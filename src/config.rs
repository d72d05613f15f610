use serde::Deserialize;

/// Process configuration loaded from the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Analytics thresholds and weights, passed into every pipeline run.
    pub analytics: AnalyticsConfig,
}

/// Fixed weights applied to the normalized feature vector by the scoring
/// model. The weights sum to 1 so a full-strength lead scores exactly 100.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreWeights {
    pub freshness: f64,
    pub engagement: f64,
    pub deal_value: f64,
    pub activity: f64,
    pub status: f64,
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.freshness + self.engagement + self.deal_value + self.activity + self.status
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            freshness: 0.25,
            engagement: 0.25,
            deal_value: 0.20,
            activity: 0.15,
            status: 0.15,
        }
    }
}

/// Thresholds and windows for both analytics pipelines.
///
/// An explicit value carried in application state and handed to every
/// invocation, never a process-wide mutable singleton.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    /// Recency values are capped at this many days; a lead with no recorded
    /// activity is treated as exactly this stale.
    pub staleness_cap_days: f64,
    /// Cold leads untouched for at least this many days are dormant.
    pub dormancy_days: f64,
    pub score_weights: ScoreWeights,
    /// Scores at or above this are "hot".
    pub hot_threshold: f64,
    /// Scores at or above this (below hot) are "warm"; the rest are "cold".
    pub warm_threshold: f64,
    /// Churn probabilities at or above this are labeled "high".
    pub churn_high_threshold: f64,
    /// Churn probabilities at or above this (below high) are "medium".
    pub churn_medium_threshold: f64,
    /// Largest accepted top-leads limit.
    pub max_top_leads: usize,
    /// Country groups with fewer leads than this are flagged low-confidence.
    pub min_market_leads: usize,
    /// Points above/below the global average score that make a market
    /// expand-worthy or deprioritized.
    pub score_margin: f64,
    /// Conversion-rate delta (absolute) paired with `score_margin`.
    pub conversion_margin: f64,
    /// Tolerance for the share-sum invariant check.
    pub share_tolerance: f64,
    /// Concentration index below this is a fragmented market.
    pub fragmented_below: f64,
    /// Concentration index above this is a concentrated market.
    pub concentrated_above: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            staleness_cap_days: 180.0,
            dormancy_days: 90.0,
            score_weights: ScoreWeights::default(),
            hot_threshold: 75.0,
            warm_threshold: 40.0,
            churn_high_threshold: 0.7,
            churn_medium_threshold: 0.3,
            max_top_leads: 100,
            min_market_leads: 2,
            score_margin: 5.0,
            conversion_margin: 0.05,
            share_tolerance: 1e-6,
            fragmented_below: 0.15,
            concentrated_above: 0.25,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: std::env::var("DB_URL")
                .or_else(|_| std::env::var("DATABASE_URL"))
                .map_err(|_| {
                    anyhow::anyhow!("DB_URL or DATABASE_URL environment variable required")
                })
                .and_then(|url| {
                    if url.trim().is_empty() {
                        anyhow::bail!("DB_URL cannot be empty");
                    }
                    if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                        anyhow::bail!("DB_URL must start with postgresql:// or postgres://");
                    }
                    Ok(url)
                })?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            analytics: AnalyticsConfig::from_env()?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!(
            "Database URL: {}...",
            &config.database_url[..20.min(config.database_url.len())]
        );
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

impl AnalyticsConfig {
    /// Loads the default analytics configuration, honoring the small set of
    /// tunables that operations may override per deployment.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut analytics = Self::default();

        if let Ok(cap) = std::env::var("STALENESS_CAP_DAYS") {
            analytics.staleness_cap_days = cap
                .parse::<f64>()
                .map_err(|_| anyhow::anyhow!("STALENESS_CAP_DAYS must be a positive number"))
                .and_then(|v| {
                    if v <= 0.0 {
                        anyhow::bail!("STALENESS_CAP_DAYS must be a positive number");
                    }
                    Ok(v)
                })?;
        }

        if let Ok(min) = std::env::var("MIN_MARKET_LEADS") {
            analytics.min_market_leads = min
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("MIN_MARKET_LEADS must be a non-negative integer"))?;
        }

        Ok(analytics)
    }
}
