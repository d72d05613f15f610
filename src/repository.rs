use crate::errors::AppError;
use crate::models::{Lead, LeadSnapshot, LeadStatus};
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Raw lead row as stored in the lead table, before coercion into the
/// in-memory representation.
#[derive(Debug, Clone, FromRow)]
pub struct LeadRow {
    pub id: Uuid,
    pub company: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub status: Option<String>,
    pub deal_value: Option<BigDecimal>,
    pub engagement_score: Option<f64>,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub source: Option<String>,
}

impl TryFrom<LeadRow> for Lead {
    type Error = AppError;

    /// Coerces a raw row into a `Lead`, rejecting rows that violate the
    /// snapshot invariants (unknown status, negative or unrepresentable
    /// deal value).
    fn try_from(row: LeadRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .as_deref()
            .and_then(LeadStatus::parse)
            .ok_or_else(|| {
                AppError::DataIntegrity(format!(
                    "lead {} has unknown status {:?}",
                    row.id, row.status
                ))
            })?;

        let deal_value = match row.deal_value {
            Some(value) => value.to_f64().ok_or_else(|| {
                AppError::DataIntegrity(format!(
                    "lead {} has unrepresentable deal_value {}",
                    row.id, value
                ))
            })?,
            None => 0.0,
        };
        if deal_value < 0.0 {
            return Err(AppError::DataIntegrity(format!(
                "lead {} has negative deal_value {}",
                row.id, deal_value
            )));
        }

        Ok(Lead {
            id: row.id,
            company: row.company.unwrap_or_default(),
            industry: row.industry,
            country: row
                .country
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            region: row.region,
            status,
            deal_value,
            engagement_score: row.engagement_score,
            last_activity_at: row.last_activity_at,
            created_at: row.created_at,
            source: row.source,
        })
    }
}

/// Read-only access to the lead store. Fetches are plain reads; the
/// repository never mutates the store.
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reads every active lead into an immutable snapshot.
    ///
    /// A store that cannot be reached fails the whole fetch with
    /// `RepositoryUnavailable`. Individual rows that cannot be coerced are
    /// skipped and counted in the snapshot, never fatal to the batch.
    pub async fn fetch_active_leads(&self) -> Result<LeadSnapshot, AppError> {
        let rows = sqlx::query_as::<_, LeadRow>(
            r#"
            SELECT id, company, industry, country, region, status,
                   deal_value, engagement_score, last_activity_at,
                   created_at, source
            FROM leads
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let total = rows.len();
        let mut leads = Vec::with_capacity(total);
        let mut skipped_rows = 0;
        for row in rows {
            match Lead::try_from(row) {
                Ok(lead) => leads.push(lead),
                Err(e) => {
                    skipped_rows += 1;
                    tracing::warn!("Skipping malformed lead row: {}", e);
                }
            }
        }

        tracing::info!(
            "Fetched lead snapshot: {} leads, {} rows skipped",
            leads.len(),
            skipped_rows
        );

        Ok(LeadSnapshot {
            leads,
            skipped_rows,
        })
    }
}
