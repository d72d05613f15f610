use std::env;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use lead_intel_api::db::Database;
use lead_intel_api::repository::LeadRepository;

/// Integration smoke test for the snapshot read path against a real store.
/// Marked ignored to avoid running against production by accident; set
/// TEST_DATABASE_URL to run.
#[tokio::test]
#[ignore]
async fn fetch_active_leads_smoke_test() -> anyhow::Result<()> {
    let db_url = env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .map_err(|_| anyhow::anyhow!("Set TEST_DATABASE_URL or DATABASE_URL to run this test"))?;

    let db = Database::new(&db_url).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS leads (
            id UUID PRIMARY KEY,
            company TEXT,
            industry TEXT,
            country TEXT,
            region TEXT,
            status TEXT,
            deal_value NUMERIC,
            engagement_score DOUBLE PRECISION,
            last_activity_at TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            source TEXT
        )
        "#,
    )
    .execute(&db.pool)
    .await?;

    // One well-formed row and one with a negative deal value
    let good_id = Uuid::new_v4();
    let bad_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO leads (id, company, country, status, deal_value, engagement_score)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(good_id)
    .bind("Smoke Test Co")
    .bind("US")
    .bind("qualified")
    .bind(BigDecimal::from_str("50000")?)
    .bind(72.5_f64)
    .execute(&db.pool)
    .await?;
    sqlx::query(
        "INSERT INTO leads (id, company, country, status, deal_value)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(bad_id)
    .bind("Bad Row Co")
    .bind("US")
    .bind("new")
    .bind(BigDecimal::from_str("-1")?)
    .execute(&db.pool)
    .await?;

    let repository = LeadRepository::new(db.pool.clone());
    let snapshot = repository.fetch_active_leads().await?;

    // The good row is coerced; the malformed one is skipped and counted
    assert!(snapshot.leads.iter().any(|l| l.id == good_id));
    assert!(snapshot.leads.iter().all(|l| l.id != bad_id));
    assert!(snapshot.skipped_rows >= 1);

    sqlx::query("DELETE FROM leads WHERE id = $1 OR id = $2")
        .bind(good_id)
        .bind(bad_id)
        .execute(&db.pool)
        .await?;

    Ok(())
}
