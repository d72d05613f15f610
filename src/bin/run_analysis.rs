//! Batch runner: executes both analytics pipelines once against the
//! configured lead store and prints the reports as JSON. Useful for
//! smoke-testing a deployment without going through the HTTP layer.

use anyhow::Result;
use lead_intel_api::config::Config;
use lead_intel_api::db::Database;
use lead_intel_api::repository::LeadRepository;
use lead_intel_api::{geo_engine, ml_engine};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Lead Intelligence Batch Analysis ===\n");

    let config = Config::from_env()?;

    println!("Connecting to database...");
    let db = Database::new(&config.database_url).await?;
    println!("✓ Database connected\n");

    let repository = LeadRepository::new(db.pool.clone());

    println!("Running ML analysis...");
    let ml_report = ml_engine::run_lead_intelligence(&repository, &config.analytics).await;
    println!("{}\n", serde_json::to_string_pretty(&ml_report)?);

    println!("Running geographical analysis...");
    let geo_report = geo_engine::run_geographical_analysis(&repository, &config.analytics).await;
    println!("{}", serde_json::to_string_pretty(&geo_report)?);

    Ok(())
}
