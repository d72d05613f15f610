//! Lead Intelligence API Library
//!
//! This library provides the core functionality for the Lead Intelligence API:
//! a lead-intelligence pipeline (scoring, churn risk, segmentation, smart
//! recommendations) and a geographical analysis pipeline (country metrics,
//! market concentration, market recommendations), both computed over a
//! point-in-time snapshot of the lead store.
//!
//! # Modules
//!
//! - `churn`: Churn-risk model.
//! - `concentration`: Market concentration (Herfindahl) calculator.
//! - `config`: Configuration management.
//! - `db`: Database connection and pool management.
//! - `errors`: Error handling types.
//! - `features`: Per-lead feature normalization.
//! - `geo_engine`: Geographical analysis pipeline.
//! - `handlers`: HTTP request handlers.
//! - `ml_engine`: Lead-intelligence pipeline.
//! - `models`: Core data models.
//! - `recommendations`: Smart recommendation rules.
//! - `repository`: Read-only lead snapshot access.
//! - `scoring`: Lead scoring model.
//! - `segmentation`: Lead segmentation model.

pub mod churn;
pub mod concentration;
pub mod config;
pub mod db;
pub mod errors;
pub mod features;
pub mod geo_engine;
pub mod handlers;
pub mod ml_engine;
pub mod models;
pub mod recommendations;
pub mod repository;
pub mod scoring;
pub mod segmentation;
