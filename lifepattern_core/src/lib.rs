#![forbid(unsafe_code)]

//! Core domain model and analysis engine for the LifePattern system.
//!
//! This crate provides:
//! - Domain types (daily metrics, assessments, trend points)
//! - Burnout scoring engine
//! - Trend window resolution
//! - Persistence (log book, assessment journal)
//! - Analysis service and CSV export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod engine;
pub mod trends;
pub mod validation;
pub mod store;
pub mod logbook;
pub mod journal;
pub mod service;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use engine::{compute_assessment, compute_assessment_at};
pub use trends::{build_series, resolve_window};
pub use store::{AssessmentSink, FileStore, MetricsSource};
pub use logbook::LogBook;
pub use journal::AssessmentJournal;
pub use service::TrendReport;
