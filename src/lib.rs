//! Traffic Signal Warrant Engine
//!
//! Evaluates the nine MUTCD 2009 traffic signal warrants for a single
//! intersection from hourly counts, roadway attributes and site studies.
//!
//! Module layout:
//! - `model`: raw inputs (counts, approaches, site studies)
//! - `data`: loading inputs from JSON and counts from CSV with Polars
//! - `tables`: versioned MUTCD threshold tables and curve interpolation
//! - `classify`: major/minor assignment, reduction regimes, hourly volumes
//! - `warrants/`: one evaluator per warrant (W1-W9)
//! - `engine`: sequential and parallel (Rayon) evaluation
//! - `report`: aggregation and formatters

pub mod classify;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod model;
pub mod report;
pub mod tables;
pub mod warrants;

// Re-export commonly used types
pub use classify::{
    assign_streets, classify, resolve_pedestrian_regime, resolve_regime, ClassifiedIntersection,
    HourlyVolume, MajorMinorAssignment, ReductionRegime, TieBreak,
};
pub use config::EngineConfig;
pub use data::{attach_counts, load_counts_csv, load_inputs};
pub use engine::WarrantEngine;
pub use error::{EngineResult, WarrantError};
pub use model::*;
pub use report::{AnalysisReport, JsonFormatter, MarkdownFormatter, ReportSummary, SummaryRow};
pub use tables::{Edition, LaneConfig, Lanes, ThresholdRef, ThresholdTables};
pub use warrants::{Condition, Outcome, WarrantId, WarrantResult};
