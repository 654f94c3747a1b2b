//! Warrant Engine - main coordinator for one intersection analysis
//!
//! Validates inputs, classifies the intersection once, runs the nine
//! evaluators against the shared read-only tables and folds the results
//! into an `AnalysisReport`. Includes both sequential and parallel (Rayon)
//! implementations; they produce identical reports.
//!
//! Error policy:
//! - `InvalidInput`, `Configuration`, `AmbiguousClassification`: abort
//! - `InsufficientData`: that warrant becomes "not evaluated"

use crate::classify::{classify, ClassifiedIntersection};
use crate::config::EngineConfig;
use crate::error::{EngineResult, WarrantError};
use crate::model::WarrantInputs;
use crate::report::{aggregate, AnalysisReport};
use crate::tables::ThresholdTables;
use crate::warrants::{evaluate_warrant, regime_for, EvaluationContext, WarrantId, WarrantResult};
use anyhow::Result;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Evaluates the nine MUTCD warrants for one intersection at a time
pub struct WarrantEngine {
    config: EngineConfig,
    tables: Arc<ThresholdTables>,
}

impl WarrantEngine {
    /// Initialize with embedded tables, or the configured tables file
    pub fn new(config: EngineConfig) -> Result<Self> {
        let tables = match &config.tables_path {
            Some(path) => {
                info!(path = ?path, edition = %config.edition, "Loading threshold tables");
                Arc::new(ThresholdTables::load(path, config.edition)?)
            }
            None => ThresholdTables::for_edition(config.edition)?,
        };

        Ok(Self { config, tables })
    }

    /// Initialize with an already loaded table set
    pub fn with_tables(config: EngineConfig, tables: Arc<ThresholdTables>) -> EngineResult<Self> {
        if tables.edition != config.edition {
            return Err(WarrantError::configuration(format!(
                "tables are {}, engine is configured for {}",
                tables.edition, config.edition
            )));
        }
        Ok(Self { config, tables })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tables(&self) -> &ThresholdTables {
        &self.tables
    }

    /// Evaluate using the configured execution mode
    pub fn run(&self, inputs: &WarrantInputs) -> EngineResult<AnalysisReport> {
        if self.config.parallel {
            self.evaluate_parallel(inputs)
        } else {
            self.evaluate(inputs)
        }
    }

    /// Evaluate all nine warrants sequentially
    pub fn evaluate(&self, inputs: &WarrantInputs) -> EngineResult<AnalysisReport> {
        let intersection = self.prepare(inputs)?;
        let ctx = self.context(&intersection, inputs);

        let results = WarrantId::ALL
            .iter()
            .map(|warrant| Self::evaluate_one(*warrant, &ctx))
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(self.finish(intersection, results, inputs))
    }

    /// Evaluate all nine warrants in parallel with Rayon
    ///
    /// Evaluators are independent pure functions over shared read-only data;
    /// the indexed collect keeps warrant order.
    pub fn evaluate_parallel(&self, inputs: &WarrantInputs) -> EngineResult<AnalysisReport> {
        let intersection = self.prepare(inputs)?;
        let ctx = self.context(&intersection, inputs);

        let results = WarrantId::ALL
            .par_iter()
            .map(|warrant| Self::evaluate_one(*warrant, &ctx))
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(self.finish(intersection, results, inputs))
    }

    fn prepare(&self, inputs: &WarrantInputs) -> EngineResult<ClassifiedIntersection> {
        info!(
            approaches = inputs.approaches.len(),
            edition = %self.config.edition,
            "Starting warrant evaluation"
        );
        inputs.validate()?;
        classify(inputs, self.config.tie_break)
    }

    fn context<'a>(
        &'a self,
        intersection: &'a ClassifiedIntersection,
        inputs: &'a WarrantInputs,
    ) -> EvaluationContext<'a> {
        EvaluationContext {
            tables: &self.tables,
            intersection,
            inputs,
        }
    }

    fn evaluate_one(warrant: WarrantId, ctx: &EvaluationContext) -> EngineResult<WarrantResult> {
        match evaluate_warrant(warrant, ctx) {
            Ok(result) => {
                debug!(warrant = warrant.number(), outcome = ?result.outcome, "Warrant evaluated");
                Ok(result)
            }
            Err(WarrantError::InsufficientData { field, .. }) => {
                warn!(warrant = warrant.number(), field = %field, "Warrant not evaluated");
                let details = format!("NOT EVALUATED: missing {}", field);
                Ok(WarrantResult::not_evaluated(
                    warrant,
                    regime_for(warrant, ctx.intersection),
                    &field,
                    details,
                ))
            }
            Err(err) => Err(err),
        }
    }

    fn finish(
        &self,
        intersection: ClassifiedIntersection,
        results: Vec<WarrantResult>,
        inputs: &WarrantInputs,
    ) -> AnalysisReport {
        let report = aggregate(self.config.edition, intersection, results, inputs.clone());
        info!(
            warranted = report.warranted,
            met = report.summary.met_count,
            not_evaluated = report.summary.not_evaluated.len(),
            "Warrant evaluation complete"
        );
        report
    }
}
