//! Aggregator
//!
//! Folds the nine warrant results into one immutable `AnalysisReport`.
//! Overall status is an OR over warrants: meeting any one warrant is
//! sufficient justification.

pub mod formatters;
pub mod types;

pub use formatters::{JsonFormatter, MarkdownFormatter};
pub use types::{AnalysisReport, RegimeSelection, ReportSummary, SummaryRow};

use crate::classify::ClassifiedIntersection;
use crate::model::WarrantInputs;
use crate::tables::Edition;
use crate::warrants::{Outcome, WarrantResult};

pub const PE_DISCLAIMER: &str = "This analysis is for planning purposes only. \
    Final signal installation decisions should be made by a licensed Professional Engineer.";

/// Build the report from classified data and the nine results
pub fn aggregate(
    edition: Edition,
    intersection: ClassifiedIntersection,
    results: Vec<WarrantResult>,
    inputs: WarrantInputs,
) -> AnalysisReport {
    let warranted = results.iter().any(WarrantResult::is_met);
    let summary = summarize(&results);

    AnalysisReport {
        edition,
        lanes: intersection.lanes,
        regimes: RegimeSelection {
            default: intersection.regime,
            pedestrian: intersection.pedestrian_regime,
        },
        assignment: intersection.assignment,
        hours: intersection.hours,
        results,
        warranted,
        summary,
        inputs,
    }
}

/// Summary table and headline
pub fn summarize(results: &[WarrantResult]) -> ReportSummary {
    let met: Vec<u8> = results.iter().filter(|r| r.is_met()).map(|r| r.number).collect();
    let not_evaluated: Vec<u8> = results
        .iter()
        .filter(|r| !r.is_evaluated())
        .map(|r| r.number)
        .collect();

    let headline = if met.is_empty() {
        "No warrants currently satisfied. Additional data or conditions may be needed".to_string()
    } else {
        format!("{} warrant(s) satisfied. Signal installation may be justified", met.len())
    };

    let rows = results
        .iter()
        .map(|r| SummaryRow {
            warrant: r.number,
            name: r.name.clone(),
            status: match r.outcome {
                Outcome::Met => "MET",
                Outcome::NotMet => "NOT MET",
                Outcome::NotEvaluated { .. } => "NOT EVALUATED",
            }
            .to_string(),
            data: r.data.clone(),
            threshold: r.threshold.clone(),
            notes: r.details.clone(),
        })
        .collect();

    ReportSummary {
        met_count: met.len(),
        met,
        not_evaluated,
        headline,
        rows,
        disclaimer: PE_DISCLAIMER.to_string(),
    }
}
