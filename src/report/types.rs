use crate::classify::{HourlyVolume, MajorMinorAssignment, ReductionRegime};
use crate::model::WarrantInputs;
use crate::tables::{Edition, LaneConfig};
use crate::warrants::{WarrantId, WarrantResult};
use serde::{Deserialize, Serialize};

/// Complete result of one evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub edition: Edition,
    pub assignment: MajorMinorAssignment,
    pub lanes: LaneConfig,
    pub regimes: RegimeSelection,
    /// Classified hourly volumes the warrants were evaluated on
    pub hours: Vec<HourlyVolume>,
    /// Nine results, in warrant order
    pub results: Vec<WarrantResult>,
    /// At least one warrant is met
    pub warranted: bool,
    pub summary: ReportSummary,
    /// Input echo for traceability
    pub inputs: WarrantInputs,
}

impl AnalysisReport {
    pub fn result(&self, warrant: WarrantId) -> Option<&WarrantResult> {
        self.results.iter().find(|r| r.warrant == warrant)
    }
}

/// Regimes in effect for this run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeSelection {
    /// Warrants 1-3 and 5-9
    pub default: ReductionRegime,
    /// Warrant 4 (35 mph cutoff)
    pub pedestrian: ReductionRegime,
}

/// Tabular digest of the nine results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub met_count: usize,
    pub met: Vec<u8>,
    pub not_evaluated: Vec<u8>,
    /// "N warrant(s) satisfied ..." line
    pub headline: String,
    pub rows: Vec<SummaryRow>,
    pub disclaimer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub warrant: u8,
    pub name: String,
    /// MET, NOT MET or NOT EVALUATED
    pub status: String,
    pub data: String,
    pub threshold: String,
    pub notes: String,
}
