//! Warrant evaluators
//!
//! One module per MUTCD 2009 warrant. Each evaluator is a pure function of
//! an `EvaluationContext` (classified intersection, threshold tables, raw
//! inputs) returning a `WarrantResult`. Evaluators never read another
//! warrant's result, so they run in any order or concurrently.
//!
//! A missing warrant-specific input is reported as
//! `WarrantError::InsufficientData`; the engine converts it into a
//! "not evaluated" result.

pub mod w1_eight_hour;
pub mod w2_four_hour;
pub mod w3_peak_hour;
pub mod w4_pedestrian;
pub mod w5_school;
pub mod w6_coordinated;
pub mod w7_crash;
pub mod w8_network;
pub mod w9_grade_crossing;

pub use w1_eight_hour::evaluate_w1;
pub use w2_four_hour::evaluate_w2;
pub use w3_peak_hour::evaluate_w3;
pub use w4_pedestrian::evaluate_w4;
pub use w5_school::evaluate_w5;
pub use w6_coordinated::evaluate_w6;
pub use w7_crash::evaluate_w7;
pub use w8_network::evaluate_w8;
pub use w9_grade_crossing::evaluate_w9;

use crate::classify::{ClassifiedIntersection, ReductionRegime};
use crate::error::EngineResult;
use crate::model::WarrantInputs;
use crate::tables::{ThresholdRef, ThresholdTables};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The nine MUTCD 2009 signal warrants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarrantId {
    EightHourVolume,
    FourHourVolume,
    PeakHour,
    PedestrianVolume,
    SchoolCrossing,
    CoordinatedSignalSystem,
    CrashExperience,
    RoadwayNetwork,
    GradeCrossing,
}

impl WarrantId {
    /// All warrants in MUTCD order
    pub const ALL: [WarrantId; 9] = [
        WarrantId::EightHourVolume,
        WarrantId::FourHourVolume,
        WarrantId::PeakHour,
        WarrantId::PedestrianVolume,
        WarrantId::SchoolCrossing,
        WarrantId::CoordinatedSignalSystem,
        WarrantId::CrashExperience,
        WarrantId::RoadwayNetwork,
        WarrantId::GradeCrossing,
    ];

    pub fn number(&self) -> u8 {
        match self {
            WarrantId::EightHourVolume => 1,
            WarrantId::FourHourVolume => 2,
            WarrantId::PeakHour => 3,
            WarrantId::PedestrianVolume => 4,
            WarrantId::SchoolCrossing => 5,
            WarrantId::CoordinatedSignalSystem => 6,
            WarrantId::CrashExperience => 7,
            WarrantId::RoadwayNetwork => 8,
            WarrantId::GradeCrossing => 9,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WarrantId::EightHourVolume => "Warrant 1, Eight-Hour Vehicular Volume",
            WarrantId::FourHourVolume => "Warrant 2, Four-Hour Vehicular Volume",
            WarrantId::PeakHour => "Warrant 3, Peak Hour",
            WarrantId::PedestrianVolume => "Warrant 4, Pedestrian Volume",
            WarrantId::SchoolCrossing => "Warrant 5, School Crossing",
            WarrantId::CoordinatedSignalSystem => "Warrant 6, Coordinated Signal System",
            WarrantId::CrashExperience => "Warrant 7, Crash Experience",
            WarrantId::RoadwayNetwork => "Warrant 8, Roadway Network",
            WarrantId::GradeCrossing => "Warrant 9, Intersection Near a Grade Crossing",
        }
    }
}

impl fmt::Display for WarrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sub-conditions a warrant can be satisfied by
///
/// Conditions are not interchangeable for review, so every pass names the
/// ones that carried it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// W1 Condition A: minimum vehicular volume
    EightHourA,
    /// W1 Condition B: interruption of continuous traffic
    EightHourB,
    /// W1 combination of Conditions A and B at the reduced column
    EightHourCombination,
    /// W2 four-hour curve
    FourHourVolume,
    /// W3 Condition A: minor-street stopped-time delay
    PeakHourDelay,
    /// W3 Condition B: peak-hour volume curve
    PeakHourVolume,
    /// W4 Criterion A: four hours above the pedestrian curve
    PedestrianFourHour,
    /// W4 Criterion B: one hour above the peak-hour pedestrian curve
    PedestrianPeakHour,
    /// W5 schoolchildren with too few adequate gaps
    SchoolGaps,
    /// W6 adjacent signal spacing in a coordinated system
    CoordinatedSpacing,
    /// W7 leg A: adequate trial of alternatives
    CrashAlternativesTried,
    /// W7 leg B: correctable crash frequency
    CrashFrequency,
    /// W7 leg C: reduced eight-hour volumes
    CrashVolume,
    /// W8 Condition A: weekday peak hour entering volume
    NetworkWeekdayPeak,
    /// W8 Condition B: weekend entering volume
    NetworkWeekend,
    /// W9 adjusted minor volume over the peak-hour curve
    GradeCrossingAdjustedVolume,
}

/// Three-valued warrant outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Met,
    NotMet,
    /// A required input was missing; never counts as a fail
    NotEvaluated { field: String },
}

/// Comparison for one analysed hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourCheck {
    pub hour: u8,
    /// Major-street figure compared (vph)
    pub major: f64,
    /// Minor-street figure compared (vph or pedestrians per hour)
    pub minor: f64,
    /// Conditions this hour satisfies
    pub satisfies: Vec<Condition>,
}

impl HourCheck {
    pub fn new(hour: u8, major: f64, minor: f64) -> Self {
        Self {
            hour,
            major,
            minor,
            satisfies: Vec::new(),
        }
    }

    pub fn satisfies(&self, condition: Condition) -> bool {
        self.satisfies.contains(&condition)
    }
}

/// Output of one evaluator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarrantResult {
    pub warrant: WarrantId,
    pub number: u8,
    pub name: String,
    pub outcome: Outcome,
    /// Sub-conditions that carried a pass (empty unless met)
    pub satisfied_by: Vec<Condition>,
    /// Regime actually in effect for this warrant
    pub regime: ReductionRegime,
    pub thresholds: Vec<ThresholdRef>,
    /// Figures compared against thresholds, by name
    pub measures: BTreeMap<String, f64>,
    pub hourly: Vec<HourCheck>,
    /// Short data column for tabulation
    pub data: String,
    /// Short threshold column for tabulation
    pub threshold: String,
    /// Human-readable explanation
    pub details: String,
}

impl WarrantResult {
    pub fn new(warrant: WarrantId, regime: ReductionRegime) -> Self {
        Self {
            warrant,
            number: warrant.number(),
            name: warrant.name().to_string(),
            outcome: Outcome::NotMet,
            satisfied_by: Vec::new(),
            regime,
            thresholds: Vec::new(),
            measures: BTreeMap::new(),
            hourly: Vec::new(),
            data: String::new(),
            threshold: String::new(),
            details: String::new(),
        }
    }

    pub fn not_evaluated(
        warrant: WarrantId,
        regime: ReductionRegime,
        field: &str,
        details: String,
    ) -> Self {
        let mut result = Self::new(warrant, regime);
        result.outcome = Outcome::NotEvaluated {
            field: field.to_string(),
        };
        result.data = "—".to_string();
        result.details = details;
        result
    }

    pub fn is_met(&self) -> bool {
        self.outcome == Outcome::Met
    }

    pub fn is_evaluated(&self) -> bool {
        !matches!(self.outcome, Outcome::NotEvaluated { .. })
    }

    pub fn measure(&mut self, name: &str, value: f64) {
        self.measures.insert(name.to_string(), value);
    }

    /// Met when any condition is supplied, NotMet otherwise
    pub fn conclude(&mut self, satisfied_by: Vec<Condition>) {
        self.outcome = if satisfied_by.is_empty() { Outcome::NotMet } else { Outcome::Met };
        self.satisfied_by = satisfied_by;
    }
}

/// Everything an evaluator may read
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub tables: &'a ThresholdTables,
    pub intersection: &'a ClassifiedIntersection,
    pub inputs: &'a WarrantInputs,
}

/// Run one warrant's evaluator
pub fn evaluate_warrant(
    warrant: WarrantId,
    ctx: &EvaluationContext,
) -> EngineResult<WarrantResult> {
    match warrant {
        WarrantId::EightHourVolume => evaluate_w1(ctx),
        WarrantId::FourHourVolume => evaluate_w2(ctx),
        WarrantId::PeakHour => evaluate_w3(ctx),
        WarrantId::PedestrianVolume => evaluate_w4(ctx),
        WarrantId::SchoolCrossing => evaluate_w5(ctx),
        WarrantId::CoordinatedSignalSystem => evaluate_w6(ctx),
        WarrantId::CrashExperience => evaluate_w7(ctx),
        WarrantId::RoadwayNetwork => evaluate_w8(ctx),
        WarrantId::GradeCrossing => evaluate_w9(ctx),
    }
}

/// Regime a warrant compares against
pub fn regime_for(warrant: WarrantId, intersection: &ClassifiedIntersection) -> ReductionRegime {
    match warrant {
        WarrantId::PedestrianVolume => intersection.pedestrian_regime,
        _ => intersection.regime,
    }
}

/// Which street the volume warrants read as major, for result details
///
/// The assignment is made once from daily totals, so a volume warrant is
/// monotone only while that assignment holds. Hours where the minor street
/// out-carried the major street are listed so a reader can see when the
/// other street is close to taking over.
pub fn street_axes_note(intersection: &ClassifiedIntersection) -> String {
    let assignment = &intersection.assignment;
    let mut note = format!(
        "major street {} ({} veh/day), minor street {} ({} veh/day)",
        assignment.major.name,
        assignment.major.total_volume,
        assignment.minor.name,
        assignment.minor.total_volume
    );
    if assignment.tie_broken_by.is_some() {
        note.push_str(", volume tie broken by functional class");
    }

    let reversed: Vec<String> = intersection
        .hours
        .iter()
        .filter(|h| h.entering.saturating_sub(h.major) > h.major)
        .map(|h| format!("{:02}:00", h.hour))
        .collect();
    if !reversed.is_empty() {
        note.push_str(&format!(
            "; {} carried more than {} at {}",
            assignment.minor.name,
            assignment.major.name,
            reversed.join(", ")
        ));
    }
    note
}
