//! Threshold Tables
//!
//! Static MUTCD lookup data, keyed by edition. The 2009 edition is embedded
//! as JSON and parsed once per process; every evaluator reads the same
//! immutable `Arc<ThresholdTables>`.
//!
//! Lookups return the value together with a `ThresholdRef` naming the table
//! or figure, row and column it came from, so a result can always be traced
//! back to the published source.
//!
//! Curve semantics (Figures 4C-1 to 4C-8):
//! - major volume below the first tabulated point: no threshold (fails)
//! - major volume at or beyond the last point: last minor value
//! - otherwise linear interpolation between bracketing points

use crate::classify::ReductionRegime;
use crate::error::{EngineResult, WarrantError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Tolerance for "meets or exceeds" comparisons against interpolated values
pub const COMPARE_EPSILON: f64 = 1e-9;

const MUTCD_2009_JSON: &str = include_str!("mutcd_2009.json");

static MUTCD_2009: OnceLock<EngineResult<Arc<ThresholdTables>>> = OnceLock::new();

/// MUTCD edition a table set belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Edition {
    #[default]
    #[serde(rename = "mutcd_2009")]
    Mutcd2009,
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edition::Mutcd2009 => f.write_str("MUTCD 2009"),
        }
    }
}

impl std::str::FromStr for Edition {
    type Err = WarrantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mutcd_2009" | "2009" => Ok(Edition::Mutcd2009),
            other => Err(WarrantError::configuration(format!(
                "unsupported MUTCD edition '{}'",
                other
            ))),
        }
    }
}

/// Lane key used by every MUTCD volume table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lanes {
    One,
    TwoOrMore,
}

impl Lanes {
    /// Map an approach lane count to the tabulated key
    pub fn from_count(lanes: u32) -> EngineResult<Self> {
        match lanes {
            0 => Err(WarrantError::configuration(
                "approach with zero lanes has no tabulated threshold",
            )),
            1 => Ok(Lanes::One),
            _ => Ok(Lanes::TwoOrMore),
        }
    }
}

impl fmt::Display for Lanes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lanes::One => f.write_str("1 lane"),
            Lanes::TwoOrMore => f.write_str("2 or more lanes"),
        }
    }
}

/// Lanes on the major and minor street
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LaneConfig {
    pub major: Lanes,
    pub minor: Lanes,
}

impl fmt::Display for LaneConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "major {} / minor {}", self.major, self.minor)
    }
}

/// Percentage column of Table 4C-1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdColumn {
    Full,
    Eighty,
    Seventy,
    FiftySix,
}

impl ThresholdColumn {
    pub fn percent(self) -> u8 {
        match self {
            ThresholdColumn::Full => 100,
            ThresholdColumn::Eighty => 80,
            ThresholdColumn::Seventy => 70,
            ThresholdColumn::FiftySix => 56,
        }
    }

    /// Column used for a single condition under the given regime
    pub fn single(regime: ReductionRegime) -> Self {
        match regime {
            ReductionRegime::Normal => ThresholdColumn::Full,
            ReductionRegime::Reduced70 => ThresholdColumn::Seventy,
        }
    }

    /// Column used for combined conditions (and Warrant 7) under the given regime
    pub fn combined(regime: ReductionRegime) -> Self {
        match regime {
            ReductionRegime::Normal => ThresholdColumn::Eighty,
            ReductionRegime::Reduced70 => ThresholdColumn::FiftySix,
        }
    }
}

impl fmt::Display for ThresholdColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Table 4C-1 condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EightHourCondition {
    A,
    B,
}

/// Warrant 4 criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PedestrianCriterion {
    FourHour,
    PeakHour,
}

/// Minimum major/minor volumes of one Table 4C-1 cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumePair {
    pub major: u32,
    pub minor: u32,
}

impl VolumePair {
    /// Both volumes meet or exceed the pair
    pub fn is_met_by(&self, major: u64, minor: u64) -> bool {
        major >= u64::from(self.major) && minor >= u64::from(self.minor)
    }
}

/// The four percentage columns of one Table 4C-1 row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSet {
    #[serde(rename = "100")]
    pub full: VolumePair,
    #[serde(rename = "80")]
    pub eighty: VolumePair,
    #[serde(rename = "70")]
    pub seventy: VolumePair,
    #[serde(rename = "56")]
    pub fifty_six: VolumePair,
}

impl ColumnSet {
    fn get(&self, column: ThresholdColumn) -> VolumePair {
        match column {
            ThresholdColumn::Full => self.full,
            ThresholdColumn::Eighty => self.eighty,
            ThresholdColumn::Seventy => self.seventy,
            ThresholdColumn::FiftySix => self.fifty_six,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EightHourRow {
    pub major_lanes: Lanes,
    pub minor_lanes: Lanes,
    pub columns: ColumnSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EightHourTable {
    pub source: String,
    pub hours_required: usize,
    pub condition_a: Vec<EightHourRow>,
    pub condition_b: Vec<EightHourRow>,
}

/// Piecewise-linear boundary: points of (major vph, minor vph)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumeCurve {
    pub points: Vec<(f64, f64)>,
}

impl VolumeCurve {
    /// Minor-street threshold for a given major-street volume
    ///
    /// Returns None when the major volume is below the curve's range.
    pub fn threshold_at(&self, major: f64) -> Option<f64> {
        let first = self.points.first()?;
        let last = self.points.last()?;

        if major < first.0 {
            return None;
        }
        if major >= last.0 {
            return Some(last.1);
        }

        for pair in self.points.windows(2) {
            let (x1, y1) = pair[0];
            let (x2, y2) = pair[1];
            if x1 <= major && major < x2 {
                // Multiply before dividing so tabulated breakpoints stay exact
                return Some(y1 + (y2 - y1) * (major - x1) / (x2 - x1));
            }
        }

        Some(last.1)
    }

    /// Point (major, minor) lies on or above the curve
    pub fn is_met_by(&self, major: f64, minor: f64) -> bool {
        self.threshold_at(major)
            .map_or(false, |threshold| minor + COMPARE_EPSILON >= threshold)
    }

    fn validate(&self, label: &str) -> EngineResult<()> {
        if self.points.len() < 2 {
            return Err(WarrantError::configuration(format!(
                "{}: curve needs at least two points",
                label
            )));
        }
        if self.points.windows(2).any(|p| p[1].0 <= p[0].0) {
            return Err(WarrantError::configuration(format!(
                "{}: curve major volumes must be strictly increasing",
                label
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveRow {
    pub source: String,
    pub regime: ReductionRegime,
    pub major_lanes: Lanes,
    pub minor_lanes: Lanes,
    pub points: VolumeCurve,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FourHourTable {
    pub hours_required: usize,
    pub curves: Vec<CurveRow>,
}

/// Warrant 3 Condition A (stopped-time delay) limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayThresholds {
    pub source: String,
    pub delay_one_lane_vehicle_hours: f64,
    pub delay_two_lane_vehicle_hours: f64,
    pub minor_volume_one_lane: u32,
    pub minor_volume_two_lane: u32,
    pub entering_three_approaches: u32,
    pub entering_four_approaches: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeakHourTable {
    pub curves: Vec<CurveRow>,
    pub delay: DelayThresholds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PedestrianCurveRow {
    pub source: String,
    pub criterion: PedestrianCriterion,
    pub regime: ReductionRegime,
    pub points: VolumeCurve,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PedestrianTable {
    pub four_hour_hours_required: usize,
    pub min_signal_distance_ft: f64,
    pub max_adequate_gaps_per_hour: u32,
    pub curves: Vec<PedestrianCurveRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolThresholds {
    pub source: String,
    pub min_children_per_hour: i64,
    pub min_signal_distance_ft: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatedThresholds {
    pub source: String,
    pub min_spacing_ft: f64,
    pub max_spacing_ft: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrashThresholds {
    pub source: String,
    pub min_correctable_crashes: u32,
    pub hours_required: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkThresholds {
    pub source: String,
    pub min_entering_volume: u32,
    pub weekend_hours_required: usize,
}

/// One band of an adjustment-factor table: applies to values up to `up_to`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorStep {
    pub up_to: Option<f64>,
    pub factor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorTable {
    pub source: String,
    pub steps: Vec<FactorStep>,
}

impl FactorTable {
    /// Factor for the first band whose upper bound covers `value`
    pub fn factor_for(&self, value: f64) -> EngineResult<f64> {
        self.steps
            .iter()
            .find(|step| step.up_to.map_or(true, |bound| value <= bound))
            .map(|step| step.factor)
            .ok_or_else(|| {
                WarrantError::configuration(format!("{}: no band covers {}", self.source, value))
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeCrossingThresholds {
    pub source: String,
    pub max_clear_storage_ft: f64,
    pub minimum_minor_volume: f64,
    pub truck_split_distance_ft: f64,
    pub rail_factors: FactorTable,
    pub bus_factors: FactorTable,
    pub truck_factors_short: FactorTable,
    pub truck_factors_long: FactorTable,
}

/// Traceable reference to the table cell or curve a threshold came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRef {
    /// Table or figure, e.g. "Table 4C-1 Condition A"
    pub source: String,
    /// Row key, e.g. lane configuration
    pub row: String,
    /// Column key, e.g. "70%" or regime
    pub column: String,
    pub value: ThresholdValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThresholdValue {
    Pair { major: u32, minor: u32 },
    Curve { points: Vec<(f64, f64)> },
    Scalar { value: f64 },
    Range { min: f64, max: f64 },
}

impl ThresholdRef {
    pub fn scalar(source: &str, row: &str, column: &str, value: f64) -> Self {
        Self {
            source: source.to_string(),
            row: row.to_string(),
            column: column.to_string(),
            value: ThresholdValue::Scalar { value },
        }
    }
}

/// Complete table set for one edition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdTables {
    pub edition: Edition,
    pub eight_hour: EightHourTable,
    pub four_hour: FourHourTable,
    pub peak_hour: PeakHourTable,
    pub pedestrian: PedestrianTable,
    pub school: SchoolThresholds,
    pub coordinated: CoordinatedThresholds,
    pub crash: CrashThresholds,
    pub network: NetworkThresholds,
    pub grade_crossing: GradeCrossingThresholds,
}

impl ThresholdTables {
    /// Shared embedded tables for an edition (parsed on first use)
    pub fn for_edition(edition: Edition) -> EngineResult<Arc<Self>> {
        match edition {
            Edition::Mutcd2009 => MUTCD_2009
                .get_or_init(|| Self::from_json(MUTCD_2009_JSON).map(Arc::new))
                .clone(),
        }
    }

    /// Parse and validate a table set from JSON text
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let tables: ThresholdTables = serde_json::from_str(json).map_err(|e| {
            WarrantError::configuration(format!("threshold tables are malformed: {}", e))
        })?;
        tables.validate()?;
        Ok(tables)
    }

    /// Load a table set from a JSON file, refusing a different edition
    pub fn load(path: &Path, expected: Edition) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read threshold tables: {:?}", path))?;

        let tables = Self::from_json(&contents)
            .with_context(|| format!("Failed to parse threshold tables: {:?}", path))?;

        if tables.edition != expected {
            anyhow::bail!(WarrantError::configuration(format!(
                "tables at {:?} are {}, engine is configured for {}",
                path, tables.edition, expected
            )));
        }

        Ok(tables)
    }

    fn validate(&self) -> EngineResult<()> {
        for row in self.four_hour.curves.iter().chain(&self.peak_hour.curves) {
            row.points.validate(&row.source)?;
        }
        for row in &self.pedestrian.curves {
            row.points.validate(&row.source)?;
        }
        let gc = &self.grade_crossing;
        for table in [
            &gc.rail_factors,
            &gc.bus_factors,
            &gc.truck_factors_short,
            &gc.truck_factors_long,
        ] {
            if table.steps.last().map_or(true, |s| s.up_to.is_some()) {
                return Err(WarrantError::configuration(format!(
                    "{}: last band must be open-ended",
                    table.source
                )));
            }
        }
        Ok(())
    }

    // ========================================================================
    // LOOKUPS
    // ========================================================================

    /// Table 4C-1 cell for a condition, lane configuration and column
    pub fn eight_hour(
        &self,
        condition: EightHourCondition,
        lanes: LaneConfig,
        column: ThresholdColumn,
    ) -> EngineResult<(VolumePair, ThresholdRef)> {
        let rows = match condition {
            EightHourCondition::A => &self.eight_hour.condition_a,
            EightHourCondition::B => &self.eight_hour.condition_b,
        };

        let row = rows
            .iter()
            .find(|r| r.major_lanes == lanes.major && r.minor_lanes == lanes.minor)
            .ok_or_else(|| {
                WarrantError::configuration(format!(
                    "{} Condition {:?} has no row for {}",
                    self.eight_hour.source, condition, lanes
                ))
            })?;

        let pair = row.columns.get(column);
        let reference = ThresholdRef {
            source: format!("{} Condition {:?}", self.eight_hour.source, condition),
            row: lanes.to_string(),
            column: column.to_string(),
            value: ThresholdValue::Pair {
                major: pair.major,
                minor: pair.minor,
            },
        };

        Ok((pair, reference))
    }

    /// Warrant 2 curve (Figure 4C-1 or 4C-2)
    pub fn four_hour_curve(
        &self,
        regime: ReductionRegime,
        lanes: LaneConfig,
    ) -> EngineResult<(&VolumeCurve, ThresholdRef)> {
        Self::find_curve(&self.four_hour.curves, regime, lanes, "four-hour")
    }

    /// Warrant 3 curve (Figure 4C-3 or 4C-4)
    pub fn peak_hour_curve(
        &self,
        regime: ReductionRegime,
        lanes: LaneConfig,
    ) -> EngineResult<(&VolumeCurve, ThresholdRef)> {
        Self::find_curve(&self.peak_hour.curves, regime, lanes, "peak-hour")
    }

    /// Warrant 4 curve (Figures 4C-5 to 4C-8)
    pub fn pedestrian_curve(
        &self,
        criterion: PedestrianCriterion,
        regime: ReductionRegime,
    ) -> EngineResult<(&VolumeCurve, ThresholdRef)> {
        let row = self
            .pedestrian
            .curves
            .iter()
            .find(|r| r.criterion == criterion && r.regime == regime)
            .ok_or_else(|| {
                WarrantError::configuration(format!(
                    "no pedestrian {:?} curve for {} regime",
                    criterion, regime
                ))
            })?;

        let reference = ThresholdRef {
            source: row.source.clone(),
            row: format!("{:?}", criterion),
            column: regime.to_string(),
            value: ThresholdValue::Curve {
                points: row.points.points.clone(),
            },
        };

        Ok((&row.points, reference))
    }

    fn find_curve<'a>(
        rows: &'a [CurveRow],
        regime: ReductionRegime,
        lanes: LaneConfig,
        label: &str,
    ) -> EngineResult<(&'a VolumeCurve, ThresholdRef)> {
        let row = rows
            .iter()
            .find(|r| {
                r.regime == regime && r.major_lanes == lanes.major && r.minor_lanes == lanes.minor
            })
            .ok_or_else(|| {
                WarrantError::configuration(format!(
                    "no {} curve for {} under {} regime",
                    label, lanes, regime
                ))
            })?;

        let reference = ThresholdRef {
            source: row.source.clone(),
            row: lanes.to_string(),
            column: regime.to_string(),
            value: ThresholdValue::Curve {
                points: row.points.points.clone(),
            },
        };

        Ok((&row.points, reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tables() -> Arc<ThresholdTables> {
        ThresholdTables::for_edition(Edition::Mutcd2009).unwrap()
    }

    const ONE_ONE: LaneConfig = LaneConfig { major: Lanes::One, minor: Lanes::One };
    const TWO_ONE: LaneConfig = LaneConfig { major: Lanes::TwoOrMore, minor: Lanes::One };

    #[test]
    fn test_embedded_tables_parse() {
        let t = tables();
        assert_eq!(t.edition, Edition::Mutcd2009);
        assert_eq!(t.eight_hour.condition_a.len(), 4);
        assert_eq!(t.four_hour.curves.len(), 8);
        assert_eq!(t.pedestrian.curves.len(), 4);
    }

    #[test]
    fn test_eight_hour_lookup() {
        let t = tables();
        let (pair, reference) = t
            .eight_hour(EightHourCondition::A, ONE_ONE, ThresholdColumn::Full)
            .unwrap();
        assert_eq!(pair, VolumePair { major: 500, minor: 150 });
        assert_eq!(reference.source, "Table 4C-1 Condition A");
        assert_eq!(reference.column, "100%");

        let (pair, _) = t
            .eight_hour(EightHourCondition::B, TWO_ONE, ThresholdColumn::FiftySix)
            .unwrap();
        assert_eq!(pair, VolumePair { major: 504, minor: 42 });
    }

    #[test]
    fn test_columns_follow_regime() {
        assert_eq!(ThresholdColumn::single(ReductionRegime::Normal), ThresholdColumn::Full);
        assert_eq!(ThresholdColumn::single(ReductionRegime::Reduced70), ThresholdColumn::Seventy);
        assert_eq!(ThresholdColumn::combined(ReductionRegime::Normal), ThresholdColumn::Eighty);
        assert_eq!(
            ThresholdColumn::combined(ReductionRegime::Reduced70),
            ThresholdColumn::FiftySix
        );
    }

    #[test]
    fn test_curve_interpolation() {
        let t = tables();
        let (curve, reference) = t.four_hour_curve(ReductionRegime::Normal, ONE_ONE).unwrap();
        assert_eq!(reference.source, "Figure 4C-1");

        // Below range
        assert!(curve.threshold_at(299.0).is_none());
        // Exact breakpoint
        assert_relative_eq!(curve.threshold_at(400.0).unwrap(), 100.0, epsilon = 1e-9);
        // Midpoint between (400, 100) and (500, 90)
        assert_relative_eq!(curve.threshold_at(450.0).unwrap(), 95.0, epsilon = 1e-9);
        // Beyond range
        assert_relative_eq!(curve.threshold_at(5000.0).unwrap(), 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_curve_meets_or_exceeds() {
        let t = tables();
        let (curve, _) = t.four_hour_curve(ReductionRegime::Normal, ONE_ONE).unwrap();
        assert!(curve.is_met_by(450.0, 95.0));
        assert!(!curve.is_met_by(450.0, 94.0));
        assert!(!curve.is_met_by(250.0, 500.0));
    }

    #[test]
    fn test_zero_lanes_is_configuration_error() {
        assert!(matches!(Lanes::from_count(0), Err(WarrantError::Configuration { .. })));
        assert_eq!(Lanes::from_count(1).unwrap(), Lanes::One);
        assert_eq!(Lanes::from_count(4).unwrap(), Lanes::TwoOrMore);
    }

    #[test]
    fn test_missing_row_is_configuration_error() {
        let mut t = (*tables()).clone();
        t.eight_hour.condition_a.retain(|r| r.major_lanes == Lanes::One);
        let err = t
            .eight_hour(EightHourCondition::A, TWO_ONE, ThresholdColumn::Full)
            .unwrap_err();
        assert!(matches!(err, WarrantError::Configuration { .. }));
    }

    #[test]
    fn test_factor_bands() {
        let t = tables();
        let rail = &t.grade_crossing.rail_factors;
        assert_relative_eq!(rail.factor_for(1.0).unwrap(), 0.67);
        assert_relative_eq!(rail.factor_for(4.0).unwrap(), 1.00);
        assert_relative_eq!(rail.factor_for(40.0).unwrap(), 1.33);

        let trucks = &t.grade_crossing.truck_factors_short;
        assert_relative_eq!(trucks.factor_for(10.0).unwrap(), 1.00);
        assert_relative_eq!(trucks.factor_for(30.0).unwrap(), 1.70);
    }

    #[test]
    fn test_malformed_curve_rejected() {
        let json =
            MUTCD_2009_JSON.replacen("[[300, 115], [400, 100]", "[[400, 115], [300, 100]", 1);
        assert!(matches!(
            ThresholdTables::from_json(&json),
            Err(WarrantError::Configuration { .. })
        ));
    }

    fn write_tables(name: &str, json: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "signal_warrants_{}_{}.json",
            name,
            std::process::id()
        ));
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_load_tables_file() {
        let path = write_tables("tables_ok", MUTCD_2009_JSON);
        let loaded = ThresholdTables::load(&path, Edition::Mutcd2009);
        fs::remove_file(&path).ok();

        let loaded = loaded.unwrap();
        assert_eq!(loaded.edition, Edition::Mutcd2009);
        assert_eq!(loaded.eight_hour.hours_required, tables().eight_hour.hours_required);
        assert_eq!(loaded.four_hour.curves.len(), 8);
    }

    #[test]
    fn test_load_refuses_other_edition() {
        let json = MUTCD_2009_JSON.replacen("\"mutcd_2009\"", "\"mutcd_2023\"", 1);
        let path = write_tables("tables_2023", &json);
        let loaded = ThresholdTables::load(&path, Edition::Mutcd2009);
        fs::remove_file(&path).ok();

        let err = loaded.unwrap_err();
        assert!(format!("{:#}", err).contains("mutcd_2023"));
    }
}
