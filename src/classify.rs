//! Classification Module
//!
//! Turns raw approach profiles into the view every warrant consumes:
//! which street is major, which reduction regime applies, lane keys,
//! and one `HourlyVolume` row per counted hour.
//!
//! Hourly volume convention:
//!   - major = sum of every major-street approach
//!   - minor = the single higher-volume minor-street approach
//!   - pedestrians = pedestrian counts on the major-street legs
//!   - entering = every vehicle on every approach

use crate::error::{EngineResult, WarrantError};
use crate::model::{ApproachProfile, FunctionalClass, TravelMode, WarrantInputs};
use crate::tables::{LaneConfig, Lanes};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Speed above which the 70% thresholds apply (mph)
pub const REDUCED_SPEED_MPH: f64 = 40.0;

/// Warrant 4 uses its own, lower speed cutoff (mph)
pub const PEDESTRIAN_REDUCED_SPEED_MPH: f64 = 35.0;

/// Isolated communities below this population use the 70% thresholds
pub const REDUCED_POPULATION: i64 = 10_000;

/// Which family of thresholds a warrant compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionRegime {
    Normal,
    Reduced70,
}

impl fmt::Display for ReductionRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReductionRegime::Normal => f.write_str("normal"),
            ReductionRegime::Reduced70 => f.write_str("70% reduced"),
        }
    }
}

/// Default regime rule: REDUCED_70 when speed > 40 mph or population < 10,000
pub fn resolve_regime(speed_mph: f64, population: i64) -> ReductionRegime {
    regime_with_cutoff(speed_mph, population, REDUCED_SPEED_MPH)
}

/// Warrant 4 regime rule: same as `resolve_regime` with a 35 mph cutoff
pub fn resolve_pedestrian_regime(speed_mph: f64, population: i64) -> ReductionRegime {
    regime_with_cutoff(speed_mph, population, PEDESTRIAN_REDUCED_SPEED_MPH)
}

fn regime_with_cutoff(speed_mph: f64, population: i64, cutoff_mph: f64) -> ReductionRegime {
    if speed_mph > cutoff_mph || population < REDUCED_POPULATION {
        ReductionRegime::Reduced70
    } else {
        ReductionRegime::Normal
    }
}

/// How to separate two streets carrying identical volumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Refuse to guess
    #[default]
    Reject,
    /// Higher functional classification becomes major
    FunctionalClass,
}

impl FromStr for TieBreak {
    type Err = WarrantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(TieBreak::Reject),
            "functional_class" => Ok(TieBreak::FunctionalClass),
            other => Err(WarrantError::configuration(format!(
                "unknown tie-break policy '{}'",
                other
            ))),
        }
    }
}

/// Aggregated attributes of one street
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetSummary {
    pub name: String,
    /// Approach ids, in input order
    pub approaches: Vec<String>,
    /// Vehicles over all recorded hours
    pub total_volume: u64,
    pub lanes: u32,
    pub speed_mph: f64,
    pub population: i64,
    pub functional_class: Option<FunctionalClass>,
}

/// Which street is major and how that was decided
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MajorMinorAssignment {
    pub major: StreetSummary,
    pub minor: StreetSummary,
    /// Set when volumes tied and the policy had to decide
    pub tie_broken_by: Option<TieBreak>,
}

/// Assign major and minor streets by total daily vehicle volume
///
/// Exactly two distinct streets are required. Ties go through `tie_break`;
/// input order and street names never decide.
pub fn assign_streets(
    approaches: &[ApproachProfile],
    tie_break: TieBreak,
) -> EngineResult<MajorMinorAssignment> {
    let mut streets: BTreeMap<&str, StreetSummary> = BTreeMap::new();

    for approach in approaches {
        let volume: u64 = approach
            .counts
            .iter()
            .filter(|c| c.mode == TravelMode::Vehicle)
            .map(|c| c.count.max(0) as u64)
            .fold(0u64, u64::saturating_add);

        let street = streets.entry(approach.street.as_str()).or_insert_with(|| StreetSummary {
            name: approach.street.clone(),
            approaches: Vec::new(),
            total_volume: 0,
            lanes: 0,
            speed_mph: 0.0,
            population: 0,
            functional_class: None,
        });

        street.approaches.push(approach.id.clone());
        street.total_volume = street.total_volume.saturating_add(volume);
        street.lanes = street.lanes.max(approach.lanes);
        street.speed_mph = street.speed_mph.max(approach.speed_mph);
        street.population = street.population.max(approach.population);
        street.functional_class = street.functional_class.max(approach.functional_class);
    }

    if streets.len() != 2 {
        return Err(WarrantError::configuration(format!(
            "expected exactly two crossing streets, found {}",
            streets.len()
        )));
    }

    let mut iter = streets.into_values();
    let (a, b) = match (iter.next(), iter.next()) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(WarrantError::configuration("expected exactly two crossing streets")),
    };

    if a.total_volume != b.total_volume {
        let (major, minor) = if a.total_volume > b.total_volume { (a, b) } else { (b, a) };
        debug!(major = %major.name, volume = major.total_volume, "Major street by volume");
        return Ok(MajorMinorAssignment { major, minor, tie_broken_by: None });
    }

    let ambiguous = |a: &StreetSummary, b: &StreetSummary| WarrantError::AmbiguousClassification {
        first: a.name.clone(),
        second: b.name.clone(),
        volume: a.total_volume,
    };

    match tie_break {
        TieBreak::Reject => Err(ambiguous(&a, &b)),
        TieBreak::FunctionalClass => match (a.functional_class, b.functional_class) {
            (Some(ca), Some(cb)) if ca != cb => {
                let (major, minor) = if ca > cb { (a, b) } else { (b, a) };
                debug!(major = %major.name, "Volume tie broken by functional class");
                Ok(MajorMinorAssignment {
                    major,
                    minor,
                    tie_broken_by: Some(TieBreak::FunctionalClass),
                })
            }
            _ => Err(ambiguous(&a, &b)),
        },
    }
}

/// One analysed hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyVolume {
    pub hour: u8,
    /// Both major approaches combined (vph)
    pub major: u64,
    /// Higher-volume minor approach (vph)
    pub minor: u64,
    /// Approach that supplied `minor`
    pub minor_approach: String,
    /// Pedestrians crossing the major street (ph)
    pub pedestrians: u64,
    /// Total entering vehicles (vph)
    pub entering: u64,
}

/// Classified view of an intersection, shared read-only by every warrant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedIntersection {
    pub assignment: MajorMinorAssignment,
    pub lanes: LaneConfig,
    /// Regime for every warrant except 4
    pub regime: ReductionRegime,
    /// Warrant 4's own regime
    pub pedestrian_regime: ReductionRegime,
    /// Ascending by hour
    pub hours: Vec<HourlyVolume>,
    pub approach_count: usize,
    /// A major-street leg has a pedestrian count in an analysed hour
    pub has_pedestrian_counts: bool,
    /// Hours with major-leg pedestrian counts but no vehicle count
    pub unmatched_pedestrian_hours: Vec<u8>,
}

impl ClassifiedIntersection {
    /// Hour with the highest total entering volume (earliest on ties)
    pub fn peak_entering_hour(&self) -> Option<&HourlyVolume> {
        self.hours
            .iter()
            .fold(None, |best: Option<&HourlyVolume>, h| match best {
                Some(b) if b.entering >= h.entering => Some(b),
                _ => Some(h),
            })
    }

    pub fn hour(&self, hour: u8) -> Option<&HourlyVolume> {
        self.hours.iter().find(|h| h.hour == hour)
    }
}

/// Classify validated inputs
pub fn classify(
    inputs: &WarrantInputs,
    tie_break: TieBreak,
) -> EngineResult<ClassifiedIntersection> {
    for approach in &inputs.approaches {
        if approach.lanes == 0 {
            return Err(WarrantError::configuration(format!(
                "approach '{}' has zero lanes",
                approach.id
            )));
        }
    }

    let assignment = assign_streets(&inputs.approaches, tie_break)?;

    let lanes = LaneConfig {
        major: Lanes::from_count(assignment.major.lanes)?,
        minor: Lanes::from_count(assignment.minor.lanes)?,
    };

    let regime = resolve_regime(assignment.major.speed_mph, assignment.major.population);
    let pedestrian_regime =
        resolve_pedestrian_regime(assignment.major.speed_mph, assignment.major.population);

    debug!(
        major = %assignment.major.name,
        minor = %assignment.minor.name,
        %regime,
        %pedestrian_regime,
        "Classified intersection"
    );

    let is_major = |approach: &ApproachProfile| approach.street == assignment.major.name;

    // approach id -> hour -> (vehicles, pedestrians)
    let mut per_approach: Vec<(&ApproachProfile, BTreeMap<u8, (u64, u64)>)> = Vec::new();
    let mut vehicle_hours: BTreeSet<u8> = BTreeSet::new();
    let mut pedestrian_hours: BTreeSet<u8> = BTreeSet::new();

    for approach in &inputs.approaches {
        let mut by_hour: BTreeMap<u8, (u64, u64)> = BTreeMap::new();
        for count in &approach.counts {
            let value = count.count.max(0) as u64;
            let slot = by_hour.entry(count.hour).or_insert((0, 0));
            match count.mode {
                TravelMode::Vehicle => {
                    slot.0 = slot.0.saturating_add(value);
                    vehicle_hours.insert(count.hour);
                }
                TravelMode::Pedestrian => {
                    slot.1 = slot.1.saturating_add(value);
                    if is_major(approach) {
                        pedestrian_hours.insert(count.hour);
                    }
                }
            }
        }
        per_approach.push((approach, by_hour));
    }

    let has_pedestrian_counts = pedestrian_hours.iter().any(|h| vehicle_hours.contains(h));
    let unmatched_pedestrian_hours: Vec<u8> =
        pedestrian_hours.difference(&vehicle_hours).copied().collect();
    if !unmatched_pedestrian_hours.is_empty() {
        debug!(hours = ?unmatched_pedestrian_hours, "Pedestrian counts without vehicle counts");
    }

    let hours = vehicle_hours
        .into_iter()
        .map(|hour| {
            let mut row = HourlyVolume {
                hour,
                major: 0,
                minor: 0,
                minor_approach: String::new(),
                pedestrians: 0,
                entering: 0,
            };

            for (approach, by_hour) in &per_approach {
                let (vehicles, pedestrians) = by_hour.get(&hour).copied().unwrap_or((0, 0));
                row.entering = row.entering.saturating_add(vehicles);
                if is_major(*approach) {
                    row.major = row.major.saturating_add(vehicles);
                    row.pedestrians = row.pedestrians.saturating_add(pedestrians);
                } else if row.minor_approach.is_empty() || vehicles > row.minor {
                    row.minor = vehicles;
                    row.minor_approach = approach.id.clone();
                }
            }

            row
        })
        .collect();

    Ok(ClassifiedIntersection {
        assignment,
        lanes,
        regime,
        pedestrian_regime,
        hours,
        approach_count: inputs.approaches.len(),
        has_pedestrian_counts,
        unmatched_pedestrian_hours,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Direction, TrafficCount};

    fn approach(
        id: &str,
        street: &str,
        direction: Direction,
        volumes: &[(u8, i64)],
    ) -> ApproachProfile {
        ApproachProfile {
            id: id.to_string(),
            street: street.to_string(),
            counts: volumes
                .iter()
                .map(|(hour, count)| TrafficCount {
                    approach: id.to_string(),
                    direction,
                    hour: *hour,
                    mode: TravelMode::Vehicle,
                    count: *count,
                })
                .collect(),
            speed_mph: 35.0,
            divided: false,
            lanes: 1,
            population: 50_000,
            functional_class: None,
        }
    }

    fn four_leg() -> Vec<ApproachProfile> {
        vec![
            approach("nb", "Main", Direction::Northbound, &[(7, 300), (8, 250)]),
            approach("sb", "Main", Direction::Southbound, &[(7, 200), (8, 260)]),
            approach("eb", "Oak", Direction::Eastbound, &[(7, 90), (8, 40)]),
            approach("wb", "Oak", Direction::Westbound, &[(7, 60), (8, 70)]),
        ]
    }

    #[test]
    fn test_regime_rule() {
        assert_eq!(resolve_regime(40.0, 10_000), ReductionRegime::Normal);
        assert_eq!(resolve_regime(41.0, 50_000), ReductionRegime::Reduced70);
        assert_eq!(resolve_regime(30.0, 9_999), ReductionRegime::Reduced70);
    }

    #[test]
    fn test_pedestrian_regime_diverges_between_35_and_40() {
        for speed in [36.0, 38.5, 40.0] {
            assert_eq!(resolve_regime(speed, 50_000), ReductionRegime::Normal);
            assert_eq!(resolve_pedestrian_regime(speed, 50_000), ReductionRegime::Reduced70);
        }
        assert_eq!(resolve_pedestrian_regime(35.0, 50_000), ReductionRegime::Normal);
    }

    #[test]
    fn test_higher_volume_street_is_major() {
        let assignment = assign_streets(&four_leg(), TieBreak::Reject).unwrap();
        assert_eq!(assignment.major.name, "Main");
        assert_eq!(assignment.major.total_volume, 1010);
        assert_eq!(assignment.minor.approaches, vec!["eb", "wb"]);
        assert!(assignment.tie_broken_by.is_none());
    }

    #[test]
    fn test_assignment_is_deterministic() {
        let a = assign_streets(&four_leg(), TieBreak::Reject).unwrap();
        let b = assign_streets(&four_leg(), TieBreak::Reject).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tie_rejected_without_policy() {
        let approaches = vec![
            approach("n", "Main", Direction::Northbound, &[(7, 100)]),
            approach("e", "Oak", Direction::Eastbound, &[(7, 100)]),
        ];
        let err = assign_streets(&approaches, TieBreak::Reject).unwrap_err();
        assert!(matches!(err, WarrantError::AmbiguousClassification { volume: 100, .. }));
    }

    #[test]
    fn test_tie_broken_by_functional_class() {
        let mut approaches = vec![
            approach("n", "Main", Direction::Northbound, &[(7, 100)]),
            approach("e", "Oak", Direction::Eastbound, &[(7, 100)]),
        ];
        approaches[0].functional_class = Some(FunctionalClass::Collector);
        approaches[1].functional_class = Some(FunctionalClass::MinorArterial);

        let assignment = assign_streets(&approaches, TieBreak::FunctionalClass).unwrap();
        assert_eq!(assignment.major.name, "Oak");
        assert_eq!(assignment.tie_broken_by, Some(TieBreak::FunctionalClass));

        approaches[1].functional_class = Some(FunctionalClass::Collector);
        assert!(assign_streets(&approaches, TieBreak::FunctionalClass).is_err());
    }

    #[test]
    fn test_three_streets_is_configuration_error() {
        let mut approaches = four_leg();
        approaches.push(approach("x", "Elm", Direction::Eastbound, &[(7, 10)]));
        let err = assign_streets(&approaches, TieBreak::Reject).unwrap_err();
        assert!(matches!(err, WarrantError::Configuration { .. }));
    }

    #[test]
    fn test_hourly_volumes() {
        let inputs = WarrantInputs::new(four_leg());
        let classified = classify(&inputs, TieBreak::Reject).unwrap();

        assert_eq!(classified.hours.len(), 2);
        let h7 = &classified.hours[0];
        assert_eq!((h7.hour, h7.major, h7.minor, h7.entering), (7, 500, 90, 650));
        assert_eq!(h7.minor_approach, "eb");

        let h8 = &classified.hours[1];
        assert_eq!((h8.major, h8.minor), (510, 70));
        assert_eq!(h8.minor_approach, "wb");

        assert_eq!(classified.peak_entering_hour().map(|h| h.hour), Some(7));
        assert_eq!(classified.lanes, LaneConfig { major: Lanes::One, minor: Lanes::One });
        assert_eq!(classified.approach_count, 4);
        assert!(!classified.has_pedestrian_counts);
    }

    #[test]
    fn test_pedestrians_counted_on_major_legs() {
        let mut approaches = four_leg();
        approaches[0].counts.push(TrafficCount {
            approach: "nb".to_string(),
            direction: Direction::Northbound,
            hour: 7,
            mode: TravelMode::Pedestrian,
            count: 45,
        });
        approaches[2].counts.push(TrafficCount {
            approach: "eb".to_string(),
            direction: Direction::Eastbound,
            hour: 7,
            mode: TravelMode::Pedestrian,
            count: 30,
        });

        let classified = classify(&WarrantInputs::new(approaches), TieBreak::Reject).unwrap();
        assert_eq!(classified.hours[0].pedestrians, 45);
        assert!(classified.has_pedestrian_counts);
        assert!(classified.unmatched_pedestrian_hours.is_empty());
    }

    #[test]
    fn test_pedestrian_hours_without_vehicles_are_reported() {
        let mut approaches = four_leg();
        approaches[0].counts.push(TrafficCount {
            approach: "nb".to_string(),
            direction: Direction::Northbound,
            hour: 5,
            mode: TravelMode::Pedestrian,
            count: 140,
        });

        let classified = classify(&WarrantInputs::new(approaches), TieBreak::Reject).unwrap();
        assert_eq!(classified.hours.len(), 2);
        assert!(!classified.has_pedestrian_counts);
        assert_eq!(classified.unmatched_pedestrian_hours, vec![5]);
    }

    #[test]
    fn test_huge_counts_saturate_instead_of_overflowing() {
        let approaches = vec![
            approach("n1", "Main", Direction::Northbound, &[(7, i64::MAX)]),
            approach("n2", "Main", Direction::Southbound, &[(7, i64::MAX)]),
            approach("n3", "Main", Direction::Northbound, &[(7, i64::MAX)]),
            approach("e", "Oak", Direction::Eastbound, &[(7, 10)]),
        ];
        let classified = classify(&WarrantInputs::new(approaches), TieBreak::Reject).unwrap();
        assert_eq!(classified.assignment.major.total_volume, u64::MAX);
        assert_eq!(classified.hours[0].major, u64::MAX);
    }

    #[test]
    fn test_larger_minor_street_takes_over_as_major() {
        let mut approaches = four_leg();
        approaches[2].counts[0].count = 5_000;

        let assignment = assign_streets(&approaches, TieBreak::Reject).unwrap();
        assert_eq!(assignment.major.name, "Oak");
        assert_eq!(assignment.minor.name, "Main");
    }

    #[test]
    fn test_zero_lanes_is_configuration_error() {
        let mut approaches = four_leg();
        approaches[2].lanes = 0;
        let err = classify(&WarrantInputs::new(approaches), TieBreak::Reject).unwrap_err();
        assert!(matches!(err, WarrantError::Configuration { .. }));
    }
}
