//! Input data model
//!
//! Raw counts and site facts as the user records them. Nothing here is
//! derived; classification and regimes live in `classify`.

use crate::error::{EngineResult, WarrantError};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest hourly count accepted for a single bucket
pub const MAX_HOURLY_COUNT: i64 = u32::MAX as i64;

/// Travel direction of a counted movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Northbound,
    Southbound,
    Eastbound,
    Westbound,
}

impl FromStr for Direction {
    type Err = WarrantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nb" | "n" | "northbound" => Ok(Direction::Northbound),
            "sb" | "s" | "southbound" => Ok(Direction::Southbound),
            "eb" | "e" | "eastbound" => Ok(Direction::Eastbound),
            "wb" | "w" | "westbound" => Ok(Direction::Westbound),
            other => Err(WarrantError::invalid(
                "direction",
                format!("unknown direction '{}'", other),
            )),
        }
    }
}

/// What was counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    Vehicle,
    Pedestrian,
}

impl FromStr for TravelMode {
    type Err = WarrantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vehicle" | "veh" | "" => Ok(TravelMode::Vehicle),
            "pedestrian" | "ped" => Ok(TravelMode::Pedestrian),
            other => Err(WarrantError::invalid("mode", format!("unknown travel mode '{}'", other))),
        }
    }
}

/// One hourly count bucket for one approach and direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficCount {
    pub approach: String,
    pub direction: Direction,
    /// Hour of day, 0-23
    pub hour: u8,
    #[serde(default)]
    pub mode: TravelMode,
    /// Signed so that a negative entry is reported, not silently rejected by the parser
    pub count: i64,
}

/// Roadway functional classification, used only to break volume ties
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionalClass {
    Local,
    Collector,
    MinorArterial,
    PrincipalArterial,
}

impl fmt::Display for FunctionalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FunctionalClass::Local => "local",
            FunctionalClass::Collector => "collector",
            FunctionalClass::MinorArterial => "minor arterial",
            FunctionalClass::PrincipalArterial => "principal arterial",
        };
        f.write_str(s)
    }
}

/// All counts for one physical approach plus its static attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproachProfile {
    pub id: String,
    /// Street this approach belongs to; approaches are grouped by it
    pub street: String,
    #[serde(default)]
    pub counts: Vec<TrafficCount>,
    /// Posted or 85th-percentile speed (mph)
    pub speed_mph: f64,
    #[serde(default)]
    pub divided: bool,
    /// Lanes for moving traffic on the approach
    pub lanes: u32,
    /// Population of the served community
    pub population: i64,
    #[serde(default)]
    pub functional_class: Option<FunctionalClass>,
}

/// Correctable crash history over a rolling 12-month period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrashRecord {
    /// Crashes of types susceptible to correction by a signal
    pub correctable_crashes: u32,
    /// Adequate trial of alternatives has failed to reduce crash frequency
    pub alternatives_tried: bool,
    #[serde(default)]
    pub total_reported: Option<u32>,
    #[serde(default)]
    pub right_angle: Option<u32>,
    #[serde(default)]
    pub left_turn: Option<u32>,
    #[serde(default)]
    pub pedestrian: Option<u32>,
}

/// Network role of the intersection (Warrants 6 and 8)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInfo {
    /// Intersection lies within a coordinated signal system
    pub coordinated_system: bool,
    #[serde(default)]
    pub adjacent_signal_spacing_ft: Option<f64>,
    #[serde(default)]
    pub progression_speed_mph: Option<f64>,
    /// Common intersection of two or more major routes
    #[serde(default)]
    pub major_route_intersection: bool,
    /// Five-year projected volumes meet Warrant 1, 2 or 3 on a weekday
    #[serde(default)]
    pub projected_volumes_meet_warrants: bool,
    /// Total entering volumes for hours of a Saturday or Sunday
    #[serde(default)]
    pub weekend_entering_volumes: Vec<i64>,
}

/// Pedestrian gap study and signal spacing (Warrant 4)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PedestrianStudy {
    pub adequate_gaps_per_hour: u32,
    pub distance_to_nearest_signal_ft: f64,
}

/// School crossing observations (Warrant 5)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolCrossing {
    /// Schoolchildren crossing the major street in the highest crossing hour
    pub schoolchildren_per_hour: i64,
    /// Adequate gaps observed while children were crossing
    pub adequate_gaps: u32,
    #[serde(default = "default_crossing_period")]
    pub crossing_period_minutes: u32,
    #[serde(default)]
    pub distance_to_nearest_signal_ft: Option<f64>,
}

fn default_crossing_period() -> u32 {
    30
}

/// Railroad grade crossing on the minor approach (Warrant 9)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeCrossing {
    /// Clear storage distance between the stop line and the nearest rail
    pub clear_storage_distance_ft: f64,
    pub trains_per_day: u32,
    #[serde(default)]
    pub high_occupancy_bus_pct: f64,
    #[serde(default)]
    pub tractor_trailer_pct: f64,
    #[serde(default)]
    pub preemption_needed: bool,
}

/// Stopped-time delay on the minor approach for one hour (Warrant 3, Condition A)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayStudy {
    pub hour: u8,
    pub minor_approach_delay_vehicle_hours: f64,
}

/// Everything one evaluation run consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarrantInputs {
    pub approaches: Vec<ApproachProfile>,
    #[serde(default)]
    pub crash_record: Option<CrashRecord>,
    #[serde(default)]
    pub network: Option<NetworkInfo>,
    #[serde(default)]
    pub pedestrian_study: Option<PedestrianStudy>,
    #[serde(default)]
    pub school_crossing: Option<SchoolCrossing>,
    #[serde(default)]
    pub grade_crossing: Option<GradeCrossing>,
    #[serde(default)]
    pub delay_study: Option<DelayStudy>,
}

impl WarrantInputs {
    pub fn new(approaches: Vec<ApproachProfile>) -> Self {
        Self {
            approaches,
            crash_record: None,
            network: None,
            pedestrian_study: None,
            school_crossing: None,
            grade_crossing: None,
            delay_study: None,
        }
    }

    /// Reject values no real count or site could produce
    pub fn validate(&self) -> EngineResult<()> {
        let mut ids: FxHashSet<&str> = FxHashSet::default();

        for approach in &self.approaches {
            let field = |name: &str| format!("approaches[{}].{}", approach.id, name);

            if !ids.insert(approach.id.as_str()) {
                return Err(WarrantError::invalid(field("id"), "duplicate approach id"));
            }
            if !approach.speed_mph.is_finite() || approach.speed_mph <= 0.0 {
                return Err(WarrantError::invalid(
                    field("speed_mph"),
                    format!("speed must be positive, got {}", approach.speed_mph),
                ));
            }
            if approach.population < 0 {
                return Err(WarrantError::invalid(
                    field("population"),
                    format!("population cannot be negative, got {}", approach.population),
                ));
            }

            let mut buckets: FxHashSet<(Direction, u8, TravelMode)> = FxHashSet::default();
            for count in &approach.counts {
                if count.approach != approach.id {
                    return Err(WarrantError::invalid(
                        field("counts"),
                        format!("count recorded for approach '{}'", count.approach),
                    ));
                }
                if count.hour > 23 {
                    return Err(WarrantError::invalid(
                        field("counts.hour"),
                        format!("hour index {} outside 0-23", count.hour),
                    ));
                }
                if count.count < 0 {
                    return Err(WarrantError::invalid(
                        field("counts.count"),
                        format!("negative count {} at hour {}", count.count, count.hour),
                    ));
                }
                if count.count > MAX_HOURLY_COUNT {
                    return Err(WarrantError::invalid(
                        field("counts.count"),
                        format!(
                            "count {} at hour {} exceeds {}",
                            count.count, count.hour, MAX_HOURLY_COUNT
                        ),
                    ));
                }
                if !buckets.insert((count.direction, count.hour, count.mode)) {
                    return Err(WarrantError::invalid(
                        field("counts"),
                        format!(
                            "duplicate {:?} {:?} count at hour {}",
                            count.direction, count.mode, count.hour
                        ),
                    ));
                }
            }
        }

        if let Some(crash) = &self.crash_record {
            if let Some(total) = crash.total_reported {
                if crash.correctable_crashes > total {
                    return Err(WarrantError::invalid(
                        "crash_record.correctable_crashes",
                        format!(
                            "{} correctable crashes exceed {} reported",
                            crash.correctable_crashes, total
                        ),
                    ));
                }
            }
        }

        if let Some(network) = &self.network {
            check_distance(
                "network.adjacent_signal_spacing_ft",
                network.adjacent_signal_spacing_ft,
            )?;
            if let Some(speed) = network.progression_speed_mph {
                if !speed.is_finite() || speed <= 0.0 {
                    return Err(WarrantError::invalid(
                        "network.progression_speed_mph",
                        "speed must be positive",
                    ));
                }
            }
            if network.weekend_entering_volumes.iter().any(|v| *v < 0) {
                return Err(WarrantError::invalid(
                    "network.weekend_entering_volumes",
                    "negative volume",
                ));
            }
        }

        if let Some(study) = &self.pedestrian_study {
            check_distance(
                "pedestrian_study.distance_to_nearest_signal_ft",
                Some(study.distance_to_nearest_signal_ft),
            )?;
        }

        if let Some(school) = &self.school_crossing {
            if school.schoolchildren_per_hour < 0 {
                return Err(WarrantError::invalid(
                    "school_crossing.schoolchildren_per_hour",
                    "negative count",
                ));
            }
            if school.crossing_period_minutes == 0 {
                return Err(WarrantError::invalid(
                    "school_crossing.crossing_period_minutes",
                    "period must be positive",
                ));
            }
            check_distance(
                "school_crossing.distance_to_nearest_signal_ft",
                school.distance_to_nearest_signal_ft,
            )?;
        }

        if let Some(rail) = &self.grade_crossing {
            check_distance(
                "grade_crossing.clear_storage_distance_ft",
                Some(rail.clear_storage_distance_ft),
            )?;
            for (name, pct) in [
                ("grade_crossing.high_occupancy_bus_pct", rail.high_occupancy_bus_pct),
                ("grade_crossing.tractor_trailer_pct", rail.tractor_trailer_pct),
            ] {
                if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
                    return Err(WarrantError::invalid(name, format!("{} is not a percentage", pct)));
                }
            }
        }

        if let Some(delay) = &self.delay_study {
            if delay.hour > 23 {
                return Err(WarrantError::invalid(
                    "delay_study.hour",
                    format!("hour index {} outside 0-23", delay.hour),
                ));
            }
            let delay_hours = delay.minor_approach_delay_vehicle_hours;
            if !delay_hours.is_finite() || delay_hours < 0.0 {
                return Err(WarrantError::invalid(
                    "delay_study.minor_approach_delay_vehicle_hours",
                    "delay cannot be negative",
                ));
            }
        }

        Ok(())
    }
}

fn check_distance(field: &str, value: Option<f64>) -> EngineResult<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(WarrantError::invalid(field, format!("distance must be non-negative, got {}", v)))
        }
        _ => Ok(()),
    }
}
