//! Data Loading
//!
//! Reads study inputs from disk:
//!   - site facts and approach attributes from JSON (serde_json)
//!   - hourly turning-movement counts from a long-format CSV (Polars)
//!
//! Counts CSV columns:
//!   approach, direction, hour, count[, mode]
//!
//! `mode` defaults to vehicle when the column or cell is absent.

use crate::error::{EngineResult, WarrantError};
use crate::model::{Direction, TrafficCount, TravelMode, WarrantInputs};
use anyhow::{Context, Result};
use polars::prelude::*;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Columns every counts CSV must carry
pub const REQUIRED_COUNT_COLS: &[&str] = &["approach", "direction", "hour", "count"];

/// Load `WarrantInputs` from a JSON file
pub fn load_inputs(path: &Path) -> Result<WarrantInputs> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read inputs file: {:?}", path))?;

    let inputs: WarrantInputs = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse inputs JSON: {:?}", path))?;

    info!(approaches = inputs.approaches.len(), "Loaded inputs from {:?}", path);
    Ok(inputs)
}

/// Load hourly counts from a long-format CSV
pub fn load_counts_csv(path: &Path) -> Result<Vec<TrafficCount>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.into()))
        .with_context(|| format!("Failed to create CSV reader: {:?}", path))?
        .finish()
        .with_context(|| format!("Failed to load counts CSV: {:?}", path))?;

    let counts = counts_from_frame(&df).with_context(|| format!("Invalid counts in {:?}", path))?;
    info!(rows = counts.len(), "Loaded counts from {:?}", path);
    Ok(counts)
}

/// Convert a counts DataFrame into `TrafficCount` rows
pub fn counts_from_frame(df: &DataFrame) -> Result<Vec<TrafficCount>> {
    for col_name in REQUIRED_COUNT_COLS {
        if df.column(col_name).is_err() {
            anyhow::bail!(WarrantError::invalid(
                "counts",
                format!("missing required column '{}'", col_name)
            ));
        }
    }

    let approaches = df.column("approach")?.cast(&DataType::String)?;
    let approaches = approaches.str()?;
    let directions = df.column("direction")?.cast(&DataType::String)?;
    let directions = directions.str()?;
    let hours = df.column("hour")?.cast(&DataType::Int64)?;
    let hours = hours.i64()?;
    let values = df.column("count")?.cast(&DataType::Int64)?;
    let values = values.i64()?;
    let modes = match df.column("mode") {
        Ok(column) => Some(column.cast(&DataType::String)?),
        Err(_) => None,
    };
    let modes = modes.as_ref().map(|m| m.str()).transpose()?;

    let mut counts = Vec::with_capacity(df.height());

    for idx in 0..df.height() {
        let row = idx + 1;
        let missing = |column: &str| {
            WarrantError::invalid(format!("counts row {}", row), format!("empty '{}'", column))
        };

        let approach = approaches.get(idx).ok_or_else(|| missing("approach"))?;
        let direction: Direction =
            directions.get(idx).ok_or_else(|| missing("direction"))?.parse()?;
        let hour = hours.get(idx).ok_or_else(|| missing("hour"))?;
        let count = values.get(idx).ok_or_else(|| missing("count"))?;
        let mode: TravelMode = match modes.and_then(|m| m.get(idx)) {
            Some(m) => m.parse()?,
            None => TravelMode::Vehicle,
        };

        let hour = u8::try_from(hour)
            .ok()
            .filter(|h| *h <= 23)
            .ok_or_else(|| {
                WarrantError::invalid(
                    format!("counts row {}", row),
                    format!("hour index {} outside 0-23", hour),
                )
            })?;

        counts.push(TrafficCount {
            approach: approach.to_string(),
            direction,
            hour,
            mode,
            count,
        });
    }

    Ok(counts)
}

/// Append counts to the approaches they name
pub fn attach_counts(inputs: &mut WarrantInputs, counts: Vec<TrafficCount>) -> EngineResult<()> {
    let index: FxHashMap<String, usize> = inputs
        .approaches
        .iter()
        .enumerate()
        .map(|(i, a)| (a.id.clone(), i))
        .collect();

    for count in counts {
        let slot = *index.get(&count.approach).ok_or_else(|| {
            WarrantError::invalid(
                "counts.approach",
                format!("unknown approach '{}'", count.approach),
            )
        })?;
        inputs.approaches[slot].counts.push(count);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ApproachProfile;

    fn frame() -> DataFrame {
        df!(
            "approach" => &["main_nb", "main_nb", "oak_eb", "main_nb"],
            "direction" => &["NB", "NB", "EB", "NB"],
            "hour" => &[7i64, 8, 7, 7],
            "count" => &[420i64, 380, 95, 40],
            "mode" => &[Some("vehicle"), None, Some("veh"), Some("ped")]
        )
        .unwrap()
    }

    fn approach(id: &str, street: &str) -> ApproachProfile {
        ApproachProfile {
            id: id.to_string(),
            street: street.to_string(),
            counts: Vec::new(),
            speed_mph: 35.0,
            divided: false,
            lanes: 1,
            population: 20_000,
            functional_class: None,
        }
    }

    #[test]
    fn test_counts_from_frame() {
        let counts = counts_from_frame(&frame()).unwrap();
        assert_eq!(counts.len(), 4);
        assert_eq!(counts[0].direction, Direction::Northbound);
        assert_eq!(counts[1].mode, TravelMode::Vehicle);
        assert_eq!(counts[2].approach, "oak_eb");
        assert_eq!(counts[3].mode, TravelMode::Pedestrian);
    }

    #[test]
    fn test_mode_column_optional() {
        let df = df!(
            "approach" => &["main_nb"],
            "direction" => &["southbound"],
            "hour" => &[16i64],
            "count" => &[510i64]
        )
        .unwrap();
        let counts = counts_from_frame(&df).unwrap();
        assert_eq!(counts[0].mode, TravelMode::Vehicle);
        assert_eq!(counts[0].hour, 16);
    }

    #[test]
    fn test_bad_hour_rejected() {
        let df = df!(
            "approach" => &["main_nb"],
            "direction" => &["NB"],
            "hour" => &[24i64],
            "count" => &[10i64]
        )
        .unwrap();
        assert!(counts_from_frame(&df).is_err());
    }

    #[test]
    fn test_missing_column_rejected() {
        let df = df!("approach" => &["main_nb"], "hour" => &[7i64]).unwrap();
        let err = counts_from_frame(&df).unwrap_err();
        assert!(err.to_string().contains("direction"));
    }

    #[test]
    fn test_attach_counts() {
        let mut inputs =
            WarrantInputs::new(vec![approach("main_nb", "Main"), approach("oak_eb", "Oak")]);
        attach_counts(&mut inputs, counts_from_frame(&frame()).unwrap()).unwrap();
        assert_eq!(inputs.approaches[0].counts.len(), 3);
        assert_eq!(inputs.approaches[1].counts.len(), 1);
        assert!(inputs.validate().is_ok());
    }

    #[test]
    fn test_attach_unknown_approach() {
        let mut inputs = WarrantInputs::new(vec![approach("main_nb", "Main")]);
        let err = attach_counts(&mut inputs, counts_from_frame(&frame()).unwrap()).unwrap_err();
        assert!(matches!(err, WarrantError::InvalidInput { .. }));
    }

    #[test]
    fn test_load_counts_csv_file() {
        let path = std::env::temp_dir()
            .join(format!("signal_warrants_counts_{}.csv", std::process::id()));
        let csv = "approach,direction,hour,count\nmain_nb,NB,7,420\noak_eb,EB,7,95\n";
        fs::write(&path, csv).unwrap();
        let counts = load_counts_csv(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[1].count, 95);
    }
}
