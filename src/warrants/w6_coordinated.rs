//! WARRANT 6: COORDINATED SIGNAL SYSTEM
//!
//! A network-topology condition. Met when the intersection is part of a
//! coordinated signal system and the adjacent signals are far enough
//! apart that platoons disperse, but not so far that a signal here would
//! break up a progression (1,000 to 2,640 ft).

use super::{Condition, EvaluationContext, WarrantId, WarrantResult};
use crate::error::{EngineResult, WarrantError};
use crate::tables::{ThresholdRef, ThresholdValue};

pub fn evaluate_w6(ctx: &EvaluationContext) -> EngineResult<WarrantResult> {
    let limits = &ctx.tables.coordinated;
    let network = ctx
        .inputs
        .network
        .as_ref()
        .ok_or_else(|| WarrantError::insufficient(WarrantId::CoordinatedSignalSystem, "network"))?;

    let mut result =
        WarrantResult::new(WarrantId::CoordinatedSignalSystem, ctx.intersection.regime);
    result.thresholds.push(ThresholdRef {
        source: limits.source.clone(),
        row: "adjacent signal spacing".to_string(),
        column: "feet".to_string(),
        value: ThresholdValue::Range {
            min: limits.min_spacing_ft,
            max: limits.max_spacing_ft,
        },
    });
    result.threshold = format!("{}-{} ft spacing", limits.min_spacing_ft, limits.max_spacing_ft);
    result.measure("coordinated_system", if network.coordinated_system { 1.0 } else { 0.0 });
    if let Some(speed) = network.progression_speed_mph {
        result.measure("progression_speed_mph", speed);
    }

    if !network.coordinated_system {
        result.data = "not in coordinated system".to_string();
        result.details =
            "NOT MET: intersection is not part of a coordinated signal system".to_string();
        result.conclude(vec![]);
        return Ok(result);
    }

    let spacing = network.adjacent_signal_spacing_ft.ok_or_else(|| {
        WarrantError::insufficient(
            WarrantId::CoordinatedSignalSystem,
            "network.adjacent_signal_spacing_ft",
        )
    })?;
    result.measure("adjacent_signal_spacing_ft", spacing);
    result.data = format!("{} ft to adjacent signal", spacing);

    let met = (limits.min_spacing_ft..=limits.max_spacing_ft).contains(&spacing);
    result.details = if met {
        format!("MET: adjacent signal {} ft away within a coordinated system", spacing)
    } else {
        format!(
            "NOT MET: adjacent signal spacing {} ft outside {}-{} ft",
            spacing, limits.min_spacing_ft, limits.max_spacing_ft
        )
    };

    result.conclude(if met { vec![Condition::CoordinatedSpacing] } else { vec![] });
    Ok(result)
}
