//! WARRANT 8: ROADWAY NETWORK
//!
//! Applies only at the common intersection of two or more major routes.
//! Met when either:
//!   - Condition A: the weekday peak hour carries at least 1,000 vph
//!     entering and five-year projections meet Warrant 1, 2 or 3
//!   - Condition B: each of any five weekend hours carries at least
//!     1,000 vph entering

use super::{Condition, EvaluationContext, WarrantId, WarrantResult};
use crate::error::{EngineResult, WarrantError};
use crate::tables::ThresholdRef;

pub fn evaluate_w8(ctx: &EvaluationContext) -> EngineResult<WarrantResult> {
    let limits = &ctx.tables.network;
    let network = ctx
        .inputs
        .network
        .as_ref()
        .ok_or_else(|| WarrantError::insufficient(WarrantId::RoadwayNetwork, "network"))?;

    let minimum = u64::from(limits.min_entering_volume);

    let mut result = WarrantResult::new(WarrantId::RoadwayNetwork, ctx.intersection.regime);
    result.thresholds.push(ThresholdRef::scalar(
        &limits.source,
        "total entering volume",
        "minimum vph",
        f64::from(limits.min_entering_volume),
    ));
    result.thresholds.push(ThresholdRef::scalar(
        &limits.source,
        "weekend hours",
        "minimum count",
        limits.weekend_hours_required as f64,
    ));

    let peak = ctx.intersection.peak_entering_hour();
    let peak_entering = peak.map_or(0, |h| h.entering);
    let weekend_hours = network
        .weekend_entering_volumes
        .iter()
        .filter(|v| **v >= 0 && **v as u64 >= minimum)
        .count();

    result.measure("peak_hour_entering_volume", peak_entering as f64);
    result.measure("weekend_qualifying_hours", weekend_hours as f64);
    result.measure(
        "major_route_intersection",
        if network.major_route_intersection { 1.0 } else { 0.0 },
    );
    result.measure(
        "projected_volumes_meet_warrants",
        if network.projected_volumes_meet_warrants { 1.0 } else { 0.0 },
    );

    result.data = format!("{} vph peak entering, {} weekend hrs", peak_entering, weekend_hours);
    result.threshold = format!(
        ">= {} vph peak with projections, or {} weekend hrs",
        limits.min_entering_volume, limits.weekend_hours_required
    );

    if !network.major_route_intersection {
        result.details = "NOT MET: not the intersection of two or more major routes".to_string();
        result.conclude(vec![]);
        return Ok(result);
    }

    let mut satisfied = Vec::new();
    if peak_entering >= minimum && network.projected_volumes_meet_warrants {
        satisfied.push(Condition::NetworkWeekdayPeak);
    }
    if weekend_hours >= limits.weekend_hours_required {
        satisfied.push(Condition::NetworkWeekend);
    }

    result.details = format!(
        "{}: {} vph entering in the weekday peak hour{}, {} weekend hr(s) at {} vph or more",
        if satisfied.is_empty() { "NOT MET" } else { "MET" },
        peak_entering,
        if network.projected_volumes_meet_warrants {
            " with qualifying projections"
        } else {
            " without qualifying projections"
        },
        weekend_hours,
        limits.min_entering_volume
    );

    result.conclude(satisfied);
    Ok(result)
}
