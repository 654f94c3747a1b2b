//! WARRANT 9: INTERSECTION NEAR A GRADE CROSSING
//!
//! Applies when a railroad grade crossing lies on a minor-street approach
//! within 140 ft of the stop line. The minor-approach volume of the peak
//! entering hour is adjusted for rail traffic (Table 4C-2), high-occupancy
//! buses (Table 4C-3) and tractor-trailer trucks (Table 4C-4, split at
//! 70 ft of clear storage), then compared against the peak-hour curve
//! for the lane configuration and regime with a 25 vph floor.

use super::{Condition, EvaluationContext, HourCheck, WarrantId, WarrantResult};
use crate::error::{EngineResult, WarrantError};
use crate::tables::{ThresholdRef, COMPARE_EPSILON};

pub fn evaluate_w9(ctx: &EvaluationContext) -> EngineResult<WarrantResult> {
    let intersection = ctx.intersection;
    let limits = &ctx.tables.grade_crossing;

    let rail = ctx
        .inputs
        .grade_crossing
        .as_ref()
        .ok_or_else(|| WarrantError::insufficient(WarrantId::GradeCrossing, "grade_crossing"))?;

    let regime = intersection.regime;
    let mut result = WarrantResult::new(WarrantId::GradeCrossing, regime);

    result.measure("clear_storage_distance_ft", rail.clear_storage_distance_ft);
    result.measure("trains_per_day", f64::from(rail.trains_per_day));
    result.measure("preemption_needed", if rail.preemption_needed { 1.0 } else { 0.0 });
    result.thresholds.push(ThresholdRef::scalar(
        &limits.source,
        "clear storage distance",
        "maximum (ft)",
        limits.max_clear_storage_ft,
    ));
    result.data = format!(
        "{} ft, {} trains/day",
        rail.clear_storage_distance_ft, rail.trains_per_day
    );
    result.threshold = format!("<= {} ft to rail", limits.max_clear_storage_ft);

    let preemption = if rail.preemption_needed { "; preemption required" } else { "" };

    if rail.clear_storage_distance_ft > limits.max_clear_storage_ft {
        result.details = format!(
            "NOT MET: grade crossing {} ft from the stop line exceeds {} ft{}",
            rail.clear_storage_distance_ft, limits.max_clear_storage_ft, preemption
        );
        result.conclude(vec![]);
        return Ok(result);
    }

    if rail.trains_per_day == 0 {
        result.details = format!("NOT MET: no rail traffic on the crossing{}", preemption);
        result.conclude(vec![]);
        return Ok(result);
    }

    let peak = intersection.peak_entering_hour().ok_or_else(|| {
        WarrantError::insufficient(WarrantId::GradeCrossing, "counts (no hourly vehicle volumes)")
    })?;

    let trucks = if rail.clear_storage_distance_ft < limits.truck_split_distance_ft {
        &limits.truck_factors_short
    } else {
        &limits.truck_factors_long
    };

    let rail_factor = limits.rail_factors.factor_for(f64::from(rail.trains_per_day))?;
    let bus_factor = limits.bus_factors.factor_for(rail.high_occupancy_bus_pct)?;
    let truck_factor = trucks.factor_for(rail.tractor_trailer_pct)?;

    let adjusted_minor = peak.minor as f64 * rail_factor * bus_factor * truck_factor;

    let (curve, curve_ref) = ctx.tables.peak_hour_curve(regime, intersection.lanes)?;
    let source = curve_ref.source.clone();
    result.thresholds.push(curve_ref);
    result.thresholds.push(ThresholdRef::scalar(
        &limits.source,
        "adjusted minor volume",
        "floor (vph)",
        limits.minimum_minor_volume,
    ));
    for (table, factor) in [
        (&limits.rail_factors, rail_factor),
        (&limits.bus_factors, bus_factor),
        (trucks, truck_factor),
    ] {
        result.thresholds.push(ThresholdRef::scalar(&table.source, "adjustment", "factor", factor));
    }

    result.measure("peak_hour", f64::from(peak.hour));
    result.measure("major_volume", peak.major as f64);
    result.measure("minor_volume", peak.minor as f64);
    result.measure("rail_factor", rail_factor);
    result.measure("bus_factor", bus_factor);
    result.measure("truck_factor", truck_factor);
    result.measure("adjusted_minor_volume", adjusted_minor);

    let above_floor = adjusted_minor + COMPARE_EPSILON >= limits.minimum_minor_volume;
    let above_curve = curve.is_met_by(peak.major as f64, adjusted_minor);
    let met = above_floor && above_curve;

    let mut check = HourCheck::new(peak.hour, peak.major as f64, adjusted_minor);
    if met {
        check.satisfies.push(Condition::GradeCrossingAdjustedVolume);
    }
    result.hourly.push(check);

    result.data = format!(
        "{} ft, {} trains/day, {:.0} adj. vph minor",
        rail.clear_storage_distance_ft, rail.trains_per_day, adjusted_minor
    );
    result.threshold = format!(
        "<= {} ft to rail, adjusted minor above {}",
        limits.max_clear_storage_ft, source
    );
    result.details = format!(
        "{}: peak hour {:02}:00, {} vph major, \
         minor {} x {:.2} x {:.2} x {:.2} = {:.1} vph against {}{}",
        if met { "MET" } else { "NOT MET" },
        peak.hour,
        peak.major,
        peak.minor,
        rail_factor,
        bus_factor,
        truck_factor,
        adjusted_minor,
        source,
        preemption
    );

    result.conclude(if met { vec![Condition::GradeCrossingAdjustedVolume] } else { vec![] });
    Ok(result)
}
