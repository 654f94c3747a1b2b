//! WARRANT 2: FOUR-HOUR VEHICULAR VOLUME
//!
//! Figure 4C-1 (normal) or Figure 4C-2 (reduced). Met when, for any four
//! hours of an average day, the plotted point of major-street volume
//! (both approaches) and higher-volume minor approach falls on or above
//! the curve for the lane configuration.

use super::{street_axes_note, Condition, EvaluationContext, HourCheck, WarrantId, WarrantResult};
use crate::error::{EngineResult, WarrantError};

pub fn evaluate_w2(ctx: &EvaluationContext) -> EngineResult<WarrantResult> {
    let intersection = ctx.intersection;
    let regime = intersection.regime;
    let required = ctx.tables.four_hour.hours_required;

    if intersection.hours.len() < required {
        return Err(WarrantError::insufficient(
            WarrantId::FourHourVolume,
            format!(
                "counts ({} hours of vehicle volumes required, {} supplied)",
                required,
                intersection.hours.len()
            ),
        ));
    }

    let (curve, curve_ref) = ctx.tables.four_hour_curve(regime, intersection.lanes)?;

    let mut result = WarrantResult::new(WarrantId::FourHourVolume, regime);
    let source = curve_ref.source.clone();
    result.thresholds.push(curve_ref);

    let mut qualifying = 0usize;
    for hour in &intersection.hours {
        let mut check = HourCheck::new(hour.hour, hour.major as f64, hour.minor as f64);
        if curve.is_met_by(check.major, check.minor) {
            qualifying += 1;
            check.satisfies.push(Condition::FourHourVolume);
        }
        result.hourly.push(check);
    }

    result.measure("hours_analysed", intersection.hours.len() as f64);
    result.measure("qualifying_hours", qualifying as f64);

    let met = qualifying >= required;
    result.data = format!("{} hrs above curve", qualifying);
    result.threshold = format!("{} hrs above {} ({})", required, source, intersection.lanes);
    result.details = format!(
        "{}: {} of {} required hours on or above {} ({} regime)",
        if met { "MET" } else { "NOT MET" },
        qualifying,
        required,
        source,
        regime
    );
    result.details.push_str(&format!("; {}", street_axes_note(intersection)));

    result.conclude(if met { vec![Condition::FourHourVolume] } else { vec![] });
    Ok(result)
}
