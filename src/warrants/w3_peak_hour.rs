//! WARRANT 3: PEAK HOUR
//!
//! Met when, for any one hour of an average day, either:
//!   - Condition A: minor-approach stopped-time delay, minor-approach
//!     volume and total entering volume all meet their limits
//!     (requires a delay study for that hour)
//!   - Condition B: the plotted point falls on or above Figure 4C-3
//!     (normal) or Figure 4C-4 (reduced)
//!
//! Every counted hour is checked, so raising any hour's volume can only
//! add qualifying hours.

use super::{Condition, EvaluationContext, HourCheck, WarrantId, WarrantResult};
use crate::error::{EngineResult, WarrantError};
use crate::tables::{Lanes, ThresholdRef};

pub fn evaluate_w3(ctx: &EvaluationContext) -> EngineResult<WarrantResult> {
    let intersection = ctx.intersection;
    let regime = intersection.regime;

    if intersection.hours.is_empty() {
        return Err(WarrantError::insufficient(
            WarrantId::PeakHour,
            "counts (no hourly vehicle volumes)",
        ));
    }

    let (curve, curve_ref) = ctx.tables.peak_hour_curve(regime, intersection.lanes)?;
    let source = curve_ref.source.clone();

    let mut result = WarrantResult::new(WarrantId::PeakHour, regime);
    result.thresholds.push(curve_ref);

    let mut curve_hours = 0usize;
    for hour in &intersection.hours {
        let mut check = HourCheck::new(hour.hour, hour.major as f64, hour.minor as f64);
        if curve.is_met_by(check.major, check.minor) {
            curve_hours += 1;
            check.satisfies.push(Condition::PeakHourVolume);
        }
        result.hourly.push(check);
    }
    result.measure("curve_hours", curve_hours as f64);

    let mut satisfied = Vec::new();
    let mut notes = Vec::new();

    // Condition A: one studied hour
    if let Some(study) = &ctx.inputs.delay_study {
        let delay = &ctx.tables.peak_hour.delay;
        let (delay_limit, minor_limit) = match intersection.lanes.minor {
            Lanes::One => (delay.delay_one_lane_vehicle_hours, delay.minor_volume_one_lane),
            Lanes::TwoOrMore => (delay.delay_two_lane_vehicle_hours, delay.minor_volume_two_lane),
        };
        let entering_limit = if intersection.approach_count >= 4 {
            delay.entering_four_approaches
        } else {
            delay.entering_three_approaches
        };

        result.thresholds.push(ThresholdRef::scalar(
            &delay.source,
            &intersection.lanes.minor.to_string(),
            "stopped delay (veh-hr)",
            delay_limit,
        ));
        result.thresholds.push(ThresholdRef::scalar(
            &delay.source,
            &intersection.lanes.minor.to_string(),
            "minor approach volume (vph)",
            f64::from(minor_limit),
        ));
        result.thresholds.push(ThresholdRef::scalar(
            &delay.source,
            &format!("{} approaches", intersection.approach_count),
            "total entering volume (vph)",
            f64::from(entering_limit),
        ));

        result.measure(
            "minor_approach_delay_vehicle_hours",
            study.minor_approach_delay_vehicle_hours,
        );

        match intersection.hour(study.hour) {
            Some(hour) => {
                result.measure("delay_hour_minor_volume", hour.minor as f64);
                result.measure("delay_hour_entering_volume", hour.entering as f64);

                let met = study.minor_approach_delay_vehicle_hours >= delay_limit
                    && hour.minor >= u64::from(minor_limit)
                    && hour.entering >= u64::from(entering_limit);

                if met {
                    satisfied.push(Condition::PeakHourDelay);
                    if let Some(check) = result.hourly.iter_mut().find(|c| c.hour == study.hour) {
                        check.satisfies.push(Condition::PeakHourDelay);
                    }
                }
                notes.push(format!(
                    "Condition A {}: {:.1} veh-hr delay, {} vph minor, {} vph entering at hour {}",
                    if met { "met" } else { "not met" },
                    study.minor_approach_delay_vehicle_hours,
                    hour.minor,
                    hour.entering,
                    study.hour
                ));
            }
            None => notes.push(format!(
                "Condition A not assessed: delay study hour {} has no counts",
                study.hour
            )),
        }
    } else {
        notes.push("Condition A not assessed: no delay study".to_string());
    }

    if curve_hours > 0 {
        satisfied.push(Condition::PeakHourVolume);
    }
    notes.push(format!("Condition B: {} hr(s) on or above {}", curve_hours, source));

    let peak = intersection
        .hours
        .iter()
        .max_by_key(|h| (h.major + h.minor, std::cmp::Reverse(h.hour)));
    if let Some(peak) = peak {
        result.data = format!("peak {} / {} vph at {:02}:00", peak.major, peak.minor, peak.hour);
        result.measure("peak_major_volume", peak.major as f64);
        result.measure("peak_minor_volume", peak.minor as f64);
    }
    result.threshold = format!("1 hr above {} ({})", source, intersection.lanes);
    result.details = format!(
        "{}: {}",
        if satisfied.is_empty() { "NOT MET" } else { "MET" },
        notes.join("; ")
    );

    result.conclude(satisfied);
    Ok(result)
}
