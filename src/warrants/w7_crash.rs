//! WARRANT 7: CRASH EXPERIENCE
//!
//! Three-way conjunction, each leg reported:
//!   - A: adequate trial of alternatives has failed to reduce crashes
//!   - B: five or more correctable crashes within 12 months
//!   - C: eight hours meeting Table 4C-1 Condition A or B at the 80%
//!     column (56% under the reduced regime)

use super::{Condition, EvaluationContext, HourCheck, WarrantId, WarrantResult};
use crate::error::{EngineResult, WarrantError};
use crate::tables::{EightHourCondition, ThresholdColumn, ThresholdRef};

pub fn evaluate_w7(ctx: &EvaluationContext) -> EngineResult<WarrantResult> {
    let intersection = ctx.intersection;
    let regime = intersection.regime;
    let limits = &ctx.tables.crash;

    let crash = ctx
        .inputs
        .crash_record
        .as_ref()
        .ok_or_else(|| WarrantError::insufficient(WarrantId::CrashExperience, "crash_record"))?;

    if intersection.hours.len() < limits.hours_required {
        return Err(WarrantError::insufficient(
            WarrantId::CrashExperience,
            format!(
                "counts ({} hours of vehicle volumes required, {} supplied)",
                limits.hours_required,
                intersection.hours.len()
            ),
        ));
    }

    let column = ThresholdColumn::combined(regime);
    let (a, a_ref) = ctx.tables.eight_hour(EightHourCondition::A, intersection.lanes, column)?;
    let (b, b_ref) = ctx.tables.eight_hour(EightHourCondition::B, intersection.lanes, column)?;

    let mut result = WarrantResult::new(WarrantId::CrashExperience, regime);
    result.thresholds.push(ThresholdRef::scalar(
        &limits.source,
        "correctable crashes",
        "minimum in 12 months",
        f64::from(limits.min_correctable_crashes),
    ));
    result.thresholds.push(a_ref);
    result.thresholds.push(b_ref);

    let mut volume_hours = 0usize;
    for hour in &intersection.hours {
        let mut check = HourCheck::new(hour.hour, hour.major as f64, hour.minor as f64);
        if a.is_met_by(hour.major, hour.minor) || b.is_met_by(hour.major, hour.minor) {
            volume_hours += 1;
            check.satisfies.push(Condition::CrashVolume);
        }
        result.hourly.push(check);
    }

    let alternatives = crash.alternatives_tried;
    let frequency = crash.correctable_crashes >= limits.min_correctable_crashes;
    let volume = volume_hours >= limits.hours_required;

    result.measure("correctable_crashes", f64::from(crash.correctable_crashes));
    result.measure("alternatives_tried", if alternatives { 1.0 } else { 0.0 });
    result.measure("volume_hours", volume_hours as f64);
    for (name, value) in [
        ("total_reported_crashes", crash.total_reported),
        ("right_angle_crashes", crash.right_angle),
        ("left_turn_crashes", crash.left_turn),
        ("pedestrian_crashes", crash.pedestrian),
    ] {
        if let Some(v) = value {
            result.measure(name, f64::from(v));
        }
    }

    let leg = |ok: bool| if ok { "yes" } else { "no" };
    result.data = format!(
        "{} crashes/yr, {} hrs at {}",
        crash.correctable_crashes, volume_hours, column
    );
    result.threshold = format!(
        ">= {} crashes, alternatives tried, {} hrs at {}",
        limits.min_correctable_crashes, limits.hours_required, column
    );

    let met = alternatives && frequency && volume;
    result.details = format!(
        "{}: alternatives tried {}, {} correctable crashes ({} required) {}, \
         {} hrs at {} column ({} required) {}",
        if met { "MET" } else { "NOT MET" },
        leg(alternatives),
        crash.correctable_crashes,
        limits.min_correctable_crashes,
        leg(frequency),
        volume_hours,
        column,
        limits.hours_required,
        leg(volume)
    );

    result.conclude(if met {
        vec![Condition::CrashAlternativesTried, Condition::CrashFrequency, Condition::CrashVolume]
    } else {
        vec![]
    });
    Ok(result)
}
