//! WARRANT 1: EIGHT-HOUR VEHICULAR VOLUME
//!
//! Table 4C-1. Any eight hours of an average day:
//!   - Condition A (minimum vehicular volume)
//!   - Condition B (interruption of continuous traffic)
//!   - Combination: eight hours of A and eight hours of B, both at the
//!     80% column (56% under the reduced regime)
//!
//! Conditions A and B use the 100% column, or the 70% column under the
//! reduced regime. The combination is only reported when neither A nor B
//! is satisfied on its own.

use super::{street_axes_note, Condition, EvaluationContext, HourCheck, WarrantId, WarrantResult};
use crate::error::{EngineResult, WarrantError};
use crate::tables::{EightHourCondition, ThresholdColumn};

pub fn evaluate_w1(ctx: &EvaluationContext) -> EngineResult<WarrantResult> {
    let intersection = ctx.intersection;
    let regime = intersection.regime;
    let lanes = intersection.lanes;
    let required = ctx.tables.eight_hour.hours_required;

    if intersection.hours.len() < required {
        return Err(WarrantError::insufficient(
            WarrantId::EightHourVolume,
            format!(
                "counts ({} hours of vehicle volumes required, {} supplied)",
                required,
                intersection.hours.len()
            ),
        ));
    }

    let single = ThresholdColumn::single(regime);
    let combined = ThresholdColumn::combined(regime);

    let (a, a_ref) = ctx.tables.eight_hour(EightHourCondition::A, lanes, single)?;
    let (b, b_ref) = ctx.tables.eight_hour(EightHourCondition::B, lanes, single)?;
    let (comb_a, comb_a_ref) = ctx.tables.eight_hour(EightHourCondition::A, lanes, combined)?;
    let (comb_b, comb_b_ref) = ctx.tables.eight_hour(EightHourCondition::B, lanes, combined)?;

    let mut result = WarrantResult::new(WarrantId::EightHourVolume, regime);
    result.thresholds = vec![a_ref, b_ref, comb_a_ref, comb_b_ref];

    let (mut hours_a, mut hours_b) = (0usize, 0usize);
    let (mut hours_comb_a, mut hours_comb_b) = (0usize, 0usize);

    for hour in &intersection.hours {
        let mut check = HourCheck::new(hour.hour, hour.major as f64, hour.minor as f64);

        if a.is_met_by(hour.major, hour.minor) {
            hours_a += 1;
            check.satisfies.push(Condition::EightHourA);
        }
        if b.is_met_by(hour.major, hour.minor) {
            hours_b += 1;
            check.satisfies.push(Condition::EightHourB);
        }
        if comb_a.is_met_by(hour.major, hour.minor) {
            hours_comb_a += 1;
        }
        if comb_b.is_met_by(hour.major, hour.minor) {
            hours_comb_b += 1;
        }

        result.hourly.push(check);
    }

    result.measure("hours_analysed", intersection.hours.len() as f64);
    result.measure("condition_a_hours", hours_a as f64);
    result.measure("condition_b_hours", hours_b as f64);
    result.measure("combination_a_hours", hours_comb_a as f64);
    result.measure("combination_b_hours", hours_comb_b as f64);

    let mut satisfied = Vec::new();
    if hours_a >= required {
        satisfied.push(Condition::EightHourA);
    }
    if hours_b >= required {
        satisfied.push(Condition::EightHourB);
    }
    if satisfied.is_empty() && hours_comb_a >= required && hours_comb_b >= required {
        satisfied.push(Condition::EightHourCombination);
    }

    result.data = format!("{} hrs Condition A, {} hrs Condition B", hours_a, hours_b);
    result.threshold = format!(
        "{} hrs at A {}/{} vph or B {}/{} vph ({})",
        required, a.major, a.minor, b.major, b.minor, single
    );
    result.details = if satisfied.is_empty() {
        format!(
            "NOT MET: {} of {} required hours meet Condition A, {} meet Condition B \
             ({} regime, {})",
            hours_a, required, hours_b, regime, lanes
        )
    } else if satisfied.contains(&Condition::EightHourCombination) {
        format!(
            "MET: combination of Conditions A and B, {} hrs at {}/{} and {} hrs at {}/{} ({})",
            hours_comb_a,
            comb_a.major,
            comb_a.minor,
            hours_comb_b,
            comb_b.major,
            comb_b.minor,
            combined
        )
    } else {
        format!(
            "MET: {} hrs Condition A, {} hrs Condition B against {} required ({} regime, {})",
            hours_a, hours_b, required, regime, lanes
        )
    };
    result.details.push_str(&format!("; {}", street_axes_note(intersection)));

    result.conclude(satisfied);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ReductionRegime;
    use crate::warrants::test_support::*;
    use crate::warrants::Outcome;
    use approx::assert_relative_eq;

    fn run(hours: &[(u8, i64, i64)], speed: f64, population: i64) -> EngineResult<WarrantResult> {
        let inputs = intersection_inputs(hours, speed, population, 1, 1);
        let intersection = classified(&inputs);
        let tables = tables();
        let ctx = EvaluationContext {
            tables: &tables,
            intersection: &intersection,
            inputs: &inputs,
        };
        evaluate_w1(&ctx)
    }

    #[test]
    fn test_condition_a_met_at_full_thresholds() {
        let result = run(&uniform_hours(8, 500, 150), 35.0, 50_000).unwrap();
        assert!(result.is_met());
        assert_eq!(result.regime, ReductionRegime::Normal);
        assert_eq!(result.satisfied_by, vec![Condition::EightHourA]);
        assert_relative_eq!(result.measures["condition_a_hours"], 8.0);
    }

    #[test]
    fn test_condition_b_reported_separately() {
        let result = run(&uniform_hours(8, 800, 80), 35.0, 50_000).unwrap();
        assert_eq!(result.satisfied_by, vec![Condition::EightHourB]);
        assert!(result.hourly.iter().all(|h| h.satisfies(Condition::EightHourB)));
    }

    #[test]
    fn test_exact_threshold_meets() {
        let result = run(&uniform_hours(8, 500, 150), 35.0, 50_000).unwrap();
        assert!(result.is_met());

        let result = run(&uniform_hours(8, 499, 150), 35.0, 50_000).unwrap();
        assert_eq!(result.outcome, Outcome::NotMet);
    }

    #[test]
    fn test_seven_hours_is_not_enough() {
        let mut hours = uniform_hours(7, 600, 200);
        hours.push((14, 100, 20));
        let result = run(&hours, 35.0, 50_000).unwrap();
        assert!(!result.is_met());
        assert_relative_eq!(result.measures["condition_a_hours"], 7.0);
    }

    #[test]
    fn test_combination_under_reduced_regime() {
        // 45 mph, 8,000 people: 70% column (350/105, 525/53) fails,
        // 56% combination (280/84 and 420/42) passes
        let result = run(&uniform_hours(8, 500, 100), 45.0, 8_000).unwrap();
        assert_eq!(result.regime, ReductionRegime::Reduced70);
        assert_eq!(result.satisfied_by, vec![Condition::EightHourCombination]);
        assert!(result.thresholds.iter().any(|t| t.column == "56%"));
    }

    #[test]
    fn test_combination_not_reported_when_a_alone_passes() {
        let result = run(&uniform_hours(8, 800, 160), 35.0, 50_000).unwrap();
        assert!(result.satisfied_by.contains(&Condition::EightHourA));
        assert!(!result.satisfied_by.contains(&Condition::EightHourCombination));
    }

    #[test]
    fn test_minor_street_surge_swaps_the_volume_axes() {
        let hours = uniform_hours(8, 600, 200);
        let before = run(&hours, 35.0, 50_000).unwrap();
        assert!(before.is_met());
        assert!(before.details.contains("major street Main Street (4800 veh/day)"));

        // Oak now carries 6,400 vehicles a day against Main's 4,800
        let mut surged = hours.clone();
        surged[0].2 = 5_000;
        let after = run(&surged, 35.0, 50_000).unwrap();
        assert!(!after.is_met());
        assert!(after.details.contains("major street Oak Avenue (6400 veh/day)"));
        assert_relative_eq!(after.hourly[0].major, 5_000.0);
        assert_relative_eq!(after.hourly[0].minor, 600.0);
    }

    #[test]
    fn test_missing_hours_is_insufficient_data() {
        let err = run(&uniform_hours(4, 600, 200), 35.0, 50_000).unwrap_err();
        assert!(matches!(
            err,
            WarrantError::InsufficientData { warrant: Some(WarrantId::EightHourVolume), .. }
        ));
    }
}
