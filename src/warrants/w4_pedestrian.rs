//! WARRANT 4: PEDESTRIAN VOLUME
//!
//! Compares major-street vehicles (both approaches) against pedestrians
//! crossing the major street:
//!   - Criterion A: four hours on or above Figure 4C-5 / 4C-6
//!   - Criterion B: one hour on or above Figure 4C-7 / 4C-8
//!
//! Uses its own reduction decision (35 mph cutoff), never the regime the
//! other warrants use.
//!
//! Screens that make the warrant not applicable:
//!   - nearest traffic control signal closer than 300 ft
//!   - as many adequate gaps per hour as the maximum (60)

use super::{Condition, EvaluationContext, HourCheck, WarrantId, WarrantResult};
use crate::error::{EngineResult, WarrantError};
use crate::tables::{PedestrianCriterion, ThresholdRef};

pub fn evaluate_w4(ctx: &EvaluationContext) -> EngineResult<WarrantResult> {
    let intersection = ctx.intersection;
    let regime = intersection.pedestrian_regime;
    let limits = &ctx.tables.pedestrian;

    let study = ctx
        .inputs
        .pedestrian_study
        .as_ref()
        .ok_or_else(|| {
            WarrantError::insufficient(WarrantId::PedestrianVolume, "pedestrian_study")
        })?;

    let unmatched = unmatched_hours_note(&intersection.unmatched_pedestrian_hours);

    if !intersection.has_pedestrian_counts {
        let field = match &unmatched {
            Some(note) => format!("counts (vehicle counts for the {})", note),
            None => "counts (pedestrian counts crossing the major street)".to_string(),
        };
        return Err(WarrantError::insufficient(WarrantId::PedestrianVolume, field));
    }

    let mut result = WarrantResult::new(WarrantId::PedestrianVolume, regime);
    result.measure("distance_to_nearest_signal_ft", study.distance_to_nearest_signal_ft);
    result.measure("adequate_gaps_per_hour", f64::from(study.adequate_gaps_per_hour));
    result.thresholds.push(ThresholdRef::scalar(
        "Section 4C.05",
        "nearest signal",
        "minimum distance (ft)",
        limits.min_signal_distance_ft,
    ));
    result.thresholds.push(ThresholdRef::scalar(
        "Section 4C.05",
        "adequate gaps",
        "maximum per hour",
        f64::from(limits.max_adequate_gaps_per_hour),
    ));

    let peak_pedestrians = intersection.hours.iter().map(|h| h.pedestrians).max().unwrap_or(0);
    result.data = format!("{} peds/hr peak", peak_pedestrians);

    if study.distance_to_nearest_signal_ft < limits.min_signal_distance_ft {
        result.threshold = format!("nearest signal >= {} ft", limits.min_signal_distance_ft);
        result.details = format!(
            "NOT MET: nearest signal {} ft away, less than {} ft",
            study.distance_to_nearest_signal_ft, limits.min_signal_distance_ft
        );
        result.conclude(vec![]);
        return Ok(result);
    }

    if study.adequate_gaps_per_hour >= limits.max_adequate_gaps_per_hour {
        result.threshold =
            format!("fewer than {} adequate gaps/hr", limits.max_adequate_gaps_per_hour);
        result.details = format!(
            "NOT MET: {} adequate gaps per hour already allow crossing",
            study.adequate_gaps_per_hour
        );
        result.conclude(vec![]);
        return Ok(result);
    }

    let (four_hour, four_ref) = ctx.tables.pedestrian_curve(PedestrianCriterion::FourHour, regime)?;
    let (peak_hour, peak_ref) = ctx.tables.pedestrian_curve(PedestrianCriterion::PeakHour, regime)?;
    let four_source = four_ref.source.clone();
    let peak_source = peak_ref.source.clone();
    result.thresholds.push(four_ref);
    result.thresholds.push(peak_ref);

    let (mut four_hours, mut peak_hours) = (0usize, 0usize);
    for hour in &intersection.hours {
        let mut check = HourCheck::new(hour.hour, hour.major as f64, hour.pedestrians as f64);
        if four_hour.is_met_by(check.major, check.minor) {
            four_hours += 1;
            check.satisfies.push(Condition::PedestrianFourHour);
        }
        if peak_hour.is_met_by(check.major, check.minor) {
            peak_hours += 1;
            check.satisfies.push(Condition::PedestrianPeakHour);
        }
        result.hourly.push(check);
    }

    result.measure("four_hour_criterion_hours", four_hours as f64);
    result.measure("peak_hour_criterion_hours", peak_hours as f64);
    result.measure("peak_pedestrians_per_hour", peak_pedestrians as f64);

    let mut satisfied = Vec::new();
    if four_hours >= limits.four_hour_hours_required {
        satisfied.push(Condition::PedestrianFourHour);
    }
    if peak_hours > 0 {
        satisfied.push(Condition::PedestrianPeakHour);
    }

    result.threshold = format!(
        "{} hrs above {} or 1 hr above {}",
        limits.four_hour_hours_required, four_source, peak_source
    );
    result.details = format!(
        "{}: {} hr(s) above {}, {} hr(s) above {} ({} regime)",
        if satisfied.is_empty() { "NOT MET" } else { "MET" },
        four_hours,
        four_source,
        peak_hours,
        peak_source,
        regime
    );
    if let Some(note) = unmatched {
        result.details.push_str(&format!("; ignored {} with no vehicle count", note));
    }

    result.conclude(satisfied);
    Ok(result)
}

fn unmatched_hours_note(hours: &[u8]) -> Option<String> {
    if hours.is_empty() {
        return None;
    }
    let listed: Vec<String> = hours.iter().map(|h| format!("{:02}:00", h)).collect();
    Some(format!("pedestrian counts at {}", listed.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ReductionRegime;
    use crate::model::PedestrianStudy;
    use crate::warrants::test_support::*;

    fn run(
        speed: f64,
        pedestrians: i64,
        study: Option<PedestrianStudy>,
    ) -> EngineResult<WarrantResult> {
        let mut inputs = intersection_inputs(&uniform_hours(4, 600, 80), speed, 50_000, 1, 1);
        inputs.pedestrian_study = study;
        if pedestrians > 0 {
            for hour in 7..11 {
                inputs.approaches[0].counts.push(pedestrian_count("main_nb", hour, pedestrians));
            }
        }
        let intersection = classified(&inputs);
        let tables = tables();
        let ctx = EvaluationContext {
            tables: &tables,
            intersection: &intersection,
            inputs: &inputs,
        };
        evaluate_w4(&ctx)
    }

    fn study() -> PedestrianStudy {
        PedestrianStudy { adequate_gaps_per_hour: 10, distance_to_nearest_signal_ft: 800.0 }
    }

    #[test]
    fn test_four_hour_criterion() {
        // Figure 4C-5 needs 115 at 600 vph
        let result = run(30.0, 120, Some(study())).unwrap();
        assert_eq!(result.regime, ReductionRegime::Normal);
        assert_eq!(result.satisfied_by, vec![Condition::PedestrianFourHour]);
    }

    #[test]
    fn test_own_regime_between_35_and_40_mph() {
        // 38 mph: other warrants stay normal, Warrant 4 drops to Figure 4C-6 (70 at 600 vph)
        let result = run(38.0, 80, Some(study())).unwrap();
        assert_eq!(result.regime, ReductionRegime::Reduced70);
        assert!(result.is_met());
        assert!(result.thresholds.iter().any(|t| t.source == "Figure 4C-6"));

        let normal = run(30.0, 80, Some(study())).unwrap();
        assert!(!normal.is_met());
    }

    #[test]
    fn test_close_signal_screen() {
        let close = PedestrianStudy {
            adequate_gaps_per_hour: 10,
            distance_to_nearest_signal_ft: 250.0,
        };
        let result = run(30.0, 300, Some(close)).unwrap();
        assert!(!result.is_met());
        assert!(result.is_evaluated());
        assert!(result.details.contains("250"));
    }

    #[test]
    fn test_plentiful_gaps_screen() {
        let gaps = PedestrianStudy {
            adequate_gaps_per_hour: 60,
            distance_to_nearest_signal_ft: 800.0,
        };
        assert!(!run(30.0, 300, Some(gaps)).unwrap().is_met());
    }

    #[test]
    fn test_pedestrian_hours_without_vehicle_counts_are_noted() {
        let mut inputs = intersection_inputs(&uniform_hours(4, 600, 80), 30.0, 50_000, 1, 1);
        inputs.pedestrian_study = Some(study());
        for hour in [5, 7, 8, 9, 10] {
            inputs.approaches[0].counts.push(pedestrian_count("main_nb", hour, 120));
        }
        let intersection = classified(&inputs);
        let tables = tables();
        let ctx = EvaluationContext {
            tables: &tables,
            intersection: &intersection,
            inputs: &inputs,
        };

        let result = evaluate_w4(&ctx).unwrap();
        assert!(result.is_met());
        assert!(result.details.contains("ignored pedestrian counts at 05:00"));
    }

    #[test]
    fn test_only_unmatched_pedestrian_hours_is_insufficient_data() {
        let mut inputs = intersection_inputs(&uniform_hours(4, 600, 80), 30.0, 50_000, 1, 1);
        inputs.pedestrian_study = Some(study());
        inputs.approaches[0].counts.push(pedestrian_count("main_nb", 20, 300));
        let intersection = classified(&inputs);
        let tables = tables();
        let ctx = EvaluationContext {
            tables: &tables,
            intersection: &intersection,
            inputs: &inputs,
        };

        let err = evaluate_w4(&ctx).unwrap_err();
        assert!(err.is_warrant_scoped());
        assert!(err.to_string().contains("20:00"));
    }

    #[test]
    fn test_missing_study_or_counts_is_insufficient_data() {
        assert!(run(30.0, 120, None).unwrap_err().is_warrant_scoped());
        assert!(run(30.0, 0, Some(study())).unwrap_err().is_warrant_scoped());
    }
}
