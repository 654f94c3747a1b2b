//! WARRANT 5: SCHOOL CROSSING
//!
//! A frequency and gap condition, not a volume curve: met when at least
//! 20 schoolchildren cross the major street during the highest crossing
//! hour and there are fewer adequate gaps than minutes in the crossing
//! period. Not applicable when another signal is within 300 ft.

use super::{Condition, EvaluationContext, WarrantId, WarrantResult};
use crate::error::{EngineResult, WarrantError};
use crate::tables::ThresholdRef;

pub fn evaluate_w5(ctx: &EvaluationContext) -> EngineResult<WarrantResult> {
    let limits = &ctx.tables.school;
    let school = ctx
        .inputs
        .school_crossing
        .as_ref()
        .ok_or_else(|| WarrantError::insufficient(WarrantId::SchoolCrossing, "school_crossing"))?;

    let mut result = WarrantResult::new(WarrantId::SchoolCrossing, ctx.intersection.regime);
    result.thresholds.push(ThresholdRef::scalar(
        &limits.source,
        "schoolchildren",
        "minimum per hour",
        limits.min_children_per_hour as f64,
    ));
    result.thresholds.push(ThresholdRef::scalar(
        &limits.source,
        "adequate gaps",
        "fewer than minutes in crossing period",
        f64::from(school.crossing_period_minutes),
    ));

    result.measure("schoolchildren_per_hour", school.schoolchildren_per_hour as f64);
    result.measure("adequate_gaps", f64::from(school.adequate_gaps));
    result.measure("crossing_period_minutes", f64::from(school.crossing_period_minutes));

    result.data = format!(
        "{} students/hr, {} gaps in {} min",
        school.schoolchildren_per_hour, school.adequate_gaps, school.crossing_period_minutes
    );
    result.threshold = format!(
        ">= {} students/hr, < {} gaps",
        limits.min_children_per_hour, school.crossing_period_minutes
    );

    if let Some(distance) = school.distance_to_nearest_signal_ft {
        result.measure("distance_to_nearest_signal_ft", distance);
        if distance < limits.min_signal_distance_ft {
            result.details = format!(
                "NOT MET: nearest signal {} ft away, less than {} ft",
                distance, limits.min_signal_distance_ft
            );
            result.conclude(vec![]);
            return Ok(result);
        }
    }

    let enough_children = school.schoolchildren_per_hour >= limits.min_children_per_hour;
    let too_few_gaps = school.adequate_gaps < school.crossing_period_minutes;

    result.details = match (enough_children, too_few_gaps) {
        (true, true) => format!(
            "MET: {} students/hr with only {} adequate gaps in {} minutes",
            school.schoolchildren_per_hour, school.adequate_gaps, school.crossing_period_minutes
        ),
        (false, _) => format!(
            "NOT MET: {} students/hr, fewer than {}",
            school.schoolchildren_per_hour, limits.min_children_per_hour
        ),
        (true, false) => format!(
            "NOT MET: {} adequate gaps already cover the {} minute crossing period",
            school.adequate_gaps, school.crossing_period_minutes
        ),
    };

    result.conclude(if enough_children && too_few_gaps {
        vec![Condition::SchoolGaps]
    } else {
        vec![]
    });
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SchoolCrossing;
    use crate::warrants::test_support::*;

    fn run(school: Option<SchoolCrossing>) -> EngineResult<WarrantResult> {
        let mut inputs = intersection_inputs(&uniform_hours(2, 600, 80), 30.0, 50_000, 1, 1);
        inputs.school_crossing = school;
        let intersection = classified(&inputs);
        let tables = tables();
        let ctx = EvaluationContext {
            tables: &tables,
            intersection: &intersection,
            inputs: &inputs,
        };
        evaluate_w5(&ctx)
    }

    fn crossing(children: i64, gaps: u32) -> SchoolCrossing {
        SchoolCrossing {
            schoolchildren_per_hour: children,
            adequate_gaps: gaps,
            crossing_period_minutes: 30,
            distance_to_nearest_signal_ft: None,
        }
    }

    #[test]
    fn test_children_and_gaps() {
        let result = run(Some(crossing(20, 12))).unwrap();
        assert_eq!(result.satisfied_by, vec![Condition::SchoolGaps]);

        assert!(!run(Some(crossing(19, 12))).unwrap().is_met());
        assert!(!run(Some(crossing(40, 30))).unwrap().is_met());
    }

    #[test]
    fn test_nearby_signal() {
        let mut school = crossing(50, 5);
        school.distance_to_nearest_signal_ft = Some(200.0);
        let result = run(Some(school)).unwrap();
        assert!(!result.is_met());
        assert!(result.details.contains("200"));
    }

    #[test]
    fn test_missing_school_data() {
        assert!(run(None).unwrap_err().is_warrant_scoped());
    }
}
