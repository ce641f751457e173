//! One-time baseline test that establishes estimated maximums and progression state.

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::{
    ExerciseCatalog, ExerciseID, PersonalRecord, ProgressionRule, Reps, User, Weight,
    estimate_one_rep_max,
};

pub const FOUNDATION_EXERCISES: [&str; 4] = ["squat", "bench", "deadlift", "ohp"];

/// Share of the estimated maximum used as the initial working weight.
const INITIAL_INTENSITY: f32 = 0.75;

#[derive(Debug, Clone, PartialEq)]
pub struct FoundationTest {
    pub exercise_id: ExerciseID,
    pub suggested_weight: Weight,
}

impl FoundationTest {
    pub const INSTRUCTIONS: &str =
        "Perform one set with moderate weight until failure (leave 1-2 reps in reserve)";
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoundationResult {
    pub exercise_id: ExerciseID,
    pub weight: Weight,
    pub reps: Reps,
}

/// Lists the AMRAP tests of the foundation session for the exercises known to the catalog.
#[must_use]
pub fn foundation_tests(catalog: &impl ExerciseCatalog) -> Vec<FoundationTest> {
    FOUNDATION_EXERCISES
        .iter()
        .map(|id| ExerciseID::from(*id))
        .filter(|id| catalog.contains(id))
        .map(|exercise_id| FoundationTest {
            suggested_weight: suggested_weight(&exercise_id),
            exercise_id,
        })
        .collect()
}

fn suggested_weight(exercise_id: &ExerciseID) -> Weight {
    Weight(match exercise_id.as_str() {
        "squat" | "deadlift" => 135.0,
        "ohp" => 65.0,
        _ => 95.0,
    })
}

impl User {
    /// Seeds progression rules, estimated maximums and personal records from baseline
    /// results.
    ///
    /// Prior state of each given exercise is replaced, state of other exercises is kept.
    /// Results for unknown exercises are ignored.
    pub fn complete_foundation_session(
        &mut self,
        catalog: &impl ExerciseCatalog,
        results: &[FoundationResult],
        now: DateTime<Utc>,
    ) {
        for result in results {
            if !catalog.contains(&result.exercise_id) {
                debug!(
                    "ignored foundation result of unknown exercise {}",
                    result.exercise_id
                );
                continue;
            }

            let estimated_one_rep_max = estimate_one_rep_max(result.weight, result.reps);
            let current_weight =
                Weight::clamped((estimated_one_rep_max.0 * INITIAL_INTENSITY).round());

            self.estimated_one_rep_maxes
                .insert(result.exercise_id.clone(), estimated_one_rep_max);
            self.progression_rules.insert(
                result.exercise_id.clone(),
                ProgressionRule::new(result.exercise_id.clone(), current_weight),
            );
            self.stats.personal_records.insert(
                result.exercise_id.clone(),
                PersonalRecord {
                    exercise_id: result.exercise_id.clone(),
                    weight: result.weight,
                    reps: result.reps,
                    estimated_one_rep_max,
                    date: now,
                },
            );
        }

        self.is_onboarded = true;
        info!("completed foundation session with {} results", results.len());
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use crate::Catalog;

    use super::*;

    static NOW: std::sync::LazyLock<DateTime<Utc>> =
        std::sync::LazyLock::new(|| Utc.with_ymd_and_hms(2024, 5, 6, 7, 0, 0).unwrap());

    fn result(exercise_id: &str, weight: f32, reps: u32) -> FoundationResult {
        FoundationResult {
            exercise_id: exercise_id.into(),
            weight: Weight(weight),
            reps: Reps(reps),
        }
    }

    #[test]
    fn test_foundation_tests() {
        assert_eq!(
            foundation_tests(&Catalog::default())
                .iter()
                .map(|t| (t.exercise_id.to_string(), t.suggested_weight))
                .collect::<Vec<_>>(),
            vec![
                (String::from("squat"), Weight(135.0)),
                (String::from("bench"), Weight(95.0)),
                (String::from("deadlift"), Weight(135.0)),
                (String::from("ohp"), Weight(65.0)),
            ]
        );
    }

    #[test]
    fn test_complete_foundation_session() {
        let mut user = User::new(String::from("Alice"));
        user.complete_foundation_session(
            &Catalog::default(),
            &[result("squat", 135.0, 8)],
            *NOW,
        );

        let squat = ExerciseID::from("squat");
        assert!(user.is_onboarded);
        assert_eq!(user.estimated_one_rep_max(&squat), Some(Weight(171.0)));
        assert_eq!(
            user.progression_rules[&squat],
            ProgressionRule::new(squat.clone(), Weight(128.0))
        );
        assert_eq!(user.progression_rules[&squat].successful_sessions(), 0);
        assert_eq!(
            user.stats.personal_records[&squat],
            PersonalRecord {
                exercise_id: squat.clone(),
                weight: Weight(135.0),
                reps: Reps(8),
                estimated_one_rep_max: Weight(171.0),
                date: *NOW,
            }
        );
    }

    #[test]
    fn test_complete_foundation_session_rerun_replaces() {
        let mut user = User::new(String::from("Alice"));
        let catalog = Catalog::default();
        user.complete_foundation_session(
            &catalog,
            &[result("squat", 135.0, 8), result("bench", 95.0, 10)],
            *NOW,
        );
        let squat = ExerciseID::from("squat");
        user.progression_rules.insert(
            squat.clone(),
            user.progression_rules[&squat].apply_outcome(false, Weight(128.0), *NOW),
        );
        user.update_personal_record(&catalog, &squat, Weight(200.0), Reps(5), *NOW);

        user.complete_foundation_session(&catalog, &[result("squat", 155.0, 5)], *NOW);

        assert_eq!(user.estimated_one_rep_max(&squat), Some(Weight(181.0)));
        assert_eq!(
            user.progression_rules[&squat],
            ProgressionRule::new(squat.clone(), Weight(136.0))
        );
        assert_eq!(
            user.stats.personal_records[&squat].estimated_one_rep_max,
            Weight(181.0)
        );
        assert_eq!(
            user.estimated_one_rep_max(&"bench".into()),
            Some(Weight(127.0))
        );
    }

    #[test]
    fn test_complete_foundation_session_unknown_exercise() {
        let mut user = User::new(String::from("Alice"));
        user.complete_foundation_session(&Catalog::default(), &[result("curl", 40.0, 10)], *NOW);
        assert!(user.is_onboarded);
        assert!(user.progression_rules.is_empty());
        assert!(user.stats.personal_records.is_empty());
    }
}
