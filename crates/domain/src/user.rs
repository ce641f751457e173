use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use derive_more::Deref;
use log::debug;
use uuid::Uuid;

use crate::{
    ExerciseCatalog, ExerciseID, Prescription, ProgressionRule, Reps, Time, Unit, Weight,
    WorkoutSummary, estimate_one_rep_max, prescribe_next,
};

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserID,
    pub name: String,
    pub is_onboarded: bool,
    pub estimated_one_rep_maxes: BTreeMap<ExerciseID, Weight>,
    pub progression_rules: BTreeMap<ExerciseID, ProgressionRule>,
    pub stats: UserStats,
    pub preferences: Preferences,
}

impl User {
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            id: UserID::from(Uuid::new_v4()),
            name,
            is_onboarded: false,
            estimated_one_rep_maxes: BTreeMap::new(),
            progression_rules: BTreeMap::new(),
            stats: UserStats::default(),
            preferences: Preferences::default(),
        }
    }

    #[must_use]
    pub fn estimated_one_rep_max(&self, exercise_id: &ExerciseID) -> Option<Weight> {
        self.estimated_one_rep_maxes.get(exercise_id).copied()
    }

    #[must_use]
    pub fn prescribe_next(&self, exercise_id: &ExerciseID) -> Prescription {
        prescribe_next(
            self.progression_rules.get(exercise_id),
            self.estimated_one_rep_max(exercise_id),
            self.preferences.unit,
        )
    }

    /// Replaces the personal record of an exercise if the estimated maximum of the
    /// given performance strictly exceeds the stored one.
    ///
    /// Returns whether the record was replaced. Unknown exercises are ignored.
    pub fn update_personal_record(
        &mut self,
        catalog: &impl ExerciseCatalog,
        exercise_id: &ExerciseID,
        weight: Weight,
        reps: Reps,
        now: DateTime<Utc>,
    ) -> bool {
        if !catalog.contains(exercise_id) {
            debug!("ignored personal record of unknown exercise {exercise_id}");
            return false;
        }

        let estimated_one_rep_max = estimate_one_rep_max(weight, reps);

        if self
            .stats
            .personal_records
            .get(exercise_id)
            .is_some_and(|pr| estimated_one_rep_max <= pr.estimated_one_rep_max)
        {
            return false;
        }

        debug!(
            "new personal record for {exercise_id}: {weight} x {reps} ({estimated_one_rep_max})"
        );
        self.stats.personal_records.insert(
            exercise_id.clone(),
            PersonalRecord {
                exercise_id: exercise_id.clone(),
                weight,
                reps,
                estimated_one_rep_max,
                date: now,
            },
        );
        self.estimated_one_rep_maxes
            .insert(exercise_id.clone(), estimated_one_rep_max);

        true
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UserID(Uuid);

impl UserID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for UserID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for UserID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Preferences {
    pub unit: Unit,
    pub default_rest_time: Time,
    pub sound_enabled: bool,
    pub haptic_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            unit: Unit::Pounds,
            default_rest_time: Time(180),
            sound_enabled: true,
            haptic_enabled: true,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct UserStats {
    pub total_workouts: u32,
    /// Number of sets of all finished workouts, whether completed or not.
    pub total_sets: u32,
    /// Sum of weight times reps over all completed sets of all workouts.
    pub total_volume: f64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub personal_records: BTreeMap<ExerciseID, PersonalRecord>,
}

impl UserStats {
    /// Folds a completed workout into the aggregate counters.
    ///
    /// The streak counts consecutive calendar days with at least one workout.
    pub fn record_workout(
        &mut self,
        summary: &WorkoutSummary,
        date: NaiveDate,
        previous_date: Option<NaiveDate>,
    ) {
        self.total_workouts += 1;
        self.total_sets += summary.total_sets;
        self.total_volume += summary.volume;

        self.current_streak = match previous_date.map(|previous| (date - previous).num_days()) {
            Some(0) => self.current_streak.max(1),
            Some(1) => self.current_streak + 1,
            _ => 1,
        };
        self.longest_streak = self.longest_streak.max(self.current_streak);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonalRecord {
    pub exercise_id: ExerciseID,
    pub weight: Weight,
    pub reps: Reps,
    pub estimated_one_rep_max: Weight,
    pub date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::Catalog;

    use super::*;

    static NOW: std::sync::LazyLock<DateTime<Utc>> =
        std::sync::LazyLock::new(|| Utc.with_ymd_and_hms(2024, 5, 6, 7, 0, 0).unwrap());

    fn user_with_record(estimated_one_rep_max: f32) -> User {
        let mut user = User::new(String::from("Alice"));
        user.stats.personal_records.insert(
            "squat".into(),
            PersonalRecord {
                exercise_id: "squat".into(),
                weight: Weight(180.0),
                reps: Reps(3),
                estimated_one_rep_max: Weight(estimated_one_rep_max),
                date: *NOW,
            },
        );
        user.estimated_one_rep_maxes
            .insert("squat".into(), Weight(estimated_one_rep_max));
        user
    }

    #[rstest]
    #[case::lower(Weight(167.0), Reps(5), false)]
    #[case::tie(Weight(200.0), Reps(1), false)]
    #[case::higher(Weight(201.0), Reps(1), true)]
    fn test_update_personal_record(
        #[case] weight: Weight,
        #[case] reps: Reps,
        #[case] replaced: bool,
    ) {
        let mut user = user_with_record(200.0);
        let before = user.clone();
        let later = *NOW + chrono::Duration::days(2);

        assert_eq!(
            user.update_personal_record(&Catalog::default(), &"squat".into(), weight, reps, later),
            replaced
        );

        if replaced {
            let record = &user.stats.personal_records[&ExerciseID::from("squat")];
            assert_eq!(record.weight, weight);
            assert_eq!(record.reps, reps);
            assert_eq!(record.date, later);
            assert_eq!(
                user.estimated_one_rep_max(&"squat".into()),
                Some(record.estimated_one_rep_max)
            );
            assert_eq!(user.stats.personal_records.len(), 1);
        } else {
            assert_eq!(user, before);
        }
    }

    #[test]
    fn test_update_personal_record_first() {
        let mut user = User::new(String::new());
        assert!(user.update_personal_record(
            &Catalog::default(),
            &"bench".into(),
            Weight(135.0),
            Reps(5),
            *NOW
        ));
        assert_eq!(
            user.estimated_one_rep_max(&"bench".into()),
            Some(Weight(158.0))
        );
    }

    #[test]
    fn test_update_personal_record_unknown_exercise() {
        let mut user = User::new(String::new());
        assert!(!user.update_personal_record(
            &Catalog::default(),
            &"curl".into(),
            Weight(50.0),
            Reps(10),
            *NOW
        ));
        assert!(user.stats.personal_records.is_empty());
    }

    #[test]
    fn test_prescribe_next_untested() {
        let user = User::new(String::new());
        assert_eq!(
            user.prescribe_next(&"squat".into()),
            Prescription::UNTESTED
        );
    }

    #[rstest]
    #[case(None, 1, 1)]
    #[case(Some(NaiveDate::from_ymd_opt(2024, 5, 5).unwrap()), 4, 5)]
    #[case(Some(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()), 3, 5)]
    #[case(Some(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()), 1, 5)]
    fn test_record_workout(
        #[case] previous_date: Option<NaiveDate>,
        #[case] current_streak: u32,
        #[case] longest_streak: u32,
    ) {
        let mut stats = UserStats {
            total_workouts: 7,
            total_sets: 40,
            total_volume: 10_000.0,
            current_streak: if previous_date.is_some() { 3 } else { 0 },
            longest_streak: if previous_date.is_some() { 5 } else { 0 },
            personal_records: BTreeMap::new(),
        };
        stats.record_workout(
            &WorkoutSummary {
                completed_sets: 7,
                total_sets: 9,
                completed_reps: 45,
                target_reps: 45,
                volume: 6075.0,
            },
            NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            previous_date,
        );
        assert_eq!(stats.total_workouts, 8);
        assert_eq!(stats.total_sets, 49);
        assert_approx_eq!(stats.total_volume, 16_075.0);
        assert_eq!(stats.current_streak, current_streak);
        assert_eq!(stats.longest_streak, longest_streak);
    }
}
