//! Serialized form of the application state.
//!
//! Every field beyond `version` falls back to its default if absent, so documents written by
//! older versions load without migration.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use evolve_domain as domain;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CURRENT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Document {
    pub version: u32,
    #[serde(default)]
    pub user: User,
    #[serde(default)]
    pub current_workout: Option<OngoingWorkout>,
    #[serde(default)]
    pub workout_history: Vec<Workout>,
    #[serde(default)]
    pub timer: Timer,
}

impl From<&domain::AppState> for Document {
    fn from(value: &domain::AppState) -> Self {
        Self {
            version: CURRENT_VERSION,
            user: User::from(&value.user),
            current_workout: value.current_workout.as_ref().map(OngoingWorkout::from),
            workout_history: value.workout_history.iter().map(Workout::from).collect(),
            timer: Timer::from(&value.timer),
        }
    }
}

impl TryFrom<Document> for domain::AppState {
    type Error = DocumentError;

    fn try_from(value: Document) -> Result<Self, Self::Error> {
        if value.version > CURRENT_VERSION {
            return Err(DocumentError::UnsupportedVersion(value.version));
        }
        Ok(Self {
            user: value.user.try_into()?,
            current_workout: value
                .current_workout
                .map(domain::OngoingWorkout::try_from)
                .transpose()?,
            workout_history: value
                .workout_history
                .into_iter()
                .map(domain::Workout::try_from)
                .collect::<Result<_, _>>()?,
            timer: value.timer.into(),
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DocumentError {
    #[error("unsupported document version {0}")]
    UnsupportedVersion(u32),
    #[error(transparent)]
    Weight(#[from] domain::WeightError),
    #[error(transparent)]
    Reps(#[from] domain::RepsError),
    #[error(transparent)]
    Time(#[from] domain::TimeError),
    #[error(transparent)]
    RPE(#[from] domain::RPEError),
    #[error(transparent)]
    ProgressionRule(#[from] domain::ProgressionRuleError),
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub is_onboarded: bool,
    pub estimated_one_rep_maxes: BTreeMap<String, f32>,
    pub progression_rules: Vec<ProgressionRule>,
    pub stats: UserStats,
    pub preferences: Preferences,
}

impl From<&domain::User> for User {
    fn from(value: &domain::User) -> Self {
        Self {
            id: *value.id,
            name: value.name.clone(),
            is_onboarded: value.is_onboarded,
            estimated_one_rep_maxes: value
                .estimated_one_rep_maxes
                .iter()
                .map(|(id, weight)| (id.to_string(), f32::from(*weight)))
                .collect(),
            progression_rules: value
                .progression_rules
                .values()
                .map(ProgressionRule::from)
                .collect(),
            stats: UserStats::from(&value.stats),
            preferences: Preferences::from(value.preferences),
        }
    }
}

impl TryFrom<User> for domain::User {
    type Error = DocumentError;

    fn try_from(value: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: if value.id.is_nil() {
                Uuid::new_v4()
            } else {
                value.id
            }
            .into(),
            name: value.name,
            is_onboarded: value.is_onboarded,
            estimated_one_rep_maxes: value
                .estimated_one_rep_maxes
                .into_iter()
                .map(|(id, weight)| Ok((id.into(), domain::Weight::new(weight)?)))
                .collect::<Result<_, DocumentError>>()?,
            progression_rules: value
                .progression_rules
                .into_iter()
                .map(|rule| {
                    let rule = domain::ProgressionRule::try_from(rule)?;
                    Ok((rule.exercise_id().clone(), rule))
                })
                .collect::<Result<_, DocumentError>>()?,
            stats: value.stats.try_into()?,
            preferences: value.preferences.try_into()?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProgressionRule {
    pub exercise_id: String,
    pub successful_sessions: u32,
    pub failed_sessions: u32,
    pub last_weight_increase: Option<DateTime<Utc>>,
    pub current_weight: f32,
    pub plateau_count: u32,
}

impl From<&domain::ProgressionRule> for ProgressionRule {
    fn from(value: &domain::ProgressionRule) -> Self {
        Self {
            exercise_id: value.exercise_id().to_string(),
            successful_sessions: value.successful_sessions(),
            failed_sessions: value.failed_sessions(),
            last_weight_increase: value.last_weight_increase(),
            current_weight: value.current_weight().into(),
            plateau_count: value.plateau_count(),
        }
    }
}

impl TryFrom<ProgressionRule> for domain::ProgressionRule {
    type Error = DocumentError;

    fn try_from(value: ProgressionRule) -> Result<Self, Self::Error> {
        Ok(domain::ProgressionRule::restore(
            value.exercise_id.into(),
            value.successful_sessions,
            value.failed_sessions,
            value.last_weight_increase,
            domain::Weight::new(value.current_weight)?,
            value.plateau_count,
        )?)
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct UserStats {
    pub total_workouts: u32,
    pub total_sets: u32,
    pub total_volume: f64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub personal_records: Vec<PersonalRecord>,
}

impl From<&domain::UserStats> for UserStats {
    fn from(value: &domain::UserStats) -> Self {
        Self {
            total_workouts: value.total_workouts,
            total_sets: value.total_sets,
            total_volume: value.total_volume,
            current_streak: value.current_streak,
            longest_streak: value.longest_streak,
            personal_records: value
                .personal_records
                .values()
                .map(PersonalRecord::from)
                .collect(),
        }
    }
}

impl TryFrom<UserStats> for domain::UserStats {
    type Error = DocumentError;

    fn try_from(value: UserStats) -> Result<Self, Self::Error> {
        Ok(Self {
            total_workouts: value.total_workouts,
            total_sets: value.total_sets,
            total_volume: value.total_volume,
            current_streak: value.current_streak,
            longest_streak: value.longest_streak,
            personal_records: value
                .personal_records
                .into_iter()
                .map(|record| {
                    let record = domain::PersonalRecord::try_from(record)?;
                    Ok((record.exercise_id.clone(), record))
                })
                .collect::<Result<_, DocumentError>>()?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PersonalRecord {
    pub exercise_id: String,
    pub weight: f32,
    pub reps: u32,
    pub estimated_one_rep_max: f32,
    pub date: DateTime<Utc>,
}

impl From<&domain::PersonalRecord> for PersonalRecord {
    fn from(value: &domain::PersonalRecord) -> Self {
        Self {
            exercise_id: value.exercise_id.to_string(),
            weight: value.weight.into(),
            reps: value.reps.into(),
            estimated_one_rep_max: value.estimated_one_rep_max.into(),
            date: value.date,
        }
    }
}

impl TryFrom<PersonalRecord> for domain::PersonalRecord {
    type Error = DocumentError;

    fn try_from(value: PersonalRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            exercise_id: value.exercise_id.into(),
            weight: domain::Weight::new(value.weight)?,
            reps: domain::Reps::new(value.reps)?,
            estimated_one_rep_max: domain::Weight::new(value.estimated_one_rep_max)?,
            date: value.date,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Preferences {
    pub unit: Unit,
    pub default_rest_time: u32,
    pub sound_enabled: bool,
    pub haptic_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self::from(domain::Preferences::default())
    }
}

impl From<domain::Preferences> for Preferences {
    fn from(value: domain::Preferences) -> Self {
        Self {
            unit: value.unit.into(),
            default_rest_time: value.default_rest_time.into(),
            sound_enabled: value.sound_enabled,
            haptic_enabled: value.haptic_enabled,
        }
    }
}

impl TryFrom<Preferences> for domain::Preferences {
    type Error = DocumentError;

    fn try_from(value: Preferences) -> Result<Self, Self::Error> {
        Ok(Self {
            unit: value.unit.into(),
            default_rest_time: domain::Time::new(value.default_rest_time)?,
            sound_enabled: value.sound_enabled,
            haptic_enabled: value.haptic_enabled,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    #[serde(rename = "kg")]
    Kilograms,
    #[serde(rename = "lbs")]
    Pounds,
}

impl From<domain::Unit> for Unit {
    fn from(value: domain::Unit) -> Self {
        match value {
            domain::Unit::Kilograms => Unit::Kilograms,
            domain::Unit::Pounds => Unit::Pounds,
        }
    }
}

impl From<Unit> for domain::Unit {
    fn from(value: Unit) -> Self {
        match value {
            Unit::Kilograms => domain::Unit::Kilograms,
            Unit::Pounds => domain::Unit::Pounds,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OngoingWorkout {
    pub workout: Workout,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub exercise_idx: usize,
}

impl From<&domain::OngoingWorkout> for OngoingWorkout {
    fn from(value: &domain::OngoingWorkout) -> Self {
        Self {
            workout: Workout::from(&value.workout),
            start_time: value.start_time,
            exercise_idx: value.exercise_idx(),
        }
    }
}

impl TryFrom<OngoingWorkout> for domain::OngoingWorkout {
    type Error = DocumentError;

    fn try_from(value: OngoingWorkout) -> Result<Self, Self::Error> {
        Ok(domain::OngoingWorkout::restore(
            value.workout.try_into()?,
            value.start_time,
            value.exercise_idx,
        ))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: Uuid,
    pub name: String,
    pub date: DateTime<Utc>,
    pub exercises: Vec<WorkoutExercise>,
    pub completed: bool,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<&domain::Workout> for Workout {
    fn from(value: &domain::Workout) -> Self {
        Self {
            id: *value.id,
            name: value.name.clone(),
            date: value.date,
            exercises: value.exercises.iter().map(WorkoutExercise::from).collect(),
            completed: value.completed,
            duration: value.duration,
            notes: value.notes.clone(),
        }
    }
}

impl TryFrom<Workout> for domain::Workout {
    type Error = DocumentError;

    fn try_from(value: Workout) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: value.name,
            date: value.date,
            exercises: value
                .exercises
                .into_iter()
                .map(domain::WorkoutExercise::try_from)
                .collect::<Result<_, _>>()?,
            completed: value.completed,
            duration: value.duration,
            notes: value.notes,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutExercise {
    pub exercise_id: String,
    pub sets: Vec<Set>,
    pub target_sets: u32,
    pub target_weight: f32,
    pub target_reps: u32,
    pub rest_time: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<&domain::WorkoutExercise> for WorkoutExercise {
    fn from(value: &domain::WorkoutExercise) -> Self {
        Self {
            exercise_id: value.exercise_id.to_string(),
            sets: value.sets().iter().map(Set::from).collect(),
            target_sets: value.target_sets,
            target_weight: value.target_weight().into(),
            target_reps: value.target_reps.into(),
            rest_time: value.rest_time.into(),
            notes: value.notes.clone(),
        }
    }
}

impl TryFrom<WorkoutExercise> for domain::WorkoutExercise {
    type Error = DocumentError;

    fn try_from(value: WorkoutExercise) -> Result<Self, Self::Error> {
        Ok(domain::WorkoutExercise::restore(
            value.exercise_id.into(),
            value
                .sets
                .into_iter()
                .map(domain::Set::try_from)
                .collect::<Result<_, _>>()?,
            value.target_sets,
            domain::Weight::new(value.target_weight)?,
            domain::Reps::new(value.target_reps)?,
            domain::Time::new(value.rest_time)?,
            value.notes,
        ))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Set {
    pub id: Uuid,
    pub weight: f32,
    pub reps: u32,
    pub target_reps: u32,
    pub target_weight: f32,
    #[serde(default)]
    pub rpe: Option<f32>,
    pub completed: bool,
    pub timestamp: DateTime<Utc>,
}

impl From<&domain::Set> for Set {
    fn from(value: &domain::Set) -> Self {
        Self {
            id: *value.id,
            weight: value.weight().into(),
            reps: value.reps().into(),
            target_reps: value.target_reps().into(),
            target_weight: value.target_weight().into(),
            rpe: value.rpe().map(f32::from),
            completed: value.completed(),
            timestamp: value.timestamp(),
        }
    }
}

impl TryFrom<Set> for domain::Set {
    type Error = DocumentError;

    fn try_from(value: Set) -> Result<Self, Self::Error> {
        Ok(domain::Set::restore(
            value.id.into(),
            domain::Weight::new(value.weight)?,
            domain::Reps::new(value.reps)?,
            domain::Reps::new(value.target_reps)?,
            domain::Weight::new(value.target_weight)?,
            value.rpe.map(domain::RPE::new).transpose()?,
            value.completed,
            value.timestamp,
        ))
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Timer {
    pub is_active: bool,
    pub time_remaining: u32,
    pub total_time: u32,
    pub exercise_id: Option<String>,
}

impl From<&domain::TimerState> for Timer {
    fn from(value: &domain::TimerState) -> Self {
        Self {
            is_active: value.is_active(),
            time_remaining: value.time_remaining(),
            total_time: value.total_time(),
            exercise_id: value.exercise_id().map(ToString::to_string),
        }
    }
}

impl From<Timer> for domain::TimerState {
    fn from(value: Timer) -> Self {
        domain::TimerState::restore(
            value.is_active,
            value.time_remaining,
            value.total_time,
            value.exercise_id.map(domain::ExerciseID::from),
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use crate::tests::data::{APP_STATE, ONGOING_WORKOUT, USER, WORKOUT};

    use super::*;

    #[test]
    fn test_app_state_try_from() {
        assert_eq!(
            domain::AppState::try_from(Document::from(&*APP_STATE)),
            Ok(APP_STATE.clone())
        );
    }

    #[test]
    fn test_document_serde() {
        let document = Document::from(&*APP_STATE);
        let serialized = json!(document);
        let deserialized: Document = serde_json::from_value(serialized).unwrap();
        assert_eq!(deserialized, document);
    }

    #[test]
    fn test_user_try_from() {
        assert_eq!(domain::User::try_from(User::from(&*USER)), Ok(USER.clone()));
    }

    #[test]
    fn test_ongoing_workout_try_from() {
        assert_eq!(
            domain::OngoingWorkout::try_from(OngoingWorkout::from(&*ONGOING_WORKOUT)),
            Ok(ONGOING_WORKOUT.clone())
        );
    }

    #[test]
    fn test_workout_serde() {
        let obj = Workout::from(&*WORKOUT);
        let deserialized: Workout = serde_json::from_value(json!(obj)).unwrap();
        assert_eq!(deserialized, obj);
    }

    #[test]
    fn test_version_only_document() {
        let document: Document = serde_json::from_value(json!({ "version": 1 })).unwrap();
        let state = domain::AppState::try_from(document).unwrap();
        assert!(!state.user.id.is_nil());
        assert_eq!(state.user.preferences, domain::Preferences::default());
        assert_eq!(state.current_workout, None);
        assert!(state.workout_history.is_empty());
        assert_eq!(state.timer, domain::TimerState::default());
    }

    #[test]
    fn test_missing_user_fields() {
        let document: Document = serde_json::from_value(json!({
            "version": 1,
            "user": { "name": "Alice", "preferences": { "unit": "kg" } },
            "unknown": true
        }))
        .unwrap();
        let user = domain::AppState::try_from(document).unwrap().user;
        assert_eq!(user.name, "Alice");
        assert_eq!(user.preferences.unit, domain::Unit::Kilograms);
        assert!(user.preferences.sound_enabled);
        assert_eq!(user.stats, domain::UserStats::default());
    }

    #[rstest]
    #[case(2)]
    #[case(42)]
    fn test_unsupported_version(#[case] version: u32) {
        let document: Document = serde_json::from_value(json!({ "version": version })).unwrap();
        assert_eq!(
            domain::AppState::try_from(document),
            Err(DocumentError::UnsupportedVersion(version))
        );
    }

    #[test]
    fn test_conflicting_rule_counters() {
        let rule = ProgressionRule {
            exercise_id: String::from("squat"),
            successful_sessions: 1,
            failed_sessions: 1,
            last_weight_increase: None,
            current_weight: 100.0,
            plateau_count: 0,
        };
        assert_eq!(
            domain::ProgressionRule::try_from(rule),
            Err(DocumentError::ProgressionRule(
                domain::ProgressionRuleError::ConflictingCounters
            ))
        );
    }

    #[test]
    fn test_negative_weight() {
        let mut set = Set::from(&WORKOUT.exercises[0].sets()[0]);
        set.weight = -1.0;
        assert_eq!(
            domain::Set::try_from(set),
            Err(DocumentError::Weight(domain::WeightError::OutOfRange))
        );
    }

    #[rstest]
    #[case(Unit::Kilograms, "\"kg\"")]
    #[case(Unit::Pounds, "\"lbs\"")]
    fn test_unit_serde(#[case] unit: Unit, #[case] expected: &str) {
        assert_eq!(serde_json::to_string(&unit).unwrap(), expected);
        assert_eq!(domain::Unit::from(unit), match unit {
            Unit::Kilograms => domain::Unit::Kilograms,
            Unit::Pounds => domain::Unit::Pounds,
        });
    }
}
