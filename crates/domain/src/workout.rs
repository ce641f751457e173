use chrono::{DateTime, Utc};
use derive_more::Deref;
use uuid::Uuid;

use crate::{ExerciseID, Prescription, RPE, Reps, Time, Weight, is_set_successful};

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutID,
    pub name: String,
    pub date: DateTime<Utc>,
    pub exercises: Vec<WorkoutExercise>,
    pub completed: bool,
    /// Duration in minutes, known once the workout is completed.
    pub duration: Option<u32>,
    pub notes: Option<String>,
}

impl Workout {
    #[must_use]
    pub fn new(name: String, date: DateTime<Utc>, exercises: Vec<WorkoutExercise>) -> Self {
        Self {
            id: WorkoutID::from(Uuid::new_v4()),
            name,
            date,
            exercises,
            completed: false,
            duration: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn exercise(&self, exercise_id: &ExerciseID) -> Option<&WorkoutExercise> {
        self.exercises.iter().find(|e| e.exercise_id == *exercise_id)
    }

    pub fn exercise_mut(&mut self, exercise_id: &ExerciseID) -> Option<&mut WorkoutExercise> {
        self.exercises
            .iter_mut()
            .find(|e| e.exercise_id == *exercise_id)
    }

    #[must_use]
    pub fn summary(&self) -> WorkoutSummary {
        self.exercises
            .iter()
            .map(WorkoutExercise::summary)
            .fold(WorkoutSummary::default(), |acc, s| WorkoutSummary {
                completed_sets: acc.completed_sets + s.completed_sets,
                total_sets: acc.total_sets + s.total_sets,
                completed_reps: acc.completed_reps + s.completed_reps,
                target_reps: acc.target_reps + s.target_reps,
                volume: acc.volume + s.volume,
            })
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkoutID(Uuid);

impl WorkoutID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutExercise {
    pub exercise_id: ExerciseID,
    sets: Vec<Set>,
    pub target_sets: u32,
    target_weight: Weight,
    pub target_reps: Reps,
    pub rest_time: Time,
    pub notes: Option<String>,
}

impl WorkoutExercise {
    /// Creates the exercise with one pending set per prescribed set.
    #[must_use]
    pub fn new(
        exercise_id: ExerciseID,
        prescription: Prescription,
        rest_time: Time,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            exercise_id,
            sets: (0..prescription.sets)
                .map(|_| {
                    Set::pending(
                        SetID::from(Uuid::new_v4()),
                        prescription.weight,
                        prescription.reps,
                        now,
                    )
                })
                .collect(),
            target_sets: prescription.sets,
            target_weight: prescription.weight,
            target_reps: prescription.reps,
            rest_time,
            notes: None,
        }
    }

    #[must_use]
    pub fn restore(
        exercise_id: ExerciseID,
        sets: Vec<Set>,
        target_sets: u32,
        target_weight: Weight,
        target_reps: Reps,
        rest_time: Time,
        notes: Option<String>,
    ) -> Self {
        Self {
            exercise_id,
            sets,
            target_sets,
            target_weight,
            target_reps,
            rest_time,
            notes,
        }
    }

    #[must_use]
    pub fn sets(&self) -> &[Set] {
        &self.sets
    }

    #[must_use]
    pub fn set(&self, set_id: SetID) -> Option<&Set> {
        self.sets.iter().find(|s| s.id == set_id)
    }

    #[must_use]
    pub fn target_weight(&self) -> Weight {
        self.target_weight
    }

    /// Changes the weight for sets added from now on. Existing sets keep their targets.
    pub fn set_target_weight(&mut self, weight: Weight) {
        self.target_weight = weight;
    }

    /// Appends a pending set using the current targets.
    pub fn add_set(&mut self, id: SetID, now: DateTime<Utc>) -> &Set {
        self.sets.push(Set::pending(
            id,
            self.target_weight,
            self.target_reps,
            now,
        ));
        &self.sets[self.sets.len() - 1]
    }

    /// Completes a pending set. Returns the completed set, or `None` if the set does not
    /// exist or was already completed.
    pub fn complete_set(
        &mut self,
        set_id: SetID,
        weight: Weight,
        reps: Reps,
        rpe: Option<RPE>,
        now: DateTime<Utc>,
    ) -> Option<&Set> {
        let set = self.sets.iter_mut().find(|s| s.id == set_id)?;
        if set.completed {
            return None;
        }
        *set = set.complete(weight, reps, rpe, now);
        Some(&*set)
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.sets.iter().all(|s| s.completed)
    }

    /// Whether the prescription was fulfilled: at least the target number of sets, all of
    /// them completed with at least the target reps.
    #[must_use]
    pub fn hit_all_targets(&self) -> bool {
        #[allow(clippy::cast_possible_truncation)]
        let enough_sets = self.sets.len() as u32 >= self.target_sets;
        enough_sets
            && self
                .sets
                .iter()
                .all(|s| s.completed && is_set_successful(s.reps, s.target_reps))
    }

    #[must_use]
    pub fn summary(&self) -> WorkoutSummary {
        let completed = self.sets.iter().filter(|s| s.completed).collect::<Vec<_>>();
        #[allow(clippy::cast_possible_truncation)]
        let (completed_sets, total_sets) = (completed.len() as u32, self.sets.len() as u32);
        WorkoutSummary {
            completed_sets,
            total_sets,
            completed_reps: completed.iter().map(|s| s.reps.0).sum(),
            target_reps: self.sets.iter().map(|s| s.target_reps.0).sum(),
            volume: completed.iter().map(|s| s.volume()).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Set {
    pub id: SetID,
    weight: Weight,
    reps: Reps,
    target_reps: Reps,
    target_weight: Weight,
    rpe: Option<RPE>,
    completed: bool,
    timestamp: DateTime<Utc>,
}

impl Set {
    #[must_use]
    pub fn pending(
        id: SetID,
        target_weight: Weight,
        target_reps: Reps,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            weight: target_weight,
            reps: Reps(0),
            target_reps,
            target_weight,
            rpe: None,
            completed: false,
            timestamp: now,
        }
    }

    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: SetID,
        weight: Weight,
        reps: Reps,
        target_reps: Reps,
        target_weight: Weight,
        rpe: Option<RPE>,
        completed: bool,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            weight,
            reps: if completed { reps } else { Reps(0) },
            target_reps,
            target_weight,
            rpe,
            completed,
            timestamp,
        }
    }

    #[must_use]
    fn complete(&self, weight: Weight, reps: Reps, rpe: Option<RPE>, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            weight,
            reps,
            target_reps: self.target_reps,
            target_weight: self.target_weight,
            rpe,
            completed: true,
            timestamp: now,
        }
    }

    #[must_use]
    pub fn weight(&self) -> Weight {
        self.weight
    }

    #[must_use]
    pub fn reps(&self) -> Reps {
        self.reps
    }

    #[must_use]
    pub fn target_reps(&self) -> Reps {
        self.target_reps
    }

    #[must_use]
    pub fn target_weight(&self) -> Weight {
        self.target_weight
    }

    #[must_use]
    pub fn rpe(&self) -> Option<RPE> {
        self.rpe
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[must_use]
    pub fn volume(&self) -> f64 {
        if self.completed {
            self.weight * self.reps
        } else {
            0.0
        }
    }

    /// Whether this set qualifies for a personal record check.
    #[must_use]
    pub fn is_record_candidate(&self) -> bool {
        self.completed
            && is_set_successful(self.reps, self.target_reps)
            && !self.target_weight.is_zero()
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SetID(Uuid);

impl SetID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for SetID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for SetID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct WorkoutSummary {
    pub completed_sets: u32,
    pub total_sets: u32,
    pub completed_reps: u32,
    pub target_reps: u32,
    /// Sum of weight times reps over all completed sets.
    pub volume: f64,
}

impl WorkoutSummary {
    /// Average of set completion and rep completion, in percent.
    #[must_use]
    pub fn success_rate(&self) -> u32 {
        if self.total_sets == 0 || self.target_reps == 0 {
            return 0;
        }
        let set_success = f64::from(self.completed_sets) / f64::from(self.total_sets) * 100.0;
        let rep_success = f64::from(self.completed_reps) / f64::from(self.target_reps) * 100.0;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rate = ((set_success + rep_success) / 2.0).round() as u32;
        rate
    }
}
