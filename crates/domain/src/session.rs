use chrono::{DateTime, Utc};

use crate::{Workout, WorkoutExercise};

/// The workout in the active-session slot together with its progress.
#[derive(Debug, Clone, PartialEq)]
pub struct OngoingWorkout {
    pub workout: Workout,
    pub start_time: DateTime<Utc>,
    exercise_idx: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The cursor moved to the exercise at this index.
    Next(usize),
    /// The cursor was on the last exercise.
    Finished,
}

impl OngoingWorkout {
    #[must_use]
    pub fn new(workout: Workout, start_time: DateTime<Utc>) -> Self {
        Self {
            workout,
            start_time,
            exercise_idx: 0,
        }
    }

    #[must_use]
    pub fn restore(workout: Workout, start_time: DateTime<Utc>, exercise_idx: usize) -> Self {
        let last_idx = workout.exercises.len().saturating_sub(1);
        Self {
            workout,
            start_time,
            exercise_idx: exercise_idx.min(last_idx),
        }
    }

    #[must_use]
    pub fn exercise_idx(&self) -> usize {
        self.exercise_idx
    }

    #[must_use]
    pub fn current_exercise(&self) -> Option<&WorkoutExercise> {
        self.workout.exercises.get(self.exercise_idx)
    }

    #[must_use]
    pub fn is_last_exercise(&self) -> bool {
        self.exercise_idx + 1 >= self.workout.exercises.len()
    }

    /// Whether every set of the current exercise is completed.
    #[must_use]
    pub fn is_ready_to_advance(&self) -> bool {
        self.current_exercise().is_none_or(WorkoutExercise::is_done)
    }

    pub fn advance(&mut self) -> Advance {
        if self.is_last_exercise() {
            Advance::Finished
        } else {
            self.exercise_idx += 1;
            Advance::Next(self.exercise_idx)
        }
    }

    /// Elapsed whole minutes since the start of the workout.
    #[must_use]
    pub fn duration(&self, now: DateTime<Utc>) -> u32 {
        u32::try_from(now.signed_duration_since(self.start_time).num_minutes().max(0))
            .unwrap_or(u32::MAX)
    }
}
