#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod catalog;
mod clock;
mod error;
mod exercise;
mod foundation;
mod plan;
mod progression;
mod session;
mod state;
mod strength;
mod timer;
mod training;
mod user;
mod workout;

pub use catalog::Catalog;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ReadError, SessionError, StorageError, WriteError};
pub use exercise::{Category, Exercise, ExerciseCatalog, ExerciseID, MuscleGroup};
pub use foundation::{FOUNDATION_EXERCISES, FoundationResult, FoundationTest, foundation_tests};
pub use plan::{Difficulty, PlanExercise, WORKOUT_PLANS, WorkoutPlan, todays_workout};
pub use progression::{Prescription, ProgressionRule, ProgressionRuleError, prescribe_next};
pub use session::{Advance, OngoingWorkout};
pub use state::{AppState, SetOutcome, StateObserver, StateRepository, Store};
pub use strength::{
    OneRepMaxFormula, Unit, estimate_one_rep_max, estimate_one_rep_max_brzycki,
    is_set_successful, percentage_of_max, round_to_increment,
};
pub use timer::{TimerEvent, TimerState};
pub use training::{RIR, RPE, RPEError, Reps, RepsError, Time, TimeError, Weight, WeightError};
pub use user::{PersonalRecord, Preferences, User, UserID, UserStats};
pub use workout::{Set, SetID, Workout, WorkoutExercise, WorkoutID, WorkoutSummary};
