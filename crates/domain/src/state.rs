use log::{debug, info, warn};
use uuid::Uuid;

use crate::{
    Advance, Clock, ExerciseCatalog, ExerciseID, FoundationResult, FoundationTest,
    OngoingWorkout, Preferences, Prescription, RPE, ReadError, Reps, SessionError, SetID, Time,
    TimerEvent, TimerState, User, Weight, Workout, WorkoutPlan, WorkoutSummary, WriteError,
    foundation_tests, todays_workout,
};

/// Everything that survives a restart of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub user: User,
    pub current_workout: Option<OngoingWorkout>,
    /// Completed workouts, newest first.
    pub workout_history: Vec<Workout>,
    pub timer: TimerState,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            user: User::new(String::new()),
            current_workout: None,
            workout_history: Vec::new(),
            timer: TimerState::default(),
        }
    }
}

pub trait StateRepository {
    /// Returns `None` if no state has been stored yet.
    fn read_state(&self) -> Result<Option<AppState>, ReadError>;
    fn write_state(&self, state: &AppState) -> Result<(), WriteError>;
}

/// Receives a snapshot after every transition that changed the state.
pub trait StateObserver {
    fn state_changed(&self, state: &AppState);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetOutcome {
    pub personal_record: bool,
}

/// The state container. All transitions of the application state go through here.
///
/// Operations referring to an unknown exercise or set, or requiring an active workout when
/// there is none, leave the state unchanged.
pub struct Store<K, C> {
    state: AppState,
    catalog: K,
    clock: C,
    observers: Vec<Box<dyn StateObserver>>,
}

impl<K: ExerciseCatalog, C: Clock> Store<K, C> {
    pub fn new(state: AppState, catalog: K, clock: C) -> Self {
        Self {
            state,
            catalog,
            clock,
            observers: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn catalog(&self) -> &K {
        &self.catalog
    }

    pub fn subscribe(&mut self, observer: Box<dyn StateObserver>) {
        self.observers.push(observer);
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer.state_changed(&self.state);
        }
    }

    #[must_use]
    pub fn todays_workout(&self) -> Workout {
        todays_workout(&self.state.user, &self.catalog, self.clock.now())
    }

    #[must_use]
    pub fn plan_workout(&self, plan: &WorkoutPlan) -> Workout {
        plan.to_workout(&self.catalog, self.clock.now())
    }

    #[must_use]
    pub fn foundation_tests(&self) -> Vec<FoundationTest> {
        foundation_tests(&self.catalog)
    }

    #[must_use]
    pub fn prescribe_next(&self, exercise_id: &ExerciseID) -> Prescription {
        self.state.user.prescribe_next(exercise_id)
    }

    /// Installs a workout into the active-session slot.
    ///
    /// # Errors
    ///
    /// Returns an error if a workout is already in progress.
    pub fn start_workout(&mut self, workout: Workout) -> Result<(), SessionError> {
        if let Some(ongoing) = &self.state.current_workout {
            warn!("rejected start of workout while {} is in progress", ongoing.workout.name);
            return Err(SessionError::AlreadyActive(ongoing.workout.id));
        }
        self.replace_workout(workout);
        Ok(())
    }

    /// Installs a workout, discarding any workout in progress. Returns the discarded workout.
    pub fn replace_workout(&mut self, workout: Workout) -> Option<Workout> {
        debug!("starting workout {}", workout.name);
        let previous = self
            .state
            .current_workout
            .replace(OngoingWorkout::new(workout, self.clock.now()))
            .map(|ongoing| ongoing.workout);
        if let Some(previous) = &previous {
            info!("discarded workout {} in progress", previous.name);
        }
        self.notify();
        previous
    }

    /// Completes a pending set and, if the set qualifies, checks it for a personal record.
    ///
    /// Returns `None` if the exercise or the pending set does not exist.
    pub fn complete_set(
        &mut self,
        exercise_id: &ExerciseID,
        set_id: SetID,
        weight: Weight,
        reps: Reps,
        rpe: Option<RPE>,
    ) -> Option<SetOutcome> {
        let now = self.clock.now();
        let set = self
            .state
            .current_workout
            .as_mut()?
            .workout
            .exercise_mut(exercise_id)?
            .complete_set(set_id, weight, reps, rpe, now)?
            .clone();
        debug!("completed set of {exercise_id}: {} x {}", set.weight(), set.reps());

        let personal_record = set.is_record_candidate()
            && self.state.user.update_personal_record(
                &self.catalog,
                exercise_id,
                set.weight(),
                set.reps(),
                now,
            );

        self.notify();
        Some(SetOutcome { personal_record })
    }

    pub fn add_set(&mut self, exercise_id: &ExerciseID) -> Option<SetID> {
        let now = self.clock.now();
        let set_id = self
            .state
            .current_workout
            .as_mut()?
            .workout
            .exercise_mut(exercise_id)?
            .add_set(SetID::from(Uuid::new_v4()), now)
            .id;
        self.notify();
        Some(set_id)
    }

    /// Changes the target weight of an exercise in progress. Negative weights are clamped to
    /// zero.
    pub fn update_target_weight(&mut self, exercise_id: &ExerciseID, weight: f32) {
        let Some(exercise) = self
            .state
            .current_workout
            .as_mut()
            .and_then(|ongoing| ongoing.workout.exercise_mut(exercise_id))
        else {
            return;
        };
        exercise.set_target_weight(Weight::clamped(weight));
        self.notify();
    }

    /// Moves to the next exercise, or completes the workout when on the last one.
    pub fn advance_exercise(&mut self) -> Option<Advance> {
        let advance = self.state.current_workout.as_mut()?.advance();
        match advance {
            Advance::Next(idx) => {
                debug!("advanced to exercise {idx}");
                self.notify();
            }
            Advance::Finished => {
                self.complete_workout();
            }
        }
        Some(advance)
    }

    /// Archives the workout in progress and folds it into the statistics and the progression
    /// rules.
    pub fn complete_workout(&mut self) -> Option<WorkoutSummary> {
        let Some(ongoing) = self.state.current_workout.take() else {
            debug!("no workout in progress to complete");
            return None;
        };
        let now = self.clock.now();
        let duration = ongoing.duration(now);
        let mut workout = ongoing.workout;
        workout.completed = true;
        workout.duration = Some(duration);

        let summary = workout.summary();
        let previous_date = self
            .state
            .workout_history
            .first()
            .map(|w| w.date.date_naive());
        let user = &mut self.state.user;
        user.stats
            .record_workout(&summary, workout.date.date_naive(), previous_date);

        for exercise in &workout.exercises {
            if let Some(rule) = user.progression_rules.get_mut(&exercise.exercise_id) {
                *rule =
                    rule.apply_outcome(exercise.hit_all_targets(), exercise.target_weight(), now);
            }
        }

        info!(
            "completed workout {} ({} sets, {} min)",
            workout.name, summary.completed_sets, duration
        );
        self.state.workout_history.insert(0, workout);
        self.notify();
        Some(summary)
    }

    pub fn start_timer(&mut self, duration: Time, exercise_id: Option<ExerciseID>) {
        self.state.timer = TimerState::start(duration, exercise_id);
        self.notify();
    }

    pub fn pause_timer(&mut self) {
        if self.state.timer.is_active() {
            self.state.timer.pause();
            self.notify();
        }
    }

    pub fn resume_timer(&mut self) {
        if self.state.timer.is_paused() {
            self.state.timer.resume();
            self.notify();
        }
    }

    pub fn stop_timer(&mut self) {
        if self.state.timer != TimerState::default() {
            self.state.timer.stop();
            self.notify();
        }
    }

    pub fn tick_timer(&mut self) -> TimerEvent {
        let event = self.state.timer.tick();
        if event != TimerEvent::Idle {
            self.notify();
        }
        event
    }

    pub fn update_personal_record(
        &mut self,
        exercise_id: &ExerciseID,
        weight: Weight,
        reps: Reps,
    ) -> bool {
        let replaced = self.state.user.update_personal_record(
            &self.catalog,
            exercise_id,
            weight,
            reps,
            self.clock.now(),
        );
        if replaced {
            self.notify();
        }
        replaced
    }

    pub fn complete_foundation_session(&mut self, results: &[FoundationResult]) {
        self.state
            .user
            .complete_foundation_session(&self.catalog, results, self.clock.now());
        self.notify();
    }

    pub fn update_preferences(&mut self, preferences: Preferences) {
        if self.state.user.preferences != preferences {
            debug!("updated preferences");
            self.state.user.preferences = preferences;
            self.notify();
        }
    }

    pub fn rename_user(&mut self, name: String) {
        self.state.user.name = name;
        self.notify();
    }

    /// Starts over with a fresh profile.
    pub fn reset(&mut self) {
        info!("resetting all data");
        self.state = AppState::default();
        self.notify();
    }
}
