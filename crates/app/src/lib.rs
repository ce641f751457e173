#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::sync::mpsc::{self, Receiver, Sender};

use ::log::{debug, info, warn};
use evolve_domain::{
    AppState, Clock, ExerciseCatalog, ExerciseID, FoundationResult, Preferences, RPE, Reps, SetID,
    Store, Time, TimerEvent, Weight, Workout, WorkoutPlan,
};

pub mod log;
mod settings;
mod ticker;

pub use settings::{LogLevel, Settings, SettingsRepository};
pub use ticker::Ticker;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// One tick interval elapsed, sent by the ticker armed in the given generation.
    Tick(u64),
    Action(Action),
    Quit,
}

/// A user intent, applied to the state on the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    StartTodaysWorkout,
    StartPlan(String),
    StartWorkout(Workout),
    ReplaceWorkout(Workout),
    CompleteSet {
        exercise_id: ExerciseID,
        set_id: SetID,
        weight: Weight,
        reps: Reps,
        rpe: Option<RPE>,
    },
    AddSet(ExerciseID),
    UpdateTargetWeight {
        exercise_id: ExerciseID,
        weight: f32,
    },
    AdvanceExercise,
    CompleteWorkout,
    StartTimer {
        duration: Time,
        exercise_id: Option<ExerciseID>,
    },
    PauseTimer,
    ResumeTimer,
    StopTimer,
    CompleteFoundation(Vec<FoundationResult>),
    UpdatePreferences(Preferences),
    RenameUser(String),
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Whether the notification is displayed at all, beyond sound and vibration.
    pub show: bool,
    pub beep_volume: Option<u8>,
    pub vibrate: bool,
}

/// Emits notifications to the user, e.g. when a rest period is over.
pub trait Notifier {
    fn notify(&self, notification: &Notification);
}

pub struct App<K, C, N> {
    store: Store<K, C>,
    settings: Settings,
    notifier: N,
    ticker: Ticker,
    sender: Sender<Event>,
    events: Receiver<Event>,
}

impl<K: ExerciseCatalog, C: Clock, N: Notifier> App<K, C, N> {
    pub fn new(store: Store<K, C>, settings: Settings, notifier: N) -> Self {
        let (sender, events) = mpsc::channel();
        let mut app = Self {
            store,
            settings,
            notifier,
            ticker: Ticker::new(settings.tick_interval(), sender.clone()),
            sender,
            events,
        };
        app.sync_ticker();
        app
    }

    #[must_use]
    pub fn sender(&self) -> Sender<Event> {
        self.sender.clone()
    }

    #[must_use]
    pub fn store(&self) -> &Store<K, C> {
        &self.store
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_armed()
    }

    /// Processes events until `Event::Quit` is received.
    pub fn run(&mut self) {
        self.run_while(|_| true);
    }

    /// Processes events as long as the condition holds for the current state.
    pub fn run_while(&mut self, mut condition: impl FnMut(&AppState) -> bool) {
        while condition(self.store.state()) {
            let Ok(event) = self.events.recv() else {
                break;
            };
            if self.handle(event) == Flow::Quit {
                break;
            }
        }
    }

    pub fn handle(&mut self, event: Event) -> Flow {
        let flow = match event {
            Event::Tick(generation) if !self.ticker.is_current(generation) => {
                debug!("dropped stale tick of generation {generation}");
                Flow::Continue
            }
            Event::Tick(_) => {
                if self.store.tick_timer() == TimerEvent::Finished {
                    self.rest_finished();
                }
                Flow::Continue
            }
            Event::Action(action) => {
                self.apply(action);
                Flow::Continue
            }
            Event::Quit => Flow::Quit,
        };
        self.sync_ticker();
        flow
    }

    fn apply(&mut self, action: Action) {
        debug!("applying {action:?}");
        match action {
            Action::StartTodaysWorkout => {
                let workout = self.store.todays_workout();
                self.start_workout(workout);
            }
            Action::StartPlan(id) => match WorkoutPlan::by_id(&id) {
                Some(plan) => {
                    let workout = self.store.plan_workout(plan);
                    self.start_workout(workout);
                }
                None => warn!("unknown workout plan {id}"),
            },
            Action::StartWorkout(workout) => self.start_workout(workout),
            Action::ReplaceWorkout(workout) => {
                self.store.replace_workout(workout);
            }
            Action::CompleteSet {
                exercise_id,
                set_id,
                weight,
                reps,
                rpe,
            } => self.complete_set(&exercise_id, set_id, weight, reps, rpe),
            Action::AddSet(exercise_id) => {
                self.store.add_set(&exercise_id);
            }
            Action::UpdateTargetWeight {
                exercise_id,
                weight,
            } => self.store.update_target_weight(&exercise_id, weight),
            Action::AdvanceExercise => {
                self.store.advance_exercise();
            }
            Action::CompleteWorkout => {
                if let Some(summary) = self.store.complete_workout() {
                    info!("workout success rate {}%", summary.success_rate());
                }
            }
            Action::StartTimer {
                duration,
                exercise_id,
            } => self.store.start_timer(duration, exercise_id),
            Action::PauseTimer => self.store.pause_timer(),
            Action::ResumeTimer => self.store.resume_timer(),
            Action::StopTimer => self.store.stop_timer(),
            Action::CompleteFoundation(results) => {
                self.store.complete_foundation_session(&results);
            }
            Action::UpdatePreferences(preferences) => self.store.update_preferences(preferences),
            Action::RenameUser(name) => self.store.rename_user(name),
            Action::Reset => self.store.reset(),
        }
    }

    fn start_workout(&mut self, workout: Workout) {
        if let Err(err) = self.store.start_workout(workout) {
            warn!("{err}");
        }
    }

    /// Completes a set, celebrates a new personal record and starts the rest period of the
    /// exercise.
    fn complete_set(
        &mut self,
        exercise_id: &ExerciseID,
        set_id: SetID,
        weight: Weight,
        reps: Reps,
        rpe: Option<RPE>,
    ) {
        let Some(outcome) = self
            .store
            .complete_set(exercise_id, set_id, weight, reps, rpe)
        else {
            return;
        };

        if outcome.personal_record {
            let name = self
                .store
                .catalog()
                .exercise(exercise_id)
                .map_or_else(|| exercise_id.to_string(), |e| e.name.clone());
            self.notify(
                "New Personal Record!".to_string(),
                format!("{name}: {weight} x {reps}"),
            );
        }

        let rest_time = self
            .store
            .state()
            .current_workout
            .as_ref()
            .and_then(|ongoing| ongoing.workout.exercise(exercise_id))
            .map(|exercise| exercise.rest_time);
        if let Some(rest_time) = rest_time {
            self.store.start_timer(rest_time, Some(exercise_id.clone()));
        }
    }

    fn rest_finished(&self) {
        info!("rest finished");
        self.notify(
            "Rest Complete!".to_string(),
            "Time for your next set".to_string(),
        );
    }

    fn notify(&self, title: String, body: String) {
        let preferences = self.store.state().user.preferences;
        self.notifier.notify(&Notification {
            title,
            body,
            show: self.settings.notifications,
            beep_volume: preferences
                .sound_enabled
                .then_some(self.settings.beep_volume),
            vibrate: preferences.haptic_enabled,
        });
    }

    /// Keeps exactly one tick source running while the rest timer is active.
    fn sync_ticker(&mut self) {
        if self.store.state().timer.is_active() {
            self.ticker.arm();
        } else {
            self.ticker.disarm();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use chrono::{TimeZone, Utc};
    use evolve_domain::{Catalog, FixedClock, Prescription, WorkoutExercise};
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default, Clone)]
    struct Notifications(Rc<RefCell<Vec<Notification>>>);

    impl Notifier for Notifications {
        fn notify(&self, notification: &Notification) {
            self.0.borrow_mut().push(notification.clone());
        }
    }

    impl Notifications {
        fn titles(&self) -> Vec<String> {
            self.0.borrow().iter().map(|n| n.title.clone()).collect()
        }
    }

    fn app(tick_interval_ms: u64) -> (App<Catalog, FixedClock, Notifications>, Notifications) {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 6, 7, 0, 0).unwrap());
        let store = Store::new(AppState::default(), Catalog::default(), clock);
        let notifications = Notifications::default();
        let settings = Settings {
            tick_interval_ms,
            ..Settings::default()
        };
        (App::new(store, settings, notifications.clone()), notifications)
    }

    fn workout() -> Workout {
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 7, 0, 0).unwrap();
        Workout::new(
            String::from("Test"),
            now,
            vec![WorkoutExercise::new(
                "bench".into(),
                Prescription {
                    weight: Weight::new(95.0).unwrap(),
                    reps: Reps::new(5).unwrap(),
                    sets: 2,
                },
                Time::new(2).unwrap(),
                now,
            )],
        )
    }

    fn tick(app: &App<Catalog, FixedClock, Notifications>) -> Event {
        Event::Tick(app.ticker.generation)
    }

    fn first_set(app: &App<Catalog, FixedClock, Notifications>) -> SetID {
        app.state().current_workout.as_ref().unwrap().workout.exercises[0].sets()[0].id
    }

    #[test]
    fn test_complete_set_starts_rest_timer() {
        let (mut app, notifications) = app(60_000);
        app.handle(Event::Action(Action::StartWorkout(workout())));
        assert!(!app.is_ticking());

        let set_id = first_set(&app);
        app.handle(Event::Action(Action::CompleteSet {
            exercise_id: "bench".into(),
            set_id,
            weight: Weight::new(95.0).unwrap(),
            reps: Reps::new(5).unwrap(),
            rpe: None,
        }));

        let timer = &app.state().timer;
        assert!(timer.is_active());
        assert_eq!(timer.total_time(), 2);
        assert_eq!(timer.exercise_id(), Some(&ExerciseID::from("bench")));
        assert!(app.is_ticking());
        assert_eq!(notifications.titles(), vec!["New Personal Record!"]);
        assert_eq!(
            notifications.0.borrow()[0].body,
            "Barbell Bench Press: 95 x 5"
        );

        assert_eq!(app.handle(tick(&app)), Flow::Continue);
        assert_eq!(app.handle(tick(&app)), Flow::Continue);
        assert!(!app.state().timer.is_active());
        assert!(!app.is_ticking());
        assert_eq!(
            notifications.titles(),
            vec!["New Personal Record!", "Rest Complete!"]
        );
        assert_eq!(
            notifications.0.borrow()[1],
            Notification {
                title: String::from("Rest Complete!"),
                body: String::from("Time for your next set"),
                show: true,
                beep_volume: Some(80),
                vibrate: true,
            }
        );

        app.handle(Event::Tick(app.ticker.generation));
        assert_eq!(notifications.titles().len(), 2);
    }

    #[test]
    fn test_pause_and_resume_sync_ticker() {
        let (mut app, _) = app(60_000);
        app.handle(Event::Action(Action::StartTimer {
            duration: Time::new(30).unwrap(),
            exercise_id: None,
        }));
        assert!(app.is_ticking());
        app.handle(Event::Action(Action::PauseTimer));
        assert!(!app.is_ticking());
        app.handle(Event::Action(Action::ResumeTimer));
        assert!(app.is_ticking());
        app.handle(Event::Action(Action::StopTimer));
        assert!(!app.is_ticking());
    }

    #[test]
    fn test_stale_ticks_are_dropped() {
        let (mut app, _) = app(60_000);
        app.handle(Event::Action(Action::StartTimer {
            duration: Time::new(30).unwrap(),
            exercise_id: None,
        }));
        let before_pause = tick(&app);
        app.handle(Event::Action(Action::PauseTimer));
        app.handle(Event::Action(Action::ResumeTimer));
        app.handle(before_pause);
        assert_eq!(app.state().timer.time_remaining(), 30);

        let before_restart = tick(&app);
        app.handle(Event::Action(Action::StopTimer));
        app.handle(Event::Action(Action::StartTimer {
            duration: Time::new(20).unwrap(),
            exercise_id: None,
        }));
        app.handle(before_restart);
        assert_eq!(app.state().timer.time_remaining(), 20);

        app.handle(tick(&app));
        assert_eq!(app.state().timer.time_remaining(), 19);
    }

    #[test]
    fn test_start_workouts() {
        let (mut app, _) = app(60_000);
        app.handle(Event::Action(Action::StartPlan(String::from("unknown"))));
        assert_eq!(app.state().current_workout, None);

        app.handle(Event::Action(Action::StartPlan(String::from(
            "beginner-strength",
        ))));
        let name = |app: &App<_, _, _>| {
            app.state()
                .current_workout
                .as_ref()
                .map(|o| o.workout.name.clone())
        };
        assert_eq!(name(&app), Some(String::from("Beginner Strength")));

        app.handle(Event::Action(Action::StartTodaysWorkout));
        assert_eq!(name(&app), Some(String::from("Beginner Strength")));

        app.handle(Event::Action(Action::ReplaceWorkout(workout())));
        assert_eq!(name(&app), Some(String::from("Test")));

        app.handle(Event::Action(Action::AdvanceExercise));
        assert_eq!(app.state().current_workout, None);
        assert_eq!(app.state().workout_history.len(), 1);
    }

    #[test]
    fn test_run_until_quit() {
        let (mut app, _) = app(60_000);
        let sender = app.sender();
        sender
            .send(Event::Action(Action::RenameUser(String::from("Alice"))))
            .unwrap();
        sender.send(Event::Quit).unwrap();
        sender
            .send(Event::Action(Action::RenameUser(String::from("Bob"))))
            .unwrap();
        app.run();
        assert_eq!(app.state().user.name, "Alice");
    }

    #[test]
    fn test_run_while_rest_timer_is_active() {
        let (mut app, notifications) = app(1);
        app.handle(Event::Action(Action::StartTimer {
            duration: Time::new(3).unwrap(),
            exercise_id: None,
        }));
        app.run_while(|state| state.timer.is_active());
        assert_eq!(app.state().timer.time_remaining(), 0);
        assert!(!app.is_ticking());
        assert_eq!(notifications.titles(), vec!["Rest Complete!"]);
    }
}
