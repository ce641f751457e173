//! Command-line front end of the Evolve strength training tracker.
//!
//! Usage:
//! ```bash
//! # Establish starting weights
//! evolve foundation squat=135x8 bench=95x6 deadlift=185x5 ohp=65x7
//!
//! # Start the workout of the day, log a set and wait for the rest period
//! evolve start
//! evolve set squat 1 5 --wait
//!
//! # Finish the workout and update progression
//! evolve finish
//! ```

#![warn(clippy::pedantic)]

mod render;

use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use evolve_app::{
    Action, App, Event, LogLevel, Notification, Notifier, SettingsRepository, log as app_log,
};
use evolve_domain::{
    Catalog, ExerciseCatalog, ExerciseID, FOUNDATION_EXERCISES, FoundationResult,
    OngoingWorkout, Preferences, RPE, Reps, StateRepository, Store, SystemClock, Time, Unit,
    Weight, WorkoutPlan, WorkoutSummary,
};
use evolve_storage::LocalStorage;
use log::{debug, info, warn};

type EvolveApp = App<Catalog, SystemClock, Console>;

#[derive(Parser)]
#[command(
    name = "evolve",
    about = "Strength training tracker with automatic progression",
    long_about = "Tracks workouts, prescribes weights from your training history and times rest \
                  periods. Data is stored in $EVOLVE_DATA_DIR (default: ./.evolve)."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the user, statistics, the ongoing workout and the rest timer
    Status,
    /// Preview the workout of the day
    Today,
    /// Show the next prescription for an exercise
    Prescribe { exercise: String },
    /// List the predefined workout plans
    Plans,
    /// Start the workout of the day or a predefined plan
    Start {
        /// ID of a predefined plan
        #[arg(long)]
        plan: Option<String>,
        /// Discard the workout in progress
        #[arg(long)]
        replace: bool,
    },
    /// Show the foundation tests, or record results given as EXERCISE=WEIGHTxREPS
    Foundation { results: Vec<String> },
    /// Complete a set of the ongoing workout and start the rest period
    Set {
        exercise: String,
        /// Position of the set within the exercise, starting at 1
        number: usize,
        reps: u32,
        /// Lifted weight (default: the target weight of the set)
        #[arg(long)]
        weight: Option<f32>,
        /// Rate of perceived exertion
        #[arg(long)]
        rpe: Option<f32>,
        /// Stay in the foreground until the rest period is over
        #[arg(long)]
        wait: bool,
    },
    /// Append a set to an exercise of the ongoing workout
    AddSet { exercise: String },
    /// Change the target weight of an exercise of the ongoing workout
    Weight { exercise: String, weight: f32 },
    /// Move on to the next exercise, finishing the workout after the last one
    Next {
        /// Leave pending sets of the current exercise behind
        #[arg(long)]
        force: bool,
    },
    /// Finish the ongoing workout and update progression
    Finish,
    /// Control the rest timer
    Timer {
        #[command(subcommand)]
        action: TimerCommand,
    },
    /// Change user preferences
    Prefs {
        #[arg(long)]
        unit: Option<UnitArg>,
        /// Default rest time in seconds
        #[arg(long)]
        rest: Option<u32>,
        #[arg(long)]
        sound: Option<bool>,
        #[arg(long)]
        haptic: Option<bool>,
    },
    /// Change application settings
    Settings {
        #[arg(long)]
        beep_volume: Option<u8>,
        #[arg(long)]
        notifications: Option<bool>,
        #[arg(long)]
        tick_interval_ms: Option<u64>,
        #[arg(long)]
        log_level: Option<LevelArg>,
    },
    /// Set the user name
    Name { name: String },
    /// Delete all training data
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Show the most recent log entries
    Log,
}

#[derive(Subcommand)]
enum TimerCommand {
    /// Start a countdown of the given number of seconds
    Start {
        seconds: u32,
        #[arg(long)]
        exercise: Option<String>,
    },
    Pause,
    Resume,
    Stop,
    /// Count down in the foreground until the timer finishes
    Wait,
}

#[derive(ValueEnum, Clone, Copy)]
enum UnitArg {
    Kg,
    Lbs,
}

impl From<UnitArg> for Unit {
    fn from(value: UnitArg) -> Self {
        match value {
            UnitArg::Kg => Unit::Kilograms,
            UnitArg::Lbs => Unit::Pounds,
        }
    }
}

#[derive(ValueEnum, Clone, Copy)]
enum LevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LevelArg> for LogLevel {
    fn from(value: LevelArg) -> Self {
        match value {
            LevelArg::Off => LogLevel::Off,
            LevelArg::Error => LogLevel::Error,
            LevelArg::Warn => LogLevel::Warn,
            LevelArg::Info => LogLevel::Info,
            LevelArg::Debug => LogLevel::Debug,
            LevelArg::Trace => LogLevel::Trace,
        }
    }
}

/// Prints notifications to the terminal and rings the bell instead of beeping.
struct Console;

impl Notifier for Console {
    fn notify(&self, notification: &Notification) {
        if notification.show {
            println!("{}: {}", notification.title, notification.body);
        }
        if notification.beep_volume.is_some_and(|volume| volume > 0) {
            print!("\x07");
            if io::stdout().flush().is_err() {
                debug!("failed to ring the bell");
            }
        }
        if notification.vibrate {
            debug!("vibration is not supported on the console");
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let storage = LocalStorage::from_env()?;
    let settings = storage.read_settings()?;
    app_log::init(Arc::new(Mutex::new(storage.clone())), settings.log_level.into())
        .map_err(|err| anyhow!(err.to_string()))?;

    let state = storage
        .read_state()
        .context("failed to load training data")?
        .unwrap_or_default();
    let mut store = Store::new(state, Catalog::default(), SystemClock);
    store.subscribe(Box::new(storage.clone()));
    let mut app = App::new(store, settings, Console);

    run(cli.command, &mut app, &storage)
}

fn run(command: Command, app: &mut EvolveApp, storage: &LocalStorage) -> anyhow::Result<()> {
    let unit = app.state().user.preferences.unit;
    match command {
        Command::Status => println!("{}", render::status(app.state(), app.store().catalog())),
        Command::Today => println!(
            "{}",
            render::workout_preview(&app.store().todays_workout(), unit, app.store().catalog())
        ),
        Command::Prescribe { exercise } => {
            let exercise_id = known_exercise(app, &exercise)?;
            let prescription = app.store().prescribe_next(&exercise_id);
            println!(
                "{}",
                render::prescription(&exercise_id, &prescription, unit, app.store().catalog())
            );
        }
        Command::Plans => println!("{}", render::plans()),
        Command::Start { plan, replace } => start(app, plan, replace)?,
        Command::Foundation { results } => foundation(app, &results)?,
        Command::Set {
            exercise,
            number,
            reps,
            weight,
            rpe,
            wait,
        } => {
            complete_set(app, &exercise, number, reps, weight, rpe)?;
            if wait {
                wait_for_timer(app);
            }
        }
        Command::AddSet { exercise } => {
            let exercise_id = ongoing_exercise(app, &exercise)?;
            dispatch(app, Action::AddSet(exercise_id));
            println!("{}", ongoing(app)?);
        }
        Command::Weight { exercise, weight } => {
            let exercise_id = ongoing_exercise(app, &exercise)?;
            dispatch(app, Action::UpdateTargetWeight { exercise_id, weight });
            println!("{}", ongoing(app)?);
        }
        Command::Next { force } => {
            if let Some(ongoing) = &app.state().current_workout {
                check_ready_to_advance(ongoing, force, app.store().catalog())?;
            }
            let summary = ongoing_summary(app)?;
            dispatch(app, Action::AdvanceExercise);
            match &app.state().current_workout {
                Some(_) => println!("{}", ongoing(app)?),
                None => println!("{}", render::summary(&summary, unit)),
            }
        }
        Command::Finish => {
            let summary = ongoing_summary(app)?;
            dispatch(app, Action::CompleteWorkout);
            println!("{}", render::summary(&summary, unit));
        }
        Command::Timer { action } => timer(app, action)?,
        Command::Prefs {
            unit,
            rest,
            sound,
            haptic,
        } => {
            let mut preferences: Preferences = app.state().user.preferences;
            if let Some(unit) = unit {
                preferences.unit = unit.into();
            }
            if let Some(rest) = rest {
                preferences.default_rest_time = Time::new(rest)?;
            }
            if let Some(sound) = sound {
                preferences.sound_enabled = sound;
            }
            if let Some(haptic) = haptic {
                preferences.haptic_enabled = haptic;
            }
            dispatch(app, Action::UpdatePreferences(preferences));
        }
        Command::Settings {
            beep_volume,
            notifications,
            tick_interval_ms,
            log_level,
        } => {
            let mut settings = storage.read_settings()?;
            if let Some(beep_volume) = beep_volume {
                settings.beep_volume = beep_volume.min(100);
            }
            if let Some(notifications) = notifications {
                settings.notifications = notifications;
            }
            if let Some(tick_interval_ms) = tick_interval_ms {
                settings.tick_interval_ms = tick_interval_ms;
            }
            if let Some(log_level) = log_level {
                settings.log_level = log_level.into();
            }
            storage.write_settings(settings)?;
            info!("settings updated");
        }
        Command::Name { name } => dispatch(app, Action::RenameUser(name)),
        Command::Reset { yes } => {
            if !yes {
                bail!("this deletes all training data, confirm with --yes");
            }
            dispatch(app, Action::Reset);
        }
        Command::Log => {
            let entries = app_log::Repository::read_entries(storage)
                .map_err(|err| anyhow!("failed to read log: {err}"))?;
            for entry in entries.iter().rev() {
                println!("{} {:<5} {}", entry.time, entry.level, entry.message);
            }
        }
    }
    Ok(())
}

fn dispatch(app: &mut EvolveApp, action: Action) {
    app.handle(Event::Action(action));
}

fn start(app: &mut EvolveApp, plan: Option<String>, replace: bool) -> anyhow::Result<()> {
    let plan = match plan {
        Some(id) => Some(WorkoutPlan::by_id(&id).ok_or_else(|| {
            anyhow!("unknown plan {id}, see `evolve plans` for the available ones")
        })?),
        None => None,
    };

    if replace {
        let workout = match plan {
            Some(plan) => app.store().plan_workout(plan),
            None => app.store().todays_workout(),
        };
        dispatch(app, Action::ReplaceWorkout(workout));
    } else {
        if app.state().current_workout.is_some() {
            bail!("a workout is already in progress, use --replace to discard it");
        }
        match plan {
            Some(plan) => dispatch(app, Action::StartPlan(plan.id.to_string())),
            None => dispatch(app, Action::StartTodaysWorkout),
        }
    }

    println!("{}", ongoing(app)?);
    Ok(())
}

fn foundation(app: &mut EvolveApp, results: &[String]) -> anyhow::Result<()> {
    let unit = app.state().user.preferences.unit;
    if results.is_empty() {
        println!(
            "{}",
            render::foundation_tests(&app.store().foundation_tests(), unit, app.store().catalog())
        );
        return Ok(());
    }

    let results = results
        .iter()
        .map(|result| parse_foundation_result(result))
        .collect::<anyhow::Result<Vec<_>>>()?;
    for result in &results {
        known_exercise(app, &result.exercise_id)?;
    }
    dispatch(app, Action::CompleteFoundation(results));

    for exercise_id in FOUNDATION_EXERCISES {
        let exercise_id = ExerciseID::from(exercise_id);
        let prescription = app.store().prescribe_next(&exercise_id);
        println!(
            "{}",
            render::prescription(&exercise_id, &prescription, unit, app.store().catalog())
        );
    }
    Ok(())
}

/// Parses `EXERCISE=WEIGHTxREPS`, e.g. `squat=135x8`.
fn parse_foundation_result(value: &str) -> anyhow::Result<FoundationResult> {
    let (exercise, performance) = value
        .split_once('=')
        .ok_or_else(|| anyhow!("expected EXERCISE=WEIGHTxREPS, got {value}"))?;
    let (weight, reps) = performance
        .split_once('x')
        .ok_or_else(|| anyhow!("expected WEIGHTxREPS, got {performance}"))?;
    Ok(FoundationResult {
        exercise_id: exercise.trim().into(),
        weight: Weight::try_from(weight.trim())
            .with_context(|| format!("invalid weight {weight}"))?,
        reps: Reps::try_from(reps.trim()).with_context(|| format!("invalid reps {reps}"))?,
    })
}

fn complete_set(
    app: &mut EvolveApp,
    exercise: &str,
    number: usize,
    reps: u32,
    weight: Option<f32>,
    rpe: Option<f32>,
) -> anyhow::Result<()> {
    let exercise_id = ongoing_exercise(app, exercise)?;
    let set = app
        .state()
        .current_workout
        .as_ref()
        .and_then(|ongoing| ongoing.workout.exercise(&exercise_id))
        .and_then(|exercise| exercise.sets().get(number.wrapping_sub(1)))
        .ok_or_else(|| anyhow!("{exercise} has no set {number}"))?;
    if set.completed() {
        bail!("set {number} of {exercise} is already completed");
    }
    let set_id = set.id;
    let weight = match weight {
        Some(weight) => Weight::new(weight)?,
        None => set.target_weight(),
    };

    dispatch(
        app,
        Action::CompleteSet {
            exercise_id,
            set_id,
            weight,
            reps: Reps::new(reps)?,
            rpe: rpe.map(RPE::new).transpose()?,
        },
    );

    println!("{}", ongoing(app)?);
    if let Some(timer) = render::timer(&app.state().timer, app.store().catalog()) {
        println!("{timer}");
    }
    Ok(())
}

fn timer(app: &mut EvolveApp, action: TimerCommand) -> anyhow::Result<()> {
    match action {
        TimerCommand::Start { seconds, exercise } => {
            let exercise_id = exercise
                .map(|exercise| known_exercise(app, &exercise))
                .transpose()?;
            dispatch(
                app,
                Action::StartTimer {
                    duration: Time::new(seconds)?,
                    exercise_id,
                },
            );
        }
        TimerCommand::Pause => dispatch(app, Action::PauseTimer),
        TimerCommand::Resume => dispatch(app, Action::ResumeTimer),
        TimerCommand::Stop => dispatch(app, Action::StopTimer),
        TimerCommand::Wait => {
            if !app.state().timer.is_active() {
                dispatch(app, Action::ResumeTimer);
            }
            wait_for_timer(app);
        }
    }
    if let Some(timer) = render::timer(&app.state().timer, app.store().catalog()) {
        println!("{timer}");
    }
    Ok(())
}

fn wait_for_timer(app: &mut EvolveApp) {
    let mut last = None;
    app.run_while(|state| {
        let remaining = state.timer.time_remaining();
        if state.timer.is_active() && last != Some(remaining) {
            eprint!("\r{} ", render::time(remaining));
            last = Some(remaining);
        }
        state.timer.is_active()
    });
    eprintln!();
}

fn known_exercise(app: &EvolveApp, exercise: &str) -> anyhow::Result<ExerciseID> {
    let exercise_id = ExerciseID::from(exercise);
    if !app.store().catalog().contains(&exercise_id) {
        bail!("unknown exercise {exercise}");
    }
    Ok(exercise_id)
}

fn ongoing_exercise(app: &EvolveApp, exercise: &str) -> anyhow::Result<ExerciseID> {
    let ongoing = app
        .state()
        .current_workout
        .as_ref()
        .ok_or_else(|| anyhow!("no workout in progress, start one with `evolve start`"))?;
    let exercise_id = ExerciseID::from(exercise);
    if ongoing.workout.exercise(&exercise_id).is_none() {
        bail!("{exercise} is not part of {}", ongoing.workout.name);
    }
    Ok(exercise_id)
}

fn ongoing(app: &EvolveApp) -> anyhow::Result<String> {
    let ongoing = app
        .state()
        .current_workout
        .as_ref()
        .ok_or_else(|| anyhow!("no workout in progress"))?;
    Ok(render::ongoing_workout(
        ongoing,
        app.state().user.preferences.unit,
        app.store().catalog(),
    ))
}

fn check_ready_to_advance(
    ongoing: &OngoingWorkout,
    force: bool,
    catalog: &impl ExerciseCatalog,
) -> anyhow::Result<()> {
    if ongoing.is_ready_to_advance() {
        return Ok(());
    }
    let Some(exercise) = ongoing.current_exercise() else {
        return Ok(());
    };
    let pending = exercise.sets().iter().filter(|set| !set.completed()).count();
    let name = catalog
        .exercise(&exercise.exercise_id)
        .map_or_else(|| exercise.exercise_id.to_string(), |e| e.name.clone());
    if force {
        warn!("leaving {pending} pending sets of {name} behind");
        return Ok(());
    }
    bail!("{name} has {pending} pending sets, complete them or use --force");
}

fn ongoing_summary(app: &EvolveApp) -> anyhow::Result<WorkoutSummary> {
    app.state()
        .current_workout
        .as_ref()
        .map(|ongoing| ongoing.workout.summary())
        .ok_or_else(|| anyhow!("no workout in progress"))
}
