//! Plain-text views of the application state.

use evolve_domain::{
    AppState, ExerciseCatalog, ExerciseID, FoundationTest, OngoingWorkout, Prescription, RIR,
    TimerState, Unit, WORKOUT_PLANS, Workout, WorkoutSummary,
};

const PROGRESS_WIDTH: usize = 10;

#[must_use]
pub fn time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn exercise_name(catalog: &impl ExerciseCatalog, id: &ExerciseID) -> String {
    catalog
        .exercise(id)
        .map_or_else(|| id.to_string(), |exercise| exercise.name.clone())
}

#[must_use]
pub fn status(state: &AppState, catalog: &impl ExerciseCatalog) -> String {
    let user = &state.user;
    let stats = &user.stats;
    let mut lines = vec![
        if user.name.is_empty() {
            String::from("Evolve")
        } else {
            format!("Evolve: {}", user.name)
        },
        format!(
            "Workouts: {}  Sets: {}  Volume: {:.0} {}",
            stats.total_workouts, stats.total_sets, stats.total_volume, user.preferences.unit
        ),
        format!(
            "Streak: {} (longest {})",
            stats.current_streak, stats.longest_streak
        ),
    ];

    if !user.is_onboarded {
        lines.push(String::from(
            "Run `evolve foundation` to establish your starting weights.",
        ));
    }

    if !stats.personal_records.is_empty() {
        lines.push(String::from("Personal records:"));
        lines.extend(stats.personal_records.values().map(|record| {
            format!(
                "  {}: {} x {} (e1RM {})",
                exercise_name(catalog, &record.exercise_id),
                record.weight,
                record.reps,
                record.estimated_one_rep_max
            )
        }));
    }

    match &state.current_workout {
        Some(ongoing) => lines.push(ongoing_workout(ongoing, user.preferences.unit, catalog)),
        None => lines.push(String::from("No workout in progress.")),
    }

    if let Some(timer) = timer(&state.timer, catalog) {
        lines.push(timer);
    }

    lines.join("\n")
}

#[must_use]
pub fn ongoing_workout(
    ongoing: &OngoingWorkout,
    unit: Unit,
    catalog: &impl ExerciseCatalog,
) -> String {
    let mut lines = vec![format!(
        "{} (started {})",
        ongoing.workout.name,
        ongoing.start_time.format("%H:%M")
    )];
    for (idx, exercise) in ongoing.workout.exercises.iter().enumerate() {
        let marker = if idx == ongoing.exercise_idx() { ">" } else { " " };
        lines.push(format!(
            "{marker} {}: {} x {} @ {} {unit}, rest {}",
            exercise_name(catalog, &exercise.exercise_id),
            exercise.target_sets,
            exercise.target_reps,
            exercise.target_weight(),
            time(exercise.rest_time.into()),
        ));
        for (number, set) in exercise.sets().iter().enumerate() {
            let rpe = set
                .rpe()
                .map(|rpe| format!(" @ RPE {rpe} ({} RIR)", RIR::from(rpe)))
                .unwrap_or_default();
            lines.push(if set.completed() {
                format!("    {}. {} x {}{rpe} done", number + 1, set.weight(), set.reps())
            } else {
                format!(
                    "    {}. {} x {} pending",
                    number + 1,
                    set.target_weight(),
                    set.target_reps()
                )
            });
        }
    }
    lines.join("\n")
}

#[must_use]
pub fn workout_preview(workout: &Workout, unit: Unit, catalog: &impl ExerciseCatalog) -> String {
    let mut lines = vec![workout.name.clone()];
    lines.extend(workout.exercises.iter().map(|exercise| {
        format!(
            "  {}: {} x {} @ {} {unit}, rest {}",
            exercise_name(catalog, &exercise.exercise_id),
            exercise.target_sets,
            exercise.target_reps,
            exercise.target_weight(),
            time(exercise.rest_time.into()),
        )
    }));
    lines.join("\n")
}

/// Returns `None` if no countdown is running or paused.
#[must_use]
pub fn timer(timer: &TimerState, catalog: &impl ExerciseCatalog) -> Option<String> {
    if !timer.is_active() && !timer.is_paused() {
        return None;
    }
    let exercise = timer
        .exercise_id()
        .map(|id| format!(" ({})", exercise_name(catalog, id)))
        .unwrap_or_default();
    let paused = if timer.is_paused() { " paused" } else { "" };
    Some(format!(
        "Rest {} / {} {}{exercise}{paused}",
        time(timer.time_remaining()),
        time(timer.total_time()),
        progress_bar(timer.progress())
    ))
}

fn progress_bar(progress: f32) -> String {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let done = ((progress.clamp(0.0, 1.0) * PROGRESS_WIDTH as f32).round() as usize)
        .min(PROGRESS_WIDTH);
    format!("[{}{}]", "#".repeat(done), "-".repeat(PROGRESS_WIDTH - done))
}

#[must_use]
pub fn summary(summary: &WorkoutSummary, unit: Unit) -> String {
    format!(
        "Workout complete: {}/{} sets, {}/{} reps, {:.0} {unit} volume, {}% success",
        summary.completed_sets,
        summary.total_sets,
        summary.completed_reps,
        summary.target_reps,
        summary.volume,
        summary.success_rate()
    )
}

#[must_use]
pub fn prescription(
    exercise_id: &ExerciseID,
    prescription: &Prescription,
    unit: Unit,
    catalog: &impl ExerciseCatalog,
) -> String {
    if prescription.needs_foundation_test() {
        return format!(
            "{}: no data yet, run `evolve foundation`",
            exercise_name(catalog, exercise_id)
        );
    }
    format!(
        "{}: {} x {} @ {} {unit}",
        exercise_name(catalog, exercise_id),
        prescription.sets,
        prescription.reps,
        prescription.weight
    )
}

#[must_use]
pub fn plans() -> String {
    WORKOUT_PLANS
        .iter()
        .map(|plan| {
            format!(
                "{} - {} [{}]\n  {}\n  {}, {}",
                plan.id, plan.name, plan.difficulty, plan.description, plan.duration, plan.frequency
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn foundation_tests(
    tests: &[FoundationTest],
    unit: Unit,
    catalog: &impl ExerciseCatalog,
) -> String {
    let mut lines = vec![String::from(FoundationTest::INSTRUCTIONS)];
    lines.extend(tests.iter().map(|test| {
        format!(
            "  {} ({}): start with {} {unit}",
            exercise_name(catalog, &test.exercise_id),
            test.exercise_id,
            test.suggested_weight
        )
    }));
    lines.push(String::from(
        "Record results with `evolve foundation squat=135x8 bench=95x6 ...`",
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use evolve_domain::{Catalog, RPE, Reps, Time, Weight, WorkoutExercise};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, "0:00")]
    #[case(59, "0:59")]
    #[case(90, "1:30")]
    #[case(300, "5:00")]
    fn test_time(#[case] seconds: u32, #[case] expected: &str) {
        assert_eq!(time(seconds), expected);
    }

    #[test]
    fn test_timer() {
        let catalog = Catalog::default();
        assert_eq!(timer(&TimerState::default(), &catalog), None);
        assert_eq!(
            timer(
                &TimerState::restore(true, 90, 180, Some("squat".into())),
                &catalog
            ),
            Some(String::from(
                "Rest 1:30 / 3:00 [#####-----] (Barbell Back Squat)"
            ))
        );
        assert_eq!(
            timer(&TimerState::restore(false, 10, 60, None), &catalog),
            Some(String::from("Rest 0:10 / 1:00 [########--] paused"))
        );
    }

    #[test]
    fn test_workout_preview() {
        let catalog = Catalog::default();
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 7, 0, 0).unwrap();
        let workout = Workout::new(
            String::from("Squat Focus"),
            now,
            vec![WorkoutExercise::new(
                "squat".into(),
                Prescription {
                    weight: Weight::new(130.0).unwrap(),
                    reps: Reps::new(5).unwrap(),
                    sets: 3,
                },
                Time::new(300).unwrap(),
                now,
            )],
        );
        assert_eq!(
            workout_preview(&workout, Unit::Pounds, &catalog),
            "Squat Focus\n  Barbell Back Squat: 3 x 5 @ 130 lbs, rest 5:00"
        );
    }

    #[test]
    fn test_ongoing_workout() {
        let catalog = Catalog::default();
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 7, 0, 0).unwrap();
        let mut exercise = WorkoutExercise::new(
            "squat".into(),
            Prescription {
                weight: Weight::new(130.0).unwrap(),
                reps: Reps::new(5).unwrap(),
                sets: 2,
            },
            Time::new(180).unwrap(),
            now,
        );
        let set_id = exercise.sets()[0].id;
        exercise.complete_set(
            set_id,
            Weight::new(130.0).unwrap(),
            Reps::new(5).unwrap(),
            Some(RPE::EIGHT),
            now,
        );
        let ongoing = OngoingWorkout::new(
            Workout::new(String::from("Squat Focus"), now, vec![exercise]),
            now,
        );
        assert_eq!(
            ongoing_workout(&ongoing, Unit::Pounds, &catalog),
            "Squat Focus (started 07:00)\n\
             > Barbell Back Squat: 2 x 5 @ 130 lbs, rest 3:00\n\
             \x20   1. 130 x 5 @ RPE 8 (2 RIR) done\n\
             \x20   2. 130 x 5 pending"
        );
    }

    #[test]
    fn test_prescription_without_data() {
        let catalog = Catalog::default();
        let prescription = Prescription {
            weight: Weight::ZERO,
            reps: Reps::new(5).unwrap(),
            sets: 3,
        };
        assert_eq!(
            super::prescription(&"bench".into(), &prescription, Unit::Pounds, &catalog),
            "Barbell Bench Press: no data yet, run `evolve foundation`"
        );
    }

    #[test]
    fn test_status_of_new_user() {
        let status = status(&AppState::default(), &Catalog::default());
        assert!(status.starts_with("Evolve\n"));
        assert!(status.contains("evolve foundation"));
        assert!(status.ends_with("No workout in progress."));
    }

    #[test]
    fn test_plans() {
        let plans = plans();
        assert_eq!(plans.lines().count(), WORKOUT_PLANS.len() * 3);
    }
}
