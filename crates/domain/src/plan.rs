use chrono::{DateTime, Utc};
use log::debug;
use strum::{Display, EnumIter};

use crate::{
    ExerciseCatalog, ExerciseID, Prescription, Reps, Time, User, Weight, Workout,
    WorkoutExercise,
};

const MAIN_LIFT_REST: Time = Time(300);
const ACCESSORY_REST: Time = Time(180);

const ROTATION: [(&str, [&str; 3]); 3] = [
    ("Squat Focus", ["squat", "bench", "row"]),
    ("Bench Focus", ["bench", "squat", "ohp"]),
    ("Deadlift Focus", ["deadlift", "ohp", "row"]),
];

/// Generates the next workout of the three-day rotation from the user's prescriptions.
///
/// The first exercise of the day is the main lift and gets a longer rest.
#[must_use]
pub fn todays_workout(user: &User, catalog: &impl ExerciseCatalog, now: DateTime<Utc>) -> Workout {
    let (name, exercise_ids) = ROTATION[user.stats.total_workouts as usize % ROTATION.len()];
    debug!("generating {name} workout");
    Workout::new(
        name.to_string(),
        now,
        exercise_ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (idx, ExerciseID::from(*id)))
            .filter(|(_, id)| catalog.contains(id))
            .map(|(idx, id)| {
                let prescription = user.prescribe_next(&id);
                let rest_time = if idx == 0 {
                    MAIN_LIFT_REST
                } else {
                    ACCESSORY_REST
                };
                WorkoutExercise::new(id, prescription, rest_time, now)
            })
            .collect(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutPlan {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub difficulty: Difficulty,
    pub duration: &'static str,
    pub frequency: &'static str,
    pub exercises: &'static [PlanExercise],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanExercise {
    pub exercise_id: &'static str,
    pub sets: u32,
    pub reps: Reps,
    pub weight: Weight,
    pub rest_time: Time,
}

impl WorkoutPlan {
    /// Builds a workout with fixed targets. Exercises missing from the catalog are skipped.
    #[must_use]
    pub fn to_workout(&self, catalog: &impl ExerciseCatalog, now: DateTime<Utc>) -> Workout {
        Workout::new(
            self.name.to_string(),
            now,
            self.exercises
                .iter()
                .filter_map(|e| {
                    let exercise_id = ExerciseID::from(e.exercise_id);
                    catalog.contains(&exercise_id).then(|| {
                        WorkoutExercise::new(
                            exercise_id,
                            Prescription {
                                weight: e.weight,
                                reps: e.reps,
                                sets: e.sets,
                            },
                            e.rest_time,
                            now,
                        )
                    })
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn by_id(id: &str) -> Option<&'static WorkoutPlan> {
        WORKOUT_PLANS.iter().find(|p| p.id == id)
    }
}

const fn plan_exercise(
    exercise_id: &'static str,
    sets: u32,
    reps: u32,
    weight: f32,
    rest_time: u32,
) -> PlanExercise {
    PlanExercise {
        exercise_id,
        sets,
        reps: Reps(reps),
        weight: Weight(weight),
        rest_time: Time(rest_time),
    }
}

pub static WORKOUT_PLANS: [WorkoutPlan; 4] = [
    WorkoutPlan {
        id: "beginner-strength",
        name: "Beginner Strength",
        description: "Perfect for those new to strength training. Focuses on learning proper \
                      form and building a foundation.",
        difficulty: Difficulty::Beginner,
        duration: "45-60 min",
        frequency: "3x per week",
        exercises: &[
            plan_exercise("squat", 3, 8, 65.0, 180),
            plan_exercise("bench", 3, 8, 95.0, 180),
            plan_exercise("row", 3, 10, 75.0, 120),
        ],
    },
    WorkoutPlan {
        id: "intermediate-powerlifting",
        name: "Intermediate Powerlifting",
        description: "Focused on the big three lifts with progressive overload. Build serious \
                      strength.",
        difficulty: Difficulty::Intermediate,
        duration: "60-75 min",
        frequency: "4x per week",
        exercises: &[
            plan_exercise("squat", 4, 5, 185.0, 300),
            plan_exercise("bench", 4, 5, 155.0, 300),
            plan_exercise("deadlift", 3, 5, 225.0, 300),
            plan_exercise("ohp", 3, 8, 95.0, 180),
        ],
    },
    WorkoutPlan {
        id: "advanced-volume",
        name: "Advanced Volume",
        description: "High volume training for experienced lifters. Push your limits with \
                      increased training load.",
        difficulty: Difficulty::Advanced,
        duration: "75-90 min",
        frequency: "5x per week",
        exercises: &[
            plan_exercise("squat", 5, 5, 245.0, 300),
            plan_exercise("bench", 4, 6, 185.0, 240),
            plan_exercise("deadlift", 4, 3, 285.0, 300),
            plan_exercise("ohp", 4, 8, 115.0, 180),
            plan_exercise("row", 4, 8, 155.0, 180),
        ],
    },
    WorkoutPlan {
        id: "hypertrophy-focused",
        name: "Hypertrophy Focus",
        description: "Designed for muscle growth with moderate weights and higher rep ranges.",
        difficulty: Difficulty::Intermediate,
        duration: "60-75 min",
        frequency: "4x per week",
        exercises: &[
            plan_exercise("squat", 4, 10, 155.0, 120),
            plan_exercise("bench", 4, 10, 135.0, 120),
            plan_exercise("row", 4, 12, 115.0, 90),
            plan_exercise("ohp", 3, 12, 75.0, 90),
        ],
    },
];
