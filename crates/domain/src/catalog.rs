use crate::{Category, Exercise, ExerciseCatalog, ExerciseID, MuscleGroup};

/// The built-in exercise library, in presentation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    exercises: Vec<Exercise>,
}

impl Catalog {
    #[must_use]
    pub fn new(exercises: Vec<Exercise>) -> Self {
        Self { exercises }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(DEFAULT_EXERCISES.iter().map(Exercise::from).collect())
    }
}

impl ExerciseCatalog for Catalog {
    fn exercise(&self, id: &ExerciseID) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == *id)
    }

    fn exercises(&self) -> Vec<&Exercise> {
        self.exercises.iter().collect()
    }
}

impl From<&BaseExercise> for Exercise {
    fn from(value: &BaseExercise) -> Self {
        Exercise {
            id: value.id.into(),
            name: value.name.to_string(),
            category: value.category,
            muscle_groups: value.muscle_groups.to_vec(),
            description: value.description.to_string(),
        }
    }
}

struct BaseExercise {
    id: &'static str,
    name: &'static str,
    category: Category,
    muscle_groups: &'static [MuscleGroup],
    description: &'static str,
}

const DEFAULT_EXERCISES: [BaseExercise; 5] = [
    BaseExercise {
        id: "squat",
        name: "Barbell Back Squat",
        category: Category::Compound,
        muscle_groups: &[
            MuscleGroup::Quadriceps,
            MuscleGroup::Glutes,
            MuscleGroup::Hamstrings,
            MuscleGroup::Core,
        ],
        description: "The king of all exercises. Stand with feet shoulder-width apart, descend until thighs are parallel to the floor.",
    },
    BaseExercise {
        id: "bench",
        name: "Barbell Bench Press",
        category: Category::Compound,
        muscle_groups: &[
            MuscleGroup::Chest,
            MuscleGroup::Shoulders,
            MuscleGroup::Triceps,
        ],
        description: "Lie on bench, lower bar to chest, press up explosively.",
    },
    BaseExercise {
        id: "deadlift",
        name: "Conventional Deadlift",
        category: Category::Compound,
        muscle_groups: &[
            MuscleGroup::Hamstrings,
            MuscleGroup::Glutes,
            MuscleGroup::Back,
            MuscleGroup::Traps,
            MuscleGroup::Core,
        ],
        description: "Hip hinge movement, lift the bar from the floor to standing position.",
    },
    BaseExercise {
        id: "ohp",
        name: "Overhead Press",
        category: Category::Compound,
        muscle_groups: &[
            MuscleGroup::Shoulders,
            MuscleGroup::Triceps,
            MuscleGroup::Core,
        ],
        description: "Standing press, bar from shoulders to overhead, keep core tight.",
    },
    BaseExercise {
        id: "row",
        name: "Barbell Row",
        category: Category::Compound,
        muscle_groups: &[
            MuscleGroup::Lats,
            MuscleGroup::Rhomboids,
            MuscleGroup::RearDelts,
            MuscleGroup::Biceps,
        ],
        description: "Bent over row, pull bar to lower chest, squeeze shoulder blades.",
    },
];
