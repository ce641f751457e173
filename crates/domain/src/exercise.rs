use std::collections::BTreeMap;

use derive_more::Deref;
use strum::{Display, EnumIter, EnumString};

pub trait ExerciseCatalog {
    fn exercise(&self, id: &ExerciseID) -> Option<&Exercise>;
    fn exercises(&self) -> Vec<&Exercise>;

    fn contains(&self, id: &ExerciseID) -> bool {
        self.exercise(id).is_some()
    }
}

impl ExerciseCatalog for BTreeMap<ExerciseID, Exercise> {
    fn exercise(&self, id: &ExerciseID) -> Option<&Exercise> {
        self.get(id)
    }

    fn exercises(&self) -> Vec<&Exercise> {
        self.values().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: String,
    pub category: Category,
    pub muscle_groups: Vec<MuscleGroup>,
    pub description: String,
}

#[derive(
    Deref, derive_more::Display, Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct ExerciseID(String);

impl From<&str> for ExerciseID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ExerciseID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Display, EnumIter, EnumString, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Compound,
    Accessory,
}

#[derive(Debug, Display, EnumIter, EnumString, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum MuscleGroup {
    Quadriceps,
    Hamstrings,
    Glutes,
    Core,
    Chest,
    Shoulders,
    Triceps,
    Biceps,
    Back,
    Traps,
    Lats,
    Rhomboids,
    #[strum(to_string = "rear delts")]
    RearDelts,
}
