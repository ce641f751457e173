//! Turns an exercise's performance history into the next session's prescription.

use chrono::{DateTime, Utc};
use log::debug;

use crate::{ExerciseID, Reps, Unit, Weight, round_to_increment};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prescription {
    pub weight: Weight,
    pub reps: Reps,
    pub sets: u32,
}

impl Prescription {
    /// Prescription for an exercise without a baseline test.
    pub const UNTESTED: Prescription = Prescription {
        weight: Weight(0.0),
        reps: Reps(5),
        sets: 3,
    };

    #[must_use]
    pub fn needs_foundation_test(&self) -> bool {
        self.weight.is_zero()
    }
}

/// Progression state of a single exercise.
///
/// At most one of the two session counters is nonzero at any time.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionRule {
    exercise_id: ExerciseID,
    successful_sessions: u32,
    failed_sessions: u32,
    last_weight_increase: Option<DateTime<Utc>>,
    current_weight: Weight,
    plateau_count: u32,
}

impl ProgressionRule {
    #[must_use]
    pub fn new(exercise_id: ExerciseID, current_weight: Weight) -> Self {
        Self {
            exercise_id,
            successful_sessions: 0,
            failed_sessions: 0,
            last_weight_increase: None,
            current_weight,
            plateau_count: 0,
        }
    }

    pub fn restore(
        exercise_id: ExerciseID,
        successful_sessions: u32,
        failed_sessions: u32,
        last_weight_increase: Option<DateTime<Utc>>,
        current_weight: Weight,
        plateau_count: u32,
    ) -> Result<Self, ProgressionRuleError> {
        if successful_sessions > 0 && failed_sessions > 0 {
            return Err(ProgressionRuleError::ConflictingCounters);
        }

        Ok(Self {
            exercise_id,
            successful_sessions,
            failed_sessions,
            last_weight_increase,
            current_weight,
            plateau_count,
        })
    }

    #[must_use]
    pub fn exercise_id(&self) -> &ExerciseID {
        &self.exercise_id
    }

    #[must_use]
    pub fn successful_sessions(&self) -> u32 {
        self.successful_sessions
    }

    #[must_use]
    pub fn failed_sessions(&self) -> u32 {
        self.failed_sessions
    }

    #[must_use]
    pub fn last_weight_increase(&self) -> Option<DateTime<Utc>> {
        self.last_weight_increase
    }

    #[must_use]
    pub fn current_weight(&self) -> Weight {
        self.current_weight
    }

    #[must_use]
    pub fn plateau_count(&self) -> u32 {
        self.plateau_count
    }

    #[must_use]
    pub fn is_deload_due(&self) -> bool {
        self.plateau_count >= 2
    }

    /// Records the outcome of a session.
    ///
    /// A session succeeds if every prescribed set was completed with at least the target
    /// number of reps. This is independent of personal records.
    #[must_use]
    pub fn apply_outcome(
        &self,
        completed_all_targets: bool,
        new_target_weight: Weight,
        now: DateTime<Utc>,
    ) -> Self {
        let mut rule = self.clone();

        if completed_all_targets {
            rule.successful_sessions += 1;
            rule.failed_sessions = 0;
            rule.plateau_count = 0;

            if new_target_weight > self.current_weight {
                rule.last_weight_increase = Some(now);
                rule.current_weight = new_target_weight;
            }
        } else {
            rule.failed_sessions += 1;
            rule.successful_sessions = 0;

            if rule.failed_sessions >= 2 {
                rule.plateau_count += 1;
            }
        }

        debug!(
            "updated progression of {}: {} successful, {} failed, plateau {}, {} current",
            rule.exercise_id,
            rule.successful_sessions,
            rule.failed_sessions,
            rule.plateau_count,
            rule.current_weight
        );

        rule
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ProgressionRuleError {
    #[error("successful and failed sessions must not both be nonzero")]
    ConflictingCounters,
}

/// Computes the prescription for the next session of an exercise.
#[must_use]
pub fn prescribe_next(
    rule: Option<&ProgressionRule>,
    estimated_max: Option<Weight>,
    unit: Unit,
) -> Prescription {
    let (Some(rule), Some(estimated_max)) = (rule, estimated_max.filter(|m| !m.is_zero())) else {
        return Prescription::UNTESTED;
    };

    let increment = unit.increment();
    let base_weight = rule.current_weight;

    let mut weight = base_weight;
    let mut reps = Reps(5);
    let mut sets = 3;

    if rule.successful_sessions >= 1 && rule.failed_sessions == 0 {
        weight = round_to_increment(base_weight + increment, unit);
    }

    if rule.is_deload_due() {
        weight = round_to_increment(base_weight * 0.85, unit);
        reps = Reps(5);
        sets = 3;
    }

    let percent = weight.0 * 100.0 / estimated_max.0;

    if percent > 90.0 {
        reps = Reps(3);
        sets = 3;
    } else if percent > 85.0 {
        reps = Reps(4);
        sets = 3;
    }

    Prescription {
        weight: if weight < increment { increment } else { weight },
        reps,
        sets,
    }
}
