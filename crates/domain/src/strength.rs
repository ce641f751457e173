//! Estimation of single-repetition capacity and equipment-aware weight rounding.

use strum::{Display, EnumIter};

use crate::{Reps, Weight};

#[derive(Debug, Default, Display, EnumIter, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    #[strum(to_string = "kg")]
    Kilograms,
    #[default]
    #[strum(to_string = "lbs")]
    Pounds,
}

impl Unit {
    /// Smallest weight step available with standard plates.
    #[must_use]
    pub fn increment(self) -> Weight {
        match self {
            Unit::Kilograms => Weight(1.25),
            Unit::Pounds => Weight(2.5),
        }
    }
}

#[derive(Debug, Default, Display, EnumIter, Clone, Copy, PartialEq, Eq)]
pub enum OneRepMaxFormula {
    #[default]
    Epley,
    Brzycki,
}

impl OneRepMaxFormula {
    /// Returns `None` if the formula is undefined for the given number of reps.
    #[must_use]
    pub fn estimate(self, weight: Weight, reps: Reps) -> Option<Weight> {
        match self {
            OneRepMaxFormula::Epley => Some(estimate_one_rep_max(weight, reps)),
            OneRepMaxFormula::Brzycki => estimate_one_rep_max_brzycki(weight, reps),
        }
    }
}

/// Epley estimate, rounded to a whole number and capped at the largest valid weight.
#[must_use]
pub fn estimate_one_rep_max(weight: Weight, reps: Reps) -> Weight {
    if reps.0 == 1 {
        return weight;
    }
    #[allow(clippy::cast_precision_loss)]
    let reps = reps.0 as f32;
    Weight::clamped((weight.0 * (30.0 + reps) / 30.0).round())
}

/// Brzycki estimate, rounded to a whole number.
///
/// The formula diverges at 37 reps, so any input of 37 or more reps yields `None`.
#[must_use]
pub fn estimate_one_rep_max_brzycki(weight: Weight, reps: Reps) -> Option<Weight> {
    if reps.0 == 1 {
        return Some(weight);
    }
    if reps.0 >= 37 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let reps = reps.0 as f32;
    Some(Weight::clamped((weight.0 * 36.0 / (37.0 - reps)).round()))
}

/// Rounds to the nearest plate step, never above the largest valid weight.
#[must_use]
pub fn round_to_increment(weight: Weight, unit: Unit) -> Weight {
    let increment = unit.increment().0;
    Weight::clamped((weight.0 / increment).round() * increment)
}

#[must_use]
pub fn percentage_of_max(one_rep_max: Weight, percent: f32) -> Weight {
    Weight::clamped((one_rep_max.0 * percent / 100.0).round())
}

#[must_use]
pub fn is_set_successful(reps: Reps, target_reps: Reps) -> bool {
    reps >= target_reps
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    use super::*;

    #[rstest]
    #[case(0.0)]
    #[case(61.25)]
    #[case(135.0)]
    #[case(405.0)]
    fn test_estimate_one_rep_max_single_rep(#[case] weight: f32) {
        assert_eq!(estimate_one_rep_max(Weight(weight), Reps(1)), Weight(weight));
    }

    #[rstest]
    #[case(135.0, 5, 158.0)]
    #[case(135.0, 8, 171.0)]
    #[case(100.0, 10, 133.0)]
    #[case(225.0, 3, 248.0)]
    fn test_estimate_one_rep_max(#[case] weight: f32, #[case] reps: u32, #[case] expected: f32) {
        assert_eq!(
            estimate_one_rep_max(Weight(weight), Reps(reps)),
            Weight(expected)
        );
    }

    #[rstest]
    #[case(135.0, 1, Some(135.0))]
    #[case(135.0, 5, Some(152.0))]
    #[case(100.0, 10, Some(133.0))]
    #[case(100.0, 36, Some(3600.0))]
    #[case(100.0, 37, None)]
    #[case(100.0, 50, None)]
    fn test_estimate_one_rep_max_brzycki(
        #[case] weight: f32,
        #[case] reps: u32,
        #[case] expected: Option<f32>,
    ) {
        assert_eq!(
            estimate_one_rep_max_brzycki(Weight(weight), Reps(reps)),
            expected.map(Weight)
        );
    }

    #[test]
    fn test_one_rep_max_formula_estimate() {
        assert_eq!(
            OneRepMaxFormula::iter()
                .map(|f| f.estimate(Weight(100.0), Reps(10)))
                .collect::<Vec<_>>(),
            vec![Some(Weight(133.0)), Some(Weight(133.0))]
        );
        assert_eq!(
            OneRepMaxFormula::Brzycki.estimate(Weight(100.0), Reps(40)),
            None
        );
    }

    #[rstest]
    #[case(128.0, Unit::Pounds, 127.5)]
    #[case(129.0, Unit::Pounds, 130.0)]
    #[case(101.0, Unit::Kilograms, 101.25)]
    #[case(100.5, Unit::Kilograms, 100.0)]
    #[case(0.0, Unit::Kilograms, 0.0)]
    fn test_round_to_increment(#[case] weight: f32, #[case] unit: Unit, #[case] expected: f32) {
        assert_eq!(round_to_increment(Weight(weight), unit), Weight(expected));
    }

    #[rstest]
    #[case(9000.0, 10, 9999.0)]
    #[case(9999.0, 2, 9999.0)]
    #[case(7000.0, 5, 8167.0)]
    fn test_estimate_one_rep_max_capped(
        #[case] weight: f32,
        #[case] reps: u32,
        #[case] expected: f32,
    ) {
        let estimate = estimate_one_rep_max(Weight(weight), Reps(reps));
        assert_eq!(estimate, Weight(expected));
        assert_eq!(Weight::new(estimate.0), Ok(estimate));
        assert!(
            estimate_one_rep_max_brzycki(Weight(weight), Reps(reps))
                .is_some_and(|w| Weight::new(w.0).is_ok())
        );
    }

    #[rstest]
    #[case(9999.0, Unit::Pounds, 9999.0)]
    #[case(9999.0, Unit::Kilograms, 9998.75)]
    fn test_round_to_increment_capped(
        #[case] weight: f32,
        #[case] unit: Unit,
        #[case] expected: f32,
    ) {
        let rounded = round_to_increment(Weight(weight), unit);
        assert_eq!(rounded, Weight(expected));
        assert_eq!(round_to_increment(rounded, unit), rounded);
    }

    #[test]
    fn test_round_to_increment_idempotent() {
        for unit in Unit::iter() {
            for w in 0..2000 {
                #[allow(clippy::cast_precision_loss)]
                let weight = Weight(w as f32 * 0.37);
                let rounded = round_to_increment(weight, unit);
                assert_eq!(round_to_increment(rounded, unit), rounded);
            }
        }
    }

    #[rstest]
    #[case(200.0, 75.0, 150.0)]
    #[case(171.0, 85.0, 145.0)]
    #[case(171.0, 100.0, 171.0)]
    fn test_percentage_of_max(#[case] max: f32, #[case] percent: f32, #[case] expected: f32) {
        assert_eq!(percentage_of_max(Weight(max), percent), Weight(expected));
    }

    #[rstest]
    #[case(5, 5, true)]
    #[case(6, 5, true)]
    #[case(4, 5, false)]
    fn test_is_set_successful(#[case] reps: u32, #[case] target: u32, #[case] expected: bool) {
        assert_eq!(is_set_successful(Reps(reps), Reps(target)), expected);
    }

    #[rstest]
    #[case(Unit::Kilograms, "kg")]
    #[case(Unit::Pounds, "lbs")]
    fn test_unit_display(#[case] unit: Unit, #[case] expected: &str) {
        assert_eq!(unit.to_string(), expected);
    }
}
