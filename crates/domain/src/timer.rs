use log::debug;

use crate::{ExerciseID, Time};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Nothing changed.
    Idle,
    /// One second elapsed and the countdown continues.
    Running,
    /// The countdown reached zero with this tick.
    Finished,
}

/// The single rest timer shared by the whole application.
///
/// A paused timer is inactive with time remaining. A finished or stopped timer is inactive
/// with no time remaining.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TimerState {
    is_active: bool,
    time_remaining: u32,
    total_time: u32,
    exercise_id: Option<ExerciseID>,
}

impl TimerState {
    /// Starts a countdown, discarding any previous timer state.
    #[must_use]
    pub fn start(duration: Time, exercise_id: Option<ExerciseID>) -> Self {
        Self {
            is_active: duration.0 > 0,
            time_remaining: duration.0,
            total_time: duration.0,
            exercise_id,
        }
    }

    #[must_use]
    pub fn restore(
        is_active: bool,
        time_remaining: u32,
        total_time: u32,
        exercise_id: Option<ExerciseID>,
    ) -> Self {
        let total_time = total_time.max(time_remaining);
        Self {
            is_active: is_active && time_remaining > 0,
            time_remaining,
            total_time,
            exercise_id,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        !self.is_active && self.time_remaining > 0
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn total_time(&self) -> u32 {
        self.total_time
    }

    #[must_use]
    pub fn exercise_id(&self) -> Option<&ExerciseID> {
        self.exercise_id.as_ref()
    }

    /// Fraction of the countdown that has elapsed.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.total_time == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let progress = (self.total_time - self.time_remaining) as f32 / self.total_time as f32;
        progress
    }

    pub fn pause(&mut self) {
        self.is_active = false;
    }

    pub fn resume(&mut self) {
        if self.time_remaining > 0 {
            self.is_active = true;
        }
    }

    pub fn stop(&mut self) {
        *self = Self::default();
    }

    pub fn tick(&mut self) -> TimerEvent {
        if !self.is_active || self.time_remaining == 0 {
            return TimerEvent::Idle;
        }

        self.time_remaining -= 1;

        if self.time_remaining == 0 {
            self.is_active = false;
            debug!("rest timer of {} s finished", self.total_time);
            TimerEvent::Finished
        } else {
            TimerEvent::Running
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_timer_runs_down() {
        let mut timer = TimerState::start(Time(90), Some("squat".into()));
        for _ in 0..89 {
            assert_eq!(timer.tick(), TimerEvent::Running);
        }
        assert_eq!(timer.tick(), TimerEvent::Finished);
        assert!(!timer.is_active());
        assert_eq!(timer.time_remaining(), 0);

        let finished = timer.clone();
        assert_eq!(timer.tick(), TimerEvent::Idle);
        assert_eq!(timer, finished);
    }

    #[test]
    fn test_timer_start_replaces_previous() {
        let mut timer = TimerState::start(Time(180), Some("squat".into()));
        timer.tick();
        timer.pause();
        timer = TimerState::start(Time(60), None);
        assert_eq!(timer, TimerState::restore(true, 60, 60, None));
    }

    #[test]
    fn test_timer_start_zero() {
        let mut timer = TimerState::start(Time(0), None);
        assert!(!timer.is_active());
        assert_eq!(timer.tick(), TimerEvent::Idle);
    }

    #[test]
    fn test_timer_pause_resume() {
        let mut timer = TimerState::start(Time(10), Some("bench".into()));
        timer.tick();
        timer.pause();
        assert!(timer.is_paused());
        assert_eq!(timer.tick(), TimerEvent::Idle);
        assert_eq!(timer.time_remaining(), 9);

        timer.resume();
        assert!(timer.is_active());
        assert_eq!(timer.tick(), TimerEvent::Running);
        assert_eq!(timer.time_remaining(), 8);
        assert_eq!(timer.total_time(), 10);
        assert_eq!(timer.exercise_id(), Some(&ExerciseID::from("bench")));
    }

    #[test]
    fn test_timer_resume_finished() {
        let mut timer = TimerState::start(Time(1), None);
        assert_eq!(timer.tick(), TimerEvent::Finished);
        timer.resume();
        assert!(!timer.is_active());
    }

    #[test]
    fn test_timer_stop() {
        let mut timer = TimerState::start(Time(30), Some("row".into()));
        timer.stop();
        assert_eq!(timer, TimerState::default());
        assert_eq!(timer.tick(), TimerEvent::Idle);
    }

    #[test]
    fn test_timer_progress() {
        let mut timer = TimerState::start(Time(4), None);
        assert_approx_eq!(timer.progress(), 0.0);
        timer.tick();
        assert_approx_eq!(timer.progress(), 0.25);
        assert_approx_eq!(TimerState::default().progress(), 0.0);
    }
}
