//! Pull-to-refresh state machine
//!
//! Owns `(offset_y, transition_duration_ms, status)`. Tracking states
//! (`pulling`, `canRelease`) follow the finger with a zero duration; every
//! other state animates toward its offset with the configured duration.
//!
//! The machine never awaits the refresh it requests. After a release in
//! `canRelease` it emits [`Effect::Refresh`] and waits for the host to flip
//! the `refreshing` input.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::PullConfig;
use crate::effect::Effect;
use crate::resistance::{percent, resist};
use crate::status::PullStatus;
use crate::timer::{TimerKind, TimerSlot, TimerToken};

/// Visible pull state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullState {
    /// Vertical translation of the content area, in px
    pub offset_y: f64,
    /// Transition toward `offset_y`; 0 tracks the finger directly
    pub transition_duration_ms: u32,
    pub status: PullStatus,
}

impl PullState {
    /// State at mount. A view mounted while already refreshing shows the
    /// head immediately, animated.
    pub fn initial(config: &PullConfig, refreshing: bool) -> Self {
        if refreshing {
            Self {
                offset_y: config.head_height,
                transition_duration_ms: config.animation_duration_ms,
                status: PullStatus::Refreshing,
            }
        } else {
            Self {
                offset_y: 0.0,
                transition_duration_ms: 0,
                status: PullStatus::Normal,
            }
        }
    }

    /// Progress toward the refresh threshold, 0..=100
    pub fn percent(&self, config: &PullConfig) -> f64 {
        percent(self.offset_y, config.start_distance, config.threshold())
    }
}

#[derive(Debug, Clone)]
pub struct PullMachine {
    state: PullState,
    complete_timer: TimerSlot,
}

impl PullMachine {
    pub fn new(config: &PullConfig, refreshing: bool) -> Self {
        Self {
            state: PullState::initial(config, refreshing),
            complete_timer: TimerSlot::new(TimerKind::PullComplete),
        }
    }

    pub fn state(&self) -> PullState {
        self.state
    }

    pub fn status(&self) -> PullStatus {
        self.state.status
    }

    pub fn pending_timer(&self) -> Option<TimerToken> {
        self.complete_timer.pending()
    }

    /// Handle a drag move. Returns true when the move is consumed.
    pub fn drag_move(
        &mut self,
        offset_y: f64,
        scroll_top: f64,
        disabled: bool,
        config: &PullConfig,
        effects: &mut Vec<Effect>,
    ) -> bool {
        if offset_y <= 0.0 || scroll_top > 0.0 || self.state.status.is_settling() || disabled {
            trace!(
                offset_y,
                scroll_top,
                status = %self.state.status,
                disabled,
                "drag move ignored"
            );
            return false;
        }

        let offset = resist(offset_y, config.viewport_height, config.resistance);
        let status = if offset - config.start_distance < config.threshold() {
            PullStatus::Pulling
        } else {
            PullStatus::CanRelease
        };

        self.dispatch(status, offset, config, effects);
        true
    }

    pub fn drag_end(&mut self, offset_y: f64, config: &PullConfig, effects: &mut Vec<Effect>) {
        if offset_y == 0.0 {
            return;
        }

        match self.state.status {
            PullStatus::Pulling => self.dispatch(PullStatus::Normal, 0.0, config, effects),
            PullStatus::CanRelease => {
                debug!(offset_y = self.state.offset_y, "pull released past threshold");
                effects.push(Effect::Refresh);
            }
            _ => {}
        }
    }

    /// Apply an edge of the external `refreshing` input
    pub fn refreshing_changed(
        &mut self,
        refreshing: bool,
        config: &PullConfig,
        effects: &mut Vec<Effect>,
    ) {
        let status = if refreshing {
            PullStatus::Refreshing
        } else {
            PullStatus::Complete
        };
        self.dispatch(status, 0.0, config, effects);
    }

    /// Returns false when the token is stale
    pub fn timer_fired(
        &mut self,
        token: TimerToken,
        config: &PullConfig,
        effects: &mut Vec<Effect>,
    ) -> bool {
        if !self.complete_timer.fire(token) {
            trace!(?token, "stale pull timer dropped");
            return false;
        }

        self.dispatch(PullStatus::Normal, 0.0, config, effects);
        true
    }

    pub fn teardown(&mut self, effects: &mut Vec<Effect>) {
        self.complete_timer.cancel(effects);
    }

    fn dispatch(
        &mut self,
        status: PullStatus,
        drag_offset: f64,
        config: &PullConfig,
        effects: &mut Vec<Effect>,
    ) {
        if self.state.status != status {
            debug!(from = %self.state.status, to = %status, "pull status");
        }

        // A pending decay must not land on whatever state replaces `complete`
        if status != PullStatus::Complete {
            self.complete_timer.cancel(effects);
        }

        self.state = match status {
            PullStatus::Pulling | PullStatus::CanRelease => PullState {
                offset_y: drag_offset,
                transition_duration_ms: 0,
                status,
            },
            PullStatus::Refreshing => PullState {
                offset_y: config.head_height,
                transition_duration_ms: config.animation_duration_ms,
                status,
            },
            PullStatus::Complete => {
                self.complete_timer.schedule(config.complete_delay_ms, effects);
                PullState {
                    offset_y: config.head_height,
                    transition_duration_ms: config.animation_duration_ms,
                    status,
                }
            }
            PullStatus::Normal => PullState {
                offset_y: 0.0,
                transition_duration_ms: config.animation_duration_ms,
                status,
            },
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PullConfig {
        PullConfig::default()
            .with_head_height(50.0)
            .with_start_distance(30.0)
            .with_threshold(50.0)
            .with_resistance(0.6)
            .with_viewport_height(800.0)
    }

    #[test]
    fn test_initial_state() {
        let config = config();

        let state = PullState::initial(&config, false);
        assert_eq!(state.status, PullStatus::Normal);
        assert_eq!(state.offset_y, 0.0);
        assert_eq!(state.transition_duration_ms, 0);

        let state = PullState::initial(&config, true);
        assert_eq!(state.status, PullStatus::Refreshing);
        assert_eq!(state.offset_y, 50.0);
        assert_eq!(state.transition_duration_ms, 300);
    }

    #[test]
    fn test_short_drag_is_pulling() {
        let config = config();
        let mut machine = PullMachine::new(&config, false);
        let mut effects = Vec::new();

        assert!(machine.drag_move(100.0, 0.0, false, &config, &mut effects));

        let state = machine.state();
        assert_eq!(state.status, PullStatus::Pulling);
        assert!((state.offset_y - 52.5).abs() < 1e-9);
        assert_eq!(state.transition_duration_ms, 0);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_long_drag_can_release() {
        let config = config();
        let mut machine = PullMachine::new(&config, false);
        let mut effects = Vec::new();

        assert!(machine.drag_move(200.0, 0.0, false, &config, &mut effects));
        assert_eq!(machine.status(), PullStatus::CanRelease);
        assert!((machine.state().percent(&config) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_guards_reject_move() {
        let config = config();
        let mut machine = PullMachine::new(&config, false);
        let mut effects = Vec::new();

        assert!(!machine.drag_move(-20.0, 0.0, false, &config, &mut effects));
        assert!(!machine.drag_move(0.0, 0.0, false, &config, &mut effects));
        assert!(!machine.drag_move(100.0, 12.0, false, &config, &mut effects));
        assert!(!machine.drag_move(100.0, 0.0, true, &config, &mut effects));
        assert_eq!(machine.state(), PullState::initial(&config, false));

        let mut refreshing = PullMachine::new(&config, true);
        assert!(!refreshing.drag_move(100.0, 0.0, false, &config, &mut effects));
        assert_eq!(refreshing.status(), PullStatus::Refreshing);
    }

    #[test]
    fn test_release_while_pulling_springs_back() {
        let config = config();
        let mut machine = PullMachine::new(&config, false);
        let mut effects = Vec::new();

        machine.drag_move(100.0, 0.0, false, &config, &mut effects);
        machine.drag_end(100.0, &config, &mut effects);

        let state = machine.state();
        assert_eq!(state.status, PullStatus::Normal);
        assert_eq!(state.offset_y, 0.0);
        assert_eq!(state.transition_duration_ms, 300);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_release_past_threshold_requests_refresh_only() {
        let config = config();
        let mut machine = PullMachine::new(&config, false);
        let mut effects = Vec::new();

        machine.drag_move(200.0, 0.0, false, &config, &mut effects);
        let before = machine.state();
        machine.drag_end(200.0, &config, &mut effects);

        assert_eq!(effects, vec![Effect::Refresh]);
        assert_eq!(machine.state(), before);
    }

    #[test]
    fn test_zero_release_is_noop() {
        let config = config();
        let mut machine = PullMachine::new(&config, false);
        let mut effects = Vec::new();

        machine.drag_move(200.0, 0.0, false, &config, &mut effects);
        let before = machine.state();
        machine.drag_end(0.0, &config, &mut effects);

        assert!(effects.is_empty());
        assert_eq!(machine.state(), before);
    }

    #[test]
    fn test_refresh_cycle_schedules_one_timer() {
        let config = config();
        let mut machine = PullMachine::new(&config, false);
        let mut effects = Vec::new();

        machine.refreshing_changed(true, &config, &mut effects);
        assert_eq!(machine.status(), PullStatus::Refreshing);
        assert!(effects.is_empty());

        machine.refreshing_changed(false, &config, &mut effects);
        assert_eq!(machine.status(), PullStatus::Complete);
        assert_eq!(machine.state().offset_y, 50.0);
        assert_eq!(effects.len(), 1);

        let token = machine.pending_timer().unwrap();
        assert_eq!(effects[0], Effect::ScheduleTimer { token, delay_ms: 500 });

        effects.clear();
        assert!(machine.timer_fired(token, &config, &mut effects));
        assert_eq!(machine.status(), PullStatus::Normal);
        assert_eq!(machine.state().offset_y, 0.0);
        assert_eq!(machine.state().transition_duration_ms, 300);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_refresh_during_decay_cancels_timer() {
        let config = config();
        let mut machine = PullMachine::new(&config, true);
        let mut effects = Vec::new();

        machine.refreshing_changed(false, &config, &mut effects);
        let token = machine.pending_timer().unwrap();
        effects.clear();

        machine.refreshing_changed(true, &config, &mut effects);
        assert_eq!(effects, vec![Effect::CancelTimer(token)]);

        effects.clear();
        assert!(!machine.timer_fired(token, &config, &mut effects));
        assert_eq!(machine.status(), PullStatus::Refreshing);
    }
}
