//! Load-more state machine

use tracing::{debug, trace};

use crate::config::PullConfig;
use crate::effect::Effect;
use crate::status::LoadStatus;
use crate::timer::{TimerKind, TimerSlot, TimerToken};

/// Tracks the footer status and the in-flight guard.
///
/// The in-flight flag serializes scroll-triggered loads: once set, no scroll
/// sample can request another load until the host flips `loading_more` back
/// to false.
#[derive(Debug, Clone)]
pub struct LoadMachine {
    status: LoadStatus,
    in_flight: bool,
    complete_timer: TimerSlot,
}

impl Default for LoadMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadMachine {
    pub fn new() -> Self {
        Self {
            status: LoadStatus::Normal,
            in_flight: false,
            complete_timer: TimerSlot::new(TimerKind::LoadComplete),
        }
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn pending_timer(&self) -> Option<TimerToken> {
        self.complete_timer.pending()
    }

    /// Apply an edge of the external `loading_more` input
    pub fn loading_more_changed(
        &mut self,
        loading_more: bool,
        config: &PullConfig,
        effects: &mut Vec<Effect>,
    ) {
        if loading_more {
            self.set_status(LoadStatus::Loading, effects);
            self.in_flight = true;
        } else if self.status == LoadStatus::Loading {
            self.set_status(LoadStatus::Complete, effects);
            self.in_flight = false;
            self.complete_timer.schedule(config.complete_delay_ms, effects);
        }
    }

    /// The scroll container came within the load-more threshold.
    /// Returns true when a load was requested.
    pub fn threshold_crossed(&mut self, enabled: bool, effects: &mut Vec<Effect>) -> bool {
        if !enabled
            || self.in_flight
            || matches!(self.status, LoadStatus::Loading | LoadStatus::NoMore)
        {
            trace!(enabled, in_flight = self.in_flight, status = %self.status, "load more suppressed");
            return false;
        }

        self.in_flight = true;
        self.set_status(LoadStatus::Loading, effects);
        effects.push(Effect::LoadMore);
        true
    }

    /// Returns false when the token is stale
    pub fn timer_fired(&mut self, token: TimerToken, effects: &mut Vec<Effect>) -> bool {
        if !self.complete_timer.fire(token) {
            trace!(?token, "stale load timer dropped");
            return false;
        }

        self.set_status(LoadStatus::Normal, effects);
        true
    }

    /// Enter or leave the terminal `noMore` state.
    ///
    /// Leaving it while the host still reports `loading_more` resumes the
    /// running load instead of reopening the footer. Returns true when the
    /// status changed.
    pub fn set_no_more(
        &mut self,
        no_more: bool,
        loading_more: bool,
        effects: &mut Vec<Effect>,
    ) -> bool {
        if no_more {
            if self.status == LoadStatus::NoMore {
                return false;
            }
            self.in_flight = false;
            self.set_status(LoadStatus::NoMore, effects);
            true
        } else if self.status == LoadStatus::NoMore {
            self.in_flight = loading_more;
            let status = if loading_more {
                LoadStatus::Loading
            } else {
                LoadStatus::Normal
            };
            self.set_status(status, effects);
            true
        } else {
            false
        }
    }

    pub fn teardown(&mut self, effects: &mut Vec<Effect>) {
        self.complete_timer.cancel(effects);
    }

    fn set_status(&mut self, status: LoadStatus, effects: &mut Vec<Effect>) {
        if self.status != status {
            debug!(from = %self.status, to = %status, "load status");
        }
        if status != LoadStatus::Complete {
            self.complete_timer.cancel(effects);
        }
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossing_requests_one_load() {
        let mut machine = LoadMachine::new();
        let mut effects = Vec::new();

        assert!(machine.threshold_crossed(true, &mut effects));
        assert!(!machine.threshold_crossed(true, &mut effects));
        assert!(!machine.threshold_crossed(true, &mut effects));

        assert_eq!(effects, vec![Effect::LoadMore]);
        assert_eq!(machine.status(), LoadStatus::Loading);
        assert!(machine.is_in_flight());
    }

    #[test]
    fn test_disabled_crossing_is_ignored() {
        let mut machine = LoadMachine::new();
        let mut effects = Vec::new();

        assert!(!machine.threshold_crossed(false, &mut effects));
        assert_eq!(machine.status(), LoadStatus::Normal);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_loading_cycle() {
        let config = PullConfig::default();
        let mut machine = LoadMachine::new();
        let mut effects = Vec::new();

        machine.loading_more_changed(true, &config, &mut effects);
        assert_eq!(machine.status(), LoadStatus::Loading);
        assert!(machine.is_in_flight());

        machine.loading_more_changed(false, &config, &mut effects);
        assert_eq!(machine.status(), LoadStatus::Complete);
        assert!(!machine.is_in_flight());

        let token = machine.pending_timer().unwrap();
        assert_eq!(effects, vec![Effect::ScheduleTimer { token, delay_ms: 500 }]);

        effects.clear();
        assert!(machine.timer_fired(token, &mut effects));
        assert_eq!(machine.status(), LoadStatus::Normal);
    }

    #[test]
    fn test_falling_edge_outside_loading_is_ignored() {
        let config = PullConfig::default();
        let mut machine = LoadMachine::new();
        let mut effects = Vec::new();

        machine.loading_more_changed(false, &config, &mut effects);
        assert_eq!(machine.status(), LoadStatus::Normal);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_crossing_during_decay_cancels_timer() {
        let config = PullConfig::default();
        let mut machine = LoadMachine::new();
        let mut effects = Vec::new();

        machine.loading_more_changed(true, &config, &mut effects);
        machine.loading_more_changed(false, &config, &mut effects);
        let token = machine.pending_timer().unwrap();
        effects.clear();

        assert!(machine.threshold_crossed(true, &mut effects));
        assert_eq!(effects, vec![Effect::CancelTimer(token), Effect::LoadMore]);
        assert!(!machine.timer_fired(token, &mut effects));
        assert_eq!(machine.status(), LoadStatus::Loading);
    }

    #[test]
    fn test_no_more_blocks_loads() {
        let mut machine = LoadMachine::new();
        let mut effects = Vec::new();

        assert!(machine.set_no_more(true, false, &mut effects));
        assert_eq!(machine.status(), LoadStatus::NoMore);
        assert!(!machine.threshold_crossed(true, &mut effects));

        assert!(machine.set_no_more(false, false, &mut effects));
        assert_eq!(machine.status(), LoadStatus::Normal);
        assert!(machine.threshold_crossed(true, &mut effects));
    }

    #[test]
    fn test_leaving_no_more_mid_load_stays_in_flight() {
        let config = PullConfig::default();
        let mut machine = LoadMachine::new();
        let mut effects = Vec::new();

        assert!(machine.threshold_crossed(true, &mut effects));
        machine.loading_more_changed(true, &config, &mut effects);
        assert!(machine.set_no_more(true, true, &mut effects));
        assert!(!machine.is_in_flight());

        assert!(machine.set_no_more(false, true, &mut effects));
        assert_eq!(machine.status(), LoadStatus::Loading);
        assert!(machine.is_in_flight());

        effects.clear();
        assert!(!machine.threshold_crossed(true, &mut effects));
        assert!(effects.is_empty());
    }
}
