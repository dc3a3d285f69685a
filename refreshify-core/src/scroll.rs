//! Scroll sampling and scroll listener lifecycle

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::effect::Effect;
use crate::timer::{TimerKind, TimerSlot, TimerToken};

/// One reading of the scroll container
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollSample {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollSample {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    pub fn distance_to_bottom(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }

    pub fn within(&self, threshold: f64) -> bool {
        self.distance_to_bottom() <= threshold
    }
}

/// Everything the scroll listener depends on. Any change rebinds it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BindingKey {
    pub enable_load_more: bool,
    pub has_handler: bool,
    pub disabled: bool,
    pub threshold: f64,
}

impl BindingKey {
    pub fn is_active(&self) -> bool {
        self.enable_load_more && self.has_handler && !self.disabled
    }
}

/// Binds the scroll listener one macrotask after configuration settles,
/// and unbinds it before any rebind.
#[derive(Debug, Clone)]
pub struct ScrollMonitor {
    key: Option<BindingKey>,
    bind_timer: TimerSlot,
    bound: bool,
}

impl Default for ScrollMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollMonitor {
    pub fn new() -> Self {
        Self {
            key: None,
            bind_timer: TimerSlot::new(TimerKind::ScrollBind),
            bound: false,
        }
    }

    pub fn key(&self) -> Option<BindingKey> {
        self.key
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn pending_bind(&self) -> Option<TimerToken> {
        self.bind_timer.pending()
    }

    pub fn is_bind_pending(&self) -> bool {
        self.bind_timer.is_pending()
    }

    /// Tear down and schedule a fresh bind when `key` differs from the last one
    pub fn reconfigure(&mut self, key: BindingKey, effects: &mut Vec<Effect>) {
        if self.key == Some(key) {
            return;
        }

        self.teardown(effects);
        self.key = Some(key);

        if key.is_active() {
            debug!(threshold = key.threshold, "scheduling scroll listener bind");
            self.bind_timer.schedule(0, effects);
        }
    }

    /// The deferred bind is due: attach, then check eagerly for short content
    pub fn timer_fired(&mut self, token: TimerToken, effects: &mut Vec<Effect>) -> bool {
        if !self.bind_timer.fire(token) {
            return false;
        }

        self.bound = true;
        effects.push(Effect::BindScroll);
        effects.push(Effect::SampleScroll);
        true
    }

    pub fn teardown(&mut self, effects: &mut Vec<Effect>) {
        if self.bound {
            self.bound = false;
            effects.push(Effect::UnbindScroll);
        }
        self.bind_timer.cancel(effects);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(enable_load_more: bool) -> BindingKey {
        BindingKey {
            enable_load_more,
            has_handler: true,
            disabled: false,
            threshold: 50.0,
        }
    }

    #[test]
    fn test_distance_to_bottom() {
        let sample = ScrollSample::new(360.0, 1000.0, 600.0);
        assert_eq!(sample.distance_to_bottom(), 40.0);
        assert!(sample.within(50.0));
        assert!(!sample.within(39.0));
    }

    #[test]
    fn test_inactive_key_never_binds() {
        let mut monitor = ScrollMonitor::new();
        let mut effects = Vec::new();

        monitor.reconfigure(key(false), &mut effects);
        assert!(effects.is_empty());

        let mut no_handler = key(true);
        no_handler.has_handler = false;
        monitor.reconfigure(no_handler, &mut effects);
        assert!(effects.is_empty());
        assert!(!monitor.is_bind_pending());
    }

    #[test]
    fn test_bind_is_deferred_then_eager_sample() {
        let mut monitor = ScrollMonitor::new();
        let mut effects = Vec::new();

        monitor.reconfigure(key(true), &mut effects);
        let token = match effects.as_slice() {
            [Effect::ScheduleTimer { token, delay_ms: 0 }] => *token,
            other => panic!("unexpected effects: {:?}", other),
        };
        assert!(!monitor.is_bound());

        effects.clear();
        assert!(monitor.timer_fired(token, &mut effects));
        assert_eq!(effects, vec![Effect::BindScroll, Effect::SampleScroll]);
        assert!(monitor.is_bound());
    }

    #[test]
    fn test_same_key_is_noop() {
        let mut monitor = ScrollMonitor::new();
        let mut effects = Vec::new();

        monitor.reconfigure(key(true), &mut effects);
        effects.clear();
        monitor.reconfigure(key(true), &mut effects);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_rebind_unbinds_before_scheduling() {
        let mut monitor = ScrollMonitor::new();
        let mut effects = Vec::new();

        monitor.reconfigure(key(true), &mut effects);
        let first = monitor.bind_timer.pending().unwrap();
        monitor.timer_fired(first, &mut effects);
        effects.clear();

        let mut wider = key(true);
        wider.threshold = 120.0;
        monitor.reconfigure(wider, &mut effects);

        assert_eq!(effects[0], Effect::UnbindScroll);
        assert!(matches!(effects[1], Effect::ScheduleTimer { delay_ms: 0, .. }));
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn test_reconfigure_cancels_pending_bind() {
        let mut monitor = ScrollMonitor::new();
        let mut effects = Vec::new();

        monitor.reconfigure(key(true), &mut effects);
        let first = monitor.bind_timer.pending().unwrap();
        effects.clear();

        let mut disabled = key(true);
        disabled.disabled = true;
        monitor.reconfigure(disabled, &mut effects);

        assert_eq!(effects, vec![Effect::CancelTimer(first)]);
        assert!(!monitor.timer_fired(first, &mut effects));
        assert!(!monitor.is_bound());
    }
}
