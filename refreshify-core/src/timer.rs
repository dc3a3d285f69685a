//! Owned handles for scheduled transitions
//!
//! Each purpose gets one [`TimerSlot`] holding at most one pending token.
//! The host keys its real timers by [`TimerToken`] and feeds them back as
//! `Event::TimerFired`; a token that is no longer pending is stale and the
//! firing is dropped.

use serde::{Deserialize, Serialize};

use crate::effect::Effect;

/// What a scheduled timer is for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum TimerKind {
    /// `complete` -> `normal` decay of the pull head
    PullComplete,
    /// `complete` -> `normal` decay of the load-more footer
    LoadComplete,
    /// One-macrotask defer before binding the scroll listener
    ScrollBind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub kind: TimerKind,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct TimerSlot {
    kind: TimerKind,
    generation: u64,
    pending: Option<TimerToken>,
}

impl TimerSlot {
    pub fn new(kind: TimerKind) -> Self {
        Self {
            kind,
            generation: 0,
            pending: None,
        }
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    pub fn pending(&self) -> Option<TimerToken> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Replace any pending timer with a fresh one
    pub fn schedule(&mut self, delay_ms: u32, effects: &mut Vec<Effect>) -> TimerToken {
        self.cancel(effects);

        self.generation += 1;
        let token = TimerToken {
            kind: self.kind,
            generation: self.generation,
        };
        self.pending = Some(token);
        effects.push(Effect::ScheduleTimer { token, delay_ms });
        token
    }

    pub fn cancel(&mut self, effects: &mut Vec<Effect>) {
        if let Some(token) = self.pending.take() {
            effects.push(Effect::CancelTimer(token));
        }
    }

    /// Consume the pending token. Returns false for stale or foreign tokens.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_emits_effect() {
        let mut slot = TimerSlot::new(TimerKind::PullComplete);
        let mut effects = Vec::new();

        let token = slot.schedule(500, &mut effects);

        assert_eq!(effects, vec![Effect::ScheduleTimer { token, delay_ms: 500 }]);
        assert_eq!(slot.pending(), Some(token));
    }

    #[test]
    fn test_reschedule_cancels_previous() {
        let mut slot = TimerSlot::new(TimerKind::LoadComplete);
        let mut effects = Vec::new();

        let first = slot.schedule(500, &mut effects);
        effects.clear();
        let second = slot.schedule(500, &mut effects);

        assert_ne!(first, second);
        assert_eq!(
            effects,
            vec![
                Effect::CancelTimer(first),
                Effect::ScheduleTimer { token: second, delay_ms: 500 },
            ]
        );

        assert!(!slot.fire(first));
        assert!(slot.fire(second));
        assert!(!slot.is_pending());
    }

    #[test]
    fn test_fire_twice_is_stale() {
        let mut slot = TimerSlot::new(TimerKind::ScrollBind);
        let mut effects = Vec::new();

        let token = slot.schedule(0, &mut effects);
        assert!(slot.fire(token));
        assert!(!slot.fire(token));
    }

    #[test]
    fn test_cancel_without_pending_is_silent() {
        let mut slot = TimerSlot::new(TimerKind::PullComplete);
        let mut effects = Vec::new();
        slot.cancel(&mut effects);
        assert!(effects.is_empty());
    }
}
