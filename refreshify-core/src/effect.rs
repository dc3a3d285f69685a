//! Messages into the controller and side effects out of it

use crate::scroll::ScrollSample;
use crate::timer::TimerToken;

/// Input the controller reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Raw vertical displacement since the gesture started, positive downward.
    /// `scroll_top` is the scroll container offset sampled with the move.
    DragMoved { offset_y: f64, scroll_top: f64 },
    /// Terminal event of a gesture
    DragEnded { offset_y: f64 },
    RefreshingChanged(bool),
    ScrollSampled(ScrollSample),
    LoadingMoreChanged(bool),
    TimerFired(TimerToken),
}

/// Work the host must perform after a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Invoke `on_refresh`, fire and forget
    Refresh,
    /// Invoke `on_load_more`, fire and forget
    LoadMore,
    /// Start a one-shot timer and report it back with `Event::TimerFired`
    ScheduleTimer { token: TimerToken, delay_ms: u32 },
    CancelTimer(TimerToken),
    /// Attach the passive scroll listener to the resolved container
    BindScroll,
    UnbindScroll,
    /// Read the scroll container now and report `Event::ScrollSampled`
    SampleScroll,
}

/// Outcome of feeding one event (or input snapshot) to the controller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Step {
    pub effects: Vec<Effect>,
    /// The drag move was taken over; native scrolling should not proceed
    pub consumed: bool,
    /// The host must also call `preventDefault` on the native event
    pub prevent_default: bool,
}

impl Step {
    pub fn from_effects(effects: Vec<Effect>) -> Self {
        Self {
            effects,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && !self.consumed
    }

    pub fn count(&self, effect: &Effect) -> usize {
        self.effects.iter().filter(|e| *e == effect).count()
    }

    /// Tokens of every timer this step schedules
    pub fn scheduled(&self) -> Vec<TimerToken> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::ScheduleTimer { token, .. } => Some(*token),
                _ => None,
            })
            .collect()
    }

    pub fn merge(&mut self, other: Step) {
        self.effects.extend(other.effects);
        self.consumed |= other.consumed;
        self.prevent_default |= other.prevent_default;
    }
}
