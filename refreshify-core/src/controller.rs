//! Composes the pull machine, the load machine and the scroll monitor
//! behind a single event/effect API.
//!
//! Hosts feed every external signal in as an [`Event`] or a fresh
//! [`Inputs`] snapshot and perform the returned [`Effect`]s. Edge-triggered
//! inputs are compared against the previous snapshot; the snapshot given at
//! construction never fires an edge.

use tracing::{debug, trace};

use crate::config::PullConfig;
use crate::effect::{Effect, Event, Step};
use crate::load::LoadMachine;
use crate::pull::{PullMachine, PullState};
use crate::scroll::{BindingKey, ScrollMonitor, ScrollSample};
use crate::status::{LoadStatus, PullStatus};
use crate::timer::{TimerKind, TimerToken};
use crate::Result;

/// Externally owned flags, sampled on every render
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inputs {
    /// Edge-triggered
    pub refreshing: bool,
    /// Edge-triggered
    pub loading_more: bool,
    /// Edge-triggered; forces the terminal `noMore` footer
    pub no_more: bool,
    pub disabled: bool,
    pub load_more_disabled: bool,
    pub enable_load_more: bool,
    /// An `on_load_more` handler exists; without one load more stays off
    pub has_load_more_handler: bool,
}

impl Inputs {
    pub fn binding_key(&self, config: &PullConfig) -> BindingKey {
        BindingKey {
            enable_load_more: self.enable_load_more,
            has_handler: self.has_load_more_handler,
            disabled: self.load_more_disabled,
            threshold: config.load_more_threshold,
        }
    }

    pub fn load_more_active(&self) -> bool {
        self.enable_load_more && self.has_load_more_handler && !self.load_more_disabled
    }
}

/// Platform facts the controller cannot observe itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Env {
    /// `addEventListener` honours `{ passive }`. Without it, consumed
    /// moves must block the native default themselves.
    pub supports_passive: bool,
}

impl Default for Env {
    fn default() -> Self {
        Self {
            supports_passive: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Mounted,
    Unmounted,
}

#[derive(Debug, Clone)]
pub struct Controller {
    config: PullConfig,
    env: Env,
    inputs: Inputs,
    pull: PullMachine,
    load: LoadMachine,
    monitor: ScrollMonitor,
    lifecycle: Lifecycle,
}

impl Controller {
    pub fn new(config: PullConfig, inputs: Inputs, env: Env) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, inputs, env))
    }

    /// Controller over [`PullConfig::default`], which always validates
    pub fn with_default_config(inputs: Inputs, env: Env) -> Self {
        Self::build(PullConfig::default(), inputs, env)
    }

    fn build(config: PullConfig, inputs: Inputs, env: Env) -> Self {
        let pull = PullMachine::new(&config, inputs.refreshing);
        let mut load = LoadMachine::new();
        if inputs.no_more {
            load.set_no_more(true, inputs.loading_more, &mut Vec::new());
        }

        Self {
            config,
            env,
            inputs,
            pull,
            load,
            monitor: ScrollMonitor::new(),
            lifecycle: Lifecycle::Created,
        }
    }

    /// Start side effects: schedules the deferred scroll listener bind
    pub fn mount(&mut self) -> Step {
        if self.lifecycle != Lifecycle::Created {
            return Step::default();
        }
        self.lifecycle = Lifecycle::Mounted;

        let mut effects = Vec::new();
        self.monitor
            .reconfigure(self.inputs.binding_key(&self.config), &mut effects);
        Step::from_effects(effects)
    }

    /// Cancel every pending timer and unbind the scroll listener.
    /// Events arriving afterwards are dropped.
    pub fn unmount(&mut self) -> Step {
        if self.lifecycle == Lifecycle::Unmounted {
            return Step::default();
        }
        self.lifecycle = Lifecycle::Unmounted;

        let mut effects = Vec::new();
        self.pull.teardown(&mut effects);
        self.load.teardown(&mut effects);
        self.monitor.teardown(&mut effects);
        debug!(cancelled = effects.len(), "controller unmounted");
        Step::from_effects(effects)
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    pub fn config(&self) -> &PullConfig {
        &self.config
    }

    pub fn inputs(&self) -> Inputs {
        self.inputs
    }

    pub fn pull_state(&self) -> PullState {
        self.pull.state()
    }

    pub fn pull_status(&self) -> PullStatus {
        self.pull.status()
    }

    pub fn load_status(&self) -> LoadStatus {
        self.load.status()
    }

    pub fn is_load_in_flight(&self) -> bool {
        self.load.is_in_flight()
    }

    pub fn is_scroll_bound(&self) -> bool {
        self.monitor.is_bound()
    }

    pub fn percent(&self) -> f64 {
        self.pull.state().percent(&self.config)
    }

    /// Timer the host should currently hold for `kind`, if any
    pub fn pending_timer(&self, kind: TimerKind) -> Option<TimerToken> {
        match kind {
            TimerKind::PullComplete => self.pull.pending_timer(),
            TimerKind::LoadComplete => self.load.pending_timer(),
            TimerKind::ScrollBind => self.monitor.pending_bind(),
        }
    }

    /// Swap the tunables; a changed load-more threshold rebinds the listener
    pub fn reconfigure(&mut self, config: PullConfig) -> Result<Step> {
        config.validate()?;
        if config == self.config {
            return Ok(Step::default());
        }
        self.config = config;

        let mut effects = Vec::new();
        if self.lifecycle == Lifecycle::Mounted {
            self.monitor
                .reconfigure(self.inputs.binding_key(&self.config), &mut effects);
        }
        Ok(Step::from_effects(effects))
    }

    /// Step with a fresh snapshot of the external flags
    pub fn update(&mut self, inputs: Inputs) -> Step {
        if self.lifecycle == Lifecycle::Unmounted {
            return Step::default();
        }

        let mut step = Step::default();
        step.merge(self.handle(Event::RefreshingChanged(inputs.refreshing)));
        step.merge(self.handle(Event::LoadingMoreChanged(inputs.loading_more)));
        step.merge(self.set_no_more(inputs.no_more));

        self.inputs.disabled = inputs.disabled;
        self.inputs.load_more_disabled = inputs.load_more_disabled;
        self.inputs.enable_load_more = inputs.enable_load_more;
        self.inputs.has_load_more_handler = inputs.has_load_more_handler;

        if self.lifecycle == Lifecycle::Mounted {
            self.monitor
                .reconfigure(self.inputs.binding_key(&self.config), &mut step.effects);
        }
        step
    }

    /// Explicit entry into (or exit from) the terminal `noMore` footer.
    ///
    /// This writes the same flag as [`Inputs::no_more`]: the next
    /// [`Controller::update`] whose snapshot disagrees fires the opposite
    /// edge and overrides it. Hosts that drive `no_more` through snapshots
    /// should not also call this.
    pub fn set_no_more(&mut self, no_more: bool) -> Step {
        if self.lifecycle == Lifecycle::Unmounted || self.inputs.no_more == no_more {
            return Step::default();
        }
        self.inputs.no_more = no_more;

        let mut effects = Vec::new();
        let changed = self
            .load
            .set_no_more(no_more, self.inputs.loading_more, &mut effects);
        // A resumed load keeps its in-flight guard and needs no resample
        if changed && self.load.status() == LoadStatus::Normal && self.monitor.is_bound() {
            effects.push(Effect::SampleScroll);
        }
        Step::from_effects(effects)
    }

    pub fn drag_move(&mut self, offset_y: f64, scroll_top: f64) -> Step {
        self.handle(Event::DragMoved {
            offset_y,
            scroll_top,
        })
    }

    pub fn drag_end(&mut self, offset_y: f64) -> Step {
        self.handle(Event::DragEnded { offset_y })
    }

    pub fn scroll_sampled(&mut self, sample: ScrollSample) -> Step {
        self.handle(Event::ScrollSampled(sample))
    }

    pub fn timer_fired(&mut self, token: TimerToken) -> Step {
        self.handle(Event::TimerFired(token))
    }

    pub fn handle(&mut self, event: Event) -> Step {
        if self.lifecycle == Lifecycle::Unmounted {
            trace!(?event, "event dropped after unmount");
            return Step::default();
        }

        let mut step = Step::default();
        let effects = &mut step.effects;

        match event {
            Event::DragMoved {
                offset_y,
                scroll_top,
            } => {
                let consumed = self.pull.drag_move(
                    offset_y,
                    scroll_top,
                    self.inputs.disabled,
                    &self.config,
                    effects,
                );
                step.consumed = consumed;
                step.prevent_default = consumed && !self.env.supports_passive;
            }
            Event::DragEnded { offset_y } => {
                self.pull.drag_end(offset_y, &self.config, effects);
            }
            Event::RefreshingChanged(refreshing) => {
                if self.inputs.refreshing != refreshing {
                    self.inputs.refreshing = refreshing;
                    self.pull.refreshing_changed(refreshing, &self.config, effects);
                }
            }
            Event::LoadingMoreChanged(loading_more) => {
                if self.inputs.loading_more != loading_more {
                    self.inputs.loading_more = loading_more;
                    self.load
                        .loading_more_changed(loading_more, &self.config, effects);
                }
            }
            Event::ScrollSampled(sample) => {
                if sample.within(self.config.load_more_threshold) {
                    trace!(distance = sample.distance_to_bottom(), "scroll within load threshold");
                    self.load
                        .threshold_crossed(self.inputs.load_more_active(), effects);
                }
            }
            Event::TimerFired(token) => match token.kind {
                TimerKind::PullComplete => {
                    self.pull.timer_fired(token, &self.config, effects);
                }
                TimerKind::LoadComplete => {
                    // Content may still be short enough to need another page
                    if self.load.timer_fired(token, effects) && self.monitor.is_bound() {
                        effects.push(Effect::SampleScroll);
                    }
                }
                TimerKind::ScrollBind => {
                    self.monitor.timer_fired(token, effects);
                }
            },
        }

        step
    }
}
