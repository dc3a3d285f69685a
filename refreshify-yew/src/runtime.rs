//! Executes controller effects against the DOM
//!
//! The runtime owns the controller and every resource its effects create:
//! one `Timeout` per timer purpose, the scroll listener and the drag
//! listeners. Timer and listener closures hold a `Weak` reference, so
//! anything firing after the component is gone finds nothing to act on.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use refreshify_core::{
    Controller, Effect, Env, Inputs, LoadStatus, PullConfig, PullState, Step, TimerKind,
    TimerToken,
};
use yew::{Callback, NodeRef};

use crate::dom::{self, ScrollContainer};
use crate::drag::{self, DragAttachment};

#[derive(Clone, Default)]
pub(crate) struct Handlers {
    pub on_refresh: Callback<()>,
    pub on_load_more: Option<Callback<()>>,
}

/// What the component needs to render one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Snapshot {
    pub pull: PullState,
    pub percent: f64,
    pub load_status: LoadStatus,
}

pub(crate) struct Runtime {
    controller: RefCell<Controller>,
    handlers: RefCell<Handlers>,
    timers: RefCell<HashMap<TimerKind, (TimerToken, Timeout)>>,
    scroll_parent: RefCell<Option<ScrollContainer>>,
    scroll_listener: RefCell<Option<EventListener>>,
    drag: RefCell<Option<DragAttachment>>,
    alive: Cell<bool>,
    redraw: Box<dyn Fn()>,
}

impl Runtime {
    pub fn new(controller: Controller, redraw: Box<dyn Fn()>) -> Rc<Self> {
        Rc::new(Self {
            controller: RefCell::new(controller),
            handlers: RefCell::new(Handlers::default()),
            timers: RefCell::new(HashMap::new()),
            scroll_parent: RefCell::new(None),
            scroll_listener: RefCell::new(None),
            drag: RefCell::new(None),
            alive: Cell::new(true),
            redraw,
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        let controller = self.controller.borrow();
        Snapshot {
            pull: controller.pull_state(),
            percent: controller.percent(),
            load_status: controller.load_status(),
        }
    }

    pub fn set_handlers(&self, handlers: Handlers) {
        *self.handlers.borrow_mut() = handlers;
    }

    /// Resolve the scroll parent, attach drag tracking and start the controller
    pub fn mount(self: &Rc<Self>, drag_target: &NodeRef, content: &NodeRef, env: Env) {
        if let Some(content) = content.cast::<web_sys::Element>() {
            *self.scroll_parent.borrow_mut() = dom::resolve_scroll_parent(&content);
        }

        let window = web_sys::window();
        if let (Some(target), Some(window)) = (drag_target.cast::<web_sys::Element>(), window) {
            let on_move: drag::MoveHandler = {
                let weak = Rc::downgrade(self);
                Rc::new(move |event, offset_y| {
                    let Some(runtime) = weak.upgrade() else {
                        return;
                    };
                    let scroll_top = dom::get_scroll_top(runtime.scroll_parent.borrow().as_ref());
                    let step = runtime.controller.borrow_mut().drag_move(offset_y, scroll_top);
                    if step.prevent_default && event.cancelable() {
                        event.prevent_default();
                    }
                    if !step.is_empty() {
                        runtime.apply(step);
                    }
                })
            };
            let on_end: drag::EndHandler = {
                let weak = Rc::downgrade(self);
                Rc::new(move |_event, offset_y| {
                    if let Some(runtime) = weak.upgrade() {
                        let step = runtime.controller.borrow_mut().drag_end(offset_y);
                        runtime.apply(step);
                    }
                })
            };

            let attachment = drag::bind(
                target.as_ref(),
                window.as_ref(),
                env.supports_passive,
                on_move,
                on_end,
            );
            *self.drag.borrow_mut() = Some(attachment);
        }

        let step = self.controller.borrow_mut().mount();
        self.apply(step);
    }

    pub fn unmount(self: &Rc<Self>) {
        let step = self.controller.borrow_mut().unmount();
        self.alive.set(false);
        self.apply(step);

        self.timers.borrow_mut().clear();
        self.scroll_listener.borrow_mut().take();
        self.drag.borrow_mut().take();
    }

    pub fn update(self: &Rc<Self>, inputs: Inputs) {
        let before = self.snapshot();
        let step = self.controller.borrow_mut().update(inputs);
        if step.is_empty() && self.snapshot() == before {
            return;
        }
        self.apply(step);
    }

    pub fn reconfigure(self: &Rc<Self>, config: PullConfig) {
        let result = self.controller.borrow_mut().reconfigure(config);
        match result {
            Ok(step) if step.is_empty() => {}
            Ok(step) => self.apply(step),
            Err(e) => tracing::warn!("ignoring pull config change: {}", e),
        }
    }

    fn apply(self: &Rc<Self>, step: Step) {
        for effect in step.effects {
            match effect {
                Effect::Refresh => {
                    let on_refresh = self.handlers.borrow().on_refresh.clone();
                    on_refresh.emit(());
                }
                Effect::LoadMore => {
                    let on_load_more = self.handlers.borrow().on_load_more.clone();
                    if let Some(on_load_more) = on_load_more {
                        on_load_more.emit(());
                    }
                }
                Effect::ScheduleTimer { token, delay_ms } => self.schedule(token, delay_ms),
                Effect::CancelTimer(token) => {
                    let mut timers = self.timers.borrow_mut();
                    if timers.get(&token.kind).map(|(pending, _)| *pending) == Some(token) {
                        // Dropping the Timeout clears it
                        timers.remove(&token.kind);
                    }
                }
                Effect::BindScroll => self.bind_scroll(),
                Effect::UnbindScroll => {
                    self.scroll_listener.borrow_mut().take();
                }
                Effect::SampleScroll => self.sample_scroll(),
            }
        }

        if self.alive.get() {
            (self.redraw)();
        }
    }

    fn schedule(self: &Rc<Self>, token: TimerToken, delay_ms: u32) {
        if !self.alive.get() {
            return;
        }

        let weak: Weak<Self> = Rc::downgrade(self);
        let timeout = Timeout::new(delay_ms, move || {
            // The expired entry stays until the next timer of this kind replaces it
            let Some(runtime) = weak.upgrade() else {
                return;
            };
            let step = runtime.controller.borrow_mut().timer_fired(token);
            runtime.apply(step);
        });

        // Replacing an entry drops, and so cancels, the older timer
        self.timers.borrow_mut().insert(token.kind, (token, timeout));
    }

    fn bind_scroll(self: &Rc<Self>) {
        let Some(container) = self.scroll_parent.borrow().clone() else {
            tracing::trace!("no scroll container resolved; load more stays idle");
            return;
        };

        let weak = Rc::downgrade(self);
        let listener = dom::on_scroll(&container, move |_| {
            if let Some(runtime) = weak.upgrade() {
                runtime.sample_scroll();
            }
        });
        *self.scroll_listener.borrow_mut() = Some(listener);
    }

    fn sample_scroll(self: &Rc<Self>) {
        let Some(sample) = self
            .scroll_parent
            .borrow()
            .as_ref()
            .map(ScrollContainer::sample)
        else {
            return;
        };

        let step = self.controller.borrow_mut().scroll_sampled(sample);
        if !step.is_empty() {
            self.apply(step);
        }
    }
}
