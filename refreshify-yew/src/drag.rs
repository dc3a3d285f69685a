//! Touch and mouse drag tracking
//!
//! Normalizes native input into `on_move(event, offset_y)` calls and a
//! single `on_end(event, offset_y)` per gesture, where `offset_y` is the
//! vertical displacement since the gesture started.

use std::cell::Cell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, MouseEvent, TouchEvent};

pub(crate) type MoveHandler = Rc<dyn Fn(&Event, f64)>;
pub(crate) type EndHandler = Rc<dyn Fn(&Event, f64)>;

#[derive(Default)]
struct Gesture {
    start_y: Cell<Option<f64>>,
    offset_y: Cell<f64>,
}

impl Gesture {
    fn begin(&self, client_y: f64) {
        self.start_y.set(Some(client_y));
        self.offset_y.set(0.0);
    }

    fn track(&self, client_y: f64) -> Option<f64> {
        let start = self.start_y.get()?;
        let offset = client_y - start;
        self.offset_y.set(offset);
        Some(offset)
    }

    fn finish(&self) -> Option<f64> {
        self.start_y.take()?;
        Some(self.offset_y.replace(0.0))
    }
}

/// Listeners attached for one drag target. Dropping detaches them.
pub(crate) struct DragAttachment {
    _listeners: Vec<EventListener>,
}

/// Attach drag tracking to `target`.
///
/// `passive_moves` registers the move listeners passively; it must be false
/// when the host wants to cancel consumed moves.
pub(crate) fn bind(
    target: &EventTarget,
    window: &EventTarget,
    passive_moves: bool,
    on_move: MoveHandler,
    on_end: EndHandler,
) -> DragAttachment {
    let gesture = Rc::new(Gesture::default());
    let move_options = if passive_moves {
        EventListenerOptions::default()
    } else {
        EventListenerOptions::enable_prevent_default()
    };

    let mut listeners = Vec::with_capacity(7);

    {
        let gesture = gesture.clone();
        listeners.push(EventListener::new(target, "touchstart", move |event| {
            // Multi-finger gestures are not tracked
            if let Some(y) = single_touch_y(event) {
                gesture.begin(y);
            }
        }));
    }

    {
        let gesture = gesture.clone();
        let on_move = on_move.clone();
        listeners.push(EventListener::new_with_options(
            target,
            "touchmove",
            move_options,
            move |event| {
                if let Some(offset) = single_touch_y(event).and_then(|y| gesture.track(y)) {
                    on_move(event, offset);
                }
            },
        ));
    }

    for name in ["touchend", "touchcancel"] {
        let gesture = gesture.clone();
        let on_end = on_end.clone();
        listeners.push(EventListener::new(target, name, move |event| {
            if let Some(offset) = gesture.finish() {
                on_end(event, offset);
            }
        }));
    }

    {
        let gesture = gesture.clone();
        listeners.push(EventListener::new(target, "mousedown", move |event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                if mouse.button() == 0 {
                    gesture.begin(mouse.client_y() as f64);
                }
            }
        }));
    }

    // Mouse moves and releases are followed on the window so a drag that
    // leaves the target still ends
    {
        let gesture = gesture.clone();
        listeners.push(EventListener::new_with_options(
            window,
            "mousemove",
            move_options,
            move |event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                if let Some(offset) = gesture.track(mouse.client_y() as f64) {
                    on_move(event, offset);
                }
            },
        ));
    }

    listeners.push(EventListener::new(window, "mouseup", move |event| {
        if let Some(offset) = gesture.finish() {
            on_end(event, offset);
        }
    }));

    DragAttachment {
        _listeners: listeners,
    }
}

fn single_touch_y(event: &Event) -> Option<f64> {
    let touches = event.dyn_ref::<TouchEvent>()?.touches();
    if touches.length() != 1 {
        return None;
    }
    touches.get(0).map(|touch| touch.client_y() as f64)
}
