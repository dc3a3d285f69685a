//! DOM measurement helpers

use std::cell::Cell;
use std::rc::Rc;

use gloo_events::EventListener;
use js_sys::{Object, Reflect};
use refreshify_core::ScrollSample;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Element, EventTarget, Window};

/// Where scroll offsets are read from
#[derive(Clone, Debug)]
pub(crate) enum ScrollContainer {
    Window(Window),
    Element(Element),
}

impl ScrollContainer {
    pub fn target(&self) -> &EventTarget {
        match self {
            ScrollContainer::Window(window) => window.as_ref(),
            ScrollContainer::Element(element) => element.as_ref(),
        }
    }

    pub fn scroll_top(&self) -> f64 {
        match self {
            ScrollContainer::Window(window) => window.scroll_y().unwrap_or_else(|_| {
                window
                    .document()
                    .and_then(|doc| doc.document_element())
                    .map(|root| root.scroll_top() as f64)
                    .unwrap_or(0.0)
            }),
            ScrollContainer::Element(element) => element.scroll_top() as f64,
        }
    }

    /// For the window, the tallest of document and body; the viewport
    /// height stands in for the client height.
    pub fn sample(&self) -> ScrollSample {
        let (scroll_height, client_height) = match self {
            ScrollContainer::Window(window) => {
                let document = window.document();
                let root_height = document
                    .as_ref()
                    .and_then(|doc| doc.document_element())
                    .map(|root| root.scroll_height())
                    .unwrap_or(0);
                let body_height = document
                    .as_ref()
                    .and_then(|doc| doc.body())
                    .map(|body| body.scroll_height())
                    .unwrap_or(0);
                let inner_height = window
                    .inner_height()
                    .ok()
                    .and_then(|value| value.as_f64())
                    .unwrap_or(0.0);
                (root_height.max(body_height) as f64, inner_height)
            }
            ScrollContainer::Element(element) => {
                (element.scroll_height() as f64, element.client_height() as f64)
            }
        };

        ScrollSample::new(self.scroll_top(), scroll_height, client_height)
    }
}

/// Nearest ancestor of `node` that scrolls vertically, or the window
pub(crate) fn resolve_scroll_parent(node: &Element) -> Option<ScrollContainer> {
    let window = web_sys::window()?;
    let mut current = node.parent_element();

    while let Some(element) = current {
        let overflow_y = window
            .get_computed_style(&element)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value("overflow-y").ok())
            .unwrap_or_default();

        if matches!(overflow_y.as_str(), "auto" | "scroll" | "overlay") {
            return Some(ScrollContainer::Element(element));
        }

        // Document scrolling is handled through the window
        if element.tag_name().eq_ignore_ascii_case("body") {
            break;
        }
        current = element.parent_element();
    }

    Some(ScrollContainer::Window(window))
}

pub(crate) fn get_scroll_top(container: Option<&ScrollContainer>) -> f64 {
    container.map(ScrollContainer::scroll_top).unwrap_or(0.0)
}

/// Display height used to normalize the resistance curve
pub(crate) fn screen_height() -> Option<f64> {
    let height = web_sys::window()?.screen().ok()?.height().ok()?;
    (height > 0).then_some(height as f64)
}

/// Whether `addEventListener` reads the `passive` option.
///
/// Registers a throwaway listener with an options object whose `passive`
/// getter records that it was read.
pub(crate) fn supports_passive() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };

    let touched = Rc::new(Cell::new(false));
    let getter = {
        let touched = touched.clone();
        Closure::<dyn FnMut() -> JsValue>::new(move || {
            touched.set(true);
            JsValue::FALSE
        })
    };

    let descriptor = Object::new();
    if Reflect::set(&descriptor, &"get".into(), getter.as_ref()).is_err() {
        return false;
    }
    let options = Object::define_property(&Object::new(), &"passive".into(), &descriptor);
    let options: &AddEventListenerOptions = options.unchecked_ref();

    let noop = Closure::<dyn FnMut()>::new(|| {});
    let callback: &js_sys::Function = noop.as_ref().unchecked_ref();
    let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
        "test-passive",
        callback,
        options,
    );
    let _ = window.remove_event_listener_with_callback("test-passive", callback);

    touched.get()
}

/// Passive scroll listener on the resolved container
pub(crate) fn on_scroll<F>(container: &ScrollContainer, callback: F) -> EventListener
where
    F: FnMut(&web_sys::Event) + 'static,
{
    // `EventListener::new` registers passively
    EventListener::new(container.target(), "scroll", callback)
}
