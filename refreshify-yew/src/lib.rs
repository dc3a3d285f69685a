//! Refreshify for Yew
//!
//! A pull-to-refresh container with optional scroll-triggered load more,
//! built on the `refreshify-core` state machines. The component owns the
//! drag and scroll listeners and the timers; the parent owns the
//! `refreshing`, `loading_more` and `no_more` flags and flips them as its
//! requests start and finish.
//!
//! ```ignore
//! html! {
//!     <PullToRefreshify
//!         refreshing={*refreshing}
//!         on_refresh={on_refresh}
//!         render_text={Callback::from(|(status, _percent): (PullStatus, f64)| {
//!             html! { {status.to_string()} }
//!         })}
//!     >
//!         { for items.iter().map(|item| html! { <p>{item}</p> }) }
//!     </PullToRefreshify>
//! }
//! ```

mod component;
mod dom;
mod drag;
mod runtime;
mod styles;

pub use component::{PullToRefreshify, PullToRefreshifyProps};
pub use refreshify_core::{LoadStatus, PullStatus};
pub use styles::PullStyles;
