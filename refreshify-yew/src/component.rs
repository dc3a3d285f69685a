//! Pull-to-refresh component with scroll-triggered load more

use refreshify_core::{Controller, Env, Inputs, LoadStatus, PullConfig, PullStatus};
use yew::prelude::*;

use crate::dom;
use crate::runtime::{Handlers, Runtime};
use crate::styles::{self, PullStyles};

#[derive(Properties, PartialEq)]
pub struct PullToRefreshifyProps {
    #[prop_or_default]
    pub children: Children,
    /// Show the refreshing head. The component only reacts to changes.
    #[prop_or_default]
    pub refreshing: bool,
    pub on_refresh: Callback<()>,
    /// Delay before the completed state disappears, in ms
    #[prop_or(500)]
    pub complete_delay: u32,
    /// Settling animation duration, in ms
    #[prop_or(300)]
    pub animation_duration: u32,
    /// Height of the refresh head, in px
    #[prop_or(50.0)]
    pub head_height: f64,
    /// How far to pull before progress starts counting, in px
    #[prop_or(30.0)]
    pub start_distance: f64,
    /// How far past `start_distance` a release triggers a refresh, in px.
    /// Defaults to `head_height`.
    #[prop_or_default]
    pub threshold: Option<f64>,
    /// Scale of difficulty to pull down
    #[prop_or(0.6)]
    pub resistance: f64,
    #[prop_or_default]
    pub disabled: bool,
    /// Renders the head for a status and a 0..=100 progress
    pub render_text: Callback<(PullStatus, f64), Html>,
    #[prop_or(AttrValue::Static("pull-to-refreshify"))]
    pub prefix_cls: AttrValue,
    #[prop_or_default]
    pub class: Option<AttrValue>,
    #[prop_or_default]
    pub style: Option<AttrValue>,
    #[prop_or_default]
    pub styles: PullStyles,
    #[prop_or_default]
    pub enable_load_more: bool,
    /// Show the loading footer. The component only reacts to changes.
    #[prop_or_default]
    pub loading_more: bool,
    #[prop_or_default]
    pub on_load_more: Option<Callback<()>>,
    /// Distance from the bottom that triggers load more, in px
    #[prop_or(50.0)]
    pub load_more_threshold: f64,
    #[prop_or_default]
    pub load_more_disabled: bool,
    /// Show the terminal "no more" footer and stop loading
    #[prop_or_default]
    pub no_more: bool,
    #[prop_or_default]
    pub render_load_more: Option<Callback<LoadStatus, Html>>,
}

impl PullToRefreshifyProps {
    fn config(&self, viewport_height: f64) -> PullConfig {
        PullConfig {
            animation_duration_ms: self.animation_duration,
            complete_delay_ms: self.complete_delay,
            head_height: self.head_height,
            start_distance: self.start_distance,
            resistance: self.resistance,
            threshold: self.threshold,
            load_more_threshold: self.load_more_threshold,
            viewport_height,
        }
    }

    fn inputs(&self) -> Inputs {
        Inputs {
            refreshing: self.refreshing,
            loading_more: self.loading_more,
            no_more: self.no_more,
            disabled: self.disabled,
            load_more_disabled: self.load_more_disabled,
            enable_load_more: self.enable_load_more,
            has_load_more_handler: self.on_load_more.is_some(),
        }
    }
}

#[function_component(PullToRefreshify)]
pub fn pull_to_refreshify(props: &PullToRefreshifyProps) -> Html {
    let container_ref = use_node_ref();
    let content_ref = use_node_ref();
    let redraw = use_force_update();

    let viewport_height = *use_memo((), |_| {
        dom::screen_height().unwrap_or(refreshify_core::config::DEFAULT_VIEWPORT_HEIGHT)
    });
    let env = *use_memo((), |_| Env {
        supports_passive: dom::supports_passive(),
    });
    let config = props.config(viewport_height);
    let inputs = props.inputs();

    let runtime = {
        let config = config.clone();
        use_memo((), move |_| {
            let controller = Controller::new(config, inputs, env).unwrap_or_else(|e| {
                tracing::warn!("invalid pull config, using defaults: {}", e);
                Controller::with_default_config(inputs, env)
            });
            Runtime::new(controller, Box::new(move || redraw.force_update()))
        })
    };

    runtime.set_handlers(Handlers {
        on_refresh: props.on_refresh.clone(),
        on_load_more: props.on_load_more.clone(),
    });

    {
        let runtime = (*runtime).clone();
        let container_ref = container_ref.clone();
        let content_ref = content_ref.clone();
        use_effect_with((), move |_| {
            runtime.mount(&container_ref, &content_ref, env);
            move || runtime.unmount()
        });
    }

    {
        let runtime = (*runtime).clone();
        use_effect_with(inputs, move |inputs| {
            runtime.update(*inputs);
            || ()
        });
    }

    {
        let runtime = (*runtime).clone();
        use_effect_with(config, move |config| {
            runtime.reconfigure(config.clone());
            || ()
        });
    }

    let snapshot = runtime.snapshot();
    let prefix = props.prefix_cls.as_str();
    let class = match &props.class {
        Some(class) => format!("{} {}", prefix, class),
        None => prefix.to_string(),
    };

    let load_more = if props.enable_load_more {
        let text = match &props.render_load_more {
            Some(render) => render.emit(snapshot.load_status),
            None => html! { {snapshot.load_status.default_label()} },
        };
        html! {
            <div class={format!("{}__load-more", prefix)} style={styles::load_more(&props.styles)}>
                {text}
            </div>
        }
    } else {
        html! {}
    };

    html! {
        <div
            ref={container_ref}
            class={class}
            style={styles::container(props.head_height, &props.styles, props.style.as_deref())}
        >
            <div
                ref={content_ref}
                class={format!("{}__content", prefix)}
                style={styles::content(&snapshot.pull, &props.styles)}
            >
                <div
                    key={format!("{:.0}", snapshot.pull.offset_y)}
                    class={format!("{}__refresh", prefix)}
                    style={styles::refresh(props.head_height, &props.styles)}
                >
                    {props.render_text.emit((snapshot.pull.status, snapshot.percent))}
                </div>
                <div class={format!("{}__body", prefix)} style={styles::body(&props.styles)}>
                    {props.children.clone()}
                </div>
                {load_more}
            </div>
        </div>
    }
}
