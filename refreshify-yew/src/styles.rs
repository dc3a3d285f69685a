//! Inline styles for the component slots

use refreshify_core::PullState;

/// Extra declarations appended to each slot's inline style
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PullStyles {
    pub body: Option<String>,
    pub container: Option<String>,
    pub content: Option<String>,
    pub load_more: Option<String>,
    pub refresh: Option<String>,
}

fn join(base: String, extra: &[Option<&str>]) -> String {
    extra.iter().flatten().fold(base, |mut style, declarations| {
        if !style.is_empty() && !style.ends_with(';') {
            style.push(';');
        }
        style.push_str(declarations);
        style
    })
}

pub(crate) fn container(head_height: f64, styles: &PullStyles, style: Option<&str>) -> String {
    join(
        format!(
            "min-height: {}px; overflow-y: hidden; touch-action: pan-y;",
            head_height
        ),
        &[styles.container.as_deref(), style],
    )
}

pub(crate) fn content(state: &PullState, styles: &PullStyles) -> String {
    join(
        format!(
            "will-change: transform; -webkit-transition: all {ms}ms; transition: all {ms}ms; \
             -webkit-transform: translate3d(0, {y}px, 0); transform: translate3d(0, {y}px, 0);",
            ms = state.transition_duration_ms,
            y = state.offset_y,
        ),
        &[styles.content.as_deref()],
    )
}

pub(crate) fn refresh(head_height: f64, styles: &PullStyles) -> String {
    join(
        format!(
            "display: flex; align-items: center; justify-content: center; color: #909090; \
             font-size: 14px; margin-top: -{h}px; height: {h}px;",
            h = head_height
        ),
        &[styles.refresh.as_deref()],
    )
}

pub(crate) fn body(styles: &PullStyles) -> String {
    join(String::new(), &[styles.body.as_deref()])
}

pub(crate) fn load_more(styles: &PullStyles) -> String {
    join(
        "display: flex; align-items: center; justify-content: center; color: #909090; \
         font-size: 14px;"
            .to_string(),
        &[styles.load_more.as_deref()],
    )
}
