use iocraft::prelude::*;

use crate::color::ColorDepth;
use crate::filter::{FilterState, RunStateFilter, TAG_FILTER_TITLE, TAG_PLACEHOLDER};
use crate::theme::ResolvedTheme;

// ---------------------------------------------------------------------------
// FilterBar component: quick filters, paused dropdown, tag control
// ---------------------------------------------------------------------------

pub struct RenderedQuickButton {
    /// `"1 All"`, `"2 Failed"`, ...
    pub label: String,
    pub is_active: bool,
}

/// Pre-rendered filter bar (all owned).
pub struct RenderedFilterBar {
    pub buttons: Vec<RenderedQuickButton>,
    pub paused_label: String,
    pub tag_title: String,
    pub tags_text: String,
    /// True when no tag is selected and `tags_text` is the placeholder.
    pub tags_placeholder: bool,
    pub active_fg: Color,
    pub active_bg: Color,
    pub text_fg: Color,
    pub faint_fg: Color,
    pub accent_fg: Color,
    pub border_fg: Color,
}

impl RenderedFilterBar {
    pub fn build(state: &FilterState, theme: &ResolvedTheme, depth: ColorDepth) -> Self {
        let flags = state.quick_filter_flags();
        let buttons = RunStateFilter::BUTTONS
            .iter()
            .enumerate()
            .map(|(i, f)| RenderedQuickButton {
                label: format!("{} {}", i + 1, f.label()),
                is_active: flags.is_active(*f),
            })
            .collect();

        let selected = state.selected_tag_options();
        let tags_placeholder = selected.is_empty();
        let tags_text = if tags_placeholder {
            TAG_PLACEHOLDER.to_owned()
        } else {
            selected
                .iter()
                .map(|o| o.label.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        Self {
            buttons,
            paused_label: state.paused_label().to_owned(),
            tag_title: TAG_FILTER_TITLE.to_owned(),
            tags_text,
            tags_placeholder,
            active_fg: Color::White,
            active_bg: theme.bg_active.to_crossterm_color(depth),
            text_fg: theme.text_primary.to_crossterm_color(depth),
            faint_fg: theme.text_faint.to_crossterm_color(depth),
            accent_fg: theme.text_accent.to_crossterm_color(depth),
            border_fg: theme.border_faint.to_crossterm_color(depth),
        }
    }
}

#[derive(Default, Props)]
pub struct FilterBarProps {
    pub filter_bar: Option<RenderedFilterBar>,
}

#[component]
pub fn FilterBar(props: &mut FilterBarProps) -> impl Into<AnyElement<'static>> {
    let Some(fb) = props.filter_bar.take() else {
        return element! { View }.into_any();
    };

    let tags_fg = if fb.tags_placeholder {
        fb.faint_fg
    } else {
        fb.text_fg
    };

    element! {
        View(
            border_style: BorderStyle::Single,
            border_edges: Edges::Bottom,
            border_color: fb.border_fg,
            padding_left: 1,
            padding_right: 1,
        ) {
            #(fb.buttons.into_iter().enumerate().map(|(i, b)| {
                let (fg, bg, weight) = if b.is_active {
                    (fb.active_fg, fb.active_bg, Weight::Bold)
                } else {
                    (fb.text_fg, Color::Reset, Weight::Normal)
                };
                element! {
                    View(key: i, margin_right: 1, background_color: bg) {
                        Text(content: format!(" {} ", b.label), color: fg, weight, wrap: TextWrap::NoWrap)
                    }
                }
            }))
            Text(content: " \u{2502} ", color: fb.faint_fg, wrap: TextWrap::NoWrap)
            Text(content: "p ", color: fb.faint_fg, wrap: TextWrap::NoWrap)
            Text(content: format!("{} \u{25be}", fb.paused_label), color: fb.accent_fg, wrap: TextWrap::NoWrap)
            Text(content: " \u{2502} ", color: fb.faint_fg, wrap: TextWrap::NoWrap)
            Text(content: "t ", color: fb.faint_fg, wrap: TextWrap::NoWrap)
            View(flex_grow: 1.0) {
                Text(content: fb.tags_text, color: tags_fg, wrap: TextWrap::NoWrap)
            }
            Text(content: fb.tag_title, color: fb.faint_fg, wrap: TextWrap::NoWrap)
        }
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{SearchParamKeys, Theme};
    use crate::params::QueryParams;
    use crate::theme::Background;

    fn build(query: &str) -> RenderedFilterBar {
        let state = FilterState::from_params(&QueryParams::parse(query), &SearchParamKeys::default());
        let theme = ResolvedTheme::resolve(&Theme::default(), Background::Dark);
        RenderedFilterBar::build(&state, &theme, ColorDepth::TrueColor)
    }

    #[test]
    fn buttons_follow_display_order() {
        let fb = build("");
        let labels: Vec<_> = fb.buttons.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["1 All", "2 Failed", "3 Running", "4 Success"]);
        assert!(fb.buttons[0].is_active);
    }

    #[test]
    fn running_lights_third_button() {
        let fb = build("last_dag_run_state=running");
        let active: Vec<_> = fb.buttons.iter().map(|b| b.is_active).collect();
        assert_eq!(active, vec![false, false, true, false]);
    }

    #[test]
    fn placeholder_without_tags() {
        let fb = build("paused=false");
        assert!(fb.tags_placeholder);
        assert_eq!(fb.tags_text, TAG_PLACEHOLDER);
        assert_eq!(fb.paused_label, "Enabled");
    }

    #[test]
    fn selected_tags_joined_in_order() {
        let fb = build("tags=ml&tags=etl");
        assert!(!fb.tags_placeholder);
        assert_eq!(fb.tags_text, "ml, etl");
        assert_eq!(fb.paused_label, "All");
    }
}
