use iocraft::prelude::*;

use crate::color::ColorDepth;
use crate::theme::ResolvedTheme;

// ---------------------------------------------------------------------------
// Footer component: location, page position, status
// ---------------------------------------------------------------------------

pub struct RenderedFooter {
    /// Current location rendered as `?query`, or `/` when empty.
    pub location: String,
    pub page_text: String,
    pub status_text: String,
    pub status_is_error: bool,
    pub help_hint: String,
    pub text_fg: Color,
    pub accent_fg: Color,
    pub error_fg: Color,
    pub border_fg: Color,
}

impl RenderedFooter {
    pub fn build(
        location: String,
        page_text: String,
        status_text: String,
        status_is_error: bool,
        theme: &ResolvedTheme,
        depth: ColorDepth,
    ) -> Self {
        Self {
            location: if location.is_empty() {
                "/".to_owned()
            } else {
                location
            },
            page_text,
            status_text,
            status_is_error,
            help_hint: "[ ] history  q quit".to_owned(),
            text_fg: theme.text_faint.to_crossterm_color(depth),
            accent_fg: theme.text_accent.to_crossterm_color(depth),
            error_fg: theme.text_error.to_crossterm_color(depth),
            border_fg: theme.border_faint.to_crossterm_color(depth),
        }
    }
}

/// `"51-100 of 230"`, or `"0 DAGs"` for an empty result.
pub fn format_page_position(offset: usize, shown: usize, total: usize) -> String {
    if total == 0 || shown == 0 {
        return "0 DAGs".to_owned();
    }
    format!(
        "{}-{} of {total}",
        offset.saturating_add(1),
        offset.saturating_add(shown)
    )
}

#[derive(Default, Props)]
pub struct FooterProps {
    pub footer: Option<RenderedFooter>,
}

#[component]
pub fn Footer(props: &mut FooterProps) -> impl Into<AnyElement<'static>> {
    let Some(f) = props.footer.take() else {
        return element! { View }.into_any();
    };

    let status_fg = if f.status_is_error {
        f.error_fg
    } else {
        f.text_fg
    };

    let mut middle = vec![MixedTextContent::new(&f.page_text).color(f.text_fg)];
    if !f.status_text.is_empty() {
        middle.push(MixedTextContent::new("  \u{2022}  ").color(f.text_fg));
        middle.push(MixedTextContent::new(&f.status_text).color(status_fg));
    }

    element! {
        View(
            border_style: BorderStyle::Single,
            border_edges: Edges::Top,
            border_color: f.border_fg,
            padding_left: 1,
            padding_right: 1,
        ) {
            Text(content: f.location.clone(), color: f.accent_fg, wrap: TextWrap::NoWrap)
            Text(content: " \u{2502} ", color: f.text_fg, wrap: TextWrap::NoWrap)
            View(flex_grow: 1.0) {
                MixedText(contents: middle, wrap: TextWrap::NoWrap)
            }
            Text(content: " \u{2502} ", color: f.text_fg, wrap: TextWrap::NoWrap)
            Text(content: f.help_hint.clone(), color: f.text_fg, wrap: TextWrap::NoWrap)
        }
    }
    .into_any()
}
