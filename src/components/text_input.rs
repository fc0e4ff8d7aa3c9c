use iocraft::prelude::*;

use crate::color::ColorDepth;
use crate::theme::ResolvedTheme;

// ---------------------------------------------------------------------------
// Single-line prompt (DAG name search)
// ---------------------------------------------------------------------------

pub struct RenderedTextInput {
    pub prompt: String,
    pub text: String,
    pub hint: String,
    pub text_fg: Color,
    pub prompt_fg: Color,
    pub hint_fg: Color,
    pub border_fg: Color,
}

impl RenderedTextInput {
    pub fn build(prompt: &str, text: &str, hint: &str, theme: &ResolvedTheme, depth: ColorDepth) -> Self {
        Self {
            prompt: prompt.to_owned(),
            text: format!("{text}\u{2588}"),
            hint: hint.to_owned(),
            text_fg: theme.text_primary.to_crossterm_color(depth),
            prompt_fg: theme.text_accent.to_crossterm_color(depth),
            hint_fg: theme.text_faint.to_crossterm_color(depth),
            border_fg: theme.border_faint.to_crossterm_color(depth),
        }
    }
}

#[derive(Default, Props)]
pub struct TextInputProps {
    pub input: Option<RenderedTextInput>,
}

#[component]
pub fn TextInput(props: &mut TextInputProps) -> impl Into<AnyElement<'static>> {
    let Some(input) = props.input.take() else {
        return element! { View }.into_any();
    };

    element! {
        View(
            border_style: BorderStyle::Single,
            border_edges: Edges::Top,
            border_color: input.border_fg,
            padding_left: 1,
            padding_right: 1,
        ) {
            Text(content: input.prompt, color: input.prompt_fg, wrap: TextWrap::NoWrap)
            Text(content: " ", color: input.text_fg)
            View(flex_grow: 1.0) {
                Text(content: input.text, color: input.text_fg, wrap: TextWrap::NoWrap)
            }
            Text(content: input.hint, color: input.hint_fg, wrap: TextWrap::NoWrap)
        }
    }
    .into_any()
}
