use iocraft::prelude::*;

use indexmap::IndexSet;

use crate::color::ColorDepth;
use crate::filter::{NO_TAGS_MESSAGE, TAG_FILTER_TITLE, TagList, TagOption};
use crate::theme::ResolvedTheme;

// ---------------------------------------------------------------------------
// Option filtering
// ---------------------------------------------------------------------------

/// Options whose label contains `query`, ignoring case.
pub(crate) fn filter_tag_options(options: &[TagOption], query: &str) -> Vec<TagOption> {
    if query.is_empty() {
        return options.to_vec();
    }
    let lower = query.to_lowercase();
    options
        .iter()
        .filter(|o| o.label.to_lowercase().contains(&lower))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Pre-rendered tag select overlay
// ---------------------------------------------------------------------------

pub struct TagSelectItem {
    pub label: String,
    pub is_selected: bool,
}

pub struct RenderedTagSelect {
    pub title: String,
    pub query: String,
    pub items: Vec<TagSelectItem>,
    pub cursor: usize,
    /// Shown instead of items when there is nothing to pick.
    pub empty_message: Option<String>,
    pub title_fg: Color,
    pub item_fg: Color,
    pub check_fg: Color,
    pub cursor_bg: Color,
    pub border_fg: Color,
    pub hint_fg: Color,
}

impl RenderedTagSelect {
    pub fn build(
        tag_list: &TagList,
        selected: &IndexSet<String>,
        query: &str,
        cursor: usize,
        theme: &ResolvedTheme,
        depth: ColorDepth,
    ) -> Self {
        let options = filter_tag_options(&tag_list.options(), query);
        let empty_message = if options.is_empty() {
            Some(if tag_list.is_pending() {
                "Loading tags\u{2026}".to_owned()
            } else {
                NO_TAGS_MESSAGE.to_owned()
            })
        } else {
            None
        };
        let items = options
            .into_iter()
            .map(|o| TagSelectItem {
                is_selected: selected.contains(&o.value),
                label: o.label,
            })
            .collect::<Vec<_>>();

        Self {
            title: TAG_FILTER_TITLE.to_owned(),
            query: query.to_owned(),
            cursor: cursor.min(items.len().saturating_sub(1)),
            items,
            empty_message,
            title_fg: theme.text_primary.to_crossterm_color(depth),
            item_fg: theme.text_secondary.to_crossterm_color(depth),
            check_fg: theme.text_success.to_crossterm_color(depth),
            cursor_bg: theme.bg_selected.to_crossterm_color(depth),
            border_fg: theme.border_primary.to_crossterm_color(depth),
            hint_fg: theme.text_faint.to_crossterm_color(depth),
        }
    }
}

// ---------------------------------------------------------------------------
// TagSelect component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct TagSelectProps {
    pub overlay: Option<RenderedTagSelect>,
    pub width: u16,
    pub height: u16,
}

#[component]
pub fn TagSelect(props: &mut TagSelectProps) -> impl Into<AnyElement<'static>> {
    let Some(overlay) = props.overlay.take() else {
        return element! { View }.into_any();
    };

    let width = u32::from(props.width);
    let height = u32::from(props.height);

    // Centered, ~40% width; title + search + items + borders.
    let max_items = height.saturating_sub(8).max(1) as usize;
    #[allow(clippy::cast_possible_truncation)]
    let rows = overlay.items.len().clamp(1, max_items) as u32;
    let overlay_width = (width * 2 / 5).max(36).min(width.saturating_sub(4));
    let overlay_height = (rows + 6).min(height.saturating_sub(2));
    let pad_left = width.saturating_sub(overlay_width) / 2;
    let pad_top = height.saturating_sub(overlay_height) / 2;

    // Keep the cursor inside the visible window.
    let first = overlay.cursor.saturating_sub(max_items.saturating_sub(1));
    let cursor = overlay.cursor;

    element! {
        View(
            width,
            height,
            position: Position::Absolute,
        ) {
            View(
                margin_left: pad_left,
                margin_top: pad_top,
                width: overlay_width,
                height: overlay_height,
                flex_direction: FlexDirection::Column,
                border_style: BorderStyle::Round,
                border_color: overlay.border_fg,
                background_color: Color::Reset,
                overflow: Overflow::Hidden,
            ) {
                View(
                    border_style: BorderStyle::Single,
                    border_edges: Edges::Bottom,
                    border_color: overlay.border_fg,
                    padding_left: 1,
                    padding_right: 1,
                ) {
                    Text(
                        content: overlay.title,
                        color: overlay.title_fg,
                        weight: Weight::Bold,
                        wrap: TextWrap::NoWrap,
                    )
                    View(flex_grow: 1.0)
                    Text(
                        content: "Space toggle  ^X clear  Esc",
                        color: overlay.hint_fg,
                        wrap: TextWrap::NoWrap,
                    )
                }
                View(padding_left: 1, padding_right: 1) {
                    Text(content: "/ ", color: overlay.hint_fg, wrap: TextWrap::NoWrap)
                    Text(
                        content: format!("{}\u{2588}", overlay.query),
                        color: overlay.title_fg,
                        wrap: TextWrap::NoWrap,
                    )
                }
                View(
                    flex_grow: 1.0,
                    flex_direction: FlexDirection::Column,
                    padding_left: 1,
                    padding_right: 1,
                    overflow: Overflow::Hidden,
                ) {
                    #(overlay.empty_message.map(|msg| element! {
                        Text(content: msg, color: overlay.hint_fg, wrap: TextWrap::NoWrap)
                    }))
                    #(overlay.items.into_iter().enumerate().skip(first).take(max_items).map(|(i, item)| {
                        let bg = if i == cursor { overlay.cursor_bg } else { Color::Reset };
                        let (mark, mark_fg) = if item.is_selected {
                            ("[x] ", overlay.check_fg)
                        } else {
                            ("[ ] ", overlay.hint_fg)
                        };
                        element! {
                            View(key: i, background_color: bg) {
                                Text(content: mark, color: mark_fg, wrap: TextWrap::NoWrap)
                                Text(content: item.label, color: overlay.item_fg, wrap: TextWrap::NoWrap)
                            }
                        }.into_any()
                    }))
                }
            }
        }
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::Theme;
    use crate::theme::Background;

    fn theme() -> ResolvedTheme {
        ResolvedTheme::resolve(&Theme::default(), Background::Dark)
    }

    fn options(tags: &[&str]) -> Vec<TagOption> {
        tags.iter().map(|t| TagOption::new(*t)).collect()
    }

    #[test]
    fn empty_query_keeps_every_option() {
        assert_eq!(filter_tag_options(&options(&["etl", "ml"]), "").len(), 2);
    }

    #[test]
    fn query_matches_substring_case_insensitively() {
        let result = filter_tag_options(&options(&["ETL", "ml", "reporting"]), "t");
        let labels: Vec<_> = result.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["ETL", "reporting"]);
    }

    #[test]
    fn empty_tag_list_shows_no_tags_message() {
        let o = RenderedTagSelect::build(&TagList::Empty, &IndexSet::new(), "", 0, &theme(), ColorDepth::TrueColor);
        assert!(o.items.is_empty());
        assert_eq!(o.empty_message.as_deref(), Some(NO_TAGS_MESSAGE));
    }

    #[test]
    fn pending_tag_list_shows_loading_message() {
        let o = RenderedTagSelect::build(&TagList::Pending, &IndexSet::new(), "", 0, &theme(), ColorDepth::TrueColor);
        assert!(o.items.is_empty());
        assert_eq!(o.empty_message.as_deref(), Some("Loading tags\u{2026}"));
    }

    #[test]
    fn no_match_shows_no_tags_message() {
        let list = TagList::Ready(vec!["etl".to_owned()]);
        let o = RenderedTagSelect::build(&list, &IndexSet::new(), "zzz", 0, &theme(), ColorDepth::TrueColor);
        assert_eq!(o.empty_message.as_deref(), Some(NO_TAGS_MESSAGE));
    }

    #[test]
    fn selected_tags_are_checked() {
        let list = TagList::Ready(vec!["etl".to_owned(), "ml".to_owned()]);
        let selected: IndexSet<String> = ["ml".to_owned()].into_iter().collect();
        let o = RenderedTagSelect::build(&list, &selected, "", 5, &theme(), ColorDepth::TrueColor);
        let checked: Vec<_> = o.items.iter().map(|i| i.is_selected).collect();
        assert_eq!(checked, vec![false, true]);
        assert_eq!(o.cursor, 1);
    }
}
