use std::collections::HashMap;

use iocraft::prelude::*;

use crate::color::{Color as AppColor, ColorDepth};
use crate::util;

// ---------------------------------------------------------------------------
// Column and cell definitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Column {
    /// Key into each [`Row`].
    pub id: &'static str,
    pub header: &'static str,
    /// Share of the total width (0.0..1.0).
    pub width_pct: f32,
    pub align: TextAlign,
}

#[derive(Debug, Clone)]
pub struct Cell {
    pub text: String,
    pub color: Option<AppColor>,
    pub bold: bool,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            bold: false,
        }
    }

    pub fn colored(text: impl Into<String>, color: AppColor) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

pub type Row = HashMap<&'static str, Cell>;

// ---------------------------------------------------------------------------
// Pre-rendered table data
// ---------------------------------------------------------------------------

pub struct RenderedTable {
    pub header_cells: Vec<HeaderCell>,
    pub body_rows: Vec<RenderedRow>,
    pub total_width: u32,
    pub header_fg: Color,
    pub border_fg: Color,
    pub empty_fg: Color,
    pub empty_message: Option<String>,
}

pub struct HeaderCell {
    pub text: String,
    pub width: u32,
    pub align: TextAlign,
}

pub struct RenderedRow {
    pub key: usize,
    pub bg: Option<Color>,
    pub cells: Vec<RenderedCell>,
}

pub struct RenderedCell {
    pub text: String,
    pub fg: Color,
    pub weight: Weight,
    pub width: u32,
    pub align: TextAlign,
}

pub struct TableBuildConfig<'a> {
    pub columns: &'a [Column],
    pub rows: &'a [Row],
    pub cursor: usize,
    pub visible_rows: usize,
    pub total_width: u16,
    pub depth: ColorDepth,
    pub selected_bg: AppColor,
    pub header_color: AppColor,
    pub border_color: AppColor,
    pub faint_color: AppColor,
    /// Shown when `rows` is empty.
    pub empty_message: Option<&'a str>,
}

impl RenderedTable {
    pub fn build(cfg: &TableBuildConfig<'_>) -> Self {
        let depth = cfg.depth;
        let widths = column_widths(cfg.columns, cfg.total_width);
        let selected_bg = cfg.selected_bg.to_crossterm_color(depth);

        let header_cells = cfg
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, &w)| HeaderCell {
                text: col.header.to_owned(),
                width: u32::from(w),
                align: col.align,
            })
            .collect();

        let scroll_offset = scroll_offset(cfg.cursor, cfg.visible_rows);
        let body_rows = cfg
            .rows
            .iter()
            .enumerate()
            .skip(scroll_offset)
            .take(cfg.visible_rows)
            .map(|(idx, row)| RenderedRow {
                key: idx,
                bg: (idx == cfg.cursor).then_some(selected_bg),
                cells: cfg
                    .columns
                    .iter()
                    .zip(&widths)
                    .map(|(col, &w)| {
                        let cell = row.get(col.id);
                        RenderedCell {
                            text: cell.map_or_else(String::new, |c| {
                                util::truncate(&c.text, usize::from(w.saturating_sub(1)))
                            }),
                            fg: cell
                                .and_then(|c| c.color)
                                .map_or(Color::Reset, |c| c.to_crossterm_color(depth)),
                            weight: if cell.is_some_and(|c| c.bold) {
                                Weight::Bold
                            } else {
                                Weight::Normal
                            },
                            width: u32::from(w),
                            align: col.align,
                        }
                    })
                    .collect(),
            })
            .collect();

        Self {
            header_cells,
            body_rows,
            total_width: u32::from(cfg.total_width),
            header_fg: cfg.header_color.to_crossterm_color(depth),
            border_fg: cfg.border_color.to_crossterm_color(depth),
            empty_fg: cfg.faint_color.to_crossterm_color(depth),
            empty_message: if cfg.rows.is_empty() {
                cfg.empty_message.map(str::to_owned)
            } else {
                None
            },
        }
    }
}

/// First visible row so that `cursor` stays on screen.
fn scroll_offset(cursor: usize, visible_rows: usize) -> usize {
    (cursor + 1).saturating_sub(visible_rows.max(1))
}

fn column_widths(columns: &[Column], total: u16) -> Vec<u16> {
    let pct_sum: f32 = columns.iter().map(|c| c.width_pct).sum();
    columns
        .iter()
        .map(|c| {
            let ratio = if pct_sum > 0.0 {
                c.width_pct / pct_sum
            } else {
                #[allow(clippy::cast_precision_loss)]
                {
                    1.0 / columns.len() as f32
                }
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let w = (f32::from(total) * ratio).floor() as u16;
            w.max(1)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// ScrollableTable component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct ScrollableTableProps {
    pub table: Option<RenderedTable>,
}

#[component]
pub fn ScrollableTable(props: &mut ScrollableTableProps) -> impl Into<AnyElement<'static>> {
    let Some(table) = props.table.take() else {
        return element! { View }.into_any();
    };

    element! {
        View(flex_direction: FlexDirection::Column, width: table.total_width) {
            View(
                border_style: BorderStyle::Single,
                border_edges: Edges::Bottom,
                border_color: table.border_fg,
            ) {
                #(table.header_cells.into_iter().enumerate().map(|(i, hc)| {
                    element! {
                        View(key: i, width: hc.width) {
                            Text(
                                content: hc.text,
                                weight: Weight::Bold,
                                color: table.header_fg,
                                wrap: TextWrap::NoWrap,
                                align: hc.align,
                            )
                        }
                    }
                }))
            }
            #(table.empty_message.into_iter().map(|msg| {
                element! {
                    View(padding_top: 1, padding_left: 2) {
                        Text(content: msg, color: table.empty_fg)
                    }
                }
            }))
            #(table.body_rows.into_iter().map(|row| {
                element! {
                    View(key: row.key, background_color: row.bg) {
                        #(row.cells.into_iter().enumerate().map(|(ci, cell)| {
                            element! {
                                View(key: ci, width: cell.width, padding_right: 1) {
                                    Text(
                                        content: cell.text,
                                        color: cell.fg,
                                        weight: cell.weight,
                                        wrap: TextWrap::NoWrap,
                                        align: cell.align,
                                    )
                                }
                            }
                        }))
                    }
                }
            }))
        }
    }
    .into_any()
}
