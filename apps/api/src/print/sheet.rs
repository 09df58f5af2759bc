//! Practice sheet generator.
//!
//! One block per selected entry: a reference cell showing the character over a
//! 米-grid, followed by `lines` rows of `practice_cells_per_row` blank cells.
//! Output depends only on its inputs; the date stamp is passed in.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::models::{PrintLayoutConfig, SelectedEntry};
use crate::print::document::{Document, Element};
use crate::print::styles::stylesheet;
use crate::selection::SelectionState;

pub const SHEET_TITLE: &str = "汉字书写练习";
pub const ANIMAL_GLYPHS: [&str; 8] = ["🐶", "🐱", "🐰", "🐼", "🦊", "🐯", "🐨", "🐸"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrintError {
    #[error("nothing to print: select at least one character")]
    NothingToPrint,
}

/// Builds the document tree for `selection`.
pub fn build_sheet(
    selection: &SelectionState,
    layout: &PrintLayoutConfig,
    date: NaiveDate,
) -> Result<Document, PrintError> {
    if selection.is_empty() {
        return Err(PrintError::NothingToPrint);
    }

    let date_stamp = date.format("%Y-%m-%d").to_string();

    let head = Element::new("head")
        .child(Element::void("meta").attr("charset", "utf-8"))
        .child(
            Element::void("meta")
                .attr("name", "viewport")
                .attr("content", "width=device-width, initial-scale=1"),
        )
        .child(Element::new("title").text(format!("汉字练习帖 {date_stamp}")))
        .child(Element::raw_text("style", stylesheet(layout)));

    let blocks = selection
        .entries()
        .iter()
        .map(|entry| char_block(entry, layout));

    let body = Element::new("body")
        .child(header(layout, &date_stamp))
        .child(Element::new("main").class("sheet").children(blocks));

    let root = Element::new("html")
        .attr("lang", "zh-CN")
        .child(head)
        .child(body);

    debug!(
        entries = selection.len(),
        grid_size = %layout.grid_size,
        "Built practice sheet"
    );

    Ok(Document::new(root))
}

/// Builds and serializes the sheet in one step.
pub fn render_sheet(
    selection: &SelectionState,
    layout: &PrintLayoutConfig,
    date: NaiveDate,
) -> Result<String, PrintError> {
    build_sheet(selection, layout, date).map(|doc| doc.render())
}

fn header(layout: &PrintLayoutConfig, date_stamp: &str) -> Element {
    let banner = if layout.decorative_header {
        Element::new("div")
            .class("ornaments")
            .attr("aria-hidden", "true")
            .children(
                ANIMAL_GLYPHS
                    .iter()
                    .map(|glyph| Element::new("span").class("ornament").text(*glyph)),
            )
    } else {
        Element::new("h1").class("sheet-title").text(SHEET_TITLE)
    };

    Element::new("header")
        .class("sheet-header")
        .child(banner)
        .child(
            Element::new("div")
                .class("sheet-date")
                .text(format!("日期：{date_stamp}")),
        )
}

fn char_block(entry: &SelectedEntry, layout: &PrintLayoutConfig) -> Element {
    let per_row = layout.grid_size.practice_cells_per_row();

    let reference = guide_cell("reference-cell").child(
        Element::new("span")
            .class("glyph")
            .text(entry.character.to_string()),
    );

    let rows = (0..entry.lines).map(|_| {
        Element::new("div")
            .class("practice-row")
            .children((0..per_row).map(|_| guide_cell("practice-cell")))
    });

    Element::new("section")
        .class("char-block")
        .attr("data-char", entry.character.to_string())
        .attr("data-lines", entry.lines.to_string())
        .child(reference)
        .child(Element::new("div").class("practice-rows").children(rows))
}

/// A square cell with border, dashed diagonals and dashed midlines.
fn guide_cell(role: &str) -> Element {
    let guide = |x1: u8, y1: u8, x2: u8, y2: u8| {
        Element::self_closing("line")
            .class("grid-guide")
            .attr("x1", x1.to_string())
            .attr("y1", y1.to_string())
            .attr("x2", x2.to_string())
            .attr("y2", y2.to_string())
    };

    let svg = Element::new("svg")
        .attr("xmlns", "http://www.w3.org/2000/svg")
        .attr("viewBox", "0 0 100 100")
        .attr("preserveAspectRatio", "none")
        .child(guide(0, 0, 100, 100))
        .child(guide(100, 0, 0, 100))
        .child(guide(50, 0, 50, 100))
        .child(guide(0, 50, 100, 50))
        .child(
            Element::self_closing("rect")
                .class("grid-border")
                .attr("x", "1")
                .attr("y", "1")
                .attr("width", "98")
                .attr("height", "98"),
        );

    Element::new("div").class(format!("cell {role}")).child(svg)
}
