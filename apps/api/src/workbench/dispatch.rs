//! Role-keyed event dispatch.
//!
//! A renderer reports which kind of element fired and a string payload (the
//! character, the search term, the selected option). The table maps that role
//! to a workbench handler, so no handler depends on a rendering technology.

use std::collections::HashMap;

use tracing::debug;

use super::{PrintRequest, Workbench};
use crate::catalog::Band;
use crate::models::{Character, GridSizeTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiRole {
    /// A character in the catalog grid. Payload: the character.
    CatalogItem,
    /// A chip in the selected strip. Payload: the character.
    SelectedChip,
    ClearAll,
    PrintButton,
    /// Payload: the raw search text.
    SearchInput,
    /// Payload: `all`, `basic` or `common`.
    BandFilter,
    /// Payload: free text to harvest characters from.
    CustomInput,
    PrevPage,
    NextPage,
    /// Payload: `small`, `medium` or `large`.
    GridSize,
    /// Payload: `true` or `false`.
    DecorativeHeader,
    /// Payload: `<character>=<lines>`, e.g. `永=3`.
    LineCount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEvent {
    pub role: UiRole,
    pub value: String,
}

impl UiEvent {
    pub fn new(role: UiRole, value: impl Into<String>) -> Self {
        Self {
            role,
            value: value.into(),
        }
    }

    pub fn click(role: UiRole) -> Self {
        Self::new(role, "")
    }
}

/// Follow-up work the caller must perform after a synchronous dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Await `Workbench::submit_print` with this request.
    Print(PrintRequest),
}

pub type Handler = fn(&mut Workbench, &str) -> Effect;

pub struct DispatchTable {
    handlers: HashMap<UiRole, Handler>,
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl DispatchTable {
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Table wired for every role.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        table.register(UiRole::CatalogItem, on_catalog_item);
        table.register(UiRole::SelectedChip, on_selected_chip);
        table.register(UiRole::ClearAll, on_clear_all);
        table.register(UiRole::PrintButton, on_print_button);
        table.register(UiRole::SearchInput, on_search_input);
        table.register(UiRole::BandFilter, on_band_filter);
        table.register(UiRole::CustomInput, on_custom_input);
        table.register(UiRole::PrevPage, on_prev_page);
        table.register(UiRole::NextPage, on_next_page);
        table.register(UiRole::GridSize, on_grid_size);
        table.register(UiRole::DecorativeHeader, on_decorative_header);
        table.register(UiRole::LineCount, on_line_count);
        table
    }

    /// Replaces any handler already bound to `role`, returning it.
    pub fn register(&mut self, role: UiRole, handler: Handler) -> Option<Handler> {
        self.handlers.insert(role, handler)
    }

    pub fn unregister(&mut self, role: UiRole) -> Option<Handler> {
        self.handlers.remove(&role)
    }

    pub fn handles(&self, role: UiRole) -> bool {
        self.handlers.contains_key(&role)
    }

    pub fn dispatch(&self, workbench: &mut Workbench, event: &UiEvent) -> Effect {
        match self.handlers.get(&event.role) {
            Some(handler) => handler(workbench, &event.value),
            None => {
                debug!("No handler bound for {:?}", event.role);
                Effect::None
            }
        }
    }
}

fn parse_character(value: &str) -> Option<Character> {
    match value.trim().parse::<Character>() {
        Ok(c) => Some(c),
        Err(e) => {
            debug!("Ignoring event payload: {e}");
            None
        }
    }
}

fn on_catalog_item(wb: &mut Workbench, value: &str) -> Effect {
    if let Some(c) = parse_character(value) {
        wb.toggle(c);
    }
    Effect::None
}

fn on_selected_chip(wb: &mut Workbench, value: &str) -> Effect {
    if let Some(c) = parse_character(value) {
        wb.remove(c);
    }
    Effect::None
}

fn on_clear_all(wb: &mut Workbench, _: &str) -> Effect {
    wb.clear_all();
    Effect::None
}

fn on_print_button(wb: &mut Workbench, _: &str) -> Effect {
    wb.prepare_print().map_or(Effect::None, Effect::Print)
}

fn on_search_input(wb: &mut Workbench, value: &str) -> Effect {
    wb.set_search(value);
    Effect::None
}

fn on_band_filter(wb: &mut Workbench, value: &str) -> Effect {
    match value.parse::<Band>() {
        Ok(band) => wb.set_band(band),
        Err(e) => debug!("Ignoring band filter: {e}"),
    }
    Effect::None
}

fn on_custom_input(wb: &mut Workbench, value: &str) -> Effect {
    wb.add_custom(value);
    Effect::None
}

fn on_prev_page(wb: &mut Workbench, _: &str) -> Effect {
    wb.prev_page();
    Effect::None
}

fn on_next_page(wb: &mut Workbench, _: &str) -> Effect {
    wb.next_page();
    Effect::None
}

fn on_grid_size(wb: &mut Workbench, value: &str) -> Effect {
    match value.parse::<GridSizeTier>() {
        Ok(tier) => wb.set_grid_size(tier),
        Err(e) => debug!("Ignoring grid size: {e}"),
    }
    Effect::None
}

fn on_decorative_header(wb: &mut Workbench, value: &str) -> Effect {
    match value.trim().parse::<bool>() {
        Ok(enabled) => wb.set_decorative_header(enabled),
        Err(e) => debug!("Ignoring decorative header flag: {e}"),
    }
    Effect::None
}

fn on_line_count(wb: &mut Workbench, value: &str) -> Effect {
    let Some((c, n)) = value.split_once('=') else {
        debug!("Ignoring line count payload '{value}'");
        return Effect::None;
    };
    match (parse_character(c), n.trim().parse::<u32>()) {
        (Some(c), Ok(n)) => wb.set_lines(c, n),
        _ => debug!("Ignoring line count payload '{value}'"),
    }
    Effect::None
}
