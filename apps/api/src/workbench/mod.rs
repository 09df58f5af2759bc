//! The single owned client state object.
//!
//! Holds the loaded catalog, the selection, the browse cursor, the print layout
//! and the last transient notice. Every UI event mutates it synchronously; the
//! only awaits are the initial catalog fetch and the print request.

pub mod client;
pub mod dispatch;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::browse::{BrowseView, PageInfo, DEFAULT_PAGE_SIZE};
use crate::catalog::{Band, Catalog};
use crate::models::{Character, GridSizeTier, PrintLayoutConfig, SelectedEntry};
use crate::selection::{
    PersistencePolicy, SelectionError, SelectionState, SelectionStore, MAX_LINES,
};

pub use client::{ApiClient, CatalogSource, ClientError, PrintRequest, PrintService};
pub use dispatch::{DispatchTable, Effect, UiEvent, UiRole};

pub const LOAD_FAILURE_MESSAGE: &str = "汉字加载失败或数据为空，请刷新页面或稍后重试。";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkbenchOptions {
    pub page_size: usize,
    pub persistence: PersistencePolicy,
}

impl Default for WorkbenchOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            persistence: PersistencePolicy::ClearOnLoad,
        }
    }
}

/// Terminal initialization failure, shown in place of the catalog grid.
#[derive(Debug, Error)]
#[error("catalog load failed: {cause}")]
pub struct LoadError {
    #[source]
    pub cause: ClientError,
}

impl LoadError {
    pub fn inline_message(&self) -> &'static str {
        LOAD_FAILURE_MESSAGE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    SelectionFull,
    NothingAdded,
    InvalidLines,
    NothingToPrint,
    PrintFailed,
}

/// Transient, non-blocking notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chip {
    pub character: Character,
    pub lines: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub index: usize,
    pub character: Character,
    pub selected: bool,
    pub disabled: bool,
}

/// Everything a renderer needs after an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkbenchView {
    pub selected_count: usize,
    pub max_selection: usize,
    pub chips: Vec<Chip>,
    pub items: Vec<ItemView>,
    pub page: PageInfo,
    pub page_label: String,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub print_enabled: bool,
    pub band: Band,
    pub search: String,
    pub layout: PrintLayoutConfig,
}

pub struct Workbench {
    catalog: Catalog,
    selection: SelectionState,
    browse: BrowseView,
    layout: PrintLayoutConfig,
    persistence: PersistencePolicy,
    store: Arc<dyn SelectionStore>,
    notice: Option<Notice>,
}

impl Workbench {
    /// Fetches the catalog and restores (or wipes) the stored selection.
    pub async fn load(
        source: &dyn CatalogSource,
        store: Arc<dyn SelectionStore>,
        options: WorkbenchOptions,
    ) -> Result<Self, LoadError> {
        let catalog = source.fetch_catalog().await.map_err(|cause| {
            error!("Catalog load failed: {cause}");
            LoadError { cause }
        })?;

        let selection = match options.persistence {
            PersistencePolicy::Persist => restore_selection(store.as_ref()),
            PersistencePolicy::ClearOnLoad => {
                if let Err(e) = store.clear() {
                    warn!("Failed to clear stored selection: {e}");
                }
                SelectionState::new()
            }
        };

        info!(
            "Workbench ready: {} catalog characters, {} restored",
            catalog.len(),
            selection.len()
        );

        Ok(Self::from_parts(catalog, selection, store, options))
    }

    pub fn from_parts(
        catalog: Catalog,
        selection: SelectionState,
        store: Arc<dyn SelectionStore>,
        options: WorkbenchOptions,
    ) -> Self {
        Self {
            catalog,
            selection,
            browse: BrowseView::new(options.page_size),
            layout: PrintLayoutConfig::default(),
            persistence: options.persistence,
            store,
            notice: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn browse(&self) -> &BrowseView {
        &self.browse
    }

    pub fn layout(&self) -> PrintLayoutConfig {
        self.layout
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    // ── selection ──────────────────────────────────────────────────────────

    pub fn toggle(&mut self, character: Character) {
        match self.selection.toggle(character) {
            Ok(_) => self.persist(),
            Err(e) => self.notify_selection_error(e),
        }
    }

    pub fn add(&mut self, character: Character) {
        match self.selection.add(character) {
            Ok(_) => self.persist(),
            Err(e) => self.notify_selection_error(e),
        }
    }

    pub fn remove(&mut self, character: Character) {
        if self.selection.remove(character) {
            self.persist();
        }
    }

    pub fn clear_all(&mut self) {
        self.selection.clear();
        self.persist();
    }

    pub fn set_lines(&mut self, character: Character, lines: u32) {
        match self.selection.set_lines(character, lines) {
            Ok(true) => self.persist(),
            Ok(false) => {}
            Err(e) => self.notify_selection_error(e),
        }
    }

    pub fn add_custom(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        if self.selection.add_custom(text) == 0 {
            self.notice = Some(Notice::new(
                NoticeKind::NothingAdded,
                "没有可添加的新字（可能已满或重复）",
            ));
        }
        self.persist();
    }

    // ── browsing ───────────────────────────────────────────────────────────

    pub fn set_search(&mut self, term: &str) {
        self.browse.set_search(term);
    }

    pub fn set_band(&mut self, band: Band) {
        self.browse.set_band(band);
    }

    pub fn next_page(&mut self) -> PageInfo {
        self.browse.next_page(&self.catalog)
    }

    pub fn prev_page(&mut self) -> PageInfo {
        self.browse.prev_page(&self.catalog)
    }

    pub fn go_to_page(&mut self, page: usize) -> PageInfo {
        self.browse.go_to_page(page, &self.catalog)
    }

    // ── layout ─────────────────────────────────────────────────────────────

    pub fn set_grid_size(&mut self, grid_size: GridSizeTier) {
        self.layout.grid_size = grid_size;
    }

    pub fn set_decorative_header(&mut self, enabled: bool) {
        self.layout.decorative_header = enabled;
    }

    // ── printing ───────────────────────────────────────────────────────────

    /// Builds the print request, or records a notice when nothing is selected.
    pub fn prepare_print(&mut self) -> Option<PrintRequest> {
        if self.selection.is_empty() {
            self.notice = Some(Notice::new(NoticeKind::NothingToPrint, "请先选择汉字"));
            return None;
        }
        Some(PrintRequest {
            selected_chars: self.selection.entries().to_vec(),
            grid_size: self.layout.grid_size,
            use_animals: self.layout.decorative_header,
        })
    }

    /// Sends a prepared request. The selection is untouched either way.
    pub async fn submit_print(
        &mut self,
        service: &dyn PrintService,
        request: &PrintRequest,
    ) -> Option<String> {
        match service.render(request).await {
            Ok(html) => Some(html),
            Err(e) => {
                error!("Printing failed: {e}");
                self.notice = Some(Notice::new(
                    NoticeKind::PrintFailed,
                    "生成打印页失败，请稍后重试。",
                ));
                None
            }
        }
    }

    /// Returns the rendered document for the external print surface.
    pub async fn print(&mut self, service: &dyn PrintService) -> Option<String> {
        let request = self.prepare_print()?;
        self.submit_print(service, &request).await
    }

    // ── rendering ──────────────────────────────────────────────────────────

    /// Clamps the page cursor and derives the render model.
    pub fn snapshot(&mut self) -> WorkbenchView {
        let page = self.browse.paginate(&self.catalog);

        let chips = self
            .selection
            .entries()
            .iter()
            .map(|SelectedEntry { character, lines }| Chip {
                character: *character,
                lines: *lines,
            })
            .collect();

        let items = page
            .items
            .iter()
            .map(|item| ItemView {
                index: item.index,
                character: item.character,
                selected: self.selection.contains(item.character),
                disabled: self.selection.is_item_disabled(item.character),
            })
            .collect();

        WorkbenchView {
            selected_count: self.selection.len(),
            max_selection: self.selection.capacity(),
            chips,
            items,
            page_label: page.info.to_string(),
            page: page.info,
            prev_enabled: page.has_prev,
            next_enabled: page.has_next,
            print_enabled: !self.selection.is_empty(),
            band: self.browse.band(),
            search: self.browse.search().to_string(),
            layout: self.layout,
        }
    }

    fn notify_selection_error(&mut self, err: SelectionError) {
        let notice = match err {
            SelectionError::Full { max } => {
                Notice::new(NoticeKind::SelectionFull, format!("最多只能选择{max}个汉字"))
            }
            SelectionError::InvalidLines { .. } => Notice::new(
                NoticeKind::InvalidLines,
                format!("每个字的练习行数需在 1 到 {MAX_LINES} 之间"),
            ),
        };
        self.notice = Some(notice);
    }

    fn persist(&self) {
        if self.persistence != PersistencePolicy::Persist {
            return;
        }
        if let Err(e) = self.store.save(self.selection.entries()) {
            warn!("Failed to persist selection: {e}");
        }
    }
}

/// Replays a stored selection through `add`. Entries past capacity are
/// dropped; the leading ones are kept in order.
fn restore_selection(store: &dyn SelectionStore) -> SelectionState {
    let entries = match store.load() {
        Ok(Some(entries)) => entries,
        Ok(None) => return SelectionState::new(),
        Err(e) => {
            warn!("Ignoring unreadable stored selection: {e}");
            return SelectionState::new();
        }
    };

    let mut selection = SelectionState::new();
    for (index, entry) in entries.iter().enumerate() {
        if let Err(e) = selection.add(entry.character) {
            warn!("Dropping {} stored entries: {e}", entries.len() - index);
            break;
        }
        if let Err(e) = selection.set_lines(entry.character, entry.lines.clamp(1, MAX_LINES)) {
            warn!("Ignoring stored line count for {}: {e}", entry.character);
        }
    }
    selection
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::Mutex;

    use super::*;
    use crate::selection::{MemoryStore, MAX_SELECTION};

    struct StaticCatalog(Vec<&'static str>);

    #[async_trait]
    impl CatalogSource for StaticCatalog {
        async fn fetch_catalog(&self) -> Result<Catalog, ClientError> {
            Ok(Catalog::from_strings(&self.0)?)
        }
    }

    struct RecordingPrinter {
        fail: bool,
        requests: Mutex<Vec<PrintRequest>>,
    }

    impl RecordingPrinter {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PrintService for RecordingPrinter {
        async fn render(&self, request: &PrintRequest) -> Result<String, ClientError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(ClientError::Status {
                    status: 500,
                    message: "boom".into(),
                });
            }
            Ok("<!DOCTYPE html><html></html>".into())
        }
    }

    fn ch(c: char) -> Character {
        Character::new(c)
    }

    fn chars() -> Vec<&'static str> {
        vec!["一", "二", "三", "四", "五", "六", "七", "八", "九", "十", "百", "千"]
    }

    async fn workbench(options: WorkbenchOptions, store: Arc<dyn SelectionStore>) -> Workbench {
        Workbench::load(&StaticCatalog(chars()), store, options)
            .await
            .unwrap()
    }

    async fn default_workbench() -> Workbench {
        workbench(WorkbenchOptions::default(), Arc::new(MemoryStore::default())).await
    }

    #[tokio::test]
    async fn test_empty_catalog_is_fatal_load_error() {
        let result = Workbench::load(
            &StaticCatalog(Vec::new()),
            Arc::new(MemoryStore::default()),
            WorkbenchOptions::default(),
        )
        .await;
        let err = result.err().unwrap();
        assert_eq!(err.inline_message(), LOAD_FAILURE_MESSAGE);
        assert!(matches!(err.cause, ClientError::Catalog(_)));
    }

    #[tokio::test]
    async fn test_eleventh_toggle_emits_capacity_notice() {
        let mut wb = default_workbench().await;
        for c in "一二三四五六七八九十".chars() {
            wb.toggle(ch(c));
        }
        assert!(wb.notice().is_none());
        let before = wb.selection().clone();

        wb.toggle(ch('百'));
        assert_eq!(wb.selection(), &before);
        let notice = wb.take_notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::SelectionFull);
        assert_eq!(notice.message, "最多只能选择10个汉字");
        assert!(wb.notice().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_marks_selected_and_disabled_items() {
        let mut wb = default_workbench().await;
        for c in "一二三四五六七八九十".chars() {
            wb.add(ch(c));
        }
        let view = wb.snapshot();
        assert_eq!(view.selected_count, MAX_SELECTION);
        assert_eq!(view.chips.len(), MAX_SELECTION);
        assert!(view.print_enabled);

        let yi = view.items.iter().find(|i| i.character == ch('一')).unwrap();
        assert!(yi.selected && !yi.disabled);
        let bai = view.items.iter().find(|i| i.character == ch('百')).unwrap();
        assert!(!bai.selected && bai.disabled);
    }

    #[tokio::test]
    async fn test_snapshot_pagination_controls() {
        let options = WorkbenchOptions {
            page_size: 5,
            ..WorkbenchOptions::default()
        };
        let mut wb = workbench(options, Arc::new(MemoryStore::default())).await;
        let view = wb.snapshot();
        assert_eq!(view.items.len(), 5);
        assert!(!view.prev_enabled && view.next_enabled);
        assert_eq!(view.page_label, "第 1/3 页（共 12 个字）");

        wb.next_page();
        wb.next_page();
        let view = wb.snapshot();
        assert_eq!(view.items.len(), 2);
        assert!(view.prev_enabled && !view.next_enabled);

        wb.set_search("二");
        let view = wb.snapshot();
        assert_eq!(view.page.page, 1);
        assert_eq!(view.items.len(), 1);
    }

    #[tokio::test]
    async fn test_print_with_empty_selection_sends_nothing() {
        let mut wb = default_workbench().await;
        let printer = RecordingPrinter::new(false);
        assert!(wb.print(&printer).await.is_none());
        assert_eq!(wb.notice().map(|n| n.kind), Some(NoticeKind::NothingToPrint));
        assert!(printer.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_print_sends_selection_and_layout() {
        let mut wb = default_workbench().await;
        wb.add(ch('三'));
        wb.set_lines(ch('三'), 2);
        wb.set_grid_size(GridSizeTier::Large);
        wb.set_decorative_header(false);

        let printer = RecordingPrinter::new(false);
        let html = wb.print(&printer).await.unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));

        let requests = printer.requests.lock().unwrap();
        assert_eq!(
            requests[0],
            PrintRequest {
                selected_chars: vec![SelectedEntry {
                    character: ch('三'),
                    lines: 2
                }],
                grid_size: GridSizeTier::Large,
                use_animals: false,
            }
        );
    }

    #[tokio::test]
    async fn test_failed_print_keeps_selection_and_notifies() {
        let mut wb = default_workbench().await;
        wb.add(ch('三'));
        let before = wb.selection().clone();

        let printer = RecordingPrinter::new(true);
        assert!(wb.print(&printer).await.is_none());
        assert_eq!(wb.selection(), &before);
        assert_eq!(wb.notice().map(|n| n.kind), Some(NoticeKind::PrintFailed));
    }

    #[tokio::test]
    async fn test_invalid_line_count_notifies() {
        let mut wb = default_workbench().await;
        wb.add(ch('三'));
        wb.set_lines(ch('三'), 0);
        assert_eq!(wb.notice().map(|n| n.kind), Some(NoticeKind::InvalidLines));
        assert_eq!(wb.selection().lines_of(ch('三')), Some(1));
    }

    #[tokio::test]
    async fn test_add_custom_with_nothing_new_notifies() {
        let mut wb = default_workbench().await;
        wb.add(ch('山'));
        wb.add_custom("山，");
        assert_eq!(wb.notice().map(|n| n.kind), Some(NoticeKind::NothingAdded));

        wb.take_notice();
        wb.add_custom("   ");
        assert!(wb.notice().is_none());
    }

    #[tokio::test]
    async fn test_persist_policy_restores_selection() {
        let store: Arc<dyn SelectionStore> = Arc::new(MemoryStore::default());
        let options = WorkbenchOptions {
            persistence: PersistencePolicy::Persist,
            ..WorkbenchOptions::default()
        };

        let mut first = workbench(options, store.clone()).await;
        first.add(ch('二'));
        first.add(ch('三'));
        first.set_lines(ch('三'), 4);
        first.set_grid_size(GridSizeTier::Small);

        let second = workbench(options, store).await;
        assert_eq!(second.selection(), first.selection());
        assert_eq!(second.layout(), PrintLayoutConfig::default());
    }

    #[tokio::test]
    async fn test_oversized_stored_selection_keeps_leading_entries() {
        let store: Arc<dyn SelectionStore> = Arc::new(MemoryStore::default());
        let stored: Vec<SelectedEntry> = chars()
            .iter()
            .map(|s| SelectedEntry {
                character: s.parse().unwrap(),
                lines: 30,
            })
            .collect();
        assert_eq!(stored.len(), MAX_SELECTION + 2);
        store.save(&stored).unwrap();

        let options = WorkbenchOptions {
            persistence: PersistencePolicy::Persist,
            ..WorkbenchOptions::default()
        };
        let wb = workbench(options, store).await;

        let restored: Vec<Character> = wb
            .selection()
            .entries()
            .iter()
            .map(|e| e.character)
            .collect();
        let expected: Vec<Character> = stored[..MAX_SELECTION]
            .iter()
            .map(|e| e.character)
            .collect();
        assert_eq!(restored, expected);
        assert_eq!(wb.selection().lines_of(ch('一')), Some(MAX_LINES));
        assert!(!wb.selection().contains(ch('千')));
    }

    #[tokio::test]
    async fn test_clear_on_load_policy_wipes_store() {
        let store: Arc<dyn SelectionStore> = Arc::new(MemoryStore::default());
        store.save(&[SelectedEntry::new(ch('二'))]).unwrap();

        let wb = workbench(WorkbenchOptions::default(), store.clone()).await;
        assert!(wb.selection().is_empty());
        assert!(store.load().unwrap().is_none());
    }
}
