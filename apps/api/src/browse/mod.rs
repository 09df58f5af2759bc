//! Filter/Pagination View over the catalog.
//!
//! Visibility is the AND of a band filter and a case-insensitive search term.
//! Visible items keep catalog order and are sliced into fixed-size pages.

use std::fmt;

use serde::Serialize;

use crate::catalog::{Band, Catalog};
use crate::models::Character;

pub const DEFAULT_PAGE_SIZE: usize = 100;

/// A catalog item that passed both filters, tagged with its catalog index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisibleItem {
    pub index: usize,
    pub character: Character,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

impl fmt::Display for PageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "第 {}/{} 页（共 {} 个字）",
            self.page, self.page_count, self.total
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub items: Vec<VisibleItem>,
    pub info: PageInfo,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Number of pages for `total` visible items; never less than one.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseView {
    band: Band,
    search: String,
    page: usize,
    page_size: usize,
}

impl Default for BrowseView {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl BrowseView {
    /// A zero page size is raised to one.
    pub fn new(page_size: usize) -> Self {
        Self {
            band: Band::All,
            search: String::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn band(&self) -> Band {
        self.band
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_band(&mut self, band: Band) {
        self.band = band;
        self.page = 1;
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.trim().to_lowercase();
        self.page = 1;
    }

    pub fn is_visible(&self, index: usize, character: Character) -> bool {
        self.band.admits(index) && character.matches(&self.search)
    }

    pub fn visible(&self, catalog: &Catalog) -> Vec<VisibleItem> {
        catalog
            .iter()
            .filter(|(index, character)| self.is_visible(*index, *character))
            .map(|(index, character)| VisibleItem { index, character })
            .collect()
    }

    /// Moves the cursor, clamped to the pages that currently exist.
    pub fn go_to_page(&mut self, page: usize, catalog: &Catalog) -> PageInfo {
        self.page = page;
        self.paginate(catalog).info
    }

    pub fn next_page(&mut self, catalog: &Catalog) -> PageInfo {
        self.go_to_page(self.page.saturating_add(1), catalog)
    }

    pub fn prev_page(&mut self, catalog: &Catalog) -> PageInfo {
        self.go_to_page(self.page.saturating_sub(1), catalog)
    }

    /// Clamps the cursor against the current visible set and returns that page.
    pub fn paginate(&mut self, catalog: &Catalog) -> Page {
        let visible = self.visible(catalog);
        let total = visible.len();
        let page_count = page_count(total, self.page_size);
        self.page = self.page.clamp(1, page_count);

        let start = (self.page - 1) * self.page_size;
        let items = visible
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();

        Page {
            items,
            info: PageInfo {
                page: self.page,
                page_count,
                total,
            },
            has_prev: self.page > 1,
            has_next: self.page < page_count,
        }
    }
}
