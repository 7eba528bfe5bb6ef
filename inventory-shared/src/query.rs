/// Search and pagination helpers shared by both store backends
///
/// Listing products follows one contract regardless of which parameters
/// the client sends:
///
/// - the search term always filters (case-insensitive substring on name)
/// - `page` defaults to 1
/// - `size` defaults to the whole filtered result
/// - totals are computed over the filtered set
///
/// ```
/// use inventory_shared::query::{PageRequest, PageMeta};
///
/// let window = PageRequest { page: Some(2), size: Some(1) }.resolve(3);
/// assert_eq!((window.offset, window.limit), (1, 1));
///
/// let meta = PageMeta::new(window, 3);
/// assert_eq!(meta.total_pages, 3);
/// ```

use serde::{Deserialize, Serialize};

/// Trims a search term and drops it when nothing is left
pub fn normalize_search(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Builds an `ILIKE` pattern matching `term` anywhere in a column
///
/// `%`, `_` and `\` are escaped so the term is matched literally; queries
/// pair this with `ESCAPE '\'`.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Case-insensitive substring test used by the in-memory store
///
/// Folds with Unicode lowercasing, so `"ÉCRAN"` matches `"écran"`.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Product listing parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Already normalized search term
    pub search: Option<String>,

    /// Requested page window
    pub page: PageRequest,
}

/// Page and size as supplied by the client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: Option<u32>,

    /// Items per page
    pub size: Option<u32>,
}

/// Offset/limit window derived from a `PageRequest`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub size: u64,
    pub offset: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Resolves defaults against the number of matching items
    ///
    /// Zero values are treated as absent; the HTTP layer rejects them
    /// before they get here.
    pub fn resolve(self, total_items: u64) -> PageWindow {
        let page = self.page.filter(|p| *p > 0).map_or(1, u64::from);
        let size = self
            .size
            .filter(|s| *s > 0)
            .map_or(total_items.max(1), u64::from);

        PageWindow {
            page,
            size,
            offset: (page - 1).saturating_mul(size),
            limit: size,
        }
    }
}

/// Pagination metadata returned alongside a product page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl PageMeta {
    pub fn new(window: PageWindow, total_items: u64) -> Self {
        Self {
            current_page: window.page,
            page_size: window.size,
            total_items,
            total_pages: total_items.div_ceil(window.size),
        }
    }
}

/// One page of results plus its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}
