//! Pagination types
//!
//! Page requests are opaque configuration passed from callers straight
//! through to the repository. Pages carry enough metadata for callers to
//! render pagers (total elements, total pages).

use serde::{Deserialize, Serialize};

/// Largest page size a request may ask for.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Sort direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl Direction {
    /// Parse a direction (case-insensitive, `asc`/`desc`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Some(Direction::Asc),
            "desc" | "descending" => Some(Direction::Desc),
            _ => None,
        }
    }
}

/// Sort on a single entity property.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sort {
    /// Serialized field name of the entity (e.g. `collection_name`).
    pub property: String,
    /// Sort direction.
    #[serde(default)]
    pub direction: Direction,
}

impl Sort {
    /// Ascending sort on `property`.
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Asc,
        }
    }

    /// Descending sort on `property`.
    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Desc,
        }
    }
}

/// A request for one page of results.
///
/// # Example
///
/// ```
/// use easybase_store::{PageRequest, Sort};
///
/// let request = PageRequest::new(2, 10).with_sort(Sort::desc("created_at"));
/// assert_eq!(request.offset(), 20);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: u32,
    /// Number of items per page.
    pub size: u32,
    /// Optional sort; `None` keeps insertion order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: None,
        }
    }
}

impl PageRequest {
    /// Create a page request. The size is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
            sort: None,
        }
    }

    /// Attach a sort.
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Number of items to skip.
    pub fn offset(&self) -> usize {
        (self.page as usize).saturating_mul(self.effective_size())
    }

    /// Page size after clamping (deserialized requests bypass `new`).
    pub fn effective_size(&self) -> usize {
        self.size.clamp(1, MAX_PAGE_SIZE) as usize
    }

    /// Cut one page out of an already ordered result set.
    pub fn paginate<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len() as u64;
        let content = items
            .into_iter()
            .skip(self.offset())
            .take(self.effective_size())
            .collect();
        Page::new(content, self, total)
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    /// Items on this page.
    pub content: Vec<T>,
    /// Zero-based page index.
    pub page: u32,
    /// Requested page size.
    pub size: u32,
    /// Total matching items across all pages.
    pub total_elements: u64,
    /// Total number of pages.
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Build a page from its content and the request that produced it.
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = request.effective_size() as u64;
        Self {
            content,
            page: request.page,
            size: size as u32,
            total_elements,
            total_pages: total_elements.div_ceil(size) as u32,
        }
    }

    /// Transform the content, keeping the page metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }

    /// Whether a later page exists.
    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages
    }

    /// Whether this page has no items.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
