// Pagination Domain Model

use crate::domain::error::{DomainError, Result};
use crate::domain::filter::Field;
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Configured page size bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: u32,
    pub max_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_PAGE_SIZE,
            max_size: MAX_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Requested ordering. Ties are always broken by `id ASC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: Field,
    pub direction: SortDirection,
}

impl Sort {
    /// Parse `field[,asc|desc]`
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.split(',').map(str::trim);
        let name = parts.next().unwrap_or_default();
        let field = Field::from_name(name)
            .ok_or_else(|| DomainError::InvalidSort(format!("unknown field '{}'", name)))?;
        if !field.is_sortable() {
            return Err(DomainError::InvalidSort(format!(
                "field '{}' is not sortable",
                field
            )));
        }

        let direction = match parts.next() {
            None | Some("") => SortDirection::Asc,
            Some(d) if d.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            Some(d) if d.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            Some(d) => {
                return Err(DomainError::InvalidSort(format!(
                    "invalid direction '{}' (valid: asc, desc)",
                    d
                )))
            }
        };

        if parts.next().is_some() {
            return Err(DomainError::InvalidSort(format!("malformed sort '{}'", raw)));
        }

        Ok(Self { field, direction })
    }
}

/// Zero-based page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    index: u32,
    size: u32,
    sort: Option<Sort>,
}

impl PageRequest {
    /// Create a page request
    ///
    /// # Errors
    /// - `DomainError::InvalidPage` if `size` is zero
    pub fn new(index: u32, size: u32) -> Result<Self> {
        if size == 0 {
            return Err(DomainError::InvalidPage(
                "page size must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            index,
            size,
            sort: None,
        })
    }

    /// Build from raw query parameters.
    ///
    /// Missing values fall back to page 0 and the default size; a size above
    /// the configured maximum is clamped to it.
    pub fn from_params(page: Option<i64>, size: Option<i64>, limits: &PageLimits) -> Result<Self> {
        let index = match page {
            None => 0,
            Some(p) if p < 0 => {
                return Err(DomainError::InvalidPage(format!(
                    "page must not be negative, got {}",
                    p
                )))
            }
            Some(p) => u32::try_from(p)
                .map_err(|_| DomainError::InvalidPage(format!("page {} is too large", p)))?,
        };

        let size = match size {
            None => limits.default_size,
            Some(s) if s <= 0 => {
                return Err(DomainError::InvalidPage(format!(
                    "size must be greater than 0, got {}",
                    s
                )))
            }
            Some(s) => s.min(limits.max_size as i64) as u32,
        };

        Self::new(index, size)
    }

    pub fn with_sort(mut self, sort: Option<Sort>) -> Self {
        self.sort = sort;
        self
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    /// Number of matching items before this page
    pub fn offset(&self) -> u64 {
        self.index as u64 * self.size as u64
    }
}

/// One page of results plus the metadata a client needs to page further
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub total_pages: u64,
    pub page_index: u32,
    pub page_size: u32,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total_count: u64, request: &PageRequest) -> Self {
        debug_assert!(items.len() <= request.size() as usize);
        Self {
            items,
            total_count,
            total_pages: total_count.div_ceil(request.size() as u64),
            page_index: request.index(),
            page_size: request.size(),
        }
    }

    pub fn empty(request: &PageRequest) -> Self {
        Self::new(Vec::new(), 0, request)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            total_pages: self.total_pages,
            page_index: self.page_index,
            page_size: self.page_size,
        }
    }
}
