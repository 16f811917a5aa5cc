//! Pagination, sorting and date-range filtering for list queries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default page number (1-indexed)
const DEFAULT_PAGE: u32 = 1;

/// Default items per page
const DEFAULT_PER_PAGE: u32 = 25;

/// Maximum items per page
const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters for list requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: u32,

    /// Items per page
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PaginationParams {
    /// Create new pagination parameters, clamping out-of-range values.
    pub fn new(page: u32, per_page: u32) -> Self {
        let page = if page == 0 { DEFAULT_PAGE } else { page };
        let per_page = if per_page == 0 {
            DEFAULT_PER_PAGE
        } else {
            per_page.min(MAX_PER_PAGE)
        };

        Self { page, per_page }
    }

    /// Calculate the offset for database queries (0-indexed).
    pub fn offset(&self) -> u32 {
        (self.page - 1) * self.per_page
    }

    /// Get the limit for database queries.
    pub fn limit(&self) -> u32 {
        self.per_page
    }
}

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "ASC"),
            Self::Desc => write!(f, "DESC"),
        }
    }
}

/// Sort parameters for list requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortParams {
    /// Field to sort by
    pub field: String,

    /// Sort direction
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortParams {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

impl Default for SortParams {
    fn default() -> Self {
        // Newest cases first
        Self::desc("created_at")
    }
}

/// Paginated result wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    /// The items for the current page
    pub items: Vec<T>,

    /// Current page number (1-indexed)
    pub page: u32,

    /// Items per page
    pub per_page: u32,

    /// Total number of items across all pages
    pub total: u64,

    /// Total number of pages
    pub total_pages: u32,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl<T> PaginatedResult<T> {
    /// Create a new paginated result.
    pub fn new(items: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = ((total as f64) / (per_page as f64)).ceil() as u32;
        let has_next = page < total_pages;
        let has_prev = page > 1;

        Self {
            items,
            page,
            per_page,
            total,
            total_pages,
            has_next,
            has_prev,
        }
    }

    /// Create from pagination parameters and total count.
    pub fn from_params(items: Vec<T>, params: &PaginationParams, total: u64) -> Self {
        Self::new(items, params.page, params.per_page, total)
    }

    /// Map the items to a different type.
    pub fn map<U, F>(self, f: F) -> PaginatedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

/// Date range filter for list queries (both bounds inclusive).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<chrono::DateTime<chrono::Utc>>,
    pub end: Option<chrono::DateTime<chrono::Utc>>,
}

impl DateRange {
    pub fn new(
        start: Option<chrono::DateTime<chrono::Utc>>,
        end: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Self {
        Self { start, end }
    }

    /// Validate the date range.
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err("Start date must be before or equal to end date".to_string());
            }
        }
        Ok(())
    }

    /// Check if a date is within this range.
    pub fn contains(&self, date: &chrono::DateTime<chrono::Utc>) -> bool {
        let after_start = self.start.map_or(true, |start| date >= &start);
        let before_end = self.end.map_or(true, |end| date <= &end);
        after_start && before_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_params_default() {
        let params = PaginationParams::default();
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 25);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_pagination_params_clamping() {
        let params = PaginationParams::new(0, 500);
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 100);

        let params = PaginationParams::new(3, 25);
        assert_eq!(params.offset(), 50);
        assert_eq!(params.limit(), 25);
    }

    #[test]
    fn test_sort_params_default() {
        let sort = SortParams::default();
        assert_eq!(sort.field, "created_at");
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[test]
    fn test_sort_direction_display() {
        assert_eq!(SortDirection::Asc.to_string(), "ASC");
        assert_eq!(SortDirection::Desc.to_string(), "DESC");
    }

    #[test]
    fn test_paginated_result() {
        let items = vec![1, 2, 3, 4, 5];
        let result = PaginatedResult::new(items, 2, 5, 25);

        assert_eq!(result.total_pages, 5);
        assert!(result.has_next);
        assert!(result.has_prev);
    }

    #[test]
    fn test_paginated_result_map() {
        let result = PaginatedResult::new(vec![1, 2, 3], 1, 3, 10);
        let mapped = result.map(|x| x * 2);

        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.total, 10);
    }

    #[test]
    fn test_date_range() {
        use chrono::{Duration, Utc};

        let now = Utc::now();
        let future = now + Duration::days(1);

        let range = DateRange::new(Some(now), Some(future));
        assert!(range.validate().is_ok());
        assert!(range.contains(&(now + Duration::hours(1))));
        assert!(!range.contains(&(now - Duration::hours(1))));

        let inverted = DateRange::new(Some(future), Some(now));
        assert!(inverted.validate().is_err());
    }
}
