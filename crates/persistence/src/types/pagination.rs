//! Page-number pagination for patient listings.
//!
//! Listings are paged by a 1-based page number and a page size. Raw values
//! arrive as query strings and are coerced leniently: anything that does not
//! start with a positive integer falls back to the default.

use serde::{Deserialize, Serialize};

/// Default page number.
pub const DEFAULT_PAGE: u32 = 1;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Parses the leading integer of `raw`, the way a lenient `parseInt` would.
///
/// Leading whitespace and a sign are accepted, trailing garbage is ignored.
/// Returns `None` when there are no digits. Values too large for `i64`
/// saturate.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits: &str = &rest[..rest.bytes().take_while(u8::is_ascii_digit).count()];
    if digits.is_empty() {
        return None;
    }
    // Only overflow can fail here, the slice is all digits.
    let value: i64 = digits.parse().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// Coerces a raw query value into a positive integer, or returns `default`.
///
/// Positive values beyond `u32::MAX` clamp to `u32::MAX`, so an oversized
/// page number still addresses a page past the end.
///
/// # Examples
///
/// ```
/// use registry_persistence::types::coerce_positive;
///
/// assert_eq!(coerce_positive(Some("3"), 1), 3);
/// assert_eq!(coerce_positive(Some("2abc"), 1), 2);
/// assert_eq!(coerce_positive(Some("abc"), 1), 1);
/// assert_eq!(coerce_positive(Some("0"), 10), 10);
/// assert_eq!(coerce_positive(None, 10), 10);
/// ```
pub fn coerce_positive(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(parse_leading_int)
        .filter(|value| *value > 0)
        .map(|value| u32::try_from(value).unwrap_or(u32::MAX))
        .unwrap_or(default)
}

/// A request for one page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    page: u32,
    /// Items per page.
    page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Creates a page request. Zero values are replaced by the defaults.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
        }
    }

    /// Builds a page request from raw query values.
    ///
    /// The page size is capped at `max_page_size`.
    pub fn from_raw(page: Option<&str>, page_size: Option<&str>, max_page_size: u32) -> Self {
        let page = coerce_positive(page, DEFAULT_PAGE);
        let page_size = coerce_positive(page_size, DEFAULT_PAGE_SIZE).min(max_page_size.max(1));
        Self::new(page, page_size)
    }

    /// Returns the 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Matches across all pages.
    pub total_items: u64,
    /// `ceil(total_items / page_size)`; zero when nothing matches.
    pub total_pages: u64,
}

impl PageInfo {
    /// Computes metadata for `request` given the total number of matches.
    pub fn new(request: PageRequest, total_items: u64) -> Self {
        Self {
            page: request.page(),
            page_size: request.page_size(),
            total_items,
            total_pages: total_items.div_ceil(u64::from(request.page_size())),
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Pagination metadata.
    pub info: PageInfo,
}

impl<T> Page<T> {
    /// Creates a page.
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            info: PageInfo::new(request, total_items),
        }
    }

    /// Returns true if the page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_falls_back() {
        assert_eq!(coerce_positive(Some(""), 10), 10);
        assert_eq!(coerce_positive(Some("-4"), 10), 10);
        assert_eq!(coerce_positive(Some("  7"), 10), 7);
        assert_eq!(coerce_positive(Some("+5"), 10), 5);
        assert_eq!(coerce_positive(Some("-99999999999999999999999"), 10), 10);
    }

    #[test]
    fn test_coerce_clamps_large_values() {
        assert_eq!(coerce_positive(Some("5000000000"), 1), u32::MAX);
        assert_eq!(coerce_positive(Some("99999999999999999999999"), 10), u32::MAX);

        let request = PageRequest::from_raw(Some("5000000000"), Some("99999999999"), 100);
        assert_eq!(request.page(), u32::MAX);
        assert_eq!(request.page_size(), 100);
        assert_eq!(request.offset(), u64::from(u32::MAX - 1) * 100);
    }

    #[test]
    fn test_from_raw_defaults() {
        let request = PageRequest::from_raw(None, None, 1000);
        assert_eq!(request.page(), 1);
        assert_eq!(request.page_size(), 10);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_from_raw_caps_page_size() {
        let request = PageRequest::from_raw(Some("2"), Some("5000"), 100);
        assert_eq!(request.page_size(), 100);
        assert_eq!(request.offset(), 100);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let request = PageRequest::new(1, 10);
        assert_eq!(PageInfo::new(request, 0).total_pages, 0);
        assert_eq!(PageInfo::new(request, 10).total_pages, 1);
        assert_eq!(PageInfo::new(request, 11).total_pages, 2);
        assert_eq!(PageInfo::new(request, 25).total_pages, 3);
    }

    #[test]
    fn test_page_info_wire_names() {
        let info = PageInfo::new(PageRequest::new(2, 10), 15);
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json["page"], 2);
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["totalItems"], 15);
        assert_eq!(json["totalPages"], 2);
    }
}
