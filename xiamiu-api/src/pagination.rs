//! skip/limit query parameters shared by every list endpoint

use serde::Deserialize;

/// Default page size
pub const DEFAULT_LIMIT: i64 = 100;

/// Largest accepted page size
pub const MAX_LIMIT: i64 = 1000;

/// Raw `?skip=&limit=` query
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// Sanitized offset and row count for a LIMIT/OFFSET query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl ListParams {
    /// Negative skip becomes 0 and limit is clamped to `1..=MAX_LIMIT`
    ///
    /// # Examples
    /// ```
    /// use xiamiu_api::pagination::{ListParams, Page};
    ///
    /// let page = ListParams { skip: Some(-5), limit: Some(5000) }.page();
    /// assert_eq!(page, Page { skip: 0, limit: 1000 });
    /// ```
    pub fn page(self) -> Page {
        Page {
            skip: self.skip.unwrap_or(0).max(0),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = ListParams::default().page();
        assert_eq!(page, Page { skip: 0, limit: 100 });
    }

    #[test]
    fn test_negative_skip_clamped() {
        let page = ListParams {
            skip: Some(-1),
            limit: None,
        }
        .page();
        assert_eq!(page.skip, 0);
    }

    #[test]
    fn test_limit_bounds() {
        let zero = ListParams {
            skip: None,
            limit: Some(0),
        }
        .page();
        assert_eq!(zero.limit, 1);

        let huge = ListParams {
            skip: None,
            limit: Some(1_000_000),
        }
        .page();
        assert_eq!(huge.limit, MAX_LIMIT);
    }

    #[test]
    fn test_passthrough() {
        let page = ListParams {
            skip: Some(20),
            limit: Some(10),
        }
        .page();
        assert_eq!(page, Page { skip: 20, limit: 10 });
    }
}
