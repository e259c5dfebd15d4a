// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

//! Request query types shared by the list endpoints
use serde::Deserialize;

const DEFAULT_PER_PAGE: i64 = 30;
const MAX_PER_PAGE: i64 = 100;

/// Page-based pagination query
#[derive(Debug, Deserialize)]
pub struct PagePaginationQuery {
    per_page: Option<i64>,
    page: Option<i64>,
}

impl PagePaginationQuery {
    /// The requested page size, clamped to `1..=100`.
    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }

    /// The requested page, starting at 1.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn query(s: &str) -> PagePaginationQuery {
        serde_urlencoded::from_str(s).unwrap()
    }

    #[test]
    fn pagination_defaults_and_clamps() {
        assert_eq!((query("").per_page(), query("").page()), (30, 1));
        assert_eq!(query("per_page=10&page=3").per_page(), 10);
        assert_eq!(query("per_page=10&page=3").page(), 3);
        assert_eq!(query("per_page=1000").per_page(), 100);
        assert_eq!(query("per_page=0&page=0").per_page(), 1);
        assert_eq!(query("per_page=0&page=0").page(), 1);
    }
}
