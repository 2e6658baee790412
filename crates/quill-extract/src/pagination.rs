//! Pagination envelope and navigation links.
//!
//! Listing responses wrap their items in [`Paginated`], which carries totals
//! and `self`/`next`/`prev` links rebuilt from the request path and query.

use serde::Serialize;

/// Navigation links for a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Links {
    /// The page that produced this response.
    #[serde(rename = "self")]
    pub self_link: String,
    /// The following page, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// The preceding page, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

impl Links {
    /// Builds links for `page` of `total_pages`, rewriting the `page` query
    /// parameter on top of the request's other parameters.
    #[must_use]
    pub fn build(path: &str, query: Option<&str>, page: u32, total_pages: u32) -> Self {
        Self {
            self_link: with_page(path, query, page),
            next: (page < total_pages).then(|| with_page(path, query, page + 1)),
            prev: (page > 1).then(|| with_page(path, query, page - 1)),
        }
    }
}

/// Rebuilds `path?query` with the `page` parameter set to `page`. Other
/// parameters keep their order.
fn with_page(path: &str, query: Option<&str>, page: u32) -> String {
    let mut parts: Vec<String> = query
        .unwrap_or("")
        .split('&')
        .filter(|p| !p.is_empty() && !p.starts_with("page=") && *p != "page")
        .map(str::to_string)
        .collect();
    parts.push(format!("page={page}"));
    format!("{path}?{}", parts.join("&"))
}

/// One page of a listing, as serialized to clients.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total matching items across all pages.
    pub total: usize,
    /// 1-based page number served.
    pub page: u32,
    /// Page size served.
    pub page_size: u32,
    /// Total number of pages (at least 1).
    pub total_pages: u32,
    /// Navigation links.
    #[serde(rename = "_links")]
    pub links: Links,
}

impl<T> Paginated<T> {
    /// Wraps a page of items with its links.
    #[must_use]
    pub fn new(
        items: Vec<T>,
        total: usize,
        page: u32,
        page_size: u32,
        total_pages: u32,
        links: Links,
    ) -> Self {
        Self {
            items,
            total,
            page,
            page_size,
            total_pages,
            links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_middle_page() {
        let links = Links::build("/stories", Some("tag=romance&page=2"), 2, 5);
        assert_eq!(links.self_link, "/stories?tag=romance&page=2");
        assert_eq!(links.next.as_deref(), Some("/stories?tag=romance&page=3"));
        assert_eq!(links.prev.as_deref(), Some("/stories?tag=romance&page=1"));
    }

    #[test]
    fn test_links_first_page() {
        let links = Links::build("/stories", None, 1, 3);
        assert_eq!(links.self_link, "/stories?page=1");
        assert_eq!(links.next.as_deref(), Some("/stories?page=2"));
        assert_eq!(links.prev, None);
    }

    #[test]
    fn test_links_last_page() {
        let links = Links::build("/stories", None, 3, 3);
        assert_eq!(links.next, None);
        assert_eq!(links.prev.as_deref(), Some("/stories?page=2"));
    }

    #[test]
    fn test_links_single_page() {
        let links = Links::build("/stories", Some("q=sea"), 1, 1);
        assert_eq!(links.self_link, "/stories?q=sea&page=1");
        assert_eq!(links.next, None);
        assert_eq!(links.prev, None);
    }

    #[test]
    fn test_serialization_shape() {
        let page = Paginated::new(
            vec!["a", "b"],
            10,
            1,
            2,
            5,
            Links::build("/stories", None, 1, 5),
        );
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["total"], 10);
        assert_eq!(json["_links"]["self"], "/stories?page=1");
        assert_eq!(json["_links"]["next"], "/stories?page=2");
        assert!(json["_links"].get("prev").is_none());
    }
}
