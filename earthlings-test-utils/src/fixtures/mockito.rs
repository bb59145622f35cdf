//! Upstream HTTP mock endpoint creation utilities.
//!
//! Each page of a listing is registered as its own mock, matched on the exact query string,
//! so a request for a page that was not registered fails with mockito's 501.

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::Value;

use crate::fixtures::upstream;

/// Create one mock endpoint per page of a paginated listing.
///
/// Page 1 is served for `path?query`, page `n > 1` for `path?query&page=n`. Every page mock
/// verifies it was called exactly `expected_requests` times.
///
/// # Arguments
/// - `server` - The mock server
/// - `path` - Listing path, e.g. `/character`
/// - `query` - Query string of the first page, without leading `?`
/// - `pages` - Records of each page, in page order. An empty list yields a single empty page.
/// - `expected_requests` - Number of times each page should be requested
///
/// # Returns
/// - `Vec<Mock>` - One mock per page
pub fn create_page_endpoints(
    server: &mut ServerGuard,
    path: &str,
    query: &str,
    pages: Vec<Vec<Value>>,
    expected_requests: usize,
) -> Vec<Mock> {
    let pages = if pages.is_empty() {
        vec![Vec::new()]
    } else {
        pages
    };

    let listing_url = format!("{}{}?{}", server.url(), path, query);
    let page_count = pages.len() as u32;
    let count = pages.iter().map(Vec::len).sum();

    pages
        .into_iter()
        .enumerate()
        .map(|(index, results)| {
            let page_number = index as u32 + 1;
            let page_query = if page_number == 1 {
                query.to_string()
            } else {
                format!("{}&page={}", query, page_number)
            };

            let body = upstream::page(&listing_url, page_number, page_count, count, results);

            server
                .mock("GET", path)
                .match_query(Matcher::Exact(page_query))
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(body.to_string())
                .expect(expected_requests)
                .create()
        })
        .collect()
}

/// Create a mock endpoint that always answers with `status` and a JSON error body.
pub fn create_error_endpoint(
    server: &mut ServerGuard,
    path: &str,
    query: &str,
    status: usize,
    expected_requests: usize,
) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Exact(query.to_string()))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"upstream failure"}"#)
        .expect(expected_requests)
        .create()
}
