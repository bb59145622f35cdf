//! Upstream API record factories.
//!
//! Records are built as `serde_json::Value` so this crate does not depend on the service's
//! own model types. Every record carries every field the service deserializes.

use serde_json::{json, Value};

/// Base URL used inside fixture records; never requested.
const RECORD_BASE_URL: &str = "https://rickandmortyapi.com/api";

/// Build a character record whose origin and current location are `origin`.
///
/// # Arguments
/// - `id` - Upstream character ID
/// - `name` - Character name
/// - `origin` - Name of the origin location
pub fn character(id: i64, name: &str, origin: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": "Alive",
        "species": "Human",
        "type": "",
        "gender": "Male",
        "origin": {
            "name": origin,
            "url": format!("{}/location/{}", RECORD_BASE_URL, id),
        },
        "location": {
            "name": origin,
            "url": format!("{}/location/{}", RECORD_BASE_URL, id),
        },
        "image": format!("{}/character/avatar/{}.jpeg", RECORD_BASE_URL, id),
        "episode": [format!("{}/episode/1", RECORD_BASE_URL)],
        "url": format!("{}/character/{}", RECORD_BASE_URL, id),
        "created": "2017-11-04T18:48:46.250Z",
    })
}

/// Build a location record.
pub fn location(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "Planet",
        "dimension": "Dimension C-137",
        "residents": [format!("{}/character/1", RECORD_BASE_URL)],
        "url": format!("{}/location/{}", RECORD_BASE_URL, id),
        "created": "2017-11-10T12:42:04.162Z",
    })
}

/// Build page `page` (1-based) of a listing split into `pages` pages.
///
/// # Arguments
/// - `listing_url` - URL of the first page, `next`/`prev` links are derived from it
/// - `page` - Page number of this page
/// - `pages` - Total number of pages
/// - `count` - Total number of records across all pages
/// - `results` - Records on this page
pub fn page(listing_url: &str, page: u32, pages: u32, count: usize, results: Vec<Value>) -> Value {
    let link = |n: u32| -> Value {
        if n >= 1 && n <= pages {
            Value::String(format!("{}&page={}", listing_url, n))
        } else {
            Value::Null
        }
    };

    json!({
        "info": {
            "count": count,
            "pages": pages,
            "next": link(page + 1),
            "prev": link(page.saturating_sub(1)),
        },
        "results": results,
    })
}
