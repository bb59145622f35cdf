use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference from a character to a location, as embedded by the upstream API.
///
/// Equality and ordering consider the `name` only, two references pointing at
/// differently-formatted URLs of the same named place compare equal.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LocationRef {
    pub name: String,
    pub url: String,
}

impl PartialEq for LocationRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for LocationRef {}

impl PartialOrd for LocationRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LocationRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

/// A character as returned by `/earth_characters` and stored in the cache.
///
/// Field names follow the upstream API so the same representation is used to
/// parse upstream pages, to serialize the cache entry and to answer clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub species: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub gender: String,
    pub origin: LocationRef,
    pub location: LocationRef,
    pub image: String,
    /// URLs of the episodes the character appears in
    pub episode: Vec<String>,
    pub url: String,
    pub created: DateTime<Utc>,
}
