//! Types mirroring the upstream API's paginated responses.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::model::character::Character;

/// The kind of resource a paginated endpoint returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Character,
    Location,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Character => write!(f, "character"),
            Self::Location => write!(f, "location"),
        }
    }
}

/// A record type that can be resolved from a paginated upstream endpoint
pub trait UpstreamResource: DeserializeOwned + Send + 'static {
    const KIND: ResourceKind;
}

impl UpstreamResource for Character {
    const KIND: ResourceKind = ResourceKind::Character;
}

impl UpstreamResource for Location {
    const KIND: ResourceKind = ResourceKind::Location;
}

/// A location record from `/location`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub dimension: String,
    /// URLs of the characters whose last known location is this one
    pub residents: Vec<String>,
    pub url: String,
    pub created: DateTime<Utc>,
}

/// Pagination metadata of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub count: u64,
    pub pages: u32,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// One page of a paginated upstream response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEnvelope<T> {
    pub info: PageInfo,
    pub results: Vec<T>,
}
