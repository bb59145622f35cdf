use std::{cmp::Ordering, str::FromStr};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    model::{api::ErrorDto, character::Character},
    server::{error::request::RequestError, error::Error, metrics, model::app::AppState},
};

/// OpenAPI tag of the character routes
pub static CHARACTER_TAG: &str = "character";

/// The only query parameter accepted by `/earth_characters`
pub const SORT_BY_PARAM: &str = "sort_by";

/// A field of [`Character`] the list can be sorted by, named as in the JSON response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Upstream character id
    Id,
    /// Character name
    Name,
    /// Species, always `Human` in this list
    Species,
    /// Sub-species, serialized as `type`
    Type,
    /// Gender as reported upstream
    Gender,
    /// Origin location, compared by name
    Origin,
    /// Last known location, compared by name
    Location,
    /// Avatar URL
    Image,
    /// Episode URLs, compared lexicographically as a list
    Episode,
    /// Character resource URL
    Url,
    /// Upstream creation timestamp
    Created,
}

impl SortField {
    /// Every sortable field, in response order
    pub const ALL: [SortField; 11] = [
        Self::Id,
        Self::Name,
        Self::Species,
        Self::Type,
        Self::Gender,
        Self::Origin,
        Self::Location,
        Self::Image,
        Self::Episode,
        Self::Url,
        Self::Created,
    ];

    /// Name of the field in the JSON response and in `sort_by`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Species => "species",
            Self::Type => "type",
            Self::Gender => "gender",
            Self::Origin => "origin",
            Self::Location => "location",
            Self::Image => "image",
            Self::Episode => "episode",
            Self::Url => "url",
            Self::Created => "created",
        }
    }

    /// Natural ordering of this field; locations compare by name.
    pub fn compare(&self, a: &Character, b: &Character) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Name => a.name.cmp(&b.name),
            Self::Species => a.species.cmp(&b.species),
            Self::Type => a.kind.cmp(&b.kind),
            Self::Gender => a.gender.cmp(&b.gender),
            Self::Origin => a.origin.cmp(&b.origin),
            Self::Location => a.location.cmp(&b.location),
            Self::Image => a.image.cmp(&b.image),
            Self::Episode => a.episode.cmp(&b.episode),
            Self::Url => a.url.cmp(&b.url),
            Self::Created => a.created.cmp(&b.created),
        }
    }
}

impl FromStr for SortField {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| RequestError::InvalidSortField(s.to_string()))
    }
}

/// Validate the raw query pairs, returning the requested sort fields in order.
///
/// # Returns
/// - `Ok(Vec<SortField>)` - Possibly empty list of sort fields
/// - `Err(RequestError::UnknownQueryParameter)` - A parameter other than `sort_by` was sent
/// - `Err(RequestError::InvalidSortField)` - A `sort_by` value is not a character field
pub fn parse_sort_fields(params: &[(String, String)]) -> Result<Vec<SortField>, RequestError> {
    params
        .iter()
        .map(|(name, value)| {
            if name != SORT_BY_PARAM {
                return Err(RequestError::UnknownQueryParameter(name.clone()));
            }

            value.parse()
        })
        .collect()
}

/// Stable ascending sort by `fields`, each later field breaking ties of the earlier ones.
pub fn sort_characters(characters: &mut [Character], fields: &[SortField]) {
    if fields.is_empty() {
        return;
    }

    characters.sort_by(|a, b| {
        fields
            .iter()
            .fold(Ordering::Equal, |ordering, field| {
                ordering.then_with(|| field.compare(a, b))
            })
    });
}

/// Get every living human originating from an Earth
///
/// Characters come from the cache when a fresh entry exists, otherwise they are resolved from
/// the upstream API. Rate limited per client.
///
/// # Responses
/// - 200 (OK): Characters, in upstream order unless `sort_by` is given
/// - 400 (Bad Request): Unknown query parameter or invalid sort field
/// - 429 (Too Many Requests): Client exceeded its request budget, see `Retry-After`
/// - 500 (Internal Server Error): Upstream API could not be resolved
#[utoipa::path(
    get,
    path = "/earth_characters",
    tag = CHARACTER_TAG,
    params(
        ("sort_by" = Option<Vec<String>>, Query, description = "Repeatable. Allowed values: id, name, species, type, gender, origin, location, image, episode, url, created"),
    ),
    responses(
        (status = 200, description = "Earth characters", body = Vec<Character>),
        (status = 400, description = "Invalid user input", body = ErrorDto),
        (status = 429, description = "Rate limit exceeded", body = ErrorDto),
        (status = 500, description = "Upstream API is unavailable", body = ErrorDto)
    ),
)]
pub async fn get_earth_characters(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, Error> {
    let fields = parse_sort_fields(&params)?;

    if let Some(metrics) = metrics::metrics() {
        metrics.record_sort_fields(fields.iter().map(SortField::as_str));
    }

    let mut characters = state.orchestrator().get_data().await?;

    sort_characters(&mut characters, &fields);

    Ok((StatusCode::OK, Json(characters)))
}
