//! Upstream API endpoints served by the mock server.
//!
//! The paths and query strings match the requests the service makes against the real
//! upstream API, so mocks registered with them are hit by unmodified service code.

/// Path of the location listing.
pub static LOCATION_PATH: &str = "/location";

/// Query selecting the Earth locations.
pub static LOCATION_QUERY: &str = "name=Earth";

/// Path of the character listing.
pub static CHARACTER_PATH: &str = "/character";

/// Query selecting living humans.
pub static CHARACTER_QUERY: &str = "species=human&status=alive";
