//! HTTP controller endpoints for the earthlings web API.
//!
//! This module contains the Axum handlers serving the Earth character list, the health
//! report and the Prometheus scrape endpoint, plus the middleware placed in front of them. Handlers
//! validate their input before any upstream work and use utoipa for OpenAPI documentation.

pub mod character;
pub mod health;
pub mod metrics;
pub mod util;
