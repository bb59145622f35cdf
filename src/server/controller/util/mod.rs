//! Utility functions for controller request handling.
//!
//! This module provides middleware shared by controllers: the per-client rate limiter applied
//! to the data endpoints and the request metrics recorded for every route.

pub mod metrics;
pub mod rate_limit;
