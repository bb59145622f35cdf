//! Service layer for business logic and orchestration.
//!
//! This module contains the upstream API client and pagination engine, the Earth filter, the
//! cache-aside orchestrator combining them with the stores, the retry policy, and the request
//! rate limiter guarding the HTTP boundary.

pub mod earth;
pub mod orchestrator;
pub mod rate_limit;
pub mod retry;
pub mod upstream;
