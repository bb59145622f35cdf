//! Server application core modules.
//!
//! This module contains all server-side functionality of the earthlings service: the upstream
//! API client and pagination engine, the cache-aside orchestrator with its cache and audit
//! stores, the per-client rate limiter, Prometheus metrics, and the HTTP routes exposing the result.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod metrics;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
