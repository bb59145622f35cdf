//! Server application models and type definitions.
//!
//! This module contains the shared application state, upstream API envelope types and
//! database model aliases used by the services and handlers.

pub mod app;
pub mod db;
pub mod upstream;
