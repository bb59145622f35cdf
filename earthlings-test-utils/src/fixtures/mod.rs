//! Test fixture modules for upstream data and HTTP mock creation.
//!
//! - `upstream` - JSON records and pages shaped like the upstream API's responses
//! - `mockito` - mock endpoints serving those pages from the test server

pub mod mockito;
pub mod upstream;
