//! SeaORM entities for the earthlings audit database.

pub mod prelude;

pub mod query_log;
