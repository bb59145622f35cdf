//! Database model type aliases.

/// Type alias for an audit record of a computed result.
///
/// # Fields (from `entity::query_log::Model`)
/// - `id` - Primary key
/// - `ts` - UTC timestamp of the insert
/// - `data` - The serialized character list
pub type QueryLogModel = entity::query_log::Model;
