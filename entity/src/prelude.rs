pub use super::query_log::Entity as QueryLog;
