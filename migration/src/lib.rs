pub use sea_orm_migration::prelude::*;

mod m20251019_000001_query_log;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20251019_000001_query_log::Migration)]
    }
}
