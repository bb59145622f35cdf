use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QueryLog::Table)
                    .if_not_exists()
                    .col(pk_auto(QueryLog::Id))
                    .col(timestamp(QueryLog::Ts))
                    .col(json(QueryLog::Data))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QueryLog::Table).to_owned())
            .await?;

        Ok(())
    }
}

/// The audit table keeps the `query` name used by earlier deployments.
#[derive(DeriveIden)]
pub enum QueryLog {
    #[sea_orm(iden = "query")]
    Table,
    Id,
    Ts,
    Data,
}
