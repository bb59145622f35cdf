use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryOrder,
};

use crate::server::model::db::QueryLogModel;

/// Queries against the `query` audit table
pub struct QueryLogRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> QueryLogRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert `data` stamped with the current UTC time
    pub async fn create(&self, data: serde_json::Value) -> Result<QueryLogModel, DbErr> {
        entity::query_log::ActiveModel {
            ts: ActiveValue::Set(Utc::now().naive_utc()),
            data: ActiveValue::Set(data),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Most recently inserted record
    pub async fn get_latest(&self) -> Result<Option<QueryLogModel>, DbErr> {
        entity::prelude::QueryLog::find()
            .order_by_desc(entity::query_log::Column::Id)
            .one(self.db)
            .await
    }

    /// Number of stored records
    pub async fn count(&self) -> Result<u64, DbErr> {
        entity::prelude::QueryLog::find().count(self.db).await
    }
}
