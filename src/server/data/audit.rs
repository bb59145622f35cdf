use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tokio::sync::RwLock;

use crate::server::{
    data::{query_log::QueryLogRepository, AuditStore},
    error::store::AuditError,
};

/// Database backed [`AuditStore`] writing to the `query` table.
pub struct DbAuditStore {
    db: RwLock<Option<DatabaseConnection>>,
    available: AtomicBool,
}

impl Default for DbAuditStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DbAuditStore {
    /// Create an unconnected, unavailable store.
    pub fn new() -> Self {
        Self {
            db: RwLock::new(None),
            available: AtomicBool::new(false),
        }
    }

    /// Wrap an already migrated connection, the store is available immediately.
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self {
            db: RwLock::new(Some(db)),
            available: AtomicBool::new(true),
        }
    }

    /// Connect to `database_url`, run migrations and mark the store available.
    pub async fn init(&self, database_url: &str) -> Result<(), AuditError> {
        let mut opt = ConnectOptions::new(database_url);
        opt.sqlx_logging(false);

        let db = Database::connect(opt).await?;
        Migrator::up(&db, None).await?;

        *self.db.write().await = Some(db);
        self.available.store(true, Ordering::SeqCst);

        tracing::info!("Audit database initialized");

        Ok(())
    }

    /// Close the connection and mark the store unavailable.
    pub async fn close(&self) {
        self.available.store(false, Ordering::SeqCst);

        if let Some(db) = self.db.write().await.take() {
            if let Err(e) = db.close().await {
                tracing::warn!("Failed to close audit database cleanly: {}", e);
            }

            tracing::info!("Audit database connection closed");
        }
    }
}

#[async_trait]
impl AuditStore for DbAuditStore {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn append(&self, payload: serde_json::Value) -> Result<(), AuditError> {
        if !self.is_available() {
            return Err(AuditError::Unavailable);
        }

        let guard = self.db.read().await;
        let Some(db) = guard.as_ref() else {
            return Err(AuditError::Unavailable);
        };

        QueryLogRepository::new(db).create(payload).await?;

        Ok(())
    }
}
