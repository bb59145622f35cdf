//! Test context structure and utilities.
//!
//! This module provides the `TestContext` returned by `TestBuilder`. The context includes an
//! in-memory SQLite database and a mock HTTP server standing in for the upstream API.

use mockito::{Mock, Server, ServerGuard};
use sea_orm::{
    sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    PaginatorTrait,
};
use serde_json::Value;

use crate::{
    constant::{CHARACTER_PATH, CHARACTER_QUERY, LOCATION_PATH, LOCATION_QUERY},
    error::TestError,
    fixtures::mockito::{create_error_endpoint, create_page_endpoints},
};

/// Test context structure returned by `TestBuilder`
///
/// # Usage
///
/// ```ignore
/// let test = TestBuilder::new()
///     .with_audit_table()
///     .with_location_pages(vec![vec![factory::location(1, "Earth (C-137)")]], 1)
///     .build()
///     .await?;
///
/// let client = RemoteClient::new(reqwest::Client::new(), RetryContext::new());
/// let url = test.location_url();
///
/// // Assert all mocks were called
/// test.assert_mocks();
/// ```
pub struct TestContext {
    /// Database connection to in-memory SQLite database
    pub db: DatabaseConnection,

    /// Mock HTTP server for upstream endpoints
    pub(crate) server: ServerGuard,
    /// Collection of mock HTTP endpoints for assertion
    pub(crate) mocks: Vec<Mock>,
}

impl TestContext {
    /// Create a new test context with an empty database and no mocks.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully initialized test context
    /// - `Err(TestError::DbErr)` - Database connection failed
    pub(crate) async fn new() -> Result<Self, TestError> {
        let server = Server::new_async().await;
        let db = Database::connect("sqlite::memory:").await?;

        Ok(TestContext {
            server,
            db,
            mocks: Vec::new(),
        })
    }

    /// Execute CREATE TABLE statements against the test database.
    pub(crate) async fn with_tables(
        &self,
        stmts: Vec<TableCreateStatement>,
    ) -> Result<(), TestError> {
        for stmt in stmts {
            self.db.execute(&stmt).await?;
        }

        Ok(())
    }

    /// Base URL of the mock upstream API, without trailing slash.
    pub fn upstream_url(&self) -> String {
        self.server.url()
    }

    /// URL of the first page of the Earth location listing.
    pub fn location_url(&self) -> String {
        format!("{}{}?{}", self.server.url(), LOCATION_PATH, LOCATION_QUERY)
    }

    /// URL of the first page of the living human character listing.
    pub fn character_url(&self) -> String {
        format!("{}{}?{}", self.server.url(), CHARACTER_PATH, CHARACTER_QUERY)
    }

    /// Register the Earth location listing after the context was built.
    pub fn create_location_pages(&mut self, pages: Vec<Vec<Value>>, expected_requests: usize) {
        let mocks = create_page_endpoints(
            &mut self.server,
            LOCATION_PATH,
            LOCATION_QUERY,
            pages,
            expected_requests,
        );
        self.mocks.extend(mocks);
    }

    /// Register the character listing after the context was built.
    pub fn create_character_pages(&mut self, pages: Vec<Vec<Value>>, expected_requests: usize) {
        let mocks = create_page_endpoints(
            &mut self.server,
            CHARACTER_PATH,
            CHARACTER_QUERY,
            pages,
            expected_requests,
        );
        self.mocks.extend(mocks);
    }

    /// Register an endpoint answering `status` for `path?query`.
    pub fn create_error_endpoint(
        &mut self,
        path: &str,
        query: &str,
        status: usize,
        expected_requests: usize,
    ) {
        let mock = create_error_endpoint(&mut self.server, path, query, status, expected_requests);
        self.mocks.push(mock);
    }

    /// Number of rows in the audit table.
    pub async fn audit_record_count(&self) -> Result<u64, TestError> {
        Ok(entity::prelude::QueryLog::find().count(&self.db).await?)
    }

    /// Assert all mock endpoints were called as expected.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}
