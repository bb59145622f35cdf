//! Declarative test builder.
//!
//! This module provides the `TestBuilder` API for configuring test environments before
//! execution. All operations are queued and executed during the final `build()` call.

use mockito::{Mock, ServerGuard};
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};
use serde_json::Value;

use crate::{
    constant::{CHARACTER_PATH, CHARACTER_QUERY, LOCATION_PATH, LOCATION_QUERY},
    error::TestError,
    fixtures::mockito::create_page_endpoints,
    TestContext,
};

/// Builder for declarative test initialization.
///
/// # Example
///
/// ```no_run
/// use earthlings_test_utils::prelude::*;
///
/// # async fn example() -> Result<(), TestError> {
/// let test = TestBuilder::new()
///     .with_audit_table()
///     .with_location_pages(vec![vec![factory::location(1, "Earth (C-137)")]], 1)
///     .with_character_pages(vec![vec![factory::character(1, "Rick", "Earth (C-137)")]], 1)
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct TestBuilder {
    // Tables to create
    tables: Vec<TableCreateStatement>,

    // Custom mock endpoints, created before the listing shortcuts
    mock_builders: Vec<Box<dyn FnOnce(&mut ServerGuard) -> Mock>>,

    // Paginated listing shortcuts: (pages, expected_requests per page)
    location_pages: Vec<(Vec<Vec<Value>>, usize)>,
    character_pages: Vec<(Vec<Vec<Value>>, usize)>,
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBuilder {
    /// Create a new TestBuilder with no tables or mock endpoints configured.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            mock_builders: Vec::new(),
            location_pages: Vec::new(),
            character_pages: Vec::new(),
        }
    }

    /// Add the audit (`query`) table to the test database.
    pub fn with_audit_table(self) -> Self {
        self.with_table(entity::prelude::QueryLog)
    }

    /// Add a custom entity table to the test database.
    ///
    /// # Arguments
    /// - `entity` - Entity type implementing `EntityTrait`
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Serve the Earth location listing split into `pages`.
    ///
    /// # Arguments
    /// - `pages` - Location records of each page, in page order
    /// - `expected_requests` - Number of times each page should be requested
    pub fn with_location_pages(mut self, pages: Vec<Vec<Value>>, expected_requests: usize) -> Self {
        self.location_pages.push((pages, expected_requests));
        self
    }

    /// Serve the living human character listing split into `pages`.
    ///
    /// # Arguments
    /// - `pages` - Character records of each page, in page order
    /// - `expected_requests` - Number of times each page should be requested
    pub fn with_character_pages(
        mut self,
        pages: Vec<Vec<Value>>,
        expected_requests: usize,
    ) -> Self {
        self.character_pages.push((pages, expected_requests));
        self
    }

    /// Add a custom mock endpoint.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let test = TestBuilder::new()
    ///     .with_mock_endpoint(|server| {
    ///         server
    ///             .mock("GET", "/location")
    ///             .with_status(503)
    ///             .expect(3)
    ///             .create()
    ///     })
    ///     .build()
    ///     .await?;
    /// ```
    pub fn with_mock_endpoint<F>(mut self, builder: F) -> Self
    where
        F: FnOnce(&mut ServerGuard) -> Mock + 'static,
    {
        self.mock_builders.push(Box::new(builder));
        self
    }

    /// Build the test context, executing all queued operations.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully configured test context
    /// - `Err(TestError)` - Table creation failed
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new().await?;

        // 1. Create tables
        setup.with_tables(self.tables).await?;

        // 2. Create mock endpoints
        // Custom endpoints are created first so mockito serves them before the shortcuts
        // when both match the same request
        let mut mocks = Vec::new();

        for builder in self.mock_builders {
            mocks.push(builder(&mut setup.server));
        }

        for (pages, expected_requests) in self.location_pages {
            mocks.extend(create_page_endpoints(
                &mut setup.server,
                LOCATION_PATH,
                LOCATION_QUERY,
                pages,
                expected_requests,
            ));
        }

        for (pages, expected_requests) in self.character_pages {
            mocks.extend(create_page_endpoints(
                &mut setup.server,
                CHARACTER_PATH,
                CHARACTER_QUERY,
                pages,
                expected_requests,
            ));
        }

        setup.mocks = mocks;

        Ok(setup)
    }
}
