//! Document store abstraction.
//!
//! Records live as JSON documents grouped in named collections. Every
//! backend offers the same primitives: point reads, filtered queries,
//! merge/replace writes, partial updates, deletes, id-assigning inserts and
//! an all-or-nothing batch.

mod eval;
pub mod memory;
pub mod sea;
pub mod types;

pub use memory::InMemoryStore;
pub use sea::SeaOrmStore;
pub use types::{Document, Filter, FilterOp, OrderBy, StoreError, WriteOp, to_data};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// Collection names.
pub mod collections {
    /// Profiles and year registries, keyed by owner id.
    pub const USERS: &str = "users";
    /// Income and expense records.
    pub const TRANSACTIONS: &str = "transactions";
    /// Monthly budgets, keyed by `{owner}_{YYYY-MM}`.
    pub const BUDGETS: &str = "budgets";
    /// Append-only closure snapshots.
    pub const YEAR_SUMMARIES: &str = "yearSummaries";
}

/// Shared handle to a store backend.
pub type SharedStore = Arc<dyn DocumentStore>;

/// Primitives every document store backend provides.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads one document.
    async fn get_document(&self, collection: &str, id: &str)
    -> Result<Option<Document>, StoreError>;

    /// Returns documents matching every filter, optionally ordered.
    async fn query_documents(
        &self,
        collection: &str,
        filters: &[Filter],
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Writes a document. With `merge` the data is deep-merged into any
    /// existing document, otherwise it replaces it.
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        merge: bool,
    ) -> Result<(), StoreError>;

    /// Replaces the given top-level fields of an existing document.
    async fn update_document(&self, collection: &str, id: &str, data: Value)
    -> Result<(), StoreError>;

    /// Deletes a document. Deleting a missing document succeeds.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Applies every operation or none of them.
    async fn batch_write(&self, ops: Vec<WriteOp>) -> Result<(), StoreError>;

    /// Inserts a document under a generated id and returns the id.
    async fn add_document(&self, collection: &str, data: Value) -> Result<String, StoreError>;
}

/// Generates a document id for writes that need it up front.
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
