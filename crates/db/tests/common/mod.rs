//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Notify;

use taxbook_core::transaction::{TransactionDraft, TransactionKind};
use taxbook_db::store::{Document, Filter, OrderBy, WriteOp};
use taxbook_db::{DocumentStore, InMemoryStore, SharedStore, StoreError};
use taxbook_shared::types::OwnerId;

pub const OWNER: &str = "owner-1";

pub fn owner() -> OwnerId {
    OwnerId::new(OWNER)
}

pub fn draft(date: &str, kind: TransactionKind, category: &str, amount: &str) -> TransactionDraft {
    TransactionDraft {
        date: date.to_string(),
        kind,
        category: category.to_string(),
        amount: amount.to_string(),
        note: String::new(),
        number: None,
        account: None,
    }
}

/// Writes a record the way the pre-registry application stored it.
pub async fn seed_legacy_transaction(store: &dyn DocumentStore, id: &str, date: &str) {
    store
        .set_document(
            "transactions",
            id,
            json!({
                "ownerId": OWNER,
                "date": date,
                "type": "income",
                "category": "salary",
                "amount": "100",
                "note": "",
                "createdAt": "2025-01-15T10:00:00Z",
            }),
            false,
        )
        .await
        .unwrap();
}

/// Forwards to an in-memory store; batches fail while `fail_batches` is set.
pub struct FailingStore {
    pub inner: InMemoryStore,
    pub fail_batches: std::sync::atomic::AtomicBool,
}

impl FailingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryStore::new(),
            fail_batches: std::sync::atomic::AtomicBool::new(false),
        })
    }

    pub fn fail(&self, on: bool) {
        self.fail_batches
            .store(on, std::sync::atomic::Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.inner.get_document(collection, id).await
    }

    async fn query_documents(
        &self,
        collection: &str,
        filters: &[Filter],
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Document>, StoreError> {
        self.inner.query_documents(collection, filters, order_by).await
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        merge: bool,
    ) -> Result<(), StoreError> {
        self.inner.set_document(collection, id, data, merge).await
    }

    async fn update_document(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        self.inner.update_document(collection, id, data).await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.inner.delete_document(collection, id).await
    }

    async fn batch_write(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        if self.fail_batches.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StoreError::Backend("injected batch failure".to_string()));
        }
        self.inner.batch_write(ops).await
    }

    async fn add_document(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        self.inner.add_document(collection, data).await
    }
}

/// Forwards to an in-memory store, pausing every batch until released.
pub struct GatedStore {
    pub inner: InMemoryStore,
    pub entered: Notify,
    pub release: Notify,
}

impl GatedStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryStore::new(),
            entered: Notify::new(),
            release: Notify::new(),
        })
    }
}

#[async_trait]
impl DocumentStore for GatedStore {
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.inner.get_document(collection, id).await
    }

    async fn query_documents(
        &self,
        collection: &str,
        filters: &[Filter],
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Document>, StoreError> {
        self.inner.query_documents(collection, filters, order_by).await
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        merge: bool,
    ) -> Result<(), StoreError> {
        self.inner.set_document(collection, id, data, merge).await
    }

    async fn update_document(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        self.inner.update_document(collection, id, data).await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.inner.delete_document(collection, id).await
    }

    async fn batch_write(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.batch_write(ops).await
    }

    async fn add_document(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        self.inner.add_document(collection, data).await
    }
}

pub fn shared<S: DocumentStore + 'static>(store: &Arc<S>) -> SharedStore {
    store.clone()
}
