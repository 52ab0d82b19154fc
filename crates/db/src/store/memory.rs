//! In-memory document store.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::eval;
use super::types::{
    Document, Filter, OrderBy, StoreError, WriteOp, deep_merge, empty_object, ensure_object,
    shallow_update,
};
use super::{DocumentStore, new_document_id};

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// Document store held in process memory.
///
/// Batches are applied to a copy of the affected state and swapped in only
/// when every operation succeeds.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<Collections>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}

fn apply(collections: &mut Collections, op: WriteOp) -> Result<(), StoreError> {
    match op {
        WriteOp::Set {
            collection,
            id,
            data,
            merge,
        } => {
            ensure_object(&data)?;
            let docs = collections.entry(collection).or_default();
            match docs.get_mut(&id) {
                Some(existing) if merge => deep_merge(existing, data),
                _ => {
                    let mut fresh = empty_object();
                    deep_merge(&mut fresh, data);
                    docs.insert(id, fresh);
                }
            }
            Ok(())
        }
        WriteOp::Update {
            collection,
            id,
            data,
        } => {
            let existing = collections
                .get_mut(&collection)
                .and_then(|docs| docs.get_mut(&id))
                .ok_or(StoreError::NotFound { collection, id })?;
            shallow_update(existing, data)
        }
        WriteOp::Delete { collection, id } => {
            if let Some(docs) = collections.get_mut(&collection) {
                docs.remove(&id);
            }
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn query_documents(
        &self,
        collection: &str,
        filters: &[Filter],
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let mut docs: Vec<Document> = collections
            .get(collection)
            .into_iter()
            .flatten()
            .map(|(id, data)| Document {
                id: id.clone(),
                data: data.clone(),
            })
            .filter(|doc| eval::matches_all(doc, filters))
            .collect();
        eval::sort(&mut docs, order_by);
        Ok(docs)
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        merge: bool,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        apply(&mut collections, WriteOp::set(collection, id, data, merge))
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        apply(&mut collections, WriteOp::update(collection, id, data))
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        apply(
            &mut collections,
            WriteOp::Delete {
                collection: collection.to_string(),
                id: id.to_string(),
            },
        )
    }

    async fn batch_write(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let mut staged = collections.clone();
        for op in ops {
            apply(&mut staged, op)?;
        }
        *collections = staged;
        Ok(())
    }

    async fn add_document(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        let id = new_document_id();
        let mut collections = self.collections.write().await;
        apply(&mut collections, WriteOp::set(collection, id.clone(), data, false))?;
        Ok(id)
    }
}
