//! `SeaORM` document store backed by a single `documents` table.
//!
//! `ownerId` and `year` are copied out of the body into indexed columns on
//! every write. Equality filters on those two fields narrow the rows in SQL;
//! every filter and the ordering are then evaluated in process, so the same
//! semantics hold on every database. Each batch runs inside one database
//! transaction.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectOptions, ConnectionTrait, Database,
    DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;

use super::eval;
use super::types::{
    Document, Filter, FilterOp, OrderBy, StoreError, WriteOp, deep_merge, empty_object, ensure_object,
    shallow_update,
};
use super::{DocumentStore, new_document_id};
use crate::entities::documents;
use crate::migration::Migrator;

/// Document store on a relational database.
#[derive(Debug, Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    /// Wraps an existing connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connects to `url` with a pool of at most `max_connections`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let mut options = ConnectOptions::new(url);
        options
            .max_connections(max_connections)
            .sqlx_logging(false);
        Ok(Self::new(Database::connect(options).await?))
    }

    /// Applies pending schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        Migrator::up(&self.db, None).await?;
        Ok(())
    }

    /// Underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

async fn load<C: ConnectionTrait>(
    conn: &C,
    collection: &str,
    id: &str,
) -> Result<Option<documents::Model>, DbErr> {
    documents::Entity::find_by_id((collection.to_string(), id.to_string()))
        .one(conn)
        .await
}

const OWNER_FIELD: &str = "ownerId";
const YEAR_FIELD: &str = "year";

fn year_column(value: &Value) -> Option<i32> {
    value.as_i64().and_then(|year| i32::try_from(year).ok())
}

/// Values of the indexed columns for a document body.
fn indexed_columns(data: &Value) -> (Option<String>, Option<i32>) {
    let owner_id = data
        .get(OWNER_FIELD)
        .and_then(Value::as_str)
        .map(str::to_string);
    let year = data.get(YEAR_FIELD).and_then(year_column);
    (owner_id, year)
}

/// SQL condition narrowing a collection to rows that may match `filters`.
///
/// A body whose `year` is not an `i32` integer has a NULL column, so those
/// rows are kept for the in-process check.
fn indexed_condition(collection: &str, filters: &[Filter]) -> Condition {
    let mut condition = Condition::all().add(documents::Column::Collection.eq(collection));
    for filter in filters.iter().filter(|f| f.op == FilterOp::Eq) {
        match (filter.field.as_str(), &filter.value) {
            (OWNER_FIELD, Value::String(owner_id)) => {
                condition = condition.add(documents::Column::OwnerId.eq(owner_id.as_str()));
            }
            (YEAR_FIELD, value) => {
                if let Some(year) = year_column(value) {
                    condition = condition.add(
                        Condition::any()
                            .add(documents::Column::Year.eq(year))
                            .add(documents::Column::Year.is_null()),
                    );
                }
            }
            _ => {}
        }
    }
    condition
}

async fn write<C: ConnectionTrait>(
    conn: &C,
    collection: String,
    id: String,
    data: Value,
    exists: bool,
) -> Result<(), DbErr> {
    let (owner_id, year) = indexed_columns(&data);
    let row = documents::ActiveModel {
        collection: Set(collection),
        id: Set(id),
        owner_id: Set(owner_id),
        year: Set(year),
        data: Set(data),
        updated_at: Set(Utc::now().into()),
    };
    if exists {
        row.update(conn).await?;
    } else {
        row.insert(conn).await?;
    }
    Ok(())
}

async fn apply<C: ConnectionTrait>(conn: &C, op: WriteOp) -> Result<(), StoreError> {
    match op {
        WriteOp::Set {
            collection,
            id,
            data,
            merge,
        } => {
            ensure_object(&data)?;
            let existing = load(conn, &collection, &id).await?;
            let exists = existing.is_some();
            let mut body = match existing {
                Some(row) if merge => row.data,
                _ => empty_object(),
            };
            deep_merge(&mut body, data);
            write(conn, collection, id, body, exists).await?;
        }
        WriteOp::Update {
            collection,
            id,
            data,
        } => {
            let Some(row) = load(conn, &collection, &id).await? else {
                return Err(StoreError::NotFound { collection, id });
            };
            let mut body = row.data;
            shallow_update(&mut body, data)?;
            write(conn, collection, id, body, true).await?;
        }
        WriteOp::Delete { collection, id } => {
            documents::Entity::delete_by_id((collection, id))
                .exec(conn)
                .await?;
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for SeaOrmStore {
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        Ok(load(&self.db, collection, id).await?.map(|row| Document {
            id: row.id,
            data: row.data,
        }))
    }

    async fn query_documents(
        &self,
        collection: &str,
        filters: &[Filter],
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Document>, StoreError> {
        let rows = documents::Entity::find()
            .filter(indexed_condition(collection, filters))
            .all(&self.db)
            .await?;
        let mut docs: Vec<Document> = rows
            .into_iter()
            .map(|row| Document {
                id: row.id,
                data: row.data,
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
        apply(&self.db, WriteOp::set(collection, id, data, merge)).await
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
    ) -> Result<(), StoreError> {
        apply(&self.db, WriteOp::update(collection, id, data)).await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        apply(
            &self.db,
            WriteOp::Delete {
                collection: collection.to_string(),
                id: id.to_string(),
            },
        )
        .await
    }

    async fn batch_write(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        let txn = self.db.begin().await?;
        for op in ops {
            apply(&txn, op).await?;
        }
        txn.commit().await?;
        Ok(())
    }

    async fn add_document(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        let id = new_document_id();
        apply(&self.db, WriteOp::set(collection, id.clone(), data, false)).await?;
        Ok(id)
    }
}
