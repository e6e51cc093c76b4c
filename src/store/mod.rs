//! Document-store collaborator contract.
//!
//! # Responsibility
//! - Define the exact backend capabilities the repository relies on: string
//!   ids assigned on insert, field equality/range filters, descending sort,
//!   sparse field merge on update.
//! - Keep backend wire details out of the repository layer.
//!
//! # Invariants
//! - Every trait method is one request/response round trip.
//! - Errors pass through unchanged in shape; no retry, no fallback.

use async_trait::async_trait;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;

/// Schema-flexible document body keyed by field name.
pub type Document = serde_json::Map<String, Value>;

pub type StoreResult<T> = Result<T, StoreError>;

/// Transport/backend failure surfaced by a store implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The request never completed (network, timeout at the client level).
    Transport(String),
    /// The backend completed the request and refused it (permission, quota,
    /// malformed query, update of a missing document).
    Rejected(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "store transport failure: {message}"),
            Self::Rejected(message) => write!(f, "store rejected request: {message}"),
        }
    }
}

impl Error for StoreError {}

/// Filter comparison operator. Exactly the set the backend supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
}

/// Single-field filter clause.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    pub field: &'static str,
    pub op: FilterOp,
    pub value: Value,
}

impl FieldFilter {
    pub fn eq(field: &'static str, value: impl Into<Value>) -> Self {
        Self {
            field,
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    pub fn gte(field: &'static str, value: impl Into<Value>) -> Self {
        Self {
            field,
            op: FilterOp::Gte,
            value: value.into(),
        }
    }

    pub fn lte(field: &'static str, value: impl Into<Value>) -> Self {
        Self {
            field,
            op: FilterOp::Lte,
            value: value.into(),
        }
    }
}

/// Sort clause, single field.
#[derive(Debug, Clone)]
pub struct SortSpec {
    pub field: &'static str,
    pub descending: bool,
}

/// Query descriptor for [`DocumentStore::find`]. No pagination, no
/// aggregation; the backend provides neither to this layer.
#[derive(Debug, Clone, Default)]
pub struct CollectionQuery {
    pub filters: Vec<FieldFilter>,
    pub order_by: Option<SortSpec>,
}

impl CollectionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by_desc(mut self, field: &'static str) -> Self {
        self.order_by = Some(SortSpec {
            field,
            descending: true,
        });
        self
    }
}

/// Remote document collection handle.
///
/// Implementations are pre-configured with endpoint/credentials by the host
/// application; this crate never reads configuration itself.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts one document and returns the backend-assigned id.
    async fn insert(&self, doc: Document) -> StoreResult<String>;

    /// Fetches one document by id. `None` when no such document exists.
    async fn get(&self, id: &str) -> StoreResult<Option<Document>>;

    /// Merges the given fields into an existing document.
    ///
    /// Rejects the request when the document does not exist; fields not named
    /// in `fields` keep their stored values.
    async fn update(&self, id: &str, fields: Document) -> StoreResult<()>;

    /// Removes one document. Deleting a missing id follows backend semantics
    /// (treated as a no-op, not validated here).
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Runs a filtered, optionally sorted query over the whole collection.
    async fn find(&self, query: &CollectionQuery) -> StoreResult<Vec<(String, Document)>>;
}
