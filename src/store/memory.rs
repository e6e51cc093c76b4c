//! In-process document store double.
//!
//! # Responsibility
//! - Mirror the managed backend's observable semantics for tests and
//!   offline hosts: auto-assigned string ids, sparse merge on update,
//!   no-op delete of missing ids, filter + sort on single fields.
//!
//! # Invariants
//! - String comparison is lexicographic, consistent with `YYYY-MM-DD`
//!   date ordering.
//! - Sort is stable; documents missing the sort field order last.

use crate::store::{
    CollectionQuery, Document, DocumentStore, FilterOp, StoreError, StoreResult,
};
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory collection keyed by document id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<BTreeMap<String, Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents. Test convenience.
    pub fn len(&self) -> usize {
        self.docs.lock().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, doc: Document) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        let mut docs = self.docs.lock().expect("store lock poisoned");
        docs.insert(id.clone(), doc);
        Ok(id)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Document>> {
        let docs = self.docs.lock().expect("store lock poisoned");
        Ok(docs.get(id).cloned())
    }

    async fn update(&self, id: &str, fields: Document) -> StoreResult<()> {
        let mut docs = self.docs.lock().expect("store lock poisoned");
        let Some(doc) = docs.get_mut(id) else {
            return Err(StoreError::Rejected(format!(
                "no document to update: {id}"
            )));
        };
        for (field, value) in fields {
            doc.insert(field, value);
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut docs = self.docs.lock().expect("store lock poisoned");
        docs.remove(id);
        Ok(())
    }

    async fn find(&self, query: &CollectionQuery) -> StoreResult<Vec<(String, Document)>> {
        let docs = self.docs.lock().expect("store lock poisoned");
        let mut hits: Vec<(String, Document)> = docs
            .iter()
            .filter(|(_, doc)| query.filters.iter().all(|f| matches_filter(doc, f)))
            .map(|(id, doc)| (id.clone(), doc.clone()))
            .collect();

        if let Some(sort) = &query.order_by {
            hits.sort_by(|(_, a), (_, b)| compare_field(a, b, sort.field, sort.descending));
        }

        Ok(hits)
    }
}

fn matches_filter(doc: &Document, filter: &crate::store::FieldFilter) -> bool {
    let Some(value) = doc.get(filter.field) else {
        return false;
    };
    match filter.op {
        FilterOp::Eq => value == &filter.value,
        FilterOp::Gte => matches!(
            compare_values(value, &filter.value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        FilterOp::Lte => matches!(
            compare_values(value, &filter.value),
            Some(Ordering::Less | Ordering::Equal)
        ),
    }
}

fn compare_field(a: &Document, b: &Document, field: &str, descending: bool) -> Ordering {
    // Only present-vs-present comparisons flip with the sort direction;
    // documents missing the field order last either way.
    match (a.get(field), b.get(field)) {
        (Some(left), Some(right)) => {
            let ordering = compare_values(left, right).unwrap_or(Ordering::Equal);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .zip(b.as_f64())
            .and_then(|(x, y)| x.partial_cmp(&y)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
