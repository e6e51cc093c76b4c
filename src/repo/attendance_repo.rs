//! Attendance repository over a document-store handle.
//!
//! # Responsibility
//! - Provide stable CRUD/query/statistics entry points for attendance
//!   records.
//! - Stamp lifecycle timestamps (`createdAt`, `updatedAt`, `lastShared`).
//!
//! # Invariants
//! - Every operation is a single round trip; no retry, no fallback value.
//! - Every failure is logged with the operation name, then re-raised
//!   unchanged.
//! - Validation failures never reach the store.

use crate::model::record::{
    AttendanceRecord, AttendanceStats, AttendanceUpdate, NewAttendance, RecordId, ValidationError,
};
use crate::store::{CollectionQuery, Document, DocumentStore, FieldFilter, StoreError};
use chrono::{SecondsFormat, Utc};
use log::error;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for attendance persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Local input rejection, raised before any network call.
    Validation(ValidationError),
    /// Single-record lookup found no document with that id.
    NotFound(RecordId),
    /// Transport/backend failure, wrapped unchanged.
    Backend(StoreError),
    /// A persisted document does not decode as an attendance record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "attendance record not found: {id}"),
            Self::Backend(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted attendance data: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Backend(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Stateless facade over the remote attendance collection.
///
/// Holds nothing but the store handle; cross-call consistency is entirely
/// the backend's concern.
pub struct AttendanceRepository<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> AttendanceRepository<S> {
    /// Creates a repository over a pre-configured store handle.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All records, newest attendance date first.
    pub async fn list_all(&self) -> RepoResult<Vec<AttendanceRecord>> {
        let query = CollectionQuery::new().order_by_desc("tanggal");
        let hits = self
            .store
            .find(&query)
            .await
            .map_err(backend_failure("list_all"))?;
        decode_records(hits)
    }

    /// One record by id. Fails with [`RepoError::NotFound`] on a miss.
    pub async fn get_by_id(&self, id: &str) -> RepoResult<AttendanceRecord> {
        let doc = self
            .store
            .get(id)
            .await
            .map_err(backend_failure("get_by_id"))?;
        match doc {
            Some(doc) => decode_record(id.to_string(), doc),
            None => {
                let err = RepoError::NotFound(id.to_string());
                error!("event=repo_error module=repo op=get_by_id error={err}");
                Err(err)
            }
        }
    }

    /// Creates one record and returns the backend-assigned id.
    ///
    /// Stamps `createdAt` with the current time; optional contact fields
    /// default to the empty string.
    pub async fn create(&self, input: &NewAttendance) -> RepoResult<RecordId> {
        input.validate()?;

        let mut doc = Document::new();
        doc.insert("tanggal".to_string(), Value::from(input.tanggal.as_str()));
        doc.insert("nis".to_string(), Value::from(input.nis.as_str()));
        doc.insert("nama".to_string(), Value::from(input.nama.as_str()));
        doc.insert("kelas".to_string(), Value::from(input.kelas.as_str()));
        doc.insert(
            "alamat".to_string(),
            Value::from(input.alamat.clone().unwrap_or_default()),
        );
        doc.insert(
            "notlpn".to_string(),
            Value::from(input.notlpn.clone().unwrap_or_default()),
        );
        doc.insert(
            "keterangan".to_string(),
            Value::from(input.keterangan.as_str()),
        );
        doc.insert("createdAt".to_string(), Value::from(now_iso()));

        self.store
            .insert(doc)
            .await
            .map_err(backend_failure("create"))
    }

    /// Rewrites the full mutable field set of one record.
    ///
    /// Stamps a fresh `updatedAt`. A missing target id surfaces as the
    /// backend's rejection, not as a local [`RepoError::NotFound`].
    pub async fn update(&self, input: &AttendanceUpdate) -> RepoResult<()> {
        input.validate()?;

        let mut fields = Document::new();
        fields.insert("tanggal".to_string(), Value::from(input.tanggal.as_str()));
        fields.insert("nis".to_string(), Value::from(input.nis.as_str()));
        fields.insert("nama".to_string(), Value::from(input.nama.as_str()));
        fields.insert("kelas".to_string(), Value::from(input.kelas.as_str()));
        fields.insert(
            "alamat".to_string(),
            Value::from(input.alamat.clone().unwrap_or_default()),
        );
        fields.insert(
            "notlpn".to_string(),
            Value::from(input.notlpn.clone().unwrap_or_default()),
        );
        fields.insert(
            "keterangan".to_string(),
            Value::from(input.keterangan.as_str()),
        );
        fields.insert("updatedAt".to_string(), Value::from(now_iso()));

        self.store
            .update(&input.id, fields)
            .await
            .map_err(backend_failure("update"))
    }

    /// Removes one record. Delete-of-missing inherits backend semantics.
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        self.store
            .delete(id)
            .await
            .map_err(backend_failure("delete"))
    }

    /// Status counters over a full collection scan.
    ///
    /// Counting happens client-side; the backend offers no aggregation to
    /// this layer.
    pub async fn statistics(&self) -> RepoResult<AttendanceStats> {
        let hits = self
            .store
            .find(&CollectionQuery::new())
            .await
            .map_err(backend_failure("statistics"))?;

        let mut stats = AttendanceStats::default();
        for (id, doc) in hits {
            let Some(keterangan) = doc.get("keterangan").and_then(Value::as_str) else {
                let err = RepoError::InvalidData(format!(
                    "document `{id}` has no string `keterangan` field"
                ));
                error!("event=repo_error module=repo op=statistics error={err}");
                return Err(err);
            };
            stats.count(keterangan);
        }
        Ok(stats)
    }

    /// Records with `tanggal` in `[start, end]` inclusive, newest first.
    pub async fn list_by_date_range(
        &self,
        start: &str,
        end: &str,
    ) -> RepoResult<Vec<AttendanceRecord>> {
        let query = CollectionQuery::new()
            .filter(FieldFilter::gte("tanggal", start))
            .filter(FieldFilter::lte("tanggal", end))
            .order_by_desc("tanggal");
        let hits = self
            .store
            .find(&query)
            .await
            .map_err(backend_failure("list_by_date_range"))?;
        decode_records(hits)
    }

    /// Records for one student, newest first.
    pub async fn list_by_nis(&self, nis: &str) -> RepoResult<Vec<AttendanceRecord>> {
        let query = CollectionQuery::new()
            .filter(FieldFilter::eq("nis", nis))
            .order_by_desc("tanggal");
        let hits = self
            .store
            .find(&query)
            .await
            .map_err(backend_failure("list_by_nis"))?;
        decode_records(hits)
    }

    /// Stamps only `lastShared` on one record. Share bookkeeping path.
    pub async fn touch_last_shared(&self, id: &str) -> RepoResult<()> {
        let mut fields = Document::new();
        fields.insert("lastShared".to_string(), Value::from(now_iso()));
        self.store
            .update(id, fields)
            .await
            .map_err(backend_failure("touch_last_shared"))
    }
}

/// Current time as an ISO-8601 string with millisecond precision.
fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn backend_failure(op: &'static str) -> impl FnOnce(StoreError) -> RepoError {
    move |err| {
        error!("event=store_error module=repo op={op} error={err}");
        RepoError::Backend(err)
    }
}

fn decode_record(id: RecordId, doc: Document) -> RepoResult<AttendanceRecord> {
    let mut record: AttendanceRecord =
        serde_json::from_value(Value::Object(doc)).map_err(|err| {
            let err = RepoError::InvalidData(format!("malformed attendance document `{id}`: {err}"));
            error!("event=repo_error module=repo op=decode error={err}");
            err
        })?;
    record.id = id;
    Ok(record)
}

fn decode_records(hits: Vec<(String, Document)>) -> RepoResult<Vec<AttendanceRecord>> {
    hits.into_iter()
        .map(|(id, doc)| decode_record(id, doc))
        .collect()
}
