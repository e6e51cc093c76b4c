//! Data-access core for a school attendance record store.
//! This crate is the single source of truth for attendance CRUD invariants.

pub mod logging;
pub mod model;
pub mod repo;
pub mod share;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{
    AttendanceRecord, AttendanceStats, AttendanceUpdate, NewAttendance, RecordId, ValidationError,
};
pub use repo::attendance_repo::{AttendanceRepository, RepoError, RepoResult};
pub use share::{
    format_message, ShareError, ShareOutcome, SharePresenter, ShareSurface, ShareTarget,
};
pub use store::memory::MemoryStore;
pub use store::{CollectionQuery, Document, DocumentStore, FieldFilter, SortSpec, StoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
