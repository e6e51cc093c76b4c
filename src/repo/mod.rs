//! Repository layer over the remote document collection.
//!
//! # Responsibility
//! - Provide the attendance CRUD/query/reporting contract.
//! - Keep document field-name details inside the persistence boundary.
//!
//! # Invariants
//! - Write inputs are validated before any backend round trip.
//! - Repository APIs return semantic errors (`NotFound`, `Validation`) in
//!   addition to pass-through backend errors.

pub mod attendance_repo;
