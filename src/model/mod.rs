//! Domain model for attendance records.
//!
//! # Responsibility
//! - Define the persisted record shape and its exact wire field names.
//! - Validate write inputs at the boundary, before any backend call.
//!
//! # Invariants
//! - `tanggal`, `nis`, `nama`, `kelas`, `keterangan` are mandatory on create.
//! - Optional contact fields default to the empty string, never to null.

pub mod record;
