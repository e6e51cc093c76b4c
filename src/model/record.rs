//! Attendance record model and write-input validation.
//!
//! # Responsibility
//! - Define the canonical attendance document shape.
//! - Provide create/update input structures with boundary validation.
//! - Own the status-counting rules used by statistics reporting.
//!
//! # Invariants
//! - Wire field names are exact and case-sensitive (`createdAt`, not
//!   `created_at`).
//! - `id` lives next to the document, never inside it.
//! - Timestamps are absent until the matching lifecycle event stamps them.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Backend-assigned document identifier. Opaque, unique, never reused.
pub type RecordId = String;

/// One attendance entry as persisted in the `absensi_siswa` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Store-assigned id, carried alongside the document body.
    #[serde(skip)]
    pub id: RecordId,
    /// Attendance date, `YYYY-MM-DD`.
    pub tanggal: String,
    /// Student identification number.
    pub nis: String,
    /// Student name.
    pub nama: String,
    /// Class/section label.
    pub kelas: String,
    /// Optional address, empty string when not provided.
    #[serde(default)]
    pub alamat: String,
    /// Optional phone number, empty string when not provided.
    #[serde(default)]
    pub notlpn: String,
    /// Attendance status label (`hadir`, `sakit`, `izin`, `tidak hadir`).
    /// Free text at write time, not an enum.
    pub keterangan: String,
    /// ISO-8601 stamp set once at creation.
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// ISO-8601 stamp overwritten on every update.
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// ISO-8601 stamp of the most recent share action.
    #[serde(
        rename = "lastShared",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_shared: Option<String>,
}

/// Input for creating one attendance record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAttendance {
    pub tanggal: String,
    pub nis: String,
    pub nama: String,
    pub kelas: String,
    /// Defaults to `""` when `None`.
    pub alamat: Option<String>,
    /// Defaults to `""` when `None`.
    pub notlpn: Option<String>,
    pub keterangan: String,
}

impl NewAttendance {
    /// Rejects the input when any mandatory field is empty.
    ///
    /// Runs before any backend call, so a failed validation performs no
    /// network traffic.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("tanggal", &self.tanggal),
            ("nis", &self.nis),
            ("nama", &self.nama),
            ("kelas", &self.kelas),
            ("keterangan", &self.keterangan),
        ] {
            if value.is_empty() {
                return Err(ValidationError::MissingField(name));
            }
        }
        Ok(())
    }
}

/// Input for rewriting one attendance record.
///
/// All listed fields are rewritten unconditionally. This is a full-field
/// overwrite of the mutable set, not a sparse patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceUpdate {
    /// Target record id. Its absence is the only local validation failure.
    pub id: RecordId,
    pub tanggal: String,
    pub nis: String,
    pub nama: String,
    pub kelas: String,
    /// Defaults to `""` when `None`.
    pub alamat: Option<String>,
    /// Defaults to `""` when `None`.
    pub notlpn: Option<String>,
    pub keterangan: String,
}

impl AttendanceUpdate {
    /// Rejects the input when the target id is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingId);
        }
        Ok(())
    }
}

/// Status counters for the whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceStats {
    pub hadir: u64,
    pub sakit: u64,
    pub izin: u64,
    pub tidak_hadir: u64,
    /// Incremented for every record, matched status or not.
    pub total: u64,
}

impl AttendanceStats {
    /// Counts one record by its raw `keterangan` value.
    ///
    /// Normalization is lowercase plus first-space-to-underscore only; a
    /// status with more than one space will not match any counter. Existing
    /// behavior, kept as-is.
    pub fn count(&mut self, keterangan: &str) {
        match normalize_status(keterangan).as_str() {
            "hadir" => self.hadir += 1,
            "sakit" => self.sakit += 1,
            "izin" => self.izin += 1,
            "tidak_hadir" => self.tidak_hadir += 1,
            _ => {}
        }
        self.total += 1;
    }
}

/// Normalizes a status label for counter lookup.
pub fn normalize_status(keterangan: &str) -> String {
    keterangan.to_lowercase().replacen(' ', "_", 1)
}

/// Local input validation failure. Raised before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// A mandatory create field is empty.
    MissingField(&'static str),
    /// Update input carries no record id.
    MissingId,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "required field `{field}` is missing"),
            Self::MissingId => write!(f, "record id is required for update"),
        }
    }
}

impl Error for ValidationError {}
