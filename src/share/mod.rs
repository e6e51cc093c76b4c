//! Share-message formatting and dispatch.
//!
//! # Responsibility
//! - Render one attendance record as the fixed share-message template.
//! - Hand the message to a platform share surface (URI opener or native
//!   share sheet).
//! - Record the share action by stamping `lastShared` through the
//!   repository.
//!
//! # Invariants
//! - `format_message` is pure; identical records render byte-identical
//!   output.
//! - Supported targets form a closed enum; an unsupported target name is a
//!   distinct no-dispatch outcome, not an error.
//! - `lastShared` stamping is best-effort, not transactional with the
//!   dispatch itself.

use crate::model::record::AttendanceRecord;
use crate::repo::attendance_repo::{AttendanceRepository, RepoError};
use crate::store::DocumentStore;
use log::error;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Title handed to the native share sheet.
pub const SHARE_TITLE: &str = "Data Absensi Siswa";

/// Web fallback when no native share sheet exists.
const FALLBACK_URL_PREFIX: &str = "https://wa.me/?text=";

/// Matches `encodeURIComponent`: everything but `A-Za-z0-9 - _ . ! ~ * ' ( )`
/// is percent-encoded.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Renders the fixed share-message template for one record.
pub fn format_message(record: &AttendanceRecord) -> String {
    format!(
        "\u{1F4CA} *DATA ABSENSI SISWA* \u{1F4CA}\n\n\
         \u{1F4C5} Tanggal: {}\n\
         \u{1F194} NIS: {}\n\
         \u{1F466} Nama: {}\n\
         \u{1F3EB} Kelas: {}\n\
         \u{1F4CD} Status: {}\n\n\
         _Data ini dikirim dari Aplikasi Absensi Sekolah_",
        record.tanggal, record.nis, record.nama, record.kelas, record.keterangan
    )
}

/// Named share destinations with a dedicated URI scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareTarget {
    WhatsApp,
    Gmail,
    Telegram,
}

impl ShareTarget {
    /// Resolves a loose target name. Unknown names resolve to `None` so the
    /// caller can treat them as a no-dispatch outcome.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "whatsapp" => Some(Self::WhatsApp),
            "gmail" => Some(Self::Gmail),
            "telegram" => Some(Self::Telegram),
            _ => None,
        }
    }

    /// Destination URI embedding the percent-encoded message.
    pub fn uri(&self, message: &str) -> String {
        let encoded = utf8_percent_encode(message, URI_COMPONENT);
        match self {
            Self::WhatsApp => format!("whatsapp://send?text={encoded}"),
            Self::Gmail => format!("mailto:?body={encoded}"),
            Self::Telegram => format!("tg://msg?text={encoded}"),
        }
    }
}

/// Platform share collaborator (OS/browser surface).
pub trait ShareSurface {
    /// Opens an opaque URI with the platform handler.
    fn open_uri(&self, uri: &str) -> Result<(), ShareError>;

    /// Presents the native share sheet when the platform has one.
    ///
    /// Returns `Ok(false)` when no share sheet is available, prompting the
    /// web fallback.
    fn share_sheet(&self, title: &str, text: &str) -> Result<bool, ShareError>;
}

impl<T: ShareSurface + ?Sized> ShareSurface for &T {
    fn open_uri(&self, uri: &str) -> Result<(), ShareError> {
        (**self).open_uri(uri)
    }

    fn share_sheet(&self, title: &str, text: &str) -> Result<bool, ShareError> {
        (**self).share_sheet(title, text)
    }
}

/// How a share call was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// A target-specific URI was handed to the platform opener.
    OpenedUri,
    /// The native share sheet was presented.
    SheetPresented,
    /// No share sheet available; the default messaging web link was opened.
    OpenedFallback,
    /// The target is not supported; nothing was dispatched.
    Skipped,
}

/// Share dispatch failure.
#[derive(Debug)]
pub enum ShareError {
    /// The platform surface refused or failed the dispatch.
    Surface(String),
    /// Stamping `lastShared` through the repository failed.
    Stamp(RepoError),
}

impl Display for ShareError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Surface(message) => write!(f, "share surface failure: {message}"),
            Self::Stamp(err) => write!(f, "failed to record share action: {err}"),
        }
    }
}

impl Error for ShareError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Surface(_) => None,
            Self::Stamp(err) => Some(err),
        }
    }
}

/// Presenter binding the repository and the platform share surface.
pub struct SharePresenter<'a, S: DocumentStore, U: ShareSurface> {
    repo: &'a AttendanceRepository<S>,
    surface: U,
}

impl<'a, S: DocumentStore, U: ShareSurface> SharePresenter<'a, S, U> {
    pub fn new(repo: &'a AttendanceRepository<S>, surface: U) -> Self {
        Self { repo, surface }
    }

    /// Dispatches the record's share message.
    ///
    /// With a target, opens its URI. Without one, prefers the native share
    /// sheet and falls back to the default messaging web link. Afterwards
    /// stamps `lastShared` best-effort; a stamping failure is logged and
    /// re-raised even though the share UI may already have been shown.
    pub async fn share(
        &self,
        record: &AttendanceRecord,
        target: Option<ShareTarget>,
    ) -> Result<ShareOutcome, ShareError> {
        let message = format_message(record);

        let outcome = match target {
            Some(target) => {
                self.surface.open_uri(&target.uri(&message))?;
                ShareOutcome::OpenedUri
            }
            None => {
                if self.surface.share_sheet(SHARE_TITLE, &message)? {
                    ShareOutcome::SheetPresented
                } else {
                    let encoded = utf8_percent_encode(&message, URI_COMPONENT);
                    self.surface
                        .open_uri(&format!("{FALLBACK_URL_PREFIX}{encoded}"))?;
                    ShareOutcome::OpenedFallback
                }
            }
        };

        self.stamp(record).await?;
        Ok(outcome)
    }

    /// Like [`Self::share`], but resolves a loose target name.
    ///
    /// An unsupported name dispatches nothing and yields
    /// [`ShareOutcome::Skipped`]; the share action is still recorded,
    /// matching the original application behavior.
    pub async fn share_named(
        &self,
        record: &AttendanceRecord,
        target_name: &str,
    ) -> Result<ShareOutcome, ShareError> {
        match ShareTarget::from_name(target_name) {
            Some(target) => self.share(record, Some(target)).await,
            None => {
                self.stamp(record).await?;
                Ok(ShareOutcome::Skipped)
            }
        }
    }

    async fn stamp(&self, record: &AttendanceRecord) -> Result<(), ShareError> {
        self.repo.touch_last_shared(&record.id).await.map_err(|err| {
            error!("event=share_stamp_error module=share record={} error={err}", record.id);
            ShareError::Stamp(err)
        })
    }
}
