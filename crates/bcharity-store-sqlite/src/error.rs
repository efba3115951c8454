//! Error type for `bcharity-store-sqlite`.

use bcharity_core::{profile::ProfileId, publication::PublicationId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] bcharity_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("profile not found: {0}")]
  ProfileNotFound(ProfileId),

  #[error("handle {0:?} is already taken")]
  HandleTaken(String),

  #[error("publication not found: {0}")]
  PublicationNotFound(PublicationId),

  /// Attempted to comment on a publication that does not exist.
  #[error("parent publication not found: {0}")]
  ParentNotFound(PublicationId),

  #[error("publication {0} is already hidden")]
  AlreadyHidden(PublicationId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
