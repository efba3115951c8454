//! Error types for `bcharity-core`.

use thiserror::Error;

use crate::profile::ProfileId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown post tag: {0:?}")]
  UnknownTag(String),

  #[error("unknown currency: {0:?}")]
  UnknownCurrency(String),

  #[error("no profile is selected; sign in first")]
  NotSignedIn,

  #[error("profile {0} is not among the signed-in owner's profiles")]
  ProfileNotLoaded(ProfileId),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
