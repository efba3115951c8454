//! Error types for the bcharity-metadata codec.

use thiserror::Error;

use crate::record::RecordKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("at least one tag is required")]
  NoTags,

  #[error("invalid metadata: {0}")]
  InvalidMetadata(String),

  #[error("{kind} is missing required field {field:?}")]
  MissingField {
    kind:  RecordKind,
    field: &'static str,
  },

  #[error("invalid number in {field}: {value:?}")]
  InvalidNumber { field: &'static str, value: String },

  #[error("invalid date in {field}: {value:?}")]
  InvalidDate { field: &'static str, value: String },

  #[error("unknown collect module: {0}")]
  UnknownCollectModule(String),

  #[error("invalid amount: {0:?}")]
  InvalidAmount(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
