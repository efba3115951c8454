//! Profiles: the protocol-side identity that publishes posts.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::publication::MetadataAttribute;

/// Protocol profile identifier, e.g. `"0x2a"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub String);

impl ProfileId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ProfileId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.pad(&self.0) }
}

/// The publisher identity carried on every publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRef {
  pub id:     ProfileId,
  pub handle: String,
}

/// A protocol profile. Organization/volunteer details live in `attributes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
  pub id:         ProfileId,
  pub handle:     String,
  /// Wallet address that owns the profile.
  pub owned_by:   String,
  pub attributes: Vec<MetadataAttribute>,
  pub created_at: DateTime<Utc>,
}

impl Profile {
  pub fn to_ref(&self) -> ProfileRef {
    ProfileRef {
      id:     self.id.clone(),
      handle: self.handle.clone(),
    }
  }
}

/// Input to [`crate::store::PublicationStore::create_profile`].
#[derive(Debug, Clone)]
pub struct NewProfile {
  pub handle:     String,
  pub owned_by:   String,
  pub attributes: Vec<MetadataAttribute>,
}
