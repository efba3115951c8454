//! Publication types: posts and comments as the external protocol reports
//! them.
//!
//! A publication is immutable once created. The only state the protocol
//! lets its author change afterwards is visibility (`is_hidden`), and the
//! only state anyone else changes is the collect counter.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{Result, profile::{ProfileId, ProfileRef}, tag::PostTag};

/// Metadata schema version written on every publication.
pub const METADATA_VERSION: &str = "2.0.0";
/// Application id stamped on every publication.
pub const APP_ID: &str = "BCharity";
pub const DEFAULT_LOCALE: &str = "en";

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Protocol publication identifier, `<profile id>-<hex counter>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicationId(pub String);

impl PublicationId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  /// Build the id of the `seq`-th publication of `profile` (1-based).
  pub fn for_profile(profile: &ProfileId, seq: u64) -> Self {
    Self(format!("{profile}-0x{seq:02x}"))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for PublicationId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.pad(&self.0) }
}

// ─── Metadata ────────────────────────────────────────────────────────────────

/// Display type of a metadata attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeType {
  #[default]
  String,
  Number,
  Boolean,
  Date,
  Json,
}

/// One key/value field carried in publication or profile metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataAttribute {
  #[serde(default)]
  pub display_type: AttributeType,
  pub key:          String,
  pub value:        String,
}

impl MetadataAttribute {
  pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      display_type: AttributeType::String,
      key:          key.into(),
      value:        value.into(),
    }
  }
}

/// The metadata document attached to a publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationMetadata {
  pub version:     String,
  pub metadata_id: Uuid,
  /// Free-text body; by convention `#<TAG> ` for every tag.
  pub content:     String,
  pub name:        String,
  pub tags:        Vec<String>,
  pub attributes:  Vec<MetadataAttribute>,
  pub locale:      String,
  pub app_id:      String,
}

impl PublicationMetadata {
  /// The first attribute with `key`, if any.
  pub fn attribute(&self, key: &str) -> Option<&str> {
    self
      .attributes
      .iter()
      .find(|a| a.key == key)
      .map(|a| a.value.as_str())
  }

  pub fn has_tag(&self, tag: PostTag) -> bool { tag.is_in(&self.tags) }

  /// Content-addressed URI for the metadata document: the SHA-256 of its
  /// JSON serialisation, hex-encoded.
  pub fn content_uri(&self) -> Result<String> {
    let bytes = serde_json::to_vec(self)?;
    let hash = Sha256::digest(&bytes);
    Ok(format!("sha256://{}", hex::encode(hash)))
  }
}

// ─── Open actions ────────────────────────────────────────────────────────────

/// A token amount as the protocol reports it. `value` is a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
  pub currency: String,
  pub value:    String,
}

/// Settings of an action module attached to a publication.
///
/// `typename` is the protocol's type name for the module and is kept
/// verbatim; deciding whether it is a collect module is left to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenActionModule {
  pub typename: String,
  pub amount:   Option<Amount>,
}

impl OpenActionModule {
  /// The plain paid-collect module used for causes and donations.
  pub fn simple_collect(amount: Amount) -> Self {
    Self {
      typename: "SimpleCollectOpenActionSettings".to_owned(),
      amount:   Some(amount),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PublicationStats {
  pub collects: u64,
}

// ─── Publication ─────────────────────────────────────────────────────────────

/// Whether a publication stands on its own or hangs under another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PublicationKind {
  Post,
  Comment { comment_on: PublicationId },
}

/// A post or comment fetched from the protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
  pub id:           PublicationId,
  pub by:           ProfileRef,
  pub kind:         PublicationKind,
  pub metadata:     PublicationMetadata,
  pub content_uri:  String,
  pub open_actions: Vec<OpenActionModule>,
  pub stats:        PublicationStats,
  pub created_at:   DateTime<Utc>,
  pub is_hidden:    bool,
}

impl Publication {
  pub fn is_post(&self) -> bool { matches!(self.kind, PublicationKind::Post) }

  pub fn is_comment(&self) -> bool { !self.is_post() }

  /// The parent publication for comments.
  pub fn comment_on(&self) -> Option<&PublicationId> {
    match &self.kind {
      PublicationKind::Post => None,
      PublicationKind::Comment { comment_on } => Some(comment_on),
    }
  }

  pub fn has_tag(&self, tag: PostTag) -> bool { self.metadata.has_tag(tag) }
}

/// Input to the store's create operations. `id`, `created_at`, `content_uri`
/// and stats are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewPublication {
  pub profile_id:  ProfileId,
  pub metadata:    PublicationMetadata,
  pub open_action: Option<OpenActionModule>,
}

impl NewPublication {
  pub fn with_open_action(mut self, module: OpenActionModule) -> Self {
    self.open_action = Some(module);
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn metadata(tags: &[&str]) -> PublicationMetadata {
    PublicationMetadata {
      version:     METADATA_VERSION.to_owned(),
      metadata_id: Uuid::nil(),
      content:     String::new(),
      name:        String::new(),
      tags:        tags.iter().map(|t| t.to_string()).collect(),
      attributes:  vec![
        MetadataAttribute::string("name", "first"),
        MetadataAttribute::string("name", "second"),
      ],
      locale:      DEFAULT_LOCALE.to_owned(),
      app_id:      APP_ID.to_owned(),
    }
  }

  #[test]
  fn publication_id_for_profile() {
    let id = PublicationId::for_profile(&ProfileId::new("0x01"), 10);
    assert_eq!(id.as_str(), "0x01-0x0a");
  }

  #[test]
  fn first_attribute_wins() {
    let m = metadata(&[]);
    assert_eq!(m.attribute("name"), Some("first"));
    assert_eq!(m.attribute("missing"), None);
  }

  #[test]
  fn content_uri_is_stable_and_content_addressed() {
    let a = metadata(&["GOAL"]);
    let b = metadata(&["GOAL"]);
    let c = metadata(&["SET_AMOUNT"]);
    let uri = a.content_uri().unwrap();
    assert!(uri.starts_with("sha256://"));
    assert_eq!(uri.len(), "sha256://".len() + 64);
    assert_eq!(uri, b.content_uri().unwrap());
    assert_ne!(uri, c.content_uri().unwrap());
  }

  #[test]
  fn has_tag_checks_membership() {
    let m = metadata(&["ORG_PUBLISH_CAUSE", "custom"]);
    assert!(m.has_tag(PostTag::OrgPublishCause));
    assert!(!m.has_tag(PostTag::Goal));
  }

  #[test]
  fn kind_serialises_as_tagged_union() {
    let kind = PublicationKind::Comment {
      comment_on: PublicationId::new("0x01-0x01"),
    };
    let json = serde_json::to_value(&kind).unwrap();
    assert_eq!(json["type"], "comment");
    assert_eq!(json["comment_on"], "0x01-0x01");
  }
}
