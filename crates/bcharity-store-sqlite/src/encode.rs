//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Metadata, profile attributes
//! and open actions are stored as compact JSON.

use bcharity_core::{
  profile::{Profile, ProfileId, ProfileRef},
  publication::{
    MetadataAttribute, OpenActionModule, Publication, PublicationId, PublicationKind,
    PublicationMetadata, PublicationStats,
  },
};
use chrono::{DateTime, Utc};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_attributes(attrs: &[MetadataAttribute]) -> Result<String> {
  Ok(serde_json::to_string(attrs)?)
}

pub fn encode_metadata(metadata: &PublicationMetadata) -> Result<String> {
  Ok(serde_json::to_string(metadata)?)
}

pub fn encode_open_actions(modules: &[OpenActionModule]) -> Result<String> {
  Ok(serde_json::to_string(modules)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawProfile::from_row`].
pub const PROFILE_COLUMNS: &str = "profile_id, handle, owned_by, attributes, created_at";

/// Raw strings read directly from a `profiles` row.
pub struct RawProfile {
  pub profile_id: String,
  pub handle:     String,
  pub owned_by:   String,
  pub attributes: String,
  pub created_at: String,
}

impl RawProfile {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      profile_id: row.get(0)?,
      handle:     row.get(1)?,
      owned_by:   row.get(2)?,
      attributes: row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      id:         ProfileId(self.profile_id),
      handle:     self.handle,
      owned_by:   self.owned_by,
      attributes: serde_json::from_str(&self.attributes)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Column list matching [`RawPublication::from_row`]; expects `publications`
/// aliased as `p` joined with `profiles` aliased as `a`.
pub const PUBLICATION_COLUMNS: &str = "p.publication_id, p.profile_id, a.handle, \
                                       p.comment_on, p.metadata_json, p.content_uri, \
                                       p.open_actions, p.collects, p.hidden, p.created_at";

/// Raw values read from a `publications` row joined with its publisher.
pub struct RawPublication {
  pub publication_id: String,
  pub profile_id:     String,
  pub handle:         String,
  pub comment_on:     Option<String>,
  pub metadata_json:  String,
  pub content_uri:    String,
  pub open_actions:   String,
  pub collects:       i64,
  pub hidden:         bool,
  pub created_at:     String,
}

impl RawPublication {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      publication_id: row.get(0)?,
      profile_id:     row.get(1)?,
      handle:         row.get(2)?,
      comment_on:     row.get(3)?,
      metadata_json:  row.get(4)?,
      content_uri:    row.get(5)?,
      open_actions:   row.get(6)?,
      collects:       row.get(7)?,
      hidden:         row.get(8)?,
      created_at:     row.get(9)?,
    })
  }

  pub fn into_publication(self) -> Result<Publication> {
    let kind = match self.comment_on {
      Some(parent) => PublicationKind::Comment {
        comment_on: PublicationId(parent),
      },
      None => PublicationKind::Post,
    };

    Ok(Publication {
      id: PublicationId(self.publication_id),
      by: ProfileRef {
        id:     ProfileId(self.profile_id),
        handle: self.handle,
      },
      kind,
      metadata: serde_json::from_str(&self.metadata_json)?,
      content_uri: self.content_uri,
      open_actions: serde_json::from_str(&self.open_actions)?,
      stats: PublicationStats {
        collects: u64::try_from(self.collects).unwrap_or_default(),
      },
      created_at: decode_dt(&self.created_at)?,
      is_hidden: self.hidden,
    })
  }
}
