//! Post tags: the fixed vocabulary that classifies a publication's role.
//!
//! Tags travel as plain strings inside publication metadata. Strings outside
//! this set are preserved on the publication but carry no meaning here.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PostTag {
  // ── Organization publications ──────────────────────────────────────────
  OrgPublishCause,
  OrgPublishOpportunity,

  // ── Volunteer applications ─────────────────────────────────────────────
  ApplicationApply,
  ApplicationAccept,
  ApplicationReject,

  // ── Volunteer hour requests ────────────────────────────────────────────
  VhrRequest,
  VhrRequestReject,

  // ── Bookmarks ──────────────────────────────────────────────────────────
  BookmarkCause,
  BookmarkOpportunity,

  // ── Volunteer goals ────────────────────────────────────────────────────
  Goal,

  /// A donation comment whose collect module carries a donor-chosen amount.
  SetAmount,
}

impl PostTag {
  /// The wire string, e.g. `"ORG_PUBLISH_CAUSE"`.
  pub fn as_str(&self) -> &'static str { self.into() }

  /// Parse a wire string, rejecting anything outside the fixed set.
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownTag(s.to_owned()))
  }

  /// Whether `tags` (raw wire strings) contains this tag.
  pub fn is_in<S: AsRef<str>>(&self, tags: &[S]) -> bool {
    tags.iter().any(|t| t.as_ref() == self.as_str())
  }
}

/// Keep only the recognised tags from a list of raw wire strings, in order.
pub fn known_tags<S: AsRef<str>>(raw: &[S]) -> Vec<PostTag> {
  raw
    .iter()
    .filter_map(|t| PostTag::from_str(t.as_ref()).ok())
    .collect()
}
