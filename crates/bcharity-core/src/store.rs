//! The `PublicationStore` trait and supporting query types.
//!
//! The trait stands in for the external social-protocol client. It is
//! implemented by storage backends (e.g. `bcharity-store-sqlite`); higher
//! layers (`bcharity-api`, `bcharity-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  profile::{NewProfile, Profile, ProfileId},
  publication::{NewPublication, Publication, PublicationId, PublicationStats},
  tag::PostTag,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`PublicationStore::list_publications`].
#[derive(Debug, Clone, Default)]
pub struct PublicationQuery {
  /// Match publications carrying any of these tags. Empty matches all.
  pub tags:           Vec<PostTag>,
  /// Restrict to publications by this profile.
  pub profile_id:     Option<ProfileId>,
  /// Restrict to comments directly under this publication.
  pub comment_on:     Option<PublicationId>,
  /// Include hidden publications. Default `false`.
  pub include_hidden: bool,
  pub limit:          Option<usize>,
  pub offset:         Option<usize>,
}

impl PublicationQuery {
  pub fn tagged(tag: PostTag) -> Self {
    Self {
      tags: vec![tag],
      ..Self::default()
    }
  }

  pub fn comments_on(parent: PublicationId) -> Self {
    Self {
      comment_on: Some(parent),
      ..Self::default()
    }
  }

  pub fn by(mut self, profile_id: Option<ProfileId>) -> Self {
    self.profile_id = profile_id;
    self
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the protocol's profile and publication API.
///
/// Publications are append-only: the only mutations are hiding a
/// publication and recording a collect on it.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PublicationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Create a profile. Handles are unique.
  fn create_profile(
    &self,
    input: NewProfile,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  /// Retrieve a profile by id. Returns `None` if not found.
  fn get_profile<'a>(
    &'a self,
    id: &'a ProfileId,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + 'a;

  /// List profiles, optionally only those owned by `owned_by`.
  fn list_profiles<'a>(
    &'a self,
    owned_by: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + 'a;

  // ── Publications: append-only writes ─────────────────────────────────

  /// Publish a top-level post.
  fn create_post(
    &self,
    input: NewPublication,
  ) -> impl Future<Output = Result<Publication, Self::Error>> + Send + '_;

  /// Publish a comment under `parent`. Fails if `parent` does not exist.
  fn create_comment<'a>(
    &'a self,
    parent: &'a PublicationId,
    input: NewPublication,
  ) -> impl Future<Output = Result<Publication, Self::Error>> + Send + 'a;

  /// Hide a publication. Fails if it is missing or already hidden.
  fn hide_publication<'a>(
    &'a self,
    id: &'a PublicationId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Record one collect on a publication and return the updated stats.
  fn collect<'a>(
    &'a self,
    id: &'a PublicationId,
  ) -> impl Future<Output = Result<PublicationStats, Self::Error>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Retrieve a publication by id, hidden or not. Returns `None` if not
  /// found.
  fn get_publication<'a>(
    &'a self,
    id: &'a PublicationId,
  ) -> impl Future<Output = Result<Option<Publication>, Self::Error>> + Send + 'a;

  /// List publications matching `query`, oldest first.
  fn list_publications<'a>(
    &'a self,
    query: &'a PublicationQuery,
  ) -> impl Future<Output = Result<Vec<Publication>, Self::Error>> + Send + 'a;
}
