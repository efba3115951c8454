//! Lookups and publishing steps shared by the resource handlers.

use bcharity_core::{
  profile::{Profile, ProfileId},
  publication::{NewPublication, OpenActionModule, Publication, PublicationId},
  store::{PublicationQuery, PublicationStore},
  tag::PostTag,
};
use bcharity_metadata::{Record, encode, record::keys};

use crate::error::ApiError;

/// The profile `id`, or 404.
pub(crate) async fn require_profile<S: PublicationStore>(
  store: &S,
  id: &ProfileId,
) -> Result<Profile, ApiError> {
  store
    .get_profile(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("profile {id} not found")))
}

/// The visible publication `id`, or 404. Hidden publications count as
/// deleted.
pub(crate) async fn require_visible<S: PublicationStore>(
  store: &S,
  id: &PublicationId,
) -> Result<Publication, ApiError> {
  store
    .get_publication(id)
    .await
    .map_err(ApiError::store)?
    .filter(|p| !p.is_hidden)
    .ok_or_else(|| ApiError::NotFound(format!("publication {id} not found")))
}

/// Validate and encode `record` for `from`, attaching `open_action` if any.
pub(crate) async fn prepare<S: PublicationStore>(
  store: &S,
  from: &ProfileId,
  record: &Record,
  open_action: Option<OpenActionModule>,
) -> Result<NewPublication, ApiError> {
  record.validate()?;
  require_profile(store, from).await?;
  let mut new = encode(from, record)?;
  new.open_action = open_action;
  Ok(new)
}

/// Hide `id`. Losing a race against another hide of the same publication is
/// a 409, like hiding it twice in sequence.
pub(crate) async fn hide<S: PublicationStore>(store: &S, id: &PublicationId) -> Result<(), ApiError> {
  let Err(e) = store.hide_publication(id).await else {
    return Ok(());
  };
  match store.get_publication(id).await {
    Ok(Some(p)) if p.is_hidden => {
      Err(ApiError::Conflict(format!("publication {id} is already hidden")))
    }
    _ => Err(ApiError::store(e)),
  }
}

/// Publish `replacement` and hide `old`.
///
/// If hiding `old` fails the replacement is hidden again so exactly one
/// version stays visible, and the original error is returned.
pub(crate) async fn replace_post<S: PublicationStore>(
  store: &S,
  old: &Publication,
  replacement: NewPublication,
) -> Result<Publication, ApiError> {
  let new = store.create_post(replacement).await.map_err(ApiError::store)?;

  if let Err(e) = hide(store, &old.id).await {
    tracing::warn!(old = %old.id, new = %new.id, error = %e, "hiding old version failed, withdrawing replacement");
    if let Err(undo) = store.hide_publication(&new.id).await {
      tracing::error!(old = %old.id, new = %new.id, error = %undo, "withdrawing replacement failed, both versions are visible");
    }
    return Err(e);
  }

  tracing::info!(old = %old.id, new = %new.id, "replaced post");
  Ok(new)
}

/// Only the publisher of `publication` may act on it as its owner.
pub(crate) fn require_publisher(publication: &Publication, from: &ProfileId) -> Result<(), ApiError> {
  if &publication.by.id != from {
    return Err(ApiError::BadRequest(format!(
      "profile {from} did not publish {}",
      publication.id
    )));
  }
  Ok(())
}

// ─── Versions ────────────────────────────────────────────────────────────────

/// Every post by `publisher` tagged `tag` whose record id is `record_id`,
/// hidden ones included, oldest first.
///
/// Modifying a record publishes a new post under the same record id, so
/// this is the record's history. Comments made under an earlier version stay
/// there.
pub(crate) async fn versions_of<S: PublicationStore>(
  store: &S,
  publisher: &ProfileId,
  tag: PostTag,
  record_id: &str,
) -> Result<Vec<Publication>, ApiError> {
  let query = PublicationQuery {
    include_hidden: true,
    ..PublicationQuery::tagged(tag).by(Some(publisher.clone()))
  };
  let posts = store.list_publications(&query).await.map_err(ApiError::store)?;
  Ok(
    posts
      .into_iter()
      .filter(|p| p.is_post() && p.metadata.attribute(keys::ID) == Some(record_id))
      .collect(),
  )
}

/// The versions of the record `post` belongs to.
pub(crate) async fn versions_of_post<S: PublicationStore>(
  store: &S,
  post: &Publication,
  tag: PostTag,
) -> Result<Vec<Publication>, ApiError> {
  match post.metadata.attribute(keys::ID) {
    Some(record_id) => versions_of(store, &post.by.id, tag, record_id).await,
    None => Ok(vec![post.clone()]),
  }
}

/// The visible version of the record `post` belongs to, or 404 when the
/// record has been deleted.
pub(crate) async fn current_version<S: PublicationStore>(
  store: &S,
  post: &Publication,
  tag: PostTag,
) -> Result<Publication, ApiError> {
  if !post.is_hidden {
    return Ok(post.clone());
  }
  versions_of_post(store, post, tag)
    .await?
    .into_iter()
    .rev()
    .find(|p| !p.is_hidden)
    .ok_or_else(|| ApiError::NotFound(format!("publication {} not found", post.id)))
}

/// The parent a comment record was made under, resolved to the parent
/// record's current version. 404 once the parent record has been deleted.
pub(crate) async fn current_parent<S: PublicationStore>(
  store: &S,
  parent: &PublicationId,
  tag: PostTag,
) -> Result<Publication, ApiError> {
  let post = store
    .get_publication(parent)
    .await
    .map_err(ApiError::store)?
    .filter(|p| p.has_tag(tag))
    .ok_or_else(|| ApiError::NotFound(format!("publication {parent} not found")))?;
  current_version(store, &post, tag).await
}

/// A record id names one record per publisher; reusing it would merge two
/// records' histories.
pub(crate) async fn require_unused_record_id<S: PublicationStore>(
  store: &S,
  publisher: &ProfileId,
  tag: PostTag,
  record_id: &str,
) -> Result<(), ApiError> {
  if !versions_of(store, publisher, tag, record_id).await?.is_empty() {
    return Err(ApiError::Conflict(format!(
      "profile {publisher} already published record {record_id}"
    )));
  }
  Ok(())
}

/// Comments tagged `tag` under any of `versions`, in version order.
pub(crate) async fn comments_across<S: PublicationStore>(
  store: &S,
  versions: &[Publication],
  tag: PostTag,
) -> Result<Vec<Publication>, ApiError> {
  let mut comments = Vec::new();
  for version in versions {
    let query = PublicationQuery {
      tags: vec![tag],
      ..PublicationQuery::comments_on(version.id.clone())
    };
    comments.extend(store.list_publications(&query).await.map_err(ApiError::store)?);
  }
  Ok(comments)
}
