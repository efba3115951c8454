//! Handlers for `/opportunities` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/opportunities` | Optional `?profile_id=`, `?sort=end_date` |
//! | `POST` | `/opportunities` | Body: [`OpportunityBody`]; returns 201, 409 if the record id is taken |
//! | `PUT`  | `/opportunities/{id}` | Body: [`OpportunityBody`]; publishes a replacement and hides the old post |
//! | `GET`  | `/opportunities/{id}/applications` | Applications to every version, with their review status |
//! | `POST` | `/opportunities/{id}/applications` | Body: [`ApplicationBody`]; returns 201 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use bcharity_core::{
  profile::ProfileId,
  publication::{Publication, PublicationId},
  status::{ApplicationStatus, application_status},
  store::{PublicationQuery, PublicationStore},
  tag::PostTag,
};
use bcharity_metadata::{
  ApplicationRecord, OpportunityRecord, Record, decode_application, decode_opportunity,
  get_application_metadata, get_opportunity_metadata,
  record::{Application, Opportunity},
  sort_by_end_date,
};
use serde::{Deserialize, Serialize};

use crate::{
  error::ApiError,
  support::{
    comments_across, prepare, replace_post, require_publisher, require_unused_record_id,
    require_visible, versions_of_post,
  },
};

/// The visible opportunity post `id`, or 404.
pub(crate) async fn require_opportunity<S: PublicationStore>(
  store: &S,
  id: &PublicationId,
) -> Result<(Publication, OpportunityRecord), ApiError> {
  let post = require_visible(store, id).await?;
  if !post.has_tag(PostTag::OrgPublishOpportunity) {
    return Err(ApiError::NotFound(format!("opportunity {id} not found")));
  }
  let opportunity = decode_opportunity(&post)?;
  Ok((post, opportunity))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
  EndDate,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub profile_id: Option<ProfileId>,
  pub sort:       Option<SortKey>,
}

/// `GET /opportunities[?profile_id=<id>][&sort=end_date]`
pub async fn list<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<OpportunityRecord>>, ApiError> {
  let query = PublicationQuery::tagged(PostTag::OrgPublishOpportunity).by(params.profile_id);
  let posts = store.list_publications(&query).await.map_err(ApiError::store)?;

  let mut opportunities = get_opportunity_metadata(&posts);
  if params.sort == Some(SortKey::EndDate) {
    sort_by_end_date(&mut opportunities);
  }
  Ok(Json(opportunities))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /opportunities` and `PUT /opportunities/{id}`.
#[derive(Debug, Deserialize)]
pub struct OpportunityBody {
  pub from:        ProfileId,
  pub opportunity: Opportunity,
}

/// `POST /opportunities`: returns 201 + the decoded opportunity.
pub async fn create<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<OpportunityBody>,
) -> Result<impl IntoResponse, ApiError> {
  let record_id = body.opportunity.id.clone();
  let record = Record::Opportunity(body.opportunity);
  let new = prepare(store.as_ref(), &body.from, &record, None).await?;
  require_unused_record_id(
    store.as_ref(),
    &body.from,
    PostTag::OrgPublishOpportunity,
    &record_id,
  )
  .await?;
  let post = store.create_post(new).await.map_err(ApiError::store)?;
  tracing::info!(post = %post.id, "published opportunity");
  Ok((StatusCode::CREATED, Json(decode_opportunity(&post)?)))
}

// ─── Modify ───────────────────────────────────────────────────────────────────

/// `PUT /opportunities/{id}`: replaces the opportunity. The record id carries
/// over from the old version.
pub async fn modify<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PublicationId>,
  Json(body): Json<OpportunityBody>,
) -> Result<Json<OpportunityRecord>, ApiError> {
  let (old, current) = require_opportunity(store.as_ref(), &id).await?;
  require_publisher(&old, &body.from)?;

  let record = Record::Opportunity(Opportunity {
    id: current.record.id,
    ..body.opportunity
  });
  let new = prepare(store.as_ref(), &body.from, &record, None).await?;
  let post = replace_post(store.as_ref(), &old, new).await?;
  Ok(Json(decode_opportunity(&post)?))
}

// ─── Applications ─────────────────────────────────────────────────────────────

/// An application with its review status.
#[derive(Debug, Serialize)]
pub struct ApplicationView {
  #[serde(flatten)]
  pub application: ApplicationRecord,
  pub status:      ApplicationStatus,
}

/// `GET /opportunities/{id}/applications`
pub async fn list_applications<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PublicationId>,
) -> Result<Json<Vec<ApplicationView>>, ApiError> {
  let (post, _) = require_opportunity(store.as_ref(), &id).await?;
  let versions =
    versions_of_post(store.as_ref(), &post, PostTag::OrgPublishOpportunity).await?;
  let comments = comments_across(store.as_ref(), &versions, PostTag::ApplicationApply).await?;

  let mut views = Vec::new();
  for application in get_application_metadata(&comments) {
    let markers = store
      .list_publications(&PublicationQuery::comments_on(application.post_id.clone()))
      .await
      .map_err(ApiError::store)?;
    let status = application_status(&application.post_id, &markers);
    views.push(ApplicationView {
      application,
      status,
    });
  }
  Ok(Json(views))
}

#[derive(Debug, Deserialize)]
pub struct ApplicationBody {
  pub from:        ProfileId,
  #[serde(default)]
  pub application: Application,
}

/// `POST /opportunities/{id}/applications`: returns 201 + the decoded
/// application.
pub async fn apply<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PublicationId>,
  Json(body): Json<ApplicationBody>,
) -> Result<impl IntoResponse, ApiError> {
  let (post, _) = require_opportunity(store.as_ref(), &id).await?;

  let record = Record::Application(body.application);
  let new = prepare(store.as_ref(), &body.from, &record, None).await?;
  let comment = store
    .create_comment(&post.id, new)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(opportunity = %post.id, application = %comment.id, "published application");
  Ok((StatusCode::CREATED, Json(decode_application(&comment)?)))
}
