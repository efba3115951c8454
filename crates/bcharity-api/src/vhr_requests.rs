//! Volunteer-hour requests.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/opportunities/{id}/vhr-requests` | Requests on every version, with their status |
//! | `POST` | `/opportunities/{id}/vhr-requests` | Body: [`VhrRequestBody`]; returns 201 |
//! | `POST` | `/vhr-requests/{id}/reject` | Body: `{"from":"<org profile>"}`; returns 201 |
//!
//! A volunteer logs hours as a comment under the opportunity. A request
//! stands until the opportunity's publisher rejects it with a marker comment.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use bcharity_core::{
  profile::ProfileId,
  publication::PublicationId,
  status::{VhrRequestStatus, vhr_request_status},
  store::{PublicationQuery, PublicationStore},
  tag::PostTag,
};
use bcharity_metadata::{
  Record, VhrRequestRecord, build_metadata, decode_vhr_request, get_vhr_request_metadata,
  record::VhrRequest,
};
use serde::{Deserialize, Serialize};

use crate::{
  error::ApiError,
  opportunities::require_opportunity,
  support::{
    comments_across, current_parent, prepare, require_publisher, require_visible,
    versions_of_post,
  },
};

/// A request with its review status.
#[derive(Debug, Serialize)]
pub struct VhrRequestView {
  #[serde(flatten)]
  pub request: VhrRequestRecord,
  pub status:  VhrRequestStatus,
}

/// `GET /opportunities/{id}/vhr-requests`
pub async fn list<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PublicationId>,
) -> Result<Json<Vec<VhrRequestView>>, ApiError> {
  let (post, _) = require_opportunity(store.as_ref(), &id).await?;
  let versions =
    versions_of_post(store.as_ref(), &post, PostTag::OrgPublishOpportunity).await?;
  let comments = comments_across(store.as_ref(), &versions, PostTag::VhrRequest).await?;

  let mut views = Vec::new();
  for request in get_vhr_request_metadata(&comments) {
    let markers = store
      .list_publications(&PublicationQuery::comments_on(request.post_id.clone()))
      .await
      .map_err(ApiError::store)?;
    let status = vhr_request_status(&request.post_id, &markers);
    views.push(VhrRequestView { request, status });
  }
  Ok(Json(views))
}

#[derive(Debug, Deserialize)]
pub struct VhrRequestBody {
  pub from:    ProfileId,
  pub request: VhrRequest,
}

/// `POST /opportunities/{id}/vhr-requests`: returns 201 + the decoded
/// request.
pub async fn create<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PublicationId>,
  Json(body): Json<VhrRequestBody>,
) -> Result<impl IntoResponse, ApiError> {
  let (post, _) = require_opportunity(store.as_ref(), &id).await?;

  let record = Record::VhrRequest(body.request);
  let new = prepare(store.as_ref(), &body.from, &record, None).await?;
  let comment = store
    .create_comment(&post.id, new)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(opportunity = %post.id, request = %comment.id, "logged volunteer hours");
  Ok((StatusCode::CREATED, Json(decode_vhr_request(&comment)?)))
}

#[derive(Debug, Deserialize)]
pub struct RejectBody {
  pub from: ProfileId,
}

#[derive(Debug, Serialize)]
pub struct RejectResponse {
  pub request: PublicationId,
  pub marker:  PublicationId,
  pub status:  VhrRequestStatus,
}

/// `POST /vhr-requests/{id}/reject`
pub async fn reject<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PublicationId>,
  Json(body): Json<RejectBody>,
) -> Result<impl IntoResponse, ApiError> {
  let request = require_visible(store.as_ref(), &id).await?;
  if !request.has_tag(PostTag::VhrRequest) {
    return Err(ApiError::NotFound(format!("hour request {id} not found")));
  }
  let decoded = decode_vhr_request(&request)?;
  let opportunity_id = decoded
    .comment_on
    .ok_or_else(|| ApiError::NotFound(format!("hour request {id} not found")))?;
  let opportunity =
    current_parent(store.as_ref(), &opportunity_id, PostTag::OrgPublishOpportunity).await?;
  require_publisher(&opportunity, &body.from)?;

  let markers = store
    .list_publications(&PublicationQuery::comments_on(id.clone()))
    .await
    .map_err(ApiError::store)?;
  if vhr_request_status(&id, &markers) == VhrRequestStatus::Rejected {
    return Err(ApiError::Conflict(format!("hour request {id} is already rejected")));
  }

  let new = build_metadata(&body.from, &[PostTag::VhrRequestReject], &[])?;
  let marker = store.create_comment(&id, new).await.map_err(ApiError::store)?;
  tracing::info!(request = %id, marker = %marker.id, "rejected hour request");
  Ok((
    StatusCode::CREATED,
    Json(RejectResponse {
      request: id,
      marker:  marker.id,
      status:  VhrRequestStatus::Rejected,
    }),
  ))
}
