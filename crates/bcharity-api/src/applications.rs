//! Review endpoints for applications.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/applications/{id}/accept` | Body: `{"from":"<org profile>"}`; returns 201 |
//! | `POST` | `/applications/{id}/reject` | Body: `{"from":"<org profile>"}`; returns 201 |
//!
//! A review is a marker comment under the application. Only the profile that
//! published the opportunity may review, and only while the application is
//! pending. Applications made to an opportunity that has since been modified
//! can still be reviewed.

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
  status::{ApplicationStatus, application_status},
  store::{PublicationQuery, PublicationStore},
  tag::PostTag,
};
use bcharity_metadata::{build_metadata, decode_application};
use serde::{Deserialize, Serialize};

use crate::{
  error::ApiError,
  support::{current_parent, require_publisher, require_visible},
};

#[derive(Debug, Deserialize)]
pub struct ReviewBody {
  pub from: ProfileId,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
  pub application: PublicationId,
  pub marker:      PublicationId,
  pub status:      ApplicationStatus,
}

async fn review<S: PublicationStore>(
  store: &S,
  id: &PublicationId,
  from: &ProfileId,
  decision: PostTag,
) -> Result<ReviewResponse, ApiError> {
  let application = require_visible(store, id).await?;
  if !application.has_tag(PostTag::ApplicationApply) {
    return Err(ApiError::NotFound(format!("application {id} not found")));
  }
  let decoded = decode_application(&application)?;
  let opportunity_id = decoded
    .comment_on
    .ok_or_else(|| ApiError::NotFound(format!("application {id} not found")))?;
  let opportunity =
    current_parent(store, &opportunity_id, PostTag::OrgPublishOpportunity).await?;
  require_publisher(&opportunity, from)?;

  let markers = store
    .list_publications(&PublicationQuery::comments_on(id.clone()))
    .await
    .map_err(ApiError::store)?;
  let current = application_status(id, &markers);
  if current != ApplicationStatus::Pending {
    return Err(ApiError::Conflict(format!("application {id} is already {current}")));
  }

  let new = build_metadata(from, &[decision], &[])?;
  let marker = store.create_comment(id, new).await.map_err(ApiError::store)?;

  let status = match decision {
    PostTag::ApplicationAccept => ApplicationStatus::Accepted,
    _ => ApplicationStatus::Rejected,
  };
  tracing::info!(application = %id, marker = %marker.id, %status, "reviewed application");
  Ok(ReviewResponse {
    application: id.clone(),
    marker: marker.id,
    status,
  })
}

/// `POST /applications/{id}/accept`
pub async fn accept<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PublicationId>,
  Json(body): Json<ReviewBody>,
) -> Result<impl IntoResponse, ApiError> {
  let response = review(store.as_ref(), &id, &body.from, PostTag::ApplicationAccept).await?;
  Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /applications/{id}/reject`
pub async fn reject<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PublicationId>,
  Json(body): Json<ReviewBody>,
) -> Result<impl IntoResponse, ApiError> {
  let response = review(store.as_ref(), &id, &body.from, PostTag::ApplicationReject).await?;
  Ok((StatusCode::CREATED, Json(response)))
}
