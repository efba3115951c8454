//! Handlers for `/goals` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/goals` | Optional `?profile_id=` |
//! | `POST` | `/goals` | Body: [`GoalBody`]; returns 201 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use bcharity_core::{
  profile::ProfileId,
  store::{PublicationQuery, PublicationStore},
  tag::PostTag,
};
use bcharity_metadata::{GoalRecord, Record, decode_goal, get_goal_metadata, record::Goal};
use serde::Deserialize;

use crate::{error::ApiError, support::prepare};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub profile_id: Option<ProfileId>,
}

/// `GET /goals[?profile_id=<id>]`
pub async fn list<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<GoalRecord>>, ApiError> {
  let query = PublicationQuery::tagged(PostTag::Goal).by(params.profile_id);
  let posts = store.list_publications(&query).await.map_err(ApiError::store)?;
  Ok(Json(get_goal_metadata(&posts)))
}

#[derive(Debug, Deserialize)]
pub struct GoalBody {
  pub from: ProfileId,
  pub goal: Goal,
}

/// `POST /goals`: returns 201 + the decoded goal.
pub async fn create<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<GoalBody>,
) -> Result<impl IntoResponse, ApiError> {
  let new = prepare(store.as_ref(), &body.from, &Record::Goal(body.goal), None).await?;
  let post = store.create_post(new).await.map_err(ApiError::store)?;
  tracing::info!(post = %post.id, "published goal");
  Ok((StatusCode::CREATED, Json(decode_goal(&post)?)))
}
