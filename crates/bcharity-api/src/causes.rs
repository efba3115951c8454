//! Handlers for `/causes` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/causes` | Optional `?profile_id=` |
//! | `POST` | `/causes` | Body: [`CauseBody`]; returns 201, 409 if the record id is taken |
//! | `GET`  | `/causes/{id}` | [`CauseSummary`] with total donated across every version |
//! | `PUT`  | `/causes/{id}` | Body: [`CauseBody`]; publishes a replacement and hides the old post |
//! | `POST` | `/causes/{id}/donations` | Body: [`DonationBody`]; returns 201 |

use std::{str::FromStr, sync::Arc};

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use bcharity_core::{
  currency::currency_symbol,
  profile::ProfileId,
  publication::{Amount, OpenActionModule, Publication, PublicationId},
  store::{PublicationQuery, PublicationStore},
  tag::PostTag,
};
use bcharity_metadata::{
  CauseRecord, CauseSummary, Record, build_metadata, decode_cause, get_cause_metadata,
  record::{Cause, keys},
  summarize_cause_versions,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
  error::ApiError,
  support::{
    comments_across, prepare, replace_post, require_profile, require_publisher,
    require_unused_record_id, require_visible, versions_of_post,
  },
};

/// The collect module donors pay through: one collect costs `contribution`
/// in the cause's currency.
fn contribution_module(cause: &Cause) -> Option<OpenActionModule> {
  if cause.contribution.trim().is_empty() {
    return None;
  }
  Some(OpenActionModule::simple_collect(Amount {
    currency: cause.currency_symbol().to_owned(),
    value:    cause.contribution.trim().to_owned(),
  }))
}

/// The visible cause post `id`, or 404.
async fn require_cause<S: PublicationStore>(
  store: &S,
  id: &PublicationId,
) -> Result<(Publication, CauseRecord), ApiError> {
  let post = require_visible(store, id).await?;
  if !post.has_tag(PostTag::OrgPublishCause) {
    return Err(ApiError::NotFound(format!("cause {id} not found")));
  }
  let cause = decode_cause(&post)?;
  Ok((post, cause))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub profile_id: Option<ProfileId>,
}

/// `GET /causes[?profile_id=<id>]`
pub async fn list<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<CauseRecord>>, ApiError> {
  let query = PublicationQuery::tagged(PostTag::OrgPublishCause).by(params.profile_id);
  let posts = store.list_publications(&query).await.map_err(ApiError::store)?;
  Ok(Json(get_cause_metadata(&posts)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /causes` and `PUT /causes/{id}`.
#[derive(Debug, Deserialize)]
pub struct CauseBody {
  pub from:  ProfileId,
  pub cause: Cause,
}

/// `POST /causes`: returns 201 + the decoded cause.
pub async fn create<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<CauseBody>,
) -> Result<impl IntoResponse, ApiError> {
  let module = contribution_module(&body.cause);
  let record_id = body.cause.id.clone();
  let new = prepare(store.as_ref(), &body.from, &Record::Cause(body.cause), module).await?;
  require_unused_record_id(store.as_ref(), &body.from, PostTag::OrgPublishCause, &record_id)
    .await?;
  let post = store.create_post(new).await.map_err(ApiError::store)?;
  tracing::info!(post = %post.id, "published cause");
  Ok((StatusCode::CREATED, Json(decode_cause(&post)?)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /causes/{id}`: the cause with its donation total. Donations made to
/// versions the cause has since been modified from still count.
pub async fn get_one<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PublicationId>,
) -> Result<Json<CauseSummary>, ApiError> {
  let (post, _) = require_cause(store.as_ref(), &id).await?;
  let versions = versions_of_post(store.as_ref(), &post, PostTag::OrgPublishCause).await?;
  let comments = comments_across(store.as_ref(), &versions, PostTag::SetAmount).await?;
  Ok(Json(summarize_cause_versions(&post, &versions, &comments)?))
}

// ─── Modify ───────────────────────────────────────────────────────────────────

/// `PUT /causes/{id}`: replaces the cause. The record id carries over from
/// the old version.
pub async fn modify<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PublicationId>,
  Json(body): Json<CauseBody>,
) -> Result<Json<CauseRecord>, ApiError> {
  let (old, current) = require_cause(store.as_ref(), &id).await?;
  require_publisher(&old, &body.from)?;

  let cause = Cause {
    id: current.record.id,
    ..body.cause
  };
  let module = contribution_module(&cause);
  let new = prepare(store.as_ref(), &body.from, &Record::Cause(cause), module).await?;
  let post = replace_post(store.as_ref(), &old, new).await?;
  Ok(Json(decode_cause(&post)?))
}

// ─── Donate ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DonationBody {
  pub from:   ProfileId,
  /// Custom amount in the cause's currency, decimal string.
  pub amount: String,
}

/// `POST /causes/{id}/donations`: publishes a `SET_AMOUNT` comment carrying
/// a collect module for `amount` and collects it once. Returns 201 + the
/// donation comment.
pub async fn donate<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PublicationId>,
  Json(body): Json<DonationBody>,
) -> Result<impl IntoResponse, ApiError> {
  let amount = body.amount.trim();
  let value = Decimal::from_str(amount)
    .map_err(|_| bcharity_metadata::Error::InvalidAmount(amount.to_owned()))?;
  if value <= Decimal::ZERO {
    return Err(ApiError::BadRequest("donation amount must be positive".into()));
  }

  let (post, cause) = require_cause(store.as_ref(), &id).await?;
  require_profile(store.as_ref(), &body.from).await?;

  let new = build_metadata(&body.from, &[PostTag::SetAmount], &[(keys::AMOUNT, amount)])?
    .with_open_action(OpenActionModule::simple_collect(Amount {
      currency: currency_symbol(&cause.record.currency).to_owned(),
      value:    amount.to_owned(),
    }));
  let mut comment = store
    .create_comment(&post.id, new)
    .await
    .map_err(ApiError::store)?;
  comment.stats = store.collect(&comment.id).await.map_err(ApiError::store)?;

  tracing::info!(cause = %post.id, donation = %comment.id, %amount, "recorded donation");
  Ok((StatusCode::CREATED, Json(comment)))
}
