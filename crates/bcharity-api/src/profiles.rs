//! Handlers for `/profiles` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/profiles` | Optional `?owned_by=<address>` |
//! | `POST` | `/profiles` | Body: [`CreateBody`]; returns 201 |
//! | `GET`  | `/profiles/{id}` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use bcharity_core::{
  profile::{NewProfile, Profile, ProfileId},
  store::PublicationStore,
};
use bcharity_metadata::{ProfileDetails, decode_profile, encode_profile_attributes};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, support::require_profile};

/// A profile together with its decoded organization/volunteer details.
#[derive(Debug, Serialize)]
pub struct ProfileView {
  #[serde(flatten)]
  pub profile: Profile,
  pub details: ProfileDetails,
}

impl From<Profile> for ProfileView {
  fn from(profile: Profile) -> Self {
    let details = decode_profile(&profile);
    Self { profile, details }
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub owned_by: Option<String>,
}

/// `GET /profiles[?owned_by=<address>]`
pub async fn list<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ProfileView>>, ApiError> {
  let profiles = store
    .list_profiles(params.owned_by.as_deref())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(profiles.into_iter().map(ProfileView::from).collect()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub handle:   String,
  /// Wallet address of the owner.
  pub owned_by: String,
  #[serde(default)]
  pub profile:  ProfileDetails,
}

/// `POST /profiles`: returns 201 + the stored profile.
pub async fn create<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let handle = body.handle.trim();
  if handle.is_empty() {
    return Err(ApiError::BadRequest("handle must not be empty".into()));
  }
  if body.owned_by.trim().is_empty() {
    return Err(ApiError::BadRequest("owned_by must not be empty".into()));
  }

  let existing = store.list_profiles(None).await.map_err(ApiError::store)?;
  if existing.iter().any(|p| p.handle == handle) {
    return Err(ApiError::Conflict(format!("handle {handle:?} is already taken")));
  }

  let profile = store
    .create_profile(NewProfile {
      handle:     handle.to_owned(),
      owned_by:   body.owned_by,
      attributes: encode_profile_attributes(&body.profile),
    })
    .await
    .map_err(ApiError::store)?;
  tracing::info!(profile = %profile.id, handle = %profile.handle, "created profile");
  Ok((StatusCode::CREATED, Json(ProfileView::from(profile))))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /profiles/{id}`
pub async fn get_one<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<ProfileId>,
) -> Result<Json<ProfileView>, ApiError> {
  let profile = require_profile(store.as_ref(), &id).await?;
  Ok(Json(ProfileView::from(profile)))
}
