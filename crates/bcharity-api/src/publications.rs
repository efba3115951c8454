//! Handlers for `/publications` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/publications/{id}/hide` | Body: `{"from":"<publisher>"}`; 204; 404 if missing, 409 if already hidden |
//! | `POST` | `/publications/{id}/collect` | Records one collect; returns the stats |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use bcharity_core::{
  profile::ProfileId,
  publication::{PublicationId, PublicationStats},
  store::PublicationStore,
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  support::{self, require_publisher, require_visible},
};

#[derive(Debug, Deserialize)]
pub struct HideBody {
  pub from: ProfileId,
}

/// `POST /publications/{id}/hide`: only the publisher may hide.
pub async fn hide<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PublicationId>,
  Json(body): Json<HideBody>,
) -> Result<StatusCode, ApiError> {
  let publication = store
    .get_publication(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("publication {id} not found")))?;
  require_publisher(&publication, &body.from)?;
  if publication.is_hidden {
    return Err(ApiError::Conflict(format!("publication {id} is already hidden")));
  }

  support::hide(store.as_ref(), &id).await?;
  tracing::info!(publication = %id, "hid publication");
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /publications/{id}/collect`
pub async fn collect<S: PublicationStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PublicationId>,
) -> Result<Json<PublicationStats>, ApiError> {
  require_visible(store.as_ref(), &id).await?;
  let stats = store.collect(&id).await.map_err(ApiError::store)?;
  Ok(Json(stats))
}
