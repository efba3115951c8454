//! JSON REST API for BCharity.
//!
//! Exposes an axum [`Router`] backed by any
//! [`bcharity_core::store::PublicationStore`]. Records travel as tagged
//! publications; the handlers encode request bodies with
//! [`bcharity_metadata`] and decode store results before answering. Auth,
//! TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", bcharity_api::api_router(store.clone()))
//! ```

pub mod applications;
pub mod causes;
pub mod error;
pub mod goals;
pub mod opportunities;
pub mod profiles;
pub mod publications;
mod support;
pub mod vhr_requests;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use bcharity_core::store::PublicationStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PublicationStore + 'static,
{
  Router::new()
    // Profiles
    .route("/profiles", get(profiles::list::<S>).post(profiles::create::<S>))
    .route("/profiles/{id}", get(profiles::get_one::<S>))
    // Causes
    .route("/causes", get(causes::list::<S>).post(causes::create::<S>))
    .route("/causes/{id}", get(causes::get_one::<S>).put(causes::modify::<S>))
    .route("/causes/{id}/donations", post(causes::donate::<S>))
    // Opportunities
    .route(
      "/opportunities",
      get(opportunities::list::<S>).post(opportunities::create::<S>),
    )
    .route("/opportunities/{id}", put(opportunities::modify::<S>))
    .route(
      "/opportunities/{id}/applications",
      get(opportunities::list_applications::<S>).post(opportunities::apply::<S>),
    )
    .route(
      "/opportunities/{id}/vhr-requests",
      get(vhr_requests::list::<S>).post(vhr_requests::create::<S>),
    )
    // Review
    .route("/applications/{id}/accept", post(applications::accept::<S>))
    .route("/applications/{id}/reject", post(applications::reject::<S>))
    .route("/vhr-requests/{id}/reject", post(vhr_requests::reject::<S>))
    // Goals
    .route("/goals", get(goals::list::<S>).post(goals::create::<S>))
    // Publications
    .route("/publications/{id}/hide", post(publications::hide::<S>))
    .route("/publications/{id}/collect", post(publications::collect::<S>))
    .with_state(store)
}
