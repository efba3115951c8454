//! Review status derived from marker comments.
//!
//! Nothing stores an application's or hour request's status. It is read off
//! the publications by checking whether a visible comment with the relevant
//! marker tag sits directly under the item.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{
  publication::{Publication, PublicationId},
  tag::PostTag,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ApplicationStatus {
  Pending,
  Accepted,
  Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VhrRequestStatus {
  Pending,
  Rejected,
}

/// Visible comments directly under `parent`.
fn markers_on<'a>(
  parent: &'a PublicationId,
  publications: &'a [Publication],
) -> impl Iterator<Item = &'a Publication> + 'a {
  publications
    .iter()
    .filter(move |p| !p.is_hidden && p.comment_on() == Some(parent))
}

/// Status of the application `application_id`. An accept marker wins over a
/// reject marker when both are present.
pub fn application_status(
  application_id: &PublicationId,
  publications: &[Publication],
) -> ApplicationStatus {
  let mut rejected = false;
  for marker in markers_on(application_id, publications) {
    if marker.has_tag(PostTag::ApplicationAccept) {
      return ApplicationStatus::Accepted;
    }
    rejected |= marker.has_tag(PostTag::ApplicationReject);
  }
  if rejected {
    ApplicationStatus::Rejected
  } else {
    ApplicationStatus::Pending
  }
}

/// Status of the volunteer-hour request `request_id`.
pub fn vhr_request_status(
  request_id: &PublicationId,
  publications: &[Publication],
) -> VhrRequestStatus {
  if markers_on(request_id, publications).any(|p| p.has_tag(PostTag::VhrRequestReject)) {
    VhrRequestStatus::Rejected
  } else {
    VhrRequestStatus::Pending
  }
}
