//! Aggregation over fetched publication lists.
//!
//! The list helpers are total: anything that does not decode is dropped and
//! the survivors keep their input order. [`donation_total`] is the opposite:
//! one unrecognised collect module aborts the whole sum.

use std::str::FromStr;

use bcharity_core::{publication::Publication, tag::PostTag};
use rust_decimal::Decimal;
use serde::Serialize;
use strum::EnumString;

use crate::{
  decode::{
    decode_application, decode_cause, decode_goal, decode_opportunity, decode_vhr_request,
  },
  error::{Error, Result},
  record::{
    ApplicationRecord, CauseRecord, Decoded, GoalRecord, OpportunityRecord,
    VhrRequestRecord, parse_decimal,
  },
};

// ─── List helpers ────────────────────────────────────────────────────────────

fn collect_records<T>(
  publications: &[Publication],
  tag: PostTag,
  decoder: fn(&Publication) -> Result<Decoded<T>>,
) -> Vec<Decoded<T>> {
  publications
    .iter()
    .filter(|p| !p.is_hidden && p.has_tag(tag))
    .filter_map(|p| match decoder(p) {
      Ok(record) => Some(record),
      Err(e) => {
        tracing::debug!(publication = %p.id, error = %e, "skipping undecodable publication");
        None
      }
    })
    .collect()
}

/// Causes among `publications`, in input order.
pub fn get_cause_metadata(publications: &[Publication]) -> Vec<CauseRecord> {
  collect_records(publications, PostTag::OrgPublishCause, decode_cause)
}

/// Opportunities among `publications`, in input order.
pub fn get_opportunity_metadata(publications: &[Publication]) -> Vec<OpportunityRecord> {
  collect_records(publications, PostTag::OrgPublishOpportunity, decode_opportunity)
}

/// Applications among `publications`, in input order.
pub fn get_application_metadata(publications: &[Publication]) -> Vec<ApplicationRecord> {
  collect_records(publications, PostTag::ApplicationApply, decode_application)
}

/// Volunteer goals among `publications`, in input order.
pub fn get_goal_metadata(publications: &[Publication]) -> Vec<GoalRecord> {
  collect_records(publications, PostTag::Goal, decode_goal)
}

/// Volunteer-hour requests among `publications`, in input order.
pub fn get_vhr_request_metadata(publications: &[Publication]) -> Vec<VhrRequestRecord> {
  collect_records(publications, PostTag::VhrRequest, decode_vhr_request)
}

/// Order opportunities by end date, latest first. Ongoing opportunities come
/// before every dated one; unparseable end dates sink to the bottom. Equal
/// keys keep their relative order.
pub fn sort_by_end_date(records: &mut [OpportunityRecord]) {
  records.sort_by(|a, b| b.record.end().cmp(&a.record.end()));
}

// ─── Donations ───────────────────────────────────────────────────────────────

/// Collect modules whose collects count as donations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum CollectModuleKind {
  SimpleCollectOpenActionSettings,
  MultirecipientFeeCollectOpenActionSettings,
  LegacySimpleCollectModuleSettings,
  LegacyFeeCollectModuleSettings,
  LegacyLimitedFeeCollectModuleSettings,
  LegacyTimedFeeCollectModuleSettings,
  LegacyLimitedTimedFeeCollectModuleSettings,
  LegacyMultirecipientFeeCollectModuleSettings,
  LegacyFreeCollectModuleSettings,
}

impl CollectModuleKind {
  pub fn recognise(typename: &str) -> Result<Self> {
    Self::from_str(typename).map_err(|_| Error::UnknownCollectModule(typename.to_owned()))
  }
}

/// Σ collects × amount over the publication's collect modules.
fn collected_amount(publication: &Publication) -> Result<Decimal> {
  let collects = Decimal::from(publication.stats.collects);
  let mut sum = Decimal::ZERO;
  for module in &publication.open_actions {
    CollectModuleKind::recognise(&module.typename)?;
    let Some(amount) = &module.amount else {
      continue;
    };
    let per_collect = parse_decimal(&amount.value)
      .ok_or_else(|| Error::InvalidAmount(amount.value.clone()))?;
    sum = per_collect
      .checked_mul(collects)
      .and_then(|v| sum.checked_add(v))
      .ok_or_else(|| Error::InvalidAmount(format!("{} overflows", amount.value)))?;
  }
  Ok(sum)
}

/// Total donated to a cause: the cause post's own collects plus the collects
/// on every visible `SET_AMOUNT` comment directly under it.
///
/// Fails as a whole if the cause post or any of those comments carries an
/// open action that is not a recognised collect module.
pub fn donation_total(cause_post: &Publication, comments: &[Publication]) -> Result<Decimal> {
  if !cause_post.is_post() {
    return Err(Error::InvalidMetadata(format!(
      "publication {} is not a top-level post",
      cause_post.id
    )));
  }

  let mut total = collected_amount(cause_post)?;
  let donations = comments.iter().filter(|c| {
    !c.is_hidden && c.comment_on() == Some(&cause_post.id) && c.has_tag(PostTag::SetAmount)
  });
  for comment in donations {
    total += collected_amount(comment)?;
  }
  Ok(total)
}

/// A decoded cause with its fundraising progress.
#[derive(Debug, Clone, Serialize)]
pub struct CauseSummary {
  pub cause:            CauseRecord,
  pub total_donated:    Decimal,
  pub currency_symbol:  &'static str,
  /// Percentage of the goal reached, two decimal places. `None` when the
  /// cause has no positive goal.
  pub progress_percent: Option<Decimal>,
}

pub fn summarize_cause(cause_post: &Publication, comments: &[Publication]) -> Result<CauseSummary> {
  summarize_cause_versions(cause_post, &[], comments)
}

/// Like [`summarize_cause`], for a cause that has been modified.
///
/// `earlier` holds the superseded posts that share the cause's record id.
/// Donations stay under the version they were made to, so the total sums
/// [`donation_total`] over `current` and every earlier version.
pub fn summarize_cause_versions(
  current: &Publication,
  earlier: &[Publication],
  comments: &[Publication],
) -> Result<CauseSummary> {
  let cause = decode_cause(current)?;
  let mut total_donated = donation_total(current, comments)?;
  for version in earlier.iter().filter(|v| v.id != current.id) {
    total_donated += donation_total(version, comments)?;
  }
  let progress_percent = cause
    .record
    .goal_amount()
    .filter(|goal| goal.is_sign_positive() && !goal.is_zero())
    .and_then(|goal| total_donated.checked_mul(Decimal::ONE_HUNDRED)?.checked_div(goal))
    .map(|pct| pct.round_dp(2));
  Ok(CauseSummary {
    currency_symbol: cause.record.currency_symbol(),
    cause,
    total_donated,
    progress_percent,
  })
}
