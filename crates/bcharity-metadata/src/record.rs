//! Typed application records and the attribute keys they travel under.
//!
//! Record structs hold only what is stored as attributes. The publication
//! envelope (post id, publisher, timestamp, parent) is carried alongside by
//! [`Decoded`].

use std::str::FromStr;

use bcharity_core::{
  currency::currency_symbol,
  profile::ProfileRef,
  publication::{MetadataAttribute, PublicationId},
  tag::PostTag,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{
  date::{CalendarDate, EndDate},
  encode::EMPTY_VALUE,
  error::{Error, Result},
};

/// Attribute keys as written on the wire.
pub mod keys {
  pub const ID: &str = "id";
  pub const NAME: &str = "name";
  pub const CATEGORY: &str = "category";
  pub const CURRENCY: &str = "currency";
  pub const CONTRIBUTION: &str = "contribution";
  pub const GOAL: &str = "goal";
  pub const RECIPIENT: &str = "recipient";
  pub const DESCRIPTION: &str = "description";
  pub const LOCATION: &str = "location";
  pub const IMAGE_URL: &str = "imageUrl";
  pub const START_DATE: &str = "startDate";
  pub const END_DATE: &str = "endDate";
  pub const HOURS_PER_WEEK: &str = "hoursPerWeek";
  pub const WEBSITE: &str = "website";
  pub const APPLICATION_REQUIRED: &str = "applicationRequired";
  pub const RESUME: &str = "resume";
  pub const MANUAL: &str = "manual";
  pub const VERSION: &str = "version";
  pub const GOAL_DATE: &str = "goalDate";
  pub const TYPE: &str = "type";
  pub const AMOUNT: &str = "amount";
  pub const HOURS: &str = "hours";
  pub const DATE: &str = "date";
}

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// The record kinds a publication can decode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecordKind {
  Cause,
  Opportunity,
  Application,
  Goal,
  VhrRequest,
}

impl RecordKind {
  /// The tag that marks a publication as this kind of record.
  pub fn tag(&self) -> PostTag {
    match self {
      Self::Cause => PostTag::OrgPublishCause,
      Self::Opportunity => PostTag::OrgPublishOpportunity,
      Self::Application => PostTag::ApplicationApply,
      Self::Goal => PostTag::Goal,
      Self::VhrRequest => PostTag::VhrRequest,
    }
  }

  pub fn from_tag(tag: PostTag) -> Option<Self> {
    match tag {
      PostTag::OrgPublishCause => Some(Self::Cause),
      PostTag::OrgPublishOpportunity => Some(Self::Opportunity),
      PostTag::ApplicationApply => Some(Self::Application),
      PostTag::Goal => Some(Self::Goal),
      PostTag::VhrRequest => Some(Self::VhrRequest),
      PostTag::ApplicationAccept
      | PostTag::ApplicationReject
      | PostTag::VhrRequestReject
      | PostTag::BookmarkCause
      | PostTag::BookmarkOpportunity
      | PostTag::SetAmount => None,
    }
  }

  /// Applications and hour requests hang under an opportunity; everything
  /// else is a post.
  pub fn is_comment(&self) -> bool { matches!(self, Self::Application | Self::VhrRequest) }
}

// ─── Attribute access ────────────────────────────────────────────────────────

/// Read-only view over a publication's attributes.
///
/// Missing keys and the empty-value placeholder both read as `""`.
pub(crate) struct Attributes<'a>(pub(crate) &'a [MetadataAttribute]);

impl Attributes<'_> {
  pub(crate) fn get(&self, key: &str) -> String {
    self
      .0
      .iter()
      .find(|a| a.key == key)
      .map(|a| a.value.as_str())
      .filter(|v| *v != EMPTY_VALUE)
      .unwrap_or_default()
      .to_owned()
  }
}

// ─── Field checks ────────────────────────────────────────────────────────────

fn require(kind: RecordKind, field: &'static str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::MissingField { kind, field });
  }
  Ok(())
}

fn check_number(field: &'static str, value: &str) -> Result<()> {
  if !value.is_empty() && parse_decimal(value).is_none() {
    return Err(Error::InvalidNumber {
      field,
      value: value.to_owned(),
    });
  }
  Ok(())
}

fn check_date(field: &'static str, value: &str) -> Result<()> {
  if !value.is_empty() && CalendarDate::parse(value).is_none() {
    return Err(Error::InvalidDate {
      field,
      value: value.to_owned(),
    });
  }
  Ok(())
}

pub(crate) fn parse_decimal(value: &str) -> Option<Decimal> { Decimal::from_str(value.trim()).ok() }

// ─── Record trait ────────────────────────────────────────────────────────────

/// Conversion between a record struct and its attribute list.
pub trait MetadataRecord: Sized {
  const KIND: RecordKind;

  /// `(key, value)` pairs in wire order.
  fn to_fields(&self) -> Vec<(&'static str, &str)>;

  /// Assemble from attributes without checking field contents.
  fn from_attributes(attrs: &[MetadataAttribute]) -> Self;

  /// Required-field, number and date checks shared by decoding and input
  /// validation.
  fn validate(&self) -> Result<()>;
}

// ─── Cause ───────────────────────────────────────────────────────────────────

/// A fundraiser published by an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cause {
  /// Stable record id; survives modification.
  pub id:           String,
  pub name:         String,
  pub category:     String,
  /// Whitelist key, e.g. `"WMATIC"`.
  pub currency:     String,
  /// Per-donation amount, numeric string.
  pub contribution: String,
  /// Fundraising target, numeric string.
  pub goal:         String,
  /// Wallet address receiving donations.
  pub recipient:    String,
  pub description:  String,
  pub location:     String,
  pub image_url:    String,
}

impl Cause {
  pub fn goal_amount(&self) -> Option<Decimal> { parse_decimal(&self.goal) }

  pub fn contribution_amount(&self) -> Option<Decimal> { parse_decimal(&self.contribution) }

  pub fn currency_symbol(&self) -> &'static str { currency_symbol(&self.currency) }
}

impl MetadataRecord for Cause {
  const KIND: RecordKind = RecordKind::Cause;

  fn to_fields(&self) -> Vec<(&'static str, &str)> {
    vec![
      (keys::ID, self.id.as_str()),
      (keys::NAME, self.name.as_str()),
      (keys::CATEGORY, self.category.as_str()),
      (keys::CURRENCY, self.currency.as_str()),
      (keys::CONTRIBUTION, self.contribution.as_str()),
      (keys::GOAL, self.goal.as_str()),
      (keys::RECIPIENT, self.recipient.as_str()),
      (keys::DESCRIPTION, self.description.as_str()),
      (keys::LOCATION, self.location.as_str()),
      (keys::IMAGE_URL, self.image_url.as_str()),
    ]
  }

  fn from_attributes(attrs: &[MetadataAttribute]) -> Self {
    let a = Attributes(attrs);
    Self {
      id:           a.get(keys::ID),
      name:         a.get(keys::NAME),
      category:     a.get(keys::CATEGORY),
      currency:     a.get(keys::CURRENCY),
      contribution: a.get(keys::CONTRIBUTION),
      goal:         a.get(keys::GOAL),
      recipient:    a.get(keys::RECIPIENT),
      description:  a.get(keys::DESCRIPTION),
      location:     a.get(keys::LOCATION),
      image_url:    a.get(keys::IMAGE_URL),
    }
  }

  fn validate(&self) -> Result<()> {
    require(Self::KIND, keys::ID, &self.id)?;
    require(Self::KIND, keys::NAME, &self.name)?;
    check_number(keys::CONTRIBUTION, &self.contribution)?;
    check_number(keys::GOAL, &self.goal)
  }
}

// ─── Opportunity ─────────────────────────────────────────────────────────────

/// A volunteer opportunity published by an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Opportunity {
  pub id:                   String,
  pub name:                 String,
  pub start_date:           String,
  /// Empty means ongoing.
  pub end_date:             String,
  pub hours_per_week:       String,
  pub category:             String,
  pub website:              String,
  pub description:          String,
  pub image_url:            String,
  /// `"true"` or `"false"`.
  pub application_required: String,
}

impl Opportunity {
  pub fn is_ongoing(&self) -> bool { self.end_date.trim().is_empty() }

  pub fn end(&self) -> Option<EndDate> { EndDate::parse(&self.end_date) }

  pub fn application_required(&self) -> bool { self.application_required == "true" }

  pub fn hours(&self) -> Option<Decimal> { parse_decimal(&self.hours_per_week) }
}

impl MetadataRecord for Opportunity {
  const KIND: RecordKind = RecordKind::Opportunity;

  fn to_fields(&self) -> Vec<(&'static str, &str)> {
    vec![
      (keys::ID, self.id.as_str()),
      (keys::NAME, self.name.as_str()),
      (keys::START_DATE, self.start_date.as_str()),
      (keys::END_DATE, self.end_date.as_str()),
      (keys::HOURS_PER_WEEK, self.hours_per_week.as_str()),
      (keys::CATEGORY, self.category.as_str()),
      (keys::WEBSITE, self.website.as_str()),
      (keys::DESCRIPTION, self.description.as_str()),
      (keys::IMAGE_URL, self.image_url.as_str()),
      (keys::APPLICATION_REQUIRED, self.application_required.as_str()),
    ]
  }

  fn from_attributes(attrs: &[MetadataAttribute]) -> Self {
    let a = Attributes(attrs);
    Self {
      id:                   a.get(keys::ID),
      name:                 a.get(keys::NAME),
      start_date:           a.get(keys::START_DATE),
      end_date:             a.get(keys::END_DATE),
      hours_per_week:       a.get(keys::HOURS_PER_WEEK),
      category:             a.get(keys::CATEGORY),
      website:              a.get(keys::WEBSITE),
      description:          a.get(keys::DESCRIPTION),
      image_url:            a.get(keys::IMAGE_URL),
      application_required: a.get(keys::APPLICATION_REQUIRED),
    }
  }

  fn validate(&self) -> Result<()> {
    require(Self::KIND, keys::ID, &self.id)?;
    require(Self::KIND, keys::NAME, &self.name)?;
    check_date(keys::START_DATE, &self.start_date)?;
    check_date(keys::END_DATE, &self.end_date)?;
    check_number(keys::HOURS_PER_WEEK, &self.hours_per_week)
  }
}

// ─── Application ─────────────────────────────────────────────────────────────

/// A volunteer's application, published as a comment on an opportunity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Application {
  /// URL of the uploaded resume.
  pub resume:      String,
  pub description: String,
  /// `"true"` when logged by the organization on the volunteer's behalf.
  pub manual:      String,
  pub version:     String,
}

impl Application {
  pub fn is_manual(&self) -> bool { self.manual == "true" }
}

impl MetadataRecord for Application {
  const KIND: RecordKind = RecordKind::Application;

  fn to_fields(&self) -> Vec<(&'static str, &str)> {
    vec![
      (keys::RESUME, self.resume.as_str()),
      (keys::DESCRIPTION, self.description.as_str()),
      (keys::MANUAL, self.manual.as_str()),
      (keys::VERSION, self.version.as_str()),
    ]
  }

  fn from_attributes(attrs: &[MetadataAttribute]) -> Self {
    let a = Attributes(attrs);
    Self {
      resume:      a.get(keys::RESUME),
      description: a.get(keys::DESCRIPTION),
      manual:      a.get(keys::MANUAL),
      version:     a.get(keys::VERSION),
    }
  }

  fn validate(&self) -> Result<()> { Ok(()) }
}

// ─── Goal ────────────────────────────────────────────────────────────────────

/// A volunteer's target number of volunteer hours by a date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Goal {
  pub goal:      String,
  pub goal_date: String,
}

impl Goal {
  pub fn hours(&self) -> Option<Decimal> { parse_decimal(&self.goal) }
}

impl MetadataRecord for Goal {
  const KIND: RecordKind = RecordKind::Goal;

  fn to_fields(&self) -> Vec<(&'static str, &str)> {
    vec![(keys::GOAL, self.goal.as_str()), (keys::GOAL_DATE, self.goal_date.as_str())]
  }

  fn from_attributes(attrs: &[MetadataAttribute]) -> Self {
    let a = Attributes(attrs);
    Self {
      goal:      a.get(keys::GOAL),
      goal_date: a.get(keys::GOAL_DATE),
    }
  }

  fn validate(&self) -> Result<()> {
    require(Self::KIND, keys::GOAL, &self.goal)?;
    check_number(keys::GOAL, &self.goal)?;
    check_date(keys::GOAL_DATE, &self.goal_date)
  }
}

// ─── Volunteer hour request ──────────────────────────────────────────────────

/// Hours a volunteer logs against an opportunity, published as a comment on
/// it. The organization either lets it stand or rejects it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VhrRequest {
  /// Hours worked, numeric string.
  pub hours:       String,
  /// Day the hours were worked, `YYYY-MM-DD`.
  pub date:        String,
  pub description: String,
}

impl VhrRequest {
  pub fn hours(&self) -> Option<Decimal> { parse_decimal(&self.hours) }
}

impl MetadataRecord for VhrRequest {
  const KIND: RecordKind = RecordKind::VhrRequest;

  fn to_fields(&self) -> Vec<(&'static str, &str)> {
    vec![
      (keys::HOURS, self.hours.as_str()),
      (keys::DATE, self.date.as_str()),
      (keys::DESCRIPTION, self.description.as_str()),
    ]
  }

  fn from_attributes(attrs: &[MetadataAttribute]) -> Self {
    let a = Attributes(attrs);
    Self {
      hours:       a.get(keys::HOURS),
      date:        a.get(keys::DATE),
      description: a.get(keys::DESCRIPTION),
    }
  }

  fn validate(&self) -> Result<()> {
    require(Self::KIND, keys::HOURS, &self.hours)?;
    check_number(keys::HOURS, &self.hours)?;
    check_date(keys::DATE, &self.date)
  }
}

// ─── Profile details ─────────────────────────────────────────────────────────

/// Organization or volunteer details stored as profile attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDetails {
  /// `"organization"` or `"volunteer"`.
  #[serde(rename = "type")]
  pub profile_type: String,
  pub location:     String,
  pub website:      String,
}

impl ProfileDetails {
  pub fn is_organization(&self) -> bool { self.profile_type == "organization" }

  pub(crate) fn to_fields(&self) -> Vec<(&'static str, &str)> {
    vec![
      (keys::TYPE, self.profile_type.as_str()),
      (keys::LOCATION, self.location.as_str()),
      (keys::WEBSITE, self.website.as_str()),
    ]
  }
}

// ─── Sum type ────────────────────────────────────────────────────────────────

/// Any record a publication can decode to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
  Cause(Cause),
  Opportunity(Opportunity),
  Application(Application),
  Goal(Goal),
  VhrRequest(VhrRequest),
}

impl Record {
  pub fn kind(&self) -> RecordKind {
    match self {
      Self::Cause(_) => RecordKind::Cause,
      Self::Opportunity(_) => RecordKind::Opportunity,
      Self::Application(_) => RecordKind::Application,
      Self::Goal(_) => RecordKind::Goal,
      Self::VhrRequest(_) => RecordKind::VhrRequest,
    }
  }

  pub fn to_fields(&self) -> Vec<(&'static str, &str)> {
    match self {
      Self::Cause(r) => r.to_fields(),
      Self::Opportunity(r) => r.to_fields(),
      Self::Application(r) => r.to_fields(),
      Self::Goal(r) => r.to_fields(),
      Self::VhrRequest(r) => r.to_fields(),
    }
  }

  pub fn validate(&self) -> Result<()> {
    match self {
      Self::Cause(r) => r.validate(),
      Self::Opportunity(r) => r.validate(),
      Self::Application(r) => r.validate(),
      Self::Goal(r) => r.validate(),
      Self::VhrRequest(r) => r.validate(),
    }
  }
}

// ─── Envelope ────────────────────────────────────────────────────────────────

/// A record together with the publication it was decoded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded<T> {
  pub post_id:    PublicationId,
  pub from:       ProfileRef,
  pub created_at: DateTime<Utc>,
  /// Parent publication for comment records.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub comment_on: Option<PublicationId>,
  #[serde(flatten)]
  pub record:     T,
}

impl<T> Decoded<T> {
  pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Decoded<U>, E> {
    Ok(Decoded {
      post_id:    self.post_id,
      from:       self.from,
      created_at: self.created_at,
      comment_on: self.comment_on,
      record:     f(self.record)?,
    })
  }
}

pub type CauseRecord = Decoded<Cause>;
pub type OpportunityRecord = Decoded<Opportunity>;
pub type ApplicationRecord = Decoded<Application>;
pub type GoalRecord = Decoded<Goal>;
pub type VhrRequestRecord = Decoded<VhrRequest>;
