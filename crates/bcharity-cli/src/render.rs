//! Plain-text rendering of API results for the terminal.

use bcharity_core::profile::Profile;
use bcharity_metadata::{CauseRecord, GoalRecord, OpportunityRecord, decode_profile};
use rust_decimal::Decimal;

use crate::client::{ApplicationEntry, CauseSummary, VhrRequestEntry};

fn or_dash(value: &str) -> &str { if value.is_empty() { "—" } else { value } }

pub fn profile_line(profile: &Profile, selected: bool) -> String {
  let details = decode_profile(profile);
  let marker = if selected { "*" } else { " " };
  format!(
    "{marker} {:<8} @{:<20} {:<12} {}",
    profile.id,
    profile.handle,
    or_dash(&details.profile_type),
    or_dash(&details.location),
  )
}

pub fn cause_line(cause: &CauseRecord) -> String {
  let record = &cause.record;
  format!(
    "{:<12} {:<32} goal {} {}",
    cause.post_id,
    record.name,
    or_dash(&record.goal),
    record.currency_symbol(),
  )
}

pub fn cause_summary(summary: &CauseSummary) -> String {
  let record = &summary.cause.record;
  let progress = summary
    .progress_percent
    .map(|p| format!(" ({p}% of {})", record.goal))
    .unwrap_or_default();
  let mut out = format!(
    "{}\n  posted by @{} on {}\n  raised {} {}{progress}\n",
    record.name,
    summary.cause.from.handle,
    summary.cause.created_at.format("%Y-%m-%d"),
    summary.total_donated.normalize(),
    summary.currency_symbol,
  );
  if !record.description.is_empty() {
    out.push_str(&format!("  {}\n", record.description));
  }
  out
}

pub fn opportunity_line(opportunity: &OpportunityRecord) -> String {
  let record = &opportunity.record;
  let ends = if record.is_ongoing() {
    "ongoing".to_owned()
  } else {
    format!("ends {}", record.end_date)
  };
  let hours = record
    .hours()
    .map(|h| format!("{}h/week", h.normalize()))
    .unwrap_or_default();
  format!(
    "{:<12} {:<32} {:<16} {hours}",
    opportunity.post_id, record.name, ends
  )
}

pub fn application_line(entry: &ApplicationEntry) -> String {
  let application = &entry.application;
  format!(
    "{:<12} @{:<20} {:<9} {}",
    application.post_id,
    application.from.handle,
    entry.status,
    if application.record.is_manual() { "(logged manually)" } else { "" },
  )
}

pub fn vhr_request_line(entry: &VhrRequestEntry) -> String {
  let request = &entry.request;
  let hours = request.record.hours().unwrap_or(Decimal::ZERO).normalize();
  format!(
    "{:<12} @{:<20} {:>6}h {:<10} {}",
    request.post_id,
    request.from.handle,
    hours,
    or_dash(&request.record.date),
    entry.status,
  )
}

pub fn goal_line(goal: &GoalRecord) -> String {
  let hours = goal.record.hours().unwrap_or(Decimal::ZERO).normalize();
  format!(
    "{:<12} {hours} hours by {}",
    goal.post_id,
    or_dash(&goal.record.goal_date)
  )
}

#[cfg(test)]
mod tests {
  use bcharity_core::{
    profile::{ProfileId, ProfileRef},
    publication::PublicationId,
  };
  use bcharity_core::status::VhrRequestStatus;
  use bcharity_metadata::{
    Decoded,
    record::{Cause, Opportunity, VhrRequest},
  };
  use chrono::{TimeZone, Utc};

  use super::*;

  fn decoded<T>(record: T) -> Decoded<T> {
    Decoded {
      post_id: PublicationId::new("0x01-0x01"),
      from: ProfileRef {
        id:     ProfileId::new("0x01"),
        handle: "shelter".into(),
      },
      created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
      comment_on: None,
      record,
    }
  }

  #[test]
  fn ongoing_opportunity_says_so() {
    let line = opportunity_line(&decoded(Opportunity {
      name: "Tutoring".into(),
      hours_per_week: "3.50".into(),
      ..Opportunity::default()
    }));
    assert!(line.contains("ongoing"));
    assert!(line.contains("3.5h/week"));
  }

  #[test]
  fn summary_shows_progress() {
    let summary = CauseSummary {
      cause:            decoded(Cause {
        name: "Clean Water".into(),
        goal: "200".into(),
        ..Cause::default()
      }),
      total_donated:    Decimal::from(50),
      currency_symbol:  "USDC".into(),
      progress_percent: Some(Decimal::from(25)),
    };
    let text = cause_summary(&summary);
    assert!(text.starts_with("Clean Water\n"));
    assert!(text.contains("raised 50 USDC (25% of 200)"));
    assert!(text.contains("@shelter on 2024-05-01"));
  }

  #[test]
  fn hour_request_shows_hours_and_status() {
    let entry = VhrRequestEntry {
      request: decoded(VhrRequest {
        hours: "6.0".into(),
        ..VhrRequest::default()
      }),
      status:  VhrRequestStatus::Rejected,
    };
    let line = vhr_request_line(&entry);
    assert!(line.contains("6h"));
    assert!(line.contains("@shelter"));
    assert!(line.ends_with("rejected"));
  }
}
