//! Application records for BCharity on top of the publication protocol.
//!
//! Causes, volunteer opportunities, applications, hour requests and volunteer
//! goals are stored as tagged publications whose attributes carry the record
//! fields. This crate converts between the typed records and those
//! publications and aggregates decoded lists. Pure synchronous; no HTTP or database
//! dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use bcharity_core::profile::ProfileId;
//! use bcharity_metadata::{Record, record::Cause, encode};
//!
//! let cause = Cause { id: "c1".into(), name: "Clean Water".into(), ..Cause::default() };
//! let new = encode(&ProfileId::new("0x01"), &Record::Cause(cause)).unwrap();
//! println!("{}", new.metadata.content);
//! ```

pub mod aggregate;
pub mod date;
pub mod decode;
pub mod encode;
pub mod error;
pub mod record;

pub use aggregate::{
  CauseSummary, CollectModuleKind, donation_total, get_application_metadata,
  get_cause_metadata, get_goal_metadata, get_opportunity_metadata, get_vhr_request_metadata,
  sort_by_end_date, summarize_cause, summarize_cause_versions,
};
pub use decode::{
  decode, decode_application, decode_cause, decode_goal, decode_opportunity,
  decode_profile, decode_vhr_request, record_kind,
};
pub use encode::{EMPTY_VALUE, build_metadata, encode, encode_profile_attributes};
pub use error::{Error, Result};
pub use record::{
  ApplicationRecord, CauseRecord, Decoded, GoalRecord, MetadataRecord, OpportunityRecord,
  ProfileDetails, Record, RecordKind, VhrRequestRecord,
};


#[cfg(test)]
mod tests {
  use bcharity_core::{
    profile::ProfileId,
    publication::{Amount, OpenActionModule},
  };
  use rust_decimal::Decimal;

  use super::*;
  use crate::{
    record::{Cause, Opportunity},
    test_helpers::{publish, publish_comment},
  };

  /// Publish, fetch and aggregate a small feed end to end.
  #[test]
  fn feed_of_mixed_records() {
    let org = ProfileId::new("0x01");
    let cause = Cause {
      id: "c1".into(),
      name: "Food bank".into(),
      currency: "DAI".into(),
      contribution: "2.5".into(),
      goal: "10".into(),
      ..Cause::default()
    };
    let cause_post = {
      let mut p = publish(
        encode(&org, &Record::Cause(cause.clone()))
          .unwrap()
          .with_open_action(OpenActionModule::simple_collect(Amount {
            currency: "DAI".into(),
            value:    "2.5".into(),
          })),
      );
      p.stats.collects = 2;
      p
    };
    let opportunity = publish(
      encode(
        &org,
        &Record::Opportunity(Opportunity {
          id: "o1".into(),
          name: "Sorting".into(),
          end_date: "2024-12-01".into(),
          ..Opportunity::default()
        }),
      )
      .unwrap(),
    );
    let application = publish_comment(
      encode(&ProfileId::new("0x02"), &Record::Application(Default::default())).unwrap(),
      &opportunity.id,
    );

    let feed = vec![cause_post.clone(), opportunity, application];
    let causes = get_cause_metadata(&feed);
    assert_eq!(causes.len(), 1);
    assert_eq!(causes[0].record, cause);
    assert_eq!(get_opportunity_metadata(&feed).len(), 1);
    assert_eq!(get_application_metadata(&feed).len(), 1);
    assert!(get_goal_metadata(&feed).is_empty());

    let summary = summarize_cause(&cause_post, &feed).unwrap();
    assert_eq!(summary.total_donated, Decimal::from(5));
    assert_eq!(summary.progress_percent, Some(Decimal::from(50)));
    assert_eq!(summary.currency_symbol, "DAI");
  }
}
