//! Publication → record decoder.
//!
//! Pipeline:
//!   Publication
//!     └─ record_kind()          → first record-kind tag
//!          └─ shape check         → post vs comment must match the kind
//!               └─ from_attributes → typed record, missing keys as ""
//!                    └─ validate    → required fields, numbers, dates

use bcharity_core::{
  profile::Profile,
  publication::Publication,
  tag::known_tags,
};

use crate::{
  error::{Error, Result},
  record::{
    Application, ApplicationRecord, Attributes, Cause, CauseRecord, Decoded,
    Goal, GoalRecord, MetadataRecord, Opportunity, OpportunityRecord,
    ProfileDetails, Record, RecordKind, VhrRequest, VhrRequestRecord, keys,
  },
};

/// The record kind named by the first record-kind tag on `publication`.
pub fn record_kind(publication: &Publication) -> Option<RecordKind> {
  known_tags(&publication.metadata.tags)
    .into_iter()
    .find_map(RecordKind::from_tag)
}

fn parse_as<T: MetadataRecord>(publication: &Publication) -> Result<T> {
  let record = T::from_attributes(&publication.metadata.attributes);
  record.validate()?;
  Ok(record)
}

/// Decode any record from `publication`.
pub fn decode(publication: &Publication) -> Result<Decoded<Record>> {
  let kind = record_kind(publication).ok_or_else(|| {
    Error::InvalidMetadata(format!(
      "publication {} carries no record tag",
      publication.id
    ))
  })?;

  if kind.is_comment() != publication.is_comment() {
    let expected = if kind.is_comment() { "comment" } else { "post" };
    return Err(Error::InvalidMetadata(format!(
      "{kind} publication {} is not a {expected}",
      publication.id
    )));
  }

  let record = match kind {
    RecordKind::Cause => Record::Cause(parse_as::<Cause>(publication)?),
    RecordKind::Opportunity => {
      Record::Opportunity(parse_as::<Opportunity>(publication)?)
    }
    RecordKind::Application => {
      Record::Application(parse_as::<Application>(publication)?)
    }
    RecordKind::Goal => Record::Goal(parse_as::<Goal>(publication)?),
    RecordKind::VhrRequest => {
      Record::VhrRequest(parse_as::<VhrRequest>(publication)?)
    }
  };

  Ok(Decoded {
    post_id: publication.id.clone(),
    from: publication.by.clone(),
    created_at: publication.created_at,
    comment_on: publication.comment_on().cloned(),
    record,
  })
}

fn wrong_kind(publication: &Publication, want: RecordKind, got: RecordKind) -> Error {
  Error::InvalidMetadata(format!(
    "publication {} is a {got}, expected a {want}",
    publication.id
  ))
}

pub fn decode_cause(publication: &Publication) -> Result<CauseRecord> {
  decode(publication)?.try_map(|record| match record {
    Record::Cause(r) => Ok(r),
    other => Err(wrong_kind(publication, RecordKind::Cause, other.kind())),
  })
}

pub fn decode_opportunity(publication: &Publication) -> Result<OpportunityRecord> {
  decode(publication)?.try_map(|record| match record {
    Record::Opportunity(r) => Ok(r),
    other => Err(wrong_kind(publication, RecordKind::Opportunity, other.kind())),
  })
}

pub fn decode_application(publication: &Publication) -> Result<ApplicationRecord> {
  decode(publication)?.try_map(|record| match record {
    Record::Application(r) => Ok(r),
    other => Err(wrong_kind(publication, RecordKind::Application, other.kind())),
  })
}

pub fn decode_goal(publication: &Publication) -> Result<GoalRecord> {
  decode(publication)?.try_map(|record| match record {
    Record::Goal(r) => Ok(r),
    other => Err(wrong_kind(publication, RecordKind::Goal, other.kind())),
  })
}

pub fn decode_vhr_request(publication: &Publication) -> Result<VhrRequestRecord> {
  decode(publication)?.try_map(|record| match record {
    Record::VhrRequest(r) => Ok(r),
    other => Err(wrong_kind(publication, RecordKind::VhrRequest, other.kind())),
  })
}

/// Read organization/volunteer details off a profile. Never fails; missing
/// attributes read as `""`.
pub fn decode_profile(profile: &Profile) -> ProfileDetails {
  let a = Attributes(&profile.attributes);
  ProfileDetails {
    profile_type: a.get(keys::TYPE),
    location:     a.get(keys::LOCATION),
    website:      a.get(keys::WEBSITE),
  }
}

#[cfg(test)]
mod tests {
  use bcharity_core::{
    profile::ProfileId,
    publication::{MetadataAttribute, PublicationId, PublicationKind},
    tag::PostTag,
  };
  use chrono::Utc;

  use super::*;
  use crate::{
    encode::{EMPTY_VALUE, build_metadata, encode, encode_profile_attributes},
    test_helpers::{publish, publish_comment},
  };

  fn sample_cause() -> Cause {
    Cause {
      id:           "7d3c".into(),
      name:         "Clean Water".into(),
      category:     "Environment".into(),
      currency:     "USDC".into(),
      contribution: "10".into(),
      goal:         "1000".into(),
      recipient:    "0xdead".into(),
      description:  "Wells for villages".into(),
      location:     "".into(),
      image_url:    "".into(),
    }
  }

  fn sample_opportunity() -> Opportunity {
    Opportunity {
      id:                   "a1".into(),
      name:                 "Tutoring".into(),
      start_date:           "2024-01-01".into(),
      end_date:             "".into(),
      hours_per_week:       "4".into(),
      category:             "Education".into(),
      website:              "https://example.org".into(),
      description:          "Help with homework".into(),
      image_url:            "".into(),
      application_required: "true".into(),
    }
  }

  #[test]
  fn cause_round_trip() {
    let record = Record::Cause(sample_cause());
    let publication = publish(encode(&ProfileId::new("0x01"), &record).unwrap());
    let decoded = decode(&publication).unwrap();
    assert_eq!(decoded.record, record);
    assert_eq!(decoded.post_id, publication.id);
    assert_eq!(decoded.from, publication.by);
  }

  #[test]
  fn opportunity_round_trip() {
    let record = Record::Opportunity(sample_opportunity());
    let publication = publish(encode(&ProfileId::new("0x01"), &record).unwrap());
    let decoded = decode_opportunity(&publication).unwrap();
    assert_eq!(Record::Opportunity(decoded.record), record);
  }

  #[test]
  fn application_round_trip_records_parent() {
    let record = Record::Application(Application {
      resume:      "ipfs://resume".into(),
      description: "I like teaching".into(),
      manual:      "false".into(),
      version:     "".into(),
    });
    let parent = PublicationId::new("0x01-0x01");
    let publication =
      publish_comment(encode(&ProfileId::new("0x02"), &record).unwrap(), &parent);
    let decoded = decode_application(&publication).unwrap();
    assert_eq!(Record::Application(decoded.record), record);
    assert_eq!(decoded.comment_on, Some(parent));
  }

  #[test]
  fn goal_round_trip() {
    let record = Record::Goal(Goal {
      goal:      "40".into(),
      goal_date: "2025-06-30".into(),
    });
    let publication = publish(encode(&ProfileId::new("0x02"), &record).unwrap());
    assert_eq!(decode(&publication).unwrap().record, record);
  }

  #[test]
  fn vhr_request_round_trip() {
    let record = Record::VhrRequest(VhrRequest {
      hours:       "6".into(),
      date:        "2024-04-02".into(),
      description: "".into(),
    });
    let parent = PublicationId::new("0x01-0x01");
    let publication =
      publish_comment(encode(&ProfileId::new("0x02"), &record).unwrap(), &parent);
    let decoded = decode_vhr_request(&publication).unwrap();
    assert_eq!(Record::VhrRequest(decoded.record), record);
    assert_eq!(decoded.comment_on, Some(parent));

    let as_post = publish(encode(&ProfileId::new("0x02"), &record).unwrap());
    assert!(matches!(decode(&as_post), Err(Error::InvalidMetadata(_))));
  }

  #[test]
  fn absent_attributes_decode_to_empty_string() {
    let new = build_metadata(&ProfileId::new("0x01"), &[PostTag::OrgPublishCause], &[
      ("id", "c9"),
      ("name", "Shelter"),
    ])
    .unwrap();
    let cause = decode_cause(&publish(new)).unwrap().record;
    assert_eq!(cause.goal, "");
    assert_eq!(cause.recipient, "");
    assert_eq!(cause.image_url, "");
  }

  #[test]
  fn no_record_tag_is_invalid() {
    let new =
      build_metadata(&ProfileId::new("0x01"), &[PostTag::SetAmount], &[]).unwrap();
    assert!(matches!(decode(&publish(new)), Err(Error::InvalidMetadata(_))));
  }

  #[test]
  fn shape_mismatch_is_invalid() {
    let cause = encode(&ProfileId::new("0x01"), &Record::Cause(sample_cause())).unwrap();
    let as_comment = publish_comment(cause, &PublicationId::new("0x01-0x01"));
    assert!(matches!(decode(&as_comment), Err(Error::InvalidMetadata(_))));

    let app = encode(
      &ProfileId::new("0x02"),
      &Record::Application(Application::default()),
    )
    .unwrap();
    let as_post = publish(app);
    assert_eq!(as_post.kind, PublicationKind::Post);
    assert!(matches!(decode(&as_post), Err(Error::InvalidMetadata(_))));
  }

  #[test]
  fn typed_decoder_rejects_other_kinds() {
    let publication = publish(
      encode(&ProfileId::new("0x01"), &Record::Opportunity(sample_opportunity()))
        .unwrap(),
    );
    let err = decode_cause(&publication).unwrap_err();
    assert!(matches!(err, Error::InvalidMetadata(msg) if msg.contains("opportunity")));
  }

  #[test]
  fn missing_required_field_fails() {
    let new = build_metadata(
      &ProfileId::new("0x01"),
      &[PostTag::OrgPublishOpportunity],
      &[("id", ""), ("name", "Tutoring")],
    )
    .unwrap();
    assert!(matches!(
      decode(&publish(new)),
      Err(Error::MissingField { kind: RecordKind::Opportunity, field: "id" })
    ));
  }

  #[test]
  fn first_record_tag_decides_kind() {
    let new = build_metadata(
      &ProfileId::new("0x01"),
      &[PostTag::BookmarkCause, PostTag::Goal, PostTag::OrgPublishCause],
      &[("goal", "12")],
    )
    .unwrap();
    assert_eq!(record_kind(&publish(new)), Some(RecordKind::Goal));
  }

  #[test]
  fn profile_details_round_trip() {
    let details = ProfileDetails {
      profile_type: "volunteer".into(),
      location:     "Toronto".into(),
      website:      "".into(),
    };
    let profile = Profile {
      id:         ProfileId::new("0x05"),
      handle:     "vol".into(),
      owned_by:   "0xabc".into(),
      attributes: encode_profile_attributes(&details),
      created_at: Utc::now(),
    };
    assert_eq!(decode_profile(&profile), details);

    let bare = Profile {
      attributes: vec![MetadataAttribute::string("type", EMPTY_VALUE)],
      ..profile
    };
    assert_eq!(decode_profile(&bare), ProfileDetails::default());
  }
}
