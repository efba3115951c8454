//! Record → publication metadata encoder.
//!
//! Every field becomes one `STRING` attribute. Empty values are written as
//! [`EMPTY_VALUE`] because the protocol's metadata validator rejects empty
//! attribute values.

use bcharity_core::{
  profile::ProfileId,
  publication::{
    APP_ID, DEFAULT_LOCALE, METADATA_VERSION, MetadataAttribute, NewPublication,
    PublicationMetadata,
  },
  tag::PostTag,
};
use uuid::Uuid;

use crate::{
  error::{Error, Result},
  record::{ProfileDetails, Record},
};

/// Placeholder written in place of an empty attribute value.
pub const EMPTY_VALUE: &str = "_EMPTY_VALUE";

fn attribute(key: &str, value: &str) -> MetadataAttribute {
  let value = if value.is_empty() { EMPTY_VALUE } else { value };
  MetadataAttribute::string(key, value)
}

/// Build a publication for `publisher` tagged with `tags` and carrying
/// `fields` as attributes.
///
/// The content body is `#<TAG> ` per tag and the name `<TAG> ` per tag. A
/// fresh `metadata_id` is generated on every call; everything else depends
/// only on the inputs.
pub fn build_metadata(
  publisher: &ProfileId,
  tags: &[PostTag],
  fields: &[(&str, &str)],
) -> Result<NewPublication> {
  if tags.is_empty() {
    return Err(Error::NoTags);
  }

  let content: String = tags.iter().map(|t| format!("#{t} ")).collect();
  let name: String = tags.iter().map(|t| format!("{t} ")).collect();

  let metadata = PublicationMetadata {
    version: METADATA_VERSION.to_owned(),
    metadata_id: Uuid::new_v4(),
    content,
    name,
    tags: tags.iter().map(|t| t.as_str().to_owned()).collect(),
    attributes: fields.iter().map(|(k, v)| attribute(k, v)).collect(),
    locale: DEFAULT_LOCALE.to_owned(),
    app_id: APP_ID.to_owned(),
  };

  Ok(NewPublication {
    profile_id: publisher.clone(),
    metadata,
    open_action: None,
  })
}

/// Encode a typed record under its publish tag.
pub fn encode(publisher: &ProfileId, record: &Record) -> Result<NewPublication> {
  build_metadata(publisher, &[record.kind().tag()], &record.to_fields())
}

/// Profile details as profile metadata attributes.
pub fn encode_profile_attributes(details: &ProfileDetails) -> Vec<MetadataAttribute> {
  details
    .to_fields()
    .into_iter()
    .map(|(k, v)| attribute(k, v))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::record::{Cause, keys};

  fn publisher() -> ProfileId { ProfileId::new("0x01") }

  #[test]
  fn empty_values_become_placeholder() {
    let new = build_metadata(&publisher(), &[PostTag::Goal], &[
      ("goal", "40"),
      ("goalDate", ""),
    ])
    .unwrap();
    let attrs = &new.metadata.attributes;
    assert_eq!(attrs.len(), 2);
    assert_eq!(attrs[0].value, "40");
    assert_eq!(attrs[1].value, EMPTY_VALUE);
    assert!(attrs.iter().all(|a| !a.value.is_empty()));
  }

  #[test]
  fn content_and_name_concatenate_tags() {
    let new = build_metadata(
      &publisher(),
      &[PostTag::OrgPublishCause, PostTag::BookmarkCause],
      &[],
    )
    .unwrap();
    assert_eq!(new.metadata.content, "#ORG_PUBLISH_CAUSE #BOOKMARK_CAUSE ");
    assert_eq!(new.metadata.name, "ORG_PUBLISH_CAUSE BOOKMARK_CAUSE ");
    assert_eq!(new.metadata.tags, vec!["ORG_PUBLISH_CAUSE", "BOOKMARK_CAUSE"]);
    assert_eq!(new.metadata.app_id, "BCharity");
    assert_eq!(new.profile_id, publisher());
    assert!(new.open_action.is_none());
  }

  #[test]
  fn no_tags_is_rejected() {
    assert!(matches!(
      build_metadata(&publisher(), &[], &[("a", "b")]),
      Err(Error::NoTags)
    ));
  }

  #[test]
  fn only_metadata_id_differs_between_calls() {
    let fields = [("name", "x")];
    let a = build_metadata(&publisher(), &[PostTag::Goal], &fields).unwrap();
    let b = build_metadata(&publisher(), &[PostTag::Goal], &fields).unwrap();
    assert_ne!(a.metadata.metadata_id, b.metadata.metadata_id);

    let mut b_meta = b.metadata.clone();
    b_meta.metadata_id = a.metadata.metadata_id;
    assert_eq!(a.metadata, b_meta);
  }

  #[test]
  fn encode_uses_record_tag_and_field_order() {
    let cause = Cause {
      id: "c1".into(),
      name: "Food bank".into(),
      ..Cause::default()
    };
    let new = encode(&publisher(), &Record::Cause(cause)).unwrap();
    assert_eq!(new.metadata.tags, vec!["ORG_PUBLISH_CAUSE"]);
    assert_eq!(new.metadata.attributes[0].key, keys::ID);
    assert_eq!(new.metadata.attributes[1].value, "Food bank");
    assert_eq!(new.metadata.attributes.len(), 10);
  }

  #[test]
  fn profile_attributes_use_placeholder_too() {
    let attrs = encode_profile_attributes(&ProfileDetails {
      profile_type: "organization".into(),
      ..ProfileDetails::default()
    });
    assert_eq!(attrs[0].key, "type");
    assert_eq!(attrs[0].value, "organization");
    assert_eq!(attrs[1].value, EMPTY_VALUE);
  }
}
