//! Integration tests for `SqliteStore` against an in-memory database.

use bcharity_core::{
  profile::{NewProfile, ProfileId},
  publication::{Amount, OpenActionModule, PublicationId},
  store::{PublicationQuery, PublicationStore},
  tag::PostTag,
};
use bcharity_metadata::{
  build_metadata, encode,
  record::{Application, Cause, Record},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn profile(s: &SqliteStore, handle: &str, owner: &str) -> ProfileId {
  s.create_profile(NewProfile {
    handle:     handle.into(),
    owned_by:   owner.into(),
    attributes: vec![],
  })
  .await
  .unwrap()
  .id
}

fn cause(id: &str) -> Record {
  Record::Cause(Cause {
    id: id.into(),
    name: format!("Cause {id}"),
    contribution: "10".into(),
    ..Cause::default()
  })
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_ids_count_up_in_hex() {
  let s = store().await;
  assert_eq!(profile(&s, "org", "0xA").await, ProfileId::new("0x01"));
  assert_eq!(profile(&s, "vol", "0xB").await, ProfileId::new("0x02"));

  let fetched = s.get_profile(&ProfileId::new("0x02")).await.unwrap().unwrap();
  assert_eq!(fetched.handle, "vol");
  assert!(s.get_profile(&ProfileId::new("0x99")).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_handle_is_rejected() {
  let s = store().await;
  profile(&s, "org", "0xA").await;
  let err = s
    .create_profile(NewProfile {
      handle:     "org".into(),
      owned_by:   "0xB".into(),
      attributes: vec![],
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::HandleTaken(h) if h == "org"));
}

#[tokio::test]
async fn list_profiles_by_owner() {
  let s = store().await;
  profile(&s, "a", "0xabc").await;
  profile(&s, "b", "0xdef").await;
  profile(&s, "c", "0xABC").await;

  let owned = s.list_profiles(Some("0xabc")).await.unwrap();
  let handles: Vec<_> = owned.iter().map(|p| p.handle.as_str()).collect();
  assert_eq!(handles, vec!["a", "c"]);
  assert_eq!(s.list_profiles(None).await.unwrap().len(), 3);
}

// ─── Publishing ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn post_round_trips_through_storage() {
  let s = store().await;
  let org = profile(&s, "org", "0xA").await;

  let new = encode(&org, &cause("c1"))
    .unwrap()
    .with_open_action(OpenActionModule::simple_collect(Amount {
      currency: "WMATIC".into(),
      value:    "10".into(),
    }));
  let created = s.create_post(new).await.unwrap();
  assert_eq!(created.id, PublicationId::new("0x01-0x01"));
  assert_eq!(created.by.handle, "org");
  assert!(created.content_uri.starts_with("sha256://"));

  let fetched = s.get_publication(&created.id).await.unwrap().unwrap();
  assert!(fetched.is_post());
  assert_eq!(fetched.metadata, created.metadata);
  assert_eq!(fetched.open_actions, created.open_actions);
  assert_eq!(fetched.content_uri, created.content_uri);
  assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
async fn post_by_unknown_profile_fails() {
  let s = store().await;
  let err = s
    .create_post(encode(&ProfileId::new("0x07"), &cause("c1")).unwrap())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ProfileNotFound(_)));
}

#[tokio::test]
async fn comment_requires_existing_parent() {
  let s = store().await;
  let vol = profile(&s, "vol", "0xB").await;
  let new = encode(&vol, &Record::Application(Application::default())).unwrap();

  let err = s
    .create_comment(&PublicationId::new("0x01-0x01"), new)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ParentNotFound(_)));
}

#[tokio::test]
async fn comments_are_listed_under_their_parent() {
  let s = store().await;
  let org = profile(&s, "org", "0xA").await;
  let vol = profile(&s, "vol", "0xB").await;

  let first = s.create_post(encode(&org, &cause("c1")).unwrap()).await.unwrap();
  let second = s.create_post(encode(&org, &cause("c2")).unwrap()).await.unwrap();
  let apply = || encode(&vol, &Record::Application(Application::default())).unwrap();
  let on_first = s.create_comment(&first.id, apply()).await.unwrap();
  s.create_comment(&second.id, apply()).await.unwrap();

  assert_eq!(on_first.comment_on(), Some(&first.id));
  assert_eq!(on_first.id, PublicationId::new("0x02-0x01"));

  let listed = s
    .list_publications(&PublicationQuery::comments_on(first.id.clone()))
    .await
    .unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].id, on_first.id);
}

#[tokio::test]
async fn list_filters_by_tag_and_profile_in_publish_order() {
  let s = store().await;
  let org = profile(&s, "org", "0xA").await;
  let other = profile(&s, "other", "0xC").await;

  let c1 = s.create_post(encode(&org, &cause("c1")).unwrap()).await.unwrap();
  s.create_post(build_metadata(&org, &[PostTag::Goal], &[("goal", "5")]).unwrap())
    .await
    .unwrap();
  let c2 = s.create_post(encode(&other, &cause("c2")).unwrap()).await.unwrap();

  let causes = s
    .list_publications(&PublicationQuery::tagged(PostTag::OrgPublishCause))
    .await
    .unwrap();
  let ids: Vec<_> = causes.iter().map(|p| p.id.clone()).collect();
  assert_eq!(ids, vec![c1.id.clone(), c2.id]);

  let mine = s
    .list_publications(&PublicationQuery::tagged(PostTag::OrgPublishCause).by(Some(org)))
    .await
    .unwrap();
  assert_eq!(mine.len(), 1);
  assert_eq!(mine[0].id, c1.id);

  let everything = s.list_publications(&PublicationQuery::default()).await.unwrap();
  assert_eq!(everything.len(), 3);
}

#[tokio::test]
async fn list_honours_limit_and_offset() {
  let s = store().await;
  let org = profile(&s, "org", "0xA").await;
  for i in 0..5 {
    s.create_post(encode(&org, &cause(&format!("c{i}"))).unwrap())
      .await
      .unwrap();
  }

  let page = s
    .list_publications(&PublicationQuery {
      limit: Some(2),
      offset: Some(1),
      ..PublicationQuery::default()
    })
    .await
    .unwrap();
  let ids: Vec<_> = page.iter().map(|p| p.id.as_str().to_owned()).collect();
  assert_eq!(ids, vec!["0x01-0x02", "0x01-0x03"]);
}

#[tokio::test]
async fn oversized_limit_and_offset_saturate() {
  let s = store().await;
  let org = profile(&s, "org", "0xA").await;
  for i in 0..3 {
    s.create_post(encode(&org, &cause(&format!("c{i}"))).unwrap())
      .await
      .unwrap();
  }

  let all = s
    .list_publications(&PublicationQuery {
      limit: Some(usize::MAX),
      ..PublicationQuery::default()
    })
    .await
    .unwrap();
  assert_eq!(all.len(), 3);

  let none = s
    .list_publications(&PublicationQuery {
      offset: Some(usize::MAX),
      ..PublicationQuery::default()
    })
    .await
    .unwrap();
  assert!(none.is_empty());
}

// ─── Hiding and collecting ───────────────────────────────────────────────────

#[tokio::test]
async fn hidden_publications_drop_out_of_listings() {
  let s = store().await;
  let org = profile(&s, "org", "0xA").await;
  let post = s.create_post(encode(&org, &cause("c1")).unwrap()).await.unwrap();

  s.hide_publication(&post.id).await.unwrap();

  let visible = s
    .list_publications(&PublicationQuery::tagged(PostTag::OrgPublishCause))
    .await
    .unwrap();
  assert!(visible.is_empty());

  let all = s
    .list_publications(&PublicationQuery {
      include_hidden: true,
      ..PublicationQuery::tagged(PostTag::OrgPublishCause)
    })
    .await
    .unwrap();
  assert_eq!(all.len(), 1);
  assert!(all[0].is_hidden);

  let fetched = s.get_publication(&post.id).await.unwrap().unwrap();
  assert!(fetched.is_hidden);
}

#[tokio::test]
async fn hiding_twice_or_missing_fails() {
  let s = store().await;
  let org = profile(&s, "org", "0xA").await;
  let post = s.create_post(encode(&org, &cause("c1")).unwrap()).await.unwrap();

  s.hide_publication(&post.id).await.unwrap();
  assert!(matches!(
    s.hide_publication(&post.id).await,
    Err(Error::AlreadyHidden(_))
  ));
  assert!(matches!(
    s.hide_publication(&PublicationId::new("0x01-0x09")).await,
    Err(Error::PublicationNotFound(_))
  ));
}

#[tokio::test]
async fn collect_increments_counter() {
  let s = store().await;
  let org = profile(&s, "org", "0xA").await;
  let post = s.create_post(encode(&org, &cause("c1")).unwrap()).await.unwrap();

  assert_eq!(s.collect(&post.id).await.unwrap().collects, 1);
  assert_eq!(s.collect(&post.id).await.unwrap().collects, 2);

  let fetched = s.get_publication(&post.id).await.unwrap().unwrap();
  assert_eq!(fetched.stats.collects, 2);

  assert!(matches!(
    s.collect(&PublicationId::new("0x05-0x01")).await,
    Err(Error::PublicationNotFound(_))
  ));
}
