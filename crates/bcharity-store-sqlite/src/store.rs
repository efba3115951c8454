//! [`SqliteStore`]: the SQLite implementation of [`PublicationStore`].

use std::path::Path;

use bcharity_core::{
  profile::{NewProfile, Profile, ProfileId, ProfileRef},
  publication::{
    NewPublication, Publication, PublicationId, PublicationKind, PublicationStats,
  },
  store::{PublicationQuery, PublicationStore},
};
use chrono::Utc;
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{
    PROFILE_COLUMNS, PUBLICATION_COLUMNS, RawProfile, RawPublication, encode_attributes,
    encode_dt, encode_metadata, encode_open_actions,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A local stand-in for the social protocol, backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a post (`parent == None`) or a comment.
  ///
  /// The publisher lookup, the per-profile counter and the insert share one
  /// transaction so concurrent publishes never reuse an id.
  async fn insert_publication(
    &self,
    parent: Option<PublicationId>,
    input: NewPublication,
  ) -> Result<Publication> {
    let content_uri = input.metadata.content_uri()?;
    let open_actions: Vec<_> = input.open_action.into_iter().collect();
    let created_at = Utc::now();

    let metadata_str     = encode_metadata(&input.metadata)?;
    let open_actions_str = encode_open_actions(&open_actions)?;
    let at_str           = encode_dt(created_at);
    let profile_id       = input.profile_id.clone();
    let parent_id        = parent.clone();
    let uri              = content_uri.clone();
    let tags             = input.metadata.tags.clone();

    let inserted: Result<(PublicationId, String)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let handle: Option<String> = tx
          .query_row(
            "SELECT handle FROM profiles WHERE profile_id = ?1",
            rusqlite::params![profile_id.as_str()],
            |r| r.get(0),
          )
          .optional()?;
        let Some(handle) = handle else {
          return Ok(Err(Error::ProfileNotFound(profile_id)));
        };

        if let Some(parent) = &parent_id {
          let exists = tx
            .query_row(
              "SELECT 1 FROM publications WHERE publication_id = ?1",
              rusqlite::params![parent.as_str()],
              |_| Ok(()),
            )
            .optional()?
            .is_some();
          if !exists {
            return Ok(Err(Error::ParentNotFound(parent.clone())));
          }
        }

        let count: i64 = tx.query_row(
          "SELECT COUNT(*) FROM publications WHERE profile_id = ?1",
          rusqlite::params![profile_id.as_str()],
          |r| r.get(0),
        )?;
        let id = PublicationId::for_profile(&profile_id, count.unsigned_abs() + 1);

        tx.execute(
          "INSERT INTO publications (
             publication_id, profile_id, comment_on, metadata_json,
             content_uri, open_actions, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id.as_str(),
            profile_id.as_str(),
            parent_id.as_ref().map(PublicationId::as_str),
            metadata_str,
            uri,
            open_actions_str,
            at_str,
          ],
        )?;
        for tag in &tags {
          tx.execute(
            "INSERT OR IGNORE INTO publication_tags (publication_id, tag) VALUES (?1, ?2)",
            rusqlite::params![id.as_str(), tag],
          )?;
        }

        tx.commit()?;
        Ok(Ok((id, handle)))
      })
      .await?;
    let (id, handle) = inserted?;

    tracing::debug!(publication = %id, parent = ?parent, tags = ?input.metadata.tags, "published");

    let kind = match parent {
      Some(comment_on) => PublicationKind::Comment { comment_on },
      None => PublicationKind::Post,
    };
    Ok(Publication {
      id,
      by: ProfileRef {
        id: input.profile_id,
        handle,
      },
      kind,
      metadata: input.metadata,
      content_uri,
      open_actions,
      stats: PublicationStats::default(),
      created_at,
      is_hidden: false,
    })
  }
}

/// `LIMIT`/`OFFSET` operand; counts past `i64::MAX` saturate.
fn sql_count(n: usize) -> i64 { i64::try_from(n).unwrap_or(i64::MAX) }

// ─── PublicationStore impl ───────────────────────────────────────────────────

impl PublicationStore for SqliteStore {
  type Error = Error;

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn create_profile(&self, input: NewProfile) -> Result<Profile> {
    let created_at = Utc::now();

    let attributes_str = encode_attributes(&input.attributes)?;
    let at_str         = encode_dt(created_at);
    let handle         = input.handle.clone();
    let owned_by       = input.owned_by.clone();

    let id: Option<String> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let taken = tx
          .query_row(
            "SELECT 1 FROM profiles WHERE handle = ?1",
            rusqlite::params![handle],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(None);
        }

        let count: i64 = tx.query_row("SELECT COUNT(*) FROM profiles", [], |r| r.get(0))?;
        let id = format!("0x{:02x}", count + 1);

        tx.execute(
          "INSERT INTO profiles (profile_id, handle, owned_by, attributes, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id, handle, owned_by, attributes_str, at_str],
        )?;
        tx.commit()?;
        Ok(Some(id))
      })
      .await?;

    let Some(id) = id else {
      return Err(Error::HandleTaken(input.handle));
    };
    tracing::debug!(profile = %id, handle = %input.handle, "created profile");

    Ok(Profile {
      id: ProfileId(id),
      handle: input.handle,
      owned_by: input.owned_by,
      attributes: input.attributes,
      created_at,
    })
  }

  async fn get_profile(&self, id: &ProfileId) -> Result<Option<Profile>> {
    let id_str = id.as_str().to_owned();

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE profile_id = ?1"),
              rusqlite::params![id_str],
              RawProfile::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn list_profiles(&self, owned_by: Option<&str>) -> Result<Vec<Profile>> {
    let owner = owned_by.map(str::to_owned);

    let raws: Vec<RawProfile> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(owner) = owner {
          let mut stmt = conn.prepare(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles
             WHERE owned_by = ?1 COLLATE NOCASE ORDER BY rowid"
          ))?;
          stmt
            .query_map(rusqlite::params![owner], RawProfile::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt =
            conn.prepare(&format!("SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY rowid"))?;
          stmt
            .query_map([], RawProfile::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProfile::into_profile).collect()
  }

  // ── Publications: append-only writes ─────────────────────────────────────

  async fn create_post(&self, input: NewPublication) -> Result<Publication> {
    self.insert_publication(None, input).await
  }

  async fn create_comment(
    &self,
    parent: &PublicationId,
    input: NewPublication,
  ) -> Result<Publication> {
    self.insert_publication(Some(parent.clone()), input).await
  }

  async fn hide_publication(&self, id: &PublicationId) -> Result<()> {
    let target = id.clone();

    let outcome: Result<()> = self
      .conn
      .call(move |conn| {
        let hidden: Option<bool> = conn
          .query_row(
            "SELECT hidden FROM publications WHERE publication_id = ?1",
            rusqlite::params![target.as_str()],
            |r| r.get(0),
          )
          .optional()?;
        match hidden {
          None => Ok(Err(Error::PublicationNotFound(target))),
          Some(true) => Ok(Err(Error::AlreadyHidden(target))),
          Some(false) => {
            conn.execute(
              "UPDATE publications SET hidden = 1 WHERE publication_id = ?1",
              rusqlite::params![target.as_str()],
            )?;
            Ok(Ok(()))
          }
        }
      })
      .await?;
    outcome?;

    tracing::debug!(publication = %id, "hid publication");
    Ok(())
  }

  async fn collect(&self, id: &PublicationId) -> Result<PublicationStats> {
    let id_str = id.as_str().to_owned();

    let collects: Option<i64> = self
      .conn
      .call(move |conn| {
        let updated = conn.execute(
          "UPDATE publications SET collects = collects + 1 WHERE publication_id = ?1",
          rusqlite::params![id_str],
        )?;
        if updated == 0 {
          return Ok(None);
        }
        Ok(Some(conn.query_row(
          "SELECT collects FROM publications WHERE publication_id = ?1",
          rusqlite::params![id_str],
          |r| r.get(0),
        )?))
      })
      .await?;

    let collects = collects.ok_or_else(|| Error::PublicationNotFound(id.clone()))?;
    Ok(PublicationStats {
      collects: collects.unsigned_abs(),
    })
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_publication(&self, id: &PublicationId) -> Result<Option<Publication>> {
    let id_str = id.as_str().to_owned();

    let raw: Option<RawPublication> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PUBLICATION_COLUMNS}
                 FROM publications p
                 JOIN profiles a ON a.profile_id = p.profile_id
                 WHERE p.publication_id = ?1"
              ),
              rusqlite::params![id_str],
              RawPublication::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPublication::into_publication).transpose()
  }

  async fn list_publications(&self, query: &PublicationQuery) -> Result<Vec<Publication>> {
    // Positional parameters are all text; numbering follows push order.
    let mut conds: Vec<String> = vec![];
    let mut params: Vec<String> = vec![];

    if !query.include_hidden {
      conds.push("p.hidden = 0".to_owned());
    }
    if let Some(profile_id) = &query.profile_id {
      params.push(profile_id.as_str().to_owned());
      conds.push(format!("p.profile_id = ?{}", params.len()));
    }
    if let Some(parent) = &query.comment_on {
      params.push(parent.as_str().to_owned());
      conds.push(format!("p.comment_on = ?{}", params.len()));
    }
    if !query.tags.is_empty() {
      let placeholders: Vec<String> = query
        .tags
        .iter()
        .map(|tag| {
          params.push(tag.as_str().to_owned());
          format!("?{}", params.len())
        })
        .collect();
      conds.push(format!(
        "EXISTS (SELECT 1 FROM publication_tags t
                 WHERE t.publication_id = p.publication_id
                   AND t.tag IN ({}))",
        placeholders.join(", ")
      ));
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };
    let limit = query.limit.map_or(-1, sql_count);
    let offset = query.offset.map_or(0, sql_count);

    let sql = format!(
      "SELECT {PUBLICATION_COLUMNS}
       FROM publications p
       JOIN profiles a ON a.profile_id = p.profile_id
       {where_clause}
       ORDER BY p.rowid
       LIMIT {limit} OFFSET {offset}"
    );

    let raws: Vec<RawPublication> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), RawPublication::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPublication::into_publication).collect()
  }
}
