//! SQL schema for the BCharity SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS profiles (
    profile_id  TEXT PRIMARY KEY,     -- '0x' + hex counter
    handle      TEXT NOT NULL UNIQUE,
    owned_by    TEXT NOT NULL,        -- wallet address
    attributes  TEXT NOT NULL DEFAULT '[]',
    created_at  TEXT NOT NULL
);

-- Publications are append-only apart from `hidden` and `collects`.
CREATE TABLE IF NOT EXISTS publications (
    publication_id TEXT PRIMARY KEY,  -- profile id + '-0x' + hex counter
    profile_id     TEXT NOT NULL REFERENCES profiles(profile_id),
    comment_on     TEXT REFERENCES publications(publication_id),
    metadata_json  TEXT NOT NULL,
    content_uri    TEXT NOT NULL,
    open_actions   TEXT NOT NULL DEFAULT '[]',
    collects       INTEGER NOT NULL DEFAULT 0,
    hidden         INTEGER NOT NULL DEFAULT 0,
    created_at     TEXT NOT NULL
);

-- Raw tag strings copied out of metadata_json for filtering.
CREATE TABLE IF NOT EXISTS publication_tags (
    publication_id TEXT NOT NULL REFERENCES publications(publication_id),
    tag            TEXT NOT NULL,
    PRIMARY KEY (publication_id, tag)
);

CREATE INDEX IF NOT EXISTS publications_profile_idx ON publications(profile_id);
CREATE INDEX IF NOT EXISTS publications_parent_idx  ON publications(comment_on);
CREATE INDEX IF NOT EXISTS publication_tags_tag_idx ON publication_tags(tag);

PRAGMA user_version = 1;
";
