//! SQL schema for the SkillSwap SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS profiles (
    user_id        TEXT PRIMARY KEY,    -- externally issued, opaque
    name           TEXT NOT NULL,
    email          TEXT,
    location       TEXT,
    photo_url      TEXT,
    skills_offered TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    skills_wanted  TEXT NOT NULL DEFAULT '[]',
    availability   TEXT NOT NULL DEFAULT '[]',
    is_public      INTEGER NOT NULL DEFAULT 1,
    rating_average REAL NOT NULL DEFAULT 0,      -- mutated only by apply_rating
    rating_count   INTEGER NOT NULL DEFAULT 0,
    created_at     TEXT NOT NULL                 -- ISO 8601 UTC; server-assigned
);

-- Swaps are never deleted; history is status-filtered.
CREATE TABLE IF NOT EXISTS swaps (
    swap_id         TEXT PRIMARY KEY,
    requester_id    TEXT NOT NULL,
    target_id       TEXT NOT NULL,
    offered_skill   TEXT NOT NULL,
    requested_skill TEXT NOT NULL,
    message         TEXT,
    status          TEXT NOT NULL DEFAULT 'pending',
    created_at      TEXT NOT NULL
);

-- Notifications are append-only apart from the read flag.
CREATE TABLE IF NOT EXISTS notifications (
    notification_id TEXT PRIMARY KEY,
    recipient_id    TEXT NOT NULL,
    kind            TEXT NOT NULL,   -- 'swap_request' | 'swap_update' | 'system_message'
    message         TEXT NOT NULL,
    link            TEXT,
    read            INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL
);

-- One row per submitted rating; backs the duplicate-rater policy.
CREATE TABLE IF NOT EXISTS ratings (
    rating_id  TEXT PRIMARY KEY,
    rater_id   TEXT NOT NULL,
    target_id  TEXT NOT NULL,
    stars      INTEGER NOT NULL CHECK (stars BETWEEN 1 AND 5),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS swaps_requester_idx       ON swaps(requester_id);
CREATE INDEX IF NOT EXISTS swaps_target_idx          ON swaps(target_id);
CREATE INDEX IF NOT EXISTS notifications_recipient_idx ON notifications(recipient_id);
CREATE INDEX IF NOT EXISTS ratings_target_idx        ON ratings(target_id, rater_id);

PRAGMA user_version = 1;
";
