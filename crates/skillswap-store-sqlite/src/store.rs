//! [`SqliteStore`] — the SQLite implementation of [`ExchangeStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tokio::sync::broadcast;
use uuid::Uuid;

use skillswap_core::{
  Error, Result, UserId,
  notification::{NewNotification, Notification},
  profile::{NewProfile, ProfilePatch, RatingAggregate, UserProfile},
  rating::RatingPolicy,
  store::{ExchangeStore, StoreEvent},
  swap::{NewSwap, SwapRequest, SwapStatus},
};

use crate::{
  encode::{
    RawNotification, RawProfile, RawSwap, database, decode_status, encode_dt,
    encode_kind, encode_list, encode_status, encode_uuid,
  },
  schema::SCHEMA,
};

/// Buffered change-feed capacity. A subscriber that falls further behind
/// than this sees `Lagged` and must rebuild its view from the store.
const EVENT_CAPACITY: usize = 256;

// ─── Row mappers ─────────────────────────────────────────────────────────────

const PROFILE_COLUMNS: &str = "user_id, name, email, location, photo_url, \
   skills_offered, skills_wanted, availability, is_public, \
   rating_average, rating_count, created_at";

fn profile_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProfile> {
  Ok(RawProfile {
    user_id:        row.get(0)?,
    name:           row.get(1)?,
    email:          row.get(2)?,
    location:       row.get(3)?,
    photo_url:      row.get(4)?,
    skills_offered: row.get(5)?,
    skills_wanted:  row.get(6)?,
    availability:   row.get(7)?,
    is_public:      row.get(8)?,
    rating_average: row.get(9)?,
    rating_count:   row.get(10)?,
    created_at:     row.get(11)?,
  })
}

const SWAP_COLUMNS: &str = "swap_id, requester_id, target_id, offered_skill, \
   requested_skill, message, status, created_at";

fn swap_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSwap> {
  Ok(RawSwap {
    swap_id:         row.get(0)?,
    requester_id:    row.get(1)?,
    target_id:       row.get(2)?,
    offered_skill:   row.get(3)?,
    requested_skill: row.get(4)?,
    message:         row.get(5)?,
    status:          row.get(6)?,
    created_at:      row.get(7)?,
  })
}

const NOTIFICATION_COLUMNS: &str = "notification_id, recipient_id, kind, \
   message, link, read, created_at";

fn notification_from_row(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RawNotification> {
  Ok(RawNotification {
    notification_id: row.get(0)?,
    recipient_id:    row.get(1)?,
    kind:            row.get(2)?,
    message:         row.get(3)?,
    link:            row.get(4)?,
    read:            row.get(5)?,
    created_at:      row.get(6)?,
  })
}

// ─── Closure outcomes ────────────────────────────────────────────────────────

// Domain decisions taken inside a `conn.call` closure are carried out as
// plain data; the async side turns them into taxonomy errors.

enum RatingOutcome {
  Applied { average: f64, count: u32 },
  Missing,
  Duplicate,
}

enum CasOutcome {
  Updated(RawSwap),
  Conflict(String),
  Missing,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An exchange store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted and clones
/// share one change feed.
#[derive(Clone)]
pub struct SqliteStore {
  conn:   tokio_rusqlite::Connection,
  events: broadcast::Sender<StoreEvent>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(database)?;
    Self::with_connection(conn).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(database)?;
    Self::with_connection(conn).await
  }

  async fn with_connection(conn: tokio_rusqlite::Connection) -> Result<Self> {
    let (events, _) = broadcast::channel(EVENT_CAPACITY);
    let store = Self { conn, events };
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
      .await
      .map_err(database)
  }

  /// Publish a committed write on the change feed. Having no subscribers is
  /// not an error.
  fn publish(&self, event: StoreEvent) {
    let _ = self.events.send(event);
  }

  async fn fetch_profile(&self, id: &UserId) -> Result<Option<UserProfile>> {
    let id_str = id.as_str().to_owned();

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ?1"),
              rusqlite::params![id_str],
              profile_from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(database)?;

    raw.map(RawProfile::into_profile).transpose()
  }
}

// ─── ExchangeStore impl ──────────────────────────────────────────────────────

impl ExchangeStore for SqliteStore {
  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn create_profile(&self, input: NewProfile) -> Result<UserProfile> {
    let profile = UserProfile {
      id:             input.id,
      name:           input.name,
      email:          input.email,
      location:       None,
      photo_url:      None,
      skills_offered: Vec::new(),
      skills_wanted:  Vec::new(),
      availability:   Vec::new(),
      is_public:      true,
      rating:         RatingAggregate::default(),
      created_at:     Utc::now(),
    };

    let id_str    = profile.id.as_str().to_owned();
    let name      = profile.name.clone();
    let email     = profile.email.clone();
    let at_str    = encode_dt(profile.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (user_id, name, email, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, email, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(database)?;

    self.publish(StoreEvent::ProfileWritten(profile.id.clone()));
    Ok(profile)
  }

  async fn get_profile(&self, id: &UserId) -> Result<Option<UserProfile>> {
    self.fetch_profile(id).await
  }

  async fn update_profile(
    &self,
    id: &UserId,
    patch: ProfilePatch,
  ) -> Result<UserProfile> {
    let id_str         = id.as_str().to_owned();
    let skills_offered = patch.skills_offered.as_deref().map(encode_list).transpose()?;
    let skills_wanted  = patch.skills_wanted.as_deref().map(encode_list).transpose()?;
    let availability   = patch.availability.as_deref().map(encode_list).transpose()?;
    let name           = patch.name;
    let location       = patch.location;
    let photo_url      = patch.photo_url;
    let is_public      = patch.is_public;

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE profiles SET
             name           = COALESCE(?2, name),
             location       = COALESCE(?3, location),
             photo_url      = COALESCE(?4, photo_url),
             skills_offered = COALESCE(?5, skills_offered),
             skills_wanted  = COALESCE(?6, skills_wanted),
             availability   = COALESCE(?7, availability),
             is_public      = COALESCE(?8, is_public)
           WHERE user_id = ?1",
          rusqlite::params![
            id_str,
            name,
            location,
            photo_url,
            skills_offered,
            skills_wanted,
            availability,
            is_public,
          ],
        )?;

        if changed == 0 {
          return Ok(None);
        }

        Ok(
          conn
            .query_row(
              &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ?1"),
              rusqlite::params![id_str],
              profile_from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(database)?;

    let profile = raw
      .ok_or_else(|| Error::ProfileNotFound(id.clone()))?
      .into_profile()?;

    self.publish(StoreEvent::ProfileWritten(id.clone()));
    Ok(profile)
  }

  async fn list_public_profiles(&self) -> Result<Vec<UserProfile>> {
    let raws: Vec<RawProfile> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROFILE_COLUMNS} FROM profiles WHERE is_public = 1"
        ))?;
        let rows = stmt
          .query_map([], profile_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(database)?;

    raws.into_iter().map(RawProfile::into_profile).collect()
  }

  async fn search_offering(&self, skills: &[String]) -> Result<Vec<UserProfile>> {
    let wanted: Vec<String> = skills.iter().map(|s| s.to_lowercase()).collect();
    if wanted.is_empty() {
      return Ok(Vec::new());
    }

    let mut profiles = self.list_public_profiles().await?;
    profiles.retain(|p| {
      p.skills_offered
        .iter()
        .any(|offered| wanted.contains(&offered.to_lowercase()))
    });
    Ok(profiles)
  }

  async fn apply_rating(
    &self,
    rater: &UserId,
    target: &UserId,
    stars: u8,
    policy: RatingPolicy,
  ) -> Result<RatingAggregate> {
    let rater_str     = rater.as_str().to_owned();
    let target_str    = target.as_str().to_owned();
    let rating_id_str = encode_uuid(Uuid::new_v4());
    let at_str        = encode_dt(Utc::now());
    let reject_repeat = policy == RatingPolicy::RejectRepeat;

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let current: Option<(f64, u32)> = tx
          .query_row(
            "SELECT rating_average, rating_count FROM profiles WHERE user_id = ?1",
            rusqlite::params![target_str],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;

        let Some((average, count)) = current else {
          return Ok(RatingOutcome::Missing);
        };

        if reject_repeat {
          let already: bool = tx
            .query_row(
              "SELECT 1 FROM ratings WHERE rater_id = ?1 AND target_id = ?2 LIMIT 1",
              rusqlite::params![rater_str, target_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
          if already {
            return Ok(RatingOutcome::Duplicate);
          }
        }

        let next = RatingAggregate { average, count }.record(stars);

        tx.execute(
          "INSERT INTO ratings (rating_id, rater_id, target_id, stars, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![rating_id_str, rater_str, target_str, stars, at_str],
        )?;
        tx.execute(
          "UPDATE profiles SET rating_average = ?1, rating_count = ?2
           WHERE user_id = ?3",
          rusqlite::params![next.average, next.count, target_str],
        )?;
        tx.commit()?;

        Ok(RatingOutcome::Applied {
          average: next.average,
          count:   next.count,
        })
      })
      .await
      .map_err(database)?;

    match outcome {
      RatingOutcome::Applied { average, count } => {
        self.publish(StoreEvent::ProfileWritten(target.clone()));
        Ok(RatingAggregate { average, count })
      }
      RatingOutcome::Missing => Err(Error::ProfileNotFound(target.clone())),
      RatingOutcome::Duplicate => Err(Error::DuplicateRating {
        rater:  rater.clone(),
        target: target.clone(),
      }),
    }
  }

  // ── Swaps ─────────────────────────────────────────────────────────────────

  async fn insert_swap(&self, input: NewSwap) -> Result<SwapRequest> {
    let swap = SwapRequest {
      swap_id:         Uuid::new_v4(),
      requester_id:    input.requester_id,
      target_id:       input.target_id,
      offered_skill:   input.offered_skill,
      requested_skill: input.requested_skill,
      message:         input.message,
      status:          SwapStatus::Pending,
      created_at:      Utc::now(),
    };

    let id_str        = encode_uuid(swap.swap_id);
    let requester_str = swap.requester_id.as_str().to_owned();
    let target_str    = swap.target_id.as_str().to_owned();
    let offered       = swap.offered_skill.clone();
    let requested     = swap.requested_skill.clone();
    let message       = swap.message.clone();
    let status_str    = encode_status(swap.status).to_owned();
    let at_str        = encode_dt(swap.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO swaps (
             swap_id, requester_id, target_id, offered_skill,
             requested_skill, message, status, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            requester_str,
            target_str,
            offered,
            requested,
            message,
            status_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(database)?;

    self.publish(StoreEvent::SwapWritten(swap.clone()));
    Ok(swap)
  }

  async fn get_swap(&self, id: Uuid) -> Result<Option<SwapRequest>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSwap> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SWAP_COLUMNS} FROM swaps WHERE swap_id = ?1"),
              rusqlite::params![id_str],
              swap_from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(database)?;

    raw.map(RawSwap::into_swap).transpose()
  }

  async fn set_swap_status(
    &self,
    id: Uuid,
    expected_from: SwapStatus,
    to: SwapStatus,
  ) -> Result<SwapRequest> {
    let id_str       = encode_uuid(id);
    let expected_str = encode_status(expected_from).to_owned();
    let to_str       = encode_status(to).to_owned();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let current: Option<String> = tx
          .query_row(
            "SELECT status FROM swaps WHERE swap_id = ?1",
            rusqlite::params![id_str],
            |r| r.get(0),
          )
          .optional()?;

        let Some(current) = current else {
          return Ok(CasOutcome::Missing);
        };
        if current != expected_str {
          return Ok(CasOutcome::Conflict(current));
        }

        tx.execute(
          "UPDATE swaps SET status = ?2 WHERE swap_id = ?1",
          rusqlite::params![id_str, to_str],
        )?;

        let raw = tx.query_row(
          &format!("SELECT {SWAP_COLUMNS} FROM swaps WHERE swap_id = ?1"),
          rusqlite::params![id_str],
          swap_from_row,
        )?;
        tx.commit()?;

        Ok(CasOutcome::Updated(raw))
      })
      .await
      .map_err(database)?;

    match outcome {
      CasOutcome::Updated(raw) => {
        let swap = raw.into_swap()?;
        self.publish(StoreEvent::SwapWritten(swap.clone()));
        Ok(swap)
      }
      CasOutcome::Conflict(actual) => Err(Error::IllegalTransition {
        swap: id,
        from: decode_status(&actual)?,
        to,
      }),
      CasOutcome::Missing => Err(Error::SwapNotFound(id)),
    }
  }

  async fn list_involving(&self, user: &UserId) -> Result<Vec<SwapRequest>> {
    let user_str = user.as_str().to_owned();

    let raws: Vec<RawSwap> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SWAP_COLUMNS} FROM swaps
           WHERE requester_id = ?1 OR target_id = ?1
           ORDER BY created_at DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], swap_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(database)?;

    raws.into_iter().map(RawSwap::into_swap).collect()
  }

  // ── Notifications ─────────────────────────────────────────────────────────

  async fn insert_notification(
    &self,
    input: NewNotification,
  ) -> Result<Notification> {
    let notification = Notification {
      notification_id: Uuid::new_v4(),
      recipient_id:    input.recipient_id,
      kind:            input.kind,
      payload:         input.payload,
      read:            false,
      created_at:      Utc::now(),
    };

    let id_str        = encode_uuid(notification.notification_id);
    let recipient_str = notification.recipient_id.as_str().to_owned();
    let kind_str      = encode_kind(notification.kind).to_owned();
    let message       = notification.payload.message.clone();
    let link          = notification.payload.link.clone();
    let at_str        = encode_dt(notification.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO notifications (
             notification_id, recipient_id, kind, message, link, read, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
          rusqlite::params![id_str, recipient_str, kind_str, message, link, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(database)?;

    self.publish(StoreEvent::NotificationWritten(notification.clone()));
    Ok(notification)
  }

  async fn list_notifications(&self, recipient: &UserId) -> Result<Vec<Notification>> {
    let recipient_str = recipient.as_str().to_owned();

    let raws: Vec<RawNotification> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {NOTIFICATION_COLUMNS} FROM notifications
           WHERE recipient_id = ?1
           ORDER BY created_at DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![recipient_str], notification_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(database)?;

    raws
      .into_iter()
      .map(RawNotification::into_notification)
      .collect()
  }

  async fn mark_read(&self, id: Uuid) -> Result<Notification> {
    let id_str = encode_uuid(id);

    let result: Option<(RawNotification, bool)> = self
      .conn
      .call(move |conn| {
        // The read flag only ever moves false -> true; re-marking is a no-op.
        let changed = conn.execute(
          "UPDATE notifications SET read = 1 WHERE notification_id = ?1 AND read = 0",
          rusqlite::params![id_str],
        )?;

        let raw = conn
          .query_row(
            &format!(
              "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE notification_id = ?1"
            ),
            rusqlite::params![id_str],
            notification_from_row,
          )
          .optional()?;

        Ok(raw.map(|r| (r, changed > 0)))
      })
      .await
      .map_err(database)?;

    let (raw, changed) = result.ok_or(Error::NotificationNotFound(id))?;
    let notification = raw.into_notification()?;

    if changed {
      self.publish(StoreEvent::NotificationsMarkedRead {
        recipient: notification.recipient_id.clone(),
      });
    }
    Ok(notification)
  }

  async fn mark_all_read(&self, recipient: &UserId) -> Result<usize> {
    let recipient_str = recipient.as_str().to_owned();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE notifications SET read = 1 WHERE recipient_id = ?1 AND read = 0",
          rusqlite::params![recipient_str],
        )?)
      })
      .await
      .map_err(database)?;

    if changed > 0 {
      self.publish(StoreEvent::NotificationsMarkedRead {
        recipient: recipient.clone(),
      });
    }
    Ok(changed)
  }

  // ── Change feed ───────────────────────────────────────────────────────────

  fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
    self.events.subscribe()
  }
}
