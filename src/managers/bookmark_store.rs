//! Bookmark Store for Webworm.
//!
//! Implements `BookmarkStoreTrait`: name-keyed bookmark records backed by
//! SQLite via `rusqlite`. Every mutation is a single transaction, so a failed
//! call leaves the table exactly as it was.

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

use crate::types::bookmark::{Bookmark, EpisodeStep};
use crate::types::episode_url::EpisodeUrl;
use crate::types::errors::TrackerError;

const SELECT_COLUMNS: &str = "name, url_head, url_tail, episode, has_new, url_width";

/// Trait defining bookmark storage operations.
pub trait BookmarkStoreTrait {
    /// Every record, in insertion order.
    fn get_all(&self) -> Result<Vec<Bookmark>, TrackerError>;
    fn get(&self, name: &str) -> Result<Bookmark, TrackerError>;
    /// The current episode and the link of the one after it, `None` when the URL has no episode slot.
    fn next_episode(&self, name: &str) -> Result<Option<(i64, String)>, TrackerError>;
    fn insert(&mut self, bookmark: &Bookmark) -> Result<Bookmark, TrackerError>;
    fn mutate_episode(&mut self, name: &str, step: EpisodeStep) -> Result<Bookmark, TrackerError>;
    fn set_has_new(&mut self, name: &str, has_new: bool) -> Result<Bookmark, TrackerError>;
    /// Sets `has_new` only while the record is still at `episode`; otherwise returns it untouched.
    fn mark_new_at(&mut self, name: &str, episode: i64) -> Result<Bookmark, TrackerError>;
    fn remove(&mut self, name: &str) -> Result<(), TrackerError>;
}

/// Bookmark store backed by a SQLite connection.
pub struct BookmarkStore<'a> {
    conn: &'a Connection,
}

impl<'a> BookmarkStore<'a> {
    /// Creates a new `BookmarkStore` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Returns the current UNIX timestamp in seconds.
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn name_exists(conn: &Connection, name: &str) -> Result<bool, TrackerError> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM bookmarks WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Reads a single row, rendering the stored URL at the stored episode.
    fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
        let head: String = row.get(1)?;
        let tail: Option<String> = row.get(2)?;
        let episode: i64 = row.get(3)?;
        let width: usize = row.get(5)?;
        Ok(Bookmark {
            name: row.get(0)?,
            url: EpisodeUrl::from_parts(head, tail, width).render(episode),
            episode,
            has_new: row.get(4)?,
        })
    }

    fn find(conn: &Connection, name: &str) -> Result<Option<Bookmark>, TrackerError> {
        let sql = format!("SELECT {} FROM bookmarks WHERE name = ?1", SELECT_COLUMNS);
        Ok(conn
            .query_row(&sql, params![name], Self::row_to_bookmark)
            .optional()?)
    }
}

impl<'a> BookmarkStoreTrait for BookmarkStore<'a> {
    fn get_all(&self) -> Result<Vec<Bookmark>, TrackerError> {
        let sql = format!("SELECT {} FROM bookmarks ORDER BY id", SELECT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], Self::row_to_bookmark)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        debug!(count = results.len(), "listed bookmarks");
        Ok(results)
    }

    fn get(&self, name: &str) -> Result<Bookmark, TrackerError> {
        Self::find(self.conn, name)?.ok_or_else(|| TrackerError::NotFound(name.to_string()))
    }

    fn next_episode(&self, name: &str) -> Result<Option<(i64, String)>, TrackerError> {
        let row = self
            .conn
            .query_row(
                "SELECT url_head, url_tail, url_width, episode FROM bookmarks WHERE name = ?1",
                params![name],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, usize>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;
        let (head, tail, width, episode) =
            row.ok_or_else(|| TrackerError::NotFound(name.to_string()))?;
        let url = EpisodeUrl::from_parts(head, tail, width);
        if !url.has_slot() {
            return Ok(None);
        }
        Ok(episode.checked_add(1).map(|next| (episode, url.render(next))))
    }

    /// Inserts a new record with `has_new` cleared. Returns the stored record.
    fn insert(&mut self, bookmark: &Bookmark) -> Result<Bookmark, TrackerError> {
        if bookmark.episode < 0 {
            return Err(TrackerError::InvalidInput(format!(
                "episode must not be negative, got {}",
                bookmark.episode
            )));
        }

        let tx = self.conn.unchecked_transaction()?;
        if Self::name_exists(&tx, &bookmark.name)? {
            return Err(TrackerError::DuplicateKey(bookmark.name.clone()));
        }

        let url = EpisodeUrl::parse(&bookmark.url, bookmark.episode);
        let (head, tail, width) = url.parts();
        let now = Self::now();
        tx.execute(
            "INSERT INTO bookmarks (name, url_head, url_tail, url_width, episode, has_new, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7)",
            params![bookmark.name, head, tail, width, bookmark.episode, now, now],
        )?;
        let stored = Self::find(&tx, &bookmark.name)?
            .ok_or_else(|| TrackerError::StorageFailure("inserted row vanished".to_string()))?;
        tx.commit()?;

        info!(name = %stored.name, episode = stored.episode, slotted = url.has_slot(), "inserted bookmark");
        Ok(stored)
    }

    /// Moves the episode one step, clamping at zero.
    ///
    /// A single `UPDATE ... RETURNING` statement, so concurrent steps on the
    /// same name can never read a stale episode. SQLite turns an overflowing
    /// integer sum into a REAL; that case is rejected and the transaction
    /// rolled back.
    fn mutate_episode(&mut self, name: &str, step: EpisodeStep) -> Result<Bookmark, TrackerError> {
        let sql = format!(
            "UPDATE bookmarks SET episode = MAX(episode + ?1, 0), has_new = ?2, updated_at = ?3 \
             WHERE name = ?4 RETURNING {}",
            SELECT_COLUMNS
        );
        let tx = self.conn.unchecked_transaction()?;
        let updated = tx
            .query_row(
                &sql,
                params![step.delta(), step.marks_new(), Self::now(), name],
                |row| match row.get_ref(3)? {
                    ValueRef::Integer(_) => Self::row_to_bookmark(row).map(Some),
                    _ => Ok(None),
                },
            )
            .optional()?;
        let bookmark = match updated {
            None => return Err(TrackerError::NotFound(name.to_string())),
            Some(None) => {
                return Err(TrackerError::InvalidInput(format!(
                    "episode of {} cannot go past {}",
                    name,
                    i64::MAX
                )))
            }
            Some(Some(bookmark)) => bookmark,
        };
        tx.commit()?;

        info!(name, episode = bookmark.episode, ?step, "moved episode");
        Ok(bookmark)
    }

    fn set_has_new(&mut self, name: &str, has_new: bool) -> Result<Bookmark, TrackerError> {
        let sql = format!(
            "UPDATE bookmarks SET has_new = ?1, updated_at = ?2 WHERE name = ?3 RETURNING {}",
            SELECT_COLUMNS
        );
        let tx = self.conn.unchecked_transaction()?;
        let updated = tx
            .query_row(&sql, params![has_new, Self::now(), name], Self::row_to_bookmark)
            .optional()?;
        let Some(bookmark) = updated else {
            return Err(TrackerError::NotFound(name.to_string()));
        };
        tx.commit()?;

        debug!(name, has_new, "updated has_new");
        Ok(bookmark)
    }

    fn mark_new_at(&mut self, name: &str, episode: i64) -> Result<Bookmark, TrackerError> {
        let sql = format!(
            "UPDATE bookmarks SET has_new = 1, updated_at = ?1 \
             WHERE name = ?2 AND episode = ?3 RETURNING {}",
            SELECT_COLUMNS
        );
        let tx = self.conn.unchecked_transaction()?;
        let updated = tx
            .query_row(&sql, params![Self::now(), name, episode], Self::row_to_bookmark)
            .optional()?;
        let bookmark = match updated {
            Some(bookmark) => bookmark,
            None => {
                debug!(name, episode, "episode moved before it could be marked new");
                Self::find(&tx, name)?.ok_or_else(|| TrackerError::NotFound(name.to_string()))?
            }
        };
        tx.commit()?;
        Ok(bookmark)
    }

    /// Deletes a record. Removing a name twice fails the second time.
    fn remove(&mut self, name: &str) -> Result<(), TrackerError> {
        let affected = self
            .conn
            .execute("DELETE FROM bookmarks WHERE name = ?1", params![name])?;

        if affected == 0 {
            return Err(TrackerError::NotFound(name.to_string()));
        }
        info!(name, "removed bookmark");
        Ok(())
    }
}
