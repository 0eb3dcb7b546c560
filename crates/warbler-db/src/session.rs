use rusqlite::Transaction;
use tracing::debug;

use crate::Database;
use crate::error::DbError;
use crate::models::{FollowRow, LikeRow, MessageRow, UserRow};

/// A staged insert or delete, applied at commit time.
#[derive(Debug, Clone)]
pub enum Pending {
    InsertUser(UserRow),
    InsertMessage(MessageRow),
    InsertFollow(FollowRow),
    InsertLike(LikeRow),
    DeleteUser { id: String },
}

/// Unit-of-work session: a staging area for pending inserts and deletes,
/// flushed atomically on commit.
///
/// A failed commit applies nothing and leaves the session aborted. While
/// aborted, `add` and `commit` fail with [`DbError::SessionAborted`];
/// `rollback` discards the staged ops and makes the session usable again.
pub struct Session<'db> {
    db: &'db Database,
    pending: Vec<Pending>,
    aborted: bool,
}

impl<'db> Session<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self {
            db,
            pending: Vec::new(),
            aborted: false,
        }
    }

    pub fn add(&mut self, op: Pending) -> Result<(), DbError> {
        if self.aborted {
            return Err(DbError::SessionAborted);
        }
        self.pending.push(op);
        Ok(())
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Apply all staged ops inside a single transaction. On success the
    /// staged ops are drained and the session stays usable; on failure
    /// nothing is applied and the session enters the aborted state.
    pub fn commit(&mut self) -> Result<(), DbError> {
        if self.aborted {
            return Err(DbError::SessionAborted);
        }

        let pending = &self.pending;
        let result = self.db.with_conn_mut(|conn| {
            let tx = conn.transaction().map_err(DbError::from_sqlite)?;
            for op in pending {
                apply(&tx, op)?;
            }
            tx.commit().map_err(DbError::from_sqlite)?;
            Ok(())
        });

        match result {
            Ok(()) => {
                debug!("Committed {} staged ops", self.pending.len());
                self.pending.clear();
                Ok(())
            }
            Err(e) => {
                self.aborted = true;
                Err(e)
            }
        }
    }

    /// Discard staged ops and clear the aborted state.
    pub fn rollback(&mut self) {
        self.pending.clear();
        self.aborted = false;
    }
}

fn apply(tx: &Transaction<'_>, op: &Pending) -> Result<(), DbError> {
    let result = match op {
        Pending::InsertUser(u) => tx.execute(
            "INSERT INTO users (id, username, email, password, image_url, bio, location, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                u.id, u.username, u.email, u.password, u.image_url, u.bio, u.location,
                u.created_at
            ],
        ),
        Pending::InsertMessage(m) => tx.execute(
            "INSERT INTO messages (id, text, timestamp, user_id) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![m.id, m.text, m.timestamp, m.user_id],
        ),
        Pending::InsertFollow(f) => tx.execute(
            "INSERT INTO follows (follower_id, followee_id) VALUES (?1, ?2)",
            rusqlite::params![f.follower_id, f.followee_id],
        ),
        Pending::InsertLike(l) => tx.execute(
            "INSERT INTO likes (user_id, message_id) VALUES (?1, ?2)",
            rusqlite::params![l.user_id, l.message_id],
        ),
        Pending::DeleteUser { id } => tx.execute("DELETE FROM users WHERE id = ?1", [id]),
    };

    result.map_err(DbError::from_sqlite)?;
    Ok(())
}
