use crate::Database;
use crate::error::DbError;
use crate::models::{MessageRow, UserRow};
use rusqlite::{Connection, Row};

const USER_COLUMNS: &str =
    "id, username, email, password, image_url, bio, location, created_at";

impl Database {
    // -- Users --

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
            ))?;
            stmt.query_row([id], user_from_row).optional()
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
            ))?;
            stmt.query_row([username], user_from_row).optional()
        })
    }

    pub fn count_users(&self) -> Result<u64, DbError> {
        self.with_conn(|conn| {
            let n: u64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(n)
        })
    }

    // -- Messages --

    pub fn get_message_by_id(&self, id: &str) -> Result<Option<MessageRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, text, timestamp, user_id FROM messages WHERE id = ?1")?;
            stmt.query_row([id], message_from_row).optional()
        })
    }

    pub fn messages_for_user(&self, user_id: &str) -> Result<Vec<MessageRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, text, timestamp, user_id FROM messages
                 WHERE user_id = ?1
                 ORDER BY timestamp DESC",
            )?;
            let rows = stmt
                .query_map([user_id], message_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Follow edges --

    pub fn follow_exists(&self, follower_id: &str, followee_id: &str) -> Result<bool, DbError> {
        self.with_conn(|conn| {
            exists(
                conn,
                "SELECT 1 FROM follows WHERE follower_id = ?1 AND followee_id = ?2",
                [follower_id, followee_id],
            )
        })
    }

    /// Users following the given user.
    pub fn followers_of(&self, user_id: &str) -> Result<Vec<UserRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users
                 WHERE id IN (SELECT follower_id FROM follows WHERE followee_id = ?1)"
            ))?;
            let rows = stmt
                .query_map([user_id], user_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Users the given user follows.
    pub fn following_of(&self, user_id: &str) -> Result<Vec<UserRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users
                 WHERE id IN (SELECT followee_id FROM follows WHERE follower_id = ?1)"
            ))?;
            let rows = stmt
                .query_map([user_id], user_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Like edges --

    pub fn like_exists(&self, user_id: &str, message_id: &str) -> Result<bool, DbError> {
        self.with_conn(|conn| {
            exists(
                conn,
                "SELECT 1 FROM likes WHERE user_id = ?1 AND message_id = ?2",
                [user_id, message_id],
            )
        })
    }

    /// Messages the given user has liked.
    pub fn likes_of_user(&self, user_id: &str) -> Result<Vec<MessageRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, m.text, m.timestamp, m.user_id FROM messages m
                 JOIN likes l ON l.message_id = m.id
                 WHERE l.user_id = ?1
                 ORDER BY m.timestamp DESC",
            )?;
            let rows = stmt
                .query_map([user_id], message_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Fixtures --

    /// Bulk-delete every row in every table. Test fixtures call this to
    /// start from clean tables without re-running migrations.
    pub fn clear_all(&self) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute_batch(
                "DELETE FROM likes;
                 DELETE FROM follows;
                 DELETE FROM messages;
                 DELETE FROM users;",
            )?;
            Ok(())
        })
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        image_url: row.get(4)?,
        bio: row.get(5)?,
        location: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        text: row.get(1)?,
        timestamp: row.get(2)?,
        user_id: row.get(3)?,
    })
}

fn exists<P: rusqlite::Params>(conn: &Connection, sql: &str, params: P) -> Result<bool, DbError> {
    let mut stmt = conn.prepare(sql)?;
    let hit = stmt.query_row(params, |_| Ok(())).optional()?;
    Ok(hit.is_some())
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, DbError>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, DbError> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
