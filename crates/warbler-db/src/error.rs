use thiserror::Error;

/// Storage-layer errors. Constraint violations get their own variants so
/// callers can distinguish a duplicate username from a broken query.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// Any non-UNIQUE constraint failure: foreign key, NOT NULL, CHECK.
    #[error("constraint violated: {constraint}")]
    ConstraintViolation { constraint: String },

    #[error("session aborted by a failed commit; rollback before reuse")]
    SessionAborted,

    #[error("DB lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl DbError {
    /// Classify a rusqlite error, pulling constraint violations out of the
    /// generic bucket. SQLite reports which constraint failed only in the
    /// message text, e.g. "UNIQUE constraint failed: users.username".
    pub(crate) fn from_sqlite(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, ref message) = err {
            if code.code == rusqlite::ErrorCode::ConstraintViolation {
                let constraint = message.clone().unwrap_or_else(|| code.to_string());
                if constraint.contains("UNIQUE") {
                    return DbError::UniqueViolation { constraint };
                }
                return DbError::ConstraintViolation { constraint };
            }
        }
        DbError::Sqlite(err)
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation { .. })
    }
}
