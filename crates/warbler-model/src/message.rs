use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use warbler_db::models::{LikeRow, MessageRow};
use warbler_db::{Database, Pending, Session};

use crate::error::ModelError;
use crate::time;
use crate::user::User;

/// A warble. Owned by its author; deleted when the author is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: Uuid,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Message #{}: {}, Owner: {}>", self.id, self.text, self.user_id)
    }
}

impl Message {
    /// Construct a message and stage the insert on the session.
    pub fn post(
        session: &mut Session<'_>,
        text: &str,
        author: &User,
    ) -> Result<Message, ModelError> {
        let message = Message {
            id: Uuid::new_v4(),
            text: text.to_string(),
            timestamp: Utc::now(),
            user_id: author.id,
        };

        session.add(Pending::InsertMessage(message.to_row()))?;
        Ok(message)
    }

    pub fn get(db: &Database, id: Uuid) -> Result<Option<Message>, ModelError> {
        Ok(db.get_message_by_id(&id.to_string())?.map(Message::from_row))
    }

    /// True iff a Like edge (user, self) exists.
    pub fn is_liked_by(&self, db: &Database, user: &User) -> Result<bool, ModelError> {
        Ok(db.like_exists(&user.id.to_string(), &self.id.to_string())?)
    }

    /// Stage a Like edge for this message by the given user.
    pub fn like(&self, session: &mut Session<'_>, user: &User) -> Result<Like, ModelError> {
        let edge = Like {
            user_id: user.id,
            message_id: self.id,
        };
        session.add(Pending::InsertLike(edge.to_row()))?;
        Ok(edge)
    }

    pub(crate) fn from_row(row: MessageRow) -> Message {
        Message {
            id: row.id.parse().unwrap_or_else(|e| {
                warn!("Corrupt message id '{}': {}", row.id, e);
                Uuid::default()
            }),
            text: row.text,
            timestamp: time::parse_timestamp(&row.timestamp),
            user_id: row.user_id.parse().unwrap_or_else(|e| {
                warn!("Corrupt user_id on message '{}': {}", row.id, e);
                Uuid::default()
            }),
        }
    }

    fn to_row(&self) -> MessageRow {
        MessageRow {
            id: self.id.to_string(),
            text: self.text.clone(),
            timestamp: self.timestamp.to_rfc3339(),
            user_id: self.user_id.to_string(),
        }
    }
}

/// Association record: a user liked a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Like {
    pub user_id: Uuid,
    pub message_id: Uuid,
}

impl Like {
    pub(crate) fn to_row(self) -> LikeRow {
        LikeRow {
            user_id: self.user_id.to_string(),
            message_id: self.message_id.to_string(),
        }
    }
}
