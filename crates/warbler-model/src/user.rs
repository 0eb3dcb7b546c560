use std::fmt;

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use warbler_db::models::{FollowRow, UserRow};
use warbler_db::{Database, Pending, Session};

use crate::error::ModelError;
use crate::message::Message;
use crate::time;

pub const DEFAULT_IMAGE_URL: &str = "/static/images/default-pic.png";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string, never the plaintext.
    #[serde(skip_serializing)]
    pub password: String,
    pub image_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<User #{}: {}, {}>", self.id, self.username, self.email)
    }
}

impl User {
    /// Sign up a new user: hash the password and stage the insert on the
    /// session. Nothing is persisted until the caller commits; a duplicate
    /// username or email surfaces at commit time as
    /// [`warbler_db::DbError::UniqueViolation`].
    pub fn signup(
        session: &mut Session<'_>,
        username: &str,
        email: &str,
        password: &str,
        image_url: Option<&str>,
    ) -> Result<User, ModelError> {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password: hash_password(password)?,
            image_url: image_url.unwrap_or(DEFAULT_IMAGE_URL).to_string(),
            bio: None,
            location: None,
            created_at: Utc::now(),
        };

        session.add(Pending::InsertUser(user.to_row()))?;
        Ok(user)
    }

    /// Look up a user by username and verify the password against the
    /// stored hash. Returns `Ok(None)` for an unknown username or a wrong
    /// password; only storage and hash-parsing failures are errors.
    pub fn authenticate(
        db: &Database,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, ModelError> {
        let Some(row) = db.get_user_by_username(username)? else {
            return Ok(None);
        };

        let parsed =
            PasswordHash::new(&row.password).map_err(|e| ModelError::Hash(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(Some(User::from_row(row))),
            Err(argon2::password_hash::Error::Password) => Ok(None),
            Err(e) => Err(ModelError::Hash(e.to_string())),
        }
    }

    pub fn get(db: &Database, id: Uuid) -> Result<Option<User>, ModelError> {
        Ok(db.get_user_by_id(&id.to_string())?.map(User::from_row))
    }

    // -- Follow edges --

    /// True iff a Follow edge self → other exists.
    pub fn is_following(&self, db: &Database, other: &User) -> Result<bool, ModelError> {
        Ok(db.follow_exists(&self.id.to_string(), &other.id.to_string())?)
    }

    /// True iff a Follow edge other → self exists.
    pub fn is_followed_by(&self, db: &Database, other: &User) -> Result<bool, ModelError> {
        Ok(db.follow_exists(&other.id.to_string(), &self.id.to_string())?)
    }

    /// Stage a Follow edge self → other.
    pub fn follow(&self, session: &mut Session<'_>, other: &User) -> Result<Follow, ModelError> {
        let edge = Follow {
            follower_id: self.id,
            followee_id: other.id,
        };
        session.add(Pending::InsertFollow(edge.to_row()))?;
        Ok(edge)
    }

    pub fn followers(&self, db: &Database) -> Result<Vec<User>, ModelError> {
        let rows = db.followers_of(&self.id.to_string())?;
        Ok(rows.into_iter().map(User::from_row).collect())
    }

    pub fn following(&self, db: &Database) -> Result<Vec<User>, ModelError> {
        let rows = db.following_of(&self.id.to_string())?;
        Ok(rows.into_iter().map(User::from_row).collect())
    }

    // -- Messages and likes --

    pub fn messages(&self, db: &Database) -> Result<Vec<Message>, ModelError> {
        let rows = db.messages_for_user(&self.id.to_string())?;
        Ok(rows.into_iter().map(Message::from_row).collect())
    }

    /// Messages this user has liked.
    pub fn likes(&self, db: &Database) -> Result<Vec<Message>, ModelError> {
        let rows = db.likes_of_user(&self.id.to_string())?;
        Ok(rows.into_iter().map(Message::from_row).collect())
    }

    /// Stage deletion of this user. The schema cascades to the user's
    /// messages, follow edges in both directions, and likes.
    pub fn delete(&self, session: &mut Session<'_>) -> Result<(), ModelError> {
        session.add(Pending::DeleteUser {
            id: self.id.to_string(),
        })?;
        Ok(())
    }

    pub(crate) fn from_row(row: UserRow) -> User {
        User {
            id: row.id.parse().unwrap_or_else(|e| {
                warn!("Corrupt user id '{}': {}", row.id, e);
                Uuid::default()
            }),
            username: row.username,
            email: row.email,
            password: row.password,
            image_url: row.image_url,
            bio: row.bio,
            location: row.location,
            created_at: time::parse_timestamp(&row.created_at),
        }
    }

    fn to_row(&self) -> UserRow {
        UserRow {
            id: self.id.to_string(),
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            image_url: self.image_url.clone(),
            bio: self.bio.clone(),
            location: self.location.clone(),
            created_at: self.created_at.to_rfc3339(),
        }
    }
}

/// Directed association record: follower follows followee.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Follow {
    pub follower_id: Uuid,
    pub followee_id: Uuid,
}

impl Follow {
    pub(crate) fn to_row(self) -> FollowRow {
        FollowRow {
            follower_id: self.follower_id.to_string(),
            followee_id: self.followee_id.to_string(),
        }
    }
}

fn hash_password(password: &str) -> Result<String, ModelError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ModelError::Hash(e.to_string()))
}
