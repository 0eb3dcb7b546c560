/// Database row types — these map directly to SQLite rows.
/// Distinct from the warbler-model domain types to keep the DB layer
/// independent: ids and timestamps stay TEXT here.

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub image_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct MessageRow {
    pub id: String,
    pub text: String,
    pub timestamp: String,
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct FollowRow {
    pub follower_id: String,
    pub followee_id: String,
}

#[derive(Debug, Clone)]
pub struct LikeRow {
    pub user_id: String,
    pub message_id: String,
}
