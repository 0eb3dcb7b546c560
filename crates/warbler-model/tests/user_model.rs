//! User model tests.
//!
//! Each test opens a fresh in-memory database and seeds two users, the
//! same fixture shape the application uses for all model tests.

use warbler_db::{Database, DbError, Session};
use warbler_model::User;
use warbler_model::user::DEFAULT_IMAGE_URL;

const PASSWORD: &str = "warble-through-the-trees";

fn setup() -> (Database, User, User) {
    let db = Database::open_in_memory().unwrap();
    db.clear_all().unwrap();

    let mut session = Session::new(&db);
    let u1 = User::signup(&mut session, "testuser", "test@test.com", PASSWORD, None).unwrap();
    let u2 = User::signup(&mut session, "testuser2", "test2@test.com", PASSWORD, None).unwrap();
    session.commit().unwrap();

    (db, u1, u2)
}

#[test]
fn new_user_has_no_messages_or_followers() {
    let (db, u1, _u2) = setup();

    assert_eq!(u1.messages(&db).unwrap().len(), 0);
    assert_eq!(u1.followers(&db).unwrap().len(), 0);
    assert_eq!(
        u1.to_string(),
        format!("<User #{}: testuser, test@test.com>", u1.id)
    );

    let fetched = User::get(&db, u1.id).unwrap().unwrap();
    assert_eq!(fetched.username, "testuser");
}

#[test]
fn is_following_flips_when_edge_commits() {
    let (db, u1, u2) = setup();

    assert!(!u1.is_following(&db, &u2).unwrap());

    let mut session = Session::new(&db);
    u1.follow(&mut session, &u2).unwrap();
    session.commit().unwrap();

    assert!(u1.is_following(&db, &u2).unwrap());
    // Directed edge: the reverse direction stays false.
    assert!(!u2.is_following(&db, &u1).unwrap());

    let following = u1.following(&db).unwrap();
    assert_eq!(following.len(), 1);
    assert_eq!(following[0].id, u2.id);
}

#[test]
fn is_followed_by_mirrors_the_same_edge() {
    let (db, u1, u2) = setup();

    assert!(!u2.is_followed_by(&db, &u1).unwrap());

    let mut session = Session::new(&db);
    u1.follow(&mut session, &u2).unwrap();
    session.commit().unwrap();

    assert!(u2.is_followed_by(&db, &u1).unwrap());
    assert!(!u1.is_followed_by(&db, &u2).unwrap());

    let followers = u2.followers(&db).unwrap();
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].id, u1.id);
}

#[test]
fn signup_stages_a_user_with_hashed_password() {
    let (db, _u1, _u2) = setup();

    let mut session = Session::new(&db);
    let u3 = User::signup(
        &mut session,
        "testuser3",
        "test3@test.com",
        "HASHED_PASS",
        Some("https://i.gifer.com/WyD2.gif"),
    )
    .unwrap();

    // Staged, not committed yet.
    assert_eq!(db.count_users().unwrap(), 2);
    session.commit().unwrap();
    assert_eq!(db.count_users().unwrap(), 3);

    let row = db.get_user_by_username("testuser3").unwrap().unwrap();
    assert_eq!(row.id, u3.id.to_string());
    assert_eq!(row.image_url, "https://i.gifer.com/WyD2.gif");
    assert!(row.password.starts_with("$argon2"));
    assert_ne!(row.password, "HASHED_PASS");
}

#[test]
fn signup_without_image_url_uses_default() {
    let (db, _u1, _u2) = setup();

    let row = db.get_user_by_username("testuser").unwrap().unwrap();
    assert_eq!(row.image_url, DEFAULT_IMAGE_URL);
}

#[test]
fn duplicate_username_fails_at_commit_until_rollback() {
    let (db, _u1, _u2) = setup();

    let mut session = Session::new(&db);
    User::signup(&mut session, "testuser", "test3@test.com", "HASHED_PASS", None).unwrap();

    let err = session.commit().unwrap_err();
    assert!(err.is_unique_violation(), "got {err:?}");
    assert_eq!(db.count_users().unwrap(), 2);

    // The session is unusable until rolled back.
    assert!(matches!(
        User::signup(&mut session, "testuser4", "test4@test.com", "pw", None),
        Err(warbler_model::ModelError::Db(DbError::SessionAborted))
    ));

    session.rollback();
    User::signup(&mut session, "testuser4", "test4@test.com", "pw", None).unwrap();
    session.commit().unwrap();
    assert_eq!(db.count_users().unwrap(), 3);
}

#[test]
fn duplicate_email_fails_at_commit() {
    let (db, _u1, _u2) = setup();

    let mut session = Session::new(&db);
    User::signup(&mut session, "freshname", "test@test.com", "HASHED_PASS", None).unwrap();

    let err = session.commit().unwrap_err();
    assert!(err.is_unique_violation(), "got {err:?}");
}

#[test]
fn authenticate_returns_user_for_valid_credentials() {
    let (db, u1, _u2) = setup();

    let found = User::authenticate(&db, "testuser", PASSWORD).unwrap();
    let found = found.expect("valid credentials should authenticate");
    assert_eq!(found.id, u1.id);
    assert_eq!(found.email, "test@test.com");
}

#[test]
fn authenticate_rejects_wrong_password() {
    let (db, _u1, _u2) = setup();

    let found = User::authenticate(&db, "testuser", "not-the-password").unwrap();
    assert!(found.is_none());
}

#[test]
fn authenticate_rejects_unknown_username() {
    let (db, _u1, _u2) = setup();

    let found = User::authenticate(&db, "nobody", PASSWORD).unwrap();
    assert!(found.is_none());
}
