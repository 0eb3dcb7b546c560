//! Message model tests.

use warbler_db::{Database, Session};
use warbler_model::{Message, User};

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
fn message_belongs_to_its_author() {
    let (db, u1, _u2) = setup();

    let mut session = Session::new(&db);
    let m = Message::post(&mut session, "a warble", &u1).unwrap();
    session.commit().unwrap();

    let messages = u1.messages(&db).unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, m.id);
    assert_eq!(messages[0].text, "a warble");
    assert_eq!(messages[0].user_id, u1.id);
    assert_eq!(
        m.to_string(),
        format!("<Message #{}: a warble, Owner: {}>", m.id, u1.id)
    );
}

#[test]
fn is_liked_by_flips_when_edge_commits() {
    let (db, u1, u2) = setup();

    let mut session = Session::new(&db);
    let m = Message::post(&mut session, "like me", &u1).unwrap();
    session.commit().unwrap();

    assert!(!m.is_liked_by(&db, &u2).unwrap());

    let mut session = Session::new(&db);
    m.like(&mut session, &u2).unwrap();
    session.commit().unwrap();

    assert!(m.is_liked_by(&db, &u2).unwrap());
    // Only the liking user's edge exists.
    assert!(!m.is_liked_by(&db, &u1).unwrap());

    let liked = u2.likes(&db).unwrap();
    assert_eq!(liked.len(), 1);
    assert_eq!(liked[0].id, m.id);
}

#[test]
fn deleting_a_user_cascades_to_messages_and_likes() {
    let (db, u1, u2) = setup();

    let mut session = Session::new(&db);
    let m = Message::post(&mut session, "soon to vanish", &u1).unwrap();
    session.commit().unwrap();

    let mut session = Session::new(&db);
    m.like(&mut session, &u2).unwrap();
    u2.follow(&mut session, &u1).unwrap();
    session.commit().unwrap();

    let mut session = Session::new(&db);
    u1.delete(&mut session).unwrap();
    session.commit().unwrap();

    assert_eq!(db.count_users().unwrap(), 1);
    assert!(Message::get(&db, m.id).unwrap().is_none());
    assert_eq!(u2.likes(&db).unwrap().len(), 0);
    assert_eq!(u2.following(&db).unwrap().len(), 0);
}

#[test]
fn message_for_missing_user_fails_at_commit() {
    let (db, u1, _u2) = setup();

    // Delete the author first, then try to warble as them.
    let mut session = Session::new(&db);
    u1.delete(&mut session).unwrap();
    session.commit().unwrap();

    let mut session = Session::new(&db);
    Message::post(&mut session, "ghost warble", &u1).unwrap();
    assert!(session.commit().is_err());
}
