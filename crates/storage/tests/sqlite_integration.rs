use chrono::Duration;
use gaps_core::model::{AuthSession, AuthUser, Role};
use gaps_core::time::fixed_now;
use storage::repository::{AuthSessionRepository, Storage};
use storage::sqlite::SqliteRepository;

fn session(role: Role, token: &str) -> AuthSession {
    AuthSession {
        token: token.into(),
        user: AuthUser {
            role,
            name: "Sam Lee".into(),
            email: "sam@school.edu".into(),
        },
    }
}

#[tokio::test]
async fn sqlite_roundtrip_persists_session() {
    let url = "sqlite:file:memdb_session_roundtrip?mode=memory&cache=shared";
    let repo = SqliteRepository::connect(url).await.expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.load_session().await.unwrap().is_none());

    repo.save_session(&session(Role::Student, "first"), fixed_now())
        .await
        .unwrap();
    let stored = repo.load_session().await.unwrap().expect("stored");
    assert_eq!(stored.session, session(Role::Student, "first"));
    assert_eq!(stored.saved_at, fixed_now());
}

#[tokio::test]
async fn sqlite_save_replaces_and_clear_removes() {
    let url = "sqlite:file:memdb_session_replace?mode=memory&cache=shared";
    let repo = SqliteRepository::connect(url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo.migrate().await.expect("migrations are idempotent");

    repo.save_session(&session(Role::Student, "old"), fixed_now())
        .await
        .unwrap();
    let later = fixed_now() + Duration::minutes(5);
    repo.save_session(&session(Role::Teacher, "new"), later)
        .await
        .unwrap();

    let stored = repo.load_session().await.unwrap().expect("stored");
    assert_eq!(stored.session.token, "new");
    assert_eq!(stored.session.user.role, Role::Teacher);
    assert_eq!(stored.saved_at, later);

    repo.clear_session().await.unwrap();
    assert!(repo.load_session().await.unwrap().is_none());
}

#[tokio::test]
async fn storage_sqlite_constructor_migrates() {
    let storage = Storage::sqlite("sqlite:file:memdb_storage_ctor?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage
        .sessions
        .save_session(&session(Role::Teacher, "t"), fixed_now())
        .await
        .unwrap();
    assert!(storage.sessions.load_session().await.unwrap().is_some());
}
