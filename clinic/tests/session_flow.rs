//! End-to-end session lifecycle against the file-backed store.
//!
//! Each test signs in through one `SessionStore` and observes the result
//! through a second store opened on the same directory, the way a restarted
//! client would.

use std::sync::Arc;

use camino::Utf8PathBuf;
use clinic::domain::ports::{
    FIXTURE_PASSWORD, FixtureAuthService, KeyValueStore, SessionContext,
};
use clinic::domain::{
    Dashboard, Landing, LoginCredentials, RegistrationData, Role, SESSION_TOKEN_KEY,
    SESSION_USER_KEY, SessionState, SessionStore, SessionTimeouts,
};
use clinic::outbound::storage::FileKeyValueStore;
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct Harness {
    _temp: TempDir,
    root: Utf8PathBuf,
    auth: Arc<FixtureAuthService>,
}

impl Harness {
    fn storage(&self) -> FileKeyValueStore {
        FileKeyValueStore::open(&self.root).expect("open store")
    }

    async fn restored_store(&self) -> SessionStore {
        let store = SessionStore::new(
            self.auth.clone(),
            Arc::new(self.storage()),
            SessionTimeouts::default(),
        );
        store.restore().await;
        store
    }
}

#[fixture]
fn harness() -> Harness {
    let temp = TempDir::new().expect("create temp dir");
    let root =
        Utf8PathBuf::from_path_buf(temp.path().join("session")).expect("utf-8 temp path");
    Harness {
        _temp: temp,
        root,
        auth: Arc::new(FixtureAuthService::new()),
    }
}

fn creds(email: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts(email, FIXTURE_PASSWORD).expect("credentials shape")
}

#[rstest]
#[case("admin@clinic.test", Dashboard::Admin)]
#[case("doctor@clinic.test", Dashboard::Doctor)]
#[case("patient@clinic.test", Dashboard::Patient)]
#[tokio::test]
async fn restart_lands_on_the_signed_in_dashboard(
    harness: Harness,
    #[case] email: &str,
    #[case] expected: Dashboard,
) {
    let first = harness.restored_store().await;
    assert_eq!(first.state().landing(), Some(Landing::SignIn));
    let identity = first.sign_in(&creds(email)).await.expect("seeded account");

    let second = harness.restored_store().await;

    assert_eq!(second.current_identity(), Some(identity));
    assert_eq!(second.state().landing(), Some(Landing::Dashboard(expected)));
}

#[rstest]
#[tokio::test]
async fn sign_out_survives_restart(harness: Harness) {
    let first = harness.restored_store().await;
    first
        .sign_in(&creds("patient@clinic.test"))
        .await
        .expect("seeded account");
    first.sign_out().await;

    let storage = harness.storage();
    assert!(storage.get(SESSION_USER_KEY).await.expect("read").is_none());
    assert!(storage.get(SESSION_TOKEN_KEY).await.expect("read").is_none());
    let second = harness.restored_store().await;
    assert_eq!(second.state(), SessionState::Unauthenticated);
}

#[rstest]
#[tokio::test]
async fn registration_persists_a_patient(harness: Harness) {
    let first = harness.restored_store().await;
    let data = RegistrationData::try_from_parts("Bruno Lima", "bruno@clinic.test", "s3cret")
        .expect("registration shape");
    let identity = first.register(&data).await.expect("register");
    assert_eq!(identity.role(), Role::Patient);

    let second = harness.restored_store().await;

    assert_eq!(second.current_identity(), Some(identity));
}

#[rstest]
#[tokio::test]
async fn corrupted_file_restores_signed_out(harness: Harness) {
    let storage = harness.storage();
    storage
        .set(SESSION_USER_KEY, "{not json")
        .await
        .expect("write user");
    storage
        .set(SESSION_TOKEN_KEY, "token")
        .await
        .expect("write token");

    let store = harness.restored_store().await;

    assert_eq!(store.state(), SessionState::Unauthenticated);
    assert!(storage.get(SESSION_USER_KEY).await.expect("read").is_none());
}
