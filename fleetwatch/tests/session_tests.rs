use fleetwatch::infra::{Credential, SessionError, SessionStore};

fn store_in(dir: &tempfile::TempDir) -> SessionStore {
    SessionStore::new(dir.path().join("nested").join("session.json"))
}

#[test]
fn missing_file_means_signed_out() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    assert_eq!(store.load().unwrap(), None);
    store.clear().unwrap();
}

#[test]
fn saved_credential_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let credential = Credential::from_token("abc.def").unwrap();

    store.save(&credential).unwrap();

    assert_eq!(store.load().unwrap(), Some(credential));
    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert!(raw.contains("saved_at"));
}

#[cfg(unix)]
#[test]
fn session_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.save(&Credential::from_token("t").unwrap()).unwrap();

    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn clear_removes_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.save(&Credential::from_token("t").unwrap()).unwrap();

    store.clear().unwrap();

    assert_eq!(store.load().unwrap(), None);
    assert!(!store.path().exists());
}

#[test]
fn corrupted_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "not json").unwrap();

    let err = SessionStore::new(&path).load().unwrap_err();

    assert!(matches!(err, SessionError::Corrupted { .. }));
}

#[test]
fn blank_stored_token_is_treated_as_signed_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, r#"{"token":"  ","saved_at":"2026-01-01T00:00:00Z"}"#)
        .unwrap();

    assert_eq!(SessionStore::new(&path).load().unwrap(), None);
}
