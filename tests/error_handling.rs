//! Failure-path scenarios: every degraded mode must leave the pages with
//! something coherent to render.

use std::sync::Arc;
use tempfile::TempDir;
use waitlist_store::{
    AdminDashboard, AppConfig, DocumentBackend, InMemoryBackend, LocalStorage, LocalWaitlistStore,
    PageViewModel, RemoteConfig, RemoteWaitlistStore, Submission, SubmissionFlow, SubmitState,
    WaitlistSnapshot, RETRY_ADVISORY, VALIDATION_MESSAGE, WAITLIST_KEY,
};

fn remote_config(dir: &TempDir) -> Arc<AppConfig> {
    Arc::new(AppConfig {
        remote: RemoteConfig {
            api_key: Some("key".into()),
            project_id: Some("proj".into()),
            ..Default::default()
        },
        storage_dir: dir.path().to_path_buf(),
    })
}

fn local_store(dir: &TempDir) -> LocalWaitlistStore {
    LocalWaitlistStore::open(LocalStorage::open(dir.path()).unwrap())
}

fn remote_store(backend: &Arc<InMemoryBackend>) -> RemoteWaitlistStore {
    RemoteWaitlistStore::new(Arc::clone(backend) as Arc<dyn DocumentBackend>)
}

// --- Local storage corruption ---

#[test]
fn test_corrupted_blob_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let storage = LocalStorage::open(dir.path()).unwrap();
    storage.set_item(WAITLIST_KEY, "][ definitely not json").unwrap();

    let store = local_store(&dir);
    assert_eq!(store.get_snapshot(), WaitlistSnapshot::empty());
}

#[test]
fn test_write_recovers_from_corruption() {
    let dir = TempDir::new().unwrap();
    let storage = LocalStorage::open(dir.path()).unwrap();
    storage.set_item(WAITLIST_KEY, "{\"truncated\":").unwrap();

    // The corrupted blob degrades to empty, so the next write starts clean.
    let store = local_store(&dir);
    store.add_entry("a@b.co").unwrap();
    assert_eq!(store.get_snapshot().emails(), vec!["a@b.co"]);
}

#[test]
fn test_wrong_shape_json_also_degrades() {
    let dir = TempDir::new().unwrap();
    let storage = LocalStorage::open(dir.path()).unwrap();
    storage.set_item(WAITLIST_KEY, "{\"count\": 4}").unwrap();

    let store = local_store(&dir);
    assert_eq!(store.get_snapshot(), WaitlistSnapshot::empty());
}

// --- Validation ---

#[test]
fn test_invalid_emails_never_touch_either_store() {
    let dir = TempDir::new().unwrap();
    let config = remote_config(&dir);
    let local = local_store(&dir);
    let backend = Arc::new(InMemoryBackend::new());
    let remote = remote_store(&backend);

    let mut flow = SubmissionFlow::new();
    for email in ["", "plain", "@b.co", "a@b", "a@b.", "a@.co"] {
        let outcome = flow.submit(email, &config, &local, Some(&remote)).unwrap();
        assert_eq!(
            outcome,
            Submission::Rejected {
                message: VALIDATION_MESSAGE
            },
            "{email:?} should be rejected"
        );
        assert_eq!(flow.state(), SubmitState::Idle);
    }

    assert_eq!(local.get_snapshot().count, 0);
    assert_eq!(backend.document_count("waitlist"), 0);
}

// --- Degraded remote ---

#[test]
fn test_remote_write_failure_keeps_local_record_and_confirmation() {
    let dir = TempDir::new().unwrap();
    let config = remote_config(&dir);
    let local = local_store(&dir);
    let backend = Arc::new(InMemoryBackend::new());
    backend.fail_writes(true);
    let remote = remote_store(&backend);

    let mut flow = SubmissionFlow::new();
    let outcome = flow
        .submit("x@y.com", &config, &local, Some(&remote))
        .unwrap();

    let navigation = match outcome {
        Submission::Accepted {
            navigation,
            advisory,
            ..
        } => {
            assert_eq!(advisory, Some(RETRY_ADVISORY));
            navigation
        }
        other => panic!("expected Accepted, got {other:?}"),
    };
    assert_eq!(navigation.email_display(), "x@y.com");
    assert_eq!(local.get_snapshot().emails(), vec!["x@y.com"]);
    assert_eq!(backend.document_count("waitlist"), 0);

    // If the remote later becomes unavailable entirely, the admin still
    // sees the signup through the local fallback view.
    let fallback_config = Arc::new(AppConfig {
        remote: RemoteConfig::default(),
        storage_dir: dir.path().to_path_buf(),
    });
    let mut admin = AdminDashboard::new(fallback_config);
    admin.login("dev_admin", "A9x!zRq3", &local, None).unwrap();
    assert_eq!(admin.count(), 1);
    assert_eq!(admin.emails(), vec!["x@y.com"]);
}

#[test]
fn test_unreachable_backend_degrades_not_crashes() {
    let dir = TempDir::new().unwrap();
    let config = remote_config(&dir);
    let local = local_store(&dir);
    let backend = Arc::new(InMemoryBackend::new());
    backend.set_offline(true);
    backend.deny_listen(true);
    let remote = remote_store(&backend);

    let mut page = PageViewModel::new(Arc::clone(&config));
    page.mount(&local, Some(&remote));

    // Listener could not attach: advisory set, page still renders.
    assert_eq!(page.advisory(), Some("Live count unavailable"));
    assert_eq!(page.count(), 0);

    // Sign-in fails, so the remote write fails, but the flow completes.
    let mut flow = SubmissionFlow::new();
    let outcome = flow
        .submit("a@b.co", &config, &local, Some(&remote))
        .unwrap();
    match outcome {
        Submission::Accepted { advisory, .. } => assert_eq!(advisory, Some(RETRY_ADVISORY)),
        other => panic!("expected Accepted, got {other:?}"),
    }
    assert_eq!(local.get_snapshot().count, 1);
}

// --- Unsubscribe semantics ---

#[test]
fn test_unsubscribe_then_write_fires_nothing_on_either_store() {
    let dir = TempDir::new().unwrap();
    let local = local_store(&dir);
    let backend = Arc::new(InMemoryBackend::new());
    let remote = remote_store(&backend);

    let local_calls = Arc::new(parking_lot::Mutex::new(0usize));
    let remote_calls = Arc::new(parking_lot::Mutex::new(0usize));

    let local_sub = {
        let calls = Arc::clone(&local_calls);
        local.subscribe(move |_| *calls.lock() += 1)
    };
    let remote_sub = {
        let calls = Arc::clone(&remote_calls);
        remote.subscribe(move |_| *calls.lock() += 1, |_| {})
    };

    // One immediate invocation each at subscribe time.
    assert_eq!(*local_calls.lock(), 1);
    assert_eq!(*remote_calls.lock(), 1);

    local_sub.unsubscribe();
    local_sub.unsubscribe();
    remote_sub.unsubscribe();
    remote_sub.unsubscribe();

    local.add_entry("a@b.co").unwrap();
    remote.add_entry("a@b.co").unwrap();

    assert_eq!(*local_calls.lock(), 1);
    assert_eq!(*remote_calls.lock(), 1);
}
