//! End-to-end flows against the in-memory store: listing, selection,
//! deletion closures, uploads, and preview assembly.

use std::sync::Arc;

use async_trait::async_trait;
use media_vault::store::{ObjectEntry, ProgressSink};
use media_vault::{
    MediaLibrary, MemoryStore, NamingConfig, ObjectStore, Preview, Severity, StoreError,
    UploadTask, UploadTracker, VaultConfig,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("media_vault=debug")
        .with_test_writer()
        .try_init();
}

fn config() -> VaultConfig {
    VaultConfig {
        bucket: "media".to_string(),
        region: Some("us-east-1".to_string()),
        prefix: "cases".to_string(),
        record_id: Some("rec1".to_string()),
        naming: NamingConfig::default(),
    }
}

fn seeded_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.seed("cases/rec1/call.mp3", b"audio-bytes".to_vec());
    store.seed("cases/rec1/photo.jpg", b"image-bytes".to_vec());
    store.seed("cases/rec1/clip.mp4", b"video-bytes".to_vec());
    store.seed("cases/rec1/notes.txt", b"text".to_vec());
    store.seed(
        "cases/rec1/transcribed_files/call.mp3-transcribed.json",
        br#"{"results":{"items":[]}}"#.to_vec(),
    );
    store.seed(
        "cases/rec1/image_metadata/photo.jpg.json",
        br#"[{"Make":"Canon"}]"#.to_vec(),
    );
    store
}

#[tokio::test]
async fn catalog_hides_artifacts_and_sorts() {
    init_tracing();
    let store = Arc::new(seeded_store());
    let mut library = MediaLibrary::new(config(), Arc::clone(&store) as _).unwrap();
    assert!(library.refresh().await.is_empty());

    let names: Vec<&str> = library
        .catalog()
        .items()
        .iter()
        .map(|item| item.name.as_str())
        .collect();
    assert_eq!(names, vec!["call.mp3", "clip.mp4", "notes.txt", "photo.jpg"]);
}

#[tokio::test]
async fn deleting_audio_and_image_issues_six_key_union() {
    let store = Arc::new(seeded_store());
    let mut library = MediaLibrary::new(config(), Arc::clone(&store) as _).unwrap();
    library.refresh().await;

    library.catalog_mut().set_selected("cases/rec1/call.mp3", true);
    library.catalog_mut().set_selected("cases/rec1/photo.jpg", true);

    let keys = media_vault::build_deletion_keys(library.selected_items(), library.resolver());
    assert_eq!(keys.len(), 6);

    let notices = library.delete_selected().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Success);

    // Primaries and their produced artifacts are gone; unrelated files remain
    assert!(!store.contains("cases/rec1/call.mp3").await);
    assert!(!store.contains("cases/rec1/photo.jpg").await);
    assert!(!store
        .contains("cases/rec1/transcribed_files/call.mp3-transcribed.json")
        .await);
    assert!(!store.contains("cases/rec1/image_metadata/photo.jpg.json").await);
    assert!(store.contains("cases/rec1/clip.mp4").await);
    assert!(store.contains("cases/rec1/notes.txt").await);
}

#[tokio::test]
async fn upload_batch_rejects_bad_names_and_finishes() {
    let store = Arc::new(MemoryStore::new());
    let mut library = MediaLibrary::new(config(), Arc::clone(&store) as _).unwrap();

    let long_name = format!("{}.mp3", "x".repeat(1500));
    let plan = library.plan_uploads(vec!["interview take 1+2.mp3", long_name.as_str()]);

    assert_eq!(plan.tasks.len(), 1);
    assert_eq!(plan.tasks[0].name, "interview_take_1_2.mp3");
    // One info notice for the rename, one sticky error for the rejection
    assert_eq!(plan.notices.len(), 2);
    assert!(plan
        .notices
        .iter()
        .any(|n| n.severity == Severity::Error && n.sticky));

    let files: Vec<(UploadTask, Vec<u8>)> = plan
        .tasks
        .iter()
        .cloned()
        .map(|task| (task, b"audio-bytes".to_vec()))
        .collect();
    let mut tracker = UploadTracker::new(&plan.tasks);
    let mut events = library.start_uploads(files);
    while let Some(event) = events.recv().await {
        tracker.apply(&event);
        if tracker.all_finished() {
            break;
        }
    }
    assert!(tracker.files().iter().all(|f| f.succeeded));
    assert!(store.contains("cases/rec1/interview_take_1_2.mp3").await);

    // The fresh upload shows up on the next wholesale refresh
    library.refresh().await;
    assert_eq!(library.catalog().len(), 1);
}

#[tokio::test]
async fn preview_dispatches_by_kind() {
    let store = Arc::new(seeded_store());
    let mut library = MediaLibrary::new(config(), Arc::clone(&store) as _).unwrap();
    library.refresh().await;

    match library.open_preview("cases/rec1/call.mp3").await {
        Some(Preview::Media(preview)) => {
            assert!(preview.is_audio);
            assert!(preview.has_transcription);
        }
        other => panic!("expected media preview, got {:?}", other.is_some()),
    }

    match library.open_preview("cases/rec1/photo.jpg").await {
        Some(Preview::Image(preview)) => {
            assert!(preview.has_metadata);
            assert!(!preview.has_recognition);
            assert!(preview.coordinates.is_none());
        }
        other => panic!("expected image preview, got {:?}", other.is_some()),
    }

    assert!(library.open_preview("cases/rec1/notes.txt").await.is_none());
    assert!(library.open_preview("cases/rec1/ghost.mp3").await.is_none());
}

/// Store stub whose listing always fails, for the catastrophic-listing path
struct BrokenStore;

#[async_trait]
impl ObjectStore for BrokenStore {
    async fn list(&self, _prefix: &str) -> Result<Vec<ObjectEntry>, StoreError> {
        Err(StoreError::Transport("connection refused".to_string()))
    }

    async fn signed_url(&self, key: &str, _expires_secs: u64) -> Result<String, StoreError> {
        Ok(format!("broken://{}", key))
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        Err(StoreError::NotFound(key.to_string()))
    }

    async fn delete_objects(&self, _keys: &[String]) -> Result<(), StoreError> {
        Err(StoreError::Transport("connection refused".to_string()))
    }

    async fn put_object(
        &self,
        _key: &str,
        _body: Vec<u8>,
        _progress: ProgressSink,
    ) -> Result<(), StoreError> {
        Err(StoreError::Transport("connection refused".to_string()))
    }
}

#[tokio::test]
async fn listing_failure_leaves_catalog_empty_with_sticky_notice() {
    init_tracing();
    let mut library = MediaLibrary::new(config(), Arc::new(BrokenStore)).unwrap();
    let notices = library.refresh().await;

    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Error);
    assert!(notices[0].sticky);
    assert!(library.catalog().is_empty());
}

#[tokio::test]
async fn failed_uploads_report_failure_but_finish() {
    let library = MediaLibrary::new(config(), Arc::new(BrokenStore)).unwrap();
    let plan = library.plan_uploads(vec!["a.mp3"]);
    let files: Vec<(UploadTask, Vec<u8>)> = plan
        .tasks
        .iter()
        .cloned()
        .map(|task| (task, b"x".to_vec()))
        .collect();

    let mut tracker = UploadTracker::new(&plan.tasks);
    let mut events = library.start_uploads(files);
    let mut failure_notices = Vec::new();
    while let Some(event) = events.recv().await {
        if let Some(notice) = tracker.apply(&event) {
            failure_notices.push(notice);
        }
        if tracker.all_finished() {
            break;
        }
    }
    assert_eq!(failure_notices.len(), 1);
    assert!(!tracker.files()[0].succeeded);
}
