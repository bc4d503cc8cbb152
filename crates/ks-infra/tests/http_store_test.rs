use ks_core::ports::{AlignmentStorePort, StoreError};
use ks_core::{ExportFormat, ProjectId, ProjectStatus, TimingCorrection, WordPosition};
use ks_infra::HttpAlignmentStore;
use mockito::{Matcher, Server, ServerGuard};

fn store_for(server: &ServerGuard) -> HttpAlignmentStore {
    HttpAlignmentStore::with_client(reqwest_client(), &server.url())
}

fn reqwest_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .unwrap()
}

const COMPLETED_PROJECT: &str = r#"{
    "_id": "665f1c2e9a",
    "id": "p1",
    "project_name": "Song",
    "audio_filename": "song.wav",
    "text_filename": "song.txt",
    "language": "en",
    "status": "completed",
    "created_at": "2024-05-01T10:20:30.123456",
    "audio_duration": 3.0,
    "aligned_segments": [
        {
            "start": 1.0,
            "end": 1.8,
            "text": "la la",
            "words": [
                {"word": "la", "start": 1.0, "end": 1.4, "confidence": 0.8},
                {"word": "la", "start": 1.4, "end": 1.8, "confidence": 0.8}
            ]
        }
    ],
    "user_corrections": null
}"#;

#[tokio::test]
async fn get_project_maps_aligned_segments() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/projects/p1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(COMPLETED_PROJECT)
        .create_async()
        .await;

    let project = store_for(&server)
        .get_project(&ProjectId::from("p1"))
        .await
        .expect("project should load");

    mock.assert_async().await;
    assert_eq!(project.status, ProjectStatus::Completed);
    assert_eq!(project.audio_duration, Some(3.0));
    let words = &project.segments()[0].words;
    assert_eq!(words.len(), 2);
    assert_eq!(words[1].start, 1.4);
}

#[tokio::test]
async fn processing_project_has_no_segments() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/projects/p2")
        .with_status(200)
        .with_body(
            r#"{"id":"p2","project_name":"Draft","audio_filename":"a.wav",
                "text_filename":"a.txt","language":"en","status":"processing",
                "created_at":"2024-05-01T10:20:30","audio_duration":12.5,
                "aligned_segments":null}"#,
        )
        .create_async()
        .await;

    let project = store_for(&server)
        .get_project(&ProjectId::from("p2"))
        .await
        .unwrap();

    assert_eq!(project.status, ProjectStatus::Processing);
    assert!(project.segments.is_none());
}

#[tokio::test]
async fn missing_project_is_not_found() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/projects/nope")
        .with_status(404)
        .with_body(r#"{"detail":"Project not found"}"#)
        .create_async()
        .await;

    let err = store_for(&server)
        .get_project(&ProjectId::from("nope"))
        .await
        .unwrap_err();

    assert_eq!(err, StoreError::NotFound(ProjectId::from("nope")));
}

#[tokio::test]
async fn server_error_is_unavailable() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/projects")
        .with_status(500)
        .create_async()
        .await;

    let err = store_for(&server).list_projects().await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/projects")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let err = store_for(&server).list_projects().await.unwrap_err();
    assert!(matches!(err, StoreError::Decode(_)));
}

#[tokio::test]
async fn list_projects_returns_summaries() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/projects")
        .with_status(200)
        .with_body(format!("[{COMPLETED_PROJECT}]"))
        .create_async()
        .await;

    let projects = store_for(&server).list_projects().await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "Song");
    assert_eq!(projects[0].status, ProjectStatus::Completed);
}

#[tokio::test]
async fn submit_posts_single_correction_array() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/projects/p1/correct")
        .match_body(Matcher::Json(serde_json::json!([{
            "segment_index": 0,
            "word_index": 0,
            "new_start_time": 1.0,
            "new_end_time": 1.35
        }])))
        .with_status(200)
        .with_body(r#"{"message":"Corrections applied"}"#)
        .create_async()
        .await;

    let correction = TimingCorrection::new(WordPosition::new(0, 0), 1.0, 1.35);
    store_for(&server)
        .submit_corrections(&ProjectId::from("p1"), &[correction])
        .await
        .expect("correction should be accepted");

    mock.assert_async().await;
}

#[tokio::test]
async fn submit_to_missing_project_is_not_found() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/projects/gone/correct")
        .with_status(404)
        .create_async()
        .await;

    let correction = TimingCorrection::new(WordPosition::new(0, 0), 1.0, 1.35);
    let err = store_for(&server)
        .submit_corrections(&ProjectId::from("gone"), &[correction])
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn export_keeps_bytes_and_content_type() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/projects/p1/download/lrc")
        .with_status(200)
        .with_header("content-type", "text/plain; charset=utf-8")
        .with_body("[ti:Song]\n[ar:Generated]\n[00:01.00]la la\n")
        .create_async()
        .await;

    let payload = store_for(&server)
        .download_export(&ProjectId::from("p1"), ExportFormat::Lrc)
        .await
        .unwrap();

    assert_eq!(payload.format, ExportFormat::Lrc);
    assert!(payload.bytes.starts_with(b"[ti:Song]"));
    assert_eq!(
        payload.content_type.as_deref(),
        Some("text/plain; charset=utf-8")
    );
}

#[tokio::test]
async fn health_returns_banner() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/")
        .with_status(200)
        .with_body(r#"{"message":"Karaoke Subtitles API"}"#)
        .create_async()
        .await;

    let banner = store_for(&server).health().await.unwrap();
    assert_eq!(banner, "Karaoke Subtitles API");
}

#[tokio::test]
async fn unreachable_store_is_unavailable() {
    let store = HttpAlignmentStore::with_client(reqwest_client(), "http://127.0.0.1:9");
    let err = store.health().await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}
