use std::sync::Arc;

use super::*;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Clone)]
struct ServerState {
    tx: Arc<Mutex<Option<oneshot::Sender<Value>>>>,
    reply_status: StatusCode,
    reply: Value,
}

async fn handle_capture(
    State(state): State<ServerState>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(payload);
    }
    (state.reply_status, Json(state.reply.clone()))
}

async fn handle_reply(State(state): State<ServerState>) -> (StatusCode, Json<Value>) {
    (state.reply_status, Json(state.reply.clone()))
}

async fn serve(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn spawn_post_server(
    path: &str,
    reply_status: StatusCode,
    reply: Value,
) -> (String, oneshot::Receiver<Value>) {
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        tx: Arc::new(Mutex::new(Some(tx))),
        reply_status,
        reply,
    };
    let app = Router::new()
        .route(path, post(handle_capture))
        .with_state(state);
    (serve(app).await, rx)
}

async fn spawn_get_server(path: &str, reply_status: StatusCode, reply: Value) -> String {
    let state = ServerState {
        tx: Arc::new(Mutex::new(None)),
        reply_status,
        reply,
    };
    let app = Router::new().route(path, get(handle_reply)).with_state(state);
    serve(app).await
}

fn backend_for(server_url: &str) -> HttpStoryBackend {
    HttpStoryBackend::new(Url::parse(server_url).expect("server url"))
}

#[tokio::test]
async fn check_config_reports_unconfigured_service() {
    let server_url = spawn_get_server(
        "/api/check-config",
        StatusCode::OK,
        json!({ "configured": false, "message": "Please set AI_API_KEY environment variable" }),
    )
    .await;

    let status = backend_for(&server_url)
        .check_config()
        .await
        .expect("check config");
    assert!(!status.configured);
    assert_eq!(
        status.message.as_deref(),
        Some("Please set AI_API_KEY environment variable")
    );
}

#[tokio::test]
async fn list_cultures_decodes_tags() {
    let server_url = spawn_get_server(
        "/api/cultures",
        StatusCode::OK,
        json!({ "cultures": ["indian", "celtic"] }),
    )
    .await;

    let cultures = backend_for(&server_url)
        .list_cultures()
        .await
        .expect("cultures");
    assert_eq!(
        cultures,
        vec![CultureTag::from("indian"), CultureTag::from("celtic")]
    );
}

#[tokio::test]
async fn generate_story_posts_prompt_and_culture() {
    let (server_url, body_rx) = spawn_post_server(
        "/api/generate-story",
        StatusCode::OK,
        json!({
            "title": "The Moon Rabbit",
            "story": "Long ago.\n\nThe end.",
            "moral": "Give freely",
            "culture": "japanese",
            "scenes": ["a rabbit", "the moon"]
        }),
    )
    .await;

    let story = backend_for(&server_url)
        .generate_story(&GenerateStoryRequest {
            prompt: "a rabbit on the moon".into(),
            culture: CultureTag::from("japanese"),
        })
        .await
        .expect("story");

    assert_eq!(story.display_title(), "The Moon Rabbit");
    assert_eq!(story.scenes, vec!["a rabbit", "the moon"]);
    assert_eq!(
        body_rx.await.expect("request body"),
        json!({ "prompt": "a rabbit on the moon", "culture": "japanese" })
    );
}

#[tokio::test]
async fn error_status_uses_error_field_message() {
    let (server_url, _body_rx) = spawn_post_server(
        "/api/generate-story",
        StatusCode::BAD_REQUEST,
        json!({ "error": "Please provide a story prompt" }),
    )
    .await;

    let err = backend_for(&server_url)
        .generate_story(&GenerateStoryRequest {
            prompt: " ".into(),
            culture: CultureTag::from("indian"),
        })
        .await
        .expect_err("status error");

    assert_eq!(err.status_code(), Some(400));
    assert_eq!(err.alert_message(), "Error: Please provide a story prompt");
}

#[tokio::test]
async fn error_status_without_message_falls_back_per_operation() {
    let (server_url, _body_rx) =
        spawn_post_server("/api/generate-audio", StatusCode::INTERNAL_SERVER_ERROR, json!({}))
            .await;

    let err = backend_for(&server_url)
        .generate_audio(&GenerateAudioRequest {
            text: "Once upon a time".into(),
            title: Some("Tale".into()),
        })
        .await
        .expect_err("status error");

    assert!(matches!(err, ClientError::Status { status: 500, .. }));
    assert_eq!(err.to_string(), "Failed to generate audio");
}

#[tokio::test]
async fn error_field_in_success_body_is_application_error() {
    let (server_url, _body_rx) = spawn_post_server(
        "/api/generate-story",
        StatusCode::OK,
        json!({
            "title": "Story Generation Error",
            "story": "Unable to generate story: model unavailable",
            "scenes": [],
            "moral": "",
            "culture": "greek",
            "error": true
        }),
    )
    .await;

    let err = backend_for(&server_url)
        .generate_story(&GenerateStoryRequest {
            prompt: "a hero".into(),
            culture: CultureTag::from("greek"),
        })
        .await
        .expect_err("application error");

    assert!(matches!(err, ClientError::Application(_)));
    assert_eq!(
        err.to_string(),
        "Unable to generate story: model unavailable"
    );
}

#[tokio::test]
async fn video_request_echoes_the_story_body_verbatim() {
    let served = json!({
        "title": "T",
        "story": "s",
        "moral": null,
        "culture": "greek",
        "narrator": "elder"
    });
    let (story_url, _story_rx) =
        spawn_post_server("/api/generate-story", StatusCode::OK, served.clone()).await;
    let (video_url, video_rx) = spawn_post_server(
        "/api/generate-video",
        StatusCode::OK,
        json!({ "success": true, "video_url": "/outputs/t.mp4", "audio_url": "/outputs/t.mp3" }),
    )
    .await;

    let story = backend_for(&story_url)
        .generate_story(&GenerateStoryRequest {
            prompt: "a hero".into(),
            culture: CultureTag::from("greek"),
        })
        .await
        .expect("story");
    assert!(story.moral_text().is_none());

    let video = backend_for(&video_url)
        .generate_video(&story)
        .await
        .expect("video");
    assert_eq!(video.video_url.as_deref(), Some("/outputs/t.mp4"));
    assert_eq!(video.audio_url.as_deref(), Some("/outputs/t.mp3"));

    assert_eq!(video_rx.await.expect("request body"), served);
}

#[tokio::test]
async fn locally_built_story_is_sent_without_invented_fields() {
    let (server_url, body_rx) = spawn_post_server(
        "/api/generate-video",
        StatusCode::OK,
        json!({ "video_url": "/outputs/fox.mp4" }),
    )
    .await;

    let story = StoryResult {
        culture: CultureTag::from("chinese"),
        title: Some("Fox".into()),
        story: "A fox.".into(),
        ..StoryResult::default()
    };
    backend_for(&server_url)
        .generate_video(&story)
        .await
        .expect("video");

    assert_eq!(
        body_rx.await.expect("request body"),
        json!({ "culture": "chinese", "title": "Fox", "story": "A fox." })
    );
}

#[tokio::test]
async fn missing_audio_url_is_decode_error() {
    let (server_url, _body_rx) =
        spawn_post_server("/api/generate-audio", StatusCode::OK, json!({ "success": true }))
            .await;

    let err = backend_for(&server_url)
        .generate_audio(&GenerateAudioRequest {
            text: "text".into(),
            title: None,
        })
        .await
        .expect_err("decode error");
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn non_json_error_page_keeps_status_and_fallback() {
    let app = Router::new().route(
        "/api/generate-video",
        post(|| async { (StatusCode::BAD_GATEWAY, "<html>bad gateway</html>") }),
    );
    let server_url = serve(app).await;

    let err = backend_for(&server_url)
        .generate_video(&StoryResult::default())
        .await
        .expect_err("status error");
    assert_eq!(err.status_code(), Some(502));
    assert_eq!(err.to_string(), "Failed to generate video");
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let err = backend_for(&format!("http://{addr}"))
        .check_config()
        .await
        .expect_err("transport error");
    assert!(err.is_transport());
}

#[tokio::test]
async fn endpoints_are_joined_under_a_path_prefix() {
    let state = ServerState {
        tx: Arc::new(Mutex::new(None)),
        reply_status: StatusCode::OK,
        reply: json!({ "configured": true }),
    };
    let app = Router::new()
        .route("/storyteller/api/check-config", get(handle_reply))
        .with_state(state);
    let server_url = serve(app).await;

    let backend = backend_for(&format!("{server_url}/storyteller"));
    assert!(backend.server_url().path().ends_with("/storyteller/"));
    let status = backend.check_config().await.expect("check config");
    assert!(status.configured);
    assert_eq!(backend.media_base(), Some(backend.server_url()));
}
