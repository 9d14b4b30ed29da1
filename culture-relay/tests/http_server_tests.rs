//! HTTP server and routing integration tests

mod helpers;

use axum::body::Body;
use axum::extract::Multipart;
use axum::http::{Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use culture_relay::build_router;
use culture_relay::db::records::{find_by_session, insert_upload, NewUploadRecord};
use helpers::{form_request, segment, test_app_state, MultipartBody, StubSegmenter};

const UNUSED_COLOR_ENDPOINT: &str = "http://127.0.0.1:9/color";

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn upload_form(session_id: &str, declared_type: &str) -> MultipartBody {
    MultipartBody::new()
        .file("image", "photo.png", b"raw image")
        .text("uuid", session_id)
        .text("type", declared_type)
        .text("targetword", "vase")
}

#[tokio::test]
async fn test_health_reports_module() {
    let (_dir, state) = test_app_state(StubSegmenter::Succeed(vec![]), UNUSED_COLOR_ENDPOINT).await;
    let app = build_router(state);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "culture-relay");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_upload_returns_segmented_images() {
    let segmenter = StubSegmenter::Succeed(vec![
        segment("mask_0.png", "UE5HREFUQQ=="),
        segment("mask_1.png", "AAEC"),
    ]);
    let (dir, state) = test_app_state(segmenter, UNUSED_COLOR_ENDPOINT).await;
    let db = state.db.clone();
    let app = build_router(state);

    let response = app
        .oneshot(upload_form("abc123", "segment").into_request("/upload"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body,
        json!({
            "uuid": "abc123",
            "segmented_images": [
                {"filename": "mask_0.png", "base64_data": "UE5HREFUQQ=="},
                {"filename": "mask_1.png", "base64_data": "AAEC"}
            ]
        })
    );

    let output = dir.path().join("uploaded_images/segment/abc123/output");
    assert_eq!(std::fs::read(output.join("mask_0.png")).unwrap(), b"PNGDATA");
    assert_eq!(std::fs::read(output.join("mask_1.png")).unwrap(), [0u8, 1, 2]);

    let records = find_by_session(&db, "abc123").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].category, "segment");
}

#[tokio::test]
async fn test_upload_segmentation_failure_is_500_without_record() {
    let (_dir, state) =
        test_app_state(StubSegmenter::FailWithStatus(503), UNUSED_COLOR_ENDPOINT).await;
    let db = state.db.clone();
    let app = build_router(state);

    let response = app
        .oneshot(upload_form("abc123", "annotation").into_request("/upload"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Failed to call segmentation API"})
    );
    assert!(find_by_session(&db, "abc123").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_missing_field_is_400_without_side_effects() {
    let (dir, state) = test_app_state(StubSegmenter::Succeed(vec![]), UNUSED_COLOR_ENDPOINT).await;
    let app = build_router(state);

    let request = MultipartBody::new()
        .file("image", "photo.png", b"raw image")
        .text("uuid", "abc123")
        .text("type", "segment")
        .into_request("/upload");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("targetword"));
    assert!(!dir.path().join("uploaded_images").exists());
}

#[tokio::test]
async fn test_upload_rejects_traversing_session_id() {
    let (dir, state) = test_app_state(StubSegmenter::Succeed(vec![]), UNUSED_COLOR_ENDPOINT).await;
    let app = build_router(state);

    let response = app
        .oneshot(upload_form("..", "segment").into_request("/upload"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!dir.path().join("uploaded_images").exists());
}

#[tokio::test]
async fn test_comment_second_rating_gets_domain_400() {
    let (_dir, state) = test_app_state(StubSegmenter::Succeed(vec![]), UNUSED_COLOR_ENDPOINT).await;
    let db = state.db.clone();
    insert_upload(
        &db,
        &NewUploadRecord {
            category: "segment".to_string(),
            session_id: "abc123".to_string(),
            segmented_at: "2024-05-01 10:00:00".to_string(),
            output_path: "uploaded_images/segment/abc123/output".to_string(),
        },
    )
    .await
    .unwrap();
    let app = build_router(state);

    let feedback = || {
        MultipartBody::new()
            .text("uuid", "abc123")
            .text("speedRating", "5")
            .text("effectivenessRating", "4")
            .text("feedbackText", "great")
            .into_request("/comment")
    };

    let first = app.clone().oneshot(feedback()).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(json_body(first).await["code"], 200);

    let second = app.oneshot(feedback()).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(json_body(second).await["code"], 400);

    let record = &find_by_session(&db, "abc123").await.unwrap()[0];
    assert_eq!(record.speed_rating.as_deref(), Some("5"));
    assert_eq!(record.feedback_text.as_deref(), Some("great"));
}

#[tokio::test]
async fn test_comment_accepts_urlencoded_body() {
    let (_dir, state) = test_app_state(StubSegmenter::Succeed(vec![]), UNUSED_COLOR_ENDPOINT).await;
    let app = build_router(state);

    let response = app
        .oneshot(form_request(
            "/comment",
            "uuid=nobody&speedRating=3&effectivenessRating=3&feedbackText=fine",
        ))
        .await
        .unwrap();

    // unknown session still answers success
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"code": 200, "message": "Feedback recorded"})
    );
}

#[tokio::test]
async fn test_comment_missing_rating_is_400() {
    let (_dir, state) = test_app_state(StubSegmenter::Succeed(vec![]), UNUSED_COLOR_ENDPOINT).await;
    let app = build_router(state);

    let response = app
        .oneshot(form_request("/comment", "uuid=abc&feedbackText=fine"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

async fn spawn_color_service(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/color", addr)
}

#[tokio::test]
async fn test_get_colors_passes_remote_json_through() {
    let color_service = Router::new().route(
        "/color",
        post(|mut multipart: Multipart| async move {
            let mut count = String::new();
            let mut image_len = 0;
            while let Some(field) = multipart.next_field().await.unwrap() {
                let name = field.name().map(str::to_string);
                match name.as_deref() {
                    Some("count") => count = field.text().await.unwrap(),
                    Some("image") => image_len = field.bytes().await.unwrap().len(),
                    _ => {}
                }
            }
            Json(json!({"count": count, "image_len": image_len, "colors": ["#aa3311"]}))
        }),
    );
    let endpoint = spawn_color_service(color_service).await;
    let (_dir, state) = test_app_state(StubSegmenter::Succeed(vec![]), &endpoint).await;
    let app = build_router(state);

    let request = MultipartBody::new()
        .file("image", "swatch.png", b"12345")
        .text("count", "3")
        .into_request("/get_colors");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"count": "3", "image_len": 5, "colors": ["#aa3311"]})
    );
}

#[tokio::test]
async fn test_get_colors_remote_failure_is_502() {
    let color_service = Router::new().route(
        "/color",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let endpoint = spawn_color_service(color_service).await;
    let (_dir, state) = test_app_state(StubSegmenter::Succeed(vec![]), &endpoint).await;
    let app = build_router(state);

    let request = MultipartBody::new()
        .file("image", "swatch.png", b"12345")
        .text("count", "3")
        .into_request("/get_colors");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Failed to call color API"})
    );
}

#[tokio::test]
async fn test_get_colors_relays_remote_json_error() {
    let color_service = Router::new().route(
        "/color",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"msg": "count too large"})),
            )
        }),
    );
    let endpoint = spawn_color_service(color_service).await;
    let (_dir, state) = test_app_state(StubSegmenter::Succeed(vec![]), &endpoint).await;
    let app = build_router(state);

    let request = MultipartBody::new()
        .file("image", "swatch.png", b"12345")
        .text("count", "500")
        .into_request("/get_colors");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({"msg": "count too large"}));
}

#[tokio::test]
async fn test_get_colors_forwards_count_untouched() {
    let color_service = Router::new().route(
        "/color",
        post(|mut multipart: Multipart| async move {
            let mut count = None;
            while let Some(field) = multipart.next_field().await.unwrap() {
                if field.name() == Some("count") {
                    count = Some(field.text().await.unwrap());
                }
            }
            Json(json!({ "received": count }))
        }),
    );
    let endpoint = spawn_color_service(color_service).await;
    let (_dir, state) = test_app_state(StubSegmenter::Succeed(vec![]), &endpoint).await;
    let app = build_router(state);

    for raw in ["0", "5.0", ""] {
        let request = MultipartBody::new()
            .file("image", "swatch.png", b"12345")
            .text("count", raw)
            .into_request("/get_colors");
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK, "count {:?}", raw);
        assert_eq!(json_body(response).await, json!({ "received": raw }));
    }
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (_dir, state) = test_app_state(StubSegmenter::Succeed(vec![]), UNUSED_COLOR_ENDPOINT).await;
    let app = build_router(state);

    let response = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
