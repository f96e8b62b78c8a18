mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::app::{spawn_test_app, spawn_test_app_with_limits};
use common::fixtures::{face_landmarks, frame, steady_frames};
use common::http::{assert_api_error, assert_api_ok, call, read_reply, send};

#[tokio::test]
async fn it_single_frame_updates_live_metrics() {
    let app = spawn_test_app().await;
    call(&app.app, Method::POST, "/api/session/start", None).await;

    let (status, body) = call(&app.app, Method::POST, "/api/frames", Some(frame(0.0, 140.0))).await;
    assert_api_ok(status, &body);
    assert_eq!(body["data"]["accepted"], 1);
    assert_eq!(body["data"]["recorded"], 1);
    // 会话第一帧没有可比较的上一帧
    assert_eq!(body["data"]["latest"]["metrics"]["symmetryPercent"], 0);
    assert_eq!(body["data"]["latest"]["metrics"]["velocityMmPerSec"], 0.0);

    let (_, body) = call(&app.app, Method::POST, "/api/frames", Some(frame(50.0, 140.0))).await;
    assert_eq!(body["data"]["latest"]["metrics"]["symmetryPercent"], 100);

    // 左眼向内移动 10px，右眼不动：单眼运动，对称指数为 0
    let moved = json!({
        "timestamp": 100.0,
        "leftIrisX": (640.0 + 70.0 - 10.0) / 1280.0,
        "rightIrisX": (640.0 - 70.0) / 1280.0,
        "videoWidth": 1280,
        "frameHeight": 720,
    });
    let (status, _) = call(&app.app, Method::POST, "/api/frames", Some(moved)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app.app, Method::GET, "/api/metrics/live", None).await;
    assert_eq!(body["data"]["symmetry"], 0);
    assert!(body["data"]["velocity"].as_f64().unwrap() > 1.0);
    assert!(body["data"]["latest"]["v"].as_f64().unwrap() < 0.0);
}

#[tokio::test]
async fn it_invalid_single_frame_is_rejected() {
    let app = spawn_test_app().await;
    let mut bad = frame(0.0, 140.0);
    bad["frameWidth"] = json!(0);

    let (status, body) = call(&app.app, Method::POST, "/api/frames", Some(bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_api_error(&body, "INVALID_FRAME_DIMENSIONS");

    let (_, body) = call(&app.app, Method::GET, "/api/session", None).await;
    assert_eq!(body["data"]["framesRejected"], 1);
    assert_eq!(body["data"]["framesProcessed"], 0);
}

#[tokio::test]
async fn it_batch_reports_rejections_without_failing() {
    let app = spawn_test_app().await;
    let mut frames = steady_frames(3, 0.0, 140.0);
    frames[1]["frameHeight"] = json!(0);

    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/frames",
        Some(json!({ "frames": frames })),
    )
    .await;
    assert_api_ok(status, &body);
    assert_eq!(body["data"]["accepted"], 2);
    let rejected = body["data"]["rejected"].as_array().unwrap();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0]["index"], 1);
    assert_eq!(rejected[0]["code"], "INVALID_FRAME_DIMENSIONS");
}

#[tokio::test]
async fn it_batch_size_is_capped() {
    let app = spawn_test_app_with_limits(4, 8).await;

    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/frames",
        Some(json!({ "frames": steady_frames(5, 0.0, 140.0) })),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_api_error(&body, "PAYLOAD_TOO_LARGE");

    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/frames",
        Some(json!({ "frames": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_api_error(&body, "EMPTY_BATCH");
}

#[tokio::test]
async fn it_malformed_body_is_wrapped_as_json_error() {
    let app = spawn_test_app().await;
    let resp = send(
        &app.app,
        Method::POST,
        "/api/frames",
        Some(json!({ "timestamp": "soon" })),
    )
    .await;
    let reply = read_reply(resp).await;
    assert!(reply.status.is_client_error());
    assert_eq!(reply.body["success"], false);
    assert_eq!(reply.body["traceId"], reply.request_id.expect("request id header"));
}

#[tokio::test]
async fn it_history_is_bounded() {
    let app = spawn_test_app().await;
    call(&app.app, Method::POST, "/api/session/start", None).await;
    for chunk in 0..3 {
        let frames = steady_frames(60, chunk as f64 * 60.0 * 33.0, 140.0);
        let (status, _) = call(
            &app.app,
            Method::POST,
            "/api/frames",
            Some(json!({ "frames": frames })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = call(&app.app, Method::GET, "/api/metrics/history", None).await;
    assert_eq!(body["data"]["capacity"], 100);
    let points = body["data"]["points"].as_array().unwrap();
    assert_eq!(points.len(), 100);
    assert_eq!(points[99]["t"], 179.0 * 33.0);
}

#[tokio::test]
async fn it_history_survives_idle_frames_after_stop() {
    let app = spawn_test_app().await;
    call(&app.app, Method::POST, "/api/session/start", None).await;
    call(
        &app.app,
        Method::POST,
        "/api/frames",
        Some(json!({ "frames": steady_frames(20, 0.0, 140.0) })),
    )
    .await;
    call(&app.app, Method::POST, "/api/session/stop", None).await;

    let (status, _) = call(
        &app.app,
        Method::POST,
        "/api/frames",
        Some(json!({ "frames": steady_frames(120, 1000.0, 140.0) })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app.app, Method::GET, "/api/metrics/history", None).await;
    assert_eq!(body["data"]["points"].as_array().unwrap().len(), 100);
    let session_points = body["data"]["sessionPoints"].as_array().unwrap();
    assert_eq!(session_points.len(), 20);
    assert_eq!(session_points[19]["t"], 19.0 * 33.0);
}

#[tokio::test]
async fn it_landmarks_are_reduced_to_iris_centers() {
    let app = spawn_test_app().await;

    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/landmarks",
        Some(json!({
            "timestamp": 0.0,
            "width": 1280,
            "height": 720,
            "landmarks": face_landmarks(0.55, 0.45),
        })),
    )
    .await;
    assert_api_ok(status, &body);
    assert_eq!(body["data"]["detected"], true);
    let pd = body["data"]["report"]["pdMm"].as_f64().unwrap();
    assert!((pd - 0.1 * 1280.0 * 0.45).abs() < 1e-6, "pd {pd}");
}

#[tokio::test]
async fn it_short_landmark_set_counts_as_no_detection() {
    let app = spawn_test_app().await;

    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/landmarks",
        Some(json!({
            "timestamp": 0.0,
            "width": 1280,
            "height": 720,
            "landmarks": [{ "x": 0.5, "y": 0.5, "z": 0.0 }],
        })),
    )
    .await;
    assert_api_ok(status, &body);
    assert_eq!(body["data"]["detected"], false);
    assert!(body["data"]["report"].is_null());

    let (_, body) = call(&app.app, Method::GET, "/api/session", None).await;
    assert_eq!(body["data"]["framesProcessed"], 0);
}
