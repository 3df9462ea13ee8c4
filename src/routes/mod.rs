//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수와, 이들을 `/api/v1` 아래로 묶는 라우터를 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `folders`: 폴더 CRUD, 북마크, 복사, 기본 폴더 지정
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `users`: 사용자 등록/조회
//! - `videos`: 동영상 조회

pub mod folders;
pub mod health;
pub mod users;
pub mod videos;

pub use folders::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// 전체 API 라우터를 만듭니다. 경로 파라미터는 axum 0.8의 `{id}` 문법을 씁니다.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/users", post(users::create_user))
        .route("/users/{id}", get(users::get_user))
        .route("/folders", get(folders::list_folders).post(folders::create_folder))
        .route(
            "/folders/{id}",
            get(folders::get_folder)
                .patch(folders::update_folder)
                .delete(folders::delete_folder),
        )
        .route("/folders/{id}/bookmark", post(folders::bookmark_folder))
        .route("/folders/{id}/unbookmark", post(folders::unbookmark_folder))
        .route("/folders/{id}/copy", post(folders::copy_folder))
        .route("/folders/{id}/setAsDefault", post(folders::set_default_folder))
        .route("/videos/{id}", get(videos::get_video))
        .route("/health", get(health::health_check))
        .with_state(state);

    // 개발 환경 기준으로 모든 출처를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> Router {
        let pool = db::test_pool().await;
        router(AppState {
            pool,
            default_folder_name: "Default".to_string(),
        })
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn register(app: &Router, username: &str) -> Value {
        let (status, body) =
            send(app, Method::POST, "/api/v1/users", Some(json!({ "username": username }))).await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    #[tokio::test]
    async fn health_check_responds_ok() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn create_folder_returns_folder_with_mirrored_videos() {
        let app = app().await;
        let user = register(&app, "mina").await;
        let user_id = user["user"]["id"].as_str().unwrap().to_string();

        let videos: Vec<Value> = (0..3)
            .map(|i| json!({ "title": format!("Track {i}"), "sourceId": format!("item-{i}"), "duration": 120 }))
            .collect();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/folders",
            Some(json!({
                "userId": user_id,
                "name": "Mix",
                "sharingLevel": 2,
                "tags": ["lofi"],
                "videos": videos,
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let folder = &body["folder"];
        assert_eq!(folder["name"], "Mix");
        assert_eq!(folder["sharingLevel"], 2);
        assert_eq!(folder["isDefault"], false);
        assert_eq!(folder["videos"].as_array().unwrap().len(), 3);

        let video_id = folder["videos"][0]["id"].as_str().unwrap();
        let (status, body) = send(&app, Method::GET, &format!("/api/v1/videos/{video_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["video"]["folder"]["_id"], folder["id"]);
        assert_eq!(body["video"]["folder"]["name"], "Mix");
        assert_eq!(body["video"]["folder"]["sharingLevel"], 2);
    }

    #[tokio::test]
    async fn set_as_default_on_current_default_is_rejected() {
        let app = app().await;
        let user = register(&app, "mina").await;
        let user_id = user["user"]["id"].as_str().unwrap();
        let default_id = user["defaultFolder"]["id"].as_str().unwrap();

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/folders/{default_id}/setAsDefault"),
            Some(json!({ "userId": user_id })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["err"], "already default folder.");
    }

    #[tokio::test]
    async fn invalid_id_and_unknown_folder_are_bad_requests() {
        let app = app().await;

        let (status, body) = send(&app, Method::GET, "/api/v1/folders/not-an-id", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["err"], "not a valid id.");

        let missing = uuid::Uuid::now_v7();
        let (status, body) = send(&app, Method::DELETE, &format!("/api/v1/folders/{missing}"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["err"], "folder not found.");
    }

    #[tokio::test]
    async fn malformed_body_and_query_use_error_shape() {
        let app = app().await;

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/folders")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["err"].is_string());

        let (status, body) = send(&app, Method::GET, "/api/v1/folders?sort=random", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["err"], "invalid sort option.");

        let (status, body) = send(&app, Method::GET, "/api/v1/folders?strict=maybe", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["err"].is_string());
    }

    #[tokio::test]
    async fn bookmark_toggle_round_trip() {
        let app = app().await;
        let user = register(&app, "mina").await;
        let folder_id = user["defaultFolder"]["id"].as_str().unwrap();

        let bookmark = format!("/api/v1/folders/{folder_id}/bookmark");
        let unbookmark = format!("/api/v1/folders/{folder_id}/unbookmark");

        let (status, body) = send(&app, Method::POST, &bookmark, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["folder"]["isBookmarked"], true);

        let (_, body) = send(&app, Method::POST, &bookmark, None).await;
        assert_eq!(body["err"], "already bookmarked.");

        let (_, body) = send(&app, Method::POST, &unbookmark, None).await;
        assert_eq!(body["folder"]["isBookmarked"], false);

        let (_, body) = send(&app, Method::POST, &unbookmark, None).await;
        assert_eq!(body["err"], "not bookmarked.");
    }
}
