//! # 폴더(Folder) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/v1/folders`                  → 공개 폴더 목록 / 키워드 검색
//! - `POST   /api/v1/folders`                  → 새 폴더 생성 (재생목록 가져오기 포함)
//! - `GET    /api/v1/folders/{id}`             → 단일 폴더 조회
//! - `PATCH  /api/v1/folders/{id}`             → 폴더 수정 (동영상 미러 전파)
//! - `DELETE /api/v1/folders/{id}`             → 폴더 삭제 (동영상은 기본 폴더로)
//! - `POST   /api/v1/folders/{id}/bookmark`    → 북마크
//! - `POST   /api/v1/folders/{id}/unbookmark`  → 북마크 해제
//! - `POST   /api/v1/folders/{id}/copy`        → 다른 사용자 계정으로 복사
//! - `POST   /api/v1/folders/{id}/setAsDefault`→ 기본 폴더 지정
//!
//! 성공 응답은 `{ "success": true, ... }`, 실패는 `AppError`가 `400 { "err": ... }`로 변환합니다.
//! 요청 본문 파싱 실패도 `Result<Json<T>, JsonRejection>`로 받아 같은 에러 경로로 보냅니다.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::{error::AppError, models::*, services};

/// 애플리케이션 공유 상태
///
/// 모든 핸들러가 `State(state): State<AppState>`로 접근합니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// 사용자 등록 시 만드는 기본 폴더 이름
    pub default_folder_name: String,
}

/// `GET /folders?keyword=&sort=&strict=`
pub async fn list_folders(
    State(state): State<AppState>,
    query: Result<Query<FolderListQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query?;
    let folders = services::folders::list_folders(&state.pool, &query).await?;
    Ok(Json(json!({ "success": true, "folders": folders })))
}

/// `POST /folders`
///
/// 요청 본문: `{ "userId", "name"?, "sharingLevel"?, "tags"?, "playlistName"?, "playlistId"?, "videos"? }`
pub async fn create_folder(
    State(state): State<AppState>,
    payload: Result<Json<CreateFolderRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let folder = services::folders::create_folder(&state.pool, req).await?;
    Ok(Json(json!({ "success": true, "folder": folder })))
}

pub async fn get_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let folder = services::folders::get_folder(&state.pool, &id).await?;
    Ok(Json(json!({ "success": true, "folder": folder })))
}

/// `PATCH /folders/{id}`: name/sharingLevel/tags 중 최소 하나가 필요합니다.
pub async fn update_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateFolderRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let folder = services::folders::update_folder(&state.pool, &id, &req).await?;
    Ok(Json(json!({ "success": true, "folder": folder })))
}

/// `DELETE /folders/{id}`: 삭제된 폴더를 돌려줍니다. 기본 폴더는 거부됩니다.
pub async fn delete_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let folder = services::folders::delete_folder(&state.pool, &id).await?;
    Ok(Json(json!({ "success": true, "folder": folder })))
}

pub async fn bookmark_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let folder = services::folders::set_bookmark(&state.pool, &id, true).await?;
    Ok(Json(json!({ "success": true, "folder": folder })))
}

pub async fn unbookmark_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let folder = services::folders::set_bookmark(&state.pool, &id, false).await?;
    Ok(Json(json!({ "success": true, "folder": folder })))
}

/// `POST /folders/{id}/copy`. 요청 본문: `{ "userId" }`
pub async fn copy_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserIdRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let outcome = services::copy::copy_folder(&state.pool, &id, req.user_id.as_deref()).await?;
    Ok(Json(json!({
        "success": true,
        "newFolder": outcome.new_folder,
        "newVideos": outcome.new_videos,
        "originFolder": outcome.origin_folder,
    })))
}

/// `POST /folders/{id}/setAsDefault`. 요청 본문: `{ "userId" }`
pub async fn set_default_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserIdRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let (new_default, old_default) =
        services::folders::set_default(&state.pool, &id, req.user_id.as_deref()).await?;
    Ok(Json(json!({
        "success": true,
        "newDefaultFolder": new_default,
        "oldDefaultFolder": old_default,
    })))
}
