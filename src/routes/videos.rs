//! # 동영상 라우트 핸들러
//!
//! - `GET /api/v1/videos/{id}` → 동영상 조회
//!
//! 응답의 `folder` 필드는 동영상 행에 복제된 미러이므로 폴더 테이블을 읽지 않습니다.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::{db, error::AppError, routes::folders::AppState, services::validation};

pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = validation::parse_id(&id)?;
    let video = db::get_video(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("video"))?;
    Ok(Json(json!({ "success": true, "video": video })))
}
