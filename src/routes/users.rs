//! # 사용자 라우트 핸들러
//!
//! - `POST /api/v1/users`      → 사용자 등록 (기본 폴더가 함께 만들어짐)
//! - `GET  /api/v1/users/{id}` → 사용자 조회

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::{error::AppError, models::*, routes::folders::AppState, services};

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let (user, default_folder) =
        services::users::register_user(&state.pool, req, &state.default_folder_name).await?;
    Ok(Json(json!({
        "success": true,
        "user": user,
        "defaultFolder": default_folder,
    })))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user = services::users::get_user(&state.pool, &id).await?;
    Ok(Json(json!({ "success": true, "user": user })))
}
