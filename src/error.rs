//! # 에러 처리 모듈
//!
//! 요청 처리 중 발생할 수 있는 모든 에러를 하나의 `AppError`로 통합합니다.
//!
//! 에러 분류:
//! - 잘못된 ID 형식 (`InvalidId`)
//! - 존재하지 않는 엔티티 (`NotFound`)
//! - 필드 값 검증 실패 (`Validation`)
//! - 불변식 위반: 기본 폴더 삭제, 중복 북마크, 비공개 폴더 복사 등 (`Invariant`)
//! - 예상하지 못한 저장소/내부 오류 (`Database`, `Migrate`, `Internal`)
//!
//! 어떤 에러든 클라이언트에는 HTTP 400과 `{ "err": "..." }` 본문으로 전달됩니다.
//! 별도의 404 상태는 없습니다.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
#[derive(Debug, Error)]
pub enum AppError {
    /// ID 문자열이 UUID 형식이 아님
    #[error("not a valid id.")]
    InvalidId,

    /// 형식은 올바르지만 해당 엔티티가 없음. 필드는 엔티티 이름 ("folder", "user" 등)
    #[error("{0} not found.")]
    NotFound(&'static str),

    /// 요청 필드의 모양/범위가 잘못됨
    #[error("{0}")]
    Validation(String),

    /// 정책/불변식 위반
    #[error("{0}")]
    Invariant(String),

    /// #[from]: sqlx 함수에서 `?`를 쓰면 자동으로 이 variant로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        AppError::Invariant(msg.into())
    }
}

/// 요청 본문/쿼리 파싱 실패도 검증 에러와 같은 경로로 보냅니다.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 저장소/내부 에러는 실제 내용을 로그에만 남기고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let message = match self {
            AppError::InvalidId
            | AppError::NotFound(_)
            | AppError::Validation(_)
            | AppError::Invariant(_) => self.to_string(),
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                "a database error occurred.".to_string()
            }
            AppError::Migrate(ref e) => {
                tracing::error!("Migration error: {}", e);
                "a database error occurred.".to_string()
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                "an internal error occurred.".to_string()
            }
        };

        // 결과: { "err": "folder not found." }
        (StatusCode::BAD_REQUEST, Json(json!({ "err": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_of(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn client_errors_carry_their_message() {
        let (status, body) = body_of(AppError::NotFound("folder")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["err"], "folder not found.");

        let (_, body) = body_of(AppError::invariant("already default folder.")).await;
        assert_eq!(body["err"], "already default folder.");
    }

    #[tokio::test]
    async fn storage_errors_are_masked() {
        let (status, body) = body_of(AppError::Database(sqlx::Error::RowNotFound)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["err"], "a database error occurred.");
    }
}
