//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 서비스 계층(services/)에서 이 모듈의 함수를 호출합니다.
//!
//! 각 하위 모듈:
//! - `folders`: 폴더 CRUD, 조건부 플래그 토글, FTS5 검색
//! - `videos`: 동영상 조회/삽입과 폴더 미러 전파 UPDATE
//! - `users`: 소유자 존재 확인용 사용자 쿼리

pub mod folders;
pub mod users;
pub mod videos;

pub use folders::*;
pub use videos::*;

use sqlx::SqlitePool;

use crate::error::AppError;

/// 아직 적용되지 않은 마이그레이션을 순서대로 실행합니다.
pub async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// 테스트용 인메모리 DB. 연결이 하나뿐이라 풀과 트랜잭션을 동시에 잡으면 안 됩니다.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    migrate(&pool).await.expect("migrations");
    pool
}
