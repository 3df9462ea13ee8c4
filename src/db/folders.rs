//! # 폴더 데이터베이스 쿼리 모듈
//!
//! `folders` 테이블과 `folders_fts` 검색 인덱스에 대한 쿼리 함수들입니다.
//!
//! 단일 쿼리 함수는 `Executor`를 제네릭으로 받아
//! `&SqlitePool`과 트랜잭션(`&mut *tx`) 양쪽에서 호출할 수 있습니다.
//! 여러 문장을 실행하는 함수는 `&mut SqliteConnection`을 받습니다.
//!
//! 플래그 토글(북마크, 기본 폴더)은 "현재 값이 일치할 때만 바꾸는" 조건부 UPDATE입니다.
//! `rows_affected()`가 0이면 다른 요청이 먼저 바꿨거나 이미 그 상태라는 뜻입니다.

use sqlx::{types::Json, Executor, Sqlite, SqliteConnection};

use crate::error::AppError;
use crate::models::*;

const FOLDER_COLUMNS: &str = "id, owner_id, name, source_id, sharing_level, tags, is_default, \
     is_bookmarked, shared_count, videos, created_at, updated_at";

const TOUCH_UPDATED_AT: &str = "updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

fn order_by(sort: FolderSort) -> &'static str {
    match sort {
        FolderSort::NameAsc => "name ASC, id ASC",
        FolderSort::NameDesc => "name DESC, id DESC",
        FolderSort::MostShared => "shared_count DESC, created_at DESC, id DESC",
        FolderSort::MostRecent => "created_at DESC, id DESC",
    }
}

pub async fn get_folder<'e, E>(executor: E, id: &str) -> Result<Option<Folder>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let folder = sqlx::query_as::<_, Folder>(&format!(
        "SELECT {FOLDER_COLUMNS} FROM folders WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(folder)
}

/// 공유 수준이 `min_level` 이상인 폴더만 ID로 조회합니다 (키워드가 ID일 때의 검색).
pub async fn get_shared_folder<'e, E>(
    executor: E,
    id: &str,
    min_level: SharingLevel,
) -> Result<Option<Folder>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let folder = sqlx::query_as::<_, Folder>(&format!(
        "SELECT {FOLDER_COLUMNS} FROM folders WHERE id = ? AND sharing_level >= ?"
    ))
    .bind(id)
    .bind(i64::from(min_level))
    .fetch_optional(executor)
    .await?;

    Ok(folder)
}

/// 공개(sharing_level = 3) 폴더 목록
pub async fn list_public_folders<'e, E>(
    executor: E,
    sort: FolderSort,
) -> Result<Vec<Folder>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let folders = sqlx::query_as::<_, Folder>(&format!(
        "SELECT {FOLDER_COLUMNS} FROM folders WHERE sharing_level = ? ORDER BY {}",
        order_by(sort)
    ))
    .bind(i64::from(SharingLevel::Public))
    .fetch_all(executor)
    .await?;

    Ok(folders)
}

/// FTS5 MATCH 식으로 공개 폴더를 검색합니다.
///
/// `match_expr`는 호출하는 쪽에서 만든 FTS5 질의식입니다
/// (`services::folders::fts_query()` 참고).
pub async fn search_public_folders<'e, E>(
    executor: E,
    match_expr: &str,
    sort: FolderSort,
) -> Result<Vec<Folder>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let folders = sqlx::query_as::<_, Folder>(&format!(
        r#"
        SELECT {FOLDER_COLUMNS}
        FROM folders
        WHERE sharing_level = ?
          AND id IN (SELECT folder_id FROM folders_fts WHERE folders_fts MATCH ?)
        ORDER BY {}
        "#,
        order_by(sort)
    ))
    .bind(i64::from(SharingLevel::Public))
    .bind(match_expr)
    .fetch_all(executor)
    .await?;

    Ok(folders)
}

pub async fn find_default_folder<'e, E>(
    executor: E,
    owner_id: &str,
) -> Result<Option<Folder>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let folder = sqlx::query_as::<_, Folder>(&format!(
        "SELECT {FOLDER_COLUMNS} FROM folders WHERE owner_id = ? AND is_default = 1"
    ))
    .bind(owner_id)
    .fetch_optional(executor)
    .await?;

    Ok(folder)
}

pub async fn count_default_folders<'e, E>(executor: E, owner_id: &str) -> Result<i64, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM folders WHERE owner_id = ? AND is_default = 1")
            .bind(owner_id)
            .fetch_one(executor)
            .await?;

    Ok(count)
}

pub async fn insert_folder<'e, E>(executor: E, folder: &NewFolder) -> Result<(), AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO folders (id, owner_id, name, source_id, sharing_level, tags, is_default, videos)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&folder.id)
    .bind(&folder.owner_id)
    .bind(&folder.name)
    .bind(&folder.source_id)
    .bind(i64::from(folder.sharing_level))
    .bind(Json(&folder.tags))
    .bind(folder.is_default)
    .bind(Json(&folder.videos))
    .execute(executor)
    .await?;

    Ok(())
}

/// 요청에 들어온 필드만 개별 UPDATE로 반영합니다.
///
/// # 반환값
/// - `false`: 해당 ID의 폴더가 없음
pub async fn update_folder_fields(
    conn: &mut SqliteConnection,
    id: &str,
    fields: &FolderFields,
) -> Result<bool, AppError> {
    let mut touched = 0;

    if let Some(name) = &fields.name {
        touched += sqlx::query(&format!(
            "UPDATE folders SET name = ?, {TOUCH_UPDATED_AT} WHERE id = ?"
        ))
        .bind(name)
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }

    if let Some(level) = fields.sharing_level {
        touched += sqlx::query(&format!(
            "UPDATE folders SET sharing_level = ?, {TOUCH_UPDATED_AT} WHERE id = ?"
        ))
        .bind(i64::from(level))
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }

    if let Some(tags) = &fields.tags {
        touched += sqlx::query(&format!(
            "UPDATE folders SET tags = ?, {TOUCH_UPDATED_AT} WHERE id = ?"
        ))
        .bind(Json(tags))
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }

    Ok(touched > 0)
}

/// 내장 동영상 스냅샷 목록 전체를 교체합니다.
pub async fn replace_folder_videos<'e, E>(
    executor: E,
    id: &str,
    videos: &[VideoSnapshot],
) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(&format!(
        "UPDATE folders SET videos = ?, {TOUCH_UPDATED_AT} WHERE id = ?"
    ))
    .bind(Json(videos))
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 기본 폴더가 아닌 폴더만 삭제합니다.
pub async fn delete_folder<'e, E>(executor: E, id: &str) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM folders WHERE id = ? AND is_default = 0")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 북마크 플래그가 `!bookmarked`일 때만 `bookmarked`로 바꿉니다.
pub async fn set_bookmark<'e, E>(executor: E, id: &str, bookmarked: bool) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(&format!(
        "UPDATE folders SET is_bookmarked = ?, {TOUCH_UPDATED_AT} WHERE id = ? AND is_bookmarked = ?"
    ))
    .bind(bookmarked)
    .bind(id)
    .bind(!bookmarked)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 기본 폴더 플래그가 `!is_default`일 때만 `is_default`로 바꿉니다.
pub async fn set_default_flag<'e, E>(executor: E, id: &str, is_default: bool) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(&format!(
        "UPDATE folders SET is_default = ?, {TOUCH_UPDATED_AT} WHERE id = ? AND is_default = ?"
    ))
    .bind(is_default)
    .bind(id)
    .bind(!is_default)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn increment_shared_count<'e, E>(executor: E, id: &str) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE folders SET shared_count = shared_count + 1 WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
