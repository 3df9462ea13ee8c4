//! # 폴더 라이프사이클
//!
//! 폴더 생성, 조회, 수정, 삭제, 북마크, 기본 폴더 지정을 담당합니다.
//!
//! ## 불변식
//! - 사용자마다 `is_default = true`인 폴더는 정확히 하나입니다.
//!   (DB에도 부분 유니크 인덱스가 있고, `ensure_single_default()`로 한 번 더 확인합니다.)
//! - 기본 폴더는 삭제할 수 없습니다.
//! - 폴더의 name/sharingLevel이 바뀌면 그 폴더를 가리키는 모든 동영상 미러도 바뀝니다.
//!
//! 여러 행을 고치는 작업(생성, 수정+전파, 삭제+이동, 기본 폴더 교체)은
//! 하나의 트랜잭션으로 묶입니다. 중간에 실패하면 `tx`가 drop되면서 롤백됩니다.

use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::services::{mirror, validation};

/// 사용자의 기본 폴더가 정확히 하나인지 확인합니다.
pub async fn ensure_single_default(
    conn: &mut SqliteConnection,
    owner_id: &str,
) -> Result<(), AppError> {
    match db::count_default_folders(&mut *conn, owner_id).await? {
        1 => Ok(()),
        count => {
            tracing::warn!("User {} has {} default folders", owner_id, count);
            Err(AppError::invariant(format!(
                "user must have exactly one default folder (found {count})."
            )))
        }
    }
}

/// 키워드로 FTS5 질의식을 만듭니다.
///
/// - strict: 키워드 전체를 하나의 구(phrase)로: `"lofi beats"`
/// - 기본: 각 단어를 접두사 검색으로 OR: `"lofi"* OR "beats"*`
///
/// 쓸 수 있는 단어가 하나도 없으면 `None`입니다.
pub fn fts_query(keyword: &str, strict: bool) -> Option<String> {
    let terms: Vec<String> = keyword
        .split_whitespace()
        .map(|term| term.replace('"', ""))
        .filter(|term| term.chars().any(char::is_alphanumeric))
        .collect();

    if terms.is_empty() {
        return None;
    }

    if strict {
        Some(format!("\"{}\"", terms.join(" ")))
    } else {
        Some(
            terms
                .iter()
                .map(|term| format!("\"{term}\"*"))
                .collect::<Vec<_>>()
                .join(" OR "),
        )
    }
}

/// 폴더를 만들고 가져온 동영상들을 함께 저장합니다.
///
/// 이름은 `name` 필드가 우선이고, 없으면 가져온 재생목록 이름을 씁니다.
/// 동영상 미러는 아직 저장되지 않은 폴더의 미리 발급된 ID를 가리킵니다.
pub async fn create_folder(pool: &SqlitePool, req: CreateFolderRequest) -> Result<Folder, AppError> {
    let owner_id = validation::require_user_id(req.user_id.as_deref())?;
    let fields = validation::validate_fields(
        req.name.as_ref(),
        req.sharing_level.as_ref(),
        req.tags.as_ref(),
    )?;

    let name = match (fields.name, req.playlist_name) {
        (Some(name), _) => name,
        (None, Some(playlist)) if !playlist.trim().is_empty() => playlist,
        _ => return Err(AppError::validation("name or playlistName is required.")),
    };

    let mut folder = NewFolder {
        id: Uuid::now_v7().to_string(),
        owner_id,
        name,
        source_id: req.playlist_id,
        sharing_level: fields.sharing_level.unwrap_or_default(),
        tags: fields.tags.unwrap_or_default(),
        is_default: false,
        videos: Vec::new(),
    };
    let videos =
        mirror::videos_for_create(&req.videos, &folder.owner_id, &mirror::mirror_of_new(&folder))?;
    folder.videos = videos.iter().map(VideoSnapshot::from).collect();

    let mut tx = pool.begin().await?;

    db::users::find_by_id(&mut *tx, &folder.owner_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    // 기본 폴더가 없는 계정이면 새 폴더가 기본 폴더가 됩니다.
    if db::count_default_folders(&mut *tx, &folder.owner_id).await? == 0 {
        tracing::warn!("User {} had no default folder", folder.owner_id);
        folder.is_default = true;
    }

    db::insert_folder(&mut *tx, &folder).await?;
    for video in &videos {
        db::insert_video(&mut *tx, video).await?;
    }
    ensure_single_default(&mut tx, &folder.owner_id).await?;

    let created = db::get_folder(&mut *tx, &folder.id)
        .await?
        .ok_or_else(|| AppError::Internal("Failed to retrieve created folder".to_string()))?;
    tx.commit().await?;

    tracing::info!(
        "Created folder {} for user {} with {} video(s)",
        created.id,
        created.owner_id,
        videos.len()
    );
    Ok(created)
}

/// 폴더 목록/검색
///
/// - 키워드 없음: 공개 폴더 전체
/// - 키워드가 ID 형식: 공유 수준 2 이상인 해당 폴더 (최대 1개)
/// - 그 외: 공개 폴더 중 이름/태그 전문검색
pub async fn list_folders(pool: &SqlitePool, query: &FolderListQuery) -> Result<Vec<Folder>, AppError> {
    let sort = query
        .sort
        .as_deref()
        .map(str::parse::<FolderSort>)
        .transpose()?
        .unwrap_or_default();

    let keyword = query.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty());

    match keyword {
        None => db::list_public_folders(pool, sort).await,
        Some(keyword) if validation::is_valid_id(keyword) => {
            let id = validation::parse_id(keyword)?;
            let folder = db::get_shared_folder(pool, &id, SharingLevel::LinkShared).await?;
            Ok(folder.into_iter().collect())
        }
        Some(keyword) => match fts_query(keyword, query.strict) {
            Some(expr) => db::search_public_folders(pool, &expr, sort).await,
            None => Ok(Vec::new()),
        },
    }
}

pub async fn get_folder(pool: &SqlitePool, id: &str) -> Result<Folder, AppError> {
    let id = validation::parse_id(id)?;
    db::get_folder(pool, &id).await?.ok_or(AppError::NotFound("folder"))
}

/// 요청 필드를 반영하고, name/sharingLevel이 바뀌었으면 동영상 미러까지 전파합니다.
pub async fn update_folder(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateFolderRequest,
) -> Result<Folder, AppError> {
    let id = validation::parse_id(id)?;
    let fields = validation::validate_update(
        req.name.as_ref(),
        req.sharing_level.as_ref(),
        req.tags.as_ref(),
    )?;

    let mut tx = pool.begin().await?;

    if !db::update_folder_fields(&mut tx, &id, &fields).await? {
        return Err(AppError::NotFound("folder"));
    }
    let folder = db::get_folder(&mut *tx, &id)
        .await?
        .ok_or(AppError::NotFound("folder"))?;

    if fields.touches_mirror() {
        mirror::propagate_update(&mut tx, &folder).await?;
    }
    tx.commit().await?;

    tracing::info!("Updated folder {}", folder.id);
    Ok(folder)
}

/// 폴더를 삭제하고, 속한 동영상은 소유자의 기본 폴더로 옮깁니다.
///
/// 동영상이 있는데 기본 폴더를 찾을 수 없으면 계정 불변식이 깨진 것이므로 실패합니다.
pub async fn delete_folder(pool: &SqlitePool, id: &str) -> Result<Folder, AppError> {
    let id = validation::parse_id(id)?;

    let mut tx = pool.begin().await?;

    let folder = db::get_folder(&mut *tx, &id)
        .await?
        .ok_or(AppError::NotFound("folder"))?;
    if folder.is_default {
        return Err(AppError::invariant("default folder cannot be deleted."));
    }

    let mirrored = db::list_videos_in_folder(&mut *tx, &folder.id).await?;
    let default_folder = if folder.videos.is_empty() && mirrored.is_empty() {
        None
    } else {
        let found = db::find_default_folder(&mut *tx, &folder.owner_id).await?;
        if found.is_none() {
            tracing::warn!("User {} has no default folder", folder.owner_id);
        }
        Some(found.ok_or_else(|| AppError::invariant("default folder not found."))?)
    };

    if !db::delete_folder(&mut *tx, &folder.id).await? {
        return Err(AppError::NotFound("folder"));
    }
    if let Some(default_folder) = &default_folder {
        mirror::propagate_delete(&mut tx, &folder, default_folder).await?;
        ensure_single_default(&mut tx, &folder.owner_id).await?;
    }
    tx.commit().await?;

    tracing::info!("Deleted folder {} ({} video(s) moved)", folder.id, mirrored.len());
    Ok(folder)
}

/// 북마크 / 북마크 해제
///
/// 조건부 UPDATE 한 번으로 상태를 바꿉니다. 이미 원하는 상태이면
/// (동시에 들어온 같은 요청이 먼저 바꾼 경우 포함) 에러로 거부하고 아무것도 바꾸지 않습니다.
pub async fn set_bookmark(pool: &SqlitePool, id: &str, bookmarked: bool) -> Result<Folder, AppError> {
    let id = validation::parse_id(id)?;

    if !db::set_bookmark(pool, &id, bookmarked).await? {
        db::get_folder(pool, &id)
            .await?
            .ok_or(AppError::NotFound("folder"))?;
        return Err(AppError::invariant(if bookmarked {
            "already bookmarked."
        } else {
            "not bookmarked."
        }));
    }

    db::get_folder(pool, &id).await?.ok_or(AppError::NotFound("folder"))
}

/// 기본 폴더를 교체합니다. 반환값은 (새 기본 폴더, 이전 기본 폴더)입니다.
pub async fn set_default(
    pool: &SqlitePool,
    id: &str,
    user_id: Option<&str>,
) -> Result<(Folder, Folder), AppError> {
    let id = validation::parse_id(id)?;
    let user_id = validation::require_user_id(user_id)?;

    let mut tx = pool.begin().await?;

    let target = db::get_folder(&mut *tx, &id)
        .await?
        .ok_or(AppError::NotFound("folder"))?;
    if target.owner_id != user_id {
        return Err(AppError::invariant("folder does not belong to user."));
    }
    if target.is_default {
        return Err(AppError::invariant("already default folder."));
    }
    let current = db::find_default_folder(&mut *tx, &user_id)
        .await?
        .ok_or_else(|| AppError::invariant("default folder not found."))?;

    // 부분 유니크 인덱스 때문에 이전 기본 폴더를 먼저 내려야 합니다.
    if !db::set_default_flag(&mut *tx, &current.id, false).await?
        || !db::set_default_flag(&mut *tx, &target.id, true).await?
    {
        return Err(AppError::invariant("default folder changed concurrently."));
    }
    ensure_single_default(&mut tx, &user_id).await?;

    let new_default = db::get_folder(&mut *tx, &target.id)
        .await?
        .ok_or(AppError::NotFound("folder"))?;
    let old_default = db::get_folder(&mut *tx, &current.id)
        .await?
        .ok_or(AppError::NotFound("folder"))?;
    tx.commit().await?;

    tracing::info!(
        "Default folder of user {} changed from {} to {}",
        user_id,
        old_default.id,
        new_default.id
    );
    Ok((new_default, old_default))
}
