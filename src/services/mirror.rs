//! # 동영상 미러 프로젝터
//!
//! 폴더의 식별 필드(id, name, sharingLevel)는 각 동영상 행에 미러로 복제되어 있습니다.
//! 이 모듈은 두 가지를 담당합니다.
//!
//! 1. **투영(projection)**: 폴더 상태에서 미러를 만들고, 가져오기/복사 시
//!    새 동영상 레코드를 만듭니다. 순수 함수입니다.
//! 2. **전파(propagation)**: 폴더가 바뀌거나 삭제될 때 미러를 고쳐 씁니다.
//!    폴더 변경과 같은 트랜잭션 안에서 호출되어야 합니다.
//!
//! ```text
//! Folder{id, name, sharing_level} ──mirror_of──▶ FolderMirror ──▶ videos.folder_*
//! ```

use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::services::validation;

pub fn mirror_of(folder: &Folder) -> FolderMirror {
    FolderMirror::new(&folder.id, &folder.name, folder.sharing_level)
}

/// 아직 저장되지 않은 폴더의 미러. 폴더 ID는 미리 발급되어 있어야 합니다.
pub fn mirror_of_new(folder: &NewFolder) -> FolderMirror {
    FolderMirror::new(&folder.id, &folder.name, folder.sharing_level)
}

/// 트림 구간을 적용한 길이. 끝이 없으면 원본 길이까지, 시작이 없으면 0부터입니다.
pub fn trimmed_duration(duration: f64, start: Option<f64>, end: Option<f64>) -> f64 {
    let start = start.unwrap_or(0.0);
    let end = end.unwrap_or(duration);
    (end - start).max(0.0)
}

/// 가져온 동영상 설명들로 새 동영상 레코드를 만듭니다 (폴더 생성 시).
///
/// 각 설명의 title/tags는 폴더 필드와 같은 규칙으로 검증됩니다.
pub fn videos_for_create(
    descriptors: &[VideoDescriptor],
    owner_id: &str,
    mirror: &FolderMirror,
) -> Result<Vec<NewVideo>, AppError> {
    descriptors
        .iter()
        .map(|descriptor| {
            let title = match &descriptor.title {
                Some(value) => validation::validate_title(value)?,
                None => return Err(AppError::validation("title must be a non-empty string.")),
            };
            let tags = descriptor
                .tags
                .as_ref()
                .map(validation::validate_tags)
                .transpose()?
                .unwrap_or_default();

            Ok(NewVideo {
                id: Uuid::now_v7().to_string(),
                owner_id: owner_id.to_string(),
                title,
                source_id: descriptor.source_id.clone(),
                tags,
                duration: descriptor.duration,
                trimmed_duration: trimmed_duration(
                    descriptor.duration,
                    descriptor.start_seconds,
                    descriptor.end_seconds,
                ),
                start_seconds: descriptor.start_seconds,
                end_seconds: descriptor.end_seconds,
                thumbnail: descriptor.thumbnail.clone(),
                folder: mirror.clone(),
            })
        })
        .collect()
}

/// 원본 동영상을 새 소유자/새 폴더로 복제합니다 (폴더 복사 시).
///
/// 콘텐츠 필드만 복사하고 ID, 소유자, 미러는 새로 정합니다.
/// 트림 값은 원본에 있을 때만 복사됩니다.
pub fn video_for_copy(source: &Video, owner_id: &str, mirror: &FolderMirror) -> NewVideo {
    NewVideo {
        id: Uuid::now_v7().to_string(),
        owner_id: owner_id.to_string(),
        title: source.title.clone(),
        source_id: source.source_id.clone(),
        tags: source.tags.0.clone(),
        duration: source.duration,
        trimmed_duration: source.trimmed_duration,
        start_seconds: source.start_seconds,
        end_seconds: source.end_seconds,
        thumbnail: source.thumbnail.clone(),
        folder: mirror.clone(),
    }
}

/// 폴더의 name/sharingLevel이 바뀐 뒤 호출합니다. 갱신된 동영상 수를 반환합니다.
pub async fn propagate_update(
    conn: &mut SqliteConnection,
    folder: &Folder,
) -> Result<u64, AppError> {
    let updated = db::update_mirrors(&mut *conn, &mirror_of(folder)).await?;
    tracing::debug!("Propagated folder {} to {} video mirror(s)", folder.id, updated);
    Ok(updated)
}

/// 삭제된 폴더의 동영상을 기본 폴더로 옮깁니다.
///
/// 동영상 미러를 기본 폴더로 바꾸고, 기본 폴더의 내장 목록 뒤에
/// 삭제된 폴더의 스냅샷을 덧붙입니다. 옮긴 동영상 수를 반환합니다.
pub async fn propagate_delete(
    conn: &mut SqliteConnection,
    deleted: &Folder,
    default_folder: &Folder,
) -> Result<u64, AppError> {
    let moved = db::reassign_mirrors(&mut *conn, &deleted.id, &mirror_of(default_folder)).await?;

    let mut videos = default_folder.videos.0.clone();
    videos.extend(deleted.videos.0.iter().cloned());
    db::replace_folder_videos(&mut *conn, &default_folder.id, &videos).await?;

    tracing::debug!(
        "Moved {} video(s) from folder {} to default folder {}",
        moved,
        deleted.id,
        default_folder.id
    );
    Ok(moved)
}
