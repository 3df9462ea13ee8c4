//! # 폴더 복사
//!
//! 폴더와 그 동영상들을 다른(또는 같은) 사용자의 새 폴더로 깊은 복사합니다.
//!
//! 규칙:
//! - 비공개(sharingLevel 1) 폴더는 소유자만 복사할 수 있습니다.
//! - 새 폴더는 name, sourceId, tags만 가져오고 sharingLevel은 기본값(1)입니다.
//! - 복사한 사람이 소유자가 아니면 원본 폴더와 원본 동영상들의 sharedCount가 1씩 오릅니다.
//!
//! 새 폴더, 새 동영상, 카운터 증가는 하나의 트랜잭션입니다.

use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::services::{mirror, validation};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyOutcome {
    pub new_folder: Folder,
    pub new_videos: Vec<Video>,
    pub origin_folder: Folder,
}

pub async fn copy_folder(
    pool: &SqlitePool,
    id: &str,
    user_id: Option<&str>,
) -> Result<CopyOutcome, AppError> {
    let id = validation::parse_id(id)?;
    let user_id = validation::require_user_id(user_id)?;

    let mut tx = pool.begin().await?;

    let source = db::get_folder(&mut *tx, &id)
        .await?
        .ok_or(AppError::NotFound("folder"))?;
    db::users::find_by_id(&mut *tx, &user_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    let copied_by_owner = source.owner_id == user_id;
    if source.sharing_level == SharingLevel::Private && !copied_by_owner {
        return Err(AppError::invariant("private folder cannot be copied."));
    }

    let mut folder = NewFolder {
        id: Uuid::now_v7().to_string(),
        owner_id: user_id,
        name: source.name.clone(),
        source_id: source.source_id.clone(),
        sharing_level: SharingLevel::default(),
        tags: source.tags.0.clone(),
        is_default: false,
        videos: Vec::new(),
    };
    let target = mirror::mirror_of_new(&folder);

    let ids: Vec<String> = source.videos.iter().map(|video| video.id.clone()).collect();
    let originals = db::find_videos_by_ids(&mut *tx, &ids).await?;
    let copies: Vec<NewVideo> = originals
        .iter()
        .map(|video| mirror::video_for_copy(video, &folder.owner_id, &target))
        .collect();
    folder.videos = copies.iter().map(VideoSnapshot::from).collect();

    db::insert_folder(&mut *tx, &folder).await?;
    for video in &copies {
        db::insert_video(&mut *tx, video).await?;
    }

    if !copied_by_owner {
        db::increment_shared_count(&mut *tx, &source.id).await?;
        let bumped = db::increment_shared_count_in_folder(&mut *tx, &source.id).await?;
        tracing::debug!("Incremented shared count on folder {} and {} video(s)", source.id, bumped);
    }

    let new_folder = db::get_folder(&mut *tx, &folder.id)
        .await?
        .ok_or_else(|| AppError::Internal("Failed to retrieve copied folder".to_string()))?;
    let new_videos = db::list_videos_in_folder(&mut *tx, &folder.id).await?;
    let origin_folder = db::get_folder(&mut *tx, &source.id)
        .await?
        .ok_or(AppError::NotFound("folder"))?;
    tx.commit().await?;

    tracing::info!(
        "Copied folder {} to {} for user {} ({} video(s))",
        origin_folder.id,
        new_folder.id,
        new_folder.owner_id,
        new_videos.len()
    );
    Ok(CopyOutcome {
        new_folder,
        new_videos,
        origin_folder,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::folders::{
        self,
        tests::{create, descriptors, register},
    };
    use serde_json::json;

    async fn row_count(pool: &SqlitePool, table: &str) -> i64 {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap();
        count
    }

    #[tokio::test]
    async fn non_owner_copy_duplicates_and_counts_share() {
        let pool = db::test_pool().await;
        let (owner, _) = register(&pool, "owner").await;
        let (copier, _) = register(&pool, "copier").await;
        let source = create(&pool, &owner.id, "Mix", 3, 2).await;

        let outcome = copy_folder(&pool, &source.id, Some(&copier.id)).await.unwrap();

        assert_eq!(outcome.new_folder.owner_id, copier.id);
        assert_eq!(outcome.new_folder.name, "Mix");
        assert_eq!(outcome.new_folder.sharing_level, SharingLevel::Private);
        assert!(!outcome.new_folder.is_default);
        assert_eq!(outcome.new_folder.videos.len(), 2);
        assert_eq!(outcome.new_videos.len(), 2);
        for video in &outcome.new_videos {
            assert_eq!(video.owner_id, copier.id);
            assert_eq!(video.folder, mirror::mirror_of(&outcome.new_folder));
            assert_eq!(video.shared_count, 0);
        }

        assert_eq!(outcome.origin_folder.shared_count, 1);
        let originals = db::list_videos_in_folder(&pool, &source.id).await.unwrap();
        assert!(originals.iter().all(|video| video.shared_count == 1));

        copy_folder(&pool, &source.id, Some(&copier.id)).await.unwrap();
        let again = db::get_folder(&pool, &source.id).await.unwrap().unwrap();
        assert_eq!(again.shared_count, 2);
    }

    #[tokio::test]
    async fn copy_carries_source_id_tags_and_video_content() {
        let pool = db::test_pool().await;
        let (owner, _) = register(&pool, "owner").await;
        let (copier, _) = register(&pool, "copier").await;

        let mut videos = descriptors(2);
        videos[0].tags = Some(json!(["live"]));
        videos[0].start_seconds = Some(15.0);
        videos[0].end_seconds = Some(75.0);
        let source = folders::create_folder(
            &pool,
            CreateFolderRequest {
                user_id: Some(owner.id.clone()),
                name: Some(json!("Sets")),
                sharing_level: Some(json!(3)),
                tags: Some(json!(["house", "techno"])),
                playlist_id: Some("PL-sets".to_string()),
                videos,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let outcome = copy_folder(&pool, &source.id, Some(&copier.id)).await.unwrap();
        assert_eq!(outcome.new_folder.source_id.as_deref(), Some("PL-sets"));
        assert_eq!(outcome.new_folder.tags.0, vec!["house", "techno"]);
        assert_eq!(outcome.new_folder.tags.0, source.tags.0);

        let originals = db::list_videos_in_folder(&pool, &source.id).await.unwrap();
        assert_eq!(outcome.new_videos.len(), originals.len());
        for copy in &outcome.new_videos {
            let original = originals
                .iter()
                .find(|video| video.source_id == copy.source_id)
                .unwrap();
            assert_ne!(copy.id, original.id);
            assert_eq!(copy.title, original.title);
            assert_eq!(copy.tags.0, original.tags.0);
            assert_eq!(copy.thumbnail, original.thumbnail);
            assert_eq!(copy.duration, original.duration);
            assert_eq!(copy.trimmed_duration, original.trimmed_duration);
            assert_eq!(copy.start_seconds, original.start_seconds);
            assert_eq!(copy.end_seconds, original.end_seconds);
        }

        let trimmed = outcome
            .new_videos
            .iter()
            .find(|video| video.source_id == "item-0")
            .unwrap();
        assert_eq!(trimmed.trimmed_duration, 60.0);
        assert_eq!(trimmed.tags.0, vec!["live"]);

        let untrimmed = outcome
            .new_videos
            .iter()
            .find(|video| video.source_id == "item-1")
            .unwrap();
        assert_eq!(untrimmed.start_seconds, None);
        assert_eq!(untrimmed.end_seconds, None);
        assert_eq!(untrimmed.trimmed_duration, 200.0);
    }

    #[tokio::test]
    async fn owner_copy_does_not_count_share() {
        let pool = db::test_pool().await;
        let (owner, _) = register(&pool, "owner").await;
        let source = create(&pool, &owner.id, "Private mix", 1, 2).await;

        let outcome = copy_folder(&pool, &source.id, Some(&owner.id)).await.unwrap();
        assert_eq!(outcome.origin_folder.shared_count, 0);
        assert_eq!(outcome.new_videos.len(), 2);

        let originals = db::list_videos_in_folder(&pool, &source.id).await.unwrap();
        assert!(originals.iter().all(|video| video.shared_count == 0));
    }

    #[tokio::test]
    async fn private_folder_is_copy_protected() {
        let pool = db::test_pool().await;
        let (owner, _) = register(&pool, "owner").await;
        let (copier, _) = register(&pool, "copier").await;
        let source = create(&pool, &owner.id, "Secret", 1, 3).await;

        let folders_before = row_count(&pool, "folders").await;
        let videos_before = row_count(&pool, "videos").await;

        let err = copy_folder(&pool, &source.id, Some(&copier.id)).await.unwrap_err();
        assert_eq!(err.to_string(), "private folder cannot be copied.");
        assert_eq!(row_count(&pool, "folders").await, folders_before);
        assert_eq!(row_count(&pool, "videos").await, videos_before);
    }

    #[tokio::test]
    async fn missing_source_or_user_is_rejected() {
        let pool = db::test_pool().await;
        let (owner, _) = register(&pool, "owner").await;
        let source = create(&pool, &owner.id, "Mix", 3, 0).await;

        let missing_folder = copy_folder(&pool, &Uuid::now_v7().to_string(), Some(&owner.id)).await;
        assert!(matches!(missing_folder, Err(AppError::NotFound("folder"))));

        let missing_user = copy_folder(&pool, &source.id, Some(&Uuid::now_v7().to_string())).await;
        assert!(matches!(missing_user, Err(AppError::NotFound("user"))));

        assert!(matches!(
            copy_folder(&pool, &source.id, None).await,
            Err(AppError::Validation(_))
        ));
    }
}
