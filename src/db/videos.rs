//! # 동영상 데이터베이스 쿼리 모듈
//!
//! `videos` 테이블 쿼리와, 폴더 미러 컬럼(folder_id, folder_name,
//! folder_sharing_level)을 한꺼번에 고쳐 쓰는 전파용 UPDATE를 담고 있습니다.
//! 전파 UPDATE는 같은 값으로 다시 실행해도 결과가 같습니다.

use sqlx::{types::Json, Executor, QueryBuilder, Sqlite};

use crate::error::AppError;
use crate::models::*;

const VIDEO_COLUMNS: &str = "id, owner_id, title, source_id, tags, duration, trimmed_duration, \
     start_seconds, end_seconds, thumbnail, shared_count, folder_id, folder_name, \
     folder_sharing_level, created_at";

pub async fn get_video<'e, E>(executor: E, id: &str) -> Result<Option<Video>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let video = sqlx::query_as::<_, Video>(&format!(
        "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(video)
}

/// 미러가 `folder_id`를 가리키는 동영상 목록 (생성 순)
pub async fn list_videos_in_folder<'e, E>(
    executor: E,
    folder_id: &str,
) -> Result<Vec<Video>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let videos = sqlx::query_as::<_, Video>(&format!(
        "SELECT {VIDEO_COLUMNS} FROM videos WHERE folder_id = ? ORDER BY created_at, id"
    ))
    .bind(folder_id)
    .fetch_all(executor)
    .await?;

    Ok(videos)
}

/// ID 목록으로 동영상을 조회합니다. 결과는 `ids` 순서를 따르고, 없는 ID는 빠집니다.
pub async fn find_videos_by_ids<'e, E>(executor: E, ids: &[String]) -> Result<Vec<Video>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder =
        QueryBuilder::<Sqlite>::new(format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id IN ("));
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");

    let mut videos = builder.build_query_as::<Video>().fetch_all(executor).await?;
    videos.sort_by_key(|video| ids.iter().position(|id| *id == video.id));

    Ok(videos)
}

pub async fn insert_video<'e, E>(executor: E, video: &NewVideo) -> Result<(), AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO videos (id, owner_id, title, source_id, tags, duration, trimmed_duration,
                            start_seconds, end_seconds, thumbnail, folder_id, folder_name,
                            folder_sharing_level)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&video.id)
    .bind(&video.owner_id)
    .bind(&video.title)
    .bind(&video.source_id)
    .bind(Json(&video.tags))
    .bind(video.duration)
    .bind(video.trimmed_duration)
    .bind(video.start_seconds)
    .bind(video.end_seconds)
    .bind(&video.thumbnail)
    .bind(&video.folder.id)
    .bind(&video.folder.name)
    .bind(i64::from(video.folder.sharing_level))
    .execute(executor)
    .await?;

    Ok(())
}

/// `mirror.id`를 가리키는 모든 동영상의 미러 이름/공유 수준을 `mirror` 값으로 맞춥니다.
pub async fn update_mirrors<'e, E>(executor: E, mirror: &FolderMirror) -> Result<u64, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "UPDATE videos SET folder_name = ?, folder_sharing_level = ? WHERE folder_id = ?",
    )
    .bind(&mirror.name)
    .bind(i64::from(mirror.sharing_level))
    .bind(&mirror.id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// `from_folder_id`를 가리키던 동영상들의 미러를 `target`으로 통째로 바꿉니다.
pub async fn reassign_mirrors<'e, E>(
    executor: E,
    from_folder_id: &str,
    target: &FolderMirror,
) -> Result<u64, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE videos
        SET folder_id = ?, folder_name = ?, folder_sharing_level = ?
        WHERE folder_id = ?
        "#,
    )
    .bind(&target.id)
    .bind(&target.name)
    .bind(i64::from(target.sharing_level))
    .bind(from_folder_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn increment_shared_count_in_folder<'e, E>(
    executor: E,
    folder_id: &str,
) -> Result<u64, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result =
        sqlx::query("UPDATE videos SET shared_count = shared_count + 1 WHERE folder_id = ?")
            .bind(folder_id)
            .execute(executor)
            .await?;

    Ok(result.rows_affected())
}

/// 미러가 실제 폴더 값과 어긋난 동영상을 모두 고칩니다. 고친 행 수를 반환합니다.
///
/// 가리키는 폴더가 없는 동영상은 건드리지 않습니다.
pub async fn resync_mirrors<'e, E>(executor: E) -> Result<u64, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE videos
        SET folder_name = f.name, folder_sharing_level = f.sharing_level
        FROM folders AS f
        WHERE f.id = videos.folder_id
          AND (videos.folder_name <> f.name OR videos.folder_sharing_level <> f.sharing_level)
        "#,
    )
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::services::folders::tests::{create, register};

    #[tokio::test]
    async fn resync_repairs_stale_mirrors_once() {
        let pool = db::test_pool().await;
        let (owner, _) = register(&pool, "owner").await;
        let folder = create(&pool, &owner.id, "Mix", 3, 2).await;

        sqlx::query("UPDATE videos SET folder_name = 'stale', folder_sharing_level = 1 WHERE folder_id = ?")
            .bind(&folder.id)
            .execute(&pool)
            .await
            .unwrap();

        assert_eq!(resync_mirrors(&pool).await.unwrap(), 2);
        assert_eq!(resync_mirrors(&pool).await.unwrap(), 0);

        for video in list_videos_in_folder(&pool, &folder.id).await.unwrap() {
            assert_eq!(video.folder.name, "Mix");
            assert_eq!(video.folder.sharing_level, SharingLevel::Public);
        }
    }

    #[tokio::test]
    async fn find_by_ids_keeps_requested_order() {
        let pool = db::test_pool().await;
        let (owner, _) = register(&pool, "owner").await;
        let folder = create(&pool, &owner.id, "Mix", 3, 3).await;

        let mut ids: Vec<String> = folder.videos.iter().map(|video| video.id.clone()).collect();
        ids.reverse();
        let found = find_videos_by_ids(&pool, &ids).await.unwrap();
        let found_ids: Vec<String> = found.into_iter().map(|video| video.id).collect();
        assert_eq!(found_ids, ids);

        assert!(find_videos_by_ids(&pool, &[]).await.unwrap().is_empty());
    }
}
