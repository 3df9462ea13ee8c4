//! 사용자 등록. 사용자와 기본 폴더를 한 트랜잭션으로 만듭니다.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::services::folders::ensure_single_default;
use crate::services::validation;

pub async fn register_user(
    pool: &SqlitePool,
    req: CreateUserRequest,
    default_folder_name: &str,
) -> Result<(User, Folder), AppError> {
    let username = req.username.trim();
    if username.is_empty() {
        return Err(AppError::validation("username must be a non-empty string."));
    }

    let mut tx = pool.begin().await?;

    if db::users::find_by_username(&mut *tx, username).await?.is_some() {
        return Err(AppError::validation("username already taken."));
    }

    let user_id = Uuid::now_v7().to_string();
    db::users::create_user(&mut *tx, &user_id, username).await?;

    let folder = NewFolder {
        id: Uuid::now_v7().to_string(),
        owner_id: user_id.clone(),
        name: default_folder_name.to_string(),
        source_id: None,
        sharing_level: SharingLevel::default(),
        tags: Vec::new(),
        is_default: true,
        videos: Vec::new(),
    };
    db::insert_folder(&mut *tx, &folder).await?;
    ensure_single_default(&mut tx, &user_id).await?;

    let user = db::users::find_by_id(&mut *tx, &user_id)
        .await?
        .ok_or_else(|| AppError::Internal("Failed to retrieve created user".to_string()))?;
    let default_folder = db::get_folder(&mut *tx, &folder.id)
        .await?
        .ok_or_else(|| AppError::Internal("Failed to retrieve default folder".to_string()))?;
    tx.commit().await?;

    tracing::info!("Registered user {} with default folder {}", user.id, default_folder.id);
    Ok((user, default_folder))
}

pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<User, AppError> {
    let id = validation::parse_id(id)?;
    db::users::find_by_id(pool, &id)
        .await?
        .ok_or(AppError::NotFound("user"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registration_creates_exactly_one_default_folder() {
        let pool = db::test_pool().await;
        let (user, folder) = register_user(
            &pool,
            CreateUserRequest { username: "mina".to_string() },
            "Inbox",
        )
        .await
        .unwrap();

        assert!(folder.is_default);
        assert_eq!(folder.name, "Inbox");
        assert_eq!(folder.owner_id, user.id);
        assert_eq!(db::count_default_folders(&pool, &user.id).await.unwrap(), 1);
        assert_eq!(get_user(&pool, &user.id).await.unwrap().username, "mina");
    }

    #[tokio::test]
    async fn duplicate_or_blank_usernames_are_rejected() {
        let pool = db::test_pool().await;
        let req = || CreateUserRequest { username: "mina".to_string() };
        register_user(&pool, req(), "Default").await.unwrap();

        let err = register_user(&pool, req(), "Default").await.unwrap_err();
        assert_eq!(err.to_string(), "username already taken.");

        let blank = CreateUserRequest { username: "  ".to_string() };
        assert!(register_user(&pool, blank, "Default").await.is_err());
    }
}
