//! # 폴더 모델 정의
//!
//! 폴더는 외부 재생목록에서 가져온 동영상 모음입니다.
//! `videos` 필드는 동영상 테이블과의 JOIN이 아니라 **비정규화된 스냅샷 사본**입니다.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use thiserror::Error;

use super::video::{VideoDescriptor, VideoSnapshot};
use crate::error::AppError;

/// 폴더 공개 범위. DB와 JSON에서는 정수 1/2/3으로 표현됩니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum SharingLevel {
    /// 소유자만 접근 가능, 다른 사용자는 복사할 수 없음
    #[default]
    Private = 1,
    /// 링크(ID)를 아는 사람만 조회 가능
    LinkShared = 2,
    /// 키워드 검색과 목록에 노출
    Public = 3,
}

#[derive(Debug, Error)]
#[error("invalid sharing level: {0}")]
pub struct InvalidSharingLevel(pub i64);

impl TryFrom<i64> for SharingLevel {
    type Error = InvalidSharingLevel;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SharingLevel::Private),
            2 => Ok(SharingLevel::LinkShared),
            3 => Ok(SharingLevel::Public),
            other => Err(InvalidSharingLevel(other)),
        }
    }
}

impl From<SharingLevel> for i64 {
    fn from(level: SharingLevel) -> Self {
        level as i64
    }
}

/// 폴더 엔티티. DB의 `folders` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    /// 가져온 재생목록의 외부 ID
    pub source_id: Option<String>,
    #[sqlx(try_from = "i64")]
    pub sharing_level: SharingLevel,
    pub tags: Json<Vec<String>>,
    pub is_default: bool,
    pub is_bookmarked: bool,
    pub shared_count: i64,
    pub videos: Json<Vec<VideoSnapshot>>,
    pub created_at: String,
    pub updated_at: String,
}

/// 검증을 통과한 폴더 필드 집합. None인 필드는 요청에 없었던 것입니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderFields {
    pub name: Option<String>,
    pub sharing_level: Option<SharingLevel>,
    pub tags: Option<Vec<String>>,
}

impl FolderFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.sharing_level.is_none() && self.tags.is_none()
    }

    /// 이름이나 공유 수준이 바뀌면 동영상 미러도 갱신해야 합니다.
    pub fn touches_mirror(&self) -> bool {
        self.name.is_some() || self.sharing_level.is_some()
    }
}

/// 새 폴더 INSERT에 필요한 값들
#[derive(Debug, Clone)]
pub struct NewFolder {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub source_id: Option<String>,
    pub sharing_level: SharingLevel,
    pub tags: Vec<String>,
    pub is_default: bool,
    pub videos: Vec<VideoSnapshot>,
}

/// `POST /folders` 요청 본문
///
/// name/sharingLevel/tags는 모양 검증을 직접 하기 위해 `Value`로 받습니다.
/// playlistName/playlistId/videos는 재생목록 가져오기 쪽에서 채워 보냅니다.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub user_id: Option<String>,
    pub name: Option<Value>,
    pub sharing_level: Option<Value>,
    pub tags: Option<Value>,
    pub playlist_name: Option<String>,
    pub playlist_id: Option<String>,
    #[serde(default)]
    pub videos: Vec<VideoDescriptor>,
}

/// `PATCH /folders/{id}` 요청 본문
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolderRequest {
    pub name: Option<Value>,
    pub sharing_level: Option<Value>,
    pub tags: Option<Value>,
}

/// 복사/기본 폴더 지정 요청 본문: `{ "userId": "..." }`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdRequest {
    pub user_id: Option<String>,
}

/// 목록 정렬 방식. 쿼리 토큰: `asc`, `desc`, `shared`, `recent`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FolderSort {
    NameAsc,
    NameDesc,
    #[default]
    MostShared,
    MostRecent,
}

impl FromStr for FolderSort {
    type Err = AppError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "asc" => Ok(FolderSort::NameAsc),
            "desc" => Ok(FolderSort::NameDesc),
            "shared" => Ok(FolderSort::MostShared),
            "recent" => Ok(FolderSort::MostRecent),
            _ => Err(AppError::validation("invalid sort option.")),
        }
    }
}

/// `GET /folders` 쿼리 파라미터
#[derive(Debug, Default, Deserialize)]
pub struct FolderListQuery {
    pub keyword: Option<String>,
    pub sort: Option<String>,
    #[serde(default)]
    pub strict: bool,
}
