//! # 동영상 모델 정의
//!
//! 동영상 한 행은 소속 폴더의 식별 필드(`_id`, name, sharingLevel)를
//! 미러로 함께 들고 있습니다. 동영상을 읽을 때 폴더를 JOIN하지 않기 위해서입니다.
//! 미러는 항상 `folder._id`가 가리키는 폴더의 현재 값과 같아야 합니다.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;

use super::folder::SharingLevel;

/// 동영상에 내장된 소속 폴더 미러
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FolderMirror {
    #[serde(rename = "_id")]
    #[sqlx(rename = "folder_id")]
    pub id: String,
    #[sqlx(rename = "folder_name")]
    pub name: String,
    #[sqlx(rename = "folder_sharing_level", try_from = "i64")]
    pub sharing_level: SharingLevel,
}

impl FolderMirror {
    pub fn new(id: &str, name: &str, sharing_level: SharingLevel) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            sharing_level,
        }
    }
}

/// 동영상 엔티티. DB의 `videos` 테이블 한 행
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    /// 외부 플랫폼의 재생목록 항목 ID
    pub source_id: String,
    pub tags: Json<Vec<String>>,
    /// 원본 길이(초)
    pub duration: f64,
    /// 시작/끝 트림을 적용한 길이(초)
    pub trimmed_duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_seconds: Option<f64>,
    pub thumbnail: String,
    pub shared_count: i64,
    #[sqlx(flatten)]
    pub folder: FolderMirror,
    pub created_at: String,
}

/// 폴더의 `videos` 컬럼에 내장되는 동영상 스냅샷 (미러 필드는 없음)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnapshot {
    pub id: String,
    pub title: String,
    pub source_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub duration: f64,
    pub trimmed_duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_seconds: Option<f64>,
    pub thumbnail: String,
}

impl From<&Video> for VideoSnapshot {
    fn from(video: &Video) -> Self {
        Self {
            id: video.id.clone(),
            title: video.title.clone(),
            source_id: video.source_id.clone(),
            tags: video.tags.0.clone(),
            duration: video.duration,
            trimmed_duration: video.trimmed_duration,
            start_seconds: video.start_seconds,
            end_seconds: video.end_seconds,
            thumbnail: video.thumbnail.clone(),
        }
    }
}

/// 재생목록 가져오기(또는 요청 본문)에서 넘어오는 동영상 설명
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDescriptor {
    pub title: Option<Value>,
    pub source_id: String,
    pub tags: Option<Value>,
    #[serde(default)]
    pub duration: f64,
    pub start_seconds: Option<f64>,
    pub end_seconds: Option<f64>,
    #[serde(default)]
    pub thumbnail: String,
}

/// 새 동영상 INSERT에 필요한 값들. 미러 프로젝터가 만들어 냅니다.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVideo {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub source_id: String,
    pub tags: Vec<String>,
    pub duration: f64,
    pub trimmed_duration: f64,
    pub start_seconds: Option<f64>,
    pub end_seconds: Option<f64>,
    pub thumbnail: String,
    pub folder: FolderMirror,
}

impl From<&NewVideo> for VideoSnapshot {
    fn from(video: &NewVideo) -> Self {
        Self {
            id: video.id.clone(),
            title: video.title.clone(),
            source_id: video.source_id.clone(),
            tags: video.tags.clone(),
            duration: video.duration,
            trimmed_duration: video.trimmed_duration,
            start_seconds: video.start_seconds,
            end_seconds: video.end_seconds,
            thumbnail: video.thumbnail.clone(),
        }
    }
}
