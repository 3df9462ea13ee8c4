//! # 입력 검증
//!
//! 엔티티 상태와 무관한 순수 검증 함수들입니다. I/O가 없습니다.
//!
//! - `parse_id()` / `is_valid_id()`: ID 문자열이 UUID(하이픈 포함 36자) 형식인지 확인
//! - `validate_fields()`: name / sharingLevel / tags 값의 모양과 길이 확인
//!
//! 검증은 모든 조회보다 먼저 수행되어야 합니다.
//! 형식이 틀린 ID로는 DB를 조회하지 않습니다.

use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{FolderFields, SharingLevel};

/// 태그 하나의 최대 길이(문자 수)
pub const MAX_TAG_LENGTH: usize = 10;

const HYPHENATED_LEN: usize = 36;

pub fn is_valid_id(candidate: &str) -> bool {
    candidate.len() == HYPHENATED_LEN && Uuid::try_parse(candidate).is_ok()
}

/// 올바른 ID면 소문자 정규형으로 돌려주고, 아니면 `AppError::InvalidId`를 반환합니다.
pub fn parse_id(candidate: &str) -> Result<String, AppError> {
    if candidate.len() != HYPHENATED_LEN {
        return Err(AppError::InvalidId);
    }
    Uuid::try_parse(candidate)
        .map(|id| id.to_string())
        .map_err(|_| AppError::InvalidId)
}

/// 선택 입력인 userId를 검증합니다. 없으면 검증 에러입니다.
pub fn require_user_id(user_id: Option<&str>) -> Result<String, AppError> {
    match user_id {
        Some(id) => parse_id(id),
        None => Err(AppError::validation("userId is required.")),
    }
}

pub fn validate_name(value: &Value) -> Result<String, AppError> {
    match value.as_str() {
        Some(name) if !name.trim().is_empty() => Ok(name.to_string()),
        _ => Err(AppError::validation("name must be a non-empty string.")),
    }
}

pub fn validate_title(value: &Value) -> Result<String, AppError> {
    match value.as_str() {
        Some(title) if !title.trim().is_empty() => Ok(title.to_string()),
        _ => Err(AppError::validation("title must be a non-empty string.")),
    }
}

/// 정수 1, 2, 3만 허용합니다. 0, 문자열, 실수(2.0 포함)는 모두 거부합니다.
pub fn validate_sharing_level(value: &Value) -> Result<SharingLevel, AppError> {
    value
        .as_i64()
        .and_then(|n| SharingLevel::try_from(n).ok())
        .ok_or_else(|| AppError::validation("sharingLevel must be one of 1, 2, 3."))
}

pub fn validate_tags(value: &Value) -> Result<Vec<String>, AppError> {
    let Some(items) = value.as_array() else {
        return Err(AppError::validation("tags must be an array."));
    };

    items
        .iter()
        .map(|item| match item.as_str() {
            Some(tag) if tag.chars().count() <= MAX_TAG_LENGTH => Ok(tag.to_string()),
            _ => Err(AppError::validation(format!(
                "each tag must be a string of at most {MAX_TAG_LENGTH} characters."
            ))),
        })
        .collect()
}

/// 요청에 있는 필드만 각각 검증하여 `FolderFields`로 모읍니다.
pub fn validate_fields(
    name: Option<&Value>,
    sharing_level: Option<&Value>,
    tags: Option<&Value>,
) -> Result<FolderFields, AppError> {
    Ok(FolderFields {
        name: name.map(validate_name).transpose()?,
        sharing_level: sharing_level.map(validate_sharing_level).transpose()?,
        tags: tags.map(validate_tags).transpose()?,
    })
}

/// 수정 요청용: 최소 하나의 필드가 있어야 합니다.
pub fn validate_update(
    name: Option<&Value>,
    sharing_level: Option<&Value>,
    tags: Option<&Value>,
) -> Result<FolderFields, AppError> {
    let fields = validate_fields(name, sharing_level, tags)?;
    if fields.is_empty() {
        return Err(AppError::validation(
            "at least one of name, sharingLevel, tags is required.",
        ));
    }
    Ok(fields)
}
