//! # 데이터 모델 모듈
//!
//! - `folder`: 폴더와 공유 수준(SharingLevel), 폴더 관련 요청 구조체
//! - `video`: 동영상, 폴더 미러, 폴더에 내장되는 동영상 스냅샷
//! - `user`: 소유자로만 참조되는 사용자
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Folder`처럼 짧게 접근합니다.

pub mod folder;
pub mod user;
pub mod video;

pub use folder::*;
pub use user::*;
pub use video::*;
