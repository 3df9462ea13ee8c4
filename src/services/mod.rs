//! # 비즈니스 로직 계층
//!
//! - `validation`: ID 형식과 필드 값 검증 (순수 함수)
//! - `mirror`: 동영상에 복제된 폴더 미러의 투영과 전파
//! - `folders`: 폴더 라이프사이클 (생성/조회/수정/삭제/북마크/기본 폴더)
//! - `copy`: 다른 사용자 계정으로의 폴더 깊은 복사
//! - `users`: 사용자 등록 (기본 폴더 포함)

pub mod copy;
pub mod folders;
pub mod mirror;
pub mod users;
pub mod validation;
