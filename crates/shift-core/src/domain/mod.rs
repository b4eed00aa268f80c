//! 도메인 모델.
//!
//! - [`user`]: 사용자, 역할, 프로필 수정 패치
//! - [`shift`]: 근무, 근무 유형, 부분 수정 패치, 조회 필터

pub mod shift;
pub mod user;

pub use shift::*;
pub use user::*;
