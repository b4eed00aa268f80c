//! # Shift Core
//!
//! 근무 스케줄러의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 사용자 및 역할 정의
//! - 근무(Shift) 및 근무 유형, 부분 수정 패치, 조회 필터
//! - 서비스 에러 분류
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
