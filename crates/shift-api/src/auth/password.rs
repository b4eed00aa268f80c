//! 비밀번호 해싱 유틸리티.
//!
//! Argon2id 기반 해싱과 검증. 해싱은 CPU를 많이 쓰므로
//! 비동기 코드에서는 [`hash_password_blocking`] / [`verify_password_blocking`]을 사용합니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use shift_core::ServiceError;

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("비밀번호 검증 실패")]
    VerificationFailed,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
    #[error("해싱 작업 실행 실패: {0}")]
    TaskFailed(String),
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::internal(err.to_string())
    }
}

/// 비밀번호 해싱.
///
/// 솔트는 매번 새로 생성되며 결과는 PHC 형식 문자열입니다
/// (`$argon2id$v=19$m=19456,t=2,p=1$...`).
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// 비밀번호 검증.
///
/// 일치하면 `Ok(())`, 불일치하면 [`PasswordError::VerificationFailed`].
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}

/// 블로킹 스레드 풀에서 비밀번호를 해싱합니다.
pub async fn hash_password_blocking(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| PasswordError::TaskFailed(e.to_string()))?
}

/// 블로킹 스레드 풀에서 비밀번호를 검증합니다.
pub async fn verify_password_blocking(password: String, hash: String) -> Result<(), PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| PasswordError::TaskFailed(e.to_string()))?
}

/// 비밀번호 강도 검증.
///
/// # 요구사항
///
/// - 최소 8자 이상
/// - 최소 1개의 숫자 포함
/// - 최소 1개의 영문자 포함
pub fn validate_password_strength(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < 8 {
        return Err("password must be at least 8 characters long");
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("password must contain at least one digit");
    }

    if !password.chars().any(|c| c.is_alphabetic()) {
        return Err("password must contain at least one letter");
    }

    Ok(())
}
