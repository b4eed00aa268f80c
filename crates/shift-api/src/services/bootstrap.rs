//! 최초 관리자 계정 시딩.

use secrecy::ExposeSecret;
use shift_core::{
    normalize_email, required_text, BootstrapAdminConfig, Role, ServiceError, ServiceResult, User,
};
use tracing::{debug, info};

use super::credentials::{CredentialStore, NewCredential};
use crate::auth::validate_password_strength;

/// 사용자가 한 명도 없을 때만 설정된 관리자 계정을 생성합니다.
///
/// 설정이 없거나 이미 사용자가 있으면 아무것도 하지 않고 `None`을 반환합니다.
pub async fn seed_admin(
    credentials: &CredentialStore,
    config: Option<&BootstrapAdminConfig>,
) -> ServiceResult<Option<User>> {
    let Some(config) = config else {
        debug!("최초 관리자 설정 없음, 시딩 건너뜀");
        return Ok(None);
    };

    let existing = credentials.count().await?;
    if existing > 0 {
        debug!(existing, "사용자가 이미 존재하여 시딩 건너뜀");
        return Ok(None);
    }

    let password = config.password.expose_secret();
    validate_password_strength(password)
        .map_err(|m| ServiceError::validation(format!("bootstrap admin password: {}", m)))?;

    let admin = credentials
        .register(NewCredential {
            username: required_text("username", &config.username)?,
            email: normalize_email(&config.email)?,
            password: password.to_string(),
            name: required_text("name", &config.name)?,
            dne: None,
            role: Role::Admin,
        })
        .await?;

    info!(user_id = %admin.id, username = %admin.username, "최초 관리자 계정 생성");
    Ok(Some(admin))
}
