//! 사용자 및 역할.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

/// 사용자 역할.
///
/// 닫힌 집합이며 권한 판단은 항상 이 enum에 대한 완전 매칭으로 이루어집니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 관리자 - 근무 생성/수정/삭제, 사용자 관리
    Admin,
    /// 직원 - 본인 일정 조회
    #[default]
    Employee,
}

impl Role {
    /// 문자열에서 역할 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "employee" => Some(Role::Employee),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 저장된 사용자 레코드.
///
/// 비밀번호 해시를 포함하므로 직렬화하지 않습니다.
/// 외부 응답에는 [`UserProfile`]을 사용합니다.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// PHC 형식 Argon2 해시
    pub password_hash: String,
    /// 표시 이름
    pub name: String,
    /// 사원번호 (직원은 필수, 관리자는 없음)
    pub dne: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// 새 사용자 레코드 생성. 활성 상태로 시작합니다.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        name: impl Into<String>,
        dne: Option<String>,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            name: name.into(),
            dne,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 외부로 노출되는 사용자 정보 (비밀번호 해시 제외).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dne: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            dne: user.dne.clone(),
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// 근무 응답에 포함되는 직원 요약 정보.
///
/// 출력용으로만 채워지며 근무 레코드에는 직원 ID만 저장됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct EmployeeSummary {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
}

impl From<&User> for EmployeeSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// 프로필 부분 수정 패치.
///
/// 값이 있는 필드만 적용됩니다.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub dne: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.dne.is_none()
    }

    /// 값을 검증하고 정규화한 패치를 반환합니다.
    ///
    /// 저장소는 이 결과의 `Some` 필드만 해당 컬럼에 기록합니다.
    pub fn normalize(&self, role: Role) -> ServiceResult<UserPatch> {
        let dne = match &self.dne {
            Some(_) if role.is_admin() => {
                return Err(ServiceError::validation(
                    "administrators do not carry an employee number",
                ))
            }
            Some(dne) => Some(required_text("dne", dne)?),
            None => None,
        };

        Ok(UserPatch {
            name: self.name.as_deref().map(|n| required_text("name", n)).transpose()?,
            email: self.email.as_deref().map(normalize_email).transpose()?,
            dne,
        })
    }

    /// 정규화된 패치를 레코드에 그대로 덮어씁니다.
    pub fn merge_into(&self, user: &mut User, at: DateTime<Utc>) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(dne) = &self.dne {
            user.dne = Some(dne.clone());
        }
        user.updated_at = at;
    }
}

/// 앞뒤 공백을 제거하고 비어 있으면 검증 에러를 반환합니다.
pub fn required_text(field: &str, value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// 이메일 형식을 확인하고 소문자로 정규화합니다.
pub fn normalize_email(email: &str) -> ServiceResult<String> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if !valid || email.chars().any(char::is_whitespace) {
        return Err(ServiceError::validation(format!("invalid email address: {}", email)));
    }
    Ok(email)
}
