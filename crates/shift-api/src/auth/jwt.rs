//! JWT 세션 토큰 처리.
//!
//! 인증된 사용자에게 서명된 접근 토큰을 발급하고 검증합니다.
//! 토큰은 상태를 갖지 않으며(무효화 목록 없음) 로그아웃은 클라이언트가 토큰을 버리는 것입니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use shift_core::{Role, User};
use utoipa::ToSchema;
use uuid::Uuid;

/// JWT Access Token 페이로드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 ID
    pub sub: Uuid,
    /// 사용자 이름
    pub username: String,
    /// 사용자 역할
    pub role: Role,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
    /// JWT ID - 토큰 고유 식별자
    pub jti: String,
}

impl Claims {
    /// 새로운 Claims 생성.
    ///
    /// # Arguments
    ///
    /// * `user_id` - 사용자 ID
    /// * `username` - 사용자 이름
    /// * `role` - 사용자 역할
    /// * `ttl` - 토큰 수명
    pub fn new(user_id: Uuid, username: impl Into<String>, role: Role, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            username: username.into(),
            role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// 토큰이 만료되었는지 확인.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// 발급된 토큰 응답.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IssuedToken {
    /// Access Token
    pub access_token: String,
    /// 토큰 타입 (항상 "Bearer")
    pub token_type: String,
    /// 만료까지 남은 시간 (초)
    pub expires_in: i64,
}

/// JWT 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("토큰 인코딩 실패: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("token has expired")]
    TokenExpired,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("malformed token")]
    InvalidToken,
}

/// Access Token 생성.
pub fn create_token(claims: &Claims, key: &EncodingKey) -> Result<String, JwtError> {
    encode(&Header::new(Algorithm::HS256), claims, key).map_err(JwtError::from)
}

/// JWT 토큰 디코딩 및 검증.
///
/// 만료 판정에 여유 시간(leeway)을 두지 않습니다.
pub fn decode_token(token: &str, key: &DecodingKey) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    decode::<Claims>(token, key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            _ => JwtError::InvalidToken,
        })
}

/// 세션 토큰 발급기.
///
/// 프로세스 전역 서명 키를 보관합니다. 키를 교체하면 이전에 발급된 토큰은 모두 검증에 실패합니다.
#[derive(Clone)]
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionIssuer {
    pub fn new(signing_key: &SecretString, ttl_hours: i64) -> Self {
        let secret = signing_key.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// 사용자에게 새 토큰을 발급합니다.
    pub fn issue(&self, user: &User) -> Result<IssuedToken, JwtError> {
        let claims = Claims::new(user.id, user.username.clone(), user.role, self.ttl);
        let access_token = create_token(&claims, &self.encoding_key)?;

        Ok(IssuedToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.ttl.num_seconds(),
        })
    }

    /// 토큰 서명과 만료를 검증하고 Claims를 반환합니다.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode_token(token, &self.decoding_key)
    }
}

impl std::fmt::Debug for SessionIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIssuer")
            .field("ttl_hours", &self.ttl.num_hours())
            .finish_non_exhaustive()
    }
}
