//! 인증 및 권한 부여.
//!
//! # 구성 요소
//!
//! - [`SessionIssuer`]: JWT 접근 토큰 발급/검증 (HS256, 24시간)
//! - [`Claims`]: JWT 페이로드 구조체
//! - [`authorize`]: 연산별 접근 제어 (공개, 인증, 본인 또는 관리자, 관리자 전용)
//! - [`JwtAuth`] / [`OptionalJwtAuth`]: Axum 핸들러용 토큰 추출기
//! - Argon2 비밀번호 해싱 함수
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn create(
//!     State(state): State<Arc<AppState>>,
//!     JwtAuth(claims): JwtAuth,
//! ) -> ApiResult<Json<ShiftView>> {
//!     require_admin(&claims, Operation::CreateShift)?;
//!     // ...
//! }
//! ```

mod guard;
mod jwt;
mod middleware;
mod password;

pub use guard::{authorize, require_admin, Access, Operation};
pub use jwt::{create_token, decode_token, Claims, IssuedToken, JwtError, SessionIssuer};
pub use middleware::{JwtAuth, JwtAuthError, OptionalJwtAuth};
pub use password::{
    hash_password, hash_password_blocking, validate_password_strength, verify_password,
    verify_password_blocking, PasswordError,
};
