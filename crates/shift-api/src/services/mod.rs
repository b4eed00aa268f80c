//! 애플리케이션 서비스.
//!
//! 라우트 핸들러는 이 계층만 호출합니다. 각 서비스는 저장소 트레이트 객체를
//! 받아 생성되므로 PostgreSQL과 인메모리 저장소를 그대로 교체할 수 있습니다.

pub mod accounts;
pub mod bootstrap;
pub mod credentials;
pub mod shifts;

pub use accounts::{AccountService, ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest};
pub use bootstrap::seed_admin;
pub use credentials::{CredentialStore, NewCredential};
pub use shifts::ShiftService;
