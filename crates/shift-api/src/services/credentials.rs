//! 자격증명 저장소.
//!
//! 사용자 레코드와 해시된 비밀번호를 관리합니다. 비밀번호는 저장 전에
//! Argon2id로 해싱되며 평문은 어디에도 보관하지 않습니다.

use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use shift_core::{Role, ServiceError, ServiceResult, User, UserPatch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{
    hash_password, hash_password_blocking, verify_password, verify_password_blocking, PasswordError,
};
use crate::repository::UserStore;

/// 존재하지 않는 사용자 로그인 시 검증에 사용할 더미 해시.
///
/// 사용자 유무와 관계없이 해시 검증 비용을 치르게 하여 응답 시간 차이를 없앱니다.
/// 첫 로그인이 해싱 비용까지 치르지 않도록 [`CredentialStore::warm_up`]으로 미리 계산합니다.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("dummy-password-for-timing-0").ok());

/// 새 자격증명 입력 (검증이 끝난 값).
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub dne: Option<String>,
    pub role: Role,
}

/// 사용자 레코드 저장소 래퍼.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn UserStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// 비밀번호를 해싱하여 새 사용자를 저장합니다.
    ///
    /// 사용자명, 이메일, 사원번호 중 하나라도 이미 사용 중이면 `Conflict`.
    pub async fn register(&self, input: NewCredential) -> ServiceResult<User> {
        let hash = hash_password_blocking(input.password).await?;
        let user = User::new(
            input.username,
            input.email,
            hash,
            input.name,
            input.dne,
            input.role,
        );

        self.store.insert(&user).await?;
        info!(user_id = %user.id, username = %user.username, role = %user.role, "사용자 등록");
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> ServiceResult<User> {
        self.store
            .find_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("user '{}' not found", username)))
    }

    /// 사용자명으로 조회하되 없으면 `None`.
    pub async fn lookup(&self, username: &str) -> ServiceResult<Option<User>> {
        Ok(self.store.find_by_username(username).await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> ServiceResult<User> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("user {} not found", id)))
    }

    /// 후보 비밀번호가 저장된 해시와 일치하는지 확인합니다.
    pub async fn verify_secret(&self, user: &User, candidate: &str) -> ServiceResult<bool> {
        match verify_password_blocking(candidate.to_string(), user.password_hash.clone()).await {
            Ok(()) => Ok(true),
            Err(PasswordError::VerificationFailed) => Ok(false),
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "저장된 비밀번호 해시 검증 불가");
                Err(e.into())
            }
        }
    }

    /// 더미 해시를 블로킹 스레드에서 미리 계산합니다. 서버 시작 시 한 번 호출합니다.
    pub async fn warm_up(&self) {
        let ready = tokio::task::spawn_blocking(|| DUMMY_HASH.is_some())
            .await
            .unwrap_or(false);
        if !ready {
            warn!("더미 해시 생성 실패: 알 수 없는 사용자 로그인의 응답 시간이 달라질 수 있음");
        }
    }

    /// 존재하지 않는 사용자에 대해 같은 비용의 검증을 수행합니다. 항상 `false`.
    pub async fn verify_unknown(&self, candidate: &str) -> bool {
        let candidate = candidate.to_string();
        let _ = tokio::task::spawn_blocking(move || {
            if let Some(hash) = DUMMY_HASH.as_ref() {
                let _ = verify_password(&candidate, hash);
            }
        })
        .await;
        false
    }

    /// 비밀번호 해시만 교체합니다. 활성 상태 등 다른 필드는 건드리지 않습니다.
    pub async fn set_secret(&self, id: Uuid, new_secret: &str) -> ServiceResult<User> {
        let hash = hash_password_blocking(new_secret.to_string()).await?;
        let user = self
            .store
            .set_password_hash(id, &hash, Utc::now())
            .await?
            .ok_or_else(|| missing(id))?;

        debug!(user_id = %id, "비밀번호 변경");
        Ok(user)
    }

    /// 비활성화 (soft delete). 레코드는 유지됩니다.
    pub async fn deactivate(&self, id: Uuid) -> ServiceResult<User> {
        let user = self
            .store
            .set_active(id, false, Utc::now())
            .await?
            .ok_or_else(|| missing(id))?;

        info!(user_id = %id, username = %user.username, "사용자 비활성화");
        Ok(user)
    }

    /// 전달된 필드만 갱신합니다. 이메일/사원번호가 다른 사용자와 겹치면 `Conflict`.
    pub async fn update_profile(&self, id: Uuid, patch: &UserPatch) -> ServiceResult<User> {
        // 역할은 프로필 수정 대상이 아님
        let current = self.find_by_id(id).await?;
        let patch = patch.normalize(current.role)?;

        self.store
            .update_profile(id, &patch, Utc::now())
            .await?
            .ok_or_else(|| missing(id))
    }

    /// 사용자명 순 전체 목록.
    pub async fn list(&self) -> ServiceResult<Vec<User>> {
        Ok(self.store.list().await?)
    }

    pub async fn count(&self) -> ServiceResult<i64> {
        Ok(self.store.count().await?)
    }
}

fn missing(id: Uuid) -> ServiceError {
    ServiceError::not_found(format!("user {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryUserStore;

    fn credentials() -> CredentialStore {
        CredentialStore::new(Arc::new(MemoryUserStore::new()))
    }

    fn input(username: &str, dne: Option<&str>) -> NewCredential {
        NewCredential {
            username: username.to_string(),
            email: format!("{}@metro.es", username),
            password: "Turnos2024".to_string(),
            name: username.to_string(),
            dne: dne.map(str::to_string),
            role: Role::Employee,
        }
    }

    #[tokio::test]
    async fn test_register_hashes_secret() {
        let store = credentials();
        let user = store.register(input("ana", Some("1001"))).await.unwrap();

        assert_ne!(user.password_hash, "Turnos2024");
        assert!(user.password_hash.starts_with("$argon2id$"));
        assert!(user.is_active);
        assert!(store.verify_secret(&user, "Turnos2024").await.unwrap());
        assert!(!store.verify_secret(&user, "turnos2024").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_conflicts() {
        let store = credentials();
        store.register(input("ana", Some("1001"))).await.unwrap();

        let dup = store.register(input("ana", Some("1002"))).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        let mut same_dne = input("bea", Some("1001"));
        same_dne.email = "bea@metro.es".to_string();
        assert!(matches!(store.register(same_dne).await, Err(ServiceError::Conflict(_))));

        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_set_secret_and_deactivate() {
        let store = credentials();
        let user = store.register(input("ana", Some("1001"))).await.unwrap();

        store.set_secret(user.id, "NuevaClave9").await.unwrap();
        let reloaded = store.find_by_username("ana").await.unwrap();
        assert!(store.verify_secret(&reloaded, "NuevaClave9").await.unwrap());
        assert!(!store.verify_secret(&reloaded, "Turnos2024").await.unwrap());

        store.deactivate(user.id).await.unwrap();
        let reloaded = store.find_by_id(user.id).await.unwrap();
        assert!(!reloaded.is_active);
        assert_eq!(store.count().await.unwrap(), 1);

        let ghost = store.deactivate(Uuid::new_v4()).await;
        assert!(matches!(ghost, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_secret_change_after_deactivation_keeps_account_inactive() {
        let store = credentials();
        let user = store.register(input("ana", Some("1001"))).await.unwrap();

        // 비밀번호 변경 도중 관리자가 비활성화한 상황
        let snapshot = store.find_by_id(user.id).await.unwrap();
        store.deactivate(user.id).await.unwrap();
        let updated = store.set_secret(snapshot.id, "NuevaClave9").await.unwrap();

        assert!(!updated.is_active);
        assert!(!store.find_by_id(user.id).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn test_profile_update_keeps_deactivation() {
        let store = credentials();
        let user = store.register(input("ana", Some("1001"))).await.unwrap();
        store.deactivate(user.id).await.unwrap();

        let patch = UserPatch {
            name: Some("  Ana María ".to_string()),
            ..Default::default()
        };
        let updated = store.update_profile(user.id, &patch).await.unwrap();

        assert_eq!(updated.name, "Ana María");
        assert!(!updated.is_active);
        assert_eq!(updated.password_hash, user.password_hash);
    }

    #[tokio::test]
    async fn test_update_profile_conflict_on_email() {
        let store = credentials();
        store.register(input("ana", Some("1001"))).await.unwrap();
        let bea = store.register(input("bea", Some("1002"))).await.unwrap();

        let patch = UserPatch {
            email: Some("ana@metro.es".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            store.update_profile(bea.id, &patch).await,
            Err(ServiceError::Conflict(_))
        ));

        let missing = store.update_profile(Uuid::new_v4(), &UserPatch::default()).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unknown_user_verification_is_false() {
        let store = credentials();
        store.warm_up().await;
        assert!(Lazy::get(&DUMMY_HASH).is_some());
        assert!(!store.verify_unknown("whatever1").await);
    }
}
