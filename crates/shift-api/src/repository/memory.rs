//! 인메모리 저장소.
//!
//! 데이터베이스가 설정되지 않은 개발 환경과 테스트에서 사용합니다.
//! 고유성 검사와 쓰기는 같은 쓰기 잠금 안에서 수행됩니다.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shift_core::{Shift, ShiftFilter, User, UserPatch};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ShiftStore, StoreError, StoreResult, UniqueField, UserStore};

/// 인메모리 [`UserStore`].
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `candidate`가 `id`가 아닌 다른 사용자와 충돌하는지 확인합니다.
fn find_collision(users: &HashMap<Uuid, User>, candidate: &User) -> Option<UniqueField> {
    users
        .values()
        .filter(|existing| existing.id != candidate.id)
        .find_map(|existing| {
            if existing.username == candidate.username {
                Some(UniqueField::Username)
            } else if existing.email == candidate.email {
                Some(UniqueField::Email)
            } else if candidate.dne.is_some() && existing.dne == candidate.dne {
                Some(UniqueField::EmployeeNumber)
            } else {
                None
            }
        })
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if let Some(field) = find_collision(&users, user) {
            return Err(StoreError::UniqueViolation(field));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn set_password_hash(
        &self,
        id: Uuid,
        hash: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.password_hash = hash.to_string();
            user.updated_at = at;
            user.clone()
        }))
    }

    async fn set_active(
        &self,
        id: Uuid,
        active: bool,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.is_active = active;
            user.updated_at = at;
            user.clone()
        }))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        patch: &UserPatch,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<User>> {
        let mut users = self.users.write().await;
        let Some(current) = users.get(&id) else {
            return Ok(None);
        };

        let mut merged = current.clone();
        patch.merge_into(&mut merged, at);
        if let Some(field) = find_collision(&users, &merged) {
            return Err(StoreError::UniqueViolation(field));
        }

        users.insert(id, merged.clone());
        Ok(Some(merged))
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let mut list: Vec<User> = self.users.read().await.values().cloned().collect();
        list.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(list)
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(self.users.read().await.len() as i64)
    }
}

/// 인메모리 [`ShiftStore`].
#[derive(Debug, Default)]
pub struct MemoryShiftStore {
    shifts: RwLock<HashMap<Uuid, Shift>>,
}

impl MemoryShiftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShiftStore for MemoryShiftStore {
    async fn insert(&self, shift: &Shift) -> StoreResult<()> {
        self.shifts.write().await.insert(shift.id, shift.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Shift>> {
        Ok(self.shifts.read().await.get(&id).cloned())
    }

    async fn find(&self, filter: &ShiftFilter) -> StoreResult<Vec<Shift>> {
        let mut matched: Vec<Shift> = self
            .shifts
            .read()
            .await
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        Ok(matched)
    }

    async fn update(&self, shift: &Shift) -> StoreResult<bool> {
        let mut shifts = self.shifts.write().await;
        match shifts.get_mut(&shift.id) {
            Some(existing) => {
                *existing = shift.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.shifts.write().await.remove(&id).is_some())
    }
}
