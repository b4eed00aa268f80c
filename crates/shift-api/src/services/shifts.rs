//! 근무 서비스.
//!
//! 근무 생성/수정/삭제는 관리자 전용이며, 조회 결과는 항상 직원 요약 정보가
//! 채워진 [`ShiftView`]로 반환됩니다.

use std::collections::HashMap;
use std::sync::Arc;

use shift_core::{
    EmployeeSummary, NewShift, ServiceError, ServiceResult, Shift, ShiftFilter, ShiftPatch,
    ShiftView,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::credentials::CredentialStore;
use crate::auth::{authorize, require_admin, Claims, Operation};
use crate::repository::ShiftStore;

/// 근무 서비스.
#[derive(Clone)]
pub struct ShiftService {
    store: Arc<dyn ShiftStore>,
    credentials: CredentialStore,
}

impl ShiftService {
    pub fn new(store: Arc<dyn ShiftStore>, credentials: CredentialStore) -> Self {
        Self { store, credentials }
    }

    /// 근무 생성 (관리자).
    ///
    /// 직원이 존재하지 않으면 `NotFound`, 종료 시각이 시작 시각 이전이면 `Validation`.
    pub async fn create(&self, input: NewShift, actor: &Claims) -> ServiceResult<ShiftView> {
        require_admin(actor, Operation::CreateShift)?;

        let shift = input.into_shift()?;
        let employee = self.employee(shift.employee_id).await?;

        self.store.insert(&shift).await?;
        info!(
            shift_id = %shift.id,
            employee_id = %shift.employee_id,
            shift_type = %shift.shift_type,
            start = %shift.start,
            "근무 생성"
        );

        Ok(ShiftView::new(shift, employee))
    }

    /// 근무 부분 수정 (관리자).
    pub async fn update(
        &self,
        id: Uuid,
        patch: ShiftPatch,
        actor: &Claims,
    ) -> ServiceResult<ShiftView> {
        require_admin(actor, Operation::UpdateShift)?;
        if patch.is_empty() {
            return Err(ServiceError::validation("no fields to update"));
        }

        let current = self.load(id).await?;
        if let Some(employee_id) = patch.employee_change(&current) {
            self.employee(employee_id).await?;
        }

        let updated = patch.apply(&current)?;
        if !self.store.update(&updated).await? {
            return Err(shift_not_found(id));
        }

        info!(shift_id = %id, actor = %actor.sub, "근무 수정");
        let employee = self.employee(updated.employee_id).await?;
        Ok(ShiftView::new(updated, employee))
    }

    /// 근무 삭제 (관리자).
    pub async fn delete(&self, id: Uuid, actor: &Claims) -> ServiceResult<()> {
        require_admin(actor, Operation::DeleteShift)?;

        if !self.store.delete(id).await? {
            return Err(shift_not_found(id));
        }
        info!(shift_id = %id, actor = %actor.sub, "근무 삭제");
        Ok(())
    }

    /// 근무 단건 조회 (담당 직원 또는 관리자).
    ///
    /// 직원에게는 없는 근무와 다른 직원의 근무가 똑같이 `Unauthorized`로 보입니다.
    pub async fn get(&self, id: Uuid, actor: &Claims) -> ServiceResult<ShiftView> {
        let shift = self.store.find_by_id(id).await?;
        authorize(Some(actor), Operation::ViewShift, shift.as_ref().map(|s| s.employee_id))?;
        let shift = shift.ok_or_else(|| shift_not_found(id))?;

        let employee = self.employee(shift.employee_id).await?;
        Ok(ShiftView::new(shift, employee))
    }

    /// 근무 목록.
    ///
    /// 관리자는 필터 조건에 맞는 모든 근무를 봅니다. 직원은 본인 근무만 볼 수 있으며,
    /// 다른 직원을 지정하면 `Unauthorized`.
    pub async fn list(&self, filter: ShiftFilter, actor: &Claims) -> ServiceResult<Vec<ShiftView>> {
        authorize(Some(actor), Operation::ListOwnShifts, None)?;
        filter.validate()?;

        let filter = if actor.is_admin() {
            filter
        } else {
            match filter.employee_id {
                Some(requested) if requested != actor.sub => {
                    return Err(ServiceError::Unauthorized(
                        "not allowed to list shifts of another employee".to_string(),
                    ))
                }
                _ => filter.for_employee(actor.sub),
            }
        };

        self.find(&filter).await
    }

    /// 특정 직원의 근무 목록 (본인 또는 관리자).
    pub async fn list_employee(
        &self,
        employee_id: Uuid,
        filter: ShiftFilter,
        actor: &Claims,
    ) -> ServiceResult<Vec<ShiftView>> {
        authorize(Some(actor), Operation::ListEmployeeShifts, Some(employee_id))?;
        filter.validate()?;

        self.employee(employee_id).await?;
        self.find(&filter.for_employee(employee_id)).await
    }

    async fn find(&self, filter: &ShiftFilter) -> ServiceResult<Vec<ShiftView>> {
        let shifts = self.store.find(filter).await?;
        debug!(count = shifts.len(), ?filter, "근무 조회");

        let mut employees: HashMap<Uuid, EmployeeSummary> = HashMap::new();
        let mut views = Vec::with_capacity(shifts.len());
        for shift in shifts {
            let employee = match employees.get(&shift.employee_id) {
                Some(summary) => summary.clone(),
                None => {
                    let summary = self.assigned_employee(&shift).await?;
                    employees.insert(shift.employee_id, summary.clone());
                    summary
                }
            };
            views.push(ShiftView::new(shift, employee));
        }
        Ok(views)
    }

    async fn load(&self, id: Uuid) -> ServiceResult<Shift> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| shift_not_found(id))
    }

    /// 배정 대상 직원 확인. 없으면 `NotFound`.
    async fn employee(&self, id: Uuid) -> ServiceResult<EmployeeSummary> {
        self.credentials
            .find_by_id(id)
            .await
            .map(|user| EmployeeSummary::from(&user))
            .map_err(|e| match e {
                ServiceError::NotFound(_) => {
                    ServiceError::not_found(format!("employee {} not found", id))
                }
                other => other,
            })
    }

    /// 저장된 근무의 직원. 참조 무결성이 깨진 경우 내부 에러입니다.
    async fn assigned_employee(&self, shift: &Shift) -> ServiceResult<EmployeeSummary> {
        self.employee(shift.employee_id).await.map_err(|e| match e {
            ServiceError::NotFound(_) => ServiceError::internal(format!(
                "shift {} references missing employee {}",
                shift.id, shift.employee_id
            )),
            other => other,
        })
    }
}

fn shift_not_found(id: Uuid) -> ServiceError {
    ServiceError::not_found(format!("shift {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MemoryShiftStore, MemoryUserStore};
    use crate::services::credentials::NewCredential;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use shift_core::{Role, ShiftType, User};

    struct Fixture {
        service: ShiftService,
        admin: Claims,
        lucia: User,
        marco: User,
    }

    async fn register(credentials: &CredentialStore, username: &str, dne: Option<&str>, role: Role) -> User {
        credentials
            .register(NewCredential {
                username: username.to_string(),
                email: format!("{}@metro.es", username),
                password: "Turnos2024".to_string(),
                name: username.to_string(),
                dne: dne.map(str::to_string),
                role,
            })
            .await
            .unwrap()
    }

    fn claims(user: &User) -> Claims {
        Claims::new(user.id, user.username.clone(), user.role, Duration::hours(1))
    }

    async fn fixture() -> Fixture {
        let credentials = CredentialStore::new(Arc::new(MemoryUserStore::new()));
        let admin = register(&credentials, "admin", None, Role::Admin).await;
        let lucia = register(&credentials, "lucia", Some("1001"), Role::Employee).await;
        let marco = register(&credentials, "marco", Some("1002"), Role::Employee).await;

        Fixture {
            service: ShiftService::new(Arc::new(MemoryShiftStore::new()), credentials),
            admin: claims(&admin),
            lucia,
            marco,
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, day, hour, 0, 0).unwrap()
    }

    fn morning(employee_id: Uuid, day: u32) -> NewShift {
        NewShift {
            start: at(day, 6),
            end: at(day, 14),
            title: "Turno mañana".to_string(),
            shift_type: ShiftType::Morning,
            employee_id,
        }
    }

    #[tokio::test]
    async fn test_create_resolves_employee() {
        let f = fixture().await;
        let view = f.service.create(morning(f.lucia.id, 5), &f.admin).await.unwrap();

        assert_eq!(view.title, "Turno mañana");
        assert_eq!(view.shift_type, ShiftType::Morning);
        assert_eq!(view.employee.id, f.lucia.id);
        assert_eq!(view.employee.username, "lucia");

        let fetched = f.service.get(view.id, &f.admin).await.unwrap();
        assert_eq!(fetched, view);
    }

    #[tokio::test]
    async fn test_create_rejections() {
        let f = fixture().await;

        let unknown = f.service.create(morning(Uuid::new_v4(), 5), &f.admin).await;
        assert!(matches!(unknown, Err(ServiceError::NotFound(_))));

        let mut inverted = morning(f.lucia.id, 5);
        inverted.end = inverted.start;
        assert!(matches!(
            f.service.create(inverted, &f.admin).await,
            Err(ServiceError::Validation(_))
        ));

        let by_employee = f.service.create(morning(f.lucia.id, 5), &claims(&f.lucia)).await;
        assert!(matches!(by_employee, Err(ServiceError::Unauthorized(_))));

        let all = f.service.list(ShiftFilter::default(), &f.admin).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_update_validates_merged_window() {
        let f = fixture().await;
        let view = f.service.create(morning(f.lucia.id, 5), &f.admin).await.unwrap();

        // 시작만 종료 이후로 옮기면 거부
        let patch = ShiftPatch {
            start: Some(at(5, 15)),
            ..Default::default()
        };
        assert!(matches!(
            f.service.update(view.id, patch, &f.admin).await,
            Err(ServiceError::Validation(_))
        ));
        assert_eq!(f.service.get(view.id, &f.admin).await.unwrap().start, at(5, 6));

        let patch = ShiftPatch {
            start: Some(at(5, 14)),
            end: Some(at(5, 22)),
            shift_type: Some(ShiftType::Afternoon),
            employee_id: Some(f.marco.id),
            ..Default::default()
        };
        let updated = f.service.update(view.id, patch, &f.admin).await.unwrap();
        assert_eq!(updated.shift_type, ShiftType::Afternoon);
        assert_eq!(updated.employee.id, f.marco.id);
        assert_eq!(updated.title, "Turno mañana");
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_employee_and_missing_shift() {
        let f = fixture().await;
        let view = f.service.create(morning(f.lucia.id, 5), &f.admin).await.unwrap();

        let patch = ShiftPatch {
            employee_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(matches!(
            f.service.update(view.id, patch, &f.admin).await,
            Err(ServiceError::NotFound(_))
        ));

        let patch = ShiftPatch {
            title: Some("Turno noche".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            f.service.update(Uuid::new_v4(), patch, &f.admin).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let f = fixture().await;
        let view = f.service.create(morning(f.lucia.id, 5), &f.admin).await.unwrap();

        assert!(matches!(
            f.service.delete(view.id, &claims(&f.lucia)).await,
            Err(ServiceError::Unauthorized(_))
        ));
        f.service.delete(view.id, &f.admin).await.unwrap();
        assert!(matches!(
            f.service.delete(view.id, &f.admin).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_employee_listing_is_scoped() {
        let f = fixture().await;
        for day in [7, 5, 6] {
            f.service.create(morning(f.lucia.id, day), &f.admin).await.unwrap();
        }
        f.service.create(morning(f.marco.id, 5), &f.admin).await.unwrap();

        let lucia = claims(&f.lucia);
        let own = f.service.list(ShiftFilter::default(), &lucia).await.unwrap();
        assert_eq!(own.len(), 3);
        assert!(own.iter().all(|s| s.employee.id == f.lucia.id));
        assert!(own.windows(2).all(|w| w[0].start <= w[1].start));

        let other = ShiftFilter::default().for_employee(f.marco.id);
        assert!(matches!(
            f.service.list(other, &lucia).await,
            Err(ServiceError::Unauthorized(_))
        ));
        assert!(matches!(
            f.service.list_employee(f.marco.id, ShiftFilter::default(), &lucia).await,
            Err(ServiceError::Unauthorized(_))
        ));

        let all = f.service.list(ShiftFilter::default(), &f.admin).await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_get_is_self_or_admin() {
        let f = fixture().await;
        let view = f.service.create(morning(f.lucia.id, 5), &f.admin).await.unwrap();

        assert!(f.service.get(view.id, &claims(&f.lucia)).await.is_ok());
        assert!(matches!(
            f.service.get(view.id, &claims(&f.marco)).await,
            Err(ServiceError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_shift_looks_forbidden_to_employees() {
        let f = fixture().await;
        let view = f.service.create(morning(f.lucia.id, 5), &f.admin).await.unwrap();
        let ghost = Uuid::new_v4();

        let foreign = f.service.get(view.id, &claims(&f.marco)).await.unwrap_err();
        let missing = f.service.get(ghost, &claims(&f.marco)).await.unwrap_err();
        assert!(matches!(missing, ServiceError::Unauthorized(_)));
        assert_eq!(foreign.to_string(), missing.to_string());

        assert!(matches!(
            f.service.get(ghost, &f.admin).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_date_filter() {
        let f = fixture().await;
        for day in [5, 6, 7] {
            f.service.create(morning(f.lucia.id, day), &f.admin).await.unwrap();
        }

        let filter = ShiftFilter {
            start_date: Some(at(6, 0)),
            end_date: Some(at(7, 6)),
            ..Default::default()
        };
        let found = f.service.list(filter, &f.admin).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].start, at(6, 6));

        let inverted = ShiftFilter {
            start_date: Some(at(7, 0)),
            end_date: Some(at(6, 0)),
            ..Default::default()
        };
        assert!(matches!(
            f.service.list(inverted, &f.admin).await,
            Err(ServiceError::Validation(_))
        ));
    }
}
