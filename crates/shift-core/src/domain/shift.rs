//! 근무(Shift) 도메인.
//!
//! 근무의 불변식은 한 가지입니다: 종료 시각은 시작 시각보다 엄격히 뒤여야 합니다.
//! 생성([`NewShift::into_shift`])과 부분 수정([`ShiftPatch::apply`]) 모두
//! 병합된 최종 결과에 대해 이 조건을 검사합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{required_text, EmployeeSummary};
use crate::error::{ServiceError, ServiceResult};

/// 근무 유형.
///
/// 기존 클라이언트가 보내는 스페인어 값(`mañana`, `tarde`, `noche`)도 입력으로 허용하며,
/// 출력은 항상 영문 값입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    /// 오전 근무
    #[serde(alias = "mañana", alias = "manana")]
    Morning,
    /// 오후 근무
    #[serde(alias = "tarde")]
    Afternoon,
    /// 야간 근무
    #[serde(alias = "noche")]
    Night,
}

impl ShiftType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftType::Morning => "morning",
            ShiftType::Afternoon => "afternoon",
            ShiftType::Night => "night",
        }
    }
}

impl std::fmt::Display for ShiftType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShiftType {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" | "mañana" | "manana" => Ok(ShiftType::Morning),
            "afternoon" | "tarde" => Ok(ShiftType::Afternoon),
            "night" | "noche" => Ok(ShiftType::Night),
            other => Err(ServiceError::validation(format!(
                "unknown shift type: {} (expected morning, afternoon or night)",
                other
            ))),
        }
    }
}

/// 저장된 근무 레코드.
#[derive(Debug, Clone, PartialEq)]
pub struct Shift {
    pub id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub title: String,
    pub shift_type: ShiftType,
    /// 배정된 직원 (소유하지 않는 참조)
    pub employee_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shift {
    /// 레코드가 불변식을 만족하는지 확인합니다.
    pub fn validate(&self) -> ServiceResult<()> {
        validate_window(self.start, self.end)?;
        required_text("title", &self.title)?;
        Ok(())
    }
}

/// 종료 시각이 시작 시각보다 뒤인지 확인합니다.
pub fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>) -> ServiceResult<()> {
    if end <= start {
        return Err(ServiceError::validation(format!(
            "end time must be after start time (start: {}, end: {})",
            start.to_rfc3339(),
            end.to_rfc3339()
        )));
    }
    Ok(())
}

/// 근무 생성 입력.
///
/// 와이어 형식: `{start, end, title, type, employee}` (시각은 RFC 3339).
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct NewShift {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub title: String,
    #[serde(rename = "type")]
    pub shift_type: ShiftType,
    #[serde(rename = "employee")]
    pub employee_id: Uuid,
}

impl NewShift {
    /// 입력을 검증하고 새 근무 레코드를 만듭니다.
    pub fn into_shift(self) -> ServiceResult<Shift> {
        let now = Utc::now();
        let shift = Shift {
            id: Uuid::new_v4(),
            start: self.start,
            end: self.end,
            title: required_text("title", &self.title)?,
            shift_type: self.shift_type,
            employee_id: self.employee_id,
            created_at: now,
            updated_at: now,
        };
        shift.validate()?;
        Ok(shift)
    }
}

/// 근무 부분 수정 패치.
///
/// 값이 있는 필드만 적용되며, 검증은 병합된 결과에 대해 수행됩니다.
/// 시작 시각만 옮기더라도 기존 종료 시각과 다시 비교합니다.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct ShiftPatch {
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub shift_type: Option<ShiftType>,
    #[serde(default, rename = "employee")]
    pub employee_id: Option<Uuid>,
}

impl ShiftPatch {
    pub fn is_empty(&self) -> bool {
        self.start.is_none()
            && self.end.is_none()
            && self.title.is_none()
            && self.shift_type.is_none()
            && self.employee_id.is_none()
    }

    /// 직원이 실제로 바뀌는 경우 새 직원 ID를 반환합니다.
    pub fn employee_change(&self, current: &Shift) -> Option<Uuid> {
        self.employee_id.filter(|id| *id != current.employee_id)
    }

    /// 패치를 적용하고 병합 결과를 검증합니다. 원본은 변경하지 않습니다.
    pub fn apply(&self, shift: &Shift) -> ServiceResult<Shift> {
        let mut merged = shift.clone();

        if let Some(start) = self.start {
            merged.start = start;
        }
        if let Some(end) = self.end {
            merged.end = end;
        }
        if let Some(title) = &self.title {
            merged.title = required_text("title", title)?;
        }
        if let Some(shift_type) = self.shift_type {
            merged.shift_type = shift_type;
        }
        if let Some(employee_id) = self.employee_id {
            merged.employee_id = employee_id;
        }

        merged.validate()?;
        merged.updated_at = Utc::now();
        Ok(merged)
    }
}

/// 근무 조회 필터.
///
/// 날짜 범위는 시작 시각 기준 반열린 구간 `[start_date, end_date)`입니다.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "utoipa-support", into_params(parameter_in = Query))]
#[serde(rename_all = "camelCase")]
pub struct ShiftFilter {
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, rename = "employee")]
    pub employee_id: Option<Uuid>,
    #[serde(default, rename = "type")]
    pub shift_type: Option<ShiftType>,
}

impl ShiftFilter {
    /// 특정 직원으로 범위를 제한한 필터.
    pub fn for_employee(mut self, employee_id: Uuid) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    pub fn validate(&self) -> ServiceResult<()> {
        if let (Some(from), Some(to)) = (self.start_date, self.end_date) {
            if from >= to {
                return Err(ServiceError::validation(
                    "startDate must be earlier than endDate",
                ));
            }
        }
        Ok(())
    }

    pub fn matches(&self, shift: &Shift) -> bool {
        self.start_date.map_or(true, |from| shift.start >= from)
            && self.end_date.map_or(true, |to| shift.start < to)
            && self.employee_id.map_or(true, |id| shift.employee_id == id)
            && self.shift_type.map_or(true, |t| shift.shift_type == t)
    }
}

/// 직원 정보가 채워진 근무 응답.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct ShiftView {
    pub id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub title: String,
    #[serde(rename = "type")]
    pub shift_type: ShiftType,
    pub employee: EmployeeSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShiftView {
    pub fn new(shift: Shift, employee: EmployeeSummary) -> Self {
        Self {
            id: shift.id,
            start: shift.start,
            end: shift.end,
            title: shift.title,
            shift_type: shift.shift_type,
            employee,
            created_at: shift.created_at,
            updated_at: shift.updated_at,
        }
    }
}
