//! 통합 테스트 공용 헬퍼.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use secrecy::SecretString;
use shift_api::services::{LoginRequest, RegisterRequest};
use shift_api::{seed_admin, AppState, Claims};
use shift_core::{AuthConfig, BootstrapAdminConfig, NewShift, ShiftType, UserProfile};
use uuid::Uuid;

pub const ADMIN_PASSWORD: &str = "Admin1234";
pub const EMPLOYEE_PASSWORD: &str = "Turnos2024";

/// 관리자 한 명이 시딩된 인메모리 상태.
pub async fn seeded_state() -> AppState {
    let state = AppState::in_memory(&AuthConfig {
        signing_key: SecretString::new("integration-test-signing-key-0123456789".into()),
        token_ttl_hours: 24,
    });

    let admin = BootstrapAdminConfig {
        username: "admin".to_string(),
        email: "admin@metro.es".to_string(),
        password: SecretString::new(ADMIN_PASSWORD.into()),
        name: "Administrador".to_string(),
    };
    seed_admin(&state.credentials, Some(&admin))
        .await
        .expect("seed admin");

    state
}

/// 로그인 후 발급된 토큰을 검증하여 Claims를 얻습니다.
pub async fn login_claims(state: &AppState, username: &str, password: &str) -> Claims {
    let response = state
        .accounts
        .login(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
        .await
        .expect("login");
    state.sessions.verify(&response.token).expect("verify token")
}

pub async fn admin_claims(state: &AppState) -> Claims {
    login_claims(state, "admin", ADMIN_PASSWORD).await
}

pub fn employee_request(username: &str, dne: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: format!("{}@metro.es", username),
        password: EMPLOYEE_PASSWORD.to_string(),
        name: format!("{} García", username),
        dne: Some(dne.to_string()),
        role: None,
    }
}

pub async fn register_employee(state: &AppState, username: &str, dne: &str) -> UserProfile {
    state
        .accounts
        .register(employee_request(username, dne), None)
        .await
        .expect("register employee")
}

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, day, hour, 0, 0).unwrap()
}

pub fn morning_shift(employee_id: Uuid, day: u32) -> NewShift {
    NewShift {
        start: at(day, 6),
        end: at(day, 14),
        title: "Turno mañana".to_string(),
        shift_type: ShiftType::Morning,
        employee_id,
    }
}
