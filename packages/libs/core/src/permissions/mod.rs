//! 권한 평가
//!
//! # 개요
//!
//! 자격 증명이 가진 원시 토큰(scope 또는 group)을 구조화된 권한으로 파싱하고,
//! 요청된 (액션, 리소스)에 대한 허용 여부를 결정합니다.
//!
//! # 모듈 구조
//!
//! - `sensitivity`: 민감도 수준과 부분 순서
//! - `grant`: 권한 토큰 문법 파서
//! - `registry`: 보호 도메인 레지스트리
//! - `evaluator`: 정책 엔진

mod evaluator;
mod grant;
mod registry;
mod sensitivity;

pub use evaluator::{Decision, DenyReason, PolicyEngine, ResourceRef};
pub use grant::{
    parse_client_scope, parse_user_group, parse_user_token, Action, Grant, GrantParseError,
};
pub use registry::{ProtectedDomainRegistry, ProtectedDomains};
pub use sensitivity::SensitivityLevel;
