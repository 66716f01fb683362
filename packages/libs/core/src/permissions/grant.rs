//! 권한 문법 파서
//!
//! 자격 증명의 원시 토큰을 구조화된 [`Grant`]로 변환합니다.
//!
//! # 문법
//!
//! - Client scope: `{ACTION}_{ALL|PUBLIC|PRIVATE}`, `{ACTION}_PROTECTED_{DOMAIN}`
//! - User group: `{ACTION}/{DOMAIN}/{DATASET}`
//! - 독립 액션: `DATA_ADMIN`, `USER_ADMIN`

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::sensitivity::SensitivityLevel;

/// 요청 액션
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Read,
    Write,
    DataAdmin,
    UserAdmin,
}

impl Action {
    /// 문자열에서 파싱 (대소문자 구분)
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "READ" => Some(Action::Read),
            "WRITE" => Some(Action::Write),
            "DATA_ADMIN" => Some(Action::DataAdmin),
            "USER_ADMIN" => Some(Action::UserAdmin),
            _ => None,
        }
    }

    /// 문자열로 변환
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "READ",
            Action::Write => "WRITE",
            Action::DataAdmin => "DATA_ADMIN",
            Action::UserAdmin => "USER_ADMIN",
        }
    }

    /// 민감도 차원이 없는 전역 액션인지
    pub fn is_standalone(&self) -> bool {
        matches!(self, Action::DataAdmin | Action::UserAdmin)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 파싱된 권한
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Grant {
    /// Client scope 기반 권한 (`PROTECTED`일 때만 도메인을 가짐)
    Scope {
        action: Action,
        level: SensitivityLevel,
    },

    /// User group 기반 권한 (민감도 없음, 정확한 도메인+데이터셋)
    Group {
        action: Action,
        domain: String,
        dataset: String,
    },

    /// `DATA_ADMIN`/`USER_ADMIN`
    Standalone { action: Action },
}

impl Grant {
    pub fn action(&self) -> Action {
        match self {
            Grant::Scope { action, .. }
            | Grant::Group { action, .. }
            | Grant::Standalone { action } => *action,
        }
    }
}

/// 권한 토큰 파싱 에러
///
/// 정책 엔진은 이 에러를 치명적으로 취급하지 않고 해당 토큰을 무시합니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrantParseError {
    #[error("unknown action in token: {0}")]
    UnknownAction(String),

    #[error("unknown sensitivity level in token: {0}")]
    UnknownLevel(String),

    #[error("protected scope without domain: {0}")]
    MissingDomain(String),

    #[error("malformed permission token: {0}")]
    Malformed(String),
}

/// Client scope 파싱
pub fn parse_client_scope(token: &str) -> Result<Grant, GrantParseError> {
    if let Some(action) = Action::from_str(token) {
        if action.is_standalone() {
            return Ok(Grant::Standalone { action });
        }
        // `READ`/`WRITE` 단독은 등급이 없음
        return Err(GrantParseError::Malformed(token.to_string()));
    }

    let (action_str, level_str) = token
        .split_once('_')
        .ok_or_else(|| GrantParseError::Malformed(token.to_string()))?;

    let action = match Action::from_str(action_str) {
        Some(action) if !action.is_standalone() => action,
        _ => return Err(GrantParseError::UnknownAction(token.to_string())),
    };

    let level = match level_str {
        "ALL" => SensitivityLevel::All,
        "PUBLIC" => SensitivityLevel::Public,
        "PRIVATE" => SensitivityLevel::Private,
        "PROTECTED" => return Err(GrantParseError::MissingDomain(token.to_string())),
        other => match other.strip_prefix("PROTECTED_") {
            Some(domain) if !domain.trim().is_empty() => SensitivityLevel::protected(domain),
            Some(_) => return Err(GrantParseError::MissingDomain(token.to_string())),
            None => return Err(GrantParseError::UnknownLevel(token.to_string())),
        },
    };

    Ok(Grant::Scope { action, level })
}

/// User group 파싱 (`ACTION/domain/dataset`, 대소문자 구분)
pub fn parse_user_group(token: &str) -> Result<Grant, GrantParseError> {
    let parts: Vec<&str> = token.split('/').collect();

    match parts.as_slice() {
        [action, domain, dataset] if !domain.is_empty() && !dataset.is_empty() => {
            let action = Action::from_str(action)
                .ok_or_else(|| GrantParseError::UnknownAction(token.to_string()))?;
            Ok(Grant::Group {
                action,
                domain: domain.to_string(),
                dataset: dataset.to_string(),
            })
        }
        _ => Err(GrantParseError::Malformed(token.to_string())),
    }
}

/// User 토큰 파싱
///
/// 그룹 문법 외에 `DATA_ADMIN`/`USER_ADMIN` 단독 그룹 이름도 허용합니다.
pub fn parse_user_token(token: &str) -> Result<Grant, GrantParseError> {
    match Action::from_str(token) {
        Some(action) if action.is_standalone() => Ok(Grant::Standalone { action }),
        _ => parse_user_group(token),
    }
}
