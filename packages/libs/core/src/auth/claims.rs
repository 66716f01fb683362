//! 토큰 Claims
//!
//! 이미 검증된 토큰 페이로드에서 자격 증명을 추출합니다.
//! 서명 검증은 외부 Identity Provider 연동 계층의 책임입니다.

use serde::Deserialize;
use serde_json::Value;

use super::credential::Credential;
use crate::error::{Error, Result};

/// Claims 제공자
///
/// 요청 토큰을 자격 증명으로 변환하는 외부 협력자입니다.
pub trait ClaimsProvider: Send + Sync {
    fn resolve(&self, token: &str) -> Result<Credential>;
}

/// Access Token 페이로드
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    /// Subject
    #[serde(default)]
    pub sub: Option<String>,

    /// 사용자 그룹 (User 토큰)
    #[serde(default, rename = "cognito:groups")]
    pub groups: Option<Vec<String>>,

    /// 공백 구분 scope 문자열 (Client 토큰)
    #[serde(default)]
    pub scope: Option<String>,

    /// scope 배열 (Client 토큰, 대체 형식)
    #[serde(default)]
    pub scopes: Option<Vec<String>>,
}

impl TokenClaims {
    /// JSON 페이로드에서 자격 증명 생성
    ///
    /// # Arguments
    /// * `payload` - 검증된 토큰 페이로드
    /// * `resource_server_id` - scope 앞에 붙는 리소스 서버 ID (빈 문자열 = 접두사 없음)
    pub fn from_payload(payload: &Value, resource_server_id: &str) -> Result<Credential> {
        let claims = TokenClaims::deserialize(payload).map_err(|e| Error::InvalidClaims {
            reason: e.to_string(),
        })?;
        claims.into_credential(resource_server_id)
    }

    /// 자격 증명으로 변환
    pub fn into_credential(self, resource_server_id: &str) -> Result<Credential> {
        let subject = match self.sub {
            Some(sub) if !sub.trim().is_empty() => sub,
            _ => {
                return Err(Error::InvalidClaims {
                    reason: "missing or empty subject".to_string(),
                })
            }
        };

        if let Some(groups) = self.groups.filter(|g| !g.is_empty()) {
            return Ok(Credential::user(subject, groups));
        }

        if let Some(scope) = self.scope.filter(|s| !s.trim().is_empty()) {
            let scopes = scope
                .split_whitespace()
                .map(|s| strip_resource_server(s, resource_server_id))
                .collect::<Result<Vec<_>>>()?;
            return Ok(Credential::client(subject, scopes));
        }

        if let Some(scopes) = self.scopes.filter(|s| !s.is_empty()) {
            return Ok(Credential::client(subject, scopes));
        }

        Err(Error::InvalidClaims {
            reason: "no permissions found".to_string(),
        })
    }
}

/// `{resource_server_id}/` 접두사 제거
fn strip_resource_server(scope: &str, resource_server_id: &str) -> Result<String> {
    if resource_server_id.is_empty() {
        return Ok(scope.to_string());
    }

    let prefix = format!("{}/", resource_server_id.trim_end_matches('/'));
    scope
        .strip_prefix(prefix.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| Error::InvalidClaims {
            reason: format!("invalid scope field: {}", scope),
        })
}
