//! 권한 평가기
//!
//! (자격 증명, 액션, 리소스)에 대해 접근 허용 여부를 결정합니다.
//! 평가는 순수 함수이며, 권한은 매 호출마다 자격 증명의 토큰에서 새로 파싱됩니다.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::grant::{parse_client_scope, parse_user_token, Action, Grant, GrantParseError};
use super::registry::ProtectedDomainRegistry;
use super::sensitivity::{normalize_domain, SensitivityLevel};
use crate::auth::{Credential, SubjectType};
use crate::error::{Error, Result};

/// 접근 대상 리소스
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub domain: String,
    pub dataset: String,
    pub sensitivity: SensitivityLevel,
}

impl ResourceRef {
    pub fn new(
        domain: impl Into<String>,
        dataset: impl Into<String>,
        sensitivity: SensitivityLevel,
    ) -> Self {
        Self {
            domain: domain.into(),
            dataset: dataset.into(),
            sensitivity,
        }
    }

    /// 도메인 범위 보호 리소스 생성
    pub fn protected(domain: impl Into<String>, dataset: impl Into<String>) -> Self {
        let domain = domain.into();
        let sensitivity = SensitivityLevel::protected(&domain);
        Self::new(domain, dataset, sensitivity)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} [{}]", self.domain, self.dataset, self.sensitivity)
    }
}

/// 거부 사유
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// READ/WRITE 요청에 리소스가 없음
    MissingResource,

    /// 레지스트리에 없는 도메인이 PROTECTED로 표시됨
    UnknownProtectedDomain { domain: String },

    /// 요청을 만족하는 권한 없음 (`required`는 만족시킬 수 있었던 권한 종류)
    MissingGrant { required: String },
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::MissingResource => f.write_str("resource required"),
            DenyReason::UnknownProtectedDomain { .. } => f.write_str("unknown protected domain"),
            DenyReason::MissingGrant { required } => write!(f, "requires {}", required),
        }
    }
}

/// 권한 평가 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// 허용 여부
    pub allowed: bool,

    /// 거부 사유 (allowed=false인 경우)
    pub reason: Option<DenyReason>,
}

impl Decision {
    /// 허용 결과 생성
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    /// 거부 결과 생성
    pub fn deny(reason: DenyReason) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }

    /// 거부 사유 문자열
    pub fn reason_text(&self) -> Option<String> {
        self.reason.as_ref().map(|r| r.to_string())
    }

    /// 에러 타입으로 변환
    pub fn into_result(self) -> Result<()> {
        if self.allowed {
            return Ok(());
        }

        match self.reason {
            Some(DenyReason::UnknownProtectedDomain { domain }) => {
                Err(Error::UnknownProtectedDomain { domain })
            }
            Some(reason) => Err(Error::AccessDenied {
                reason: reason.to_string(),
            }),
            None => Err(Error::AccessDenied {
                reason: "access denied".to_string(),
            }),
        }
    }
}

/// 정책 엔진
///
/// 보호 도메인 레지스트리는 호출자가 주입하며 읽기 전용으로 사용합니다.
pub struct PolicyEngine<'a, R: ProtectedDomainRegistry + ?Sized> {
    registry: &'a R,
}

impl<'a, R: ProtectedDomainRegistry + ?Sized> PolicyEngine<'a, R> {
    /// 새 엔진 생성
    pub fn new(registry: &'a R) -> Self {
        Self { registry }
    }

    /// 접근 권한 평가
    ///
    /// # Arguments
    /// * `credential` - 요청 자격 증명
    /// * `action` - 요청 액션
    /// * `resource` - 대상 리소스 (`DATA_ADMIN`/`USER_ADMIN`은 무시)
    pub fn authorize(
        &self,
        credential: &Credential,
        action: Action,
        resource: Option<&ResourceRef>,
    ) -> Decision {
        let grants = parse_grants(credential);
        let decision = self.evaluate(&grants, credential.subject_type(), action, resource);

        tracing::debug!(
            subject = credential.subject_id(),
            action = %action,
            resource = ?resource.map(|r| r.to_string()),
            allowed = decision.allowed,
            "policy decision"
        );

        decision
    }

    /// 자격 증명이 `action`을 수행할 수 있는 리소스만 남김
    pub fn authorised_resources<'r, I>(
        &self,
        credential: &Credential,
        action: Action,
        resources: I,
    ) -> Vec<&'r ResourceRef>
    where
        I: IntoIterator<Item = &'r ResourceRef>,
    {
        let grants = parse_grants(credential);
        resources
            .into_iter()
            .filter(|r| {
                self.evaluate(&grants, credential.subject_type(), action, Some(r))
                    .allowed
            })
            .collect()
    }

    fn evaluate(
        &self,
        grants: &[Grant],
        subject_type: SubjectType,
        action: Action,
        resource: Option<&ResourceRef>,
    ) -> Decision {
        // 전역 액션: 리소스 검사 없음
        if action.is_standalone() {
            let granted = grants
                .iter()
                .any(|g| matches!(g, Grant::Standalone { action: a } if *a == action));
            return if granted {
                Decision::allow()
            } else {
                Decision::deny(DenyReason::MissingGrant {
                    required: action.as_str().to_string(),
                })
            };
        }

        let Some(resource) = resource else {
            return Decision::deny(DenyReason::MissingResource);
        };

        if resource.sensitivity.is_protected() && !self.registry.contains(&resource.domain) {
            return Decision::deny(DenyReason::UnknownProtectedDomain {
                domain: resource.domain.clone(),
            });
        }

        let granted = match subject_type {
            SubjectType::Client => grants
                .iter()
                .any(|g| scope_satisfies(g, action, resource)),
            SubjectType::User => grants
                .iter()
                .any(|g| group_satisfies(g, action, resource)),
        };

        if granted {
            Decision::allow()
        } else {
            Decision::deny(DenyReason::MissingGrant {
                required: required_grant(subject_type, action, resource),
            })
        }
    }
}

/// 자격 증명 토큰을 권한으로 파싱 (파싱 실패 토큰은 무시)
fn parse_grants(credential: &Credential) -> Vec<Grant> {
    let parse: fn(&str) -> std::result::Result<Grant, GrantParseError> =
        match credential.subject_type() {
            SubjectType::Client => parse_client_scope,
            SubjectType::User => parse_user_token,
        };

    credential
        .raw_tokens()
        .filter_map(|token| match parse(token) {
            Ok(grant) => Some(grant),
            Err(e) => {
                tracing::debug!(subject = credential.subject_id(), "ignoring token: {}", e);
                None
            }
        })
        .collect()
}

fn scope_satisfies(grant: &Grant, action: Action, resource: &ResourceRef) -> bool {
    let Grant::Scope { action: a, level } = grant else {
        return false;
    };
    if *a != action {
        return false;
    }

    match (level, &resource.sensitivity) {
        (SensitivityLevel::All, _) => true,
        (SensitivityLevel::Protected(domain), SensitivityLevel::Protected(_)) => {
            *domain == normalize_domain(&resource.domain)
        }
        (level, required) => level.covers(required),
    }
}

/// 그룹 권한은 민감도를 고려하지 않음
fn group_satisfies(grant: &Grant, action: Action, resource: &ResourceRef) -> bool {
    matches!(
        grant,
        Grant::Group { action: a, domain, dataset }
            if *a == action && *domain == resource.domain && *dataset == resource.dataset
    )
}

/// 진단용: 요청을 만족시킬 수 있었던 권한 종류
fn required_grant(subject_type: SubjectType, action: Action, resource: &ResourceRef) -> String {
    match subject_type {
        SubjectType::Client => SensitivityLevel::accepted_scope_suffixes(&resource.sensitivity)
            .iter()
            .map(|suffix| format!("{}_{}", action, suffix))
            .collect::<Vec<_>>()
            .join(" or "),
        SubjectType::User => format!(
            "group {}/{}/{}",
            action, resource.domain, resource.dataset
        ),
    }
}
