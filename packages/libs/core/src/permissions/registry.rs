//! 보호 도메인 레지스트리
//!
//! 도메인 범위 권한이 필요한 도메인 목록입니다.
//! 외부 시스템이 소유하며 이 크레이트에서는 읽기 전용으로만 사용합니다.

use std::collections::BTreeSet;

use super::sensitivity::normalize_domain;

/// 보호 도메인 조회 인터페이스
pub trait ProtectedDomainRegistry {
    /// 도메인이 보호 도메인으로 등록되어 있는지 (대소문자 무시)
    fn contains(&self, domain: &str) -> bool;

    /// 등록된 보호 도메인 목록
    fn list(&self) -> BTreeSet<String>;
}

/// 메모리 내 보호 도메인 집합
#[derive(Debug, Clone, Default)]
pub struct ProtectedDomains {
    domains: BTreeSet<String>,
}

impl ProtectedDomains {
    pub fn new() -> Self {
        Self::default()
    }

    /// 도메인 추가
    pub fn with_domain(mut self, domain: impl AsRef<str>) -> Self {
        self.domains.insert(normalize_domain(domain.as_ref()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ProtectedDomains {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            domains: iter
                .into_iter()
                .map(|d| normalize_domain(d.as_ref()))
                .collect(),
        }
    }
}

impl ProtectedDomainRegistry for ProtectedDomains {
    fn contains(&self, domain: &str) -> bool {
        self.domains.contains(&normalize_domain(domain))
    }

    fn list(&self) -> BTreeSet<String> {
        self.domains.clone()
    }
}
