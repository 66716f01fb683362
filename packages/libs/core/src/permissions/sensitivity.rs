//! 민감도 수준 정의
//!
//! 데이터셋의 기밀 등급과 권한 등급 사이의 부분 순서를 정의합니다.
//!
//! ```text
//! PUBLIC < PRIVATE < ALL
//! PROTECTED(domain) < ALL
//! ```
//!
//! `PROTECTED(domain)`은 같은 도메인의 `PROTECTED`와만 비교 가능하며
//! `PUBLIC`/`PRIVATE`와는 비교할 수 없습니다.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 민감도 수준
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensitivityLevel {
    Public,
    Private,
    /// 도메인 범위 보호 등급 (도메인은 소문자로 정규화)
    Protected(String),
    /// 관리용 최상위 등급
    All,
}

impl SensitivityLevel {
    /// 보호 등급 생성 (도메인 정규화 포함)
    pub fn protected(domain: impl AsRef<str>) -> Self {
        SensitivityLevel::Protected(normalize_domain(domain.as_ref()))
    }

    /// 데이터셋 메타데이터의 등급 문자열에서 파싱
    ///
    /// `PROTECTED`는 데이터셋이 속한 도메인으로 범위가 지정됩니다.
    pub fn for_dataset(tier: &str, domain: &str) -> Result<Self> {
        match tier {
            "PUBLIC" => Ok(SensitivityLevel::Public),
            "PRIVATE" => Ok(SensitivityLevel::Private),
            "PROTECTED" => Ok(SensitivityLevel::protected(domain)),
            other => Err(Error::InvalidSensitivity {
                value: other.to_string(),
            }),
        }
    }

    /// 선형 구간에서의 위치 (PROTECTED는 선형 구간에 없음)
    fn rank(&self) -> Option<u8> {
        match self {
            SensitivityLevel::Public => Some(0),
            SensitivityLevel::Private => Some(1),
            SensitivityLevel::Protected(_) => None,
            SensitivityLevel::All => Some(u8::MAX),
        }
    }

    /// 등급 이름 (`PROTECTED`는 도메인 없이)
    pub fn tier(&self) -> &'static str {
        match self {
            SensitivityLevel::Public => "PUBLIC",
            SensitivityLevel::Private => "PRIVATE",
            SensitivityLevel::Protected(_) => "PROTECTED",
            SensitivityLevel::All => "ALL",
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, SensitivityLevel::Protected(_))
    }

    /// 이 등급의 권한이 `required` 등급의 리소스를 허용하는지
    pub fn covers(&self, required: &SensitivityLevel) -> bool {
        matches!(
            self.partial_cmp(required),
            Some(Ordering::Greater | Ordering::Equal)
        )
    }

    /// `required` 등급을 허용하는 scope 접미사 목록 (진단 메시지용)
    pub fn accepted_scope_suffixes(required: &SensitivityLevel) -> Vec<String> {
        let mut suffixes = vec!["ALL".to_string()];
        match required {
            SensitivityLevel::Public => {
                suffixes.push("PRIVATE".to_string());
                suffixes.push("PUBLIC".to_string());
            }
            SensitivityLevel::Private => suffixes.push("PRIVATE".to_string()),
            SensitivityLevel::Protected(domain) => {
                suffixes.push(format!("PROTECTED_{}", domain.to_uppercase()))
            }
            SensitivityLevel::All => {}
        }
        suffixes
    }
}

impl PartialOrd for SensitivityLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        use SensitivityLevel::*;

        match (self, other) {
            (All, All) => Some(Ordering::Equal),
            (All, _) => Some(Ordering::Greater),
            (_, All) => Some(Ordering::Less),
            (Protected(a), Protected(b)) => (a == b).then_some(Ordering::Equal),
            (Protected(_), _) | (_, Protected(_)) => None,
            _ => self.rank().partial_cmp(&other.rank()),
        }
    }
}

impl fmt::Display for SensitivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensitivityLevel::Protected(domain) => write!(f, "PROTECTED({})", domain),
            other => f.write_str(other.tier()),
        }
    }
}

/// 도메인 비교용 정규화
pub(crate) fn normalize_domain(domain: &str) -> String {
    domain.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_order() {
        assert!(SensitivityLevel::Public < SensitivityLevel::Private);
        assert!(SensitivityLevel::Private < SensitivityLevel::All);
        assert!(SensitivityLevel::protected("land") < SensitivityLevel::All);
    }

    #[test]
    fn test_protected_is_incomparable_with_tiers() {
        let land = SensitivityLevel::protected("land");

        assert_eq!(land.partial_cmp(&SensitivityLevel::Public), None);
        assert_eq!(land.partial_cmp(&SensitivityLevel::Private), None);
        assert_eq!(land.partial_cmp(&SensitivityLevel::protected("sea")), None);
        assert_eq!(
            land.partial_cmp(&SensitivityLevel::protected("LAND")),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_covers() {
        let land = SensitivityLevel::protected("land");

        assert!(SensitivityLevel::All.covers(&land));
        assert!(SensitivityLevel::All.covers(&SensitivityLevel::Public));
        assert!(SensitivityLevel::Private.covers(&SensitivityLevel::Public));
        assert!(!SensitivityLevel::Public.covers(&SensitivityLevel::Private));
        assert!(!SensitivityLevel::Private.covers(&land));
        assert!(!land.covers(&SensitivityLevel::Public));
        assert!(land.covers(&SensitivityLevel::protected("land")));
    }

    #[test]
    fn test_for_dataset() {
        assert_eq!(
            SensitivityLevel::for_dataset("PROTECTED", "Land").unwrap(),
            SensitivityLevel::Protected("land".to_string())
        );
        assert_eq!(
            SensitivityLevel::for_dataset("PUBLIC", "land").unwrap(),
            SensitivityLevel::Public
        );
        assert!(SensitivityLevel::for_dataset("SECRET", "land").is_err());
        assert!(SensitivityLevel::for_dataset("ALL", "land").is_err());
    }

    #[test]
    fn test_accepted_scope_suffixes() {
        assert_eq!(
            SensitivityLevel::accepted_scope_suffixes(&SensitivityLevel::protected("land")),
            vec!["ALL".to_string(), "PROTECTED_LAND".to_string()]
        );
        assert_eq!(
            SensitivityLevel::accepted_scope_suffixes(&SensitivityLevel::Public).len(),
            3
        );
    }
}
