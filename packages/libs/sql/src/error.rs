//! 쿼리 검증 에러
//!
//! 컴파일러는 한 요청에서 발견한 모든 검증 에러를 모아 함께 반환합니다.

use std::fmt;

use thiserror::Error;

/// 검증 에러 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    UnknownColumn,
    UnknownAggregation,
    InvalidAggregationArgument,
    InvalidAlias,
    DuplicateAlias,
    InvalidDirection,
    InvalidOrderBy,
    InvalidLimit,
    Malformed,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorKind::UnknownColumn => "unknown column",
            ValidationErrorKind::UnknownAggregation => "unknown aggregation function",
            ValidationErrorKind::InvalidAggregationArgument => "invalid aggregation argument",
            ValidationErrorKind::InvalidAlias => "invalid alias",
            ValidationErrorKind::DuplicateAlias => "duplicate alias",
            ValidationErrorKind::InvalidDirection => "invalid direction",
            ValidationErrorKind::InvalidOrderBy => "invalid order by",
            ValidationErrorKind::InvalidLimit => "invalid limit",
            ValidationErrorKind::Malformed => "malformed expression",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 단일 검증 에러
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {kind} ({detail})")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,

    /// 요청 필드 (`select_columns[1]`, `limit` 등)
    pub field: String,

    /// 문제가 된 값
    pub detail: String,
}

impl ValidationError {
    pub fn new(
        kind: ValidationErrorKind,
        field: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            field: field.into(),
            detail: detail.into(),
        }
    }

    /// 필드 이름 교체 (목록 내 위치 지정용)
    pub fn at(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }
}

/// 검증 에러 목록 (항상 1개 이상)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid query: {}", join_messages(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// 에러 목록으로 생성 (비어 있으면 None)
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        (!errors.is_empty()).then_some(Self(errors))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 특정 종류의 에러 포함 여부
    pub fn contains(&self, kind: ValidationErrorKind) -> bool {
        self.0.iter().any(|e| e.kind == kind)
    }

    /// 응답용 상세 메시지 목록
    pub fn details(&self) -> Vec<String> {
        self.0.iter().map(|e| e.to_string()).collect()
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
