//! 공통 에러 타입
//!
//! 데이터 공유 서비스 전체에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// dsh 공통 에러
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────────
    // Schema Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("schema parse error: {message}")]
    SchemaParse { message: String },

    #[error("duplicate column name: {name}")]
    DuplicateColumn { name: String },

    #[error("invalid column type: {type_name}")]
    InvalidColumnType { type_name: String },

    #[error("invalid sensitivity level: {value}")]
    InvalidSensitivity { value: String },

    #[error("schema not found for domain={domain} and dataset={dataset}")]
    SchemaNotFound { domain: String, dataset: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Permission Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("access denied: {reason}")]
    AccessDenied { reason: String },

    #[error("unknown protected domain: {domain}")]
    UnknownProtectedDomain { domain: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Claims Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("invalid claims: {reason}")]
    InvalidClaims { reason: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // IO/Serialization Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// HTTP 상태 코드로 변환
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Error::SchemaParse { .. }
            | Error::DuplicateColumn { .. }
            | Error::InvalidColumnType { .. }
            | Error::InvalidSensitivity { .. }
            | Error::Yaml(_)
            | Error::Json(_) => 400,

            // 401 Unauthorized
            Error::InvalidClaims { .. } => 401,

            // 403 Forbidden
            Error::AccessDenied { .. } | Error::UnknownProtectedDomain { .. } => 403,

            // 404 Not Found
            Error::SchemaNotFound { .. } => 404,
        }
    }

    /// 에러 코드 (클라이언트용)
    pub fn code(&self) -> &'static str {
        match self {
            Error::SchemaParse { .. } => "SCHEMA_PARSE_ERROR",
            Error::DuplicateColumn { .. } => "DUPLICATE_COLUMN",
            Error::InvalidColumnType { .. } => "INVALID_COLUMN_TYPE",
            Error::InvalidSensitivity { .. } => "INVALID_SENSITIVITY",
            Error::SchemaNotFound { .. } => "SCHEMA_NOT_FOUND",
            Error::AccessDenied { .. } => "ACCESS_DENIED",
            Error::UnknownProtectedDomain { .. } => "UNKNOWN_PROTECTED_DOMAIN",
            Error::InvalidClaims { .. } => "INVALID_CLAIMS",
            Error::Yaml(_) => "YAML_ERROR",
            Error::Json(_) => "JSON_ERROR",
        }
    }
}
