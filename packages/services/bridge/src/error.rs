//! Bridge 에러 타입

use serde::Serialize;

use dsh_sql::{ExecutionError, FormatError, ValidationErrors};

/// Bridge 에러
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("{message}")]
    UnsupportedFormat { message: String },

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("table {table} is not ready; the data may still be processing, try again later")]
    UpstreamNotReady { table: String },

    #[error("query execution failed: {message}")]
    UpstreamExecution { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },

    #[error("core error: {0}")]
    Core(#[from] dsh_core::Error),
}

impl BridgeError {
    /// HTTP 상태 코드
    pub fn status_code(&self) -> u16 {
        match self {
            BridgeError::BadRequest { .. }
            | BridgeError::UnsupportedFormat { .. }
            | BridgeError::Validation(_) => 400,
            BridgeError::UpstreamNotReady { .. } => 503,
            BridgeError::UpstreamExecution { .. } | BridgeError::Internal { .. } => 500,
            BridgeError::Core(e) => e.status_code(),
        }
    }

    /// 에러 코드 (클라이언트용)
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::BadRequest { .. } => "BAD_REQUEST",
            BridgeError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            BridgeError::Validation(_) => "INVALID_QUERY",
            BridgeError::UpstreamNotReady { .. } => "UPSTREAM_NOT_READY",
            BridgeError::UpstreamExecution { .. } => "UPSTREAM_EXECUTION_ERROR",
            BridgeError::Internal { .. } => "INTERNAL_ERROR",
            BridgeError::Core(e) => e.code(),
        }
    }

    /// 재시도하면 성공할 수 있는지
    pub fn is_retryable(&self) -> bool {
        matches!(self, BridgeError::UpstreamNotReady { .. })
    }

    /// 응답 본문 생성
    pub fn to_response(&self, request_id: Option<&str>) -> ErrorResponse {
        let message = match self {
            // 엔진 에러 원문은 로그에만 남김
            BridgeError::UpstreamExecution { .. } | BridgeError::Internal { .. } => {
                "Query execution failed".to_string()
            }
            other => other.to_string(),
        };

        let details = match self {
            BridgeError::Validation(errors) => Some(errors.details()),
            _ => None,
        };

        ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message,
                details,
                request_id: request_id.map(|id| id.to_string()),
            },
        }
    }
}

impl From<ExecutionError> for BridgeError {
    fn from(error: ExecutionError) -> Self {
        match error {
            ExecutionError::NotReady { table } => BridgeError::UpstreamNotReady { table },
            ExecutionError::Failed { message } => BridgeError::UpstreamExecution { message },
        }
    }
}

impl From<FormatError> for BridgeError {
    fn from(error: FormatError) -> Self {
        match error {
            FormatError::Unsupported { .. } => BridgeError::UnsupportedFormat {
                message: error.to_string(),
            },
            other => BridgeError::Internal {
                message: other.to_string(),
            },
        }
    }
}

/// 에러 응답 JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// 요청 ID가 붙은 실패 결과
#[derive(Debug, thiserror::Error)]
#[error("{error} (request {request_id})")]
pub struct Failure {
    pub request_id: String,
    #[source]
    pub error: BridgeError,
}

impl Failure {
    pub fn status_code(&self) -> u16 {
        self.error.status_code()
    }

    pub fn to_response(&self) -> ErrorResponse {
        self.error.to_response(Some(&self.request_id))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
