//! dsh-sql: 쿼리 컴파일 및 결과 포맷 라이브러리
//!
//! 데이터셋 스키마를 기준으로 쿼리 요청을 검증하고 SQL을 생성하며,
//! 실행 결과를 JSON/CSV로 직렬화합니다.
//! 식별자는 SeaQuery로 인용합니다.
//!
//! # 모듈 구조
//!
//! - `params`: 쿼리 요청 파라미터
//! - `identifier`: SELECT/GROUP BY/ORDER BY 식별자 검증
//! - `builder`: 쿼리 컴파일러
//! - `error`: 검증 에러
//! - `value`: 결과 셀 값
//! - `format`: 결과 포맷터
//! - `executor`: 쿼리 실행기 인터페이스

pub mod builder;
pub mod error;
pub mod executor;
pub mod format;
pub mod identifier;
pub mod params;
pub mod value;

pub use builder::{CompiledQuery, QueryCompiler};
pub use error::{ValidationError, ValidationErrorKind, ValidationErrors};
pub use executor::{ExecutionError, QueryExecutor, RowStream};
pub use format::{FormatError, OutputFormat};
pub use identifier::IdentifierValidator;
pub use params::{OrderByColumn, QueryRequest, SortOrder};
pub use value::{CellValue, Row};
