//! 데이터셋 스키마 모델
//!
//! # 개요
//!
//! 부서가 업로드한 데이터셋의 스키마(메타데이터 + 컬럼 목록)를 표현합니다.
//! 쿼리 컴파일러는 이 스키마로 컬럼 식별자를 검증합니다.
//!
//! # 모듈 구조
//!
//! - `types`: 컬럼 데이터 타입
//! - `column`: 컬럼 정의
//! - `dataset`: 스키마 메타데이터와 데이터셋 스키마
//! - `catalog`: 스키마 카탈로그 인터페이스
//! - `parser`: 스키마 문서 파싱

mod catalog;
mod column;
mod dataset;
mod parser;
mod types;

pub use catalog::{InMemoryCatalog, SchemaCatalog};
pub use column::Column;
pub use dataset::{
    DatasetSchema, Owner, SchemaMetadata, UpdateBehaviour, FIRST_SCHEMA_VERSION,
};
pub use parser::SchemaParser;
pub use types::DataType;
