//! 쿼리 실행기 인터페이스
//!
//! 컴파일된 SQL을 실제 엔진에서 실행하는 외부 협력자입니다.
//! 재시도는 이 인터페이스의 책임이 아닙니다.

use thiserror::Error;

use crate::value::Row;

/// 지연 소비되는 결과 행 스트림
pub type RowStream = Box<dyn Iterator<Item = Row> + Send>;

/// 실행 에러
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// 카탈로그/크롤러 갱신 중 (재시도 가능)
    #[error("table {table} is not ready; the data may still be processing")]
    NotReady { table: String },

    /// 엔진이 문장을 거부함
    #[error("query execution failed: {message}")]
    Failed { message: String },
}

/// 쿼리 실행기
pub trait QueryExecutor: Send + Sync {
    /// SQL 실행
    ///
    /// # Arguments
    /// * `database` - 대상 데이터베이스
    /// * `statement` - 컴파일된 SQL 문
    fn execute(&self, database: &str, statement: &str) -> Result<RowStream, ExecutionError>;
}
