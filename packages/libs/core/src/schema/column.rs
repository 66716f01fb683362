//! 컬럼 정의
//!
//! 데이터셋 스키마의 컬럼 메타데이터를 정의합니다.

use serde::{Deserialize, Serialize};

use super::types::DataType;

/// 컬럼 정의
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// 컬럼 이름 (스키마 내 유일)
    pub name: String,

    /// 파티션 순서 (파티션 컬럼이 아니면 None)
    #[serde(default)]
    pub partition_index: Option<u32>,

    /// 데이터 타입
    pub data_type: DataType,

    /// NULL 허용 여부
    pub allow_null: bool,

    /// 값 표기 형식 (date 컬럼의 `%Y-%m-%d` 등)
    #[serde(default)]
    pub format: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            partition_index: None,
            data_type,
            allow_null: true,
            format: None,
        }
    }

    /// NULL 불허
    pub fn required(mut self) -> Self {
        self.allow_null = false;
        self
    }

    /// 파티션 컬럼으로 지정
    pub fn partitioned(mut self, index: u32) -> Self {
        self.partition_index = Some(index);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn is_partition(&self) -> bool {
        self.partition_index.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let column = Column::new("date", DataType::Date)
            .required()
            .partitioned(0)
            .with_format("%d/%m/%Y");

        assert!(!column.allow_null);
        assert!(column.is_partition());
        assert_eq!(column.format.as_deref(), Some("%d/%m/%Y"));
        assert!(!Column::new("x", DataType::Int64).is_partition());
    }
}
