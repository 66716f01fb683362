//! 컬럼 데이터 타입 정의
//!
//! 업로드된 데이터셋의 컬럼 타입입니다. 직렬화 이름은 스키마 문서의 표기를 그대로 따릅니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 컬럼 데이터 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// 64비트 정수
    Int64,

    /// 64비트 부동소수점
    Float64,

    /// 문자열
    #[serde(rename = "object")]
    Object,

    /// 날짜 (`format`으로 원본 표기 지정)
    #[serde(rename = "date")]
    Date,

    /// 불리언
    #[serde(rename = "boolean")]
    Boolean,
}

impl DataType {
    /// 스키마 문서의 타입 문자열에서 파싱
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "Int64" => Some(DataType::Int64),
            "Float64" => Some(DataType::Float64),
            "object" => Some(DataType::Object),
            "date" => Some(DataType::Date),
            "boolean" => Some(DataType::Boolean),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Int64 => "Int64",
            DataType::Float64 => "Float64",
            DataType::Object => "object",
            DataType::Date => "date",
            DataType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(DataType::from_wire("Int64"), Some(DataType::Int64));
        assert_eq!(DataType::from_wire("object"), Some(DataType::Object));
        assert_eq!(DataType::from_wire("date"), Some(DataType::Date));
        assert_eq!(DataType::from_wire("string"), None);
        assert_eq!(DataType::from_wire("int64"), None);
    }

    #[test]
    fn test_serde_matches_wire_names() {
        for data_type in [
            DataType::Int64,
            DataType::Float64,
            DataType::Object,
            DataType::Date,
            DataType::Boolean,
        ] {
            let json = serde_json::to_string(&data_type).unwrap();
            assert_eq!(json, format!("\"{}\"", data_type.as_str()));
        }
    }
}
