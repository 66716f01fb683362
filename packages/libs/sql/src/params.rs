//! 쿼리 요청 파라미터
//!
//! `POST /datasets/{domain}/{dataset}/query` 요청 본문을 표현합니다.
//! 모든 필드는 선택이며, 빈 본문은 전체 컬럼 조회를 의미합니다.

use serde::{Deserialize, Serialize};

/// 쿼리 요청
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// SELECT할 컬럼/집계 목록 (기본: "*")
    #[serde(default)]
    pub select_columns: Option<Vec<String>>,

    /// WHERE 조건 (검증 없이 그대로 전달)
    #[serde(default)]
    pub filter: Option<String>,

    /// GROUP BY 컬럼
    #[serde(default)]
    pub group_by_columns: Option<Vec<String>>,

    /// HAVING 조건 (검증 없이 그대로 전달)
    #[serde(default)]
    pub aggregation_conditions: Option<String>,

    /// 정렬
    #[serde(default)]
    pub order_by_columns: Option<Vec<OrderByColumn>>,

    /// 제한 (숫자 문자열)
    #[serde(default)]
    pub limit: Option<String>,
}

impl QueryRequest {
    /// JSON 본문 파싱 (빈 본문 = 기본값)
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(body)
    }

    pub fn select(mut self, columns: &[&str]) -> Self {
        self.select_columns = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn group_by(mut self, columns: &[&str]) -> Self {
        self.group_by_columns = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn having(mut self, conditions: impl Into<String>) -> Self {
        self.aggregation_conditions = Some(conditions.into());
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: Option<&str>) -> Self {
        self.order_by_columns
            .get_or_insert_with(Vec::new)
            .push(OrderByColumn {
                column: column.into(),
                direction: direction.map(|d| d.to_string()),
            });
        self
    }

    pub fn limit(mut self, limit: impl Into<String>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    /// 비어있지 않은 WHERE 조건
    pub fn filter_text(&self) -> Option<&str> {
        non_blank(self.filter.as_deref())
    }

    /// 비어있지 않은 HAVING 조건
    pub fn having_text(&self) -> Option<&str> {
        non_blank(self.aggregation_conditions.as_deref())
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// 정렬 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderByColumn {
    pub column: String,

    /// `ASC`/`DESC` (대소문자 무시, 기본 ASC)
    #[serde(default)]
    pub direction: Option<String>,
}

/// 정렬 순서
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// 문자열에서 파싱 (대소문자 무시)
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("ASC") {
            Some(SortOrder::Asc)
        } else if s.eq_ignore_ascii_case("DESC") {
            Some(SortOrder::Desc)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserialization() {
        let json = r#"{
            "select_columns": ["rocket_class", "avg(payload_weight)"],
            "filter": "rocket_class in ('mini','medium')",
            "order_by_columns": [{"column": "rocket_class"}, {"column": "x", "direction": "desc"}],
            "limit": "10"
        }"#;

        let request = QueryRequest::from_json(json).unwrap();
        assert_eq!(request.select_columns.as_ref().unwrap().len(), 2);
        assert_eq!(request.limit.as_deref(), Some("10"));

        let order_by = request.order_by_columns.unwrap();
        assert_eq!(order_by[0].direction, None);
        assert_eq!(order_by[1].direction.as_deref(), Some("desc"));
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(QueryRequest::from_json("").unwrap(), QueryRequest::default());
        assert_eq!(QueryRequest::from_json("{}").unwrap(), QueryRequest::default());
        assert!(QueryRequest::from_json("{\"limit\": 10}").is_err());
    }

    #[test]
    fn test_blank_clauses_are_absent() {
        let request = QueryRequest::default().filter("  ").having("");
        assert_eq!(request.filter_text(), None);
        assert_eq!(request.having_text(), None);

        let request = QueryRequest::default().filter(" a > 1 ");
        assert_eq!(request.filter_text(), Some("a > 1"));
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!(SortOrder::parse("asc"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse("DESC"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse("Desc"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse("DOWN"), None);
    }
}
