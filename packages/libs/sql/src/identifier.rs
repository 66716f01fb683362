//! 식별자 검증
//!
//! SELECT/GROUP BY/ORDER BY 항목을 데이터셋 스키마와 대조합니다.
//!
//! # 문법
//!
//! ```text
//! column
//! func(column)            func ∈ {avg, sum, min, max, count}
//! <위 형태> AS alias
//! ```

use std::collections::HashSet;
use std::fmt;

use dsh_core::schema::DatasetSchema;

use crate::error::{ValidationError, ValidationErrorKind};

const SELECT_FIELD: &str = "select_columns";

/// 집계 함수
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregation {
    Avg,
    Sum,
    Min,
    Max,
    Count,
}

impl Aggregation {
    /// 함수 이름 파싱 (대소문자 무시)
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "avg" => Some(Aggregation::Avg),
            "sum" => Some(Aggregation::Sum),
            "min" => Some(Aggregation::Min),
            "max" => Some(Aggregation::Max),
            "count" => Some(Aggregation::Count),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Avg => "avg",
            Aggregation::Sum => "sum",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
            Aggregation::Count => "count",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 검증된 SELECT 식
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectExpr {
    Column(String),
    Aggregate {
        function: Aggregation,
        column: String,
    },
}

/// 검증 및 정규화된 SELECT 항목
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectItem {
    pub expr: SelectExpr,

    /// 요청에 적힌 식 (alias 제외, 앞뒤 공백 제거)
    pub raw_expression: String,

    pub alias: Option<String>,
}

impl SelectItem {
    /// 결과 컬럼 이름 (alias 또는 원래 식)
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.raw_expression)
    }
}

/// GROUP BY/ORDER BY 항목이 가리키는 대상
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// 스키마 컬럼
    Column(String),

    /// SELECT 결과 이름 (alias 또는 집계 식)
    Output(String),

    /// 1부터 시작하는 SELECT 위치
    Ordinal(u64),
}

/// 식별자 검증기
pub struct IdentifierValidator<'a> {
    schema: &'a DatasetSchema,
}

impl<'a> IdentifierValidator<'a> {
    pub fn new(schema: &'a DatasetSchema) -> Self {
        Self { schema }
    }

    /// SELECT 목록 전체 검증
    ///
    /// 항목별 에러와 결과 이름 중복 에러를 모두 수집합니다.
    /// 결과 이름(alias 또는 식 원문)은 대소문자를 무시하고 목록 전체에서 유일해야 합니다.
    pub fn validate_select_list(&self, tokens: &[String]) -> (Vec<SelectItem>, Vec<ValidationError>) {
        let mut items = Vec::with_capacity(tokens.len());
        let mut errors = Vec::new();
        let mut output_names = HashSet::new();

        for (i, token) in tokens.iter().enumerate() {
            let field = format!("{}[{}]", SELECT_FIELD, i);

            match self.validate_select(token) {
                Ok(item) => {
                    if !output_names.insert(item.output_name().to_ascii_lowercase()) {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::DuplicateAlias,
                            field,
                            item.output_name(),
                        ));
                        continue;
                    }
                    items.push(item);
                }
                Err(e) => errors.push(e.at(field)),
            }
        }

        (items, errors)
    }

    /// 단일 SELECT 항목 검증
    pub fn validate_select(&self, token: &str) -> Result<SelectItem, ValidationError> {
        let token = token.trim();
        let (expression, alias) = split_alias(token);

        if let Some(alias) = alias {
            if !is_valid_alias(alias) {
                return Err(ValidationError::new(
                    ValidationErrorKind::InvalidAlias,
                    SELECT_FIELD,
                    alias,
                ));
            }
        }

        let expr = self.parse_expression(expression)?;

        Ok(SelectItem {
            expr,
            raw_expression: expression.to_string(),
            alias: alias.map(|a| a.to_string()),
        })
    }

    /// GROUP BY 항목 검증 (스키마 컬럼 또는 선언된 alias)
    pub fn validate_group_by(
        &self,
        token: &str,
        select: &[SelectItem],
    ) -> Result<Reference, ValidationError> {
        let token = token.trim();

        if self.schema.has_column(token) {
            return Ok(Reference::Column(token.to_string()));
        }
        if select.iter().any(|item| item.alias.as_deref() == Some(token)) {
            return Ok(Reference::Output(token.to_string()));
        }

        Err(ValidationError::new(
            ValidationErrorKind::UnknownColumn,
            "group_by_columns",
            token,
        ))
    }

    /// ORDER BY 항목 검증
    ///
    /// 스키마 컬럼, alias, SELECT 식(그대로 반복), 또는 SELECT 위치를 허용합니다.
    /// `output_len`은 SELECT 결과 컬럼 수입니다.
    pub fn validate_order_by(
        &self,
        token: &str,
        select: &[SelectItem],
        output_len: usize,
    ) -> Result<Reference, ValidationError> {
        let token = token.trim();

        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            return match token.parse::<u64>() {
                Ok(n) if n >= 1 && n <= output_len as u64 => Ok(Reference::Ordinal(n)),
                _ => Err(ValidationError::new(
                    ValidationErrorKind::InvalidOrderBy,
                    "order_by_columns",
                    token,
                )),
            };
        }

        if select.iter().any(|item| item.output_name() == token) {
            return Ok(match self.schema.has_column(token) {
                true => Reference::Column(token.to_string()),
                false => Reference::Output(token.to_string()),
            });
        }

        // alias 없는 SELECT 식을 공백만 다르게 반복한 경우
        if let Some(item) = select.iter().find(|item| {
            item.alias.is_none()
                && self
                    .parse_expression(token)
                    .map(|expr| expr == item.expr)
                    .unwrap_or(false)
        }) {
            return Ok(Reference::Output(item.raw_expression.clone()));
        }

        if self.schema.has_column(token) {
            return Ok(Reference::Column(token.to_string()));
        }

        Err(ValidationError::new(
            ValidationErrorKind::UnknownColumn,
            "order_by_columns",
            token,
        ))
    }

    fn parse_expression(&self, expression: &str) -> Result<SelectExpr, ValidationError> {
        if expression.is_empty() {
            return Err(ValidationError::new(
                ValidationErrorKind::Malformed,
                SELECT_FIELD,
                expression,
            ));
        }

        let Some(open) = expression.find('(') else {
            if self.schema.has_column(expression) {
                return Ok(SelectExpr::Column(expression.to_string()));
            }
            return Err(ValidationError::new(
                ValidationErrorKind::UnknownColumn,
                SELECT_FIELD,
                expression,
            ));
        };

        let Some(inner) = expression[open + 1..].strip_suffix(')') else {
            return Err(ValidationError::new(
                ValidationErrorKind::Malformed,
                SELECT_FIELD,
                expression,
            ));
        };

        let name = expression[..open].trim();
        let function = Aggregation::parse(name).ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::UnknownAggregation, SELECT_FIELD, name)
        })?;

        // 집계 인자는 실제 컬럼만 허용 (alias, `*` 불가)
        let column = inner.trim();
        if !self.schema.has_column(column) {
            return Err(ValidationError::new(
                ValidationErrorKind::InvalidAggregationArgument,
                SELECT_FIELD,
                expression,
            ));
        }

        Ok(SelectExpr::Aggregate {
            function,
            column: column.to_string(),
        })
    }
}

/// `expr AS alias` 분리 (AS는 대소문자 무시)
fn split_alias(token: &str) -> (&str, Option<&str>) {
    let upper = token.to_ascii_uppercase();
    match upper.rfind(" AS ") {
        Some(pos) => (token[..pos].trim(), Some(token[pos + 4..].trim())),
        None => (token, None),
    }
}

/// 영문자/숫자/밑줄, 숫자로 시작하지 않음
fn is_valid_alias(alias: &str) -> bool {
    let mut chars = alias.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsh_core::schema::{Column, DataType, SchemaMetadata};

    fn schema() -> DatasetSchema {
        DatasetSchema::new(
            SchemaMetadata::new("space", "rockets", "PUBLIC"),
            vec![
                Column::new("rocket_class", DataType::Object),
                Column::new("payload_weight", DataType::Float64),
                Column::new("launch_date", DataType::Date),
            ],
        )
    }

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_plain_column() {
        let schema = schema();
        let validator = IdentifierValidator::new(&schema);

        let item = validator.validate_select(" rocket_class ").unwrap();
        assert_eq!(item.expr, SelectExpr::Column("rocket_class".to_string()));
        assert_eq!(item.output_name(), "rocket_class");

        let err = validator.validate_select("rocket_size").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::UnknownColumn);
    }

    #[test]
    fn test_aggregation() {
        let schema = schema();
        let validator = IdentifierValidator::new(&schema);

        let item = validator.validate_select("AVG(payload_weight)").unwrap();
        assert_eq!(
            item.expr,
            SelectExpr::Aggregate {
                function: Aggregation::Avg,
                column: "payload_weight".to_string()
            }
        );
        assert_eq!(item.output_name(), "AVG(payload_weight)");

        let err = validator.validate_select("median(payload_weight)").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::UnknownAggregation);
        assert_eq!(err.kind.to_string(), "unknown aggregation function");

        let err = validator.validate_select("count(*)").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidAggregationArgument);

        let err = validator.validate_select("max(payload_weight").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::Malformed);
    }

    #[test]
    fn test_alias() {
        let schema = schema();
        let validator = IdentifierValidator::new(&schema);

        let item = validator.validate_select("max(payload_weight) as heaviest").unwrap();
        assert_eq!(item.alias.as_deref(), Some("heaviest"));
        assert_eq!(item.raw_expression, "max(payload_weight)");
        assert_eq!(item.output_name(), "heaviest");

        let err = validator.validate_select("rocket_class AS 1class").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidAlias);
        let err = validator.validate_select("rocket_class AS my-class").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidAlias);
    }

    #[test]
    fn test_alias_is_not_an_aggregation_argument() {
        let schema = schema();
        let validator = IdentifierValidator::new(&schema);

        let (_, errors) =
            validator.validate_select_list(&strings(&["payload_weight AS w", "avg(w)"]));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidAggregationArgument);
        assert_eq!(errors[0].field, "select_columns[1]");
    }

    #[test]
    fn test_duplicate_alias() {
        let schema = schema();
        let validator = IdentifierValidator::new(&schema);

        let (items, errors) = validator.validate_select_list(&strings(&[
            "rocket_class AS x",
            "payload_weight AS x",
        ]));
        assert_eq!(items.len(), 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateAlias);
        assert_eq!(errors[0].detail, "x");

        let (_, errors) = validator.validate_select_list(&strings(&[
            "rocket_class",
            "payload_weight AS rocket_class",
        ]));
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateAlias);
    }

    #[test]
    fn test_repeated_output_names() {
        let schema = schema();
        let validator = IdentifierValidator::new(&schema);

        let (items, errors) =
            validator.validate_select_list(&strings(&["rocket_class", "rocket_class"]));
        assert_eq!(items.len(), 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateAlias);
        assert_eq!(errors[0].field, "select_columns[1]");

        let (_, errors) = validator.validate_select_list(&strings(&[
            "rocket_class AS x",
            "payload_weight AS X",
        ]));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].detail, "X");

        let (items, errors) = validator.validate_select_list(&strings(&[
            "avg(payload_weight)",
            "max(payload_weight) AS heaviest",
        ]));
        assert_eq!(items.len(), 2);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_group_by_references() {
        let schema = schema();
        let validator = IdentifierValidator::new(&schema);
        let (select, _) =
            validator.validate_select_list(&strings(&["rocket_class AS class", "avg(payload_weight)"]));

        assert_eq!(
            validator.validate_group_by("class", &select).unwrap(),
            Reference::Output("class".to_string())
        );
        assert_eq!(
            validator.validate_group_by("launch_date", &select).unwrap(),
            Reference::Column("launch_date".to_string())
        );
        assert!(validator.validate_group_by("avg(payload_weight)", &select).is_err());
        assert!(validator.validate_group_by("unknown", &select).is_err());
    }

    #[test]
    fn test_order_by_references() {
        let schema = schema();
        let validator = IdentifierValidator::new(&schema);
        let (select, _) =
            validator.validate_select_list(&strings(&["rocket_class", "avg(payload_weight)"]));

        assert_eq!(
            validator.validate_order_by("avg(payload_weight)", &select, 2).unwrap(),
            Reference::Output("avg(payload_weight)".to_string())
        );
        assert_eq!(
            validator.validate_order_by("avg( payload_weight )", &select, 2).unwrap(),
            Reference::Output("avg(payload_weight)".to_string())
        );
        assert_eq!(
            validator.validate_order_by("rocket_class", &select, 2).unwrap(),
            Reference::Column("rocket_class".to_string())
        );
        assert_eq!(
            validator.validate_order_by("2", &select, 2).unwrap(),
            Reference::Ordinal(2)
        );

        for bad in ["0", "3", "99999999999999999999999"] {
            let err = validator.validate_order_by(bad, &select, 2).unwrap_err();
            assert_eq!(err.kind, ValidationErrorKind::InvalidOrderBy, "{}", bad);
        }
        assert!(validator.validate_order_by("sum(payload_weight)", &select, 2).is_err());
    }
}
