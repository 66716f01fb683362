//! 쿼리 컴파일러
//!
//! 데이터셋 스키마와 QueryRequest를 받아 SELECT 문을 생성합니다.
//! 식별자는 SeaQuery로 인용하며, `filter`/`aggregation_conditions`는 검증 없이 그대로 삽입됩니다.

use sea_query::{
    Asterisk, Expr, Func, Iden, Order, PostgresQueryBuilder, Query, SelectStatement, SimpleExpr,
};

use dsh_core::schema::DatasetSchema;

use crate::error::{ValidationError, ValidationErrorKind, ValidationErrors};
use crate::identifier::{Aggregation, IdentifierValidator, Reference, SelectExpr, SelectItem};
use crate::params::{QueryRequest, SortOrder};

/// 동적 테이블/컬럼 식별자
#[derive(Debug, Clone)]
struct DynIden(String);

impl Iden for DynIden {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        let _ = s.write_str(&self.0);
    }
}

/// 컴파일 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    /// 실행할 SQL 문
    pub statement: String,

    /// 결과 컬럼 이름 (JSON 키/CSV 헤더 순서)
    pub output_columns: Vec<String>,
}

/// 쿼리 컴파일러
pub struct QueryCompiler<'a> {
    schema: &'a DatasetSchema,
}

/// 검증을 통과한 요청 조각
struct Plan {
    select: Option<Vec<SelectItem>>,
    group_by: Vec<Reference>,
    order_by: Vec<(Reference, SortOrder)>,
    limit: Option<u64>,
    output_columns: Vec<String>,
}

impl<'a> QueryCompiler<'a> {
    /// 새 컴파일러 생성
    pub fn new(schema: &'a DatasetSchema) -> Self {
        Self { schema }
    }

    /// SQL 생성
    ///
    /// # Arguments
    /// * `request` - 쿼리 요청
    /// * `table_ref` - FROM 대상 테이블 이름
    ///
    /// # Returns
    /// 검증 에러가 하나라도 있으면 모두 모아서 반환
    pub fn compile(
        &self,
        request: &QueryRequest,
        table_ref: &str,
    ) -> Result<CompiledQuery, ValidationErrors> {
        let plan = self.plan(request)?;

        let mut query = Query::select();

        // SELECT
        match &plan.select {
            None => {
                query.column(Asterisk);
            }
            Some(items) => {
                for item in items {
                    self.build_select_item(&mut query, item);
                }
            }
        }

        // FROM
        query.from(DynIden(table_ref.to_string()));

        // WHERE
        if let Some(filter) = request.filter_text() {
            query.and_where(Expr::cust(filter.to_string()));
        }

        // GROUP BY
        if !plan.group_by.is_empty() {
            let exprs: Vec<SimpleExpr> = plan.group_by.iter().map(reference_expr).collect();
            query.add_group_by(exprs);
        }

        // HAVING
        if let Some(having) = request.having_text() {
            query.and_having(Expr::cust(having.to_string()));
        }

        // ORDER BY
        for (reference, order) in &plan.order_by {
            let order = match order {
                SortOrder::Asc => Order::Asc,
                SortOrder::Desc => Order::Desc,
            };
            query.order_by_expr(reference_expr(reference), order);
        }

        // LIMIT
        if let Some(limit) = plan.limit {
            query.limit(limit);
        }

        let statement = query.to_string(PostgresQueryBuilder);
        tracing::debug!(table = table_ref, %statement, "compiled query");

        Ok(CompiledQuery {
            statement,
            output_columns: plan.output_columns,
        })
    }

    /// 요청 검증 (단계별 에러를 모두 수집)
    fn plan(&self, request: &QueryRequest) -> Result<Plan, ValidationErrors> {
        let validator = IdentifierValidator::new(self.schema);
        let mut errors = Vec::new();

        // 1. SELECT
        let select = match request.select_columns.as_deref() {
            None | Some([]) => None,
            Some([only]) if only.trim() == "*" => None,
            Some(tokens) => {
                let wildcard = tokens.iter().position(|t| t.trim() == "*");
                if let Some(i) = wildcard {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::Malformed,
                        format!("select_columns[{}]", i),
                        "* must be the only select entry",
                    ));
                }
                let tokens: Vec<String> = tokens
                    .iter()
                    .filter(|t| t.trim() != "*")
                    .cloned()
                    .collect();
                let (items, select_errors) = validator.validate_select_list(&tokens);
                errors.extend(select_errors);
                Some(items)
            }
        };

        let output_columns = match &select {
            None => self.schema.column_names(),
            Some(items) => items.iter().map(|i| i.output_name().to_string()).collect(),
        };
        let select_items = select.as_deref().unwrap_or(&[]);

        // 2. GROUP BY
        let mut group_by = Vec::new();
        for (i, token) in request.group_by_columns.iter().flatten().enumerate() {
            match validator.validate_group_by(token, select_items) {
                Ok(reference) => group_by.push(reference),
                Err(e) => errors.push(e.at(format!("group_by_columns[{}]", i))),
            }
        }

        // 3. ORDER BY
        let mut order_by = Vec::new();
        for (i, entry) in request.order_by_columns.iter().flatten().enumerate() {
            let field = format!("order_by_columns[{}]", i);

            let order = match entry.direction.as_deref() {
                None => Some(SortOrder::Asc),
                Some(direction) => {
                    let parsed = SortOrder::parse(direction.trim());
                    if parsed.is_none() {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::InvalidDirection,
                            format!("{}.direction", field),
                            direction,
                        ));
                    }
                    parsed
                }
            };

            match validator.validate_order_by(&entry.column, select_items, output_columns.len()) {
                Ok(reference) => {
                    if let Some(order) = order {
                        order_by.push((reference, order));
                    }
                }
                Err(e) => errors.push(e.at(format!("{}.column", field))),
            }
        }

        // 4. LIMIT
        let limit = match request.limit.as_deref() {
            None => None,
            Some(raw) => match parse_limit(raw) {
                Some(limit) => Some(limit),
                None => {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidLimit,
                        "limit",
                        raw,
                    ));
                    None
                }
            },
        };

        if let Some(errors) = ValidationErrors::from_vec(errors) {
            tracing::debug!(count = errors.len(), "query validation failed");
            return Err(errors);
        }

        Ok(Plan {
            select,
            group_by,
            order_by,
            limit,
            output_columns,
        })
    }

    fn build_select_item(&self, query: &mut SelectStatement, item: &SelectItem) {
        match &item.expr {
            SelectExpr::Column(column) => match &item.alias {
                Some(alias) => {
                    query.expr_as(Expr::col(DynIden(column.clone())), DynIden(alias.clone()));
                }
                None => {
                    query.column(DynIden(column.clone()));
                }
            },
            SelectExpr::Aggregate { function, column } => {
                let arg = Expr::col(DynIden(column.clone()));
                let call = match function {
                    Aggregation::Avg => Func::avg(arg),
                    Aggregation::Sum => Func::sum(arg),
                    Aggregation::Min => Func::min(arg),
                    Aggregation::Max => Func::max(arg),
                    Aggregation::Count => Func::count(arg),
                };
                // 결과 컬럼 이름을 output_columns와 일치시킴
                query.expr_as(call, DynIden(item.output_name().to_string()));
            }
        }
    }
}

fn reference_expr(reference: &Reference) -> SimpleExpr {
    match reference {
        Reference::Column(name) | Reference::Output(name) => Expr::col(DynIden(name.clone())).into(),
        Reference::Ordinal(n) => Expr::cust(n.to_string()),
    }
}

/// 음이 아닌 정수 리터럴 (부호/공백 불허)
fn parse_limit(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
