//! 쿼리 서비스
//!
//! 한 호출의 전체 흐름을 조율합니다.
//!
//! ```text
//! 토큰 -> 자격 증명 -> 스키마 조회 -> 권한 평가 -> 컴파일 -> 실행 -> 포맷
//! ```
//!
//! 모든 협력자는 주입되며, 서비스는 호출 간 상태를 갖지 않습니다.

use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;

use uuid::Uuid;

use dsh_core::auth::{ClaimsProvider, Credential};
use dsh_core::permissions::{Action, PolicyEngine, ProtectedDomainRegistry, ResourceRef};
use dsh_core::schema::{SchemaCatalog, SchemaMetadata};
use dsh_sql::{OutputFormat, QueryCompiler, QueryExecutor, QueryRequest};

use crate::config::Config;
use crate::error::{BridgeError, Failure, Result};

/// 쿼리 대상 데이터셋
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRef {
    pub domain: String,
    pub dataset: String,

    /// 스키마 버전 (None = 최신)
    pub version: Option<u32>,
}

impl DatasetRef {
    pub fn new(domain: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            dataset: dataset.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }
}

/// 쿼리 응답
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub row_count: u64,
    pub request_id: String,
}

/// 스트리밍 쿼리 결과 요약
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySummary {
    pub content_type: &'static str,
    pub row_count: u64,
    pub request_id: String,
}

/// 쿼리 서비스
pub struct QueryService {
    config: Config,
    claims: Arc<dyn ClaimsProvider>,
    registry: Arc<dyn ProtectedDomainRegistry + Send + Sync>,
    catalog: Arc<dyn SchemaCatalog>,
    executor: Arc<dyn QueryExecutor>,
}

impl QueryService {
    /// 새 서비스 생성
    pub fn new(
        config: Config,
        claims: Arc<dyn ClaimsProvider>,
        registry: Arc<dyn ProtectedDomainRegistry + Send + Sync>,
        catalog: Arc<dyn SchemaCatalog>,
        executor: Arc<dyn QueryExecutor>,
    ) -> Self {
        Self {
            config,
            claims,
            registry,
            catalog,
            executor,
        }
    }

    /// 데이터셋 쿼리 (응답 본문을 메모리에 생성)
    pub fn query_dataset(
        &self,
        token: &str,
        target: &DatasetRef,
        request: &QueryRequest,
        accept: Option<&str>,
    ) -> std::result::Result<QueryResponse, Failure> {
        let mut body = Vec::new();
        let summary = self.stream_dataset(token, target, request, accept, &mut body)?;

        Ok(QueryResponse {
            content_type: summary.content_type,
            body,
            row_count: summary.row_count,
            request_id: summary.request_id,
        })
    }

    /// 데이터셋 쿼리 (결과를 `out`에 행 단위로 기록)
    ///
    /// 실행이 성공하기 전에는 `out`에 아무것도 쓰지 않습니다.
    pub fn stream_dataset<W: Write>(
        &self,
        token: &str,
        target: &DatasetRef,
        request: &QueryRequest,
        accept: Option<&str>,
        out: &mut W,
    ) -> std::result::Result<QuerySummary, Failure> {
        self.run("query_dataset", |request_id| {
            tracing::info!(domain = %target.domain, dataset = %target.dataset, "query started");

            let credential = self.resolve(token)?;
            let schema = self
                .catalog
                .get(&target.domain, &target.dataset, target.version)?;

            let resource = schema.resource()?;
            self.authorize(&credential, Action::Read, Some(&resource))?;

            let format = OutputFormat::from_accept(accept, self.config.default_format)?;

            let table = schema.table_name(target.version);
            let compiled = QueryCompiler::new(&schema).compile(request, &table)?;

            let rows = self
                .executor
                .execute(&self.config.database, &compiled.statement)
                .map_err(|e| {
                    let error = BridgeError::from(e);
                    match &error {
                        BridgeError::UpstreamNotReady { table } => {
                            tracing::warn!(%table, "table not ready")
                        }
                        other => tracing::error!(statement = %compiled.statement, "{}", other),
                    }
                    error
                })?;

            let row_count = format.write(out, &compiled.output_columns, rows)?;
            tracing::info!(row_count, format = %format, "query finished");

            Ok(QuerySummary {
                content_type: format.content_type(),
                row_count,
                request_id: request_id.to_string(),
            })
        })
    }

    /// 자격 증명이 `action`을 수행할 수 있는 데이터셋 목록
    pub fn list_datasets(
        &self,
        token: &str,
        action: Action,
    ) -> std::result::Result<Vec<SchemaMetadata>, Failure> {
        self.run("list_datasets", |_| {
            let credential = self.resolve(token)?;

            let mut candidates = Vec::new();
            for metadata in self.catalog.list() {
                match metadata.resource() {
                    Ok(resource) => candidates.push((resource, metadata)),
                    Err(e) => tracing::warn!(
                        domain = %metadata.domain,
                        dataset = %metadata.dataset,
                        "skipping dataset: {}",
                        e
                    ),
                }
            }

            let engine = PolicyEngine::new(self.registry.as_ref());
            let allowed: HashSet<&ResourceRef> = engine
                .authorised_resources(&credential, action, candidates.iter().map(|(r, _)| r))
                .into_iter()
                .collect();

            let datasets: Vec<SchemaMetadata> = candidates
                .iter()
                .filter(|(resource, _)| allowed.contains(resource))
                .map(|(_, metadata)| metadata.clone())
                .collect();

            tracing::info!(count = datasets.len(), "listed datasets");
            Ok(datasets)
        })
    }

    /// 관리 액션 권한 확인 (`DATA_ADMIN`/`USER_ADMIN`)
    pub fn authorize_admin(
        &self,
        token: &str,
        action: Action,
    ) -> std::result::Result<(), Failure> {
        self.run("authorize_admin", |_| {
            if !action.is_standalone() {
                return Err(BridgeError::BadRequest {
                    message: format!("{} is not an admin action", action),
                });
            }

            let credential = self.resolve(token)?;
            self.authorize(&credential, action, None)
        })
    }

    fn resolve(&self, token: &str) -> Result<Credential> {
        Ok(self.claims.resolve(token)?)
    }

    fn authorize(
        &self,
        credential: &Credential,
        action: Action,
        resource: Option<&ResourceRef>,
    ) -> Result<()> {
        let engine = PolicyEngine::new(self.registry.as_ref());
        let decision = engine.authorize(credential, action, resource);

        if !decision.allowed {
            tracing::info!(
                subject = credential.subject_id(),
                action = %action,
                reason = decision.reason_text().as_deref().unwrap_or(""),
                "access denied"
            );
        }

        Ok(decision.into_result()?)
    }

    /// 요청 ID 스팬 안에서 실행하고 에러에 요청 ID를 붙임
    fn run<T, F>(&self, operation: &'static str, f: F) -> std::result::Result<T, Failure>
    where
        F: FnOnce(&str) -> Result<T>,
    {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("call", operation, request_id = %request_id);
        let _guard = span.enter();

        f(&request_id).map_err(|error| {
            if error.status_code() >= 500 {
                tracing::warn!(code = error.code(), "{} failed: {}", operation, error);
            } else {
                tracing::info!(code = error.code(), "{} rejected: {}", operation, error);
            }
            Failure { request_id, error }
        })
    }
}
