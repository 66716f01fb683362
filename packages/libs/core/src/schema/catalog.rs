//! 스키마 카탈로그
//!
//! 데이터셋 스키마를 제공하는 외부 협력자 인터페이스와 메모리 구현입니다.

use std::collections::BTreeMap;

use super::dataset::{DatasetSchema, SchemaMetadata};
use crate::error::{Error, Result};

/// 스키마 조회 인터페이스
pub trait SchemaCatalog: Send + Sync {
    /// 스키마 조회 (`version`이 None이면 최신 버전)
    fn get(&self, domain: &str, dataset: &str, version: Option<u32>) -> Result<DatasetSchema>;

    /// 데이터셋별 최신 스키마 메타데이터
    fn list(&self) -> Vec<SchemaMetadata>;
}

/// 메모리 내 카탈로그
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    // (domain, dataset) -> version -> schema
    schemas: BTreeMap<(String, String), BTreeMap<u32, DatasetSchema>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 스키마 등록 (같은 버전은 교체)
    pub fn insert(&mut self, schema: DatasetSchema) {
        let key = (schema.domain().to_string(), schema.dataset().to_string());
        self.schemas
            .entry(key)
            .or_default()
            .insert(schema.version(), schema);
    }

    pub fn with_schema(mut self, schema: DatasetSchema) -> Self {
        self.insert(schema);
        self
    }
}

impl SchemaCatalog for InMemoryCatalog {
    fn get(&self, domain: &str, dataset: &str, version: Option<u32>) -> Result<DatasetSchema> {
        let not_found = || Error::SchemaNotFound {
            domain: domain.to_string(),
            dataset: dataset.to_string(),
        };

        let versions = self
            .schemas
            .get(&(domain.to_string(), dataset.to_string()))
            .ok_or_else(not_found)?;

        let schema = match version {
            Some(version) => versions.get(&version),
            None => versions.values().next_back(),
        };

        schema.cloned().ok_or_else(not_found)
    }

    fn list(&self) -> Vec<SchemaMetadata> {
        self.schemas
            .values()
            .filter_map(|versions| versions.values().next_back())
            .map(|schema| schema.metadata.clone())
            .collect()
    }
}
