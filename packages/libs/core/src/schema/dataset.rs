//! 데이터셋 스키마
//!
//! 하나의 (도메인, 데이터셋, 버전)에 대한 메타데이터와 컬럼 목록입니다.
//! 스키마 카탈로그에서 호출마다 조회되며 읽기 전용으로 사용됩니다.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::column::Column;
use crate::error::Result;
use crate::permissions::{ResourceRef, SensitivityLevel};

/// 첫 스키마 버전
pub const FIRST_SCHEMA_VERSION: u32 = 1;

/// 데이터셋 소유자
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub email: String,
}

/// 업로드 시 기존 데이터 처리 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateBehaviour {
    #[default]
    Append,
    Overwrite,
}

/// 스키마 메타데이터
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMetadata {
    pub domain: String,
    pub dataset: String,

    /// 등급 문자열 (`PUBLIC`, `PRIVATE`, `PROTECTED`)
    pub sensitivity: String,

    /// 스키마 버전 (생략 시 첫 버전)
    #[serde(default)]
    pub version: Option<u32>,

    #[serde(default)]
    pub key_value_tags: BTreeMap<String, String>,

    #[serde(default)]
    pub key_only_tags: Vec<String>,

    #[serde(default)]
    pub owners: Option<Vec<Owner>>,

    #[serde(default)]
    pub update_behaviour: UpdateBehaviour,
}

impl SchemaMetadata {
    pub fn new(
        domain: impl Into<String>,
        dataset: impl Into<String>,
        sensitivity: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            dataset: dataset.into(),
            sensitivity: sensitivity.into(),
            version: None,
            key_value_tags: BTreeMap::new(),
            key_only_tags: Vec::new(),
            owners: None,
            update_behaviour: UpdateBehaviour::default(),
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn version(&self) -> u32 {
        self.version.unwrap_or(FIRST_SCHEMA_VERSION)
    }

    /// 민감도 수준 (`PROTECTED`는 도메인 범위)
    pub fn sensitivity_level(&self) -> Result<SensitivityLevel> {
        SensitivityLevel::for_dataset(&self.sensitivity, &self.domain)
    }

    /// 권한 평가용 리소스
    pub fn resource(&self) -> Result<ResourceRef> {
        Ok(ResourceRef::new(
            self.domain.clone(),
            self.dataset.clone(),
            self.sensitivity_level()?,
        ))
    }

    /// 키-값 태그와 겹치는 키 전용 태그 제거
    pub fn remove_duplicate_tags(&mut self) {
        let key_value_tags = &self.key_value_tags;
        self.key_only_tags.retain(|key| !key_value_tags.contains_key(key));
    }
}

/// 데이터셋 스키마
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSchema {
    pub metadata: SchemaMetadata,
    pub columns: Vec<Column>,
}

impl DatasetSchema {
    pub fn new(metadata: SchemaMetadata, columns: Vec<Column>) -> Self {
        Self { metadata, columns }
    }

    pub fn domain(&self) -> &str {
        &self.metadata.domain
    }

    pub fn dataset(&self) -> &str {
        &self.metadata.dataset
    }

    pub fn version(&self) -> u32 {
        self.metadata.version()
    }

    pub fn resource(&self) -> Result<ResourceRef> {
        self.metadata.resource()
    }

    /// 컬럼 조회
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// 선언 순서의 컬럼 이름
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// 파티션 순서로 정렬된 파티션 컬럼
    pub fn partition_columns(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.iter().filter(|c| c.is_partition()).collect();
        columns.sort_by_key(|c| c.partition_index);
        columns
    }

    /// 쿼리 대상 테이블 이름 (`{domain}_{dataset}_{version}`)
    pub fn table_name(&self, version: Option<u32>) -> String {
        format!(
            "{}_{}_{}",
            self.domain(),
            self.dataset(),
            version.unwrap_or_else(|| self.version())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DataType;

    fn schema() -> DatasetSchema {
        DatasetSchema::new(
            SchemaMetadata::new("land", "train_journeys", "PROTECTED").with_version(3),
            vec![
                Column::new("date", DataType::Date).partitioned(1),
                Column::new("region", DataType::Object).partitioned(0),
                Column::new("num_journeys", DataType::Int64),
            ],
        )
    }

    #[test]
    fn test_resource() {
        let resource = schema().resource().unwrap();
        assert_eq!(resource.domain, "land");
        assert_eq!(resource.dataset, "train_journeys");
        assert_eq!(resource.sensitivity, SensitivityLevel::protected("land"));

        let bad = SchemaMetadata::new("land", "x", "SECRET");
        assert!(bad.resource().is_err());
    }

    #[test]
    fn test_partition_columns_in_partition_order() {
        let schema = schema();
        let names: Vec<&str> = schema
            .partition_columns()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["region", "date"]);
    }

    #[test]
    fn test_table_name() {
        let schema = schema();
        assert_eq!(schema.table_name(None), "land_train_journeys_3");
        assert_eq!(schema.table_name(Some(1)), "land_train_journeys_1");
        assert_eq!(SchemaMetadata::new("a", "b", "PUBLIC").version(), 1);
    }

    #[test]
    fn test_tags() {
        let mut metadata = SchemaMetadata::new("land", "x", "PUBLIC");
        metadata
            .key_value_tags
            .insert("owner".to_string(), "ops".to_string());
        metadata.key_only_tags = vec!["owner".to_string(), "railway".to_string()];

        metadata.remove_duplicate_tags();
        assert_eq!(metadata.key_only_tags, vec!["railway".to_string()]);
    }
}
