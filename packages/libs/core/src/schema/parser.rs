//! 스키마 문서 파서
//!
//! `{"metadata": {...}, "columns": [...]}` 형태의 스키마 문서(JSON 또는 YAML)를
//! [`DatasetSchema`]로 변환합니다.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use super::column::Column;
use super::dataset::{DatasetSchema, Owner, SchemaMetadata, UpdateBehaviour};
use super::types::DataType;
use crate::error::{Error, Result};
use crate::permissions::SensitivityLevel;

/// 스키마 파서
pub struct SchemaParser;

impl SchemaParser {
    /// JSON 문서 파싱
    pub fn parse_json(json: &str) -> Result<DatasetSchema> {
        let raw: RawSchema = serde_json::from_str(json)?;
        Self::convert_raw_schema(raw)
    }

    /// YAML 문서 파싱
    pub fn parse_yaml(yaml: &str) -> Result<DatasetSchema> {
        let raw: RawSchema = serde_yaml::from_str(yaml)?;
        Self::convert_raw_schema(raw)
    }

    fn convert_raw_schema(raw: RawSchema) -> Result<DatasetSchema> {
        let metadata = Self::convert_raw_metadata(raw.metadata)?;
        let columns = Self::convert_raw_columns(raw.columns)?;

        Ok(DatasetSchema::new(metadata, columns))
    }

    fn convert_raw_metadata(raw: RawMetadata) -> Result<SchemaMetadata> {
        for (field, value) in [("domain", &raw.domain), ("dataset", &raw.dataset)] {
            if value.trim().is_empty() {
                return Err(Error::SchemaParse {
                    message: format!("metadata.{} must not be empty", field),
                });
            }
        }

        // 등급 문자열 검증
        SensitivityLevel::for_dataset(&raw.sensitivity, &raw.domain)?;

        let mut metadata = SchemaMetadata {
            domain: raw.domain,
            dataset: raw.dataset,
            sensitivity: raw.sensitivity,
            version: raw.version,
            key_value_tags: raw.key_value_tags,
            key_only_tags: raw.key_only_tags,
            owners: raw.owners,
            update_behaviour: raw.update_behaviour,
        };
        metadata.remove_duplicate_tags();

        Ok(metadata)
    }

    fn convert_raw_columns(raw: Vec<RawColumn>) -> Result<Vec<Column>> {
        if raw.is_empty() {
            return Err(Error::SchemaParse {
                message: "schema must declare at least one column".to_string(),
            });
        }

        let mut seen = HashSet::new();
        let mut partition_indexes = HashSet::new();
        let mut columns = Vec::with_capacity(raw.len());

        for raw_col in raw {
            if !seen.insert(raw_col.name.clone()) {
                return Err(Error::DuplicateColumn { name: raw_col.name });
            }

            if let Some(index) = raw_col.partition_index {
                if !partition_indexes.insert(index) {
                    return Err(Error::SchemaParse {
                        message: format!("duplicate partition index: {}", index),
                    });
                }
            }

            columns.push(Self::convert_raw_column(raw_col)?);
        }

        Ok(columns)
    }

    fn convert_raw_column(raw: RawColumn) -> Result<Column> {
        let data_type =
            DataType::from_wire(&raw.data_type).ok_or_else(|| Error::InvalidColumnType {
                type_name: raw.data_type.clone(),
            })?;

        Ok(Column {
            name: raw.name,
            partition_index: raw.partition_index,
            data_type,
            allow_null: raw.allow_null.unwrap_or(true),
            format: raw.format,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Raw 문서 구조체 (serde 역직렬화용)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawSchema {
    metadata: RawMetadata,
    columns: Vec<RawColumn>,
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    domain: String,
    dataset: String,
    sensitivity: String,
    version: Option<u32>,
    #[serde(default)]
    key_value_tags: BTreeMap<String, String>,
    #[serde(default)]
    key_only_tags: Vec<String>,
    owners: Option<Vec<Owner>>,
    #[serde(default)]
    update_behaviour: UpdateBehaviour,
}

#[derive(Debug, Deserialize)]
struct RawColumn {
    name: String,
    partition_index: Option<u32>,
    data_type: String,
    allow_null: Option<bool>,
    format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_schema() {
        let json = r#"{
            "metadata": {
                "domain": "land",
                "dataset": "train_journeys",
                "sensitivity": "PUBLIC",
                "version": 2,
                "key_value_tags": {"owner": "ops"},
                "key_only_tags": ["railway"],
                "owners": [{"name": "Ops", "email": "ops@example.com"}]
            },
            "columns": [
                {"name": "date", "partition_index": 0, "data_type": "date", "allow_null": false, "format": "%d/%m/%Y"},
                {"name": "num_journeys", "partition_index": null, "data_type": "Int64", "allow_null": true}
            ]
        }"#;

        let schema = SchemaParser::parse_json(json).unwrap();

        assert_eq!(schema.domain(), "land");
        assert_eq!(schema.version(), 2);
        assert_eq!(schema.column_names(), vec!["date", "num_journeys"]);

        let date = schema.column("date").unwrap();
        assert_eq!(date.data_type, DataType::Date);
        assert_eq!(date.partition_index, Some(0));
        assert!(!date.allow_null);
        assert_eq!(schema.metadata.update_behaviour, UpdateBehaviour::Append);
    }

    #[test]
    fn test_parse_yaml_schema() {
        let yaml = r#"
metadata:
  domain: sea
  dataset: vessels
  sensitivity: PROTECTED
  update_behaviour: OVERWRITE
columns:
  - name: vessel
    data_type: object
    allow_null: false
  - name: tonnage
    data_type: Float64
"#;

        let schema = SchemaParser::parse_yaml(yaml).unwrap();
        assert_eq!(schema.version(), 1);
        assert_eq!(schema.metadata.update_behaviour, UpdateBehaviour::Overwrite);
        assert_eq!(
            schema.resource().unwrap().sensitivity,
            SensitivityLevel::protected("sea")
        );
        assert!(schema.column("tonnage").unwrap().allow_null);
    }

    #[test]
    fn test_duplicate_column_error() {
        let yaml = r#"
metadata: {domain: land, dataset: x, sensitivity: PUBLIC}
columns:
  - {name: a, data_type: Int64}
  - {name: a, data_type: object}
"#;

        let result = SchemaParser::parse_yaml(yaml);
        assert!(matches!(result, Err(Error::DuplicateColumn { name }) if name == "a"));
    }

    #[test]
    fn test_invalid_column_type_error() {
        let yaml = r#"
metadata: {domain: land, dataset: x, sensitivity: PUBLIC}
columns:
  - {name: a, data_type: string}
"#;

        let result = SchemaParser::parse_yaml(yaml);
        assert!(matches!(result, Err(Error::InvalidColumnType { .. })));
    }

    #[test]
    fn test_invalid_metadata() {
        let bad_sensitivity = r#"
metadata: {domain: land, dataset: x, sensitivity: SECRET}
columns:
  - {name: a, data_type: Int64}
"#;
        assert!(matches!(
            SchemaParser::parse_yaml(bad_sensitivity),
            Err(Error::InvalidSensitivity { .. })
        ));

        let no_columns = r#"
metadata: {domain: land, dataset: x, sensitivity: PUBLIC}
columns: []
"#;
        assert!(SchemaParser::parse_yaml(no_columns).is_err());

        assert!(matches!(
            SchemaParser::parse_json("{\"metadata\": {}}"),
            Err(Error::Json(_))
        ));
    }
}
