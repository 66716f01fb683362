//! Bridge 설정

use std::env;

use dsh_sql::OutputFormat;

/// Bridge 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 쿼리를 실행할 데이터베이스
    pub database: String,

    /// Client scope 앞에 붙는 리소스 서버 ID (빈 문자열 = 접두사 없음)
    pub resource_server_id: String,

    /// Accept 헤더가 없거나 `*/*`일 때의 응답 형식
    pub default_format: OutputFormat,

    /// RUST_LOG가 없을 때의 tracing 필터
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: "datashare_catalogue_db".to_string(),
            resource_server_id: String::new(),
            default_format: OutputFormat::Json,
            log_filter: "dsh_bridge=info,dsh_core=info,dsh_sql=info".to_string(),
        }
    }
}

impl Config {
    /// `.env` 로드 후 환경변수에서 설정 로드
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// 환경변수에서 설정 로드
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 키 조회 함수에서 설정 로드
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            database: lookup("DSH_DATABASE").unwrap_or(defaults.database),

            resource_server_id: lookup("DSH_RESOURCE_SERVER_ID")
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.resource_server_id),

            default_format: match lookup("DSH_DEFAULT_FORMAT") {
                Some(v) => v.parse()?,
                None => defaults.default_format,
            },

            log_filter: lookup("DSH_LOG_FILTER").unwrap_or(defaults.log_filter),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.database, "datashare_catalogue_db");
        assert_eq!(config.resource_server_id, "");
        assert_eq!(config.default_format, OutputFormat::Json);
    }

    #[test]
    fn test_overrides() {
        let vars = HashMap::from([
            ("DSH_DATABASE", "other_db"),
            ("DSH_RESOURCE_SERVER_ID", " https://example.com "),
            ("DSH_DEFAULT_FORMAT", "text/csv"),
        ]);

        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.database, "other_db");
        assert_eq!(config.resource_server_id, "https://example.com");
        assert_eq!(config.default_format, OutputFormat::Csv);
    }

    #[test]
    fn test_invalid_default_format() {
        let result = Config::from_lookup(|key| {
            (key == "DSH_DEFAULT_FORMAT").then(|| "application/xml".to_string())
        });
        assert!(result.is_err());
    }
}
