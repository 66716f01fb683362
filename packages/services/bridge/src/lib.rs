//! dsh-bridge: 데이터셋 쿼리 호출 조율
//!
//! 토큰 해석, 권한 평가, 쿼리 컴파일, 실행, 결과 포맷을 하나의 호출로 묶습니다.
//! 모든 외부 협력자(Claims 제공자, 보호 도메인 레지스트리, 스키마 카탈로그,
//! 쿼리 실행기)는 생성 시 주입됩니다.
//!
//! # 모듈 구조
//!
//! - `config`: 환경변수 기반 설정
//! - `error`: Bridge 에러와 에러 응답 본문
//! - `service`: 쿼리 서비스
//! - `telemetry`: tracing 초기화

pub mod config;
pub mod error;
pub mod service;
pub mod telemetry;

pub use config::Config;
pub use error::{BridgeError, ErrorBody, ErrorResponse, Failure, Result};
pub use service::{DatasetRef, QueryResponse, QueryService, QuerySummary};
pub use telemetry::init_tracing;
