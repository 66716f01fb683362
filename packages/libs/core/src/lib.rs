//! dsh-core: 데이터 공유 서비스 공통 핵심 라이브러리
//!
//! 이 크레이트는 쿼리 컴파일러와 Bridge가 공유하는 핵심 타입과 로직을 제공합니다.
//!
//! # 모듈 구조
//!
//! - `auth`: 자격 증명과 토큰 claims 해석
//! - `permissions`: 민감도 모델, 권한 문법, 정책 엔진
//! - `schema`: 데이터셋 스키마 모델과 카탈로그
//! - `error`: 공통 에러 타입

pub mod auth;
pub mod error;
pub mod permissions;
pub mod schema;

pub use error::{Error, Result};
