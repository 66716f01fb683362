//! 인증 관련 타입
//!
//! # 개요
//!
//! 데이터 공유 서비스의 호출자는 두 가지 주체입니다:
//!
//! - **Client**: 프로그램 클라이언트, 권한은 scope로 표현
//! - **User**: 사람 사용자, 권한은 데이터셋 단위 그룹으로 표현
//!
//! 토큰 서명 검증은 이 크레이트의 범위가 아닙니다.

mod claims;
mod credential;
mod token;

pub use claims::{ClaimsProvider, TokenClaims};
pub use credential::{Credential, SubjectType};
pub use token::VerifiedTokenDecoder;
