//! 검증된 토큰 디코더
//!
//! 서명 검증이 끝난 토큰에서 페이로드를 꺼내 자격 증명을 만듭니다.
//! 지원 형식:
//! - `json:<json>` (테스트/개발용)
//! - JWT (`header.payload.signature`, payload는 base64url)
//! - base64/base64url 인코딩된 JSON 문자열

use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;

use super::claims::{ClaimsProvider, TokenClaims};
use super::credential::Credential;
use crate::error::{Error, Result};

/// 검증된 토큰의 페이로드를 해석하는 Claims 제공자
#[derive(Debug, Clone, Default)]
pub struct VerifiedTokenDecoder {
    resource_server_id: String,
}

impl VerifiedTokenDecoder {
    /// 새 디코더 생성
    ///
    /// # Arguments
    /// * `resource_server_id` - scope 접두사로 붙는 리소스 서버 ID (빈 문자열 = 접두사 없음)
    pub fn new(resource_server_id: impl Into<String>) -> Self {
        Self {
            resource_server_id: resource_server_id.into(),
        }
    }

    /// 토큰 페이로드 추출
    pub fn decode_payload(&self, token: &str) -> Result<Value> {
        let token = token.trim();
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();

        // 1) json: prefix
        if let Some(raw) = token.strip_prefix("json:") {
            return serde_json::from_str(raw).map_err(|e| Error::InvalidClaims {
                reason: e.to_string(),
            });
        }

        // 2) JWT payload 세그먼트
        let mut segments = token.split('.');
        if let (Some(_), Some(payload), Some(_), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) {
            if let Some(value) = decode_json(payload) {
                return Ok(value);
            }
        }

        // 3) 토큰 전체가 base64
        decode_json(token).ok_or_else(|| Error::InvalidClaims {
            reason: "unable to decode access token".to_string(),
        })
    }
}

impl ClaimsProvider for VerifiedTokenDecoder {
    fn resolve(&self, token: &str) -> Result<Credential> {
        let payload = self.decode_payload(token)?;
        TokenClaims::from_payload(&payload, &self.resource_server_id)
    }
}

fn decode_json(segment: &str) -> Option<Value> {
    [general_purpose::URL_SAFE_NO_PAD, general_purpose::STANDARD]
        .iter()
        .filter_map(|engine| engine.decode(segment).ok())
        .find_map(|bytes| serde_json::from_slice::<Value>(&bytes).ok())
        .filter(Value::is_object)
}
