//! 요청 자격 증명
//!
//! 요청마다 한 번 생성되는 불변 자격 증명입니다.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// 인증 주체 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubjectType {
    /// 사람 사용자 (토큰 = 그룹 이름)
    User,
    /// 프로그램 클라이언트 (토큰 = scope)
    Client,
}

/// 자격 증명
///
/// `CLIENT`의 토큰은 scope(`READ_PROTECTED_land`),
/// `USER`의 토큰은 그룹 이름(`WRITE/land/train_journeys`)입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    subject_id: String,
    subject_type: SubjectType,
    raw_tokens: BTreeSet<String>,
}

impl Credential {
    pub fn new<I, S>(subject_id: impl Into<String>, subject_type: SubjectType, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subject_id: subject_id.into(),
            subject_type,
            raw_tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Client 자격 증명 생성
    pub fn client<I, S>(subject_id: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(subject_id, SubjectType::Client, scopes)
    }

    /// User 자격 증명 생성
    pub fn user<I, S>(subject_id: impl Into<String>, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(subject_id, SubjectType::User, groups)
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn subject_type(&self) -> SubjectType {
        self.subject_type
    }

    pub fn raw_tokens(&self) -> impl Iterator<Item = &str> {
        self.raw_tokens.iter().map(|s| s.as_str())
    }

    pub fn is_client(&self) -> bool {
        self.subject_type == SubjectType::Client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let client = Credential::client("client_1", ["READ_ALL", "READ_ALL"]);
        assert!(client.is_client());
        assert_eq!(client.raw_tokens().count(), 1);

        let user = Credential::user("user_1", vec!["WRITE/dot/cars".to_string()]);
        assert_eq!(user.subject_type(), SubjectType::User);
        assert_eq!(user.subject_id(), "user_1");
    }
}
