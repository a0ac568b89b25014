use serde::Serialize;

// 找回密码令牌
#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetToken {
    pub id: i64,
    pub user_id: i64,
    #[serde(skip_serializing)]
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub used_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl PasswordResetToken {
    /// 未使用且未过期
    pub fn is_usable(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn token(expires_in: Duration, used: bool) -> PasswordResetToken {
        let now = Utc::now();
        PasswordResetToken {
            id: 1,
            user_id: 1,
            token: "abc".into(),
            expires_at: now + expires_in,
            used_at: used.then_some(now),
            created_at: now,
        }
    }

    #[test]
    fn test_token_usable() {
        let now = Utc::now();
        assert!(token(Duration::minutes(30), false).is_usable(now));
        assert!(!token(Duration::minutes(-1), false).is_usable(now));
        assert!(!token(Duration::minutes(30), true).is_usable(now));
    }
}
