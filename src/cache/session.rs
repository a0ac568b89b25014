//! 会话缓存
//!
//! 会话用户按用户 ID 缓存，资料或状态变化时只删除该用户的条目。
//! 修改或重置密码时额外写入吊销时间，签发时间早于它的令牌一律失效；
//! 吊销记录的 TTL 覆盖最长的 refresh token 有效期。

use std::sync::Arc;

use super::ObjectCache;
use crate::config::AppConfig;
use crate::models::users::entities::User;

const SECONDS_PER_DAY: u64 = 86_400;

fn session_user_key(user_id: i64) -> String {
    format!("session:user:{user_id}")
}

fn session_revoked_key(user_id: i64) -> String {
    format!("session:revoked:{user_id}")
}

/// 令牌签发时间早于吊销时间即视为失效
fn issued_before_revocation(issued_at: i64, revoked_at: Option<i64>) -> bool {
    revoked_at.is_some_and(|at| issued_at < at)
}

fn revocation_ttl() -> u64 {
    let jwt = &AppConfig::get().jwt;
    let days = jwt
        .refresh_token_expiry
        .max(jwt.refresh_token_remember_me_expiry)
        .max(1);
    days as u64 * SECONDS_PER_DAY
}

pub async fn cached_session_user(cache: &Arc<dyn ObjectCache>, user_id: i64) -> Option<User> {
    cache.get_json::<User>(&session_user_key(user_id)).await
}

pub async fn cache_session_user(cache: &Arc<dyn ObjectCache>, user: &User) {
    cache
        .insert_json(
            session_user_key(user.id),
            user,
            AppConfig::get().cache.default_ttl,
        )
        .await;
}

/// 丢弃该用户的会话缓存，下次请求从数据库重新加载
pub async fn forget_session_user(cache: &Arc<dyn ObjectCache>, user_id: i64) {
    cache.remove(&session_user_key(user_id)).await;
}

/// 使该用户在 `at` 之前签发的全部令牌失效
pub async fn revoke_user_sessions(cache: &Arc<dyn ObjectCache>, user_id: i64, at: i64) {
    forget_session_user(cache, user_id).await;
    cache
        .insert_json(session_revoked_key(user_id), &at, revocation_ttl())
        .await;
}

pub async fn is_session_revoked(cache: &Arc<dyn ObjectCache>, user_id: i64, issued_at: i64) -> bool {
    let revoked_at = cache.get_json::<i64>(&session_revoked_key(user_id)).await;
    issued_before_revocation(issued_at, revoked_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::models::users::entities::{UserRole, UserStatus};
    use std::time::Duration;

    fn memory_cache() -> Arc<dyn ObjectCache> {
        Arc::new(MokaCacheWrapper::with_capacity(100, Duration::from_secs(60)))
    }

    fn user(id: i64) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: format!("teacher{id:02}"),
            email: format!("teacher{id:02}@school.test"),
            password_hash: String::new(),
            role: UserRole::Teacher,
            status: UserStatus::Active,
            display_name: None,
            phone: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_issued_before_revocation() {
        assert!(!issued_before_revocation(100, None));
        assert!(issued_before_revocation(99, Some(100)));
        assert!(!issued_before_revocation(100, Some(100)));
        assert!(!issued_before_revocation(101, Some(100)));
    }

    #[tokio::test]
    async fn test_forget_only_touches_one_user() {
        let cache = memory_cache();
        cache_session_user(&cache, &user(1)).await;
        cache_session_user(&cache, &user(2)).await;

        forget_session_user(&cache, 1).await;

        assert!(cached_session_user(&cache, 1).await.is_none());
        assert_eq!(cached_session_user(&cache, 2).await.map(|u| u.id), Some(2));
    }

    #[tokio::test]
    async fn test_revocation_rejects_older_tokens() {
        let cache = memory_cache();
        cache_session_user(&cache, &user(1)).await;
        cache_session_user(&cache, &user(2)).await;

        revoke_user_sessions(&cache, 1, 1_000).await;

        assert!(cached_session_user(&cache, 1).await.is_none());
        assert!(is_session_revoked(&cache, 1, 999).await);
        assert!(!is_session_revoked(&cache, 1, 1_000).await);
        assert!(!is_session_revoked(&cache, 2, 999).await);
        assert!(cached_session_user(&cache, 2).await.is_some());
    }
}
