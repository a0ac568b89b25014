//! 路由测试环境：迁移好的内存数据库、moka 会话缓存与登录令牌

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::ObjectCache;
use crate::cache::object_cache::moka::MokaCacheWrapper;
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;
use crate::storage::sea_orm_storage::test_support::{memory_storage, teacher_request};
use crate::utils::jwt::JwtUtils;

pub(crate) struct TestContext {
    pub storage: web::Data<Arc<dyn Storage>>,
    pub cache: web::Data<Arc<dyn ObjectCache>>,
}

impl TestContext {
    pub async fn new() -> Self {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_capacity(
            1_000,
            Duration::from_secs(60),
        ));
        Self {
            storage: web::Data::new(storage),
            cache: web::Data::new(cache),
        }
    }

    pub fn storage(&self) -> Arc<dyn Storage> {
        self.storage.get_ref().clone()
    }

    pub async fn user(&self, username: &str, role: UserRole) -> User {
        let mut request = teacher_request(username);
        request.role = role;
        self.storage.create_user(request).await.unwrap()
    }
}

/// `Authorization` 请求头
pub(crate) fn bearer(user: &User) -> (&'static str, String) {
    let token = JwtUtils::generate_access_token(user.id, &user.role.to_string()).unwrap();
    ("Authorization", format!("Bearer {token}"))
}

/// 发送请求，返回状态码与 JSON 响应体
pub(crate) async fn call_json<S, R, B>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// 用测试环境的 app_data 初始化一组路由
macro_rules! init_app {
    ($ctx:expr, $configure:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($ctx.storage.clone())
                .app_data($ctx.cache.clone())
                .configure($configure),
        )
    };
}

pub(crate) use init_app;
