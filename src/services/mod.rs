pub mod academic_years;
pub mod announcements;
pub mod auth;
pub mod classes;
pub mod dashboard;
pub mod files;
pub mod inquests;
pub mod lessons;
pub mod notifications;
pub mod schedules;
pub mod subjects;
pub mod system;
pub mod teachers;

pub use academic_years::AcademicYearService;
pub use announcements::AnnouncementService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use dashboard::DashboardService;
pub use files::FileService;
pub use inquests::InquestService;
pub use lessons::LessonService;
pub use notifications::NotificationService;
pub use schedules::ScheduleService;
pub use subjects::SubjectService;
pub use system::SystemService;
pub use teachers::TeacherService;

use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::cache::session::{forget_session_user, revoke_user_sessions};
use crate::middlewares::RequireJWT;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

pub(crate) fn get_cache(request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
}

/// 用户资料或状态变化后，丢弃该用户的会话缓存
pub(crate) async fn forget_session(request: &HttpRequest, user_id: i64) {
    if let Some(cache) = get_cache(request) {
        forget_session_user(&cache, user_id).await;
    }
}

/// 密码变化后，该用户此前签发的令牌全部失效
pub(crate) async fn revoke_sessions(request: &HttpRequest, user_id: i64) {
    if let Some(cache) = get_cache(request) {
        revoke_user_sessions(&cache, user_id, chrono::Utc::now().timestamp()).await;
    }
}

/// 当前会话用户，未登录时给出 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        ))
    })
}

pub(crate) fn internal_error(message: String) -> HttpResponse {
    tracing::error!("{}", message);
    HttpResponse::InternalServerError()
        .json(ApiResponse::error_empty(ErrorCode::InternalServerError, message))
}
