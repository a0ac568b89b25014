use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::TeacherService;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode, users::responses::UserResponse};
use crate::services::internal_error;
use crate::storage::Storage;

/// 只返回教师账号，管理员账号视为不存在
pub(crate) async fn load_teacher(
    storage: &Arc<dyn Storage>,
    teacher_id: i64,
) -> Result<User, HttpResponse> {
    match storage.get_user_by_id(teacher_id).await {
        Ok(Some(user)) if user.is_teacher() => Ok(user),
        Ok(_) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "Teacher not found",
        ))),
        Err(e) => Err(internal_error(format!("Failed to get teacher: {e}"))),
    }
}

pub async fn get_teacher(
    service: &TeacherService,
    teacher_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match load_teacher(&storage, teacher_id).await {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user },
            "Teacher retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}
