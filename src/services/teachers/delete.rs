use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::path::Path;

use super::TeacherService;
use super::get::load_teacher;
use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::files::remove_stored_files;
use crate::services::{forget_session, internal_error};

pub async fn delete_teacher(
    service: &TeacherService,
    teacher_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(resp) = load_teacher(&storage, teacher_id).await {
        return Ok(resp);
    }

    // 文件记录随用户级联删除，磁盘文件需先记下
    let uploads = match storage.list_files_by_user(teacher_id).await {
        Ok(files) => files,
        Err(e) => return Ok(internal_error(format!("Failed to list teacher files: {e}"))),
    };

    // 教学日志、接收记录、通知与问询随外键级联删除
    match storage.delete_user(teacher_id).await {
        Ok(true) => {
            forget_session(request, teacher_id).await;
            let removed = remove_stored_files(Path::new(&AppConfig::get().upload.dir), &uploads);
            tracing::info!(
                "Teacher {} deleted, {} stored file(s) removed",
                teacher_id,
                removed
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Teacher deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "Teacher not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserDeleteFailed,
                format!("Failed to delete teacher: {e}"),
            )),
        ),
    }
}
