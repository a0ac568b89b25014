use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{LessonService, load_accessible_lesson};
use crate::models::ApiResponse;
use crate::models::lessons::responses::LessonResponse;
use crate::services::current_user;

pub async fn get_lesson(
    service: &LessonService,
    request: &HttpRequest,
    lesson_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match load_accessible_lesson(&storage, &user, lesson_id).await {
        Ok(lesson) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            LessonResponse { lesson },
            "Lesson retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}
