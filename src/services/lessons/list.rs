use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LessonService;
use crate::models::lessons::requests::{LessonListParams, LessonListQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, internal_error};
use crate::utils::date::parse_day_filter;

fn parse_bound(value: Option<String>) -> Result<Option<i64>, HttpResponse> {
    match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => parse_day_filter(raw).map(Some).map_err(|msg| {
            HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg))
        }),
    }
}

pub async fn list_lessons(
    service: &LessonService,
    request: &HttpRequest,
    query: LessonListParams,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let (from, to) = match (parse_bound(query.from), parse_bound(query.to)) {
        (Ok(from), Ok(to)) => (from, to),
        (Err(resp), _) | (_, Err(resp)) => return Ok(resp),
    };

    // 教师只能查看自己的日志
    let teacher_id = if user.is_admin() {
        query.teacher_id
    } else {
        Some(user.id)
    };

    let list_query = LessonListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        teacher_id,
        class_id: query.class_id,
        subject_id: query.subject_id,
        from,
        to,
    };

    let storage = service.get_storage(request);
    match storage.list_lessons_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Lesson list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(format!(
            "Failed to retrieve lesson list: {e}"
        ))),
    }
}
