use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::InquestService;
use crate::models::inquests::requests::{CreateInquestRequest, NewInquest};
use crate::models::notifications::requests::NewNotification;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, internal_error};

fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message))
}

pub async fn create_inquest(
    service: &InquestService,
    request: &HttpRequest,
    data: CreateInquestRequest,
) -> ActixResult<HttpResponse> {
    let admin = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let subject = data.subject.trim().to_string();
    let description = data.description.trim().to_string();
    if subject.is_empty() || description.is_empty() {
        return Ok(bad_request("subject and description are required"));
    }

    let storage = service.get_storage(request);

    match storage.get_user_by_id(data.teacher_id).await {
        Ok(Some(user)) if user.is_teacher() => {}
        Ok(_) => return Ok(bad_request("teacher_id must refer to a teacher")),
        Err(e) => return Ok(internal_error(format!("Failed to get teacher: {e}"))),
    }

    // 关联的课程日志必须属于该教师
    if let Some(lesson_id) = data.lesson_id {
        match storage.get_lesson_by_id(lesson_id).await {
            Ok(Some(lesson)) if lesson.teacher_id == data.teacher_id => {}
            Ok(_) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::LessonInvalid,
                    "lesson_id must refer to a lesson of the same teacher",
                )));
            }
            Err(e) => return Ok(internal_error(format!("Failed to get lesson: {e}"))),
        }
    }

    let notification = NewNotification {
        user_id: data.teacher_id,
        title: format!("New inquest: {subject}"),
        content: format!("{} opened an inquest that awaits your response.", admin.name()),
        link: Some("/inquests".to_string()),
    };

    let inquest = NewInquest {
        teacher_id: data.teacher_id,
        created_by: admin.id,
        subject,
        description,
        lesson_id: data.lesson_id,
    };

    match storage.create_inquest(inquest, notification).await {
        Ok(inquest) => {
            tracing::info!(
                "Inquest {} opened for teacher {} by {}",
                inquest.id,
                inquest.teacher_id,
                admin.username
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                inquest,
                "Inquest created successfully",
            )))
        }
        Err(e) => Ok(internal_error(format!("Inquest creation failed: {e}"))),
    }
}
