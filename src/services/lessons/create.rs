use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{LessonService, ensure_class_and_subject, guard_slot, lesson_conflict, normalize_topic};
use crate::models::lessons::{
    entities::LessonSlot,
    requests::{CreateLessonRequest, NewLesson},
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, internal_error};
use crate::utils::date::parse_lesson_day;

pub async fn create_lesson(
    service: &LessonService,
    request: &HttpRequest,
    data: CreateLessonRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    // 教师只能为自己记录；管理员代录时必须指定教师
    let teacher_id = if user.is_admin() {
        let Some(teacher_id) = data.teacher_id else {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::LessonInvalid,
                "teacher_id is required",
            )));
        };
        match storage.get_user_by_id(teacher_id).await {
            Ok(Some(teacher)) if teacher.is_teacher() => teacher.id,
            Ok(_) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::LessonInvalid,
                    "teacher_id must refer to a teacher",
                )));
            }
            Err(e) => return Ok(internal_error(format!("Failed to get teacher: {e}"))),
        }
    } else {
        if data.teacher_id.is_some_and(|id| id != user.id) {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "Teachers can only log their own lessons",
            )));
        }
        user.id
    };

    let Some(topic) = normalize_topic(&data.topic) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::LessonInvalid,
            "topic is required",
        )));
    };

    let lesson_day = match parse_lesson_day(data.lesson_date.as_deref(), chrono::Utc::now()) {
        Ok(day) => day,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::LessonInvalid, msg)));
        }
    };

    if let Err(resp) = ensure_class_and_subject(&storage, data.class_id, data.subject_id).await {
        return Ok(resp);
    }

    let slot = LessonSlot {
        teacher_id,
        class_id: data.class_id,
        subject_id: data.subject_id,
        lesson_day,
    };
    if let Err(resp) = guard_slot(&storage, slot, None).await {
        return Ok(resp);
    }

    let new_lesson = NewLesson {
        slot,
        topic,
        content: data.content,
        homework: data.homework,
    };

    match storage.create_lesson(new_lesson).await {
        Ok(lesson) => {
            tracing::info!(
                "Lesson {} logged by teacher {} for class {}",
                lesson.id,
                lesson.teacher_id,
                lesson.class_id
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(lesson, "Lesson created successfully")))
        }
        // 查重之后的并发写入
        Err(e) if e.is_unique_violation() => Ok(lesson_conflict()),
        Err(e) => Ok(internal_error(format!("Lesson creation failed: {e}"))),
    }
}
