use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{
    LessonService, ensure_class_and_subject, guard_slot, lesson_conflict, load_accessible_lesson,
    normalize_topic,
};
use crate::models::lessons::{
    entities::LessonSlot,
    requests::{LessonChanges, UpdateLessonRequest},
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, internal_error};
use crate::utils::date::parse_lesson_day;

pub async fn update_lesson(
    service: &LessonService,
    request: &HttpRequest,
    lesson_id: i64,
    data: UpdateLessonRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let lesson = match load_accessible_lesson(&storage, &user, lesson_id).await {
        Ok(lesson) => lesson,
        Err(resp) => return Ok(resp),
    };

    let topic = match data.topic.as_deref() {
        Some(raw) => match normalize_topic(raw) {
            Some(topic) => Some(topic),
            None => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::LessonInvalid,
                    "topic must not be empty",
                )));
            }
        },
        None => None,
    };

    let lesson_day = match data.lesson_date.as_deref() {
        Some(raw) => match parse_lesson_day(Some(raw), chrono::Utc::now()) {
            Ok(day) => day,
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::LessonInvalid, msg)));
            }
        },
        None => lesson.lesson_day.timestamp(),
    };

    // 合并后的四元组
    let slot = LessonSlot {
        teacher_id: lesson.teacher_id,
        class_id: data.class_id.unwrap_or(lesson.class_id),
        subject_id: data.subject_id.unwrap_or(lesson.subject_id),
        lesson_day,
    };

    if (slot.class_id != lesson.class_id || slot.subject_id != lesson.subject_id)
        && let Err(resp) = ensure_class_and_subject(&storage, slot.class_id, slot.subject_id).await
    {
        return Ok(resp);
    }

    if slot != lesson.slot()
        && let Err(resp) = guard_slot(&storage, slot, Some(lesson.id)).await
    {
        return Ok(resp);
    }

    let changes = LessonChanges {
        slot,
        topic,
        content: data.content,
        homework: data.homework,
    };

    match storage.update_lesson(lesson_id, changes).await {
        Ok(Some(lesson)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            lesson,
            "Lesson updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::LessonNotFound,
            "Lesson not found",
        ))),
        Err(e) if e.is_unique_violation() => Ok(lesson_conflict()),
        Err(e) => Ok(internal_error(format!("Lesson update failed: {e}"))),
    }
}
