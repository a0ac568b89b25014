//! 教学日志
//!
//! 同一 (教师, 班级, 科目, UTC 日) 只允许一条日志：写入前先查重返回 409，
//! 并发写入由唯一索引兜底，同样映射为 409。

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::lessons::entities::{Lesson, LessonSlot};
use crate::models::lessons::requests::{CreateLessonRequest, LessonListParams, UpdateLessonRequest};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;
use crate::storage::Storage;

pub struct LessonService {
    storage: Option<Arc<dyn Storage>>,
}

impl LessonService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn create_lesson(
        &self,
        request: &HttpRequest,
        data: CreateLessonRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_lesson(self, request, data).await
    }

    pub async fn list_lessons(
        &self,
        request: &HttpRequest,
        query: LessonListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_lessons(self, request, query).await
    }

    pub async fn get_lesson(
        &self,
        request: &HttpRequest,
        lesson_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_lesson(self, request, lesson_id).await
    }

    pub async fn update_lesson(
        &self,
        request: &HttpRequest,
        lesson_id: i64,
        data: UpdateLessonRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_lesson(self, request, lesson_id, data).await
    }

    pub async fn delete_lesson(
        &self,
        request: &HttpRequest,
        lesson_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_lesson(self, request, lesson_id).await
    }
}

/// 管理员或日志所属教师
pub(crate) fn can_access(user: &User, lesson: &Lesson) -> bool {
    user.is_admin() || lesson.teacher_id == user.id
}

pub(crate) fn lesson_conflict() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::LessonAlreadyExists,
        "A lesson for this teacher, class and subject already exists on that day",
    ))
}

/// 读取日志并校验访问权限
async fn load_accessible_lesson(
    storage: &Arc<dyn Storage>,
    user: &User,
    lesson_id: i64,
) -> Result<Lesson, HttpResponse> {
    let lesson = match storage.get_lesson_by_id(lesson_id).await {
        Ok(Some(lesson)) => lesson,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::LessonNotFound,
                "Lesson not found",
            )));
        }
        Err(e) => return Err(internal_error(format!("Failed to get lesson: {e}"))),
    };

    if !can_access(user, &lesson) {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You do not have permission to access this lesson",
        )));
    }
    Ok(lesson)
}

/// 班级与科目必须存在，否则 404
async fn ensure_class_and_subject(
    storage: &Arc<dyn Storage>,
    class_id: i64,
    subject_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_class_by_id(class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => return Err(internal_error(format!("Failed to get class: {e}"))),
    }

    match storage.get_subject_by_id(subject_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubjectNotFound,
            "Subject not found",
        ))),
        Err(e) => Err(internal_error(format!("Failed to get subject: {e}"))),
    }
}

/// 唯一性检查，`exclude_id` 为正在更新的日志
async fn guard_slot(
    storage: &Arc<dyn Storage>,
    slot: LessonSlot,
    exclude_id: Option<i64>,
) -> Result<(), HttpResponse> {
    match storage.find_lesson_by_slot(slot, exclude_id).await {
        Ok(None) => Ok(()),
        Ok(Some(existing)) => {
            tracing::debug!(
                "Lesson slot {:?} already taken by lesson {}",
                slot,
                existing.id
            );
            Err(lesson_conflict())
        }
        Err(e) => Err(internal_error(format!("Failed to check lesson slot: {e}"))),
    }
}

/// 非空的主题
pub(crate) fn normalize_topic(topic: &str) -> Option<String> {
    let topic = topic.trim();
    (!topic.is_empty()).then(|| topic.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};
    use chrono::{TimeZone, Utc};

    fn user(id: i64, role: UserRole) -> User {
        let now = Utc::now();
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@school.test"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            phone: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn lesson(teacher_id: i64) -> Lesson {
        let day = Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();
        Lesson {
            id: 1,
            teacher_id,
            class_id: 2,
            subject_id: 3,
            lesson_day: day,
            topic: "Fractions".into(),
            content: None,
            homework: None,
            created_at: day,
            updated_at: day,
        }
    }

    #[test]
    fn test_lesson_access() {
        let lesson = lesson(5);
        assert!(can_access(&user(5, UserRole::Teacher), &lesson));
        assert!(!can_access(&user(6, UserRole::Teacher), &lesson));
        assert!(can_access(&user(1, UserRole::Admin), &lesson));
    }

    #[test]
    fn test_lesson_slot_key() {
        let slot = lesson(5).slot();
        assert_eq!(slot.teacher_id, 5);
        assert_eq!(slot.lesson_day % 86_400, 0);
    }

    #[test]
    fn test_normalize_topic() {
        assert_eq!(normalize_topic("  Algebra "), Some("Algebra".to_string()));
        assert_eq!(normalize_topic("   "), None);
    }
}
