use super::entities::Lesson;
use crate::models::common::PaginatedResponse;
use serde::Serialize;

pub type LessonListResponse = PaginatedResponse<Lesson>;

#[derive(Debug, Serialize)]
pub struct LessonResponse {
    pub lesson: Lesson,
}
