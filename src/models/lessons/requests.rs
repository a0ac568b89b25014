use super::entities::LessonSlot;
use crate::models::common::{PaginationQuery, deserialize_optional_i64};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLessonRequest {
    pub class_id: i64,
    pub subject_id: i64,
    /// YYYY-MM-DD 或 RFC 3339，缺省为当天
    pub lesson_date: Option<String>,
    pub topic: String,
    pub content: Option<String>,
    pub homework: Option<String>,
    /// 仅管理员代录时使用
    pub teacher_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLessonRequest {
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub lesson_date: Option<String>,
    pub topic: Option<String>,
    pub content: Option<String>,
    pub homework: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LessonListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub teacher_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub subject_id: Option<i64>,
    pub from: Option<String>,
    pub to: Option<String>,
}

// 写入存储层的新日志
#[derive(Debug, Clone)]
pub struct NewLesson {
    pub slot: LessonSlot,
    pub topic: String,
    pub content: Option<String>,
    pub homework: Option<String>,
}

// 存储层更新，slot 为合并后的完整四元组
#[derive(Debug, Clone)]
pub struct LessonChanges {
    pub slot: LessonSlot,
    pub topic: Option<String>,
    pub content: Option<String>,
    pub homework: Option<String>,
}

// 存储层查询，from/to 为 UTC 日（含）
#[derive(Debug, Clone, Default)]
pub struct LessonListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub teacher_id: Option<i64>,
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub from: Option<i64>,
    pub to: Option<i64>,
}
