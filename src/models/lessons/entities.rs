use serde::{Deserialize, Serialize};

// 教学日志
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    /// 授课日（UTC 零点）
    pub lesson_day: chrono::DateTime<chrono::Utc>,
    pub topic: String,
    pub content: Option<String>,
    pub homework: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Lesson {
    /// 唯一性判定用的键
    pub fn slot(&self) -> LessonSlot {
        LessonSlot {
            teacher_id: self.teacher_id,
            class_id: self.class_id,
            subject_id: self.subject_id,
            lesson_day: self.lesson_day.timestamp(),
        }
    }
}

/// (教师, 班级, 科目, UTC 日) 四元组，同一组合只允许一条日志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LessonSlot {
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub lesson_day: i64,
}
