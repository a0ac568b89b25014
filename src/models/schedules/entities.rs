use serde::{Deserialize, Serialize};

// 课表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: i64,
    pub name: String,
    pub academic_year_id: Option<i64>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 课表条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub id: i64,
    pub schedule_id: i64,
    /// ISO 星期，1 = 周一 … 7 = 周日
    pub day_of_week: i32,
    pub period: i32,
    pub start_time: String,
    pub end_time: String,
    pub class_id: i64,
    pub subject_id: i64,
    pub teacher_id: Option<i64>,
    pub room: Option<String>,
}

// 课表及其条目
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleDetail {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub items: Vec<ScheduleItem>,
}

/// 固定课表（CSV）中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixedScheduleRow {
    pub day_of_week: u32,
    pub period: i32,
    pub start_time: String,
    pub end_time: String,
    pub class: String,
    pub subject: String,
    pub teacher: Option<String>,
    pub room: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleSource {
    Active,
    Fixed,
}

/// 某个星期几的一节课，来自启用课表或固定课表
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayEntry {
    pub source: ScheduleSource,
    pub day_of_week: u32,
    pub period: i32,
    pub start_time: String,
    pub end_time: String,
    pub class_id: Option<i64>,
    pub class_name: String,
    pub subject_id: Option<i64>,
    pub subject_name: String,
    pub teacher_id: Option<i64>,
    /// 教师用户名
    pub teacher: Option<String>,
    pub room: Option<String>,
}

impl WeekdayEntry {
    pub fn from_fixed(row: &FixedScheduleRow) -> Self {
        Self {
            source: ScheduleSource::Fixed,
            day_of_week: row.day_of_week,
            period: row.period,
            start_time: row.start_time.clone(),
            end_time: row.end_time.clone(),
            class_id: None,
            class_name: row.class.clone(),
            subject_id: None,
            subject_name: row.subject.clone(),
            teacher_id: None,
            teacher: row.teacher.clone(),
            room: row.room.clone(),
        }
    }
}
