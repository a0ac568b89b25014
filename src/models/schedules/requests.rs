use crate::models::common::deserialize_optional_i64;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleItemInput {
    pub day_of_week: i32,
    pub period: i32,
    pub start_time: String,
    pub end_time: String,
    pub class_id: i64,
    pub subject_id: i64,
    pub teacher_id: Option<i64>,
    pub room: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateScheduleRequest {
    pub name: String,
    pub academic_year_id: Option<i64>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub items: Vec<ScheduleItemInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateScheduleRequest {
    pub name: Option<String>,
    pub academic_year_id: Option<i64>,
    /// 提供时整体替换
    pub items: Option<Vec<ScheduleItemInput>>,
}

// 按星期查询
#[derive(Debug, Clone, Deserialize)]
pub struct WeekdayQuery {
    pub day: Option<String>,
    pub date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub teacher_id: Option<i64>,
}
