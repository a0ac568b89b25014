use super::entities::{FixedScheduleRow, Schedule, WeekdayEntry};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ScheduleListResponse {
    pub items: Vec<Schedule>,
}

#[derive(Debug, Serialize)]
pub struct FixedScheduleResponse {
    pub items: Vec<FixedScheduleRow>,
}

#[derive(Debug, Serialize)]
pub struct WeekdayScheduleResponse {
    pub day_of_week: u32,
    pub day_name: String,
    pub date: Option<chrono::NaiveDate>,
    /// 启用课表 ID，无启用课表时为空
    pub active_schedule_id: Option<i64>,
    pub entries: Vec<WeekdayEntry>,
}
