use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AdminDashboardSummary {
    pub teacher_count: i64,
    pub class_count: i64,
    pub subject_count: i64,
    pub lessons_today: i64,
    pub pending_inquests: i64,
    pub announcement_count: i64,
}

#[derive(Debug, Serialize)]
pub struct TeacherDashboardSummary {
    pub lessons_today: i64,
    pub lessons_this_week: i64,
    pub unread_notifications: i64,
    pub unread_announcements: i64,
    pub open_inquests: i64,
    pub schedule_entries_today: i64,
}

// 按角色返回不同的汇总
#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashboardSummary {
    Admin(AdminDashboardSummary),
    Teacher(TeacherDashboardSummary),
}
