use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::DashboardService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::dashboard::responses::{
    AdminDashboardSummary, DashboardSummary, TeacherDashboardSummary,
};
use crate::models::inquests::entities::InquestStatus;
use crate::models::users::entities::{User, UserRole};
use crate::services::schedules::weekday::{TeacherFilter, collect_weekday_entries};
use crate::services::{current_user, internal_error};
use crate::storage::Storage;
use crate::utils::date::{iso_weekday, utc_day_start, week_bounds};

async fn admin_summary(
    storage: &Arc<dyn Storage>,
    now: DateTime<Utc>,
) -> Result<AdminDashboardSummary> {
    let today = utc_day_start(now);
    Ok(AdminDashboardSummary {
        teacher_count: storage.count_users_by_role(UserRole::Teacher).await? as i64,
        class_count: storage.count_classes().await? as i64,
        subject_count: storage.count_subjects().await? as i64,
        lessons_today: storage.count_lessons(None, today, today).await? as i64,
        pending_inquests: storage
            .count_inquests(None, Some(InquestStatus::Pending))
            .await? as i64,
        announcement_count: storage.count_announcements().await? as i64,
    })
}

async fn teacher_summary(
    storage: &Arc<dyn Storage>,
    teacher: &User,
    now: DateTime<Utc>,
) -> Result<TeacherDashboardSummary> {
    let today = utc_day_start(now);
    let (week_start, week_end) = week_bounds(now);

    let filter = TeacherFilter {
        teacher_id: teacher.id,
        username: &teacher.username,
    };
    let (_, entries) =
        collect_weekday_entries(storage, iso_weekday(now.date_naive()), Some(filter)).await?;

    Ok(TeacherDashboardSummary {
        lessons_today: storage.count_lessons(Some(teacher.id), today, today).await? as i64,
        lessons_this_week: storage
            .count_lessons(Some(teacher.id), week_start, week_end)
            .await? as i64,
        unread_notifications: storage.count_unread_notifications(teacher.id).await? as i64,
        unread_announcements: storage.count_unread_announcements(teacher.id).await? as i64,
        open_inquests: storage
            .count_inquests(Some(teacher.id), Some(InquestStatus::Pending))
            .await? as i64,
        schedule_entries_today: entries.len() as i64,
    })
}

/// 按当前用户角色返回首页汇总
pub async fn get_summary(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let now = Utc::now();

    let summary = if user.is_admin() {
        admin_summary(&storage, now).await.map(DashboardSummary::Admin)
    } else {
        teacher_summary(&storage, &user, now)
            .await
            .map(DashboardSummary::Teacher)
    };

    match summary {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            summary,
            "Dashboard summary retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(format!(
            "Failed to build dashboard summary: {e}"
        ))),
    }
}
