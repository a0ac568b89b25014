//! 按星期查询课表
//!
//! 启用课表的条目与固定课表合并：同一 (节次, 班级名称) 以启用课表为准，
//! 其余固定课表行保留；结果按节次、开始时间排序。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;

use super::ScheduleService;
use super::fixed::fixed_schedule;
use crate::errors::Result;
use crate::models::schedules::entities::{FixedScheduleRow, WeekdayEntry};
use crate::models::schedules::requests::WeekdayQuery;
use crate::models::schedules::responses::WeekdayScheduleResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, internal_error};
use crate::storage::Storage;
use crate::utils::date::{iso_weekday, parse_date, parse_weekday, weekday_name};

/// 只保留某位教师的课：启用课表按 teacher_id，固定课表按用户名
#[derive(Debug, Clone, Copy)]
pub struct TeacherFilter<'a> {
    pub teacher_id: i64,
    pub username: &'a str,
}

impl TeacherFilter<'_> {
    fn matches(&self, entry: &WeekdayEntry) -> bool {
        match entry.teacher_id {
            Some(id) => id == self.teacher_id,
            None => entry
                .teacher
                .as_deref()
                .is_some_and(|name| name.eq_ignore_ascii_case(self.username)),
        }
    }
}

/// 由 `day` / `date` 参数得出 ISO 星期；都未给出时取今天
pub fn resolve_weekday(
    day: Option<&str>,
    date: Option<&str>,
    today: NaiveDate,
) -> std::result::Result<(u32, Option<NaiveDate>), String> {
    let day = day.map(str::trim).filter(|d| !d.is_empty());
    let date = date.map(str::trim).filter(|d| !d.is_empty());

    if let Some(day) = day {
        return parse_weekday(day)
            .map(|d| (d, None))
            .ok_or_else(|| format!("Invalid day: {day}"));
    }
    if let Some(date) = date {
        let date = parse_date(date)?;
        return Ok((iso_weekday(date), Some(date)));
    }
    Ok((iso_weekday(today), Some(today)))
}

pub fn merge_weekday_entries(
    active: Vec<WeekdayEntry>,
    fixed: &[FixedScheduleRow],
    day_of_week: u32,
) -> Vec<WeekdayEntry> {
    let taken: HashSet<(i32, String)> = active
        .iter()
        .map(|e| (e.period, e.class_name.to_lowercase()))
        .collect();

    let mut entries = active;
    entries.extend(
        fixed
            .iter()
            .filter(|row| row.day_of_week == day_of_week)
            .filter(|row| !taken.contains(&(row.period, row.class.to_lowercase())))
            .map(WeekdayEntry::from_fixed),
    );
    entries.sort_by(|a, b| {
        a.period
            .cmp(&b.period)
            .then_with(|| a.start_time.cmp(&b.start_time))
    });
    entries
}

/// 两个来源合并后的某日课表，返回启用课表 ID
pub(crate) async fn collect_weekday_entries(
    storage: &Arc<dyn Storage>,
    day_of_week: u32,
    teacher: Option<TeacherFilter<'_>>,
) -> Result<(Option<i64>, Vec<WeekdayEntry>)> {
    let (active_schedule_id, active) = match storage.list_active_weekday_entries(day_of_week).await? {
        Some((schedule, entries)) => (Some(schedule.id), entries),
        None => (None, Vec::new()),
    };

    // 固定课表不可用时仍返回启用课表部分
    let fixed = fixed_schedule().unwrap_or_else(|e| {
        tracing::warn!("Fixed schedule unavailable for weekday lookup: {}", e);
        Default::default()
    });

    let mut entries = merge_weekday_entries(active, fixed, day_of_week);
    if let Some(filter) = teacher {
        entries.retain(|entry| filter.matches(entry));
    }
    Ok((active_schedule_id, entries))
}

pub async fn get_weekday_schedule(
    service: &ScheduleService,
    request: &HttpRequest,
    query: WeekdayQuery,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let today = chrono::Utc::now().date_naive();
    let (day_of_week, date) =
        match resolve_weekday(query.day.as_deref(), query.date.as_deref(), today) {
            Ok(resolved) => resolved,
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
            }
        };

    // 教师只看自己的课；管理员可以指定教师
    let filter_user = if user.is_teacher() {
        Some(user)
    } else if let Some(teacher_id) = query.teacher_id {
        match storage.get_user_by_id(teacher_id).await {
            Ok(Some(teacher)) if teacher.is_teacher() => Some(teacher),
            Ok(_) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::UserNotFound,
                    "Teacher not found",
                )));
            }
            Err(e) => return Ok(internal_error(format!("Failed to get teacher: {e}"))),
        }
    } else {
        None
    };
    let filter = filter_user.as_ref().map(|u| TeacherFilter {
        teacher_id: u.id,
        username: &u.username,
    });

    match collect_weekday_entries(&storage, day_of_week, filter).await {
        Ok((active_schedule_id, entries)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            WeekdayScheduleResponse {
                day_of_week,
                day_name: weekday_name(day_of_week).to_string(),
                date,
                active_schedule_id,
                entries,
            },
            "Weekday schedule retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(format!(
            "Failed to retrieve weekday schedule: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedules::entities::ScheduleSource;

    fn fixed_row(day: u32, period: i32, start: &str, class: &str, teacher: Option<&str>) -> FixedScheduleRow {
        FixedScheduleRow {
            day_of_week: day,
            period,
            start_time: start.to_string(),
            end_time: "23:59".to_string(),
            class: class.to_string(),
            subject: "Math".to_string(),
            teacher: teacher.map(str::to_string),
            room: None,
        }
    }

    fn active_entry(period: i32, start: &str, class: &str, teacher_id: i64) -> WeekdayEntry {
        WeekdayEntry {
            source: ScheduleSource::Active,
            day_of_week: 1,
            period,
            start_time: start.to_string(),
            end_time: "23:59".to_string(),
            class_id: Some(10),
            class_name: class.to_string(),
            subject_id: Some(20),
            subject_name: "Science".to_string(),
            teacher_id: Some(teacher_id),
            teacher: Some(format!("t{teacher_id}")),
            room: None,
        }
    }

    #[test]
    fn test_active_overrides_fixed_slot() {
        let fixed = vec![
            fixed_row(1, 1, "08:00", "7A", None),
            fixed_row(1, 2, "09:00", "7A", None),
            fixed_row(2, 1, "08:00", "7A", None),
        ];
        let active = vec![active_entry(1, "08:05", "7a", 3)];

        let merged = merge_weekday_entries(active, &fixed, 1);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].source, ScheduleSource::Active);
        assert_eq!(merged[0].start_time, "08:05");
        assert_eq!(merged[1].source, ScheduleSource::Fixed);
        assert_eq!(merged[1].period, 2);
    }

    #[test]
    fn test_fixed_only_without_active_schedule() {
        let fixed = vec![
            fixed_row(3, 2, "09:00", "7B", None),
            fixed_row(3, 1, "08:00", "7A", None),
        ];
        let merged = merge_weekday_entries(Vec::new(), &fixed, 3);
        assert_eq!(
            merged.iter().map(|e| e.period).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert!(merged.iter().all(|e| e.source == ScheduleSource::Fixed));
    }

    #[test]
    fn test_sorted_by_period_then_start() {
        let active = vec![
            active_entry(2, "10:00", "7A", 1),
            active_entry(1, "09:00", "7B", 1),
            active_entry(1, "08:00", "7C", 1),
        ];
        let merged = merge_weekday_entries(active, &[], 1);
        let order: Vec<_> = merged.iter().map(|e| e.class_name.as_str()).collect();
        assert_eq!(order, vec!["7C", "7B", "7A"]);
    }

    #[test]
    fn test_teacher_filter() {
        let filter = TeacherFilter {
            teacher_id: 3,
            username: "jdoe",
        };
        assert!(filter.matches(&active_entry(1, "08:00", "7A", 3)));
        assert!(!filter.matches(&active_entry(1, "08:00", "7A", 4)));

        let own = WeekdayEntry::from_fixed(&fixed_row(1, 1, "08:00", "7A", Some("JDoe")));
        let other = WeekdayEntry::from_fixed(&fixed_row(1, 1, "08:00", "7A", Some("asmith")));
        let nobody = WeekdayEntry::from_fixed(&fixed_row(1, 1, "08:00", "7A", None));
        assert!(filter.matches(&own));
        assert!(!filter.matches(&other));
        assert!(!filter.matches(&nobody));
    }

    #[test]
    fn test_resolve_weekday() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(); // 周三
        assert_eq!(resolve_weekday(Some("fri"), None, today), Ok((5, None)));
        assert_eq!(resolve_weekday(Some("7"), Some("2025-03-10"), today), Ok((7, None)));
        let monday = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(
            resolve_weekday(None, Some("2025-03-10"), today),
            Ok((1, Some(monday)))
        );
        assert_eq!(resolve_weekday(None, None, today), Ok((3, Some(today))));
        assert!(resolve_weekday(Some("someday"), None, today).is_err());
        assert!(resolve_weekday(None, Some("10/03/2025"), today).is_err());
    }
}
