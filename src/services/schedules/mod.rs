pub mod create;
pub mod delete;
pub mod fixed;
pub mod get;
pub mod list;
pub mod update;
pub mod weekday;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::models::schedules::requests::{
    CreateScheduleRequest, ScheduleItemInput, UpdateScheduleRequest, WeekdayQuery,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;
use crate::storage::Storage;
use crate::utils::validate::parse_clock_time;

pub struct ScheduleService {
    storage: Option<Arc<dyn Storage>>,
}

impl ScheduleService {
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

    pub async fn list_schedules(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_schedules(self, request).await
    }

    pub async fn create_schedule(
        &self,
        request: &HttpRequest,
        data: CreateScheduleRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_schedule(self, request, data).await
    }

    pub async fn get_schedule(
        &self,
        request: &HttpRequest,
        schedule_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_schedule(self, request, schedule_id).await
    }

    pub async fn get_active_schedule(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_active_schedule(self, request).await
    }

    pub async fn update_schedule(
        &self,
        request: &HttpRequest,
        schedule_id: i64,
        data: UpdateScheduleRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_schedule(self, request, schedule_id, data).await
    }

    pub async fn activate_schedule(
        &self,
        request: &HttpRequest,
        schedule_id: i64,
    ) -> ActixResult<HttpResponse> {
        update::activate_schedule(self, request, schedule_id).await
    }

    pub async fn delete_schedule(
        &self,
        request: &HttpRequest,
        schedule_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_schedule(self, request, schedule_id).await
    }

    pub async fn get_fixed_schedule(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        fixed::get_fixed_schedule(request).await
    }

    pub async fn get_weekday_schedule(
        &self,
        request: &HttpRequest,
        query: WeekdayQuery,
    ) -> ActixResult<HttpResponse> {
        weekday::get_weekday_schedule(self, request, query).await
    }
}

/// 校验课表条目并把时刻规整为 `HH:MM`
pub fn validate_items(items: &mut [ScheduleItemInput]) -> Result<(), String> {
    for (i, item) in items.iter_mut().enumerate() {
        if !(1..=7).contains(&item.day_of_week) {
            return Err(format!("items[{i}]: day_of_week must be between 1 and 7"));
        }
        if item.period < 1 {
            return Err(format!("items[{i}]: period must be at least 1"));
        }
        let (Some(start), Some(end)) = (
            parse_clock_time(item.start_time.trim()),
            parse_clock_time(item.end_time.trim()),
        ) else {
            return Err(format!("items[{i}]: times must use HH:MM"));
        };
        if start >= end {
            return Err(format!("items[{i}]: start_time must be before end_time"));
        }
        item.start_time = start.format("%H:%M").to_string();
        item.end_time = end.format("%H:%M").to_string();
        item.room = item
            .room
            .take()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
    }
    Ok(())
}

fn invalid_schedule(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::ScheduleInvalid, message))
}

/// 条目引用的班级、科目、教师以及课表所属学年都必须存在
async fn check_references(
    storage: &Arc<dyn Storage>,
    academic_year_id: Option<i64>,
    items: &[ScheduleItemInput],
) -> Result<(), HttpResponse> {
    if let Some(id) = academic_year_id {
        match storage.get_academic_year_by_id(id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(invalid_schedule(format!("Unknown academic year {id}"))),
            Err(e) => return Err(internal_error(format!("Failed to get academic year: {e}"))),
        }
    }

    let class_ids: BTreeSet<i64> = items.iter().map(|i| i.class_id).collect();
    for id in class_ids {
        match storage.get_class_by_id(id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(invalid_schedule(format!("Unknown class {id}"))),
            Err(e) => return Err(internal_error(format!("Failed to get class: {e}"))),
        }
    }

    let subject_ids: BTreeSet<i64> = items.iter().map(|i| i.subject_id).collect();
    for id in subject_ids {
        match storage.get_subject_by_id(id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(invalid_schedule(format!("Unknown subject {id}"))),
            Err(e) => return Err(internal_error(format!("Failed to get subject: {e}"))),
        }
    }

    let teacher_ids: BTreeSet<i64> = items.iter().filter_map(|i| i.teacher_id).collect();
    for id in teacher_ids {
        match storage.get_user_by_id(id).await {
            Ok(Some(user)) if user.is_teacher() => {}
            Ok(_) => return Err(invalid_schedule(format!("Unknown teacher {id}"))),
            Err(e) => return Err(internal_error(format!("Failed to get teacher: {e}"))),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(day: i32, period: i32, start: &str, end: &str) -> ScheduleItemInput {
        ScheduleItemInput {
            day_of_week: day,
            period,
            start_time: start.to_string(),
            end_time: end.to_string(),
            class_id: 1,
            subject_id: 1,
            teacher_id: None,
            room: Some("  ".to_string()),
        }
    }

    #[test]
    fn test_valid_items_normalized() {
        let mut items = vec![item(1, 1, " 08:00", "08:45 ")];
        assert!(validate_items(&mut items).is_ok());
        assert_eq!(items[0].start_time, "08:00");
        assert_eq!(items[0].end_time, "08:45");
        assert_eq!(items[0].room, None);
    }

    #[test]
    fn test_invalid_items() {
        assert!(validate_items(&mut [item(0, 1, "08:00", "08:45")]).is_err());
        assert!(validate_items(&mut [item(8, 1, "08:00", "08:45")]).is_err());
        assert!(validate_items(&mut [item(1, 0, "08:00", "08:45")]).is_err());
        assert!(validate_items(&mut [item(1, 1, "8am", "08:45")]).is_err());
        assert!(validate_items(&mut [item(1, 1, "09:00", "08:45")]).is_err());

        let err = validate_items(&mut [item(1, 1, "08:00", "08:45"), item(2, 1, "10:00", "10:00")])
            .unwrap_err();
        assert!(err.starts_with("items[1]"));
    }
}
