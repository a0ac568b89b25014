use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ScheduleService, check_references, invalid_schedule, validate_items};
use crate::models::schedules::requests::UpdateScheduleRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;

pub async fn update_schedule(
    service: &ScheduleService,
    request: &HttpRequest,
    schedule_id: i64,
    mut data: UpdateScheduleRequest,
) -> ActixResult<HttpResponse> {
    if let Some(name) = data.name.as_mut() {
        *name = name.trim().to_string();
        if name.is_empty() {
            return Ok(invalid_schedule("Schedule name must not be empty".to_string()));
        }
    }
    if let Some(items) = data.items.as_mut()
        && let Err(msg) = validate_items(items)
    {
        return Ok(invalid_schedule(msg));
    }

    let storage = service.get_storage(request);
    let items = data.items.as_deref().unwrap_or_default();
    if let Err(resp) = check_references(&storage, data.academic_year_id, items).await {
        return Ok(resp);
    }

    // 条目整体替换在同一事务内完成
    match storage.update_schedule(schedule_id, data).await {
        Ok(Some(schedule)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            schedule,
            "Schedule updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ScheduleNotFound,
            "Schedule not found",
        ))),
        Err(e) => Ok(internal_error(format!("Schedule update failed: {e}"))),
    }
}

pub async fn activate_schedule(
    service: &ScheduleService,
    request: &HttpRequest,
    schedule_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.activate_schedule(schedule_id).await {
        Ok(Some(schedule)) => {
            tracing::info!("Schedule {} is now active", schedule.name);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                schedule,
                "Schedule activated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ScheduleNotFound,
            "Schedule not found",
        ))),
        Err(e) => Ok(internal_error(format!("Failed to activate schedule: {e}"))),
    }
}
