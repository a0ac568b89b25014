use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ScheduleService, check_references, invalid_schedule, validate_items};
use crate::models::ApiResponse;
use crate::models::schedules::requests::CreateScheduleRequest;
use crate::services::internal_error;

pub async fn create_schedule(
    service: &ScheduleService,
    request: &HttpRequest,
    mut data: CreateScheduleRequest,
) -> ActixResult<HttpResponse> {
    data.name = data.name.trim().to_string();
    if data.name.is_empty() {
        return Ok(invalid_schedule("Schedule name is required".to_string()));
    }
    if let Err(msg) = validate_items(&mut data.items) {
        return Ok(invalid_schedule(msg));
    }

    let storage = service.get_storage(request);
    if let Err(resp) = check_references(&storage, data.academic_year_id, &data.items).await {
        return Ok(resp);
    }

    match storage.create_schedule(data).await {
        Ok(schedule) => {
            tracing::info!(
                "Schedule {} created with {} items",
                schedule.schedule.name,
                schedule.items.len()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                schedule,
                "Schedule created successfully",
            )))
        }
        Err(e) => Ok(internal_error(format!("Schedule creation failed: {e}"))),
    }
}
