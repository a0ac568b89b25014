use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ScheduleService;
use crate::models::ApiResponse;
use crate::models::schedules::responses::ScheduleListResponse;
use crate::services::internal_error;

pub async fn list_schedules(
    service: &ScheduleService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_schedules().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ScheduleListResponse { items },
            "Schedules retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(format!("Failed to retrieve schedules: {e}"))),
    }
}
