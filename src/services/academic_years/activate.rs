use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicYearService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;

pub async fn activate_academic_year(
    service: &AcademicYearService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.activate_academic_year(id).await {
        Ok(Some(year)) => {
            tracing::info!("Academic year {} is now current", year.name);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                year,
                "Academic year activated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AcademicYearNotFound,
            "Academic year not found",
        ))),
        Err(e) => Ok(internal_error(format!(
            "Failed to activate academic year: {e}"
        ))),
    }
}
