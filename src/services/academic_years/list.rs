use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicYearService;
use crate::models::ApiResponse;
use crate::models::academic_years::responses::AcademicYearListResponse;
use crate::services::internal_error;

pub async fn list_academic_years(
    service: &AcademicYearService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_academic_years().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AcademicYearListResponse { items },
            "Academic years retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(format!(
            "Failed to retrieve academic years: {e}"
        ))),
    }
}
