use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicYearService;
use crate::models::academic_years::{
    entities::validate_date_range, requests::CreateAcademicYearRequest,
};
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_academic_year(
    service: &AcademicYearService,
    request: &HttpRequest,
    mut data: CreateAcademicYearRequest,
) -> ActixResult<HttpResponse> {
    data.name = data.name.trim().to_string();
    if data.name.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AcademicYearInvalid,
            "name is required",
        )));
    }
    if let Err(msg) = validate_date_range(data.start_date, data.end_date) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AcademicYearInvalid, msg)));
    }

    let storage = service.get_storage(request);
    match storage.create_academic_year(data).await {
        Ok(year) => {
            tracing::info!("Academic year {} created", year.name);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                year,
                "Academic year created successfully",
            )))
        }
        Err(e) if e.is_unique_violation() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::AcademicYearAlreadyExists,
                "Academic year name already exists",
            ),
        )),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Academic year creation failed: {e}"),
            )),
        ),
    }
}
