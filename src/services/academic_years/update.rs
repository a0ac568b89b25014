use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicYearService;
use crate::models::academic_years::{
    entities::validate_date_range, requests::UpdateAcademicYearRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;

pub async fn update_academic_year(
    service: &AcademicYearService,
    request: &HttpRequest,
    id: i64,
    mut data: UpdateAcademicYearRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let existing = match storage.get_academic_year_by_id(id).await {
        Ok(Some(year)) => year,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AcademicYearNotFound,
                "Academic year not found",
            )));
        }
        Err(e) => return Ok(internal_error(format!("Failed to get academic year: {e}"))),
    };

    if let Some(name) = data.name.as_mut() {
        *name = name.trim().to_string();
        if name.is_empty() {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::AcademicYearInvalid,
                "name must not be empty",
            )));
        }
    }

    // 合并后再校验起止日期
    let start = data.start_date.unwrap_or(existing.start_date);
    let end = data.end_date.unwrap_or(existing.end_date);
    if let Err(msg) = validate_date_range(start, end) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AcademicYearInvalid, msg)));
    }

    match storage.update_academic_year(id, data).await {
        Ok(Some(year)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            year,
            "Academic year updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AcademicYearNotFound,
            "Academic year not found",
        ))),
        Err(e) if e.is_unique_violation() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::AcademicYearAlreadyExists,
                "Academic year name already exists",
            ),
        )),
        Err(e) => Ok(internal_error(format!(
            "Academic year update failed: {e}"
        ))),
    }
}
