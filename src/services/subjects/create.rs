use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubjectService;
use crate::models::subjects::requests::CreateSubjectRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;

pub async fn create_subject(
    service: &SubjectService,
    request: &HttpRequest,
    mut data: CreateSubjectRequest,
) -> ActixResult<HttpResponse> {
    data.name = data.name.trim().to_string();
    if data.name.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Subject name is required",
        )));
    }
    data.code = data
        .code
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let storage = service.get_storage(request);
    match storage.create_subject(data).await {
        Ok(subject) => {
            tracing::info!("Subject {} created", subject.name);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                subject,
                "Subject created successfully",
            )))
        }
        Err(e) if e.is_unique_violation() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::SubjectAlreadyExists,
                "Subject name already exists",
            ),
        )),
        Err(e) => Ok(internal_error(format!("Subject creation failed: {e}"))),
    }
}
