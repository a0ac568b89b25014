use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{InquestService, inquest_not_found};
use crate::models::ApiResponse;
use crate::services::internal_error;

pub async fn delete_inquest(
    service: &InquestService,
    request: &HttpRequest,
    inquest_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_inquest(inquest_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Inquest deleted successfully",
        ))),
        Ok(false) => Ok(inquest_not_found()),
        Err(e) => Ok(internal_error(format!("Inquest deletion failed: {e}"))),
    }
}
