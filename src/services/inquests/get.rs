use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{InquestService, load_visible_inquest};
use crate::models::ApiResponse;
use crate::services::current_user;

pub async fn get_inquest(
    service: &InquestService,
    request: &HttpRequest,
    inquest_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match load_visible_inquest(&storage, &user, inquest_id).await {
        Ok(inquest) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            inquest,
            "Inquest retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}
