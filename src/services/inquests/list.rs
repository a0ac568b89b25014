use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::InquestService;
use crate::models::ApiResponse;
use crate::models::inquests::requests::{InquestListParams, InquestListQuery};
use crate::services::{current_user, internal_error};

pub async fn list_inquests(
    service: &InquestService,
    request: &HttpRequest,
    query: InquestListParams,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    // 教师忽略 teacher_id 参数，只能看自己的
    let teacher_id = if user.is_admin() {
        query.teacher_id
    } else {
        Some(user.id)
    };

    let list_query = InquestListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        status: query.status,
        teacher_id,
    };

    let storage = service.get_storage(request);
    match storage.list_inquests_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Inquest list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(format!(
            "Failed to retrieve inquest list: {e}"
        ))),
    }
}
