use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnnouncementService;
use crate::models::ApiResponse;
use crate::models::announcements::requests::{AnnouncementListParams, AnnouncementListQuery};
use crate::services::{current_user, internal_error};

pub async fn list_announcements(
    service: &AnnouncementService,
    request: &HttpRequest,
    query: AnnouncementListParams,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    // 管理员看全部及已读统计，教师只看发给自己的
    let list_query = AnnouncementListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        announcement_type: query.announcement_type,
        recipient_id: (!user.is_admin()).then_some(user.id),
    };

    let storage = service.get_storage(request);
    match storage.list_announcements_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Announcement list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(format!(
            "Failed to retrieve announcement list: {e}"
        ))),
    }
}
