use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnnouncementService;
use crate::models::announcements::responses::UnreadAnnouncementCountResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, internal_error};

/// 标记已读；重复标记同样返回成功
pub async fn mark_read(
    service: &AnnouncementService,
    request: &HttpRequest,
    announcement_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let recipient = match storage
        .get_announcement_recipient(announcement_id, user.id)
        .await
    {
        Ok(Some(recipient)) => recipient,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AnnouncementNotFound,
                "Announcement not found",
            )));
        }
        Err(e) => return Ok(internal_error(format!("Failed to get recipient: {e}"))),
    };

    if !recipient.is_read
        && let Err(e) = storage.mark_announcement_read(announcement_id, user.id).await
    {
        return Ok(internal_error(format!(
            "Failed to mark announcement as read: {e}"
        )));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Announcement marked as read",
    )))
}

pub async fn unread_count(
    service: &AnnouncementService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.count_unread_announcements(user.id).await {
        Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UnreadAnnouncementCountResponse {
                unread_count: count as i64,
            },
            "Unread announcement count retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(format!(
            "Failed to count unread announcements: {e}"
        ))),
    }
}
