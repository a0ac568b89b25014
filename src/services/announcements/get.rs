use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnnouncementService;
use crate::models::announcements::{
    entities::AnnouncementView, responses::AnnouncementDetailResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, internal_error};

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::AnnouncementNotFound,
        "Announcement not found",
    ))
}

pub async fn get_announcement(
    service: &AnnouncementService,
    request: &HttpRequest,
    announcement_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let announcement = match storage.get_announcement_by_id(announcement_id).await {
        Ok(Some(announcement)) => announcement,
        Ok(None) => return Ok(not_found()),
        Err(e) => return Ok(internal_error(format!("Failed to get announcement: {e}"))),
    };

    let detail = if user.is_admin() {
        let recipients = match storage.list_announcement_recipients(announcement_id).await {
            Ok(recipients) => recipients,
            Err(e) => {
                return Ok(internal_error(format!(
                    "Failed to list announcement recipients: {e}"
                )));
            }
        };
        let read_count = recipients.iter().filter(|r| r.is_read).count() as i64;
        AnnouncementDetailResponse {
            announcement: AnnouncementView {
                announcement,
                recipient_count: Some(recipients.len() as i64),
                read_count: Some(read_count),
                is_read: None,
                read_at: None,
            },
            recipients: Some(recipients),
        }
    } else {
        // 不在接收人之列的教师视为不存在
        let recipient = match storage
            .get_announcement_recipient(announcement_id, user.id)
            .await
        {
            Ok(Some(recipient)) => recipient,
            Ok(None) => return Ok(not_found()),
            Err(e) => return Ok(internal_error(format!("Failed to get recipient: {e}"))),
        };
        AnnouncementDetailResponse {
            announcement: AnnouncementView {
                announcement,
                recipient_count: None,
                read_count: None,
                is_read: Some(recipient.is_read),
                read_at: recipient.read_at,
            },
            recipients: None,
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        detail,
        "Announcement retrieved successfully",
    )))
}
