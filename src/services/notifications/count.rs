use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::models::ApiResponse;
use crate::models::notifications::responses::{LatestUnreadResponse, UnreadCountResponse};
use crate::services::{current_user, internal_error};

pub async fn get_unread_count(
    service: &NotificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.count_unread_notifications(user.id).await {
        Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UnreadCountResponse {
                unread_count: count as i64,
            },
            "Unread notification count retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(format!(
            "Failed to count unread notifications: {e}"
        ))),
    }
}

/// 最新一条未读通知，没有时 `notification` 为 null
pub async fn get_latest_unread(
    service: &NotificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.get_latest_unread_notification(user.id).await {
        Ok(notification) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            LatestUnreadResponse { notification },
            "Latest unread notification retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(format!(
            "Failed to get latest unread notification: {e}"
        ))),
    }
}
