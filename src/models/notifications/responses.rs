use super::entities::Notification;
use crate::models::common::PaginatedResponse;
use serde::Serialize;

pub type NotificationListResponse = PaginatedResponse<Notification>;

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

#[derive(Debug, Serialize)]
pub struct LatestUnreadResponse {
    pub notification: Option<Notification>,
}

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub marked_count: i64,
}
