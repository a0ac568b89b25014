use super::entities::{AnnouncementRecipient, AnnouncementView};
use crate::models::common::PaginatedResponse;
use serde::Serialize;

pub type AnnouncementListResponse = PaginatedResponse<AnnouncementView>;

#[derive(Debug, Serialize)]
pub struct AnnouncementDetailResponse {
    pub announcement: AnnouncementView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipients: Option<Vec<AnnouncementRecipient>>,
}

#[derive(Debug, Serialize)]
pub struct UnreadAnnouncementCountResponse {
    pub unread_count: i64,
}
