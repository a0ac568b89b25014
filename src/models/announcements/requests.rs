use super::entities::AnnouncementType;
use crate::models::common::PaginationQuery;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub content: String,
    pub announcement_type: AnnouncementType,
    pub recipient_ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
pub struct AnnouncementListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(rename = "type")]
    pub announcement_type: Option<AnnouncementType>,
}

// 写入存储层
#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    pub announcement_type: AnnouncementType,
    pub created_by: i64,
}

#[derive(Debug, Clone, Default)]
pub struct AnnouncementListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub announcement_type: Option<AnnouncementType>,
    /// 设置时只返回该用户收到的公告
    pub recipient_id: Option<i64>,
}
