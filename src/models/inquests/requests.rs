use super::entities::InquestStatus;
use crate::models::common::{PaginationQuery, deserialize_optional_i64};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInquestRequest {
    pub teacher_id: i64,
    pub subject: String,
    pub description: String,
    pub lesson_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInquestStatusRequest {
    pub status: InquestStatus,
    pub response: Option<String>,
    pub decision: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InquestListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<InquestStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub teacher_id: Option<i64>,
}

// 写入存储层
#[derive(Debug, Clone)]
pub struct NewInquest {
    pub teacher_id: i64,
    pub created_by: i64,
    pub subject: String,
    pub description: String,
    pub lesson_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct InquestListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<InquestStatus>,
    pub teacher_id: Option<i64>,
}
