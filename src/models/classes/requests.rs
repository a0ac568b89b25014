use crate::models::common::{PaginationQuery, deserialize_optional_i64};
use serde::Deserialize;

// 班级列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct ClassListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub academic_year_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassRequest {
    pub name: String,
    pub grade_level: Option<String>,
    pub academic_year_id: Option<i64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub grade_level: Option<String>,
    pub academic_year_id: Option<i64>,
    pub description: Option<String>,
}

// 班级列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ClassListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub academic_year_id: Option<i64>,
}
