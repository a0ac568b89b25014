use super::entities::Inquest;
use crate::models::common::PaginatedResponse;

pub type InquestListResponse = PaginatedResponse<Inquest>;
