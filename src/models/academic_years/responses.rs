use super::entities::AcademicYear;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AcademicYearListResponse {
    pub items: Vec<AcademicYear>,
}
