pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod transition;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::inquests::{
    entities::Inquest,
    requests::{CreateInquestRequest, InquestListParams, UpdateInquestStatusRequest},
};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;
use crate::storage::Storage;

pub struct InquestService {
    storage: Option<Arc<dyn Storage>>,
}

impl InquestService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn create_inquest(
        &self,
        request: &HttpRequest,
        data: CreateInquestRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_inquest(self, request, data).await
    }

    pub async fn list_inquests(
        &self,
        request: &HttpRequest,
        query: InquestListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_inquests(self, request, query).await
    }

    pub async fn get_inquest(
        &self,
        request: &HttpRequest,
        inquest_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_inquest(self, request, inquest_id).await
    }

    pub async fn transition_inquest(
        &self,
        request: &HttpRequest,
        inquest_id: i64,
        data: UpdateInquestStatusRequest,
    ) -> ActixResult<HttpResponse> {
        transition::transition_inquest(self, request, inquest_id, data).await
    }

    pub async fn delete_inquest(
        &self,
        request: &HttpRequest,
        inquest_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_inquest(self, request, inquest_id).await
    }
}

pub(crate) fn inquest_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::InquestNotFound,
        "Inquest not found",
    ))
}

/// 管理员可见全部，教师只能看到针对自己的问询
pub(crate) fn can_view(user: &User, inquest: &Inquest) -> bool {
    user.is_admin() || inquest.teacher_id == user.id
}

/// 读取当前用户可见的问询，不可见时同样返回 404
pub(crate) async fn load_visible_inquest(
    storage: &Arc<dyn Storage>,
    user: &User,
    inquest_id: i64,
) -> Result<Inquest, HttpResponse> {
    match storage.get_inquest_by_id(inquest_id).await {
        Ok(Some(inquest)) if can_view(user, &inquest) => Ok(inquest),
        Ok(_) => Err(inquest_not_found()),
        Err(e) => Err(internal_error(format!("Failed to get inquest: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inquests::entities::InquestStatus;
    use crate::models::users::entities::{UserRole, UserStatus};

    fn user(id: i64, role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@school.test"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            phone: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn inquest(teacher_id: i64) -> Inquest {
        let now = chrono::Utc::now();
        Inquest {
            id: 1,
            teacher_id,
            created_by: 1,
            subject: "Late grades".to_string(),
            description: "Grades were submitted late".to_string(),
            lesson_id: None,
            status: InquestStatus::Pending,
            response: None,
            responded_at: None,
            decision: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_visibility() {
        let record = inquest(7);
        assert!(can_view(&user(1, UserRole::Admin), &record));
        assert!(can_view(&user(7, UserRole::Teacher), &record));
        assert!(!can_view(&user(8, UserRole::Teacher), &record));
    }
}
