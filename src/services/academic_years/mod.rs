pub mod activate;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::academic_years::requests::{
    CreateAcademicYearRequest, UpdateAcademicYearRequest,
};
use crate::storage::Storage;

pub struct AcademicYearService {
    storage: Option<Arc<dyn Storage>>,
}

impl AcademicYearService {
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

    pub async fn list_academic_years(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_academic_years(self, request).await
    }

    pub async fn get_current_academic_year(
        &self,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_current_academic_year(self, request).await
    }

    pub async fn get_academic_year(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_academic_year(self, request, id).await
    }

    pub async fn create_academic_year(
        &self,
        request: &HttpRequest,
        data: CreateAcademicYearRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_academic_year(self, request, data).await
    }

    pub async fn update_academic_year(
        &self,
        request: &HttpRequest,
        id: i64,
        data: UpdateAcademicYearRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_academic_year(self, request, id, data).await
    }

    pub async fn delete_academic_year(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_academic_year(self, request, id).await
    }

    // 设为当前学年
    pub async fn activate_academic_year(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        activate::activate_academic_year(self, request, id).await
    }
}
