use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::academic_years::requests::{
    CreateAcademicYearRequest, UpdateAcademicYearRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AcademicYearService;
use crate::utils::SafeAcademicYearIdI64;

static ACADEMIC_YEAR_SERVICE: Lazy<AcademicYearService> =
    Lazy::new(AcademicYearService::new_lazy);

pub async fn list_academic_years(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE.list_academic_years(&req).await
}

pub async fn get_current_academic_year(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE.get_current_academic_year(&req).await
}

pub async fn create_academic_year(
    req: HttpRequest,
    data: web::Json<CreateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE
        .create_academic_year(&req, data.into_inner())
        .await
}

pub async fn get_academic_year(
    req: HttpRequest,
    id: SafeAcademicYearIdI64,
) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE.get_academic_year(&req, id.0).await
}

pub async fn update_academic_year(
    req: HttpRequest,
    id: SafeAcademicYearIdI64,
    data: web::Json<UpdateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE
        .update_academic_year(&req, id.0, data.into_inner())
        .await
}

pub async fn delete_academic_year(
    req: HttpRequest,
    id: SafeAcademicYearIdI64,
) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE.delete_academic_year(&req, id.0).await
}

pub async fn activate_academic_year(
    req: HttpRequest,
    id: SafeAcademicYearIdI64,
) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE.activate_academic_year(&req, id.0).await
}

// 配置路由；/current 必须先于 /{academic_year_id} 注册
pub fn configure_academic_year_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/academic-years")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_academic_years))
                    .route(
                        web::post()
                            .to(create_academic_year)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(web::resource("/current").route(web::get().to(get_current_academic_year)))
            .service(
                web::resource("/{academic_year_id}")
                    .route(web::get().to(get_academic_year))
                    .route(
                        web::put()
                            .to(update_academic_year)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_academic_year)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{academic_year_id}/activate").route(
                    web::post()
                        .to(activate_academic_year)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorCode;
    use crate::routes::test_support::{TestContext, bearer, call_json, init_app};
    use actix_web::{http::StatusCode, test};
    use chrono::NaiveDate;
    use serde_json::json;

    #[actix_web::test]
    async fn test_current_is_not_an_academic_year_id() {
        let ctx = TestContext::new().await;
        let teacher = ctx.user("teacher01", UserRole::Teacher).await;
        let app = init_app!(ctx, configure_academic_year_routes).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/academic-years/current")
            .insert_header(bearer(&teacher))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], ErrorCode::AcademicYearNotFound as i32);

        let year = ctx
            .storage()
            .create_academic_year(CreateAcademicYearRequest {
                name: "2024-2025".into(),
                start_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
                is_current: true,
            })
            .await
            .unwrap();

        let req = test::TestRequest::get()
            .uri("/api/v1/academic-years/current")
            .insert_header(bearer(&teacher))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], year.id);
    }

    #[actix_web::test]
    async fn test_teacher_cannot_create_academic_year() {
        let ctx = TestContext::new().await;
        let teacher = ctx.user("teacher01", UserRole::Teacher).await;
        let app = init_app!(ctx, configure_academic_year_routes).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/academic-years")
            .insert_header(bearer(&teacher))
            .set_json(json!({
                "name": "2025-2026",
                "start_date": "2025-09-01",
                "end_date": "2026-06-30",
            }))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], ErrorCode::Forbidden as i32);
    }
}
