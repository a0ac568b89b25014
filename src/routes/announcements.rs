use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::announcements::requests::{AnnouncementListParams, CreateAnnouncementRequest};
use crate::models::users::entities::UserRole;
use crate::services::AnnouncementService;
use crate::utils::SafeAnnouncementIdI64;

static ANNOUNCEMENT_SERVICE: Lazy<AnnouncementService> =
    Lazy::new(AnnouncementService::new_lazy);

pub async fn list_announcements(
    req: HttpRequest,
    query: web::Query<AnnouncementListParams>,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .list_announcements(&req, query.into_inner())
        .await
}

pub async fn create_announcement(
    req: HttpRequest,
    data: web::Json<CreateAnnouncementRequest>,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .create_announcement(&req, data.into_inner())
        .await
}

pub async fn unread_count(req: HttpRequest) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE.unread_count(&req).await
}

pub async fn get_announcement(
    req: HttpRequest,
    announcement_id: SafeAnnouncementIdI64,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .get_announcement(&req, announcement_id.0)
        .await
}

pub async fn mark_read(
    req: HttpRequest,
    announcement_id: SafeAnnouncementIdI64,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE.mark_read(&req, announcement_id.0).await
}

pub async fn delete_announcement(
    req: HttpRequest,
    announcement_id: SafeAnnouncementIdI64,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .delete_announcement(&req, announcement_id.0)
        .await
}

pub fn configure_announcement_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/announcements")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_announcements))
                    .route(
                        web::post()
                            .to(create_announcement)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(web::resource("/unread-count").route(web::get().to(unread_count)))
            .service(
                web::resource("/{announcement_id}")
                    .route(web::get().to(get_announcement))
                    .route(
                        web::delete()
                            .to(delete_announcement)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{announcement_id}/read").route(
                    web::post()
                        .to(mark_read)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
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
    use serde_json::json;

    #[actix_web::test]
    async fn test_targeted_announcement_needs_teacher_recipients() {
        let ctx = TestContext::new().await;
        let admin = ctx.user("admin01", UserRole::Admin).await;
        let teacher = ctx.user("teacher01", UserRole::Teacher).await;
        let app = init_app!(ctx, configure_announcement_routes).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/announcements")
            .insert_header(bearer(&admin))
            .set_json(json!({
                "title": "Staff meeting",
                "content": "Room 101 at 15:00",
                "announcement_type": "TARGETED",
                "recipient_ids": [],
            }))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], ErrorCode::AnnouncementRecipientsInvalid as i32);

        let req = test::TestRequest::post()
            .uri("/api/v1/announcements")
            .insert_header(bearer(&admin))
            .set_json(json!({
                "title": "Staff meeting",
                "content": "Room 101 at 15:00",
                "announcement_type": "TARGETED",
                "recipient_ids": [admin.id],
            }))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], ErrorCode::AnnouncementRecipientsInvalid as i32);

        let req = test::TestRequest::post()
            .uri("/api/v1/announcements")
            .insert_header(bearer(&admin))
            .set_json(json!({
                "title": "Staff meeting",
                "content": "Room 101 at 15:00",
                "announcement_type": "TARGETED",
                "recipient_ids": [teacher.id],
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn test_general_announcement_reaches_teachers() {
        let ctx = TestContext::new().await;
        let admin = ctx.user("admin01", UserRole::Admin).await;
        let teacher = ctx.user("teacher01", UserRole::Teacher).await;
        let app = init_app!(ctx, configure_announcement_routes).await;

        let announcement = json!({
            "title": "Holiday",
            "content": "School closed on Friday",
            "announcement_type": "GENERAL",
        });

        let req = test::TestRequest::post()
            .uri("/api/v1/announcements")
            .insert_header(bearer(&teacher))
            .set_json(&announcement)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/api/v1/announcements")
            .insert_header(bearer(&admin))
            .set_json(&announcement)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        // `/unread-count` 不能被 `/{announcement_id}` 吃掉
        let req = test::TestRequest::get()
            .uri("/api/v1/announcements/unread-count")
            .insert_header(bearer(&teacher))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["unread_count"], 1);
    }
}
