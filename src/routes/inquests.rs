use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::inquests::requests::{
    CreateInquestRequest, InquestListParams, UpdateInquestStatusRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::InquestService;
use crate::utils::SafeInquestIdI64;

static INQUEST_SERVICE: Lazy<InquestService> = Lazy::new(InquestService::new_lazy);

pub async fn list_inquests(
    req: HttpRequest,
    query: web::Query<InquestListParams>,
) -> ActixResult<HttpResponse> {
    INQUEST_SERVICE.list_inquests(&req, query.into_inner()).await
}

pub async fn create_inquest(
    req: HttpRequest,
    data: web::Json<CreateInquestRequest>,
) -> ActixResult<HttpResponse> {
    INQUEST_SERVICE.create_inquest(&req, data.into_inner()).await
}

pub async fn get_inquest(
    req: HttpRequest,
    inquest_id: SafeInquestIdI64,
) -> ActixResult<HttpResponse> {
    INQUEST_SERVICE.get_inquest(&req, inquest_id.0).await
}

pub async fn transition_inquest(
    req: HttpRequest,
    inquest_id: SafeInquestIdI64,
    data: web::Json<UpdateInquestStatusRequest>,
) -> ActixResult<HttpResponse> {
    INQUEST_SERVICE
        .transition_inquest(&req, inquest_id.0, data.into_inner())
        .await
}

pub async fn delete_inquest(
    req: HttpRequest,
    inquest_id: SafeInquestIdI64,
) -> ActixResult<HttpResponse> {
    INQUEST_SERVICE.delete_inquest(&req, inquest_id.0).await
}

// 配置路由：状态迁移的角色规则由状态机判断
pub fn configure_inquest_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/inquests")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_inquests)).route(
                    web::post()
                        .to(create_inquest)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{inquest_id}")
                    .route(web::get().to(get_inquest))
                    .route(web::patch().to(transition_inquest))
                    .route(
                        web::delete()
                            .to(delete_inquest)
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
    use serde_json::json;

    #[actix_web::test]
    async fn test_inquest_lifecycle_over_http() {
        let ctx = TestContext::new().await;
        let admin = ctx.user("admin01", UserRole::Admin).await;
        let owner = ctx.user("teacher01", UserRole::Teacher).await;
        let other = ctx.user("teacher02", UserRole::Teacher).await;
        let app = init_app!(ctx, configure_inquest_routes).await;

        let create = json!({
            "teacher_id": owner.id,
            "subject": "Missing lesson log",
            "description": "No log for Monday",
        });

        // 教师不能发起问询
        let req = test::TestRequest::post()
            .uri("/api/v1/inquests")
            .insert_header(bearer(&owner))
            .set_json(&create)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/api/v1/inquests")
            .insert_header(bearer(&admin))
            .set_json(&create)
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["data"]["id"].as_i64().unwrap();
        let uri = format!("/api/v1/inquests/{id}");

        // 回复只能由被问询的教师提交
        let req = test::TestRequest::patch()
            .uri(&uri)
            .insert_header(bearer(&admin))
            .set_json(json!({ "status": "RESPONDED", "response": "Admin answer" }))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], ErrorCode::InquestPermissionDenied as i32);

        // 不能跳过回复直接结案
        let req = test::TestRequest::patch()
            .uri(&uri)
            .insert_header(bearer(&owner))
            .set_json(json!({ "status": "COMPLETED", "decision": "Closed" }))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], ErrorCode::InquestTransitionInvalid as i32);

        // 其他教师看不到该问询
        let req = test::TestRequest::patch()
            .uri(&uri)
            .insert_header(bearer(&other))
            .set_json(json!({ "status": "RESPONDED", "response": "Not mine" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::patch()
            .uri(&uri)
            .insert_header(bearer(&owner))
            .set_json(json!({ "status": "RESPONDED", "response": "I was ill" }))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "RESPONDED");

        // 教师不能自己结案
        let req = test::TestRequest::patch()
            .uri(&uri)
            .insert_header(bearer(&owner))
            .set_json(json!({ "status": "COMPLETED", "decision": "Closed" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::patch()
            .uri(&uri)
            .insert_header(bearer(&admin))
            .set_json(json!({ "status": "COMPLETED", "decision": "Excused" }))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "COMPLETED");
    }
}
