use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::schedules::requests::{
    CreateScheduleRequest, UpdateScheduleRequest, WeekdayQuery,
};
use crate::models::users::entities::UserRole;
use crate::services::ScheduleService;
use crate::utils::SafeScheduleIdI64;

static SCHEDULE_SERVICE: Lazy<ScheduleService> = Lazy::new(ScheduleService::new_lazy);

pub async fn list_schedules(req: HttpRequest) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.list_schedules(&req).await
}

pub async fn create_schedule(
    req: HttpRequest,
    data: web::Json<CreateScheduleRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.create_schedule(&req, data.into_inner()).await
}

pub async fn get_active_schedule(req: HttpRequest) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.get_active_schedule(&req).await
}

pub async fn get_fixed_schedule(req: HttpRequest) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.get_fixed_schedule(&req).await
}

pub async fn get_weekday_schedule(
    req: HttpRequest,
    query: web::Query<WeekdayQuery>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .get_weekday_schedule(&req, query.into_inner())
        .await
}

pub async fn get_schedule(
    req: HttpRequest,
    schedule_id: SafeScheduleIdI64,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.get_schedule(&req, schedule_id.0).await
}

pub async fn update_schedule(
    req: HttpRequest,
    schedule_id: SafeScheduleIdI64,
    data: web::Json<UpdateScheduleRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .update_schedule(&req, schedule_id.0, data.into_inner())
        .await
}

pub async fn delete_schedule(
    req: HttpRequest,
    schedule_id: SafeScheduleIdI64,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.delete_schedule(&req, schedule_id.0).await
}

pub async fn activate_schedule(
    req: HttpRequest,
    schedule_id: SafeScheduleIdI64,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.activate_schedule(&req, schedule_id.0).await
}

// 配置路由；固定路径需先于 /{schedule_id}
pub fn configure_schedule_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/schedules")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_schedules)).route(
                    web::post()
                        .to(create_schedule)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(web::resource("/active").route(web::get().to(get_active_schedule)))
            .service(web::resource("/fixed").route(web::get().to(get_fixed_schedule)))
            .service(web::resource("/weekday").route(web::get().to(get_weekday_schedule)))
            .service(
                web::resource("/{schedule_id}")
                    .route(web::get().to(get_schedule))
                    .route(
                        web::put()
                            .to(update_schedule)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_schedule)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{schedule_id}/activate").route(
                    web::post()
                        .to(activate_schedule)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorCode;
    use crate::models::classes::requests::CreateClassRequest;
    use crate::models::schedules::requests::ScheduleItemInput;
    use crate::models::subjects::requests::CreateSubjectRequest;
    use crate::routes::test_support::{TestContext, bearer, call_json, init_app};
    use actix_web::{http::StatusCode, test};
    use serde_json::Value;

    #[actix_web::test]
    async fn test_fixed_paths_are_not_schedule_ids() {
        let ctx = TestContext::new().await;
        let admin = ctx.user("admin01", UserRole::Admin).await;
        let teacher = ctx.user("teacher01", UserRole::Teacher).await;
        let app = init_app!(ctx, configure_schedule_routes).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/schedules/active")
            .insert_header(bearer(&admin))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], ErrorCode::ScheduleNotFound as i32);

        let class = ctx
            .storage()
            .create_class(CreateClassRequest {
                name: "8B".into(),
                grade_level: None,
                academic_year_id: None,
                description: None,
            })
            .await
            .unwrap();
        let subject = ctx
            .storage()
            .create_subject(CreateSubjectRequest {
                name: "Physics".into(),
                code: None,
                description: None,
            })
            .await
            .unwrap();
        let schedule = ctx
            .storage()
            .create_schedule(CreateScheduleRequest {
                name: "Autumn".into(),
                academic_year_id: None,
                is_active: true,
                items: vec![ScheduleItemInput {
                    day_of_week: 1,
                    period: 1,
                    start_time: "08:00".into(),
                    end_time: "08:45".into(),
                    class_id: class.id,
                    subject_id: subject.id,
                    teacher_id: Some(teacher.id),
                    room: None,
                }],
            })
            .await
            .unwrap();
        let schedule_id = schedule.schedule.id;

        let req = test::TestRequest::get()
            .uri("/api/v1/schedules/active")
            .insert_header(bearer(&admin))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], schedule_id);

        let req = test::TestRequest::get()
            .uri("/api/v1/schedules/weekday?day=1")
            .insert_header(bearer(&admin))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["day_of_week"], 1);
        assert_eq!(body["data"]["active_schedule_id"], schedule_id);
        let entries = body["data"]["entries"].as_array().unwrap();
        assert!(entries.iter().any(|e| e["class_name"] == "8B"));

        let req = test::TestRequest::get()
            .uri("/api/v1/schedules/fixed")
            .insert_header(bearer(&teacher))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(matches!(body["data"]["items"], Value::Array(_)));

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/schedules/{schedule_id}"))
            .insert_header(bearer(&teacher))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Autumn");
    }

    #[actix_web::test]
    async fn test_teacher_cannot_create_schedule() {
        let ctx = TestContext::new().await;
        let teacher = ctx.user("teacher01", UserRole::Teacher).await;
        let app = init_app!(ctx, configure_schedule_routes).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/schedules")
            .insert_header(bearer(&teacher))
            .set_json(serde_json::json!({ "name": "Mine" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
