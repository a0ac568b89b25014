use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::lessons::requests::{
    CreateLessonRequest, LessonListParams, UpdateLessonRequest,
};
use crate::services::LessonService;
use crate::utils::SafeLessonIdI64;

static LESSON_SERVICE: Lazy<LessonService> = Lazy::new(LessonService::new_lazy);

pub async fn list_lessons(
    req: HttpRequest,
    query: web::Query<LessonListParams>,
) -> ActixResult<HttpResponse> {
    LESSON_SERVICE.list_lessons(&req, query.into_inner()).await
}

pub async fn create_lesson(
    req: HttpRequest,
    data: web::Json<CreateLessonRequest>,
) -> ActixResult<HttpResponse> {
    LESSON_SERVICE.create_lesson(&req, data.into_inner()).await
}

pub async fn get_lesson(req: HttpRequest, lesson_id: SafeLessonIdI64) -> ActixResult<HttpResponse> {
    LESSON_SERVICE.get_lesson(&req, lesson_id.0).await
}

pub async fn update_lesson(
    req: HttpRequest,
    lesson_id: SafeLessonIdI64,
    data: web::Json<UpdateLessonRequest>,
) -> ActixResult<HttpResponse> {
    LESSON_SERVICE
        .update_lesson(&req, lesson_id.0, data.into_inner())
        .await
}

pub async fn delete_lesson(
    req: HttpRequest,
    lesson_id: SafeLessonIdI64,
) -> ActixResult<HttpResponse> {
    LESSON_SERVICE.delete_lesson(&req, lesson_id.0).await
}

// 配置路由：所有权在服务层校验（教师本人或管理员）
pub fn configure_lesson_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/lessons")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_lessons))
                    .route(web::post().to(create_lesson)),
            )
            .service(
                web::resource("/{lesson_id}")
                    .route(web::get().to(get_lesson))
                    .route(web::put().to(update_lesson))
                    .route(web::delete().to(delete_lesson)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorCode;
    use crate::models::classes::requests::CreateClassRequest;
    use crate::models::subjects::requests::CreateSubjectRequest;
    use crate::models::users::entities::UserRole;
    use crate::routes::test_support::{TestContext, bearer, call_json, init_app};
    use actix_web::{http::StatusCode, test};
    use serde_json::json;

    #[actix_web::test]
    async fn test_second_lesson_on_same_day_conflicts() {
        let ctx = TestContext::new().await;
        let teacher = ctx.user("teacher01", UserRole::Teacher).await;
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
        let app = init_app!(ctx, configure_lesson_routes).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/lessons")
            .insert_header(bearer(&teacher))
            .set_json(json!({
                "class_id": class.id,
                "subject_id": subject.id,
                "lesson_date": "2024-01-01",
                "topic": "Levers",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        // 同一 UTC 日的另一时刻
        let req = test::TestRequest::post()
            .uri("/api/v1/lessons")
            .insert_header(bearer(&teacher))
            .set_json(json!({
                "class_id": class.id,
                "subject_id": subject.id,
                "lesson_date": "2024-01-01T14:30:00Z",
                "topic": "Pulleys",
            }))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], ErrorCode::LessonAlreadyExists as i32);

        let req = test::TestRequest::post()
            .uri("/api/v1/lessons")
            .insert_header(bearer(&teacher))
            .set_json(json!({
                "class_id": class.id,
                "subject_id": subject.id,
                "lesson_date": "2024-01-02",
                "topic": "Pulleys",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn test_lessons_require_session() {
        let ctx = TestContext::new().await;
        let app = init_app!(ctx, configure_lesson_routes).await;

        let req = test::TestRequest::get().uri("/api/v1/lessons").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
