use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use chrono::{DateTime, Utc};

use super::SystemService;
use crate::models::{ApiResponse, AppStartTime, system::responses::HealthResponse};

fn uptime_seconds(started: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - started).num_seconds().max(0)
}

/// 公开的健康检查
pub async fn health(_service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let now = Utc::now();
    let started = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|start| start.start_datetime)
        .unwrap_or(now);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: uptime_seconds(started, now),
        },
        "Service is healthy",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_uptime_never_negative() {
        let now = Utc::now();
        assert_eq!(uptime_seconds(now - chrono::Duration::seconds(90), now), 90);
        assert_eq!(uptime_seconds(now + chrono::Duration::seconds(5), now), 0);
    }

    #[actix_web::test]
    async fn test_health_reports_version() {
        let started = Utc::now() - chrono::Duration::seconds(30);
        let request = TestRequest::default()
            .app_data(web::Data::new(AppStartTime {
                start_datetime: started,
            }))
            .to_http_request();

        let response = health(&SystemService::new_lazy(), &request).await.unwrap();
        assert!(response.status().is_success());
    }
}
