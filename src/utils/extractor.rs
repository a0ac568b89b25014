//! 路径参数提取器
//!
//! 非法的路径 ID 直接以 400 信封响应，不进入处理程序。

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError, http::StatusCode,
};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn path_error(message: String) -> actix_web::Error {
    let response = HttpResponse::BadRequest()
        .json(ApiResponse::<()>::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

/// 解析正整数 ID
pub fn parse_positive_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

/// 定义一个从指定路径参数读取正整数 ID 的提取器
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                futures_util::future::ready($crate::utils::extractor::extract_i64_param(
                    req, $param,
                )
                .map($name))
            }
        }
    };
}

#[doc(hidden)]
pub fn extract_i64_param(req: &HttpRequest, param: &str) -> Result<i64, actix_web::Error> {
    let raw = req
        .match_info()
        .get(param)
        .ok_or_else(|| path_error(format!("Missing path parameter: {param}")))?;
    parse_positive_id(raw).ok_or_else(|| path_error(format!("Invalid {param}: {raw}")))
}

define_safe_i64_extractor!(SafeTeacherIdI64, "teacher_id");
define_safe_i64_extractor!(SafeAcademicYearIdI64, "academic_year_id");
define_safe_i64_extractor!(SafeClassIdI64, "class_id");
define_safe_i64_extractor!(SafeSubjectIdI64, "subject_id");
define_safe_i64_extractor!(SafeLessonIdI64, "lesson_id");
define_safe_i64_extractor!(SafeScheduleIdI64, "schedule_id");
define_safe_i64_extractor!(SafeAnnouncementIdI64, "announcement_id");
define_safe_i64_extractor!(SafeNotificationIdI64, "notification_id");
define_safe_i64_extractor!(SafeInquestIdI64, "inquest_id");

/// 文件下载令牌，只允许字母数字
#[derive(Debug, Clone)]
pub struct SafeFileToken(pub String);

impl FromRequest for SafeFileToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.match_info().get("token") {
            Some(token)
                if !token.is_empty()
                    && token.len() <= 64
                    && token.chars().all(|c| c.is_ascii_alphanumeric()) =>
            {
                Ok(SafeFileToken(token.to_string()))
            }
            _ => {
                let response = HttpResponse::build(StatusCode::BAD_REQUEST).json(
                    ApiResponse::<()>::error_empty(ErrorCode::BadRequest, "Invalid file token"),
                );
                Err(InternalError::from_response("Invalid file token", response).into())
            }
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id("42"), Some(42));
        assert_eq!(parse_positive_id("0"), None);
        assert_eq!(parse_positive_id("-3"), None);
        assert_eq!(parse_positive_id("abc"), None);
        assert_eq!(parse_positive_id("99999999999999999999"), None);
    }

    #[actix_web::test]
    async fn test_class_id_extractor() {
        let req = TestRequest::default()
            .param("class_id", "12")
            .to_http_request();
        let id = SafeClassIdI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 12);

        let bad = TestRequest::default()
            .param("class_id", "twelve")
            .to_http_request();
        let err = SafeClassIdI64::extract(&bad).await.unwrap_err();
        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[actix_web::test]
    async fn test_file_token_extractor() {
        let ok = TestRequest::default()
            .param("token", "a1b2c3")
            .to_http_request();
        assert_eq!(SafeFileToken::extract(&ok).await.unwrap().0, "a1b2c3");

        let traversal = TestRequest::default()
            .param("token", "../etc")
            .to_http_request();
        assert!(SafeFileToken::extract(&traversal).await.is_err());
    }
}
