pub mod academic_years;
pub mod announcements;
pub mod auth;
pub mod classes;
pub mod common;
pub mod dashboard;
pub mod files;
pub mod inquests;
pub mod lessons;
pub mod notifications;
pub mod schedules;
pub mod subjects;
pub mod system;
pub mod users;

use serde::Serialize;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 进程启动时间，用于健康检查中的运行时长
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
///
/// 0 表示成功；1xxx 通用错误；2xxx 认证；3xxx 用户；4xxx 教务资源；5xxx 文件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    AuthFailed = 2000,
    UserInactive = 2001,
    PasswordResetTokenInvalid = 2002,
    UserPasswordInvalid = 2003,

    UserNotFound = 3000,
    UserNameInvalid = 3001,
    UserEmailInvalid = 3002,
    UserAlreadyExists = 3003,
    UserCreationFailed = 3004,
    UserUpdateFailed = 3005,
    UserDeleteFailed = 3006,

    AcademicYearNotFound = 4000,
    AcademicYearAlreadyExists = 4001,
    AcademicYearInvalid = 4002,

    ClassNotFound = 4100,
    ClassAlreadyExists = 4101,

    SubjectNotFound = 4200,
    SubjectAlreadyExists = 4201,

    LessonNotFound = 4300,
    LessonAlreadyExists = 4301,
    LessonInvalid = 4302,

    ScheduleNotFound = 4400,
    ScheduleInvalid = 4401,
    FixedScheduleUnavailable = 4402,

    AnnouncementNotFound = 4500,
    AnnouncementRecipientsInvalid = 4501,

    NotificationNotFound = 4600,

    InquestNotFound = 4700,
    InquestTransitionInvalid = 4701,
    InquestPermissionDenied = 4702,

    FileNotFound = 5000,
    FileUploadFailed = 5001,
    FileTypeNotAllowed = 5002,
    FileSizeExceeded = 5003,
    MultifileUploadNotAllowed = 5004,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::Conflict as i32, 1009);
        assert_eq!(ErrorCode::LessonAlreadyExists as i32, 4301);
    }

    #[test]
    fn test_api_response_envelope() {
        let body = serde_json::to_value(ApiResponse::error_empty(
            ErrorCode::LessonAlreadyExists,
            "duplicate",
        ))
        .unwrap();
        assert_eq!(body["code"], 4301);
        assert_eq!(body["message"], "duplicate");
        assert!(body.get("data").is_none());
        assert!(body.get("timestamp").is_some());
    }
}
