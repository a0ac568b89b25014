pub mod date;
pub mod extractor;
pub mod file_magic;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod random_code;
pub mod sql;
pub mod validate;

pub use extractor::{
    SafeAcademicYearIdI64, SafeAnnouncementIdI64, SafeClassIdI64, SafeFileToken,
    SafeInquestIdI64, SafeLessonIdI64, SafeNotificationIdI64, SafeScheduleIdI64,
    SafeSubjectIdI64, SafeTeacherIdI64,
};
pub use file_magic::FileKind;
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::{escape_like_pattern, like_contains};
