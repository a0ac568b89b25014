//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod academic_years;
pub mod announcement_recipients;
pub mod announcements;
pub mod classes;
pub mod files;
pub mod inquests;
pub mod lessons;
pub mod notifications;
pub mod password_reset_tokens;
pub mod schedule_items;
pub mod schedules;
pub mod subjects;
pub mod users;

use chrono::{DateTime, Utc};

/// 数据库中的 Unix 秒转换为 UTC 时间
pub(crate) fn from_unix(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default()
}
