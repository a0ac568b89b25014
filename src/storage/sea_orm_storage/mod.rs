//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod academic_years;
mod announcements;
mod classes;
mod files;
mod inquests;
mod lessons;
mod notifications;
mod password_reset;
mod schedules;
mod subjects;
mod users;

use crate::config::AppConfig;
use crate::errors::{SchoolError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SchoolError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    academic_years::{
        entities::AcademicYear,
        requests::{CreateAcademicYearRequest, UpdateAcademicYearRequest},
    },
    announcements::{
        entities::{Announcement, AnnouncementRecipient},
        requests::{AnnouncementListQuery, NewAnnouncement},
        responses::AnnouncementListResponse,
    },
    auth::entities::PasswordResetToken,
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
    files::entities::File,
    inquests::{
        entities::{Inquest, InquestStatus, InquestTransition},
        requests::{InquestListQuery, NewInquest},
        responses::InquestListResponse,
    },
    lessons::{
        entities::{Lesson, LessonSlot},
        requests::{LessonChanges, LessonListQuery, NewLesson},
        responses::LessonListResponse,
    },
    notifications::{
        entities::Notification,
        requests::{NewNotification, NotificationListQuery},
        responses::NotificationListResponse,
    },
    schedules::{
        entities::{Schedule, ScheduleDetail, WeekdayEntry},
        requests::{CreateScheduleRequest, UpdateScheduleRequest},
    },
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
        responses::SubjectListResponse,
    },
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn count_users_by_role(&self, role: UserRole) -> Result<u64> {
        self.count_users_by_role_impl(role).await
    }

    async fn list_user_ids_by_role(&self, role: UserRole) -> Result<Vec<i64>> {
        self.list_user_ids_by_role_impl(role).await
    }

    // 找回密码
    async fn create_password_reset_token(
        &self,
        user_id: i64,
        token: &str,
        expires_at: i64,
    ) -> Result<PasswordResetToken> {
        self.create_password_reset_token_impl(user_id, token, expires_at)
            .await
    }

    async fn get_password_reset_token(&self, token: &str) -> Result<Option<PasswordResetToken>> {
        self.get_password_reset_token_impl(token).await
    }

    async fn consume_password_reset_token(
        &self,
        token_id: i64,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool> {
        self.consume_password_reset_token_impl(token_id, user_id, password_hash)
            .await
    }

    // 学年模块
    async fn create_academic_year(&self, req: CreateAcademicYearRequest) -> Result<AcademicYear> {
        self.create_academic_year_impl(req).await
    }

    async fn get_academic_year_by_id(&self, id: i64) -> Result<Option<AcademicYear>> {
        self.get_academic_year_by_id_impl(id).await
    }

    async fn get_current_academic_year(&self) -> Result<Option<AcademicYear>> {
        self.get_current_academic_year_impl().await
    }

    async fn list_academic_years(&self) -> Result<Vec<AcademicYear>> {
        self.list_academic_years_impl().await
    }

    async fn update_academic_year(
        &self,
        id: i64,
        update: UpdateAcademicYearRequest,
    ) -> Result<Option<AcademicYear>> {
        self.update_academic_year_impl(id, update).await
    }

    async fn delete_academic_year(&self, id: i64) -> Result<bool> {
        self.delete_academic_year_impl(id).await
    }

    async fn activate_academic_year(&self, id: i64) -> Result<Option<AcademicYear>> {
        self.activate_academic_year_impl(id).await
    }

    // 班级模块
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        self.update_class_impl(class_id, update).await
    }

    async fn delete_class(&self, class_id: i64) -> Result<bool> {
        self.delete_class_impl(class_id).await
    }

    async fn count_classes(&self) -> Result<u64> {
        self.count_classes_impl().await
    }

    // 科目模块
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(subject).await
    }

    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(subject_id).await
    }

    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse> {
        self.list_subjects_with_pagination_impl(query).await
    }

    async fn update_subject(
        &self,
        subject_id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(subject_id, update).await
    }

    async fn delete_subject(&self, subject_id: i64) -> Result<bool> {
        self.delete_subject_impl(subject_id).await
    }

    async fn count_subjects(&self) -> Result<u64> {
        self.count_subjects_impl().await
    }

    // 教学日志模块
    async fn create_lesson(&self, lesson: NewLesson) -> Result<Lesson> {
        self.create_lesson_impl(lesson).await
    }

    async fn get_lesson_by_id(&self, lesson_id: i64) -> Result<Option<Lesson>> {
        self.get_lesson_by_id_impl(lesson_id).await
    }

    async fn find_lesson_by_slot(
        &self,
        slot: LessonSlot,
        exclude_id: Option<i64>,
    ) -> Result<Option<Lesson>> {
        self.find_lesson_by_slot_impl(slot, exclude_id).await
    }

    async fn list_lessons_with_pagination(
        &self,
        query: LessonListQuery,
    ) -> Result<LessonListResponse> {
        self.list_lessons_with_pagination_impl(query).await
    }

    async fn update_lesson(
        &self,
        lesson_id: i64,
        changes: LessonChanges,
    ) -> Result<Option<Lesson>> {
        self.update_lesson_impl(lesson_id, changes).await
    }

    async fn delete_lesson(&self, lesson_id: i64) -> Result<bool> {
        self.delete_lesson_impl(lesson_id).await
    }

    async fn count_lessons(&self, teacher_id: Option<i64>, from: i64, to: i64) -> Result<u64> {
        self.count_lessons_impl(teacher_id, from, to).await
    }

    // 课表模块
    async fn create_schedule(&self, req: CreateScheduleRequest) -> Result<ScheduleDetail> {
        self.create_schedule_impl(req).await
    }

    async fn get_schedule_by_id(&self, schedule_id: i64) -> Result<Option<ScheduleDetail>> {
        self.get_schedule_by_id_impl(schedule_id).await
    }

    async fn list_schedules(&self) -> Result<Vec<Schedule>> {
        self.list_schedules_impl().await
    }

    async fn update_schedule(
        &self,
        schedule_id: i64,
        update: UpdateScheduleRequest,
    ) -> Result<Option<ScheduleDetail>> {
        self.update_schedule_impl(schedule_id, update).await
    }

    async fn delete_schedule(&self, schedule_id: i64) -> Result<bool> {
        self.delete_schedule_impl(schedule_id).await
    }

    async fn activate_schedule(&self, schedule_id: i64) -> Result<Option<Schedule>> {
        self.activate_schedule_impl(schedule_id).await
    }

    async fn get_active_schedule(&self) -> Result<Option<ScheduleDetail>> {
        self.get_active_schedule_impl().await
    }

    async fn list_active_weekday_entries(
        &self,
        day_of_week: u32,
    ) -> Result<Option<(Schedule, Vec<WeekdayEntry>)>> {
        self.list_active_weekday_entries_impl(day_of_week).await
    }

    // 公告模块
    async fn create_announcement(
        &self,
        announcement: NewAnnouncement,
        recipient_ids: &[i64],
    ) -> Result<Announcement> {
        self.create_announcement_impl(announcement, recipient_ids)
            .await
    }

    async fn get_announcement_by_id(&self, announcement_id: i64) -> Result<Option<Announcement>> {
        self.get_announcement_by_id_impl(announcement_id).await
    }

    async fn list_announcements_with_pagination(
        &self,
        query: AnnouncementListQuery,
    ) -> Result<AnnouncementListResponse> {
        self.list_announcements_with_pagination_impl(query).await
    }

    async fn list_announcement_recipients(
        &self,
        announcement_id: i64,
    ) -> Result<Vec<AnnouncementRecipient>> {
        self.list_announcement_recipients_impl(announcement_id)
            .await
    }

    async fn get_announcement_recipient(
        &self,
        announcement_id: i64,
        user_id: i64,
    ) -> Result<Option<AnnouncementRecipient>> {
        self.get_announcement_recipient_impl(announcement_id, user_id)
            .await
    }

    async fn mark_announcement_read(&self, announcement_id: i64, user_id: i64) -> Result<bool> {
        self.mark_announcement_read_impl(announcement_id, user_id)
            .await
    }

    async fn count_unread_announcements(&self, user_id: i64) -> Result<u64> {
        self.count_unread_announcements_impl(user_id).await
    }

    async fn count_announcements(&self) -> Result<u64> {
        self.count_announcements_impl().await
    }

    async fn delete_announcement(&self, announcement_id: i64) -> Result<bool> {
        self.delete_announcement_impl(announcement_id).await
    }

    // 通知模块
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification> {
        self.create_notification_impl(notification).await
    }

    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        self.list_notifications_with_pagination_impl(user_id, query)
            .await
    }

    async fn count_unread_notifications(&self, user_id: i64) -> Result<u64> {
        self.count_unread_notifications_impl(user_id).await
    }

    async fn get_latest_unread_notification(&self, user_id: i64) -> Result<Option<Notification>> {
        self.get_latest_unread_notification_impl(user_id).await
    }

    async fn mark_notification_read(&self, notification_id: i64, user_id: i64) -> Result<bool> {
        self.mark_notification_read_impl(notification_id, user_id)
            .await
    }

    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64> {
        self.mark_all_notifications_read_impl(user_id).await
    }

    async fn delete_notification(&self, notification_id: i64, user_id: i64) -> Result<bool> {
        self.delete_notification_impl(notification_id, user_id)
            .await
    }

    // 问询模块
    async fn create_inquest(
        &self,
        inquest: NewInquest,
        notification: NewNotification,
    ) -> Result<Inquest> {
        self.create_inquest_impl(inquest, notification).await
    }

    async fn get_inquest_by_id(&self, inquest_id: i64) -> Result<Option<Inquest>> {
        self.get_inquest_by_id_impl(inquest_id).await
    }

    async fn list_inquests_with_pagination(
        &self,
        query: InquestListQuery,
    ) -> Result<InquestListResponse> {
        self.list_inquests_with_pagination_impl(query).await
    }

    async fn transition_inquest(
        &self,
        inquest_id: i64,
        transition: InquestTransition,
        notification: NewNotification,
    ) -> Result<Option<Inquest>> {
        self.transition_inquest_impl(inquest_id, transition, notification)
            .await
    }

    async fn delete_inquest(&self, inquest_id: i64) -> Result<bool> {
        self.delete_inquest_impl(inquest_id).await
    }

    async fn count_inquests(
        &self,
        teacher_id: Option<i64>,
        status: Option<InquestStatus>,
    ) -> Result<u64> {
        self.count_inquests_impl(teacher_id, status).await
    }

    // 文件模块
    async fn upload_file(
        &self,
        original_name: &str,
        stored_name: &str,
        file_size: &i64,
        file_type: &str,
        user_id: i64,
    ) -> Result<File> {
        self.upload_file_impl(original_name, stored_name, file_size, file_type, user_id)
            .await
    }

    async fn get_file_by_token(&self, token: &str) -> Result<Option<File>> {
        self.get_file_by_token_impl(token).await
    }

    async fn list_files_by_user(&self, user_id: i64) -> Result<Vec<File>> {
        self.list_files_by_user_impl(user_id).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    /// 迁移完成的内存数据库，单连接保证各查询看到同一个库
    pub(crate) async fn memory_storage() -> SeaOrmStorage {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmStorage { db }
    }

    pub(crate) fn teacher_request(username: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@school.test"),
            password: "hash".to_string(),
            role: UserRole::Teacher,
            display_name: None,
            phone: None,
        }
    }
}
