use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;
    // 按角色统计用户数量
    async fn count_users_by_role(&self, role: UserRole) -> Result<u64>;
    // 指定角色的全部用户ID
    async fn list_user_ids_by_role(&self, role: UserRole) -> Result<Vec<i64>>;

    /// 找回密码
    // 作废旧令牌并写入新令牌
    async fn create_password_reset_token(
        &self,
        user_id: i64,
        token: &str,
        expires_at: i64,
    ) -> Result<PasswordResetToken>;
    // 通过令牌查询
    async fn get_password_reset_token(&self, token: &str) -> Result<Option<PasswordResetToken>>;
    // 标记令牌已使用并更新密码（同一事务）
    async fn consume_password_reset_token(
        &self,
        token_id: i64,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool>;

    /// 学年管理方法
    async fn create_academic_year(&self, req: CreateAcademicYearRequest) -> Result<AcademicYear>;
    async fn get_academic_year_by_id(&self, id: i64) -> Result<Option<AcademicYear>>;
    async fn get_current_academic_year(&self) -> Result<Option<AcademicYear>>;
    async fn list_academic_years(&self) -> Result<Vec<AcademicYear>>;
    async fn update_academic_year(
        &self,
        id: i64,
        update: UpdateAcademicYearRequest,
    ) -> Result<Option<AcademicYear>>;
    async fn delete_academic_year(&self, id: i64) -> Result<bool>;
    // 设为唯一的当前学年
    async fn activate_academic_year(&self, id: i64) -> Result<Option<AcademicYear>>;

    /// 班级管理方法
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    async fn list_classes_with_pagination(&self, query: ClassListQuery)
    -> Result<ClassListResponse>;
    async fn update_class(&self, class_id: i64, update: UpdateClassRequest)
    -> Result<Option<Class>>;
    async fn delete_class(&self, class_id: i64) -> Result<bool>;
    async fn count_classes(&self) -> Result<u64>;

    /// 科目管理方法
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>>;
    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse>;
    async fn update_subject(
        &self,
        subject_id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>>;
    async fn delete_subject(&self, subject_id: i64) -> Result<bool>;
    async fn count_subjects(&self) -> Result<u64>;

    /// 教学日志方法
    async fn create_lesson(&self, lesson: NewLesson) -> Result<Lesson>;
    async fn get_lesson_by_id(&self, lesson_id: i64) -> Result<Option<Lesson>>;
    // 同一 (教师, 班级, 科目, 日) 的已有日志，可排除自身
    async fn find_lesson_by_slot(
        &self,
        slot: LessonSlot,
        exclude_id: Option<i64>,
    ) -> Result<Option<Lesson>>;
    async fn list_lessons_with_pagination(
        &self,
        query: LessonListQuery,
    ) -> Result<LessonListResponse>;
    async fn update_lesson(&self, lesson_id: i64, changes: LessonChanges)
    -> Result<Option<Lesson>>;
    async fn delete_lesson(&self, lesson_id: i64) -> Result<bool>;
    // 统计 [from, to] 日内的日志数
    async fn count_lessons(&self, teacher_id: Option<i64>, from: i64, to: i64) -> Result<u64>;

    /// 课表方法
    async fn create_schedule(&self, req: CreateScheduleRequest) -> Result<ScheduleDetail>;
    async fn get_schedule_by_id(&self, schedule_id: i64) -> Result<Option<ScheduleDetail>>;
    async fn list_schedules(&self) -> Result<Vec<Schedule>>;
    async fn update_schedule(
        &self,
        schedule_id: i64,
        update: UpdateScheduleRequest,
    ) -> Result<Option<ScheduleDetail>>;
    async fn delete_schedule(&self, schedule_id: i64) -> Result<bool>;
    // 设为唯一启用的课表
    async fn activate_schedule(&self, schedule_id: i64) -> Result<Option<Schedule>>;
    async fn get_active_schedule(&self) -> Result<Option<ScheduleDetail>>;
    // 启用课表在某个星期几的条目（已解析班级/科目/教师名称）
    async fn list_active_weekday_entries(
        &self,
        day_of_week: u32,
    ) -> Result<Option<(Schedule, Vec<WeekdayEntry>)>>;

    /// 公告方法
    // 公告、接收人与通知在同一事务中写入
    async fn create_announcement(
        &self,
        announcement: NewAnnouncement,
        recipient_ids: &[i64],
    ) -> Result<Announcement>;
    async fn get_announcement_by_id(&self, announcement_id: i64) -> Result<Option<Announcement>>;
    async fn list_announcements_with_pagination(
        &self,
        query: AnnouncementListQuery,
    ) -> Result<AnnouncementListResponse>;
    async fn list_announcement_recipients(
        &self,
        announcement_id: i64,
    ) -> Result<Vec<AnnouncementRecipient>>;
    async fn get_announcement_recipient(
        &self,
        announcement_id: i64,
        user_id: i64,
    ) -> Result<Option<AnnouncementRecipient>>;
    async fn mark_announcement_read(&self, announcement_id: i64, user_id: i64) -> Result<bool>;
    async fn count_unread_announcements(&self, user_id: i64) -> Result<u64>;
    async fn count_announcements(&self) -> Result<u64>;
    async fn delete_announcement(&self, announcement_id: i64) -> Result<bool>;

    /// 通知方法
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification>;
    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse>;
    async fn count_unread_notifications(&self, user_id: i64) -> Result<u64>;
    async fn get_latest_unread_notification(&self, user_id: i64) -> Result<Option<Notification>>;
    async fn mark_notification_read(&self, notification_id: i64, user_id: i64) -> Result<bool>;
    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64>;
    async fn delete_notification(&self, notification_id: i64, user_id: i64) -> Result<bool>;

    /// 问询方法
    // 问询与给教师的通知在同一事务中写入
    async fn create_inquest(
        &self,
        inquest: NewInquest,
        notification: NewNotification,
    ) -> Result<Inquest>;
    async fn get_inquest_by_id(&self, inquest_id: i64) -> Result<Option<Inquest>>;
    async fn list_inquests_with_pagination(
        &self,
        query: InquestListQuery,
    ) -> Result<InquestListResponse>;
    // 按迁移的起始状态做条件更新，并写入通知；状态已变化时返回 None
    async fn transition_inquest(
        &self,
        inquest_id: i64,
        transition: InquestTransition,
        notification: NewNotification,
    ) -> Result<Option<Inquest>>;
    async fn delete_inquest(&self, inquest_id: i64) -> Result<bool>;
    async fn count_inquests(
        &self,
        teacher_id: Option<i64>,
        status: Option<InquestStatus>,
    ) -> Result<u64>;

    /// 文件管理方法
    // 上传文件
    async fn upload_file(
        &self,
        original_name: &str,
        stored_name: &str,
        file_size: &i64,
        file_type: &str,
        user_id: i64,
    ) -> Result<File>;
    // 通过唯一 token 获取文件信息
    async fn get_file_by_token(&self, token: &str) -> Result<Option<File>>;
    // 某个用户上传的全部文件
    async fn list_files_by_user(&self, user_id: i64) -> Result<Vec<File>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
