use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, SchoolError};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    users::{
        entities::{User, UserRole, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            phone: Set(req.phone),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Username.like(like_contains(search)))
                    .add(Column::Email.like(like_contains(search)))
                    .add(Column::DisplayName.like(like_contains(search))),
            );
        }

        // 角色筛选
        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        // 状态筛选
        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户页数失败: {e}")))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }

        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        if let Some(display_name) = update.display_name {
            model.display_name = Set(Some(display_name));
        }

        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新用户失败: {e}")))?;

        self.get_user_by_id_impl(id).await
    }

    /// 删除用户（教学日志、接收记录、通知、问询随外键级联删除）
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除用户失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }

    pub async fn count_users_by_role_impl(&self, role: UserRole) -> Result<u64> {
        Users::find()
            .filter(Column::Role.eq(role.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("统计用户数量失败: {e}")))
    }

    /// 指定角色的全部用户 ID，按 ID 升序
    pub async fn list_user_ids_by_role_impl(&self, role: UserRole) -> Result<Vec<i64>> {
        Users::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::Role.eq(role.to_string()))
            .order_by_asc(Column::Id)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户ID失败: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{announcement_recipients, files, inquests, lessons, notifications};
    use crate::models::announcements::{entities::AnnouncementType, requests::NewAnnouncement};
    use crate::models::classes::requests::CreateClassRequest;
    use crate::models::inquests::requests::NewInquest;
    use crate::models::lessons::{entities::LessonSlot, requests::NewLesson};
    use crate::models::notifications::requests::NewNotification;
    use crate::models::subjects::requests::CreateSubjectRequest;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, teacher_request};

    #[tokio::test]
    async fn test_create_and_find_user() {
        let storage = memory_storage().await;
        let user = storage
            .create_user_impl(teacher_request("teacher01"))
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Teacher);
        assert_eq!(user.status, UserStatus::Active);

        let by_email = storage
            .get_user_by_username_or_email_impl("teacher01@school.test")
            .await
            .unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let storage = memory_storage().await;
        storage
            .create_user_impl(teacher_request("teacher01"))
            .await
            .unwrap();
        let err = storage
            .create_user_impl(teacher_request("teacher01"))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_list_users_filters_role_and_search() {
        let storage = memory_storage().await;
        for name in ["alpha01", "bravo01", "charlie01"] {
            storage.create_user_impl(teacher_request(name)).await.unwrap();
        }
        let mut admin = teacher_request("admin01");
        admin.role = UserRole::Admin;
        storage.create_user_impl(admin).await.unwrap();

        let teachers = storage
            .list_users_with_pagination_impl(UserListQuery {
                role: Some(UserRole::Teacher),
                size: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(teachers.pagination.total, 3);
        assert_eq!(teachers.pagination.total_pages, 2);
        assert_eq!(teachers.items.len(), 2);

        let searched = storage
            .list_users_with_pagination_impl(UserListQuery {
                search: Some("brav".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(searched.items.len(), 1);
        assert_eq!(searched.items[0].username, "bravo01");

        assert_eq!(
            storage
                .list_user_ids_by_role_impl(UserRole::Teacher)
                .await
                .unwrap()
                .len(),
            3
        );
        assert_eq!(storage.count_users_impl().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_delete_teacher_removes_dependent_rows() {
        let storage = memory_storage().await;
        let mut admin = teacher_request("admin01");
        admin.role = UserRole::Admin;
        let admin = storage.create_user_impl(admin).await.unwrap();
        let teacher = storage
            .create_user_impl(teacher_request("teacher01"))
            .await
            .unwrap();
        let colleague = storage
            .create_user_impl(teacher_request("teacher02"))
            .await
            .unwrap();

        let class = storage
            .create_class_impl(CreateClassRequest {
                name: "7A".into(),
                grade_level: None,
                academic_year_id: None,
                description: None,
            })
            .await
            .unwrap();
        let subject = storage
            .create_subject_impl(CreateSubjectRequest {
                name: "History".into(),
                code: None,
                description: None,
            })
            .await
            .unwrap();
        let lesson = storage
            .create_lesson_impl(NewLesson {
                slot: LessonSlot {
                    teacher_id: teacher.id,
                    class_id: class.id,
                    subject_id: subject.id,
                    lesson_day: 1_704_067_200,
                },
                topic: "Bronze age".into(),
                content: None,
                homework: None,
            })
            .await
            .unwrap();
        storage
            .create_announcement_impl(
                NewAnnouncement {
                    title: "Exam week".into(),
                    content: "Timetable attached".into(),
                    announcement_type: AnnouncementType::General,
                    created_by: admin.id,
                },
                &[teacher.id, colleague.id],
            )
            .await
            .unwrap();
        storage
            .create_inquest_impl(
                NewInquest {
                    teacher_id: teacher.id,
                    created_by: admin.id,
                    subject: "Late log".into(),
                    description: "Logged two days late".into(),
                    lesson_id: Some(lesson.id),
                },
                NewNotification {
                    user_id: teacher.id,
                    title: "New inquest: Late log".into(),
                    content: "Logged two days late".into(),
                    link: Some("/inquests".into()),
                },
            )
            .await
            .unwrap();
        storage
            .upload_file_impl("plan.pdf", "plan01.pdf", &512, "application/pdf", teacher.id)
            .await
            .unwrap();

        assert!(storage.delete_user_impl(teacher.id).await.unwrap());
        assert!(storage.get_user_by_id_impl(teacher.id).await.unwrap().is_none());

        let lessons_left = lessons::Entity::find()
            .filter(lessons::Column::TeacherId.eq(teacher.id))
            .count(&storage.db)
            .await
            .unwrap();
        let recipients_left = announcement_recipients::Entity::find()
            .filter(announcement_recipients::Column::UserId.eq(teacher.id))
            .count(&storage.db)
            .await
            .unwrap();
        let notifications_left = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(teacher.id))
            .count(&storage.db)
            .await
            .unwrap();
        let inquests_left = inquests::Entity::find()
            .filter(inquests::Column::TeacherId.eq(teacher.id))
            .count(&storage.db)
            .await
            .unwrap();
        let files_left = files::Entity::find()
            .filter(files::Column::UserId.eq(teacher.id))
            .count(&storage.db)
            .await
            .unwrap();
        assert_eq!(
            (lessons_left, recipients_left, notifications_left, inquests_left, files_left),
            (0, 0, 0, 0, 0)
        );

        // 其他教师的数据不受影响
        assert_eq!(storage.count_unread_announcements_impl(colleague.id).await.unwrap(), 1);
        assert_eq!(storage.count_unread_notifications_impl(colleague.id).await.unwrap(), 1);
        assert!(!storage.delete_user_impl(teacher.id).await.unwrap());
    }
}
