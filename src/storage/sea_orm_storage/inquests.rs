//! 问询存储操作

use super::SeaOrmStorage;
use crate::entity::inquests::{ActiveModel, Column, Entity as Inquests};
use crate::entity::notifications::ActiveModel as NotificationActiveModel;
use crate::errors::{Result, SchoolError};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    common::pagination::normalize_page,
    inquests::{
        entities::{Inquest, InquestStatus, InquestTransition},
        requests::{InquestListQuery, NewInquest},
        responses::InquestListResponse,
    },
    notifications::requests::NewNotification,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

async fn insert_notification<C: ConnectionTrait>(
    conn: &C,
    notification: NewNotification,
    now: i64,
) -> Result<()> {
    NotificationActiveModel {
        user_id: Set(notification.user_id),
        title: Set(notification.title),
        content: Set(notification.content),
        link: Set(notification.link),
        is_read: Set(false),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| SchoolError::database_operation(format!("创建通知失败: {e}")))?;

    Ok(())
}

impl SeaOrmStorage {
    /// 创建问询并通知被问询教师
    pub async fn create_inquest_impl(
        &self,
        inquest: NewInquest,
        notification: NewNotification,
    ) -> Result<Inquest> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            teacher_id: Set(inquest.teacher_id),
            created_by: Set(inquest.created_by),
            subject: Set(inquest.subject),
            description: Set(inquest.description),
            lesson_id: Set(inquest.lesson_id),
            status: Set(InquestStatus::Pending.to_string()),
            response: Set(None),
            responded_at: Set(None),
            decision: Set(None),
            completed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let created = model
            .insert(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("创建问询失败: {e}")))?;

        insert_notification(&txn, notification, now).await?;

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created.into_inquest())
    }

    pub async fn get_inquest_by_id_impl(&self, id: i64) -> Result<Option<Inquest>> {
        let result = Inquests::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询问询失败: {e}")))?;

        Ok(result.map(|m| m.into_inquest()))
    }

    pub async fn list_inquests_with_pagination_impl(
        &self,
        query: InquestListQuery,
    ) -> Result<InquestListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Inquests::find();
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询问询总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询问询页数失败: {e}")))?;

        let inquests = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询问询列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: inquests.into_iter().map(|m| m.into_inquest()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 执行状态迁移
    ///
    /// 以迁移的起始状态作为更新条件，并发请求中只有一个能生效，
    /// 其余返回 `None`。通知与状态变更在同一事务内提交。
    pub async fn transition_inquest_impl(
        &self,
        id: i64,
        transition: InquestTransition,
        notification: NewNotification,
    ) -> Result<Option<Inquest>> {
        let now = chrono::Utc::now().timestamp();
        let from = transition.from_status().to_string();
        let to = transition.to_status().to_string();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        let mut update = Inquests::update_many()
            .col_expr(Column::Status, Expr::value(to))
            .col_expr(Column::UpdatedAt, Expr::value(now));

        update = match transition {
            InquestTransition::Respond { response } => update
                .col_expr(Column::Response, Expr::value(response))
                .col_expr(Column::RespondedAt, Expr::value(now)),
            InquestTransition::Complete { decision } => update
                .col_expr(Column::Decision, Expr::value(decision))
                .col_expr(Column::CompletedAt, Expr::value(now)),
        };

        let result = update
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(from))
            .exec(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新问询状态失败: {e}")))?;

        if result.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| SchoolError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(None);
        }

        insert_notification(&txn, notification, now).await?;

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_inquest_by_id_impl(id).await
    }

    pub async fn delete_inquest_impl(&self, id: i64) -> Result<bool> {
        let result = Inquests::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除问询失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_inquests_impl(
        &self,
        teacher_id: Option<i64>,
        status: Option<InquestStatus>,
    ) -> Result<u64> {
        let mut select = Inquests::find();
        if let Some(teacher_id) = teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(status) = status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select
            .count(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("统计问询数量失败: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, teacher_request};

    fn notice(user_id: i64) -> NewNotification {
        NewNotification {
            user_id,
            title: "Inquest".into(),
            content: "status changed".into(),
            link: None,
        }
    }

    #[tokio::test]
    async fn test_full_lifecycle_with_guarded_updates() {
        let storage = memory_storage().await;
        let mut admin = teacher_request("admin01");
        admin.role = UserRole::Admin;
        let admin = storage.create_user_impl(admin).await.unwrap();
        let teacher = storage
            .create_user_impl(teacher_request("teacher01"))
            .await
            .unwrap();

        let inquest = storage
            .create_inquest_impl(
                NewInquest {
                    teacher_id: teacher.id,
                    created_by: admin.id,
                    subject: "Missing lesson log".into(),
                    description: "No log for Monday".into(),
                    lesson_id: None,
                },
                notice(teacher.id),
            )
            .await
            .unwrap();
        assert_eq!(inquest.status, InquestStatus::Pending);
        assert_eq!(
            storage.count_unread_notifications_impl(teacher.id).await.unwrap(),
            1
        );

        // 起始状态不符时不生效
        let premature = storage
            .transition_inquest_impl(
                inquest.id,
                InquestTransition::Complete {
                    decision: "closed".into(),
                },
                notice(teacher.id),
            )
            .await
            .unwrap();
        assert!(premature.is_none());
        assert_eq!(
            storage.count_unread_notifications_impl(teacher.id).await.unwrap(),
            1
        );

        let responded = storage
            .transition_inquest_impl(
                inquest.id,
                InquestTransition::Respond {
                    response: "I was on sick leave".into(),
                },
                notice(admin.id),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(responded.status, InquestStatus::Responded);
        assert!(responded.responded_at.is_some());

        let completed = storage
            .transition_inquest_impl(
                inquest.id,
                InquestTransition::Complete {
                    decision: "accepted".into(),
                },
                notice(teacher.id),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(completed.status, InquestStatus::Completed);
        assert_eq!(completed.decision.as_deref(), Some("accepted"));
        assert_eq!(completed.response.as_deref(), Some("I was on sick leave"));

        assert_eq!(
            storage
                .count_inquests_impl(Some(teacher.id), Some(InquestStatus::Completed))
                .await
                .unwrap(),
            1
        );
        assert_eq!(
            storage
                .count_inquests_impl(None, Some(InquestStatus::Pending))
                .await
                .unwrap(),
            0
        );
    }
}
