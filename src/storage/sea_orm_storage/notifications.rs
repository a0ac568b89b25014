//! 通知存储操作

use super::SeaOrmStorage;
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::{Result, SchoolError};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    common::pagination::normalize_page,
    notifications::{
        entities::Notification,
        requests::{NewNotification, NotificationListQuery},
        responses::NotificationListResponse,
    },
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_notification_impl(
        &self,
        notification: NewNotification,
    ) -> Result<Notification> {
        let model = ActiveModel {
            user_id: Set(notification.user_id),
            title: Set(notification.title),
            content: Set(notification.content),
            link: Set(notification.link),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("创建通知失败: {e}")))?;

        Ok(result.into_notification())
    }

    /// 分页列出某个用户的通知，最新的在前
    pub async fn list_notifications_with_pagination_impl(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Notifications::find().filter(Column::UserId.eq(user_id));
        if query.unread_only {
            select = select.filter(Column::IsRead.eq(false));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询通知总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询通知页数失败: {e}")))?;

        let notifications = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询通知列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: notifications
                .into_iter()
                .map(|m| m.into_notification())
                .collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn count_unread_notifications_impl(&self, user_id: i64) -> Result<u64> {
        Notifications::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("统计未读通知失败: {e}")))
    }

    pub async fn get_latest_unread_notification_impl(
        &self,
        user_id: i64,
    ) -> Result<Option<Notification>> {
        let result = Notifications::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询最新通知失败: {e}")))?;

        Ok(result.map(|m| m.into_notification()))
    }

    /// 标记单条通知已读，只作用于本人的通知
    pub async fn mark_notification_read_impl(
        &self,
        notification_id: i64,
        user_id: i64,
    ) -> Result<bool> {
        let exists = Notifications::find_by_id(notification_id)
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询通知失败: {e}")))?;
        if exists.is_none() {
            return Ok(false);
        }

        Notifications::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .filter(Column::Id.eq(notification_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("标记通知已读失败: {e}")))?;

        Ok(true)
    }

    /// 返回本次标记的条数
    pub async fn mark_all_notifications_read_impl(&self, user_id: i64) -> Result<u64> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("标记全部已读失败: {e}")))?;

        Ok(result.rows_affected)
    }

    pub async fn delete_notification_impl(&self, notification_id: i64, user_id: i64) -> Result<bool> {
        let result = Notifications::delete_many()
            .filter(Column::Id.eq(notification_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除通知失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, teacher_request};

    fn notice(user_id: i64, title: &str) -> NewNotification {
        NewNotification {
            user_id,
            title: title.to_string(),
            content: "body".to_string(),
            link: None,
        }
    }

    #[tokio::test]
    async fn test_unread_counter_and_mark_all() {
        let storage = memory_storage().await;
        let teacher = storage
            .create_user_impl(teacher_request("teacher01"))
            .await
            .unwrap();
        let first = storage
            .create_notification_impl(notice(teacher.id, "first"))
            .await
            .unwrap();
        let second = storage
            .create_notification_impl(notice(teacher.id, "second"))
            .await
            .unwrap();

        assert_eq!(
            storage.count_unread_notifications_impl(teacher.id).await.unwrap(),
            2
        );
        let latest = storage
            .get_latest_unread_notification_impl(teacher.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, second.id);

        assert!(
            storage
                .mark_notification_read_impl(first.id, teacher.id)
                .await
                .unwrap()
        );
        let unread = storage
            .list_notifications_with_pagination_impl(
                teacher.id,
                NotificationListQuery {
                    unread_only: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(unread.items.len(), 1);

        assert_eq!(
            storage.mark_all_notifications_read_impl(teacher.id).await.unwrap(),
            1
        );
        assert_eq!(
            storage.count_unread_notifications_impl(teacher.id).await.unwrap(),
            0
        );
        assert!(
            storage
                .get_latest_unread_notification_impl(teacher.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_cannot_touch_other_users_notifications() {
        let storage = memory_storage().await;
        let owner = storage
            .create_user_impl(teacher_request("teacher01"))
            .await
            .unwrap();
        let other = storage
            .create_user_impl(teacher_request("teacher02"))
            .await
            .unwrap();
        let n = storage
            .create_notification_impl(notice(owner.id, "private"))
            .await
            .unwrap();

        assert!(!storage.mark_notification_read_impl(n.id, other.id).await.unwrap());
        assert!(!storage.delete_notification_impl(n.id, other.id).await.unwrap());
        assert!(storage.delete_notification_impl(n.id, owner.id).await.unwrap());
    }
}
