//! 公告存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::announcement_recipients::{
    ActiveModel as RecipientActiveModel, Column as RecipientColumn, Entity as Recipients,
};
use crate::entity::announcements::{ActiveModel, Column, Entity as Announcements};
use crate::entity::notifications::ActiveModel as NotificationActiveModel;
use crate::entity::prelude::Notifications;
use crate::errors::{Result, SchoolError};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    announcements::{
        entities::{Announcement, AnnouncementRecipient, AnnouncementView},
        requests::{AnnouncementListQuery, NewAnnouncement},
        responses::AnnouncementListResponse,
    },
    common::pagination::normalize_page,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 写入公告、接收人，并给每个接收人投递一条通知
    pub async fn create_announcement_impl(
        &self,
        announcement: NewAnnouncement,
        recipient_ids: &[i64],
    ) -> Result<Announcement> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            title: Set(announcement.title),
            content: Set(announcement.content),
            announcement_type: Set(announcement.announcement_type.to_string()),
            created_by: Set(announcement.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let created = model
            .insert(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("创建公告失败: {e}")))?;

        if !recipient_ids.is_empty() {
            let recipients = recipient_ids.iter().map(|user_id| RecipientActiveModel {
                announcement_id: Set(created.id),
                user_id: Set(*user_id),
                is_read: Set(false),
                read_at: Set(None),
                ..Default::default()
            });
            Recipients::insert_many(recipients)
                .exec(&txn)
                .await
                .map_err(|e| SchoolError::database_operation(format!("写入公告接收人失败: {e}")))?;

            let link = format!("/announcements/{}", created.id);
            let notifications = recipient_ids.iter().map(|user_id| NotificationActiveModel {
                user_id: Set(*user_id),
                title: Set(format!("New announcement: {}", created.title)),
                content: Set(created.content.clone()),
                link: Set(Some(link.clone())),
                is_read: Set(false),
                created_at: Set(now),
                ..Default::default()
            });
            Notifications::insert_many(notifications)
                .exec(&txn)
                .await
                .map_err(|e| SchoolError::database_operation(format!("写入公告通知失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created.into_announcement())
    }

    pub async fn get_announcement_by_id_impl(&self, id: i64) -> Result<Option<Announcement>> {
        let result = Announcements::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询公告失败: {e}")))?;

        Ok(result.map(|m| m.into_announcement()))
    }

    /// 分页列出公告
    ///
    /// 设置 `recipient_id` 时只列出该用户收到的公告，并附带其已读状态；
    /// 否则附带每条公告的接收人数与已读人数。
    pub async fn list_announcements_with_pagination_impl(
        &self,
        query: AnnouncementListQuery,
    ) -> Result<AnnouncementListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Announcements::find();

        if let Some(kind) = query.announcement_type {
            select = select.filter(Column::AnnouncementType.eq(kind.to_string()));
        }

        if let Some(user_id) = query.recipient_id {
            select = select
                .join(
                    JoinType::InnerJoin,
                    crate::entity::announcements::Relation::Recipients.def(),
                )
                .filter(RecipientColumn::UserId.eq(user_id));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询公告总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询公告页数失败: {e}")))?;

        let announcements = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询公告列表失败: {e}")))?;

        let ids: Vec<i64> = announcements.iter().map(|a| a.id).collect();

        let mut recipient_select = Recipients::find().filter(RecipientColumn::AnnouncementId.is_in(ids));
        if let Some(user_id) = query.recipient_id {
            recipient_select = recipient_select.filter(RecipientColumn::UserId.eq(user_id));
        }
        let rows = recipient_select
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询公告接收人失败: {e}")))?;

        let items = match query.recipient_id {
            Some(_) => {
                let own: HashMap<i64, _> = rows
                    .into_iter()
                    .map(|r| (r.announcement_id, r.into_recipient()))
                    .collect();
                announcements
                    .into_iter()
                    .map(|a| {
                        let mine = own.get(&a.id);
                        AnnouncementView {
                            is_read: Some(mine.is_some_and(|r| r.is_read)),
                            read_at: mine.and_then(|r| r.read_at),
                            recipient_count: None,
                            read_count: None,
                            announcement: a.into_announcement(),
                        }
                    })
                    .collect()
            }
            None => {
                let mut counts: HashMap<i64, (i64, i64)> = HashMap::new();
                for row in rows {
                    let entry = counts.entry(row.announcement_id).or_default();
                    entry.0 += 1;
                    if row.is_read {
                        entry.1 += 1;
                    }
                }
                announcements
                    .into_iter()
                    .map(|a| {
                        let (recipient_count, read_count) =
                            counts.get(&a.id).copied().unwrap_or_default();
                        AnnouncementView {
                            recipient_count: Some(recipient_count),
                            read_count: Some(read_count),
                            is_read: None,
                            read_at: None,
                            announcement: a.into_announcement(),
                        }
                    })
                    .collect()
            }
        };

        Ok(PaginatedResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn list_announcement_recipients_impl(
        &self,
        announcement_id: i64,
    ) -> Result<Vec<AnnouncementRecipient>> {
        let rows = Recipients::find()
            .filter(RecipientColumn::AnnouncementId.eq(announcement_id))
            .order_by_asc(RecipientColumn::UserId)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询公告接收人失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_recipient()).collect())
    }

    pub async fn get_announcement_recipient_impl(
        &self,
        announcement_id: i64,
        user_id: i64,
    ) -> Result<Option<AnnouncementRecipient>> {
        let row = Recipients::find()
            .filter(RecipientColumn::AnnouncementId.eq(announcement_id))
            .filter(RecipientColumn::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询公告接收人失败: {e}")))?;

        Ok(row.map(|m| m.into_recipient()))
    }

    /// 标记已读，已读过的不会覆盖 read_at
    pub async fn mark_announcement_read_impl(
        &self,
        announcement_id: i64,
        user_id: i64,
    ) -> Result<bool> {
        let result = Recipients::update_many()
            .col_expr(RecipientColumn::IsRead, Expr::value(true))
            .col_expr(
                RecipientColumn::ReadAt,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(RecipientColumn::AnnouncementId.eq(announcement_id))
            .filter(RecipientColumn::UserId.eq(user_id))
            .filter(RecipientColumn::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("标记公告已读失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_unread_announcements_impl(&self, user_id: i64) -> Result<u64> {
        Recipients::find()
            .filter(RecipientColumn::UserId.eq(user_id))
            .filter(RecipientColumn::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("统计未读公告失败: {e}")))
    }

    pub async fn count_announcements_impl(&self) -> Result<u64> {
        Announcements::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("统计公告数量失败: {e}")))
    }

    /// 删除公告（接收记录随外键级联删除）
    pub async fn delete_announcement_impl(&self, id: i64) -> Result<bool> {
        let result = Announcements::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除公告失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::announcements::entities::AnnouncementType;
    use crate::models::notifications::requests::NotificationListQuery;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, teacher_request};

    #[tokio::test]
    async fn test_fan_out_creates_recipients_and_notifications() {
        let storage = memory_storage().await;
        let mut admin = teacher_request("admin01");
        admin.role = crate::models::users::entities::UserRole::Admin;
        let admin = storage.create_user_impl(admin).await.unwrap();
        let t1 = storage
            .create_user_impl(teacher_request("teacher01"))
            .await
            .unwrap();
        let t2 = storage
            .create_user_impl(teacher_request("teacher02"))
            .await
            .unwrap();

        let announcement = storage
            .create_announcement_impl(
                NewAnnouncement {
                    title: "Staff meeting".into(),
                    content: "Friday 15:00".into(),
                    announcement_type: AnnouncementType::General,
                    created_by: admin.id,
                },
                &[t1.id, t2.id],
            )
            .await
            .unwrap();

        let recipients = storage
            .list_announcement_recipients_impl(announcement.id)
            .await
            .unwrap();
        assert_eq!(recipients.len(), 2);
        assert!(recipients.iter().all(|r| !r.is_read));

        let notifications = storage
            .list_notifications_with_pagination_impl(t1.id, NotificationListQuery::default())
            .await
            .unwrap();
        assert_eq!(notifications.items.len(), 1);
        assert_eq!(
            notifications.items[0].link.as_deref(),
            Some(format!("/announcements/{}", announcement.id).as_str())
        );

        assert_eq!(storage.count_unread_announcements_impl(t1.id).await.unwrap(), 1);
        assert!(
            storage
                .mark_announcement_read_impl(announcement.id, t1.id)
                .await
                .unwrap()
        );
        // 重复标记不再生效
        assert!(
            !storage
                .mark_announcement_read_impl(announcement.id, t1.id)
                .await
                .unwrap()
        );
        assert_eq!(storage.count_unread_announcements_impl(t1.id).await.unwrap(), 0);

        let admin_view = storage
            .list_announcements_with_pagination_impl(AnnouncementListQuery::default())
            .await
            .unwrap();
        assert_eq!(admin_view.items[0].recipient_count, Some(2));
        assert_eq!(admin_view.items[0].read_count, Some(1));

        let teacher_view = storage
            .list_announcements_with_pagination_impl(AnnouncementListQuery {
                recipient_id: Some(t2.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(teacher_view.pagination.total, 1);
        assert_eq!(teacher_view.items[0].is_read, Some(false));
    }

    #[tokio::test]
    async fn test_teacher_only_sees_own_announcements() {
        let storage = memory_storage().await;
        let t1 = storage
            .create_user_impl(teacher_request("teacher01"))
            .await
            .unwrap();
        let t2 = storage
            .create_user_impl(teacher_request("teacher02"))
            .await
            .unwrap();

        storage
            .create_announcement_impl(
                NewAnnouncement {
                    title: "Only for teacher01".into(),
                    content: "Please check the lab".into(),
                    announcement_type: AnnouncementType::Targeted,
                    created_by: t1.id,
                },
                &[t1.id],
            )
            .await
            .unwrap();

        let visible = storage
            .list_announcements_with_pagination_impl(AnnouncementListQuery {
                recipient_id: Some(t2.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(visible.items.is_empty());
        assert_eq!(storage.count_announcements_impl().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_announcement_removes_recipients() {
        let storage = memory_storage().await;
        let t1 = storage
            .create_user_impl(teacher_request("teacher01"))
            .await
            .unwrap();
        let t2 = storage
            .create_user_impl(teacher_request("teacher02"))
            .await
            .unwrap();

        let announcement = storage
            .create_announcement_impl(
                NewAnnouncement {
                    title: "Fire drill".into(),
                    content: "Thursday 10:00".into(),
                    announcement_type: AnnouncementType::DrawAttention,
                    created_by: t1.id,
                },
                &[t1.id, t2.id],
            )
            .await
            .unwrap();
        storage
            .mark_announcement_read_impl(announcement.id, t1.id)
            .await
            .unwrap();

        assert!(storage.delete_announcement_impl(announcement.id).await.unwrap());

        let recipients_left = Recipients::find()
            .filter(RecipientColumn::AnnouncementId.eq(announcement.id))
            .count(&storage.db)
            .await
            .unwrap();
        assert_eq!(recipients_left, 0);
        assert!(
            storage
                .get_announcement_by_id_impl(announcement.id)
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(storage.count_unread_announcements_impl(t2.id).await.unwrap(), 0);
        assert!(!storage.delete_announcement_impl(announcement.id).await.unwrap());
    }
}
