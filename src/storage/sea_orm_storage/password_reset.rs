//! 找回密码令牌存储操作

use super::SeaOrmStorage;
use crate::entity::password_reset_tokens::{ActiveModel, Column, Entity as PasswordResetTokens};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, SchoolError};
use crate::models::auth::entities::PasswordResetToken;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};

impl SeaOrmStorage {
    /// 作废用户未使用的旧令牌，并写入新令牌
    pub async fn create_password_reset_token_impl(
        &self,
        user_id: i64,
        token: &str,
        expires_at: i64,
    ) -> Result<PasswordResetToken> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        PasswordResetTokens::update_many()
            .col_expr(Column::UsedAt, Expr::value(now))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::UsedAt.is_null())
            .exec(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("作废旧令牌失败: {e}")))?;

        let model = ActiveModel {
            user_id: Set(user_id),
            token: Set(token.to_string()),
            expires_at: Set(expires_at),
            used_at: Set(None),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("创建重置令牌失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_password_reset_token())
    }

    pub async fn get_password_reset_token_impl(
        &self,
        token: &str,
    ) -> Result<Option<PasswordResetToken>> {
        let result = PasswordResetTokens::find()
            .filter(Column::Token.eq(token))
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询重置令牌失败: {e}")))?;

        Ok(result.map(|m| m.into_password_reset_token()))
    }

    /// 令牌只能使用一次：并发请求中只有一个能把 used_at 从空改为当前时间
    pub async fn consume_password_reset_token_impl(
        &self,
        token_id: i64,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        let marked = PasswordResetTokens::update_many()
            .col_expr(Column::UsedAt, Expr::value(now))
            .filter(Column::Id.eq(token_id))
            .filter(Column::UsedAt.is_null())
            .filter(Column::ExpiresAt.gt(now))
            .exec(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新重置令牌失败: {e}")))?;

        if marked.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| SchoolError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(false);
        }

        Users::update_many()
            .col_expr(UserColumn::PasswordHash, Expr::value(password_hash))
            .col_expr(UserColumn::UpdatedAt, Expr::value(now))
            .filter(UserColumn::Id.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新密码失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::sea_orm_storage::test_support::{memory_storage, teacher_request};

    #[tokio::test]
    async fn test_new_token_invalidates_previous() {
        let storage = memory_storage().await;
        let user = storage
            .create_user_impl(teacher_request("teacher01"))
            .await
            .unwrap();
        let expires = chrono::Utc::now().timestamp() + 3600;

        storage
            .create_password_reset_token_impl(user.id, "first-token", expires)
            .await
            .unwrap();
        storage
            .create_password_reset_token_impl(user.id, "second-token", expires)
            .await
            .unwrap();

        let first = storage
            .get_password_reset_token_impl("first-token")
            .await
            .unwrap()
            .unwrap();
        assert!(first.used_at.is_some());

        let second = storage
            .get_password_reset_token_impl("second-token")
            .await
            .unwrap()
            .unwrap();
        assert!(second.used_at.is_none());
    }

    #[tokio::test]
    async fn test_token_consumed_once() {
        let storage = memory_storage().await;
        let user = storage
            .create_user_impl(teacher_request("teacher01"))
            .await
            .unwrap();
        let token = storage
            .create_password_reset_token_impl(
                user.id,
                "reset-token",
                chrono::Utc::now().timestamp() + 3600,
            )
            .await
            .unwrap();

        assert!(
            storage
                .consume_password_reset_token_impl(token.id, user.id, "new-hash")
                .await
                .unwrap()
        );
        assert!(
            !storage
                .consume_password_reset_token_impl(token.id, user.id, "other-hash")
                .await
                .unwrap()
        );

        let updated = storage.get_user_by_id_impl(user.id).await.unwrap().unwrap();
        assert_eq!(updated.password_hash, "new-hash");
    }

    #[tokio::test]
    async fn test_expired_token_not_consumed() {
        let storage = memory_storage().await;
        let user = storage
            .create_user_impl(teacher_request("teacher01"))
            .await
            .unwrap();
        let token = storage
            .create_password_reset_token_impl(
                user.id,
                "old-token",
                chrono::Utc::now().timestamp() - 10,
            )
            .await
            .unwrap();

        assert!(
            !storage
                .consume_password_reset_token_impl(token.id, user.id, "new-hash")
                .await
                .unwrap()
        );
    }
}
