//! 文件存储操作

use super::SeaOrmStorage;
use crate::entity::files::{ActiveModel, Column, Entity as Files};
use crate::errors::{Result, SchoolError};
use crate::models::files::entities::File;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 写入文件记录，下载令牌随机生成
    pub async fn upload_file_impl(
        &self,
        original_name: &str,
        stored_name: &str,
        file_size: &i64,
        file_type: &str,
        user_id: i64,
    ) -> Result<File> {
        let model = ActiveModel {
            download_token: Set(uuid::Uuid::new_v4().simple().to_string()),
            original_name: Set(original_name.to_string()),
            stored_name: Set(stored_name.to_string()),
            file_size: Set(*file_size),
            file_type: Set(file_type.to_string()),
            user_id: Set(user_id),
            created_at: Set(chrono::Utc::now().timestamp()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("上传文件记录失败: {e}")))?;

        Ok(result.into_file())
    }

    /// 通过下载令牌获取文件
    pub async fn get_file_by_token_impl(&self, token: &str) -> Result<Option<File>> {
        let result = Files::find_by_id(token.to_string())
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询文件失败: {e}")))?;

        Ok(result.map(|m| m.into_file()))
    }

    pub async fn list_files_by_user_impl(&self, user_id: i64) -> Result<Vec<File>> {
        let models = Files::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户文件失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_file()).collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::sea_orm_storage::test_support::{memory_storage, teacher_request};

    #[tokio::test]
    async fn test_upload_and_lookup_by_token() {
        let storage = memory_storage().await;
        let teacher = storage
            .create_user_impl(teacher_request("teacher01"))
            .await
            .unwrap();

        let file = storage
            .upload_file_impl("plan.pdf", "abc.pdf", &2048, "application/pdf", teacher.id)
            .await
            .unwrap();
        assert_eq!(file.download_token.len(), 32);

        let found = storage
            .get_file_by_token_impl(&file.download_token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.original_name, "plan.pdf");
        assert_eq!(found.stored_name, "abc.pdf");
        assert!(storage.get_file_by_token_impl("missing").await.unwrap().is_none());

        storage
            .upload_file_impl("notes.txt", "def.txt", &64, "text/plain", teacher.id)
            .await
            .unwrap();
        let owned = storage.list_files_by_user_impl(teacher.id).await.unwrap();
        assert_eq!(owned.len(), 2);
        assert!(storage.list_files_by_user_impl(teacher.id + 1).await.unwrap().is_empty());
    }
}
