//! 学年存储操作

use super::SeaOrmStorage;
use crate::entity::academic_years::{ActiveModel, Column, Entity as AcademicYears};
use crate::errors::{Result, SchoolError};
use crate::models::academic_years::{
    entities::AcademicYear,
    requests::{CreateAcademicYearRequest, UpdateAcademicYearRequest},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

impl SeaOrmStorage {
    /// 创建学年；is_current 为真时同一事务内清除其它学年的当前标记
    pub async fn create_academic_year_impl(
        &self,
        req: CreateAcademicYearRequest,
    ) -> Result<AcademicYear> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        if req.is_current {
            AcademicYears::update_many()
                .col_expr(Column::IsCurrent, Expr::value(false))
                .filter(Column::IsCurrent.eq(true))
                .exec(&txn)
                .await
                .map_err(|e| SchoolError::database_operation(format!("清除当前学年失败: {e}")))?;
        }

        let model = ActiveModel {
            name: Set(req.name),
            start_date: Set(req.start_date.format(DATE_FORMAT).to_string()),
            end_date: Set(req.end_date.format(DATE_FORMAT).to_string()),
            is_current: Set(req.is_current),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("创建学年失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_academic_year())
    }

    pub async fn get_academic_year_by_id_impl(&self, id: i64) -> Result<Option<AcademicYear>> {
        let result = AcademicYears::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询学年失败: {e}")))?;

        Ok(result.map(|m| m.into_academic_year()))
    }

    pub async fn get_current_academic_year_impl(&self) -> Result<Option<AcademicYear>> {
        let result = AcademicYears::find()
            .filter(Column::IsCurrent.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询当前学年失败: {e}")))?;

        Ok(result.map(|m| m.into_academic_year()))
    }

    /// 按开始日期倒序
    pub async fn list_academic_years_impl(&self) -> Result<Vec<AcademicYear>> {
        let result = AcademicYears::find()
            .order_by_desc(Column::StartDate)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询学年列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_academic_year()).collect())
    }

    pub async fn update_academic_year_impl(
        &self,
        id: i64,
        update: UpdateAcademicYearRequest,
    ) -> Result<Option<AcademicYear>> {
        if self.get_academic_year_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(start_date) = update.start_date {
            model.start_date = Set(start_date.format(DATE_FORMAT).to_string());
        }
        if let Some(end_date) = update.end_date {
            model.end_date = Set(end_date.format(DATE_FORMAT).to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新学年失败: {e}")))?;

        self.get_academic_year_by_id_impl(id).await
    }

    pub async fn delete_academic_year_impl(&self, id: i64) -> Result<bool> {
        let result = AcademicYears::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除学年失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 设为唯一的当前学年
    pub async fn activate_academic_year_impl(&self, id: i64) -> Result<Option<AcademicYear>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        AcademicYears::update_many()
            .col_expr(Column::IsCurrent, Expr::value(false))
            .filter(Column::Id.ne(id))
            .filter(Column::IsCurrent.eq(true))
            .exec(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("清除当前学年失败: {e}")))?;

        let updated = AcademicYears::update_many()
            .col_expr(Column::IsCurrent, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("设置当前学年失败: {e}")))?;

        if updated.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| SchoolError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(None);
        }

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_academic_year_by_id_impl(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use chrono::NaiveDate;

    fn year(name: &str, start: (i32, u32, u32), is_current: bool) -> CreateAcademicYearRequest {
        let start_date = NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap();
        CreateAcademicYearRequest {
            name: name.to_string(),
            start_date,
            end_date: start_date + chrono::Duration::days(300),
            is_current,
        }
    }

    #[tokio::test]
    async fn test_only_one_current_year() {
        let storage = memory_storage().await;
        let first = storage
            .create_academic_year_impl(year("2024-2025", (2024, 9, 1), true))
            .await
            .unwrap();
        let second = storage
            .create_academic_year_impl(year("2025-2026", (2025, 9, 1), true))
            .await
            .unwrap();

        let current = storage.get_current_academic_year_impl().await.unwrap().unwrap();
        assert_eq!(current.id, second.id);

        storage.activate_academic_year_impl(first.id).await.unwrap();
        let current = storage.get_current_academic_year_impl().await.unwrap().unwrap();
        assert_eq!(current.id, first.id);

        let all = storage.list_academic_years_impl().await.unwrap();
        assert_eq!(all.iter().filter(|y| y.is_current).count(), 1);
        // 按开始日期倒序
        assert_eq!(all[0].id, second.id);
    }

    #[tokio::test]
    async fn test_activate_missing_year() {
        let storage = memory_storage().await;
        storage
            .create_academic_year_impl(year("2024-2025", (2024, 9, 1), true))
            .await
            .unwrap();
        assert!(storage.activate_academic_year_impl(999).await.unwrap().is_none());
        // 回滚后原当前学年保持不变
        assert!(storage.get_current_academic_year_impl().await.unwrap().is_some());
    }
}
