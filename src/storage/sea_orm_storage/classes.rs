use super::SeaOrmStorage;
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::errors::{Result, SchoolError};
use crate::models::{
    PaginationInfo,
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
    common::pagination::normalize_page,
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            grade_level: Set(req.grade_level),
            academic_year_id: Set(req.academic_year_id),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_class())
    }

    pub async fn get_class_by_id_impl(&self, id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 分页列出班级
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Classes::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Name.like(like_contains(search)))
                    .add(Column::GradeLevel.like(like_contains(search))),
            );
        }

        if let Some(academic_year_id) = query.academic_year_id {
            select = select.filter(Column::AcademicYearId.eq(academic_year_id));
        }

        let paginator = select
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级页数失败: {e}")))?;

        let classes = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(ClassListResponse {
            items: classes.into_iter().map(|m| m.into_class()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn update_class_impl(
        &self,
        id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        if self.get_class_by_id_impl(id).await?.is_none() {
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
        if let Some(grade_level) = update.grade_level {
            model.grade_level = Set(Some(grade_level));
        }
        if let Some(academic_year_id) = update.academic_year_id {
            model.academic_year_id = Set(Some(academic_year_id));
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新班级失败: {e}")))?;

        self.get_class_by_id_impl(id).await
    }

    /// 删除班级（教学日志、课表条目随外键级联删除）
    pub async fn delete_class_impl(&self, id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_classes_impl(&self) -> Result<u64> {
        Classes::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("统计班级数量失败: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::memory_storage;

    fn class_request(name: &str, grade: &str) -> CreateClassRequest {
        CreateClassRequest {
            name: name.to_string(),
            grade_level: Some(grade.to_string()),
            academic_year_id: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_class_crud() {
        let storage = memory_storage().await;
        let class = storage
            .create_class_impl(class_request("7A", "Grade 7"))
            .await
            .unwrap();

        let updated = storage
            .update_class_impl(
                class.id,
                UpdateClassRequest {
                    name: None,
                    grade_level: None,
                    academic_year_id: None,
                    description: Some("homeroom".into()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "7A");
        assert_eq!(updated.description.as_deref(), Some("homeroom"));

        assert!(storage.delete_class_impl(class.id).await.unwrap());
        assert!(storage.get_class_by_id_impl(class.id).await.unwrap().is_none());
        assert!(!storage.delete_class_impl(class.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_class_name() {
        let storage = memory_storage().await;
        storage
            .create_class_impl(class_request("7A", "Grade 7"))
            .await
            .unwrap();
        let err = storage
            .create_class_impl(class_request("7A", "Grade 7"))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let storage = memory_storage().await;
        storage
            .create_class_impl(class_request("7A", "Grade 7"))
            .await
            .unwrap();
        storage
            .create_class_impl(class_request("8_B", "Grade 8"))
            .await
            .unwrap();

        let result = storage
            .list_classes_with_pagination_impl(ClassListQuery {
                search: Some("_".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].name, "8_B");
        assert_eq!(storage.count_classes_impl().await.unwrap(), 2);
    }
}
