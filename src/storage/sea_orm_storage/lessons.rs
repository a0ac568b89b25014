//! 教学日志存储操作

use super::SeaOrmStorage;
use crate::entity::lessons::{ActiveModel, Column, Entity as Lessons};
use crate::errors::{Result, SchoolError};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    common::pagination::normalize_page,
    lessons::{
        entities::{Lesson, LessonSlot},
        requests::{LessonChanges, LessonListQuery, NewLesson},
        responses::LessonListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_lesson_impl(&self, lesson: NewLesson) -> Result<Lesson> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            teacher_id: Set(lesson.slot.teacher_id),
            class_id: Set(lesson.slot.class_id),
            subject_id: Set(lesson.slot.subject_id),
            lesson_day: Set(lesson.slot.lesson_day),
            topic: Set(lesson.topic),
            content: Set(lesson.content),
            homework: Set(lesson.homework),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("创建教学日志失败: {e}")))?;

        Ok(result.into_lesson())
    }

    pub async fn get_lesson_by_id_impl(&self, id: i64) -> Result<Option<Lesson>> {
        let result = Lessons::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询教学日志失败: {e}")))?;

        Ok(result.map(|m| m.into_lesson()))
    }

    /// 按四元组查找已有日志，exclude_id 用于更新时排除自身
    pub async fn find_lesson_by_slot_impl(
        &self,
        slot: LessonSlot,
        exclude_id: Option<i64>,
    ) -> Result<Option<Lesson>> {
        let mut select = Lessons::find()
            .filter(Column::TeacherId.eq(slot.teacher_id))
            .filter(Column::ClassId.eq(slot.class_id))
            .filter(Column::SubjectId.eq(slot.subject_id))
            .filter(Column::LessonDay.eq(slot.lesson_day));

        if let Some(id) = exclude_id {
            select = select.filter(Column::Id.ne(id));
        }

        let result = select
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询教学日志失败: {e}")))?;

        Ok(result.map(|m| m.into_lesson()))
    }

    /// 分页列出教学日志，按授课日倒序
    pub async fn list_lessons_with_pagination_impl(
        &self,
        query: LessonListQuery,
    ) -> Result<LessonListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Lessons::find();

        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if let Some(from) = query.from {
            select = select.filter(Column::LessonDay.gte(from));
        }
        if let Some(to) = query.to {
            select = select.filter(Column::LessonDay.lte(to));
        }

        let paginator = select
            .order_by_desc(Column::LessonDay)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询教学日志总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询教学日志页数失败: {e}")))?;

        let lessons = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询教学日志列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: lessons.into_iter().map(|m| m.into_lesson()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn update_lesson_impl(
        &self,
        id: i64,
        changes: LessonChanges,
    ) -> Result<Option<Lesson>> {
        if self.get_lesson_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            teacher_id: Set(changes.slot.teacher_id),
            class_id: Set(changes.slot.class_id),
            subject_id: Set(changes.slot.subject_id),
            lesson_day: Set(changes.slot.lesson_day),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(topic) = changes.topic {
            model.topic = Set(topic);
        }
        if let Some(content) = changes.content {
            model.content = Set(Some(content));
        }
        if let Some(homework) = changes.homework {
            model.homework = Set(Some(homework));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新教学日志失败: {e}")))?;

        self.get_lesson_by_id_impl(id).await
    }

    pub async fn delete_lesson_impl(&self, id: i64) -> Result<bool> {
        let result = Lessons::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除教学日志失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计 [from, to] 区间内的日志数量
    pub async fn count_lessons_impl(
        &self,
        teacher_id: Option<i64>,
        from: i64,
        to: i64,
    ) -> Result<u64> {
        let mut select = Lessons::find()
            .filter(Column::LessonDay.gte(from))
            .filter(Column::LessonDay.lte(to));

        if let Some(teacher_id) = teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        select
            .count(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("统计教学日志失败: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classes::requests::CreateClassRequest;
    use crate::models::subjects::requests::CreateSubjectRequest;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, teacher_request};

    const DAY: i64 = 86_400;
    const MONDAY: i64 = 1_704_067_200; // 2024-01-01T00:00:00Z

    async fn fixture(storage: &SeaOrmStorage) -> LessonSlot {
        let teacher = storage
            .create_user_impl(teacher_request("teacher01"))
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
                name: "Mathematics".into(),
                code: None,
                description: None,
            })
            .await
            .unwrap();
        LessonSlot {
            teacher_id: teacher.id,
            class_id: class.id,
            subject_id: subject.id,
            lesson_day: MONDAY,
        }
    }

    fn new_lesson(slot: LessonSlot, topic: &str) -> NewLesson {
        NewLesson {
            slot,
            topic: topic.to_string(),
            content: None,
            homework: None,
        }
    }

    #[tokio::test]
    async fn test_same_slot_is_rejected_by_index() {
        let storage = memory_storage().await;
        let slot = fixture(&storage).await;

        let lesson = storage
            .create_lesson_impl(new_lesson(slot, "Fractions"))
            .await
            .unwrap();
        assert_eq!(lesson.slot(), slot);

        let found = storage.find_lesson_by_slot_impl(slot, None).await.unwrap();
        assert_eq!(found.map(|l| l.id), Some(lesson.id));
        assert!(
            storage
                .find_lesson_by_slot_impl(slot, Some(lesson.id))
                .await
                .unwrap()
                .is_none()
        );

        let err = storage
            .create_lesson_impl(new_lesson(slot, "Fractions again"))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());

        // 次日可以再记一条
        let next_day = LessonSlot {
            lesson_day: MONDAY + DAY,
            ..slot
        };
        storage
            .create_lesson_impl(new_lesson(next_day, "Decimals"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_and_count_by_range() {
        let storage = memory_storage().await;
        let slot = fixture(&storage).await;
        for offset in 0..3 {
            let day = LessonSlot {
                lesson_day: MONDAY + offset * DAY,
                ..slot
            };
            storage
                .create_lesson_impl(new_lesson(day, "Topic"))
                .await
                .unwrap();
        }

        let listed = storage
            .list_lessons_with_pagination_impl(LessonListQuery {
                teacher_id: Some(slot.teacher_id),
                from: Some(MONDAY + DAY),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(listed.pagination.total, 2);
        assert_eq!(listed.items[0].lesson_day.timestamp(), MONDAY + 2 * DAY);

        assert_eq!(
            storage
                .count_lessons_impl(Some(slot.teacher_id), MONDAY, MONDAY)
                .await
                .unwrap(),
            1
        );
        assert_eq!(
            storage
                .count_lessons_impl(None, MONDAY, MONDAY + 6 * DAY)
                .await
                .unwrap(),
            3
        );
    }
}
