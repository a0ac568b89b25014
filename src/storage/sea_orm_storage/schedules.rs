//! 课表存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::schedule_items::{
    ActiveModel as ItemActiveModel, Column as ItemColumn, Entity as ScheduleItems,
};
use crate::entity::schedules::{ActiveModel, Column, Entity as Schedules};
use crate::entity::subjects::{Column as SubjectColumn, Entity as Subjects};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, SchoolError};
use crate::models::schedules::{
    entities::{Schedule, ScheduleDetail, ScheduleItem, ScheduleSource, WeekdayEntry},
    requests::{CreateScheduleRequest, ScheduleItemInput, UpdateScheduleRequest},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

// 写入条目
async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    schedule_id: i64,
    items: Vec<ScheduleItemInput>,
) -> Result<()> {
    if items.is_empty() {
        return Ok(());
    }

    let models = items.into_iter().map(|item| ItemActiveModel {
        schedule_id: Set(schedule_id),
        day_of_week: Set(item.day_of_week),
        period: Set(item.period),
        start_time: Set(item.start_time),
        end_time: Set(item.end_time),
        class_id: Set(item.class_id),
        subject_id: Set(item.subject_id),
        teacher_id: Set(item.teacher_id),
        room: Set(item.room),
        ..Default::default()
    });

    ScheduleItems::insert_many(models)
        .exec(conn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("写入课表条目失败: {e}")))?;

    Ok(())
}

// 清除其它启用课表
async fn deactivate_others<C: ConnectionTrait>(conn: &C, keep_id: Option<i64>) -> Result<()> {
    let mut update = Schedules::update_many()
        .col_expr(Column::IsActive, Expr::value(false))
        .filter(Column::IsActive.eq(true));

    if let Some(id) = keep_id {
        update = update.filter(Column::Id.ne(id));
    }

    update
        .exec(conn)
        .await
        .map_err(|e| SchoolError::database_operation(format!("停用课表失败: {e}")))?;

    Ok(())
}

impl SeaOrmStorage {
    /// 创建课表及其条目
    pub async fn create_schedule_impl(&self, req: CreateScheduleRequest) -> Result<ScheduleDetail> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        if req.is_active {
            deactivate_others(&txn, None).await?;
        }

        let model = ActiveModel {
            name: Set(req.name),
            academic_year_id: Set(req.academic_year_id),
            is_active: Set(req.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let schedule = model
            .insert(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("创建课表失败: {e}")))?;

        insert_items(&txn, schedule.id, req.items).await?;

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        let items = self.list_schedule_items(schedule.id).await?;
        Ok(ScheduleDetail {
            schedule: schedule.into_schedule(),
            items,
        })
    }

    async fn list_schedule_items(&self, schedule_id: i64) -> Result<Vec<ScheduleItem>> {
        let items = ScheduleItems::find()
            .filter(ItemColumn::ScheduleId.eq(schedule_id))
            .order_by_asc(ItemColumn::DayOfWeek)
            .order_by_asc(ItemColumn::Period)
            .order_by_asc(ItemColumn::StartTime)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询课表条目失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_schedule_item()).collect())
    }

    pub async fn get_schedule_by_id_impl(&self, id: i64) -> Result<Option<ScheduleDetail>> {
        let schedule = Schedules::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询课表失败: {e}")))?;

        match schedule {
            Some(schedule) => {
                let items = self.list_schedule_items(schedule.id).await?;
                Ok(Some(ScheduleDetail {
                    schedule: schedule.into_schedule(),
                    items,
                }))
            }
            None => Ok(None),
        }
    }

    pub async fn list_schedules_impl(&self) -> Result<Vec<Schedule>> {
        let schedules = Schedules::find()
            .order_by_desc(Column::IsActive)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询课表列表失败: {e}")))?;

        Ok(schedules.into_iter().map(|m| m.into_schedule()).collect())
    }

    /// 更新课表，items 提供时整体替换
    pub async fn update_schedule_impl(
        &self,
        id: i64,
        update: UpdateScheduleRequest,
    ) -> Result<Option<ScheduleDetail>> {
        let exists = Schedules::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询课表失败: {e}")))?;
        if exists.is_none() {
            return Ok(None);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(academic_year_id) = update.academic_year_id {
            model.academic_year_id = Set(Some(academic_year_id));
        }

        model
            .update(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新课表失败: {e}")))?;

        if let Some(items) = update.items {
            ScheduleItems::delete_many()
                .filter(ItemColumn::ScheduleId.eq(id))
                .exec(&txn)
                .await
                .map_err(|e| SchoolError::database_operation(format!("清除课表条目失败: {e}")))?;
            insert_items(&txn, id, items).await?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_schedule_by_id_impl(id).await
    }

    pub async fn delete_schedule_impl(&self, id: i64) -> Result<bool> {
        let result = Schedules::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除课表失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 启用课表，同时停用其它课表
    pub async fn activate_schedule_impl(&self, id: i64) -> Result<Option<Schedule>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        deactivate_others(&txn, Some(id)).await?;

        let updated = Schedules::update_many()
            .col_expr(Column::IsActive, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| SchoolError::database_operation(format!("启用课表失败: {e}")))?;

        if updated.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| SchoolError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(None);
        }

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(self.get_schedule_by_id_impl(id).await?.map(|d| d.schedule))
    }

    pub async fn get_active_schedule_impl(&self) -> Result<Option<ScheduleDetail>> {
        let active = Schedules::find()
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询启用课表失败: {e}")))?;

        match active {
            Some(schedule) => self.get_schedule_by_id_impl(schedule.id).await,
            None => Ok(None),
        }
    }

    /// 启用课表在某个星期几的条目，班级、科目、教师名称已解析
    pub async fn list_active_weekday_entries_impl(
        &self,
        day: u32,
    ) -> Result<Option<(Schedule, Vec<WeekdayEntry>)>> {
        let Some(schedule) = Schedules::find()
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询启用课表失败: {e}")))?
        else {
            return Ok(None);
        };

        let items = ScheduleItems::find()
            .filter(ItemColumn::ScheduleId.eq(schedule.id))
            .filter(ItemColumn::DayOfWeek.eq(day as i32))
            .order_by_asc(ItemColumn::Period)
            .order_by_asc(ItemColumn::StartTime)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询课表条目失败: {e}")))?;

        let class_ids: Vec<i64> = items.iter().map(|i| i.class_id).collect();
        let subject_ids: Vec<i64> = items.iter().map(|i| i.subject_id).collect();
        let teacher_ids: Vec<i64> = items.iter().filter_map(|i| i.teacher_id).collect();

        let class_names: HashMap<i64, String> = Classes::find()
            .select_only()
            .column(ClassColumn::Id)
            .column(ClassColumn::Name)
            .filter(ClassColumn::Id.is_in(class_ids))
            .into_tuple::<(i64, String)>()
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级名称失败: {e}")))?
            .into_iter()
            .collect();

        let subject_names: HashMap<i64, String> = Subjects::find()
            .select_only()
            .column(SubjectColumn::Id)
            .column(SubjectColumn::Name)
            .filter(SubjectColumn::Id.is_in(subject_ids))
            .into_tuple::<(i64, String)>()
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询科目名称失败: {e}")))?
            .into_iter()
            .collect();

        let usernames: HashMap<i64, String> = Users::find()
            .select_only()
            .column(UserColumn::Id)
            .column(UserColumn::Username)
            .filter(UserColumn::Id.is_in(teacher_ids))
            .into_tuple::<(i64, String)>()
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询教师名称失败: {e}")))?
            .into_iter()
            .collect();

        let entries = items
            .into_iter()
            .map(|item| WeekdayEntry {
                source: ScheduleSource::Active,
                day_of_week: day,
                period: item.period,
                start_time: item.start_time,
                end_time: item.end_time,
                class_id: Some(item.class_id),
                class_name: class_names.get(&item.class_id).cloned().unwrap_or_default(),
                subject_id: Some(item.subject_id),
                subject_name: subject_names
                    .get(&item.subject_id)
                    .cloned()
                    .unwrap_or_default(),
                teacher_id: item.teacher_id,
                teacher: item.teacher_id.and_then(|id| usernames.get(&id).cloned()),
                room: item.room,
            })
            .collect();

        Ok(Some((schedule.into_schedule(), entries)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classes::requests::CreateClassRequest;
    use crate::models::subjects::requests::CreateSubjectRequest;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, teacher_request};

    async fn item(storage: &SeaOrmStorage, day: i32, period: i32) -> ScheduleItemInput {
        let teacher = storage
            .get_user_by_username_or_email_impl("teacher01")
            .await
            .unwrap();
        let teacher = match teacher {
            Some(t) => t,
            None => storage
                .create_user_impl(teacher_request("teacher01"))
                .await
                .unwrap(),
        };
        let class = storage
            .create_class_impl(CreateClassRequest {
                name: format!("class-{day}-{period}"),
                grade_level: None,
                academic_year_id: None,
                description: None,
            })
            .await
            .unwrap();
        let subject = storage
            .create_subject_impl(CreateSubjectRequest {
                name: format!("subject-{day}-{period}"),
                code: None,
                description: None,
            })
            .await
            .unwrap();
        ScheduleItemInput {
            day_of_week: day,
            period,
            start_time: format!("{:02}:00", 7 + period),
            end_time: format!("{:02}:45", 7 + period),
            class_id: class.id,
            subject_id: subject.id,
            teacher_id: Some(teacher.id),
            room: Some("R101".into()),
        }
    }

    #[tokio::test]
    async fn test_single_active_schedule() {
        let storage = memory_storage().await;
        let first = storage
            .create_schedule_impl(CreateScheduleRequest {
                name: "Term 1".into(),
                academic_year_id: None,
                is_active: true,
                items: vec![],
            })
            .await
            .unwrap();
        let second = storage
            .create_schedule_impl(CreateScheduleRequest {
                name: "Term 2".into(),
                academic_year_id: None,
                is_active: true,
                items: vec![],
            })
            .await
            .unwrap();

        let active = storage.get_active_schedule_impl().await.unwrap().unwrap();
        assert_eq!(active.schedule.id, second.schedule.id);

        storage
            .activate_schedule_impl(first.schedule.id)
            .await
            .unwrap()
            .unwrap();
        let all = storage.list_schedules_impl().await.unwrap();
        assert_eq!(all.iter().filter(|s| s.is_active).count(), 1);
        assert!(storage.activate_schedule_impl(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_items_and_weekday_lookup() {
        let storage = memory_storage().await;
        let monday_2 = item(&storage, 1, 2).await;
        let monday_1 = item(&storage, 1, 1).await;
        let tuesday = item(&storage, 2, 1).await;

        let detail = storage
            .create_schedule_impl(CreateScheduleRequest {
                name: "Term 1".into(),
                academic_year_id: None,
                is_active: true,
                items: vec![monday_2.clone(), tuesday],
            })
            .await
            .unwrap();
        assert_eq!(detail.items.len(), 2);

        let updated = storage
            .update_schedule_impl(
                detail.schedule.id,
                UpdateScheduleRequest {
                    name: None,
                    academic_year_id: None,
                    items: Some(vec![monday_2, monday_1]),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.items.len(), 2);
        assert!(updated.items.iter().all(|i| i.day_of_week == 1));

        let (schedule, entries) = storage
            .list_active_weekday_entries_impl(1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(schedule.id, detail.schedule.id);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].period, 1);
        assert_eq!(entries[0].class_name, "class-1-1");
        assert_eq!(entries[0].teacher.as_deref(), Some("teacher01"));
        assert_eq!(entries[0].source, ScheduleSource::Active);

        let (_, tuesday_entries) = storage
            .list_active_weekday_entries_impl(2)
            .await
            .unwrap()
            .unwrap();
        assert!(tuesday_entries.is_empty());
    }

    #[tokio::test]
    async fn test_weekday_lookup_without_active_schedule() {
        let storage = memory_storage().await;
        assert!(storage.list_active_weekday_entries_impl(1).await.unwrap().is_none());
    }
}
