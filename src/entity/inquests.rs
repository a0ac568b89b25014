//! 问询实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "inquests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub created_by: i64,
    pub subject: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub lesson_id: Option<i64>,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub response: Option<String>,
    pub responded_at: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub decision: Option<String>,
    pub completed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TeacherId",
        to = "super::users::Column::Id"
    )]
    Teacher,
    #[sea_orm(
        belongs_to = "super::lessons::Entity",
        from = "Column::LessonId",
        to = "super::lessons::Column::Id"
    )]
    Lesson,
}

impl Related<super::lessons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lesson.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_inquest(self) -> crate::models::inquests::entities::Inquest {
        use crate::models::inquests::entities::{Inquest, InquestStatus};

        Inquest {
            id: self.id,
            teacher_id: self.teacher_id,
            created_by: self.created_by,
            subject: self.subject,
            description: self.description,
            lesson_id: self.lesson_id,
            status: self
                .status
                .parse::<InquestStatus>()
                .unwrap_or(InquestStatus::Pending),
            response: self.response,
            responded_at: self.responded_at.map(super::from_unix),
            decision: self.decision,
            completed_at: self.completed_at.map(super::from_unix),
            created_at: super::from_unix(self.created_at),
            updated_at: super::from_unix(self.updated_at),
        }
    }
}
