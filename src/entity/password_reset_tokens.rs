//! 找回密码令牌实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "password_reset_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    #[sea_orm(unique)]
    pub token: String,
    pub expires_at: i64,
    pub used_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_password_reset_token(self) -> crate::models::auth::entities::PasswordResetToken {
        use crate::models::auth::entities::PasswordResetToken;

        PasswordResetToken {
            id: self.id,
            user_id: self.user_id,
            token: self.token,
            expires_at: super::from_unix(self.expires_at),
            used_at: self.used_at.map(super::from_unix),
            created_at: super::from_unix(self.created_at),
        }
    }
}
