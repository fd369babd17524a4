use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One version of a question. Every revision is a new row sharing `group_uuid`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub uuid: String,
    pub group_uuid: String,
    pub version: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::question_instance::Entity")]
    QuestionInstance,
}

impl Related<super::question_instance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuestionInstance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
