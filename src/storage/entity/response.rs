use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "responses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_instance_id: String, // groups the answers of one visit
    pub question_instance_id: i64,
    pub widget_instance_id: i64,
    pub value: Option<Json>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::question_instance::Entity",
        from = "Column::QuestionInstanceId",
        to = "super::question_instance::Column::Id"
    )]
    QuestionInstance,
    #[sea_orm(
        belongs_to = "super::widget_instance::Entity",
        from = "Column::WidgetInstanceId",
        to = "super::widget_instance::Column::Id"
    )]
    WidgetInstance,
}

impl Related<super::question_instance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuestionInstance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
