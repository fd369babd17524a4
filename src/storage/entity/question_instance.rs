use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "question_instances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub uuid: String,
    pub page_instance_id: i64,
    pub question_id: i64, // exact question version shown to the visitor
    pub index: i32,
    pub is_analytical: bool, // value feeds the reports
    pub is_used_for_personal_data: bool, // visible to GDPR profiles only
    pub is_required: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::page_instance::Entity",
        from = "Column::PageInstanceId",
        to = "super::page_instance::Column::Id"
    )]
    PageInstance,
    #[sea_orm(
        belongs_to = "super::question::Entity",
        from = "Column::QuestionId",
        to = "super::question::Column::Id"
    )]
    Question,
    #[sea_orm(has_many = "super::widget_instance::Entity")]
    WidgetInstance,
    #[sea_orm(has_many = "super::response::Entity")]
    Response,
}

impl Related<super::page_instance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PageInstance.def()
    }
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl Related<super::widget_instance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WidgetInstance.def()
    }
}

impl Related<super::response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Response.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
