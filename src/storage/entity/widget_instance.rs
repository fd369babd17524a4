use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "widget_instances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub uuid: String,
    pub question_instance_id: Option<i64>,
    pub widget_id: i64, // exact widget version
    pub index: Option<i32>,
    pub widget_instance_id: Option<i64>, // parent, set on conditional children
    pub when: Option<Json>,
    pub then: Option<Json>,
    pub data: Option<Json>,
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
        belongs_to = "super::widget::Entity",
        from = "Column::WidgetId",
        to = "super::widget::Column::Id"
    )]
    Widget,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::WidgetInstanceId",
        to = "Column::Id"
    )]
    Parent,
}

impl Related<super::question_instance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuestionInstance.def()
    }
}

impl Related<super::widget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Widget.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
