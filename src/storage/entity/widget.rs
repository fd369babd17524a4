use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One version of a widget definition. Revisions share `group_uuid` and `canonical`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "widgets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub uuid: String,
    pub group_uuid: String,
    pub version: i32,
    pub widget_type_id: i64,
    pub name: String,
    pub canonical: String,
    pub description: Option<String>,
    pub settings: Option<Json>, // defaults, overridden per widget instance
    pub is_progressable: bool, // counts towards the questionnaire progress
    pub is_full_page: bool,
    pub view_component_namespace: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::widget_type::Entity",
        from = "Column::WidgetTypeId",
        to = "super::widget_type::Column::Id"
    )]
    WidgetType,
    #[sea_orm(has_many = "super::widget_instance::Entity")]
    WidgetInstance,
}

impl Related<super::widget_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WidgetType.def()
    }
}

impl Related<super::widget_instance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WidgetInstance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
