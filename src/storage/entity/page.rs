use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A reusable page layout. Page instances place one inside a questionnaire.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub page_type_id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub canonical: String,
    pub description: Option<String>,
    pub view_component_namespace: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::page_type::Entity",
        from = "Column::PageTypeId",
        to = "super::page_type::Column::Id"
    )]
    PageType,
    #[sea_orm(has_many = "super::page_instance::Entity")]
    PageInstance,
}

impl Related<super::page_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PageType.def()
    }
}

impl Related<super::page_instance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PageInstance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
