use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "questionnaires")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub uuid: String, // encoded in the QR code
    pub client_id: i64,
    pub location_id: Option<i64>,
    pub locale_id: Option<i64>,
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub color_primary: String,
    pub color_secondary: String,
    pub file_logo: Option<String>,
    pub is_active: bool, // overrides the starts_at / ends_at window
    pub data: Option<Json>,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id"
    )]
    Location,
    #[sea_orm(has_many = "super::page_instance::Entity")]
    PageInstance,
    #[sea_orm(has_many = "super::openai_prompt::Entity")]
    OpenaiPrompt,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::page_instance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PageInstance.def()
    }
}

impl Related<super::openai_prompt::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OpenaiPrompt.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
