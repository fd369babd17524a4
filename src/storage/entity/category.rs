use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// System-assigned grouping (hotel, restaurant, product ...). Users never create these.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub canonical: String,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::categorizable::Entity")]
    Categorizable,
}

impl Related<super::categorizable::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categorizable.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
