use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A caption in one locale, attached to any morphable row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "localables")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub model_type: String,
    pub model_id: i64,
    pub locale_id: i64,
    pub caption: String,
    pub placeholder: Option<String>, // e.g. "promo-title" when a widget has several texts
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::locale::Entity",
        from = "Column::LocaleId",
        to = "super::locale::Column::Id"
    )]
    Locale,
}

impl Related<super::locale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Locale.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
