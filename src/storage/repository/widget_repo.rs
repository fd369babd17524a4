use super::lookup_repo::LookupRepository;
use super::morph::MorphRepository;
use super::soft_delete::{find_live, live};
use crate::error::{QrfeedzError, Result};
use crate::storage::entity::widget::{self, ActiveModel as WidgetActiveModel, Model as WidgetModel};
use chrono::Utc;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WidgetDefinition {
    pub canonical: String,
    pub name: String,
    pub description: Option<String>,
    pub widget_type: String, // widget_types.canonical
    pub settings: Option<Value>,
    pub is_progressable: bool,
    pub is_full_page: bool,
    pub view_component_namespace: String,
}

impl WidgetDefinition {
    pub fn new(canonical: &str, name: &str, widget_type: &str) -> Self {
        Self {
            canonical: canonical.to_string(),
            name: name.to_string(),
            description: None,
            widget_type: widget_type.to_string(),
            settings: None,
            is_progressable: true,
            is_full_page: false,
            view_component_namespace: format!("widgets.{}", canonical),
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn full_page(mut self) -> Self {
        self.is_full_page = true;
        self.is_progressable = false;
        self
    }

    pub fn settings(mut self, settings: Value) -> Self {
        self.settings = Some(settings);
        self
    }
}

/// Fields changed by a revision. `None` keeps the previous version's value.
#[derive(Debug, Default, Clone)]
pub struct WidgetRevision {
    pub name: Option<String>,
    pub description: Option<String>,
    pub settings: Option<Value>,
    pub view_component_namespace: Option<String>,
}

pub struct WidgetRepository;

impl WidgetRepository {
    /// Creates version 1 of a new widget group.
    pub async fn create<C: ConnectionTrait>(db: &C, def: WidgetDefinition) -> Result<WidgetModel> {
        let widget_type = LookupRepository::widget_type_by_canonical(db, &def.widget_type).await?;
        let now = Utc::now().timestamp();
        let am = WidgetActiveModel {
            uuid: Set(Uuid::new_v4().to_string()),
            group_uuid: Set(Uuid::new_v4().to_string()),
            version: Set(1),
            widget_type_id: Set(widget_type.id),
            name: Set(def.name),
            canonical: Set(def.canonical),
            description: Set(def.description),
            settings: Set(def.settings),
            is_progressable: Set(def.is_progressable),
            is_full_page: Set(def.is_full_page),
            view_component_namespace: Set(def.view_component_namespace),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        Ok(am.insert(db).await?)
    }

    pub async fn newest_by_canonical<C: ConnectionTrait>(
        db: &C,
        canonical: &str,
    ) -> Result<WidgetModel> {
        live::<widget::Entity>()
            .filter(widget::Column::Canonical.eq(canonical))
            .order_by_desc(widget::Column::Version)
            .one(db)
            .await?
            .ok_or_else(|| QrfeedzError::missing("widgets", "canonical", canonical))
    }

    pub async fn newest_in_group<C: ConnectionTrait>(
        db: &C,
        group_uuid: &str,
    ) -> Result<WidgetModel> {
        live::<widget::Entity>()
            .filter(widget::Column::GroupUuid.eq(group_uuid))
            .order_by_desc(widget::Column::Version)
            .one(db)
            .await?
            .ok_or_else(|| QrfeedzError::missing("widgets", "group_uuid", group_uuid))
    }

    pub async fn versions_of_group<C: ConnectionTrait>(
        db: &C,
        group_uuid: &str,
    ) -> Result<Vec<WidgetModel>> {
        Ok(live::<widget::Entity>()
            .filter(widget::Column::GroupUuid.eq(group_uuid))
            .order_by_asc(widget::Column::Version)
            .all(db)
            .await?)
    }

    /// Soft-deleted versions still hold their number.
    async fn next_version<C: ConnectionTrait>(db: &C, group_uuid: &str) -> Result<i32> {
        let newest = widget::Entity::find()
            .filter(widget::Column::GroupUuid.eq(group_uuid))
            .order_by_desc(widget::Column::Version)
            .one(db)
            .await?;
        Ok(newest.map_or(1, |m| m.version + 1))
    }

    /// Writes a new version after the newest one of the widget's group.
    /// Existing rows are left untouched so instances keep their version.
    pub async fn revise<C: ConnectionTrait>(
        db: &C,
        widget_id: i64,
        revision: WidgetRevision,
    ) -> Result<WidgetModel> {
        let base = find_live::<widget::Entity, _>(db, widget_id)
            .await?
            .ok_or_else(|| QrfeedzError::missing("widgets", "id", widget_id))?;
        let version = Self::next_version(db, &base.group_uuid).await?;

        let now = Utc::now().timestamp();
        let am = WidgetActiveModel {
            uuid: Set(Uuid::new_v4().to_string()),
            group_uuid: Set(base.group_uuid.clone()),
            version: Set(version),
            widget_type_id: Set(base.widget_type_id),
            name: Set(revision.name.unwrap_or_else(|| base.name.clone())),
            canonical: Set(base.canonical.clone()),
            description: Set(revision.description.or_else(|| base.description.clone())),
            settings: Set(revision.settings.or_else(|| base.settings.clone())),
            is_progressable: Set(base.is_progressable),
            is_full_page: Set(base.is_full_page),
            view_component_namespace: Set(revision
                .view_component_namespace
                .unwrap_or_else(|| base.view_component_namespace.clone())),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        let revised = am.insert(db).await?;
        MorphRepository::copy_captions(db, &base, &revised).await?;

        info!(
            "widget {} revised: v{} -> v{}",
            revised.canonical, base.version, revised.version
        );
        Ok(revised)
    }
}
