use super::lookup_repo::LookupRepository;
use super::soft_delete::{find_live, live, SoftDeletes};
use crate::conditional::Conditional;
use crate::error::{QrfeedzError, Result};
use crate::storage::entity::{
    client, openai_prompt, page, page_instance, question_instance, questionnaire, response,
    widget_instance,
};
use chrono::Utc;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuestionnaireDefinition {
    pub client_id: i64,
    pub location_id: Option<i64>,
    pub locale_id: Option<i64>, // falls back to the client locale
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub color_primary: String,
    pub color_secondary: String,
    pub file_logo: Option<String>,
    pub data: Option<Value>,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
}

impl QuestionnaireDefinition {
    pub fn new(client_id: i64) -> Self {
        Self {
            client_id,
            location_id: None,
            locale_id: None,
            category_id: None,
            name: None,
            title: None,
            description: None,
            color_primary: "FFFFFF".to_string(),
            color_secondary: "000000".to_string(),
            file_logo: None,
            data: None,
            starts_at: None,
            ends_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BalanceType {
    #[default]
    Balanced,
    WorstCases,
    BestCases,
}

impl BalanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceType::Balanced => "balanced",
            BalanceType::WorstCases => "worst-cases",
            BalanceType::BestCases => "best-cases",
        }
    }
}

impl fmt::Display for BalanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BalanceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "balanced" => Ok(BalanceType::Balanced),
            "worst-cases" => Ok(BalanceType::WorstCases),
            "best-cases" => Ok(BalanceType::BestCases),
            other => Err(format!("unknown balance type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PromptDefinition {
    pub i_am_a_business_of: Option<String>,
    pub i_am_paying_attention_to: Option<String>,
    pub balance_type: BalanceType,
    pub should_be_email_aware: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionFlags {
    pub is_analytical: bool,
    pub is_used_for_personal_data: bool,
    pub is_required: bool,
}

impl Default for QuestionFlags {
    fn default() -> Self {
        Self {
            is_analytical: true,
            is_used_for_personal_data: false,
            is_required: false,
        }
    }
}

/// True when the questionnaire takes answers at `ts` (epoch seconds).
pub fn accepts_responses_at(q: &questionnaire::Model, ts: i64) -> bool {
    q.is_active
        && q.deleted_at.is_none()
        && q.starts_at.map_or(true, |start| start <= ts)
        && q.ends_at.map_or(true, |end| ts < end)
}

pub struct QuestionnaireRepository;

impl QuestionnaireRepository {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        def: QuestionnaireDefinition,
    ) -> Result<questionnaire::Model> {
        let client = find_live::<client::Entity, _>(db, def.client_id)
            .await?
            .ok_or_else(|| QrfeedzError::missing("clients", "id", def.client_id))?;

        if let (Some(start), Some(end)) = (def.starts_at, def.ends_at) {
            if end <= start {
                return Err(QrfeedzError::Refused(format!(
                    "questionnaire window ends ({}) before it starts ({})",
                    end, start
                )));
            }
        }

        let now = Utc::now().timestamp();
        let am = questionnaire::ActiveModel {
            uuid: Set(Uuid::new_v4().to_string()),
            client_id: Set(client.id),
            location_id: Set(def.location_id),
            locale_id: Set(Some(def.locale_id.unwrap_or(client.locale_id))),
            category_id: Set(def.category_id),
            name: Set(def.name),
            title: Set(def.title),
            description: Set(def.description),
            color_primary: Set(def.color_primary),
            color_secondary: Set(def.color_secondary),
            file_logo: Set(def.file_logo),
            is_active: Set(true),
            data: Set(def.data),
            starts_at: Set(def.starts_at),
            ends_at: Set(def.ends_at),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        let created = am.insert(db).await?;
        info!(
            "questionnaire #{} ({}) created for client {}",
            created.id, created.uuid, client.name
        );
        Ok(created)
    }

    pub async fn find_by_uuid<C: ConnectionTrait>(
        db: &C,
        uuid: &str,
    ) -> Result<questionnaire::Model> {
        live::<questionnaire::Entity>()
            .filter(questionnaire::Column::Uuid.eq(uuid))
            .one(db)
            .await?
            .ok_or_else(|| QrfeedzError::missing("questionnaires", "uuid", uuid))
    }

    pub async fn attach_prompt<C: ConnectionTrait>(
        db: &C,
        questionnaire_id: i64,
        prompt: PromptDefinition,
    ) -> Result<openai_prompt::Model> {
        let now = Utc::now().timestamp();
        let am = openai_prompt::ActiveModel {
            questionnaire_id: Set(questionnaire_id),
            prompt_i_am_a_business_of: Set(prompt.i_am_a_business_of),
            prompt_i_am_paying_attention_to: Set(prompt.i_am_paying_attention_to),
            balance_type: Set(prompt.balance_type.to_string()),
            should_be_email_aware: Set(prompt.should_be_email_aware),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        Ok(am.insert(db).await?)
    }

    /// Appends a page (by page canonical). `index` defaults to the next free slot.
    pub async fn add_page_instance<C: ConnectionTrait>(
        db: &C,
        questionnaire_id: i64,
        page_canonical: &str,
        name: &str,
        index: Option<i32>,
    ) -> Result<page_instance::Model> {
        let page = LookupRepository::page_by_canonical(db, page_canonical).await?;
        let index = match index {
            Some(i) => i,
            None => {
                Self::max_index::<page_instance::Entity, _>(
                    db,
                    page_instance::Column::Index,
                    page_instance::Column::QuestionnaireId,
                    questionnaire_id,
                )
                .await?
                    + 1
            }
        };

        let now = Utc::now().timestamp();
        let am = page_instance::ActiveModel {
            uuid: Set(Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
            page_id: Set(page.id),
            questionnaire_id: Set(questionnaire_id),
            index: Set(index),
            group: Set(None),
            view_component_override: Set(None),
            data: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        Ok(am.insert(db).await?)
    }

    pub async fn add_question_instance<C: ConnectionTrait>(
        db: &C,
        page_instance_id: i64,
        question_id: i64,
        flags: QuestionFlags,
    ) -> Result<question_instance::Model> {
        let index = Self::max_index::<question_instance::Entity, _>(
            db,
            question_instance::Column::Index,
            question_instance::Column::PageInstanceId,
            page_instance_id,
        )
        .await?
            + 1;

        let now = Utc::now().timestamp();
        let am = question_instance::ActiveModel {
            uuid: Set(Uuid::new_v4().to_string()),
            page_instance_id: Set(page_instance_id),
            question_id: Set(question_id),
            index: Set(index),
            is_analytical: Set(flags.is_analytical),
            is_used_for_personal_data: Set(flags.is_used_for_personal_data),
            is_required: Set(flags.is_required),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        Ok(am.insert(db).await?)
    }

    pub async fn add_widget_instance<C: ConnectionTrait>(
        db: &C,
        question_instance_id: i64,
        widget_id: i64,
        data: Option<Value>,
    ) -> Result<widget_instance::Model> {
        let index = Self::max_index::<widget_instance::Entity, _>(
            db,
            widget_instance::Column::Index,
            widget_instance::Column::QuestionInstanceId,
            question_instance_id,
        )
        .await?
            + 1;

        let now = Utc::now().timestamp();
        let am = widget_instance::ActiveModel {
            uuid: Set(Uuid::new_v4().to_string()),
            question_instance_id: Set(Some(question_instance_id)),
            widget_id: Set(widget_id),
            index: Set(Some(index)),
            widget_instance_id: Set(None),
            when: Set(None),
            then: Set(None),
            data: Set(data),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        Ok(am.insert(db).await?)
    }

    /// Adds a conditional child under `parent`. The child reuses the parent's
    /// widget unless `widget_id` names another one.
    pub async fn add_conditional<C: ConnectionTrait>(
        db: &C,
        parent: &widget_instance::Model,
        conditional: &Conditional,
        widget_id: Option<i64>,
    ) -> Result<widget_instance::Model> {
        let now = Utc::now().timestamp();
        let am = widget_instance::ActiveModel {
            uuid: Set(Uuid::new_v4().to_string()),
            question_instance_id: Set(parent.question_instance_id),
            widget_id: Set(widget_id.unwrap_or(parent.widget_id)),
            index: Set(None),
            widget_instance_id: Set(Some(parent.id)),
            when: Set(Some(conditional.when_json())),
            then: Set(Some(conditional.then_json())),
            data: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        Ok(am.insert(db).await?)
    }

    pub async fn conditionals_of<C: ConnectionTrait>(
        db: &C,
        parent_id: i64,
    ) -> Result<Vec<(widget_instance::Model, Conditional)>> {
        let children = live::<widget_instance::Entity>()
            .filter(widget_instance::Column::WidgetInstanceId.eq(parent_id))
            .order_by_asc(widget_instance::Column::Id)
            .all(db)
            .await?;

        let mut out = Vec::with_capacity(children.len());
        for child in children {
            let when = child.when.clone().unwrap_or(Value::Null);
            let then = child.then.clone().unwrap_or(Value::Null);
            let conditional = Conditional::from_json(&when, &then)?;
            out.push((child, conditional));
        }
        Ok(out)
    }

    /// Stores a visitor answer against the exact question / widget instance shown.
    pub async fn record_response<C: ConnectionTrait>(
        db: &C,
        session_instance_id: &str,
        question_instance_id: i64,
        widget_instance_id: i64,
        value: Option<Value>,
    ) -> Result<response::Model> {
        let wi = find_live::<widget_instance::Entity, _>(db, widget_instance_id)
            .await?
            .ok_or_else(|| QrfeedzError::missing("widget_instances", "id", widget_instance_id))?;
        if wi.question_instance_id != Some(question_instance_id) {
            return Err(QrfeedzError::Refused(format!(
                "widget instance #{} does not belong to question instance #{}",
                widget_instance_id, question_instance_id
            )));
        }

        let qi = find_live::<question_instance::Entity, _>(db, question_instance_id)
            .await?
            .ok_or_else(|| {
                QrfeedzError::missing("question_instances", "id", question_instance_id)
            })?;
        let pi = find_live::<page_instance::Entity, _>(db, qi.page_instance_id)
            .await?
            .ok_or_else(|| QrfeedzError::missing("page_instances", "id", qi.page_instance_id))?;
        let q = find_live::<questionnaire::Entity, _>(db, pi.questionnaire_id)
            .await?
            .ok_or_else(|| QrfeedzError::missing("questionnaires", "id", pi.questionnaire_id))?;

        let now = Utc::now().timestamp();
        if !accepts_responses_at(&q, now) {
            return Err(QrfeedzError::Refused(format!(
                "questionnaire {} is not accepting responses",
                q.uuid
            )));
        }

        let am = response::ActiveModel {
            session_instance_id: Set(session_instance_id.to_string()),
            question_instance_id: Set(question_instance_id),
            widget_instance_id: Set(widget_instance_id),
            value: Set(value),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        Ok(am.insert(db).await?)
    }

    /// Page instances of a questionnaire in display order, with their page layout.
    pub async fn pages_of<C: ConnectionTrait>(
        db: &C,
        questionnaire_id: i64,
    ) -> Result<Vec<(page_instance::Model, Option<page::Model>)>> {
        Ok(live::<page_instance::Entity>()
            .filter(page_instance::Column::QuestionnaireId.eq(questionnaire_id))
            .order_by_asc(page_instance::Column::Index)
            .find_also_related(page::Entity)
            .all(db)
            .await?)
    }

    async fn max_index<E, C>(
        db: &C,
        index_column: E::Column,
        parent_column: E::Column,
        parent_id: i64,
    ) -> std::result::Result<i32, DbErr>
    where
        E: SoftDeletes,
        C: ConnectionTrait,
    {
        let max: Option<Option<i64>> = live::<E>()
            .select_only()
            .column_as(index_column.max(), "max_index")
            .filter(parent_column.eq(parent_id))
            .into_tuple()
            .one(db)
            .await?;
        Ok(max.flatten().unwrap_or(0) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditional::Action;
    use crate::factories::ClientFactory;
    use crate::storage::repository::{QuestionRepository, WidgetRepository};
    use crate::test_support::foundation_db;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sea_orm::DatabaseConnection;

    fn questionnaire(starts_at: Option<i64>, ends_at: Option<i64>) -> questionnaire::Model {
        questionnaire::Model {
            id: 1,
            uuid: "q".to_string(),
            client_id: 1,
            location_id: None,
            locale_id: None,
            category_id: None,
            name: None,
            title: None,
            description: None,
            color_primary: "FFFFFF".to_string(),
            color_secondary: "000000".to_string(),
            file_logo: None,
            is_active: true,
            data: None,
            starts_at,
            ends_at,
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
        }
    }

    #[test]
    fn active_window_bounds_responses() {
        let q = questionnaire(Some(100), Some(200));
        assert!(!accepts_responses_at(&q, 99));
        assert!(accepts_responses_at(&q, 100));
        assert!(accepts_responses_at(&q, 199));
        assert!(!accepts_responses_at(&q, 200));

        let open = questionnaire(None, None);
        assert!(accepts_responses_at(&open, 0));

        let inactive = questionnaire::Model {
            is_active: false,
            ..open
        };
        assert!(!accepts_responses_at(&inactive, 0));
    }

    #[test]
    fn balance_type_strings() {
        assert_eq!(BalanceType::default().to_string(), "balanced");
        assert_eq!("worst-cases".parse::<BalanceType>(), Ok(BalanceType::WorstCases));
        assert!("neutral".parse::<BalanceType>().is_err());
    }

    async fn sample_questionnaire(db: &DatabaseConnection) -> questionnaire::Model {
        let mut rng = StdRng::seed_from_u64(42);
        let client = ClientFactory::create_many(db, &mut rng, 1)
            .await
            .unwrap()
            .remove(0);
        QuestionnaireRepository::create(db, QuestionnaireDefinition::new(client.id))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn questionnaire_inherits_client_locale_and_gets_a_uuid() {
        let (db, _dir) = foundation_db().await;
        let q = sample_questionnaire(&db).await;
        let client = find_live::<client::Entity, _>(&db, q.client_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(q.locale_id, Some(client.locale_id));
        assert!(Uuid::parse_str(&q.uuid).is_ok());
        assert_eq!(
            QuestionnaireRepository::find_by_uuid(&db, &q.uuid)
                .await
                .unwrap()
                .id,
            q.id
        );

        let bad_window = QuestionnaireRepository::create(
            &db,
            QuestionnaireDefinition {
                starts_at: Some(200),
                ends_at: Some(100),
                ..QuestionnaireDefinition::new(client.id)
            },
        )
        .await;
        assert!(matches!(bad_window, Err(QrfeedzError::Refused(_))));
        assert!(matches!(
            QuestionnaireRepository::create(&db, QuestionnaireDefinition::new(9999)).await,
            Err(QrfeedzError::MissingLookup { .. })
        ));
    }

    #[tokio::test]
    async fn pages_are_appended_in_order() {
        let (db, _dir) = foundation_db().await;
        let q = sample_questionnaire(&db).await;

        for (canonical, name) in [
            ("welcome-select", "Welcome"),
            ("form-default", "Survey"),
            ("promo-default", "Promo"),
        ] {
            QuestionnaireRepository::add_page_instance(&db, q.id, canonical, name, None)
                .await
                .unwrap();
        }

        let pages = QuestionnaireRepository::pages_of(&db, q.id).await.unwrap();
        let layout: Vec<(i32, &str)> = pages
            .iter()
            .map(|(pi, page)| (pi.index, page.as_ref().map_or("", |p| p.canonical.as_str())))
            .collect();
        assert_eq!(
            layout,
            vec![(1, "welcome-select"), (2, "form-default"), (3, "promo-default")]
        );

        let missing =
            QuestionnaireRepository::add_page_instance(&db, q.id, "carousel", "Nope", None).await;
        assert!(matches!(missing, Err(QrfeedzError::MissingLookup { .. })));
    }

    #[tokio::test]
    async fn responses_must_match_their_question_and_an_open_questionnaire() {
        let (db, _dir) = foundation_db().await;
        let q = sample_questionnaire(&db).await;
        let page =
            QuestionnaireRepository::add_page_instance(&db, q.id, "form-default", "Survey", None)
                .await
                .unwrap();

        let stars = WidgetRepository::newest_by_canonical(&db, "stars-rating")
            .await
            .unwrap();
        let mut instances = Vec::new();
        for name in ["Food", "Service"] {
            let question = QuestionRepository::create(&db, name, None).await.unwrap();
            let qi = QuestionnaireRepository::add_question_instance(
                &db,
                page.id,
                question.id,
                QuestionFlags::default(),
            )
            .await
            .unwrap();
            let wi = QuestionnaireRepository::add_widget_instance(&db, qi.id, stars.id, None)
                .await
                .unwrap();
            instances.push((qi, wi));
        }
        assert_eq!(instances[0].0.index, 1);
        assert_eq!(instances[1].0.index, 2);
        assert_eq!(instances[0].1.index, Some(1));

        let (food, food_stars) = &instances[0];
        let (_, service_stars) = &instances[1];

        let saved = QuestionnaireRepository::record_response(
            &db,
            "session-1",
            food.id,
            food_stars.id,
            Some(serde_json::json!(4)),
        )
        .await
        .unwrap();
        assert_eq!(saved.value, Some(serde_json::json!(4)));

        let mismatch = QuestionnaireRepository::record_response(
            &db,
            "session-1",
            food.id,
            service_stars.id,
            Some(serde_json::json!(4)),
        )
        .await;
        assert!(matches!(mismatch, Err(QrfeedzError::Refused(_))));

        let mut closed: questionnaire::ActiveModel = q.into();
        closed.is_active = Set(false);
        closed.update(&db).await.unwrap();
        let refused = QuestionnaireRepository::record_response(
            &db,
            "session-2",
            food.id,
            food_stars.id,
            None,
        )
        .await;
        assert!(matches!(refused, Err(QrfeedzError::Refused(_))));
    }

    #[tokio::test]
    async fn conditionals_hang_under_their_parent() {
        let (db, _dir) = foundation_db().await;
        let q = sample_questionnaire(&db).await;
        let page =
            QuestionnaireRepository::add_page_instance(&db, q.id, "form-default", "Survey", None)
                .await
                .unwrap();
        let question = QuestionRepository::create(&db, "Rating", None).await.unwrap();
        let qi = QuestionnaireRepository::add_question_instance(
            &db,
            page.id,
            question.id,
            QuestionFlags::default(),
        )
        .await
        .unwrap();
        let slider = WidgetRepository::newest_by_canonical(&db, "emoji-slider-rating")
            .await
            .unwrap();
        let textarea = WidgetRepository::newest_by_canonical(&db, "textarea")
            .await
            .unwrap();
        let parent = QuestionnaireRepository::add_widget_instance(&db, qi.id, slider.id, None)
            .await
            .unwrap();

        let rule = Conditional::new(&["value <= 2"], vec![Action::TextareaSlidedown]).unwrap();
        let child =
            QuestionnaireRepository::add_conditional(&db, &parent, &rule, Some(textarea.id))
                .await
                .unwrap();
        assert_eq!(child.widget_instance_id, Some(parent.id));
        assert_eq!(child.question_instance_id, Some(qi.id));
        assert_eq!(child.widget_id, textarea.id);
        assert_eq!(child.index, None);

        let stored = QuestionnaireRepository::conditionals_of(&db, parent.id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].1, rule);
    }

    #[tokio::test]
    async fn prompt_is_attached_with_its_balance() {
        let (db, _dir) = foundation_db().await;
        let q = sample_questionnaire(&db).await;
        let prompt = QuestionnaireRepository::attach_prompt(
            &db,
            q.id,
            PromptDefinition {
                i_am_a_business_of: Some("a hotel in Lisbon".to_string()),
                balance_type: BalanceType::WorstCases,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(prompt.questionnaire_id, q.id);
        assert_eq!(prompt.balance_type, "worst-cases");
        assert!(!prompt.should_be_email_aware);
    }
}
