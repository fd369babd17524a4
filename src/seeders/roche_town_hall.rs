use super::{create_user, Role, Seeder};
use crate::conditional::{Action, Conditional};
use crate::config::{Config, Credentials};
use crate::error::{QrfeedzError, Result};
use crate::storage::entity::{client, location};
use crate::storage::repository::{
    AuthorizationRepository, LookupRepository, QuestionFlags, QuestionRepository,
    QuestionnaireDefinition, QuestionnaireRepository, WidgetRepository,
};
use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, Set};
use serde_json::json;

const QUESTION_CAPTIONS: &[(&str, &str)] = &[
    ("en", "How much did you like this Town Hall?"),
    ("pt", "Quanto gostou deste Town Hall?"),
    ("de", "Wie sehr hat Ihnen dieses Rathaus gefallen?"),
    ("it", "Quanto vi è piaciuto questo Town Hall?"),
    ("fr", "Avez-vous aimé ce Town Hall?"),
];

/// Roche IT "Home4IT" town hall: one emoji slider question, with a textarea
/// when the visitor is unhappy.
pub struct RocheTownHallSeeder;

#[async_trait]
impl Seeder for RocheTownHallSeeder {
    fn name(&self) -> &'static str {
        "roche-town-hall"
    }

    async fn run(&self, db: &DatabaseTransaction, config: &Config) -> Result<()> {
        let password = config
            .roche_townhall_admin_password
            .clone()
            .ok_or(QrfeedzError::MissingEnv("ROCHE_TOWNHALL_ADMIN_PASSWORD"))?;

        let switzerland = LookupRepository::country_by_name(db, "Switzerland").await?;
        let en = LookupRepository::locale_by_canonical(db, "en").await?;
        let now = Utc::now().timestamp();

        let roche = client::ActiveModel {
            name: Set("Roche IT".to_string()),
            affiliate_id: Set(None),
            locale_id: Set(en.id),
            vat_number: Set(Some("507643121".to_string())),
            address: Set(Some("Wurmisweg".to_string())),
            postal_code: Set(Some("4303".to_string())),
            city: Set(Some("Kaiseraugst".to_string())),
            country_id: Set(switzerland.id),
            latitude: Set(None),
            longitude: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let h4it = location::ActiveModel {
            name: Set("H4IT".to_string()),
            client_id: Set(roche.id),
            description: Set(Some(
                "Home4IT events, related with all Roche IT Organizations".to_string(),
            )),
            address: Set(roche.address.clone()),
            postal_code: Set(roche.postal_code.clone()),
            city: Set(roche.city.clone()),
            country_id: Set(switzerland.id),
            latitude: Set(None),
            longitude: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let admin = Credentials {
            name: "Bruno Falcao (Roche - admin)".to_string(),
            email: "bruno.falcao@roche.com".to_string(),
            password: password.clone(),
        };
        let admin = create_user(db, &admin, Some(roche.id), Role::Standard).await?;
        AuthorizationRepository::grant(db, &roche, "admin", admin.id).await?;

        let viewer = Credentials {
            name: "Bruno Falcao (Roche)".to_string(),
            email: "bruno.falcao2@roche.com".to_string(),
            password,
        };
        let viewer = create_user(db, &viewer, Some(roche.id), Role::Standard).await?;
        AuthorizationRepository::grant(db, &roche, "view", viewer.id).await?;

        let questionnaire = QuestionnaireRepository::create(
            db,
            QuestionnaireDefinition {
                location_id: Some(h4it.id),
                name: Some("Home4IT March Town Hall".to_string()),
                description: Some("The Town Hall for the H4IT, March 2023".to_string()),
                data: Some(json!({
                    "name": "Home 4 IT",
                    "location": "Kaiseraugst",
                    "subject": "Town Halls",
                })),
                starts_at: Some(now),
                ..QuestionnaireDefinition::new(roche.id)
            },
        )
        .await?;

        let mut captions = Vec::with_capacity(QUESTION_CAPTIONS.len());
        for (canonical, caption) in QUESTION_CAPTIONS {
            let locale = LookupRepository::locale_by_canonical(db, canonical).await?;
            captions.push((locale.id, *caption));
        }
        let question =
            QuestionRepository::create_with_captions(db, "Town hall rating", &captions).await?;

        let page = QuestionnaireRepository::add_page_instance(
            db,
            questionnaire.id,
            "form-default",
            "Town Hall",
            None,
        )
        .await?;
        let instance = QuestionnaireRepository::add_question_instance(
            db,
            page.id,
            question.id,
            QuestionFlags {
                is_required: true,
                ..Default::default()
            },
        )
        .await?;
        let slider = WidgetRepository::newest_by_canonical(db, "emoji-slider-rating").await?;
        let slider =
            QuestionnaireRepository::add_widget_instance(db, instance.id, slider.id, None).await?;

        let textarea = WidgetRepository::newest_by_canonical(db, "textarea").await?;
        let unhappy = Conditional::new(&["value <= 2"], vec![Action::TextareaSlidedown])?;
        QuestionnaireRepository::add_conditional(db, &slider, &unhappy, Some(textarea.id)).await?;

        info!("Roche town hall questionnaire {}", questionnaire.uuid);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeders::run_seeder;
    use crate::storage::entity::{question, question_instance, questionnaire, widget_instance};
    use crate::storage::repository::{find_live, live, MorphRepository};
    use crate::test_support::{foundation_db, test_config};
    use sea_orm::{ColumnTrait, QueryFilter};

    #[tokio::test]
    async fn builds_the_town_hall() {
        let (db, _dir) = foundation_db().await;
        run_seeder(&db, &RocheTownHallSeeder, &test_config())
            .await
            .unwrap();

        let q = live::<questionnaire::Entity>()
            .filter(questionnaire::Column::Name.eq("Home4IT March Town Hall"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert!(q.location_id.is_some());
        assert_eq!(q.data.as_ref().unwrap()["subject"], "Town Halls");

        let viewer = LookupRepository::user_by_email(&db, "bruno.falcao2@roche.com")
            .await
            .unwrap();
        let auths = AuthorizationRepository::effective_for_questionnaire(&db, viewer.id, q.id)
            .await
            .unwrap();
        assert_eq!(auths.len(), 1);
        assert_eq!(auths[0].canonical, "view");

        let pages = QuestionnaireRepository::pages_of(&db, q.id).await.unwrap();
        assert_eq!(pages.len(), 1);

        let slider = WidgetRepository::newest_by_canonical(&db, "emoji-slider-rating")
            .await
            .unwrap();
        let parent = live::<widget_instance::Entity>()
            .filter(widget_instance::Column::WidgetId.eq(slider.id))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let qi_id = parent.question_instance_id.unwrap();
        let qi = find_live::<question_instance::Entity, _>(&db, qi_id)
            .await
            .unwrap()
            .unwrap();
        let question = find_live::<question::Entity, _>(&db, qi.question_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(MorphRepository::captions_of(&db, &question).await.unwrap().len(), 5);

        let conditionals = QuestionnaireRepository::conditionals_of(&db, parent.id)
            .await
            .unwrap();
        assert_eq!(conditionals.len(), 1);
        assert_eq!(conditionals[0].1.then, vec![Action::TextareaSlidedown]);
    }

    #[tokio::test]
    async fn needs_the_admin_password() {
        let (db, _dir) = foundation_db().await;
        let config = Config {
            roche_townhall_admin_password: None,
            ..test_config()
        };
        let err = run_seeder(&db, &RocheTownHallSeeder, &config)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QrfeedzError::MissingEnv("ROCHE_TOWNHALL_ADMIN_PASSWORD")
        ));
    }
}
