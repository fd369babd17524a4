use super::countries::COUNTRIES;
use super::{create_user, Role, Seeder};
use crate::config::Config;
use crate::error::Result;
use crate::storage::entity::{authorization, category, country, locale, page, page_type, widget_type};
use crate::storage::repository::{LookupRepository, WidgetDefinition, WidgetRepository};
use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, Set};

pub const LOCALES: &[(&str, &str)] = &[
    ("en", "English"),
    ("it", "Italian"),
    ("fr", "French"),
    ("pt", "Portuguese"),
    ("de", "German"),
];

const AUTHORIZATIONS: &[(&str, &str, &str)] = &[
    (
        "affiliate",
        "Client Affiliate",
        "Client affiliate, receives monthly commissions",
    ),
    (
        "admin",
        "System admin",
        "Like the super admin, but cannot delete a client that was not created by him/her",
    ),
    (
        "client-admin",
        "Client Administrator",
        "Admins its own client, locations and questionnaires. Can delete questionnaires without data, manage users and trigger password resets",
    ),
    (
        "location-admin",
        "Location Administrator",
        "Access to the questionnaires of a specific location (hotel managers, restaurant team leads)",
    ),
    (
        "questionnaire-admin",
        "Questionnaire Administrator",
        "Admins a questionnaire: notifications, OpenAI configuration, etc",
    ),
    (
        "gdpr",
        "GDPR",
        "Can see the answers flagged as personal data (e.g. emails)",
    ),
    (
        "view",
        "Viewer",
        "Read-only access to questionnaires and reports",
    ),
];

// (canonical, name, description)
const PAGE_TYPES: &[(&str, &str, &str)] = &[
    ("splash", "Splash", "Full screen transition with the client logo"),
    ("locale-select", "Locale selection", "Lets the visitor pick a language"),
    ("survey", "Survey", "Hosts the questions of a questionnaire"),
    ("promo", "Promotion", "Shows a promotion, usually at the end"),
];

// (page type, canonical, name, description)
const PAGES: &[(&str, &str, &str, &str)] = &[
    (
        "splash",
        "full-screen",
        "Default full screen",
        "A default full screen page, mostly used on page instance transitions",
    ),
    (
        "locale-select",
        "welcome-select",
        "Welcome with locale selection",
        "Welcome page with big locale buttons",
    ),
    (
        "survey",
        "form-default",
        "Default form",
        "Vertical list of questions with a next button",
    ),
    (
        "promo",
        "promo-default",
        "Default promotion",
        "Promotion text with an email input to receive the coupon",
    ),
];

const WIDGET_TYPES: &[(&str, &str, &str)] = &[
    ("rating", "Rating", "Captures a value on a scale"),
    ("input", "Input", "Free text or option inputs"),
    ("full-page", "Full page", "Takes the whole page, no question caption"),
];

const CATEGORIES: &[(&str, &str, &str)] = &[
    ("hotel", "Hotel", "Hotel-based feedbacks"),
    ("restaurant", "Restaurant", "Restaurant-based feedbacks"),
    ("product", "Product", "Product-based feedbacks"),
    ("cantine", "Cantine", "Cantine-based feedbacks"),
];

fn widgets() -> Vec<WidgetDefinition> {
    vec![
        WidgetDefinition::new("emoji-faces-rating", "Emoji faces rating", "rating").describe(
            "5 gray emoji faces from very sad to very happy, colored once touched",
        ),
        WidgetDefinition::new("stars-rating", "Stars rating", "rating")
            .describe("The visitor touches a star to select its value"),
        WidgetDefinition::new("emoji-slider-rating", "Emoji slider rating", "rating")
            .describe("Slider showing emoji faces as the visitor slides it"),
        WidgetDefinition::new("textarea", "Textarea", "input")
            .describe("Standard textarea to store feedback text"),
        WidgetDefinition::new("radio-group", "Radio group", "input")
            .describe("Single choice between a few options")
            .settings(serde_json::json!({ "options": ["yes", "no", "dont-know"] })),
        WidgetDefinition::new("splash-1", "Splash 1", "full-page")
            .describe("Centered logo, questionnaire name and a footer with the client name")
            .full_page(),
        WidgetDefinition {
            view_component_namespace: "widgets.locale-selectors-1".to_string(),
            ..WidgetDefinition::new("locale-selector-1", "Locales selectors", "full-page")
        }
        .describe("Big buttons to select a locale from a locales list")
        .full_page(),
        WidgetDefinition::new("promo-coupon-page", "Promo coupon page", "full-page")
            .describe("Promotion texts and an email input to receive a coupon")
            .full_page(),
    ]
}

/// Reference data every tenant relies on.
pub struct FoundationSeeder;

#[async_trait]
impl Seeder for FoundationSeeder {
    fn name(&self) -> &'static str {
        "foundation"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["schema-foundation"]
    }

    async fn run(&self, db: &DatabaseTransaction, config: &Config) -> Result<()> {
        let now = Utc::now().timestamp();

        let countries = COUNTRIES.iter().map(|(code, name)| country::ActiveModel {
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        });
        country::Entity::insert_many(countries).exec(db).await?;
        info!("{} countries", COUNTRIES.len());

        for (canonical, name) in LOCALES {
            locale::ActiveModel {
                canonical: Set(canonical.to_string()),
                name: Set(name.to_string()),
                created_at: Set(now),
                updated_at: Set(now),
                deleted_at: Set(None),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }

        for (canonical, name, description) in AUTHORIZATIONS {
            authorization::ActiveModel {
                canonical: Set(canonical.to_string()),
                name: Set(name.to_string()),
                description: Set(Some(description.to_string())),
                created_at: Set(now),
                updated_at: Set(now),
                deleted_at: Set(None),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }

        seed_pages(db, now).await?;

        for (canonical, name, description) in WIDGET_TYPES {
            widget_type::ActiveModel {
                name: Set(name.to_string()),
                canonical: Set(canonical.to_string()),
                description: Set(Some(description.to_string())),
                created_at: Set(now),
                updated_at: Set(now),
                deleted_at: Set(None),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        for def in widgets() {
            WidgetRepository::create(db, def).await?;
        }

        for (canonical, name, description) in CATEGORIES {
            category::ActiveModel {
                name: Set(name.to_string()),
                canonical: Set(canonical.to_string()),
                description: Set(Some(description.to_string())),
                created_at: Set(now),
                updated_at: Set(now),
                deleted_at: Set(None),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }

        match &config.super_admin {
            Some(credentials) => {
                create_user(db, credentials, None, Role::SuperAdmin).await?;
            }
            None => warn!("QRFEEDZ_SUPER_ADMIN_* not set, no super admin created"),
        }
        match &config.admin {
            Some(credentials) => {
                create_user(db, credentials, None, Role::Admin).await?;
            }
            None => warn!("QRFEEDZ_ADMIN_* not set, no admin created"),
        }

        Ok(())
    }
}

async fn seed_pages<C: ConnectionTrait>(db: &C, now: i64) -> Result<()> {
    for (canonical, name, description) in PAGE_TYPES {
        page_type::ActiveModel {
            name: Set(name.to_string()),
            canonical: Set(canonical.to_string()),
            description: Set(Some(description.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    for (type_canonical, canonical, name, description) in PAGES {
        let page_type = LookupRepository::page_type_by_canonical(db, type_canonical).await?;
        page::ActiveModel {
            page_type_id: Set(page_type.id),
            name: Set(name.to_string()),
            canonical: Set(canonical.to_string()),
            description: Set(Some(description.to_string())),
            view_component_namespace: Set(format!("pages.{}", canonical)),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::verify_password;
    use crate::storage::entity::{user, widget};
    use crate::test_support::foundation_db;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn seeds_the_reference_data() {
        let (db, _dir) = foundation_db().await;

        assert_eq!(
            country::Entity::find().count(&db).await.unwrap(),
            COUNTRIES.len() as u64
        );
        assert_eq!(locale::Entity::find().count(&db).await.unwrap(), 5);
        assert_eq!(authorization::Entity::find().count(&db).await.unwrap(), 7);
        assert_eq!(page::Entity::find().count(&db).await.unwrap(), 4);
        assert_eq!(category::Entity::find().count(&db).await.unwrap(), 4);
        assert_eq!(widget::Entity::find().count(&db).await.unwrap(), 8);

        let splash = WidgetRepository::newest_by_canonical(&db, "splash-1")
            .await
            .unwrap();
        assert!(splash.is_full_page);
        assert!(!splash.is_progressable);
        let selector = WidgetRepository::newest_by_canonical(&db, "locale-selector-1")
            .await
            .unwrap();
        assert_eq!(selector.view_component_namespace, "widgets.locale-selectors-1");

        let users = user::Entity::find().all(&db).await.unwrap();
        assert_eq!(users.len(), 1, "admin credentials are not configured");
        let super_admin = &users[0];
        assert!(super_admin.is_super_admin);
        assert!(!super_admin.is_admin);
        let hash = super_admin.password.as_deref().unwrap();
        assert!(verify_password("secret", hash).unwrap());
    }

    #[test]
    fn country_codes_are_unique_iso_pairs() {
        let mut codes: Vec<&str> = COUNTRIES.iter().map(|(code, _)| *code).collect();
        assert!(codes.iter().all(|c| c.len() == 2));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), COUNTRIES.len());
    }
}
