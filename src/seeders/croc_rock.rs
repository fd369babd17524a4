use super::{create_user, Role, Seeder};
use crate::conditional::{Action, Conditional};
use crate::config::Config;
use crate::error::Result;
use crate::storage::entity::{affiliate, client};
use crate::storage::repository::{
    AuthorizationRepository, BalanceType, LookupRepository, MorphRepository, PromptDefinition,
    QuestionFlags, QuestionRepository, QuestionnaireDefinition, QuestionnaireRepository,
    WidgetRepository,
};
use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, Set};

const PROMO_CAPTIONS: &[(&str, &str, &str)] = &[
    ("promo-title", "Get your promotion code!", "Trouvez votre code promo!"),
    (
        "promo-text",
        "25% discount on your next visit",
        "25% rabais dans votre prochaine visite",
    ),
    (
        "promo-subtext",
        "Bring us the received promo code next time",
        "Vieullez nous trouvez votre code la prochaine fois",
    ),
    (
        "promo-email",
        "Enter your email to receive the promotion",
        "S il vous plait mettez votre email ici",
    ),
];

/// The Croc & Rock restaurant in Nancy: one rating question that asks for
/// details on very bad or very good ratings, then a coupon promotion.
pub struct CrocRockSeeder;

#[async_trait]
impl Seeder for CrocRockSeeder {
    fn name(&self) -> &'static str {
        "croc-rock"
    }

    async fn run(&self, db: &DatabaseTransaction, config: &Config) -> Result<()> {
        let affiliate_credentials =
            Config::require(&config.crocrock_affiliate, "CROCROCK_AFFILIATE")?;
        let admin_credentials = Config::require(&config.crocrock_admin, "CROCROCK_ADMIN")?;
        let user_credentials = Config::require(&config.crocrock_user, "CROCROCK_USER")?;

        let switzerland = LookupRepository::country_by_name(db, "Switzerland").await?;
        let france = LookupRepository::country_by_name(db, "France").await?;
        let en = LookupRepository::locale_by_canonical(db, "en").await?;
        let fr = LookupRepository::locale_by_canonical(db, "fr").await?;
        let restaurant = LookupRepository::category_by_canonical(db, "restaurant").await?;
        let now = Utc::now().timestamp();

        let karine = affiliate::ActiveModel {
            user_id: Set(None),
            name: Set("Karine Esnault".to_string()),
            address: Set(Some("Le chauffour 4".to_string())),
            postal_code: Set(Some("2364".to_string())),
            locality: Set(Some("St-Brais".to_string())),
            country_id: Set(Some(switzerland.id)),
            commission_percentage: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let client = client::ActiveModel {
            name: Set("Croc & Rock".to_string()),
            affiliate_id: Set(Some(karine.id)),
            locale_id: Set(fr.id),
            vat_number: Set(None),
            address: Set(Some("27 avenue du XX ème corps".to_string())),
            postal_code: Set(Some("54000".to_string())),
            city: Set(Some("Nancy".to_string())),
            country_id: Set(france.id),
            latitude: Set(None),
            longitude: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let affiliate_user = create_user(db, affiliate_credentials, None, Role::Standard).await?;
        let mut karine: affiliate::ActiveModel = karine.into();
        karine.user_id = Set(Some(affiliate_user.id));
        karine.update(db).await?;

        let admin = create_user(db, admin_credentials, Some(client.id), Role::Standard).await?;
        // the second partner gets no direct grant
        create_user(db, user_credentials, Some(client.id), Role::Standard).await?;

        AuthorizationRepository::grant(db, &client, "affiliate", affiliate_user.id).await?;
        AuthorizationRepository::grant(db, &client, "admin", admin.id).await?;

        let questionnaire = QuestionnaireRepository::create(
            db,
            QuestionnaireDefinition {
                category_id: Some(restaurant.id),
                name: Some("CrocRock 2024".to_string()),
                title: Some("Restaurant CrocRock".to_string()),
                starts_at: Some(now),
                ..QuestionnaireDefinition::new(client.id)
            },
        )
        .await?;

        QuestionnaireRepository::attach_prompt(
            db,
            questionnaire.id,
            PromptDefinition {
                i_am_a_business_of: Some("a restaurant in Nancy".to_string()),
                i_am_paying_attention_to: Some(
                    "my food quality, and if tourists like it or not".to_string(),
                ),
                balance_type: BalanceType::Balanced,
                should_be_email_aware: true,
            },
        )
        .await?;

        let q = questionnaire.id;
        QuestionnaireRepository::add_page_instance(db, q, "welcome-select", "Welcome", None).await?;
        let survey =
            QuestionnaireRepository::add_page_instance(db, q, "form-default", "Survey", None).await?;
        let promo =
            QuestionnaireRepository::add_page_instance(db, q, "promo-default", "Promo", None).await?;

        // Survey: stars rating with two conditionals.
        let question = QuestionRepository::create_with_captions(
            db,
            "CrocRock meal rating",
            &[(en.id, "How was your meal?"), (fr.id, "Comme avez vous passez?")],
        )
        .await?;
        let rating = QuestionnaireRepository::add_question_instance(
            db,
            survey.id,
            question.id,
            QuestionFlags {
                is_required: true,
                ..Default::default()
            },
        )
        .await?;
        let stars = WidgetRepository::newest_by_canonical(db, "stars-rating").await?;
        let stars =
            QuestionnaireRepository::add_widget_instance(db, rating.id, stars.id, None).await?;

        let details =
            Conditional::new(&["value <= 2 || value == 5"], vec![Action::TextareaSlidedown])?;
        QuestionnaireRepository::add_conditional(db, &stars, &details, None).await?;

        let middle = Conditional::new(&["value == 3"], vec![Action::SubtextAppear])?;
        let subtext = QuestionnaireRepository::add_conditional(db, &stars, &middle, None).await?;
        MorphRepository::attach_caption(db, &subtext, en.id, "Right in the middle!", None).await?;
        MorphRepository::attach_caption(db, &subtext, fr.id, "Au millieux! Parfait!", None).await?;

        // Promo: no caption of its own, collects the email.
        let question = QuestionRepository::create(db, "CrocRock promo", None).await?;
        let coupon = QuestionnaireRepository::add_question_instance(
            db,
            promo.id,
            question.id,
            QuestionFlags {
                is_required: false,
                is_analytical: false,
                is_used_for_personal_data: true,
            },
        )
        .await?;
        let widget = WidgetRepository::newest_by_canonical(db, "promo-coupon-page").await?;
        let coupon =
            QuestionnaireRepository::add_widget_instance(db, coupon.id, widget.id, None).await?;
        for (placeholder, english, french) in PROMO_CAPTIONS {
            MorphRepository::attach_caption(db, &coupon, en.id, english, Some(*placeholder))
                .await?;
            MorphRepository::attach_caption(db, &coupon, fr.id, french, Some(*placeholder))
                .await?;
        }

        info!("Croc & Rock questionnaire {}", questionnaire.uuid);
        Ok(())
    }
}
