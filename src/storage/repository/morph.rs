use super::soft_delete::live;
use crate::error::Result;
use crate::storage::entity::*;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, QueryFilter, QueryOrder, Set};
use std::fmt;
use std::str::FromStr;

/// The `model_type` stored in polymorphic join tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MorphType {
    Client,
    Location,
    Questionnaire,
    PageInstance,
    Question,
    QuestionInstance,
    Widget,
    WidgetInstance,
    User,
    Affiliate,
}

impl MorphType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MorphType::Client => "client",
            MorphType::Location => "location",
            MorphType::Questionnaire => "questionnaire",
            MorphType::PageInstance => "page_instance",
            MorphType::Question => "question",
            MorphType::QuestionInstance => "question_instance",
            MorphType::Widget => "widget",
            MorphType::WidgetInstance => "widget_instance",
            MorphType::User => "user",
            MorphType::Affiliate => "affiliate",
        }
    }
}

impl fmt::Display for MorphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MorphType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "client" => MorphType::Client,
            "location" => MorphType::Location,
            "questionnaire" => MorphType::Questionnaire,
            "page_instance" => MorphType::PageInstance,
            "question" => MorphType::Question,
            "question_instance" => MorphType::QuestionInstance,
            "widget" => MorphType::Widget,
            "widget_instance" => MorphType::WidgetInstance,
            "user" => MorphType::User,
            "affiliate" => MorphType::Affiliate,
            other => return Err(format!("unknown morph type: {}", other)),
        })
    }
}

/// A row that can be the target of a polymorphic join.
pub trait Morphable {
    const MORPH_TYPE: MorphType;

    fn morph_id(&self) -> i64;
}

macro_rules! morphable {
    ($($module:ident => $variant:ident),+ $(,)?) => {
        $(
            impl Morphable for $module::Model {
                const MORPH_TYPE: MorphType = MorphType::$variant;

                fn morph_id(&self) -> i64 {
                    self.id
                }
            }
        )+
    };
}

morphable!(
    client => Client,
    location => Location,
    questionnaire => Questionnaire,
    page_instance => PageInstance,
    question => Question,
    question_instance => QuestionInstance,
    widget => Widget,
    widget_instance => WidgetInstance,
    user => User,
    affiliate => Affiliate,
);

pub struct MorphRepository;

impl MorphRepository {
    pub async fn attach_caption<C, M>(
        db: &C,
        model: &M,
        locale_id: i64,
        caption: &str,
        placeholder: Option<&str>,
    ) -> Result<localable::Model>
    where
        C: ConnectionTrait,
        M: Morphable,
    {
        let now = Utc::now().timestamp();
        let am = localable::ActiveModel {
            model_type: Set(M::MORPH_TYPE.to_string()),
            model_id: Set(model.morph_id()),
            locale_id: Set(locale_id),
            caption: Set(caption.to_string()),
            placeholder: Set(placeholder.map(str::to_string)),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        Ok(am.insert(db).await?)
    }

    /// Captions of a row, paired with their locale, in insertion order.
    pub async fn captions_of<C, M>(
        db: &C,
        model: &M,
    ) -> Result<Vec<(localable::Model, Option<locale::Model>)>>
    where
        C: ConnectionTrait,
        M: Morphable,
    {
        let rows = live::<localable::Entity>()
            .filter(localable::Column::ModelType.eq(M::MORPH_TYPE.as_str()))
            .filter(localable::Column::ModelId.eq(model.morph_id()))
            .order_by_asc(localable::Column::Id)
            .find_also_related(locale::Entity)
            .all(db)
            .await?;
        Ok(rows)
    }

    /// Copies every live caption from one row to another (used when revising versions).
    pub async fn copy_captions<C, A, B>(db: &C, from: &A, to: &B) -> Result<usize>
    where
        C: ConnectionTrait,
        A: Morphable,
        B: Morphable,
    {
        let captions = Self::captions_of(db, from).await?;
        let count = captions.len();
        for (caption, _) in captions {
            Self::attach_caption(
                db,
                to,
                caption.locale_id,
                &caption.caption,
                caption.placeholder.as_deref(),
            )
            .await?;
        }
        Ok(count)
    }

    pub async fn attach_tag<C, M>(db: &C, model: &M, tag_id: i64) -> Result<taggable::Model>
    where
        C: ConnectionTrait,
        M: Morphable,
    {
        let now = Utc::now().timestamp();
        let am = taggable::ActiveModel {
            model_type: Set(M::MORPH_TYPE.to_string()),
            model_id: Set(model.morph_id()),
            tag_id: Set(tag_id),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        Ok(am.insert(db).await?)
    }

    pub async fn tags_of<C, M>(db: &C, model: &M) -> Result<Vec<tag::Model>>
    where
        C: ConnectionTrait,
        M: Morphable,
    {
        let ids = Self::target_ids::<taggable::Entity, _>(
            db,
            taggable::Column::ModelType,
            taggable::Column::ModelId,
            M::MORPH_TYPE,
            model.morph_id(),
            |row| row.tag_id,
        )
        .await?;
        Ok(live::<tag::Entity>()
            .filter(tag::Column::Id.is_in(ids))
            .all(db)
            .await?)
    }

    pub async fn attach_category<C, M>(
        db: &C,
        model: &M,
        category_id: i64,
    ) -> Result<categorizable::Model>
    where
        C: ConnectionTrait,
        M: Morphable,
    {
        let now = Utc::now().timestamp();
        let am = categorizable::ActiveModel {
            model_type: Set(M::MORPH_TYPE.to_string()),
            model_id: Set(model.morph_id()),
            category_id: Set(category_id),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        Ok(am.insert(db).await?)
    }

    pub async fn categories_of<C, M>(db: &C, model: &M) -> Result<Vec<category::Model>>
    where
        C: ConnectionTrait,
        M: Morphable,
    {
        let ids = Self::target_ids::<categorizable::Entity, _>(
            db,
            categorizable::Column::ModelType,
            categorizable::Column::ModelId,
            M::MORPH_TYPE,
            model.morph_id(),
            |row| row.category_id,
        )
        .await?;
        Ok(live::<category::Entity>()
            .filter(category::Column::Id.is_in(ids))
            .all(db)
            .await?)
    }

    async fn target_ids<E, C>(
        db: &C,
        type_column: E::Column,
        id_column: E::Column,
        morph_type: MorphType,
        morph_id: i64,
        target: impl Fn(&E::Model) -> i64,
    ) -> std::result::Result<Vec<i64>, DbErr>
    where
        E: super::soft_delete::SoftDeletes,
        C: ConnectionTrait,
    {
        let rows = live::<E>()
            .filter(type_column.eq(morph_type.as_str()))
            .filter(id_column.eq(morph_id))
            .all(db)
            .await?;
        Ok(rows.iter().map(target).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factories::{ClientFactory, LocationFactory};
    use crate::storage::repository::LookupRepository;
    use crate::test_support::foundation_db;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn morph_type_round_trips_through_its_string() {
        for ty in [
            MorphType::Client,
            MorphType::QuestionInstance,
            MorphType::WidgetInstance,
            MorphType::Affiliate,
        ] {
            assert_eq!(ty.as_str().parse::<MorphType>(), Ok(ty));
        }
        assert!("planet".parse::<MorphType>().is_err());
    }

    #[tokio::test]
    async fn morph_joins_are_scoped_by_type_and_id() {
        let (db, _dir) = foundation_db().await;
        let mut rng = StdRng::seed_from_u64(9);
        let client = ClientFactory::create_many(&db, &mut rng, 1)
            .await
            .unwrap()
            .remove(0);
        let locations = LocationFactory::create_many(&db, &mut rng, client.id, 2)
            .await
            .unwrap();

        let now = Utc::now().timestamp();
        let vip = tag::ActiveModel {
            name: Set("vip".to_string()),
            description: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        let hotel = LookupRepository::category_by_canonical(&db, "hotel").await.unwrap();

        MorphRepository::attach_tag(&db, &locations[0], vip.id).await.unwrap();
        MorphRepository::attach_category(&db, &locations[0], hotel.id)
            .await
            .unwrap();

        let tags = MorphRepository::tags_of(&db, &locations[0]).await.unwrap();
        assert_eq!(tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(), vec!["vip"]);
        assert!(MorphRepository::tags_of(&db, &locations[1]).await.unwrap().is_empty());
        // client #1 and location #1 share an id, not a model_type
        assert_eq!(client.id, locations[0].id);
        assert!(MorphRepository::categories_of(&db, &client).await.unwrap().is_empty());
        assert_eq!(
            MorphRepository::categories_of(&db, &locations[0]).await.unwrap()[0].canonical,
            "hotel"
        );

        let en = LookupRepository::locale_by_canonical(&db, "en").await.unwrap();
        let fr = LookupRepository::locale_by_canonical(&db, "fr").await.unwrap();
        MorphRepository::attach_caption(&db, &client, en.id, "Welcome", Some("title"))
            .await
            .unwrap();
        MorphRepository::attach_caption(&db, &client, fr.id, "Bienvenue", Some("title"))
            .await
            .unwrap();
        let captions = MorphRepository::captions_of(&db, &client).await.unwrap();
        let rows: Vec<(&str, &str)> = captions
            .iter()
            .map(|(c, l)| {
                (
                    c.caption.as_str(),
                    l.as_ref().map_or("", |l| l.canonical.as_str()),
                )
            })
            .collect();
        assert_eq!(rows, vec![("Welcome", "en"), ("Bienvenue", "fr")]);
        assert_eq!(captions[0].0.model_type, "client");
        assert_eq!(captions[0].0.placeholder.as_deref(), Some("title"));
    }
}
