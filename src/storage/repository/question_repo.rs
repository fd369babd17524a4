use super::morph::MorphRepository;
use super::soft_delete::{find_live, live};
use crate::error::{QrfeedzError, Result};
use crate::storage::entity::question::{
    self, ActiveModel as QuestionActiveModel, Model as QuestionModel,
};
use chrono::Utc;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

/// A new question version. `captions` replaces the wording when given;
/// otherwise the previous version's captions are copied.
#[derive(Debug, Default, Clone)]
pub struct QuestionRevision {
    pub name: Option<String>,
    pub description: Option<String>,
    pub captions: Option<Vec<(i64, String)>>, // (locale_id, caption)
}

pub struct QuestionRepository;

impl QuestionRepository {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        name: &str,
        description: Option<&str>,
    ) -> Result<QuestionModel> {
        let now = Utc::now().timestamp();
        let am = QuestionActiveModel {
            uuid: Set(Uuid::new_v4().to_string()),
            group_uuid: Set(Uuid::new_v4().to_string()),
            version: Set(1),
            name: Set(name.to_string()),
            description: Set(description.map(str::to_string)),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        Ok(am.insert(db).await?)
    }

    /// Creates a question and captions it in one call.
    pub async fn create_with_captions<C: ConnectionTrait>(
        db: &C,
        name: &str,
        captions: &[(i64, &str)],
    ) -> Result<QuestionModel> {
        let question = Self::create(db, name, None).await?;
        for (locale_id, caption) in captions {
            MorphRepository::attach_caption(db, &question, *locale_id, caption, None).await?;
        }
        Ok(question)
    }

    pub async fn newest_in_group<C: ConnectionTrait>(
        db: &C,
        group_uuid: &str,
    ) -> Result<QuestionModel> {
        live::<question::Entity>()
            .filter(question::Column::GroupUuid.eq(group_uuid))
            .order_by_desc(question::Column::Version)
            .one(db)
            .await?
            .ok_or_else(|| QrfeedzError::missing("questions", "group_uuid", group_uuid))
    }

    pub async fn versions_of_group<C: ConnectionTrait>(
        db: &C,
        group_uuid: &str,
    ) -> Result<Vec<QuestionModel>> {
        Ok(live::<question::Entity>()
            .filter(question::Column::GroupUuid.eq(group_uuid))
            .order_by_asc(question::Column::Version)
            .all(db)
            .await?)
    }

    /// Soft-deleted versions still hold their number.
    async fn next_version<C: ConnectionTrait>(db: &C, group_uuid: &str) -> Result<i32> {
        let newest = question::Entity::find()
            .filter(question::Column::GroupUuid.eq(group_uuid))
            .order_by_desc(question::Column::Version)
            .one(db)
            .await?;
        Ok(newest.map_or(1, |m| m.version + 1))
    }

    pub async fn revise<C: ConnectionTrait>(
        db: &C,
        question_id: i64,
        revision: QuestionRevision,
    ) -> Result<QuestionModel> {
        let base = find_live::<question::Entity, _>(db, question_id)
            .await?
            .ok_or_else(|| QrfeedzError::missing("questions", "id", question_id))?;
        let version = Self::next_version(db, &base.group_uuid).await?;

        let now = Utc::now().timestamp();
        let am = QuestionActiveModel {
            uuid: Set(Uuid::new_v4().to_string()),
            group_uuid: Set(base.group_uuid.clone()),
            version: Set(version),
            name: Set(revision.name.unwrap_or_else(|| base.name.clone())),
            description: Set(revision.description.or_else(|| base.description.clone())),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        let revised = am.insert(db).await?;

        match revision.captions {
            Some(captions) => {
                for (locale_id, caption) in captions {
                    MorphRepository::attach_caption(db, &revised, locale_id, &caption, None)
                        .await?;
                }
            }
            None => {
                MorphRepository::copy_captions(db, &base, &revised).await?;
            }
        }

        info!(
            "question {} revised: v{} -> v{}",
            revised.group_uuid, base.version, revised.version
        );
        Ok(revised)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::repository::{soft_delete, LookupRepository};
    use crate::test_support::{foundation_db, migrated_db};

    #[tokio::test]
    async fn revisions_copy_or_replace_captions() {
        let (db, _dir) = foundation_db().await;
        let en = LookupRepository::locale_by_canonical(&db, "en").await.unwrap();
        let fr = LookupRepository::locale_by_canonical(&db, "fr").await.unwrap();

        let v1 = QuestionRepository::create_with_captions(
            &db,
            "Meal",
            &[(en.id, "How was your meal?"), (fr.id, "Comment était votre repas?")],
        )
        .await
        .unwrap();

        let v2 = QuestionRepository::revise(&db, v1.id, QuestionRevision::default())
            .await
            .unwrap();
        assert_eq!(v2.version, 2);
        assert_eq!(v2.name, "Meal");
        assert_eq!(MorphRepository::captions_of(&db, &v2).await.unwrap().len(), 2);

        let v3 = QuestionRepository::revise(
            &db,
            v2.id,
            QuestionRevision {
                captions: Some(vec![(en.id, "How was your dinner?".to_string())]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let captions = MorphRepository::captions_of(&db, &v3).await.unwrap();
        assert_eq!(captions.len(), 1);
        assert_eq!(captions[0].0.caption, "How was your dinner?");
        assert_eq!(captions[0].1.as_ref().map(|l| l.canonical.as_str()), Some("en"));

        // older versions keep their wording
        assert_eq!(MorphRepository::captions_of(&db, &v1).await.unwrap().len(), 2);
        let newest = QuestionRepository::newest_in_group(&db, &v1.group_uuid)
            .await
            .unwrap();
        assert_eq!(newest.id, v3.id);
        assert_eq!(
            QuestionRepository::versions_of_group(&db, &v1.group_uuid)
                .await
                .unwrap()
                .iter()
                .map(|q| q.version)
                .collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[tokio::test]
    async fn revise_skips_numbers_held_by_deleted_versions() {
        let (db, _dir) = migrated_db().await;
        let v1 = QuestionRepository::create(&db, "Service", None).await.unwrap();
        let v2 = QuestionRepository::revise(&db, v1.id, QuestionRevision::default())
            .await
            .unwrap();
        assert!(soft_delete::<question::Entity, _>(&db, v2.id).await.unwrap());
        assert_eq!(
            QuestionRepository::newest_in_group(&db, &v1.group_uuid)
                .await
                .unwrap()
                .id,
            v1.id
        );

        let v3 = QuestionRepository::revise(&db, v1.id, QuestionRevision::default())
            .await
            .unwrap();
        assert_eq!(v3.version, 3);
        assert_eq!(
            QuestionRepository::versions_of_group(&db, &v1.group_uuid)
                .await
                .unwrap()
                .iter()
                .map(|q| q.version)
                .collect::<Vec<_>>(),
            vec![1, 3]
        );
    }
}
