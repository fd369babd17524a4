use super::lookup_repo::LookupRepository;
use super::morph::{MorphType, Morphable};
use super::soft_delete::{find_live, live, soft_delete};
use crate::error::{QrfeedzError, Result};
use crate::storage::entity::{authorizable, authorization, questionnaire};
use chrono::Utc;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::BTreeMap;

pub struct AuthorizationRepository;

impl AuthorizationRepository {
    /// Grants `canonical` to the user on `model`. Granting twice is a no-op.
    pub async fn grant<C, M>(
        db: &C,
        model: &M,
        canonical: &str,
        user_id: i64,
    ) -> Result<authorizable::Model>
    where
        C: ConnectionTrait,
        M: Morphable,
    {
        let auth = LookupRepository::authorization_by_canonical(db, canonical).await?;

        let existing =
            Self::find_grant(db, M::MORPH_TYPE, model.morph_id(), auth.id, user_id).await?;
        if let Some(existing) = existing {
            return Ok(existing);
        }

        let now = Utc::now().timestamp();
        let am = authorizable::ActiveModel {
            model_type: Set(M::MORPH_TYPE.to_string()),
            model_id: Set(model.morph_id()),
            authorization_id: Set(auth.id),
            user_id: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        let granted = am.insert(db).await?;
        info!(
            "granted {} on {} #{} to user #{}",
            canonical,
            M::MORPH_TYPE,
            model.morph_id(),
            user_id
        );
        Ok(granted)
    }

    pub async fn revoke<C, M>(db: &C, model: &M, canonical: &str, user_id: i64) -> Result<bool>
    where
        C: ConnectionTrait,
        M: Morphable,
    {
        let auth = LookupRepository::authorization_by_canonical(db, canonical).await?;
        match Self::find_grant(db, M::MORPH_TYPE, model.morph_id(), auth.id, user_id).await? {
            Some(grant) => Ok(soft_delete::<authorizable::Entity, _>(db, grant.id).await?),
            None => Ok(false),
        }
    }

    pub async fn grants_on<C, M>(
        db: &C,
        model: &M,
    ) -> Result<Vec<(authorizable::Model, Option<authorization::Model>)>>
    where
        C: ConnectionTrait,
        M: Morphable,
    {
        Ok(live::<authorizable::Entity>()
            .filter(authorizable::Column::ModelType.eq(M::MORPH_TYPE.as_str()))
            .filter(authorizable::Column::ModelId.eq(model.morph_id()))
            .order_by_asc(authorizable::Column::Id)
            .find_also_related(authorization::Entity)
            .all(db)
            .await?)
    }

    /// Authorizations the user holds on a questionnaire. Grants on its
    /// client or location cascade down to it.
    pub async fn effective_for_questionnaire<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
        questionnaire_id: i64,
    ) -> Result<Vec<authorization::Model>> {
        let q = find_live::<questionnaire::Entity, _>(db, questionnaire_id)
            .await?
            .ok_or_else(|| QrfeedzError::missing("questionnaires", "id", questionnaire_id))?;

        let mut targets = Condition::any()
            .add(Self::target(MorphType::Questionnaire, q.id))
            .add(Self::target(MorphType::Client, q.client_id));
        if let Some(location_id) = q.location_id {
            targets = targets.add(Self::target(MorphType::Location, location_id));
        }

        let rows = live::<authorizable::Entity>()
            .filter(authorizable::Column::UserId.eq(user_id))
            .filter(targets)
            .find_also_related(authorization::Entity)
            .all(db)
            .await?;

        // dedup by canonical, ignoring soft-deleted authorization types
        let mut effective = BTreeMap::new();
        for (_, auth) in rows {
            if let Some(auth) = auth.filter(|a| a.deleted_at.is_none()) {
                effective.entry(auth.canonical.clone()).or_insert(auth);
            }
        }
        Ok(effective.into_values().collect())
    }

    fn target(morph_type: MorphType, id: i64) -> Condition {
        Condition::all()
            .add(authorizable::Column::ModelType.eq(morph_type.as_str()))
            .add(authorizable::Column::ModelId.eq(id))
    }

    async fn find_grant<C: ConnectionTrait>(
        db: &C,
        morph_type: MorphType,
        morph_id: i64,
        authorization_id: i64,
        user_id: i64,
    ) -> Result<Option<authorizable::Model>> {
        Ok(live::<authorizable::Entity>()
            .filter(Self::target(morph_type, morph_id))
            .filter(authorizable::Column::AuthorizationId.eq(authorization_id))
            .filter(authorizable::Column::UserId.eq(user_id))
            .one(db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factories::{ClientFactory, LocationFactory};
    use crate::seeders::{create_user, Role};
    use crate::storage::repository::{QuestionnaireDefinition, QuestionnaireRepository};
    use crate::test_support::{foundation_db, test_config};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn canonicals(auths: &[authorization::Model]) -> Vec<&str> {
        auths.iter().map(|a| a.canonical.as_str()).collect()
    }

    #[tokio::test]
    async fn grants_cascade_from_client_and_location() {
        let (db, _dir) = foundation_db().await;
        let mut rng = StdRng::seed_from_u64(11);
        let mut clients = ClientFactory::create_many(&db, &mut rng, 2).await.unwrap();
        let other = clients.pop().unwrap();
        let client = clients.pop().unwrap();
        let location = LocationFactory::create_for_client(&db, &mut rng, &client, 1)
            .await
            .unwrap()
            .remove(0);
        let questionnaire = QuestionnaireRepository::create(
            &db,
            QuestionnaireDefinition {
                location_id: Some(location.id),
                ..QuestionnaireDefinition::new(client.id)
            },
        )
        .await
        .unwrap();

        let credentials = test_config().crocrock_user.unwrap();
        let user = create_user(&db, &credentials, Some(client.id), Role::Standard)
            .await
            .unwrap();

        let none =
            AuthorizationRepository::effective_for_questionnaire(&db, user.id, questionnaire.id)
                .await
                .unwrap();
        assert!(none.is_empty());

        let first = AuthorizationRepository::grant(&db, &client, "view", user.id)
            .await
            .unwrap();
        let again = AuthorizationRepository::grant(&db, &client, "view", user.id)
            .await
            .unwrap();
        assert_eq!(first.id, again.id);

        AuthorizationRepository::grant(&db, &location, "location-admin", user.id)
            .await
            .unwrap();
        AuthorizationRepository::grant(&db, &other, "admin", user.id)
            .await
            .unwrap();

        let effective =
            AuthorizationRepository::effective_for_questionnaire(&db, user.id, questionnaire.id)
                .await
                .unwrap();
        assert_eq!(canonicals(&effective), vec!["location-admin", "view"]);

        let on_client = AuthorizationRepository::grants_on(&db, &client).await.unwrap();
        assert_eq!(on_client.len(), 1);

        assert!(AuthorizationRepository::revoke(&db, &client, "view", user.id)
            .await
            .unwrap());
        assert!(!AuthorizationRepository::revoke(&db, &client, "view", user.id)
            .await
            .unwrap());
        let effective =
            AuthorizationRepository::effective_for_questionnaire(&db, user.id, questionnaire.id)
                .await
                .unwrap();
        assert_eq!(canonicals(&effective), vec!["location-admin"]);
    }

    #[tokio::test]
    async fn granting_an_unknown_authorization_fails() {
        let (db, _dir) = foundation_db().await;
        let mut rng = StdRng::seed_from_u64(5);
        let client = ClientFactory::create_many(&db, &mut rng, 1)
            .await
            .unwrap()
            .remove(0);
        let err = AuthorizationRepository::grant(&db, &client, "owner", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, QrfeedzError::MissingLookup { .. }));
    }
}
