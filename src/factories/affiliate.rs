use super::{city, person_name, postcode, random_country, street_address};
use crate::error::Result;
use crate::storage::entity::affiliate;
use chrono::Utc;
use rand::Rng;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};

pub struct AffiliateFactory;

impl AffiliateFactory {
    pub fn definition<R: Rng + ?Sized>(
        rng: &mut R,
        country_id: Option<i64>,
        user_id: Option<i64>,
    ) -> affiliate::ActiveModel {
        let now = Utc::now().timestamp();
        affiliate::ActiveModel {
            user_id: Set(user_id),
            name: Set(person_name(rng)),
            address: Set(Some(street_address(rng))),
            postal_code: Set(Some(postcode(rng))),
            locality: Set(Some(city(rng))),
            country_id: Set(country_id),
            commission_percentage: Set(rng.gen_range(5..=30)),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
    }

    pub async fn create_many<C, R>(
        db: &C,
        rng: &mut R,
        count: usize,
    ) -> Result<Vec<affiliate::Model>>
    where
        C: ConnectionTrait,
        R: Rng + ?Sized,
    {
        let mut created = Vec::with_capacity(count);
        for _ in 0..count {
            let country = random_country(db, rng).await?;
            created.push(Self::definition(rng, Some(country.id), None).insert(db).await?);
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::foundation_db;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[tokio::test]
    async fn affiliates_get_a_country_and_a_commission() {
        let (db, _dir) = foundation_db().await;
        let mut rng = StdRng::seed_from_u64(2);
        let affiliates = AffiliateFactory::create_many(&db, &mut rng, 4).await.unwrap();
        assert_eq!(affiliates.len(), 4);
        for affiliate in affiliates {
            assert!(affiliate.country_id.is_some());
            assert!((5..=30).contains(&affiliate.commission_percentage));
            assert!(affiliate.user_id.is_none());
        }
    }
}
