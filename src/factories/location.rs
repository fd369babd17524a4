use super::{city, company, postcode, random_country, sentence, street_address};
use crate::error::Result;
use crate::storage::entity::{client, location};
use chrono::Utc;
use rand::Rng;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};

pub struct LocationFactory;

impl LocationFactory {
    pub fn definition<R: Rng + ?Sized>(
        rng: &mut R,
        client_id: i64,
        country_id: i64,
    ) -> location::ActiveModel {
        let now = Utc::now().timestamp();
        location::ActiveModel {
            name: Set(company(rng)),
            client_id: Set(client_id),
            description: Set(Some(sentence(rng))),
            address: Set(Some(street_address(rng))),
            postal_code: Set(Some(postcode(rng))),
            city: Set(Some(city(rng))),
            country_id: Set(country_id),
            latitude: Set(None),
            longitude: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
    }

    /// A location sharing the client's address.
    pub fn for_client<R: Rng + ?Sized>(rng: &mut R, client: &client::Model) -> location::ActiveModel {
        let mut am = Self::definition(rng, client.id, client.country_id);
        am.address = Set(client.address.clone());
        am.postal_code = Set(client.postal_code.clone());
        am.city = Set(client.city.clone());
        am
    }

    pub async fn create_many<C, R>(
        db: &C,
        rng: &mut R,
        client_id: i64,
        count: usize,
    ) -> Result<Vec<location::Model>>
    where
        C: ConnectionTrait,
        R: Rng + ?Sized,
    {
        let mut created = Vec::with_capacity(count);
        for _ in 0..count {
            let country = random_country(db, rng).await?;
            created.push(Self::definition(rng, client_id, country.id).insert(db).await?);
        }
        Ok(created)
    }

    pub async fn create_for_client<C, R>(
        db: &C,
        rng: &mut R,
        client: &client::Model,
        count: usize,
    ) -> Result<Vec<location::Model>>
    where
        C: ConnectionTrait,
        R: Rng + ?Sized,
    {
        let mut created = Vec::with_capacity(count);
        for _ in 0..count {
            created.push(Self::for_client(rng, client).insert(db).await?);
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factories::ClientFactory;
    use crate::test_support::foundation_db;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[tokio::test]
    async fn client_locations_share_its_address() {
        let (db, _dir) = foundation_db().await;
        let mut rng = StdRng::seed_from_u64(21);
        let client = ClientFactory::create_many(&db, &mut rng, 1)
            .await
            .unwrap()
            .remove(0);
        assert_eq!(client.vat_number.as_ref().map(String::len), Some(9));

        let locations = LocationFactory::create_for_client(&db, &mut rng, &client, 3)
            .await
            .unwrap();
        assert_eq!(locations.len(), 3);
        for location in &locations {
            assert_eq!(location.client_id, client.id);
            assert_eq!(location.country_id, client.country_id);
            assert_eq!(location.city, client.city);
            assert!(location.description.is_some());
        }
    }
}
