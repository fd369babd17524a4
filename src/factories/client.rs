use super::{city, company, postcode, random_country, street_address, vat_number};
use crate::error::Result;
use crate::storage::entity::client;
use crate::storage::repository::LookupRepository;
use chrono::Utc;
use log::debug;
use rand::Rng;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};

pub struct ClientFactory;

impl ClientFactory {
    /// An unsaved client in the given country, speaking `locale_id`.
    pub fn definition<R: Rng + ?Sized>(
        rng: &mut R,
        country_id: i64,
        locale_id: i64,
    ) -> client::ActiveModel {
        let now = Utc::now().timestamp();
        client::ActiveModel {
            name: Set(company(rng)),
            affiliate_id: Set(None),
            locale_id: Set(locale_id),
            vat_number: Set(Some(vat_number(rng))),
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

    /// Inserts `count` clients, each in a random country, with the English locale.
    pub async fn create_many<C, R>(db: &C, rng: &mut R, count: usize) -> Result<Vec<client::Model>>
    where
        C: ConnectionTrait,
        R: Rng + ?Sized,
    {
        let locale = LookupRepository::locale_by_canonical(db, "en").await?;
        let mut created = Vec::with_capacity(count);
        for _ in 0..count {
            let country = random_country(db, rng).await?;
            let client = Self::definition(rng, country.id, locale.id).insert(db).await?;
            debug!("client factory: {} ({})", client.name, country.code);
            created.push(client);
        }
        Ok(created)
    }
}
