//! Fake-data generators for sample tenants.

pub mod affiliate;
pub mod client;
pub mod location;

pub use affiliate::AffiliateFactory;
pub use client::ClientFactory;
pub use location::LocationFactory;

use crate::error::{QrfeedzError, Result};
use crate::storage::entity::country;
use crate::storage::repository::live;
use rand::seq::SliceRandom;
use rand::Rng;
use sea_orm::ConnectionTrait;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Camille", "Diego", "Elena", "Fabian", "Greta", "Hugo", "Ines", "Jonas",
    "Karine", "Luca", "Marta", "Nils", "Olivia", "Paulo", "Rita", "Sven", "Tiago", "Vera",
];

const LAST_NAMES: &[&str] = &[
    "Almeida", "Bernard", "Costa", "Dubois", "Esnault", "Favre", "Gerber", "Huber", "Keller",
    "Lambert", "Meier", "Moreau", "Rossi", "Schmid", "Silva", "Weber",
];

const COMPANY_WORDS: &[&str] = &[
    "Alpine", "Blue", "Golden", "Green", "Harbor", "Lake", "Maple", "North", "Olive", "River",
    "Silver", "Stone", "Summit", "Sun",
];

const COMPANY_KINDS: &[&str] = &[
    "Bistro", "Brasserie", "Café", "Canteen", "Foods", "Grill", "Hotel", "Inn", "Kitchen",
    "Lodge", "Resort", "Trattoria",
];

const COMPANY_SUFFIXES: &[&str] = &["SA", "AG", "GmbH", "Ltd", "SARL", "& Co", "Group"];

const STREETS: &[&str] = &[
    "Bahnhofstrasse", "Rue de la Paix", "Via Roma", "Avenida da Liberdade", "Main Street",
    "Hauptstrasse", "Rue du Lac", "Kirchweg", "Chemin des Vignes", "Seestrasse",
];

const CITIES: &[&str] = &[
    "Basel", "Bern", "Geneva", "Lausanne", "Lisbon", "Lyon", "Milan", "Nancy", "Porto",
    "Strasbourg", "Turin", "Zurich",
];

const WORDS: &[&str] = &[
    "quiet", "terrace", "view", "family", "lunch", "service", "seasonal", "menu", "garden",
    "rooms", "breakfast", "local", "team", "evening", "friendly",
];

fn pick<R: Rng + ?Sized>(rng: &mut R, pool: &'static [&'static str]) -> &'static str {
    pool.choose(rng).copied().unwrap_or_default()
}

pub fn person_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES))
}

pub fn company<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{} {} {}",
        pick(rng, COMPANY_WORDS),
        pick(rng, COMPANY_KINDS),
        pick(rng, COMPANY_SUFFIXES)
    )
}

pub fn street_address<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{} {}", pick(rng, STREETS), rng.gen_range(1..=200))
}

pub fn postcode<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.gen_range(1000..=99999).to_string()
}

pub fn city<R: Rng + ?Sized>(rng: &mut R) -> String {
    pick(rng, CITIES).to_string()
}

/// Nine digits, no leading zero.
pub fn vat_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.gen_range(100_000_000u32..=999_999_999).to_string()
}

pub fn sentence<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.gen_range(4..=8);
    let words: Vec<&str> = (0..len).map(|_| pick(rng, WORDS)).collect();
    let mut s = words.join(" ");
    if let Some(first) = s.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    s.push('.');
    s
}

/// A random live country. Fails when the countries table is empty.
pub async fn random_country<C, R>(db: &C, rng: &mut R) -> Result<country::Model>
where
    C: ConnectionTrait,
    R: Rng + ?Sized,
{
    let countries = live::<country::Entity>().all(db).await?;
    countries
        .choose(rng)
        .cloned()
        .ok_or_else(|| QrfeedzError::missing("countries", "id", "any"))
}
