pub mod croc_rock;
pub mod foundation;
pub mod roche_town_hall;

mod countries;

pub use croc_rock::CrocRockSeeder;
pub use foundation::FoundationSeeder;
pub use roche_town_hall::RocheTownHallSeeder;
pub use schema_test::SchemaTestSeeder;

use crate::config::{Config, Credentials};
use crate::error::{QrfeedzError, Result};
use crate::password::hash_password;
use crate::storage::entity::user;
use async_trait::async_trait;
use chrono::Utc;
use log::{error, info};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, Set, TransactionTrait,
};
use std::time::Instant;

#[async_trait]
pub trait Seeder: Send + Sync {
    /// Kebab-case name, as accepted by `--seeder=` and `seed --class=`.
    fn name(&self) -> &'static str;

    /// Other names the seeder answers to (e.g. the old class name).
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    async fn run(&self, db: &DatabaseTransaction, config: &Config) -> Result<()>;
}

pub fn all() -> Vec<Box<dyn Seeder>> {
    vec![
        Box::new(FoundationSeeder),
        Box::new(SchemaTestSeeder),
        Box::new(CrocRockSeeder),
        Box::new(RocheTownHallSeeder),
    ]
}

/// `CrocRock`, `CrocRockSeeder`, `croc-rock` and `croc_rock` all resolve
/// to the same seeder.
pub fn find(name: &str) -> Result<Box<dyn Seeder>> {
    let wanted = normalize(name);
    all()
        .into_iter()
        .find(|s| {
            normalize(s.name()) == wanted || s.aliases().iter().any(|a| normalize(a) == wanted)
        })
        .ok_or_else(|| QrfeedzError::UnknownSeeder(name.to_string()))
}

fn normalize(name: &str) -> String {
    let name = name.rsplit("\\").next().unwrap_or(name);
    let flat: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    match flat.strip_suffix("seeder") {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => flat,
    }
}

/// Runs one seeder in its own transaction. Nothing is kept when it fails.
pub async fn run_seeder(db: &DatabaseConnection, seeder: &dyn Seeder, config: &Config) -> Result<()> {
    let started = Instant::now();
    info!("seeding {}", seeder.name());

    let txn = db.begin().await?;
    match seeder.run(&txn, config).await {
        Ok(()) => {
            txn.commit().await?;
            info!("seeded {} in {:?}", seeder.name(), started.elapsed());
            Ok(())
        }
        Err(e) => {
            error!("seeder {} failed, rolling back: {}", seeder.name(), e);
            txn.rollback().await?;
            Err(e)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Standard,
    Admin,
    SuperAdmin,
}

/// Inserts a user with an argon2-hashed password.
pub(crate) async fn create_user<C: ConnectionTrait>(
    db: &C,
    credentials: &Credentials,
    client_id: Option<i64>,
    role: Role,
) -> Result<user::Model> {
    let now = Utc::now().timestamp();
    let am = user::ActiveModel {
        name: Set(Some(credentials.name.clone())),
        email: Set(credentials.email.clone()),
        password: Set(Some(hash_password(&credentials.password)?)),
        client_id: Set(client_id),
        locale_id: Set(None),
        commission_percentage: Set(0),
        address: Set(None),
        postal_code: Set(None),
        locality: Set(None),
        country_id: Set(None),
        is_super_admin: Set(role == Role::SuperAdmin),
        is_admin: Set(role == Role::Admin),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };
    let user = am.insert(db).await?;
    info!("user {} created", user.email);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_seeders_by_any_spelling() {
        for name in [
            "croc-rock",
            "CrocRock",
            "CrocRockSeeder",
            "croc_rock",
            "QRFeedz\\Database\\Seeders\\CrocRock",
        ] {
            assert_eq!(find(name).unwrap().name(), "croc-rock", "{}", name);
        }
        assert_eq!(find("SchemaTestSeeder").unwrap().name(), "test");
        assert_eq!(find("schema-foundation").unwrap().name(), "foundation");
        assert_eq!(find("RocheTownHall").unwrap().name(), "roche-town-hall");
    }

    #[test]
    fn unknown_seeder_is_an_error() {
        let err = find("Seed1").err().unwrap();
        assert!(matches!(err, QrfeedzError::UnknownSeeder(ref n) if n == "Seed1"));
        assert!(find("seeder").is_err());
    }
}
