pub mod app_command;
pub mod fresh;
pub mod seed;

pub use app_command::{AppCommand, Cli, SeedArgs};

use crate::config::Config;
use crate::error::{QrfeedzError, Result};
use crate::storage::Migrator;
use log::info;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
    println!("=> Applying QR Feedz migrations...");
    Migrator::up(db, None).await?;
    info!("migrations applied");
    Ok(())
}

/// Test data never goes into a production database.
pub(crate) fn refuse_test_data_in_production(config: &Config) -> Result<()> {
    if config.is_production() {
        return Err(QrfeedzError::Refused(
            "test data is not seeded when APP_ENV=production".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::migrated_db;

    #[tokio::test]
    async fn migrate_is_idempotent() {
        let (db, _dir) = migrated_db().await;
        migrate(&db).await.unwrap();
        migrate(&db).await.unwrap();
        assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());
    }
}
