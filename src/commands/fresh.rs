use super::refuse_test_data_in_production;
use crate::config::Config;
use crate::error::Result;
use crate::seeders::{self, run_seeder, FoundationSeeder, SchemaTestSeeder, Seeder};
use crate::storage::Migrator;
use log::{info, warn};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

/// Drops every table, re-installs the schema, seeds the foundation data,
/// then the test data and/or one named seeder.
pub async fn run(
    db: &DatabaseConnection,
    config: &Config,
    test: bool,
    seeder: Option<&str>,
) -> Result<()> {
    // validate everything before anything is dropped
    if test {
        refuse_test_data_in_production(config)?;
    }
    let named = seeder.map(seeders::find).transpose()?;
    if let Some(named) = &named {
        if named.name() == SchemaTestSeeder.name() {
            refuse_test_data_in_production(config)?;
        }
    }

    println!("=> Installing QR Feedz schema...");
    Migrator::fresh(db).await?;
    info!("schema re-created");

    println!("=> Seeding foundation data...");
    run_seeder(db, &FoundationSeeder, config).await?;

    if test {
        println!("=> Seeding database with testing data ...");
        run_seeder(db, &SchemaTestSeeder, config).await?;
    }

    if let Some(named) = named {
        let already_run = named.name() == FoundationSeeder.name()
            || (test && named.name() == SchemaTestSeeder.name());
        if already_run {
            warn!("{} already ran, skipping", named.name());
        } else {
            println!("=> Running seeder: {}...", named.name());
            run_seeder(db, named.as_ref(), config).await?;
        }
    }

    println!("Operation completed successfully.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QrfeedzError;
    use crate::storage::entity::{client, country};
    use crate::test_support::{migrated_db, test_config};
    use sea_orm::{EntityTrait, PaginatorTrait};

    #[tokio::test]
    async fn fresh_reinstalls_from_scratch() {
        let (db, _dir) = migrated_db().await;
        let config = test_config();

        run(&db, &config, false, Some("CrocRock")).await.unwrap();
        run(&db, &config, false, Some("croc-rock")).await.unwrap();

        assert_eq!(client::Entity::find().count(&db).await.unwrap(), 1);
        assert!(country::Entity::find().count(&db).await.unwrap() > 200);

        // foundation is never seeded twice
        run(&db, &config, false, Some("foundation")).await.unwrap();
        assert_eq!(client::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn production_refuses_test_data_before_dropping() {
        let (db, _dir) = migrated_db().await;
        let config = test_config();
        run(&db, &config, false, Some("roche-town-hall")).await.unwrap();

        let production = Config {
            app_env: "production".to_string(),
            ..test_config()
        };
        let err = run(&db, &production, true, None).await.unwrap_err();
        assert!(matches!(err, QrfeedzError::Refused(_)));
        let err = run(&db, &production, false, Some("SchemaTestSeeder"))
            .await
            .unwrap_err();
        assert!(matches!(err, QrfeedzError::Refused(_)));

        let err = run(&db, &config, false, Some("Seed1")).await.unwrap_err();
        assert!(matches!(err, QrfeedzError::UnknownSeeder(_)));

        // the Roche tenant survived every refusal
        assert_eq!(client::Entity::find().count(&db).await.unwrap(), 1);
    }
}
