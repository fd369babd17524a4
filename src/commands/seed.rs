use super::refuse_test_data_in_production;
use crate::config::Config;
use crate::error::Result;
use crate::seeders::{self, run_seeder, SchemaTestSeeder, Seeder};
use sea_orm::DatabaseConnection;

/// Runs one seeder against the current schema.
pub async fn run(db: &DatabaseConnection, config: &Config, class: &str) -> Result<()> {
    let seeder = seeders::find(class)?;
    if seeder.name() == SchemaTestSeeder.name() {
        refuse_test_data_in_production(config)?;
    }

    println!("=> Running seeder: {}...", seeder.name());
    run_seeder(db, seeder.as_ref(), config).await?;
    println!("Operation completed successfully.");
    Ok(())
}
