use crate::config::{Config, Credentials};
use crate::seeders::{run_seeder, FoundationSeeder};
use crate::storage::{establish_connection, Migrator};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tempfile::TempDir;

/// A fresh SQLite file with the schema applied. Keep the `TempDir` alive.
pub async fn migrated_db() -> (DatabaseConnection, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
    let db = establish_connection(&db_url).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    (db, temp_dir)
}

/// `migrated_db` plus the foundation data.
pub async fn foundation_db() -> (DatabaseConnection, TempDir) {
    let (db, dir) = migrated_db().await;
    run_seeder(&db, &FoundationSeeder, &test_config())
        .await
        .unwrap();
    (db, dir)
}

fn credentials(name: &str, email: &str) -> Option<Credentials> {
    Some(Credentials {
        name: name.to_string(),
        email: email.to_string(),
        password: "secret".to_string(),
    })
}

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        app_env: "testing".to_string(),
        super_admin: credentials("Super Admin", "super@qrfeedz.test"),
        admin: None,
        crocrock_affiliate: credentials("Karine Esnault", "karine@crocrock.test"),
        crocrock_admin: credentials("Peres", "peres@crocrock.test"),
        crocrock_user: credentials("Partner", "partner@crocrock.test"),
        roche_townhall_admin_password: Some("secret".to_string()),
    }
}
