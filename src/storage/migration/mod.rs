use sea_orm_migration::prelude::*;

pub mod m20230217_000001_create_qrfeedz_schema;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20230217_000001_create_qrfeedz_schema::Migration)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::entity::locale;
    use crate::test_support::migrated_db;
    use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

    const TABLES: [&str; 24] = [
        "countries",
        "locales",
        "users",
        "affiliates",
        "clients",
        "locations",
        "categories",
        "tags",
        "questionnaires",
        "openai_prompts",
        "page_types",
        "pages",
        "page_instances",
        "questions",
        "question_instances",
        "widget_types",
        "widgets",
        "widget_instances",
        "responses",
        "localables",
        "authorizations",
        "authorizables",
        "categorizables",
        "taggables",
    ];

    #[tokio::test]
    async fn up_creates_every_table() {
        let (db, _dir) = migrated_db().await;
        let manager = SchemaManager::new(&db);
        for table in TABLES {
            assert!(manager.has_table(table).await.unwrap(), "{} missing", table);
        }
        assert!(manager.has_index("localables", "idx_localables_model").await.unwrap());
    }

    #[tokio::test]
    async fn fresh_empties_and_reapplies() {
        let (db, _dir) = migrated_db().await;
        locale::ActiveModel {
            canonical: Set("en".to_string()),
            name: Set("English".to_string()),
            created_at: Set(0),
            updated_at: Set(0),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        Migrator::fresh(&db).await.unwrap();

        assert_eq!(locale::Entity::find().count(&db).await.unwrap(), 0);
        assert!(SchemaManager::new(&db).has_table("widgets").await.unwrap());
    }

    #[tokio::test]
    async fn rollback_is_refused() {
        let (db, _dir) = migrated_db().await;
        let err = Migrator::down(&db, None).await.unwrap_err();
        assert!(err.to_string().contains("qrfeedz fresh"));
        assert!(SchemaManager::new(&db).has_table("clients").await.unwrap());
    }

    #[tokio::test]
    async fn version_pairs_are_unique() {
        use crate::storage::entity::question;

        let (db, _dir) = migrated_db().await;
        let row = |uuid: &str| question::ActiveModel {
            uuid: Set(uuid.to_string()),
            group_uuid: Set("group".to_string()),
            version: Set(1),
            name: Set("q".to_string()),
            description: Set(None),
            created_at: Set(0),
            updated_at: Set(0),
            deleted_at: Set(None),
            ..Default::default()
        };
        row("a").insert(&db).await.unwrap();
        assert!(row("b").insert(&db).await.is_err());
    }
}
