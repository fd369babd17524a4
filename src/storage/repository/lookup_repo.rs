use super::soft_delete::live;
use crate::error::{QrfeedzError, Result};
use crate::storage::entity::*;
use sea_orm::{ColumnTrait, ConnectionTrait, QueryFilter};

/// Live-row lookups by natural key. A miss is a `MissingLookup` error.
pub struct LookupRepository;

impl LookupRepository {
    pub async fn country_by_name<C: ConnectionTrait>(db: &C, name: &str) -> Result<country::Model> {
        live::<country::Entity>()
            .filter(country::Column::Name.eq(name))
            .one(db)
            .await?
            .ok_or_else(|| QrfeedzError::missing("countries", "name", name))
    }

    pub async fn country_by_code<C: ConnectionTrait>(db: &C, code: &str) -> Result<country::Model> {
        live::<country::Entity>()
            .filter(country::Column::Code.eq(code.to_uppercase()))
            .one(db)
            .await?
            .ok_or_else(|| QrfeedzError::missing("countries", "code", code))
    }

    pub async fn locale_by_canonical<C: ConnectionTrait>(
        db: &C,
        canonical: &str,
    ) -> Result<locale::Model> {
        live::<locale::Entity>()
            .filter(locale::Column::Canonical.eq(canonical))
            .one(db)
            .await?
            .ok_or_else(|| QrfeedzError::missing("locales", "canonical", canonical))
    }

    pub async fn authorization_by_canonical<C: ConnectionTrait>(
        db: &C,
        canonical: &str,
    ) -> Result<authorization::Model> {
        live::<authorization::Entity>()
            .filter(authorization::Column::Canonical.eq(canonical))
            .one(db)
            .await?
            .ok_or_else(|| QrfeedzError::missing("authorizations", "canonical", canonical))
    }

    pub async fn category_by_canonical<C: ConnectionTrait>(
        db: &C,
        canonical: &str,
    ) -> Result<category::Model> {
        live::<category::Entity>()
            .filter(category::Column::Canonical.eq(canonical))
            .one(db)
            .await?
            .ok_or_else(|| QrfeedzError::missing("categories", "canonical", canonical))
    }

    pub async fn page_type_by_canonical<C: ConnectionTrait>(
        db: &C,
        canonical: &str,
    ) -> Result<page_type::Model> {
        live::<page_type::Entity>()
            .filter(page_type::Column::Canonical.eq(canonical))
            .one(db)
            .await?
            .ok_or_else(|| QrfeedzError::missing("page_types", "canonical", canonical))
    }

    pub async fn page_by_canonical<C: ConnectionTrait>(db: &C, canonical: &str) -> Result<page::Model> {
        live::<page::Entity>()
            .filter(page::Column::Canonical.eq(canonical))
            .one(db)
            .await?
            .ok_or_else(|| QrfeedzError::missing("pages", "canonical", canonical))
    }

    pub async fn widget_type_by_canonical<C: ConnectionTrait>(
        db: &C,
        canonical: &str,
    ) -> Result<widget_type::Model> {
        live::<widget_type::Entity>()
            .filter(widget_type::Column::Canonical.eq(canonical))
            .one(db)
            .await?
            .ok_or_else(|| QrfeedzError::missing("widget_types", "canonical", canonical))
    }

    pub async fn user_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<user::Model> {
        live::<user::Entity>()
            .filter(user::Column::Email.eq(email))
            .one(db)
            .await?
            .ok_or_else(|| QrfeedzError::missing("users", "email", email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::foundation_db;

    #[tokio::test]
    async fn foundation_lookups_resolve() {
        let (db, _dir) = foundation_db().await;

        let ch = LookupRepository::country_by_name(&db, "Switzerland").await.unwrap();
        assert_eq!(ch.code, "CH");
        assert_eq!(
            LookupRepository::country_by_code(&db, "fr").await.unwrap().name,
            "France"
        );
        for canonical in ["en", "it", "fr", "pt", "de"] {
            LookupRepository::locale_by_canonical(&db, canonical).await.unwrap();
        }
        for canonical in ["affiliate", "admin", "view", "gdpr"] {
            LookupRepository::authorization_by_canonical(&db, canonical)
                .await
                .unwrap();
        }
        for canonical in ["welcome-select", "form-default", "promo-default", "full-screen"] {
            LookupRepository::page_by_canonical(&db, canonical).await.unwrap();
        }
        LookupRepository::page_type_by_canonical(&db, "survey").await.unwrap();
        LookupRepository::widget_type_by_canonical(&db, "rating").await.unwrap();
        LookupRepository::category_by_canonical(&db, "cantine").await.unwrap();
        LookupRepository::user_by_email(&db, "super@qrfeedz.test")
            .await
            .unwrap();

        let err = LookupRepository::country_by_name(&db, "Atlantis")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "no live row in countries where name = Atlantis"
        );
    }
}
