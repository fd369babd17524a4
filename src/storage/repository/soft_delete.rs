use crate::storage::entity::*;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Select};

/// Every qrfeedz table carries `id` and a nullable `deleted_at`.
pub trait SoftDeletes: EntityTrait {
    fn id_column() -> Self::Column;
    fn deleted_at_column() -> Self::Column;
}

macro_rules! soft_deletes {
    ($($module:ident),+ $(,)?) => {
        $(
            impl SoftDeletes for $module::Entity {
                fn id_column() -> Self::Column {
                    $module::Column::Id
                }

                fn deleted_at_column() -> Self::Column {
                    $module::Column::DeletedAt
                }
            }
        )+
    };
}

soft_deletes!(
    affiliate,
    authorizable,
    authorization,
    categorizable,
    category,
    client,
    country,
    localable,
    locale,
    location,
    openai_prompt,
    page,
    page_instance,
    page_type,
    question,
    question_instance,
    questionnaire,
    response,
    tag,
    taggable,
    user,
    widget,
    widget_instance,
    widget_type,
);

/// Rows that have not been soft deleted.
pub fn live<E: SoftDeletes>() -> Select<E> {
    E::find().filter(E::deleted_at_column().is_null())
}

pub async fn find_live<E, C>(db: &C, id: i64) -> Result<Option<E::Model>, DbErr>
where
    E: SoftDeletes,
    C: ConnectionTrait,
{
    live::<E>().filter(E::id_column().eq(id)).one(db).await
}

/// Returns false when the row does not exist or is already deleted.
pub async fn soft_delete<E, C>(db: &C, id: i64) -> Result<bool, DbErr>
where
    E: SoftDeletes,
    C: ConnectionTrait,
{
    let now = Utc::now().timestamp();
    let res = E::update_many()
        .col_expr(E::deleted_at_column(), Expr::value(now))
        .filter(E::id_column().eq(id))
        .filter(E::deleted_at_column().is_null())
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

pub async fn restore<E, C>(db: &C, id: i64) -> Result<bool, DbErr>
where
    E: SoftDeletes,
    C: ConnectionTrait,
{
    let res = E::update_many()
        .col_expr(E::deleted_at_column(), Expr::value(Option::<i64>::None))
        .filter(E::id_column().eq(id))
        .filter(E::deleted_at_column().is_not_null())
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QrfeedzError;
    use crate::storage::repository::LookupRepository;
    use crate::test_support::migrated_db;
    use sea_orm::{ActiveModelTrait, PaginatorTrait, Set};

    #[tokio::test]
    async fn deleted_rows_disappear_from_lookups_until_restored() {
        let (db, _dir) = migrated_db().await;
        let pt = locale::ActiveModel {
            canonical: Set("pt".to_string()),
            name: Set("Portuguese".to_string()),
            created_at: Set(0),
            updated_at: Set(0),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        assert!(soft_delete::<locale::Entity, _>(&db, pt.id).await.unwrap());
        assert!(!soft_delete::<locale::Entity, _>(&db, pt.id).await.unwrap());

        let err = LookupRepository::locale_by_canonical(&db, "pt")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QrfeedzError::MissingLookup {
                table: "locales",
                ..
            }
        ));
        assert!(find_live::<locale::Entity, _>(&db, pt.id)
            .await
            .unwrap()
            .is_none());
        // the row itself is kept
        assert_eq!(locale::Entity::find().count(&db).await.unwrap(), 1);

        assert!(restore::<locale::Entity, _>(&db, pt.id).await.unwrap());
        let back = LookupRepository::locale_by_canonical(&db, "pt").await.unwrap();
        assert_eq!(back.id, pt.id);
        assert!(back.deleted_at.is_none());
    }
}
