use sea_orm_migration::prelude::*;

/// Polymorphic joins, indexed on (model_type, model_id).
const MORPH_TABLES: [&str; 4] = ["localables", "authorizables", "categorizables", "taggables"];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Lookup tables
        manager
            .create_table(
                base(Countries::Table)
                    .col(ColumnDef::new(Countries::Code).string().not_null())
                    .col(ColumnDef::new(Countries::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                base(Locales::Table)
                    .col(ColumnDef::new(Locales::Canonical).string().not_null().unique_key())
                    .col(ColumnDef::new(Locales::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                base(Authorizations::Table)
                    .col(ColumnDef::new(Authorizations::Canonical).string().not_null().unique_key())
                    .col(ColumnDef::new(Authorizations::Name).string().not_null())
                    .col(ColumnDef::new(Authorizations::Description).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                base(Categories::Table)
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::Canonical).string().not_null().unique_key())
                    .col(ColumnDef::new(Categories::Description).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                base(Tags::Table)
                    .col(ColumnDef::new(Tags::Name).string().not_null())
                    .col(ColumnDef::new(Tags::Description).text())
                    .to_owned(),
            )
            .await?;

        // Tenancy
        manager
            .create_table(
                base(Users::Table)
                    .col(ColumnDef::new(Users::Name).string())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Password).string())
                    .col(ColumnDef::new(Users::ClientId).big_integer())
                    .col(ColumnDef::new(Users::LocaleId).big_integer())
                    .col(
                        ColumnDef::new(Users::CommissionPercentage)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Users::Address).text())
                    .col(ColumnDef::new(Users::PostalCode).string())
                    .col(ColumnDef::new(Users::Locality).string())
                    .col(ColumnDef::new(Users::CountryId).big_integer())
                    .col(ColumnDef::new(Users::IsSuperAdmin).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::IsAdmin).boolean().not_null().default(false))
                    .to_owned(),
            )
            .await?;
        foreign_id(manager, "users", Users::ClientId).await?;

        manager
            .create_table(
                base(Affiliates::Table)
                    .col(ColumnDef::new(Affiliates::UserId).big_integer())
                    .col(ColumnDef::new(Affiliates::Name).string().not_null())
                    .col(ColumnDef::new(Affiliates::Address).text())
                    .col(ColumnDef::new(Affiliates::PostalCode).string())
                    .col(ColumnDef::new(Affiliates::Locality).string())
                    .col(ColumnDef::new(Affiliates::CountryId).big_integer())
                    .col(
                        ColumnDef::new(Affiliates::CommissionPercentage)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;
        foreign_id(manager, "affiliates", Affiliates::UserId).await?;

        manager
            .create_table(
                base(Clients::Table)
                    .col(ColumnDef::new(Clients::Name).string().not_null())
                    .col(ColumnDef::new(Clients::AffiliateId).big_integer())
                    .col(ColumnDef::new(Clients::LocaleId).big_integer().not_null())
                    .col(ColumnDef::new(Clients::VatNumber).string())
                    .col(ColumnDef::new(Clients::Address).text())
                    .col(ColumnDef::new(Clients::PostalCode).string())
                    .col(ColumnDef::new(Clients::City).string())
                    .col(ColumnDef::new(Clients::CountryId).big_integer().not_null())
                    .col(ColumnDef::new(Clients::Latitude).string())
                    .col(ColumnDef::new(Clients::Longitude).string())
                    .to_owned(),
            )
            .await?;
        foreign_id(manager, "clients", Clients::AffiliateId).await?;

        manager
            .create_table(
                base(Locations::Table)
                    .col(ColumnDef::new(Locations::Name).string().not_null())
                    .col(ColumnDef::new(Locations::ClientId).big_integer().not_null())
                    .col(ColumnDef::new(Locations::Description).text())
                    .col(ColumnDef::new(Locations::Address).text())
                    .col(ColumnDef::new(Locations::PostalCode).string())
                    .col(ColumnDef::new(Locations::City).string())
                    .col(ColumnDef::new(Locations::CountryId).big_integer().not_null())
                    .col(ColumnDef::new(Locations::Latitude).string())
                    .col(ColumnDef::new(Locations::Longitude).string())
                    .to_owned(),
            )
            .await?;
        foreign_id(manager, "locations", Locations::ClientId).await?;

        // Questionnaires
        manager
            .create_table(
                base(Questionnaires::Table)
                    .col(ColumnDef::new(Questionnaires::Uuid).char_len(36).not_null().unique_key())
                    .col(ColumnDef::new(Questionnaires::ClientId).big_integer().not_null())
                    .col(ColumnDef::new(Questionnaires::LocationId).big_integer())
                    .col(ColumnDef::new(Questionnaires::LocaleId).big_integer())
                    .col(ColumnDef::new(Questionnaires::CategoryId).big_integer())
                    .col(ColumnDef::new(Questionnaires::Name).string())
                    .col(ColumnDef::new(Questionnaires::Title).string())
                    .col(ColumnDef::new(Questionnaires::Description).text())
                    .col(ColumnDef::new(Questionnaires::ColorPrimary).string().not_null())
                    .col(ColumnDef::new(Questionnaires::ColorSecondary).string().not_null())
                    .col(ColumnDef::new(Questionnaires::FileLogo).string())
                    .col(ColumnDef::new(Questionnaires::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Questionnaires::Data).json())
                    .col(ColumnDef::new(Questionnaires::StartsAt).big_integer())
                    .col(ColumnDef::new(Questionnaires::EndsAt).big_integer())
                    .to_owned(),
            )
            .await?;
        foreign_id(manager, "questionnaires", Questionnaires::ClientId).await?;
        foreign_id(manager, "questionnaires", Questionnaires::LocationId).await?;

        manager
            .create_table(
                base(OpenaiPrompts::Table)
                    .col(ColumnDef::new(OpenaiPrompts::QuestionnaireId).big_integer().not_null())
                    .col(ColumnDef::new(OpenaiPrompts::PromptIAmABusinessOf).text())
                    .col(ColumnDef::new(OpenaiPrompts::PromptIAmPayingAttentionTo).text())
                    .col(
                        ColumnDef::new(OpenaiPrompts::BalanceType)
                            .string()
                            .not_null()
                            .default("balanced"),
                    )
                    .col(
                        ColumnDef::new(OpenaiPrompts::ShouldBeEmailAware)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;
        foreign_id(manager, "openai_prompts", OpenaiPrompts::QuestionnaireId).await?;

        // Pages
        manager
            .create_table(
                base(PageTypes::Table)
                    .col(ColumnDef::new(PageTypes::Name).string().not_null())
                    .col(ColumnDef::new(PageTypes::Canonical).string().not_null().unique_key())
                    .col(ColumnDef::new(PageTypes::Description).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                base(Pages::Table)
                    .col(ColumnDef::new(Pages::PageTypeId).big_integer().not_null())
                    .col(ColumnDef::new(Pages::Name).string().not_null())
                    .col(ColumnDef::new(Pages::Canonical).string().not_null().unique_key())
                    .col(ColumnDef::new(Pages::Description).text())
                    .col(
                        ColumnDef::new(Pages::ViewComponentNamespace)
                            .string()
                            .not_null()
                            .default("survey"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                base(PageInstances::Table)
                    .col(ColumnDef::new(PageInstances::Uuid).char_len(36).not_null().unique_key())
                    .col(ColumnDef::new(PageInstances::Name).string().not_null())
                    .col(ColumnDef::new(PageInstances::PageId).big_integer().not_null())
                    .col(ColumnDef::new(PageInstances::QuestionnaireId).big_integer().not_null())
                    .col(ColumnDef::new(PageInstances::Index).integer().not_null())
                    .col(ColumnDef::new(PageInstances::Group).string())
                    .col(ColumnDef::new(PageInstances::ViewComponentOverride).string())
                    .col(ColumnDef::new(PageInstances::Data).json())
                    .to_owned(),
            )
            .await?;
        foreign_id(manager, "page_instances", PageInstances::QuestionnaireId).await?;

        // Questions and widgets, versioned by (group_uuid, version)
        manager
            .create_table(
                base(Questions::Table)
                    .col(ColumnDef::new(Questions::Uuid).char_len(36).not_null().unique_key())
                    .col(ColumnDef::new(Questions::GroupUuid).char_len(36).not_null())
                    .col(ColumnDef::new(Questions::Version).integer().not_null().default(1))
                    .col(ColumnDef::new(Questions::Name).string().not_null())
                    .col(ColumnDef::new(Questions::Description).text())
                    .to_owned(),
            )
            .await?;
        unique_version(manager, "questions", Questions::GroupUuid, Questions::Version).await?;

        manager
            .create_table(
                base(QuestionInstances::Table)
                    .col(ColumnDef::new(QuestionInstances::Uuid).char_len(36).not_null().unique_key())
                    .col(ColumnDef::new(QuestionInstances::PageInstanceId).big_integer().not_null())
                    .col(ColumnDef::new(QuestionInstances::QuestionId).big_integer().not_null())
                    .col(ColumnDef::new(QuestionInstances::Index).integer().not_null())
                    .col(
                        ColumnDef::new(QuestionInstances::IsAnalytical)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(QuestionInstances::IsUsedForPersonalData)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(QuestionInstances::IsRequired)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;
        foreign_id(manager, "question_instances", QuestionInstances::PageInstanceId).await?;
        foreign_id(manager, "question_instances", QuestionInstances::QuestionId).await?;

        manager
            .create_table(
                base(WidgetTypes::Table)
                    .col(ColumnDef::new(WidgetTypes::Name).string().not_null())
                    .col(ColumnDef::new(WidgetTypes::Canonical).string().not_null().unique_key())
                    .col(ColumnDef::new(WidgetTypes::Description).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                base(Widgets::Table)
                    .col(ColumnDef::new(Widgets::Uuid).char_len(36).not_null().unique_key())
                    .col(ColumnDef::new(Widgets::GroupUuid).char_len(36).not_null())
                    .col(ColumnDef::new(Widgets::Version).integer().not_null().default(1))
                    .col(ColumnDef::new(Widgets::WidgetTypeId).big_integer().not_null())
                    .col(ColumnDef::new(Widgets::Name).string().not_null())
                    .col(ColumnDef::new(Widgets::Canonical).string().not_null())
                    .col(ColumnDef::new(Widgets::Description).text())
                    .col(ColumnDef::new(Widgets::Settings).json())
                    .col(ColumnDef::new(Widgets::IsProgressable).boolean().not_null().default(true))
                    .col(ColumnDef::new(Widgets::IsFullPage).boolean().not_null().default(false))
                    .col(ColumnDef::new(Widgets::ViewComponentNamespace).string().not_null())
                    .to_owned(),
            )
            .await?;
        unique_version(manager, "widgets", Widgets::GroupUuid, Widgets::Version).await?;
        unique_version(manager, "widgets", Widgets::Canonical, Widgets::Version).await?;

        manager
            .create_table(
                base(WidgetInstances::Table)
                    .col(ColumnDef::new(WidgetInstances::Uuid).char_len(36).not_null().unique_key())
                    .col(ColumnDef::new(WidgetInstances::QuestionInstanceId).big_integer())
                    .col(ColumnDef::new(WidgetInstances::WidgetId).big_integer().not_null())
                    .col(ColumnDef::new(WidgetInstances::Index).integer())
                    .col(ColumnDef::new(WidgetInstances::WidgetInstanceId).big_integer())
                    .col(ColumnDef::new(WidgetInstances::When).json())
                    .col(ColumnDef::new(WidgetInstances::Then).json())
                    .col(ColumnDef::new(WidgetInstances::Data).json())
                    .to_owned(),
            )
            .await?;
        foreign_id(manager, "widget_instances", WidgetInstances::QuestionInstanceId).await?;
        foreign_id(manager, "widget_instances", WidgetInstances::WidgetInstanceId).await?;

        manager
            .create_table(
                base(Responses::Table)
                    .col(ColumnDef::new(Responses::SessionInstanceId).string().not_null())
                    .col(ColumnDef::new(Responses::QuestionInstanceId).big_integer().not_null())
                    .col(ColumnDef::new(Responses::WidgetInstanceId).big_integer().not_null())
                    .col(ColumnDef::new(Responses::Value).json())
                    .to_owned(),
            )
            .await?;
        foreign_id(manager, "responses", Responses::QuestionInstanceId).await?;
        foreign_id(manager, "responses", Responses::SessionInstanceId).await?;

        // Polymorphic joins
        manager
            .create_table(
                morph(Localables::Table)
                    .col(ColumnDef::new(Localables::LocaleId).big_integer().not_null())
                    .col(ColumnDef::new(Localables::Caption).string().not_null())
                    .col(ColumnDef::new(Localables::Placeholder).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                morph(Authorizables::Table)
                    .col(ColumnDef::new(Authorizables::AuthorizationId).big_integer().not_null())
                    .col(ColumnDef::new(Authorizables::UserId).big_integer().not_null())
                    .to_owned(),
            )
            .await?;
        foreign_id(manager, "authorizables", Authorizables::UserId).await?;

        manager
            .create_table(
                morph(Categorizables::Table)
                    .col(ColumnDef::new(Categorizables::CategoryId).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                morph(Taggables::Table)
                    .col(ColumnDef::new(Taggables::TagId).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        for table in MORPH_TABLES {
            manager
                .create_index(
                    Index::create()
                        .name(format!("idx_{}_model", table))
                        .table(Alias::new(table))
                        .col(Morph::ModelType)
                        .col(Morph::ModelId)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        Err(DbErr::Migration(
            "rolling back the qrfeedz schema is not supported, run `qrfeedz fresh` instead"
                .to_string(),
        ))
    }
}

/// `id` primary key, timestamps and soft delete column.
fn base<T: IntoIden + 'static>(table: T) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(
            ColumnDef::new(Common::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Common::CreatedAt).big_integer().not_null())
        .col(ColumnDef::new(Common::UpdatedAt).big_integer().not_null())
        .col(ColumnDef::new(Common::DeletedAt).big_integer())
        .to_owned()
}

/// `base` plus the `model_type` / `model_id` pair of a polymorphic join.
fn morph<T: IntoIden + 'static>(table: T) -> TableCreateStatement {
    base(table)
        .col(ColumnDef::new(Morph::ModelType).string().not_null())
        .col(ColumnDef::new(Morph::ModelId).big_integer().not_null())
        .to_owned()
}

/// Foreign ids carry an index but no constraint: users, clients and affiliates reference each other.
async fn foreign_id<C: IntoIden + 'static>(
    manager: &SchemaManager<'_>,
    table: &str,
    column: C,
) -> Result<(), DbErr> {
    let column = column.into_iden();
    manager
        .create_index(
            Index::create()
                .name(format!("idx_{}_{}", table, column.to_string()))
                .table(Alias::new(table))
                .col(column)
                .to_owned(),
        )
        .await
}

async fn unique_version<A, B>(
    manager: &SchemaManager<'_>,
    table: &str,
    key: A,
    version: B,
) -> Result<(), DbErr>
where
    A: IntoIden + 'static,
    B: IntoIden + 'static,
{
    let key = key.into_iden();
    manager
        .create_index(
            Index::create()
                .name(format!("idx_{}_{}_version", table, key.to_string()))
                .table(Alias::new(table))
                .col(key)
                .col(version)
                .unique()
                .to_owned(),
        )
        .await
}

#[derive(DeriveIden)]
enum Common {
    Id,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Morph {
    ModelType,
    ModelId,
}

#[derive(DeriveIden)]
enum Countries {
    Table,
    Code,
    Name,
}

#[derive(DeriveIden)]
enum Locales {
    Table,
    Canonical,
    Name,
}

#[derive(DeriveIden)]
enum Authorizations {
    Table,
    Canonical,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Name,
    Canonical,
    Description,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Name,
    Email,
    Password,
    ClientId,
    LocaleId,
    CommissionPercentage,
    Address,
    PostalCode,
    Locality,
    CountryId,
    IsSuperAdmin,
    IsAdmin,
}

#[derive(DeriveIden)]
enum Affiliates {
    Table,
    UserId,
    Name,
    Address,
    PostalCode,
    Locality,
    CountryId,
    CommissionPercentage,
}

#[derive(DeriveIden)]
enum Clients {
    Table,
    Name,
    AffiliateId,
    LocaleId,
    VatNumber,
    Address,
    PostalCode,
    City,
    CountryId,
    Latitude,
    Longitude,
}

#[derive(DeriveIden)]
enum Locations {
    Table,
    Name,
    ClientId,
    Description,
    Address,
    PostalCode,
    City,
    CountryId,
    Latitude,
    Longitude,
}

#[derive(DeriveIden)]
enum Questionnaires {
    Table,
    Uuid,
    ClientId,
    LocationId,
    LocaleId,
    CategoryId,
    Name,
    Title,
    Description,
    ColorPrimary,
    ColorSecondary,
    FileLogo,
    IsActive,
    Data,
    StartsAt,
    EndsAt,
}

#[derive(DeriveIden)]
enum OpenaiPrompts {
    Table,
    QuestionnaireId,
    #[sea_orm(iden = "prompt_i_am_a_business_of")]
    PromptIAmABusinessOf,
    #[sea_orm(iden = "prompt_i_am_paying_attention_to")]
    PromptIAmPayingAttentionTo,
    BalanceType,
    ShouldBeEmailAware,
}

#[derive(DeriveIden)]
enum PageTypes {
    Table,
    Name,
    Canonical,
    Description,
}

#[derive(DeriveIden)]
enum Pages {
    Table,
    PageTypeId,
    Name,
    Canonical,
    Description,
    ViewComponentNamespace,
}

#[derive(DeriveIden)]
enum PageInstances {
    Table,
    Uuid,
    Name,
    PageId,
    QuestionnaireId,
    Index,
    Group,
    ViewComponentOverride,
    Data,
}

#[derive(DeriveIden)]
enum Questions {
    Table,
    Uuid,
    GroupUuid,
    Version,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum QuestionInstances {
    Table,
    Uuid,
    PageInstanceId,
    QuestionId,
    Index,
    IsAnalytical,
    IsUsedForPersonalData,
    IsRequired,
}

#[derive(DeriveIden)]
enum WidgetTypes {
    Table,
    Name,
    Canonical,
    Description,
}

#[derive(DeriveIden)]
enum Widgets {
    Table,
    Uuid,
    GroupUuid,
    Version,
    WidgetTypeId,
    Name,
    Canonical,
    Description,
    Settings,
    IsProgressable,
    IsFullPage,
    ViewComponentNamespace,
}

#[derive(DeriveIden)]
enum WidgetInstances {
    Table,
    Uuid,
    QuestionInstanceId,
    WidgetId,
    Index,
    WidgetInstanceId,
    When,
    Then,
    Data,
}

#[derive(DeriveIden)]
enum Responses {
    Table,
    SessionInstanceId,
    QuestionInstanceId,
    WidgetInstanceId,
    Value,
}

#[derive(DeriveIden)]
enum Localables {
    Table,
    LocaleId,
    Caption,
    Placeholder,
}

#[derive(DeriveIden)]
enum Authorizables {
    Table,
    AuthorizationId,
    UserId,
}

#[derive(DeriveIden)]
enum Categorizables {
    Table,
    CategoryId,
}

#[derive(DeriveIden)]
enum Taggables {
    Table,
    TagId,
}
