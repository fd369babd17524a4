use sea_orm::DbErr;

#[derive(thiserror::Error, Debug)]
pub enum QrfeedzError {
    #[error("database error: {0}")]
    Db(#[from] DbErr),
    #[error("no live row in {table} where {column} = {value}")]
    MissingLookup {
        table: &'static str,
        column: &'static str,
        value: String,
    },
    #[error("missing env {0}")]
    MissingEnv(&'static str),
    #[error("unknown seeder: {0}")]
    UnknownSeeder(String),
    #[error("invalid conditional: {0}")]
    InvalidConditional(String),
    #[error("password hashing failed: {0}")]
    Password(String),
    #[error("refused: {0}")]
    Refused(String),
}

impl QrfeedzError {
    pub fn missing(table: &'static str, column: &'static str, value: impl ToString) -> Self {
        QrfeedzError::MissingLookup {
            table,
            column,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QrfeedzError>;
