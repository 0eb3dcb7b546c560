use thiserror::Error;

use warbler_db::DbError;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("password hash error: {0}")]
    Hash(String),
}
