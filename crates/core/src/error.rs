use thiserror::Error;

use crate::model::{IdError, SuspendDataError, TaxonomyError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Id(#[from] IdError),
    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),
    #[error(transparent)]
    SuspendData(#[from] SuspendDataError),
}
