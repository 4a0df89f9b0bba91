use thiserror::Error;

use realty_core::{BuildingId, ErrorKind, FieldError, StoreError, UnitId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("house {0} not found")]
    BuildingNotFound(BuildingId),

    #[error("flat {0} not found")]
    UnitNotFound(UnitId),

    #[error("flat {number} already exists in house {building}")]
    DuplicateUnit { building: BuildingId, number: i32 },

    #[error("validation failed: {0}")]
    Validation(#[from] FieldError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::BuildingNotFound(_) | CatalogError::UnitNotFound(_) => ErrorKind::NotFound,
            CatalogError::DuplicateUnit { .. } => ErrorKind::Conflict,
            CatalogError::Validation(_) => ErrorKind::ValidationFailed,
            CatalogError::Store(_) => ErrorKind::Internal,
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
