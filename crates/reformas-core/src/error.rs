use reformas_domain::DomainError;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid quantity: {0} (must be greater than zero)")]
    InvalidQuantity(Decimal),
    #[error("Line item not found: {0}")]
    LineItemNotFound(Uuid),
    #[error("Installment not found at position {0}")]
    InstallmentNotFound(usize),
    #[error("Schedule entry not found at position {0}")]
    ScheduleEntryNotFound(usize),
    #[error("Catalog entry not found: {0}")]
    CatalogEntryNotFound(String),
    #[error("Quote not found: {0}")]
    QuoteNotFound(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::LineItemNotFound(_)
                | CoreError::InstallmentNotFound(_)
                | CoreError::ScheduleEntryNotFound(_)
                | CoreError::CatalogEntryNotFound(_)
                | CoreError::QuoteNotFound(_)
        )
    }
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidQuantity(value) => CoreError::InvalidQuantity(value),
            other => CoreError::Validation(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}
