use cafe_client::ClientError;
use thiserror::Error;

use super::validation::FieldErrors;

/// Checkout errors
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Form is incomplete; nothing was sent
    #[error("{0}")]
    Validation(FieldErrors),

    /// Backend rejected or could not receive the order
    #[error("{0}")]
    Submit(#[from] ClientError),

    /// A checkout session is already running
    #[error("Checkout already in progress")]
    InProgress,
}

impl CheckoutError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            CheckoutError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Missing backend configuration, as opposed to a rejected order
    pub fn is_configuration(&self) -> bool {
        matches!(self, CheckoutError::Submit(e) if e.is_configuration())
    }
}

pub type CheckoutResult<T> = Result<T, CheckoutError>;
