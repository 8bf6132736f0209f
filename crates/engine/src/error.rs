//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidAmount`] thrown when a monetary value fails validation.
//! - [`KeyNotFound`] thrown when an item is not found.
//! - [`NotEditable`] thrown when a view-mode or locked field is edited.
//! - [`Unbalanced`] thrown when a submission is attempted while the owed
//!   ledger does not balance against the total.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`NotEditable`]: EngineError::NotEditable
//!  [`Unbalanced`]: EngineError::Unbalanced
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Not editable: {0}")]
    NotEditable(String),
    #[error("Unbalanced split: {0}")]
    Unbalanced(String),
    #[error("Currency mismatch: {0}")]
    CurrencyMismatch(String),
}
