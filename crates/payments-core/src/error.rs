//! # Checkout Error Types
//!
//! Typed error handling for the checkout core.
//!
//! Field validation failures are not errors in this sense: they live in a
//! form's error map and never leave it. The types here cover the two other
//! failure classes:
//! - `SubmitError`: the host's submit callback rejected the payload
//! - `CheckoutError`: the presentation layer drove the core incorrectly

use crate::method::PaymentMethodType;
use thiserror::Error;

/// Message shown when a submission fails without a usable message
pub const SUBMIT_FALLBACK_MESSAGE: &str = "Payment failed. Please try again.";

/// Failure reported by the external submit callback
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The callback rejected with a message
    #[error("{0}")]
    Rejected(String),

    /// The callback rejected with something that carries no message
    #[error("Payment failed. Please try again.")]
    Unspecified,
}

impl SubmitError {
    /// Build from an optional message, treating blank text as no message
    pub fn from_message(message: Option<impl Into<String>>) -> Self {
        match message.map(Into::into) {
            Some(text) if !text.trim().is_empty() => SubmitError::Rejected(text),
            _ => SubmitError::Unspecified,
        }
    }

    /// Text surfaced to the customer and to `PaymentFailed` listeners
    pub fn display_message(&self) -> String {
        match self {
            SubmitError::Rejected(text) if !text.trim().is_empty() => text.clone(),
            _ => SUBMIT_FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// Errors raised when the core is driven with inconsistent input
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Configuration errors (empty method list, unparsable config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Field name not recognised at all
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Field exists but does not belong to the active form
    #[error("Field {field} is not part of the {method} form")]
    FieldNotInForm {
        field: String,
        method: PaymentMethodType,
    },

    /// Value rejected before validation (e.g. unknown person type)
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Unknown payment method name
    #[error("Unknown payment method: {0}")]
    UnknownMethod(String),

    /// Method is valid but not enabled for this checkout
    #[error("Payment method not available: {0}")]
    MethodUnavailable(PaymentMethodType),

    /// Form interaction before any method was chosen
    #[error("No payment method selected")]
    NoMethodSelected,

    /// Submit triggered while the previous one is still pending
    #[error("A submission is already in progress")]
    SubmissionInProgress,

    /// `complete_submission` called with nothing pending
    #[error("No submission is in progress")]
    NoSubmissionInProgress,
}

impl CheckoutError {
    /// Returns true if the caller can recover by waiting or re-rendering
    pub fn is_transient(&self) -> bool {
        matches!(self, CheckoutError::SubmissionInProgress)
    }
}

impl From<toml::de::Error> for CheckoutError {
    fn from(err: toml::de::Error) -> Self {
        CheckoutError::Configuration(err.to_string())
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_error_messages() {
        assert_eq!(
            SubmitError::Rejected("Insufficient funds".into()).display_message(),
            "Insufficient funds"
        );
        assert_eq!(
            SubmitError::Unspecified.display_message(),
            SUBMIT_FALLBACK_MESSAGE
        );
        assert_eq!(
            SubmitError::Rejected("   ".into()).display_message(),
            SUBMIT_FALLBACK_MESSAGE
        );
    }

    #[test]
    fn test_submit_error_from_message() {
        assert_eq!(
            SubmitError::from_message(Some("Card declined")),
            SubmitError::Rejected("Card declined".into())
        );
        assert_eq!(SubmitError::from_message(Some("")), SubmitError::Unspecified);
        assert_eq!(
            SubmitError::from_message(None::<String>),
            SubmitError::Unspecified
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            CheckoutError::MethodUnavailable(PaymentMethodType::Cash).to_string(),
            "Payment method not available: cash"
        );
        assert_eq!(
            CheckoutError::FieldNotInForm {
                field: "cvv".into(),
                method: PaymentMethodType::Pse
            }
            .to_string(),
            "Field cvv is not part of the pse form"
        );
        assert!(CheckoutError::SubmissionInProgress.is_transient());
        assert!(!CheckoutError::NoMethodSelected.is_transient());
    }
}
