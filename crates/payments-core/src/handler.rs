//! # Submit Handler Trait
//!
//! The host's `onSubmit` callback: the single asynchronous boundary of the
//! checkout. Whatever it does (tokenize, call a backend, redirect) is opaque
//! to the core; only resolve vs. reject matters.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SubmitHandler (trait)                     │
//! │  ├── submit(payload) -> Result<(), SubmitError>             │
//! │  └── name()                                                 │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!          ┌─────────────────┼─────────────────┐
//!          │                 │                 │
//!  ┌───────┴───────┐ ┌───────┴───────┐ ┌───────┴───────┐
//!  │ JsSubmit      │ │ Simulated     │ │ AcceptAll     │
//!  │ Handler (wasm)│ │ Gateway (cli) │ │ Handler       │
//!  └───────────────┘ └───────────────┘ └───────────────┘
//! ```
//!
//! The trait is `?Send`: in the browser the callback returns a JS promise,
//! which cannot cross threads. The checkout is single-threaded anyway.

use crate::error::SubmitError;
use crate::form::PaymentSubmitPayload;
use async_trait::async_trait;
use std::rc::Rc;

/// Host callback invoked once per successful local validation pass
#[async_trait(?Send)]
pub trait SubmitHandler {
    /// Hand the validated payload to the host.
    ///
    /// # Returns
    /// `Ok(())` when the host accepted the payment, `Err` with the reason
    /// otherwise. There is no retry, timeout or cancellation.
    async fn submit(&self, payload: &PaymentSubmitPayload) -> Result<(), SubmitError>;

    /// Name used in logs
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Type alias for a shared submit handler (dynamic dispatch)
pub type BoxedSubmitHandler = Rc<dyn SubmitHandler>;

/// Handler that accepts every payload
///
/// Equivalent to mounting the checkout without an `onSubmit` callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllHandler;

#[async_trait(?Send)]
impl SubmitHandler for AcceptAllHandler {
    async fn submit(&self, _payload: &PaymentSubmitPayload) -> Result<(), SubmitError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "accept-all"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardPaymentFormData;

    struct Decline;

    #[async_trait(?Send)]
    impl SubmitHandler for Decline {
        async fn submit(&self, _payload: &PaymentSubmitPayload) -> Result<(), SubmitError> {
            Err(SubmitError::Rejected("Card declined".into()))
        }
    }

    #[tokio::test]
    async fn test_handlers() {
        let payload = PaymentSubmitPayload::Card(CardPaymentFormData::default());

        let accept: BoxedSubmitHandler = Rc::new(AcceptAllHandler);
        assert!(accept.submit(&payload).await.is_ok());
        assert_eq!(accept.name(), "accept-all");

        let decline: BoxedSubmitHandler = Rc::new(Decline);
        assert_eq!(
            decline.submit(&payload).await,
            Err(SubmitError::Rejected("Card declined".into()))
        );
        assert_eq!(decline.name(), "custom");
    }
}
