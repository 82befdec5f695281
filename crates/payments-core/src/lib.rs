//! # payments-core
//!
//! Decision logic behind the Bloque checkout elements.
//!
//! This crate provides:
//! - `validate` and `Field`: the per-field client-side validation rules
//! - `CardPaymentForm`, `PsePaymentForm`, `CashPaymentForm`: form models
//!   holding values and per-field errors, producing a `PaymentSubmitPayload`
//! - `MethodSelector`: which payment methods are offered and which is active
//! - `Checkout`: the orchestrator owning the submission lifecycle
//! - `SubmitHandler` and `CheckoutObserver`: the host-facing seams
//! - `CheckoutConfig`: host configuration (TOML or JS object)
//!
//! ## Example
//!
//! ```rust,ignore
//! use payments_core::{Checkout, CheckoutConfig, Field, PaymentMethodType};
//!
//! let mut checkout = Checkout::new(CheckoutConfig::default())?
//!     .with_submit_handler(Rc::new(MyBackend::new()));
//!
//! checkout.select(PaymentMethodType::Pse)?;
//! checkout.update_field(Field::DocumentNumber, "1020304050")?;
//! checkout.update_field(Field::BankCode, "bancolombia")?;
//! checkout.update_field(Field::Email, "pagos@empresa.co")?;
//!
//! match checkout.submit().await? {
//!     SubmitOutcome::Invalid => { /* render checkout.errors() */ }
//!     SubmitOutcome::Succeeded { .. } => { /* done */ }
//!     SubmitOutcome::Failed { error, .. } => { /* show error banner */ }
//! }
//! ```

pub mod card;
pub mod cash;
pub mod checkout;
pub mod config;
pub mod error;
pub mod events;
pub mod form;
pub mod handler;
pub mod method;
pub mod pse;
pub mod selector;
pub mod validation;

// Re-exports for convenience
pub use card::{format_card_number, CardBrand, CardPaymentForm, CardPaymentFormData};
pub use cash::{CashPaymentForm, CashPaymentFormData, CASH_DOCUMENT_TYPES};
pub use checkout::{Checkout, CheckoutState, SubmitOutcome};
pub use config::{AppearanceConfig, CheckoutConfig};
pub use error::{CheckoutError, CheckoutResult, SubmitError, SUBMIT_FALLBACK_MESSAGE};
pub use events::{dispatch_checkout_event, CheckoutEvent, CheckoutObserver, LoggingObserver};
pub use form::{FieldErrors, FormModel, PaymentForm, PaymentSubmitPayload};
pub use handler::{AcceptAllHandler, BoxedSubmitHandler, SubmitHandler};
pub use method::{payment_methods, PaymentMethod, PaymentMethodType};
pub use pse::{PersonType, PsePaymentForm, PsePaymentFormData, BANKS, PSE_DOCUMENT_TYPES};
pub use selector::MethodSelector;
pub use validation::{validate, Field, ValidationContext};
