//! # Form Models
//!
//! Shared machinery for the card, PSE and cash forms: the per-field error
//! map, the submitted payload and the `FormModel` trait carrying the
//! update/validate/submit flow.
//!
//! ```text
//! update_field(field, raw)
//!     └── normalize (digits only, max length)
//!         └── validate(field, value, ctx)
//!             └── errors.record(field, outcome)   // touches one entry only
//!
//! submit()
//!     └── errors rebuilt from every submit field
//!         ├── any error  → None (form keeps showing messages)
//!         └── all valid  → Some(PaymentSubmitPayload)
//! ```

use crate::card::{CardPaymentForm, CardPaymentFormData};
use crate::cash::{CashPaymentForm, CashPaymentFormData};
use crate::error::{CheckoutError, CheckoutResult};
use crate::method::PaymentMethodType;
use crate::pse::{PsePaymentForm, PsePaymentFormData};
use crate::validation::{validate, Field, ValidationContext};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Current validation messages, keyed by field
///
/// A missing key means the field is currently valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the outcome of one validation; returns true if the field is valid
    pub fn record(&mut self, field: Field, outcome: Option<String>) -> bool {
        match outcome {
            Some(message) => {
                self.0.insert(field, message);
                false
            }
            None => {
                self.0.remove(&field);
                true
            }
        }
    }

    /// Message for a field, if it is currently invalid
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// Validated form data handed to the host's submit callback
///
/// Serializes as `{"type": "card", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum PaymentSubmitPayload {
    Card(CardPaymentFormData),
    Pse(PsePaymentFormData),
    Cash(CashPaymentFormData),
}

impl PaymentSubmitPayload {
    pub fn method_type(&self) -> PaymentMethodType {
        match self {
            PaymentSubmitPayload::Card(_) => PaymentMethodType::Card,
            PaymentSubmitPayload::Pse(_) => PaymentMethodType::Pse,
            PaymentSubmitPayload::Cash(_) => PaymentMethodType::Cash,
        }
    }
}

/// Document type option shown in PSE and cash selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentTypeOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Default document type for new PSE and cash forms
pub const DEFAULT_DOCUMENT_TYPE: &str = "CC";

/// Behaviour shared by every payment form.
///
/// Implementors provide storage and normalization; the trait supplies the
/// validation bookkeeping and the submit flow.
pub trait FormModel {
    /// Method this form collects data for
    const METHOD: PaymentMethodType;

    /// Fields re-validated on submit
    fn submit_fields(&self) -> &'static [Field];

    fn context(&self) -> &ValidationContext;

    fn errors(&self) -> &FieldErrors;

    fn errors_mut(&mut self) -> &mut FieldErrors;

    /// Stored value of a field, `None` if the field is not part of this form
    fn value(&self, field: Field) -> Option<&str>;

    /// Normalize and store a raw input value
    fn set_value(&mut self, field: Field, raw: &str) -> CheckoutResult<()>;

    /// Snapshot of the current values as a payload
    fn payload(&self) -> PaymentSubmitPayload;

    /// Re-run the rule for one field and update only that entry
    fn validate_field(&mut self, field: Field) -> bool {
        let value = self.value(field).unwrap_or_default().to_string();
        let outcome = validate(field, &value, self.context());
        self.errors_mut().record(field, outcome)
    }

    /// Input event: normalize, store, validate. Returns the field's message.
    fn update_field(&mut self, field: Field, raw: &str) -> CheckoutResult<Option<String>> {
        self.set_value(field, raw)?;
        self.validate_field(field);
        let message = self.errors().get(field).map(String::from);
        debug!(
            method = %Self::METHOD,
            field = %field,
            valid = message.is_none(),
            "field updated"
        );
        Ok(message)
    }

    /// Rebuild the whole error map; true if every submit field passes
    fn validate_form(&mut self) -> bool {
        self.errors_mut().clear();
        let mut valid = true;
        for field in self.submit_fields() {
            if !self.validate_field(*field) {
                valid = false;
            }
        }
        valid
    }

    /// Submit event: a payload when valid, otherwise `None` with errors set
    fn submit(&mut self) -> Option<PaymentSubmitPayload> {
        if !self.validate_form() {
            debug!(
                method = %Self::METHOD,
                errors = self.errors().len(),
                "submit blocked by validation"
            );
            return None;
        }
        Some(self.payload())
    }

    /// Error for fields that do not belong to this form
    fn not_in_form(field: Field) -> CheckoutError {
        CheckoutError::FieldNotInForm {
            field: field.to_string(),
            method: Self::METHOD,
        }
    }
}

/// The form mounted by the checkout for the selected method
#[derive(Debug, Clone)]
pub enum PaymentForm {
    Card(CardPaymentForm),
    Pse(PsePaymentForm),
    Cash(CashPaymentForm),
}

impl PaymentForm {
    /// Fresh, empty form for a method
    ///
    /// `require_email` only affects the card form; PSE and cash always
    /// require an email.
    pub fn for_method(method: PaymentMethodType, require_email: bool, current_year: u32) -> Self {
        match method {
            PaymentMethodType::Card => PaymentForm::Card(CardPaymentForm::with_context(
                ValidationContext::new(require_email).with_current_year(current_year),
            )),
            PaymentMethodType::Pse => PaymentForm::Pse(PsePaymentForm::with_context(
                ValidationContext::new(true).with_current_year(current_year),
            )),
            PaymentMethodType::Cash => PaymentForm::Cash(CashPaymentForm::with_context(
                ValidationContext::new(true).with_current_year(current_year),
            )),
        }
    }

    pub fn method(&self) -> PaymentMethodType {
        match self {
            PaymentForm::Card(_) => CardPaymentForm::METHOD,
            PaymentForm::Pse(_) => PsePaymentForm::METHOD,
            PaymentForm::Cash(_) => CashPaymentForm::METHOD,
        }
    }

    pub fn update_field(&mut self, field: Field, raw: &str) -> CheckoutResult<Option<String>> {
        match self {
            PaymentForm::Card(form) => form.update_field(field, raw),
            PaymentForm::Pse(form) => form.update_field(field, raw),
            PaymentForm::Cash(form) => form.update_field(field, raw),
        }
    }

    pub fn submit(&mut self) -> Option<PaymentSubmitPayload> {
        match self {
            PaymentForm::Card(form) => form.submit(),
            PaymentForm::Pse(form) => form.submit(),
            PaymentForm::Cash(form) => form.submit(),
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        match self {
            PaymentForm::Card(form) => form.errors(),
            PaymentForm::Pse(form) => form.errors(),
            PaymentForm::Cash(form) => form.errors(),
        }
    }

    pub fn value(&self, field: Field) -> Option<&str> {
        match self {
            PaymentForm::Card(form) => form.value(field),
            PaymentForm::Pse(form) => form.value(field),
            PaymentForm::Cash(form) => form.value(field),
        }
    }

    /// Current values, tagged like a payload (not validated)
    pub fn snapshot(&self) -> PaymentSubmitPayload {
        match self {
            PaymentForm::Card(form) => form.payload(),
            PaymentForm::Pse(form) => form.payload(),
            PaymentForm::Cash(form) => form.payload(),
        }
    }
}
