//! # Checkout Orchestrator
//!
//! Composes the method selector, the form mounted for the selected method
//! and the submission lifecycle.
//!
//! ```text
//!                 select(method)
//!   NoSelection ─────────────────▶ FormActive ◀──────────────┐
//!                                   │      ▲                  │
//!                 valid payload     │      │ callback resolved│
//!                                   ▼      │                  │
//!                                  Submitting ───────────▶ Error
//!                                         callback rejected   │
//!                                                             │
//!         select(method) / next valid submit ─────────────────┘
//! ```
//!
//! Every transition happens synchronously in a handler call, except the
//! wait for the host's submit callback. Hosts that cannot keep `&mut self`
//! across that await use `begin_submission` / `complete_submission`.

use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, CheckoutResult, SubmitError};
use crate::events::{dispatch_checkout_event, CheckoutEvent, CheckoutObserver};
use crate::form::{FieldErrors, PaymentForm, PaymentSubmitPayload};
use crate::handler::BoxedSubmitHandler;
use crate::method::PaymentMethodType;
use crate::selector::MethodSelector;
use crate::validation::{current_two_digit_year, Field};
use serde::Serialize;
use std::rc::Rc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Observable checkout state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutState {
    /// No method chosen yet
    NoSelection,
    /// A form is mounted and accepting input
    FormActive,
    /// Waiting for the host's submit callback
    Submitting,
    /// Last submission failed; the form is still usable
    Error,
}

impl std::fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CheckoutState::NoSelection => "no_selection",
            CheckoutState::FormActive => "form_active",
            CheckoutState::Submitting => "submitting",
            CheckoutState::Error => "error",
        };
        f.write_str(name)
    }
}

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Local validation failed; see the form's errors
    Invalid,
    /// The callback resolved
    Succeeded { payload: PaymentSubmitPayload },
    /// The callback rejected
    Failed {
        payload: PaymentSubmitPayload,
        error: String,
    },
}

/// One mounted checkout
pub struct Checkout {
    session_id: Uuid,
    config: CheckoutConfig,
    selector: MethodSelector,
    form: Option<PaymentForm>,
    is_loading: bool,
    last_error: Option<String>,
    current_year: u32,
    handler: Option<BoxedSubmitHandler>,
    observers: Vec<Rc<dyn CheckoutObserver>>,
}

impl Checkout {
    /// Mount a checkout. With a single available method its form is
    /// mounted immediately.
    ///
    /// That initial selection emits no `MethodSelected`: nobody can be
    /// subscribed yet, and hosts read `selected_method()` after mounting.
    /// A selection made by `configure` is announced.
    pub fn new(config: CheckoutConfig) -> CheckoutResult<Self> {
        config.validate()?;

        let selector = MethodSelector::new(config.effective_methods().iter().copied());
        let mut checkout = Self {
            session_id: Uuid::new_v4(),
            config,
            selector,
            form: None,
            is_loading: false,
            last_error: None,
            current_year: current_two_digit_year(),
            handler: None,
            observers: Vec::new(),
        };
        checkout.sync_form();

        info!(
            session = %checkout.session_id,
            methods = ?checkout.selector.available(),
            selected = ?checkout.selector.selected(),
            "checkout mounted"
        );
        Ok(checkout)
    }

    /// Builder: set the host's submit callback
    pub fn with_submit_handler(mut self, handler: BoxedSubmitHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Builder: pin the year used by the expiry check (remounts the form)
    pub fn with_current_year(mut self, year: u32) -> Self {
        self.current_year = year % 100;
        if let Some(method) = self.form.as_ref().map(PaymentForm::method) {
            self.form = Some(self.new_form(method));
        }
        self
    }

    /// Replace the submit callback
    pub fn set_submit_handler(&mut self, handler: BoxedSubmitHandler) {
        self.handler = Some(handler);
    }

    /// Register a listener for checkout events
    pub fn subscribe(&mut self, observer: Rc<dyn CheckoutObserver>) {
        self.observers.push(observer);
    }

    /// Host changed the configuration after mount
    pub fn configure(&mut self, config: CheckoutConfig) -> CheckoutResult<()> {
        self.ensure_idle()?;
        config.validate()?;

        let newly_selected = self
            .selector
            .set_available(config.effective_methods().iter().copied());
        self.config = config;

        if let Some(PaymentForm::Card(card)) = self.form.as_mut() {
            card.set_require_email(self.config.require_email);
        }
        self.sync_form();

        debug!(
            session = %self.session_id,
            methods = ?self.selector.available(),
            "checkout reconfigured"
        );
        if let Some(method) = newly_selected {
            self.last_error = None;
            self.notify(&CheckoutEvent::MethodSelected { method });
        }
        Ok(())
    }

    /// Customer picked a payment method
    pub fn select(&mut self, method: PaymentMethodType) -> CheckoutResult<()> {
        self.ensure_idle()?;
        self.selector.select(method)?;
        self.last_error = None;
        self.sync_form();

        info!(session = %self.session_id, method = %method, "payment method selected");
        self.notify(&CheckoutEvent::MethodSelected { method });
        Ok(())
    }

    /// Input event on the active form; returns the field's current message
    pub fn update_field(&mut self, field: Field, value: &str) -> CheckoutResult<Option<String>> {
        self.ensure_idle()?;
        let form = self.form.as_mut().ok_or(CheckoutError::NoMethodSelected)?;
        form.update_field(field, value)
    }

    /// `update_field` with the field given by name (`"cardNumber"`, ...)
    pub fn update_field_by_name(
        &mut self,
        field: &str,
        value: &str,
    ) -> CheckoutResult<Option<String>> {
        let field: Field = field.parse()?;
        self.update_field(field, value)
    }

    /// First half of a submit: validate and enter `Submitting`.
    ///
    /// `Ok(None)` means local validation failed; nothing else changes.
    pub fn begin_submission(&mut self) -> CheckoutResult<Option<PaymentSubmitPayload>> {
        self.ensure_idle()?;
        let form = self.form.as_mut().ok_or(CheckoutError::NoMethodSelected)?;

        let Some(payload) = form.submit() else {
            debug!(
                session = %self.session_id,
                errors = form.errors().len(),
                "submission blocked by validation"
            );
            return Ok(None);
        };

        self.last_error = None;
        self.is_loading = true;
        info!(
            session = %self.session_id,
            method = %payload.method_type(),
            "submission started"
        );
        Ok(Some(payload))
    }

    /// Second half of a submit: apply the callback result.
    pub fn complete_submission(
        &mut self,
        payload: PaymentSubmitPayload,
        result: Result<(), SubmitError>,
    ) -> CheckoutResult<SubmitOutcome> {
        if !self.is_loading {
            return Err(CheckoutError::NoSubmissionInProgress);
        }
        self.is_loading = false;

        match result {
            Ok(()) => {
                info!(
                    session = %self.session_id,
                    method = %payload.method_type(),
                    "submission succeeded"
                );
                self.notify(&CheckoutEvent::PaymentSuccess {
                    payload: payload.clone(),
                });
                Ok(SubmitOutcome::Succeeded { payload })
            }
            Err(err) => {
                let error = err.display_message();
                warn!(
                    session = %self.session_id,
                    method = %payload.method_type(),
                    error = %error,
                    "submission failed"
                );
                self.last_error = Some(error.clone());
                self.notify(&CheckoutEvent::PaymentError {
                    payload: payload.clone(),
                    error: error.clone(),
                });
                Ok(SubmitOutcome::Failed { payload, error })
            }
        }
    }

    /// Submit event: validate, call the host, apply the outcome.
    ///
    /// Without a submit handler the submission succeeds immediately.
    pub async fn submit(&mut self) -> CheckoutResult<SubmitOutcome> {
        let Some(payload) = self.begin_submission()? else {
            return Ok(SubmitOutcome::Invalid);
        };

        let result = match self.handler.clone() {
            Some(handler) => {
                debug!(session = %self.session_id, handler = handler.name(), "calling submit handler");
                handler.submit(&payload).await
            }
            None => Ok(()),
        };

        self.complete_submission(payload, result)
    }

    pub fn state(&self) -> CheckoutState {
        if self.selector.selected().is_none() {
            CheckoutState::NoSelection
        } else if self.is_loading {
            CheckoutState::Submitting
        } else if self.last_error.is_some() {
            CheckoutState::Error
        } else {
            CheckoutState::FormActive
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    pub fn selected_method(&self) -> Option<PaymentMethodType> {
        self.selector.selected()
    }

    pub fn available_methods(&self) -> &[PaymentMethodType] {
        self.selector.available()
    }

    /// Whether the method selector step is shown
    pub fn show_method_selector(&self) -> bool {
        self.selector.should_render(self.config.show_method_selector)
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn form(&self) -> Option<&PaymentForm> {
        self.form.as_ref()
    }

    /// Errors of the active form, if any form is mounted
    pub fn errors(&self) -> Option<&FieldErrors> {
        self.form.as_ref().map(PaymentForm::errors)
    }

    fn ensure_idle(&self) -> CheckoutResult<()> {
        if self.is_loading {
            return Err(CheckoutError::SubmissionInProgress);
        }
        Ok(())
    }

    /// Mount, keep or drop the form so it matches the selection
    fn sync_form(&mut self) {
        let current = self.form.as_ref().map(PaymentForm::method);
        match (self.selector.selected(), current) {
            (Some(selected), Some(mounted)) if selected == mounted => {}
            (Some(selected), _) => self.form = Some(self.new_form(selected)),
            (None, _) => self.form = None,
        }
    }

    fn new_form(&self, method: PaymentMethodType) -> PaymentForm {
        PaymentForm::for_method(method, self.config.require_email, self.current_year)
    }

    fn notify(&self, event: &CheckoutEvent) {
        for observer in &self.observers {
            dispatch_checkout_event(observer.as_ref(), event);
        }
    }
}
