//! # Checkout Notifications
//!
//! Fire-and-forget notifications emitted by the checkout. Hosts implement
//! `CheckoutObserver` for the events they care about; every method has a
//! logging default.

use crate::form::PaymentSubmitPayload;
use crate::method::PaymentMethodType;
use serde::Serialize;
use tracing::{info, warn};

/// Something the host may want to react to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum CheckoutEvent {
    /// The customer (or the single-method rule) picked a method
    MethodSelected { method: PaymentMethodType },

    /// The submit callback resolved
    PaymentSuccess {
        #[serde(flatten)]
        payload: PaymentSubmitPayload,
    },

    /// The submit callback rejected
    PaymentError {
        #[serde(flatten)]
        payload: PaymentSubmitPayload,
        error: String,
    },
}

impl CheckoutEvent {
    /// DOM-style event name
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutEvent::MethodSelected { .. } => "method-selected",
            CheckoutEvent::PaymentSuccess { .. } => "payment-success",
            CheckoutEvent::PaymentError { .. } => "payment-error",
        }
    }
}

/// Checkout event listener
///
/// Implement this trait to react to checkout events.
#[allow(unused_variables)]
pub trait CheckoutObserver {
    /// Called when the active method changes
    fn on_method_selected(&self, method: PaymentMethodType) {
        info!(method = %method, "payment method selected");
    }

    /// Called when the submit callback resolved
    fn on_payment_success(&self, payload: &PaymentSubmitPayload) {
        info!(method = %payload.method_type(), "payment submitted");
    }

    /// Called when the submit callback rejected
    fn on_payment_error(&self, payload: &PaymentSubmitPayload, error: &str) {
        warn!(method = %payload.method_type(), error, "payment failed");
    }
}

/// Default observer (just logs events)
pub struct LoggingObserver;

impl CheckoutObserver for LoggingObserver {}

/// Route an event to the matching observer method
pub fn dispatch_checkout_event(observer: &dyn CheckoutObserver, event: &CheckoutEvent) {
    match event {
        CheckoutEvent::MethodSelected { method } => observer.on_method_selected(*method),
        CheckoutEvent::PaymentSuccess { payload } => observer.on_payment_success(payload),
        CheckoutEvent::PaymentError { payload, error } => {
            observer.on_payment_error(payload, error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cash::CashPaymentFormData;
    use std::cell::RefCell;

    fn payload() -> PaymentSubmitPayload {
        PaymentSubmitPayload::Cash(CashPaymentFormData {
            email: "ana@example.com".into(),
            document_type: "CC".into(),
            document_number: "123456".into(),
            full_name: "Ana Gómez".into(),
        })
    }

    #[test]
    fn test_event_json_shape() {
        let event = CheckoutEvent::PaymentError {
            payload: payload(),
            error: "Insufficient funds".into(),
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "payment-error");
        assert_eq!(json["type"], "cash");
        assert_eq!(json["data"]["fullName"], "Ana Gómez");
        assert_eq!(json["error"], "Insufficient funds");
        assert_eq!(event.name(), "payment-error");
    }

    #[test]
    fn test_dispatch() {
        struct Recorder {
            seen: RefCell<Vec<String>>,
        }

        impl CheckoutObserver for Recorder {
            fn on_payment_error(&self, _payload: &PaymentSubmitPayload, error: &str) {
                self.seen.borrow_mut().push(error.to_string());
            }
        }

        let recorder = Recorder {
            seen: RefCell::new(Vec::new()),
        };

        dispatch_checkout_event(
            &recorder,
            &CheckoutEvent::MethodSelected {
                method: PaymentMethodType::Pse,
            },
        );
        dispatch_checkout_event(
            &recorder,
            &CheckoutEvent::PaymentError {
                payload: payload(),
                error: "Timeout".into(),
            },
        );

        assert_eq!(*recorder.seen.borrow(), vec!["Timeout".to_string()]);
    }
}
