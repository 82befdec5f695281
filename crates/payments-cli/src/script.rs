//! # Event Scripts
//!
//! A script is a JSON array of UI events replayed against one checkout:
//!
//! ```json
//! [
//!   {"select": "card"},
//!   {"input": {"field": "cardNumber", "value": "4111 1111 1111 1111"}},
//!   {"submit": {"reject": "Insufficient funds"}}
//! ]
//! ```
//!
//! Malformed scripts fail to parse. Well-formed steps the checkout refuses
//! (selecting a disabled method, typing into a field of another form) are
//! recorded in the summary and the replay goes on.

use crate::gateway::{GatewayReply, SimulatedGateway};
use anyhow::Context;
use payments_core::{
    Checkout, CheckoutConfig, CheckoutEvent, CheckoutObserver, CheckoutState, FieldErrors, Field,
    PaymentMethodType, PaymentSubmitPayload, SubmitOutcome,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One UI event
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum ScriptStep {
    /// Method selector click
    Select(PaymentMethodType),
    /// Input event on a form field
    Input { field: Field, value: String },
    /// Submit event, answered by the simulated gateway
    Submit(SubmitDirective),
    /// Host swaps the checkout configuration
    Configure(CheckoutConfig),
}

/// How the gateway answers a submit step
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubmitDirective {
    /// Reject with this message (blank uses the generic failure text)
    #[serde(default)]
    pub reject: Option<String>,
    /// Simulated processing time
    #[serde(default)]
    pub delay_ms: u64,
}

impl SubmitDirective {
    fn reply(&self) -> GatewayReply {
        match &self.reject {
            Some(message) => GatewayReply::Decline(message.clone()),
            None => GatewayReply::Approve,
        }
    }
}

/// Parse a script from JSON text
pub fn parse_script(content: &str) -> anyhow::Result<Vec<ScriptStep>> {
    serde_json::from_str(content).context("Malformed event script")
}

/// Read and parse a script file
pub fn load_script(path: &Path) -> anyhow::Result<Vec<ScriptStep>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    let steps = parse_script(&content)?;
    info!("Loaded {} script steps from {}", steps.len(), path.display());
    Ok(steps)
}

/// A step the checkout refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepError {
    pub step: usize,
    pub error: String,
}

/// Final state of a replayed session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub state: CheckoutState,
    pub selected_method: Option<PaymentMethodType>,
    pub last_error: Option<String>,
    pub errors: FieldErrors,
    pub form_data: Option<PaymentSubmitPayload>,
    pub notifications: Vec<CheckoutEvent>,
    pub outcomes: Vec<SubmitOutcome>,
    pub gateway_calls: u32,
    pub step_errors: Vec<StepError>,
}

/// Records every notification in emission order
#[derive(Default)]
pub struct EventLog {
    events: RefCell<Vec<CheckoutEvent>>,
}

impl EventLog {
    fn push(&self, event: CheckoutEvent) {
        debug!(event = event.name(), "notification");
        self.events.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<CheckoutEvent> {
        self.events.borrow().clone()
    }
}

impl CheckoutObserver for EventLog {
    fn on_method_selected(&self, method: PaymentMethodType) {
        self.push(CheckoutEvent::MethodSelected { method });
    }

    fn on_payment_success(&self, payload: &PaymentSubmitPayload) {
        self.push(CheckoutEvent::PaymentSuccess {
            payload: payload.clone(),
        });
    }

    fn on_payment_error(&self, payload: &PaymentSubmitPayload, error: &str) {
        self.push(CheckoutEvent::PaymentError {
            payload: payload.clone(),
            error: error.to_string(),
        });
    }
}

/// Replay `steps` against a fresh checkout
///
/// `current_year` pins the two-digit year used by the expiry check.
pub async fn run_script(
    config: CheckoutConfig,
    steps: &[ScriptStep],
    current_year: Option<u32>,
) -> anyhow::Result<SessionSummary> {
    let gateway = Rc::new(SimulatedGateway::new());
    let log = Rc::new(EventLog::default());

    let mut checkout = Checkout::new(config)?.with_submit_handler(gateway.clone());
    if let Some(year) = current_year {
        checkout = checkout.with_current_year(year);
    }
    checkout.subscribe(log.clone());

    let mut outcomes = Vec::new();
    let mut step_errors = Vec::new();

    for (index, step) in steps.iter().enumerate() {
        let step_no = index + 1;
        let result = match step {
            ScriptStep::Select(method) => checkout.select(*method),
            ScriptStep::Input { field, value } => {
                checkout.update_field(*field, value).map(|message| {
                    if let Some(message) = message {
                        debug!(step = step_no, field = %field, message = %message, "field invalid");
                    }
                })
            }
            ScriptStep::Submit(directive) => {
                gateway.arm(directive.reply(), Duration::from_millis(directive.delay_ms));
                checkout.submit().await.map(|outcome| outcomes.push(outcome))
            }
            ScriptStep::Configure(config) => checkout.configure(config.clone()),
        };

        if let Err(err) = result {
            warn!(step = step_no, error = %err, "step refused");
            step_errors.push(StepError {
                step: step_no,
                error: err.to_string(),
            });
        }
        debug!(step = step_no, state = %checkout.state(), "step applied");
    }

    Ok(SessionSummary {
        session_id: checkout.session_id().to_string(),
        state: checkout.state(),
        selected_method: checkout.selected_method(),
        last_error: checkout.last_error().map(String::from),
        errors: checkout.errors().cloned().unwrap_or_default(),
        form_data: checkout.form().map(|form| form.snapshot()),
        notifications: log.events(),
        outcomes,
        gateway_calls: gateway.submissions(),
        step_errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD_STEPS: &str = r#"[
        {"select": "card"},
        {"input": {"field": "cardNumber", "value": "4111 1111 1111 1111"}},
        {"input": {"field": "cardholderName", "value": "Ana Gómez"}},
        {"input": {"field": "expiryMonth", "value": "12"}},
        {"input": {"field": "expiryYear", "value": "30"}},
        {"input": {"field": "cvv", "value": "123"}},
        {"input": {"field": "email", "value": "ana@example.com"}}
    ]"#;

    fn card_script(submit: &str) -> Vec<ScriptStep> {
        let mut steps = parse_script(CARD_STEPS).unwrap();
        steps.push(serde_json::from_str(submit).unwrap());
        steps
    }

    #[test]
    fn test_parse_steps() {
        let steps = parse_script(
            r#"[{"select": "pse"}, {"submit": {}}, {"submit": {"reject": "No", "delayMs": 5}}]"#,
        )
        .unwrap();

        assert_eq!(steps[0], ScriptStep::Select(PaymentMethodType::Pse));
        assert_eq!(steps[1], ScriptStep::Submit(SubmitDirective::default()));
        assert_eq!(
            steps[2],
            ScriptStep::Submit(SubmitDirective {
                reject: Some("No".into()),
                delay_ms: 5,
            })
        );
    }

    #[test]
    fn test_malformed_scripts() {
        assert!(parse_script("not json").is_err());
        assert!(parse_script(r#"{"select": "card"}"#).is_err());
        assert!(parse_script(r#"[{"select": "bitcoin"}]"#).is_err());
        assert!(parse_script(r#"[{"input": {"field": "iban", "value": "x"}}]"#).is_err());
        assert!(parse_script(r#"[{"submit": {"approve": true}}]"#).is_err());
    }

    #[tokio::test]
    async fn test_card_payment_succeeds() {
        let steps = card_script(r#"{"submit": {}}"#);
        let summary = run_script(CheckoutConfig::default(), &steps, Some(25))
            .await
            .unwrap();

        assert_eq!(summary.state, CheckoutState::FormActive);
        assert_eq!(summary.selected_method, Some(PaymentMethodType::Card));
        assert!(summary.errors.is_empty());
        assert_eq!(summary.gateway_calls, 1);
        assert!(summary.step_errors.is_empty());

        let names: Vec<_> = summary.notifications.iter().map(CheckoutEvent::name).collect();
        assert_eq!(names, vec!["method-selected", "payment-success"]);

        let Some(SubmitOutcome::Succeeded { payload }) = summary.outcomes.first() else {
            panic!("expected a successful outcome");
        };
        let PaymentSubmitPayload::Card(data) = payload else {
            panic!("expected a card payload");
        };
        assert_eq!(data.card_number, "4111111111111111");
    }

    #[tokio::test]
    async fn test_rejection_sets_error_state() {
        let steps = parse_script(
            r#"[
                {"select": "pse"},
                {"input": {"field": "documentNumber", "value": "1.234.567"}},
                {"input": {"field": "bankCode", "value": "bancolombia"}},
                {"input": {"field": "email", "value": "ana@example.com"}},
                {"submit": {"reject": "Insufficient funds"}}
            ]"#,
        )
        .unwrap();

        let summary = run_script(CheckoutConfig::default(), &steps, Some(25))
            .await
            .unwrap();

        assert_eq!(summary.state, CheckoutState::Error);
        assert_eq!(summary.last_error.as_deref(), Some("Insufficient funds"));
        assert!(matches!(
            summary.notifications.last(),
            Some(CheckoutEvent::PaymentError { error, .. }) if error == "Insufficient funds"
        ));
    }

    #[tokio::test]
    async fn test_blank_rejection_uses_fallback() {
        let steps = card_script(r#"{"submit": {"reject": ""}}"#);
        let summary = run_script(CheckoutConfig::default(), &steps, Some(25))
            .await
            .unwrap();

        assert_eq!(
            summary.last_error.as_deref(),
            Some(payments_core::SUBMIT_FALLBACK_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_invalid_submit_never_reaches_gateway() {
        let steps = parse_script(r#"[{"select": "cash"}, {"submit": {}}]"#).unwrap();
        let summary = run_script(CheckoutConfig::default(), &steps, Some(25))
            .await
            .unwrap();

        assert_eq!(summary.gateway_calls, 0);
        assert_eq!(summary.outcomes, vec![SubmitOutcome::Invalid]);
        assert_eq!(summary.errors.get(Field::Email), Some("El email es requerido"));
        assert_eq!(
            summary.errors.get(Field::FullName),
            Some("El nombre completo es requerido")
        );
    }

    #[tokio::test]
    async fn test_refused_steps_are_recorded() {
        let steps = parse_script(
            r#"[
                {"input": {"field": "email", "value": "a@b.co"}},
                {"select": "cash"},
                {"input": {"field": "cvv", "value": "123"}}
            ]"#,
        )
        .unwrap();
        let config = CheckoutConfig::default()
            .with_methods([PaymentMethodType::Card, PaymentMethodType::Pse]);

        let summary = run_script(config, &steps, Some(25)).await.unwrap();

        let refused: Vec<_> = summary.step_errors.iter().map(|e| e.step).collect();
        assert_eq!(refused, vec![1, 2, 3]);
        assert_eq!(summary.state, CheckoutState::NoSelection);
    }

    #[tokio::test]
    async fn test_single_method_needs_no_selection() {
        let steps = parse_script(r#"[{"input": {"field": "fullName", "value": "Ana"}}]"#).unwrap();
        let config = CheckoutConfig::default().with_methods([PaymentMethodType::Cash]);

        let summary = run_script(config, &steps, Some(25)).await.unwrap();

        assert_eq!(summary.state, CheckoutState::FormActive);
        assert_eq!(summary.selected_method, Some(PaymentMethodType::Cash));
        assert!(summary.step_errors.is_empty());
    }
}
