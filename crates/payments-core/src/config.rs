//! # Checkout Configuration
//!
//! Options the host application passes when mounting a checkout.
//! Keys are camelCase so the same document can come from a JS object or a
//! TOML file:
//!
//! ```toml
//! availableMethods = ["card", "pse"]
//! requireEmail = true
//! amount = 150000
//! currency = "COP"
//!
//! [appearance]
//! primaryColor = "#0f766e"
//! borderRadius = "12px"
//! ```

use crate::error::{CheckoutError, CheckoutResult};
use crate::method::PaymentMethodType;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_PRIMARY_COLOR: &str = "#4f46e5";
pub const DEFAULT_BORDER_RADIUS: &str = "8px";
pub const DEFAULT_FONT_FAMILY: &str =
    "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif";

/// Host-supplied checkout options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutConfig {
    /// Methods offered, in display order
    #[serde(default = "default_methods")]
    pub available_methods: Vec<PaymentMethodType>,

    /// Integration-level override of `availableMethods`; wins when present
    #[serde(
        default,
        rename = "payment_methods",
        alias = "paymentMethods",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_methods: Option<Vec<PaymentMethodType>>,

    /// Whether the card form requires an email
    #[serde(default = "default_true")]
    pub require_email: bool,

    /// Whether the method selector is shown (only when >1 method)
    #[serde(default = "default_true")]
    pub show_method_selector: bool,

    /// Amount to charge, display only
    #[serde(default, alias = "initialAmount", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    /// ISO 4217 currency code, display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Rendering options
    #[serde(default)]
    pub appearance: AppearanceConfig,
}

fn default_methods() -> Vec<PaymentMethodType> {
    PaymentMethodType::ALL.to_vec()
}

fn default_true() -> bool {
    true
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            available_methods: default_methods(),
            payment_methods: None,
            require_email: true,
            show_method_selector: true,
            amount: None,
            currency: None,
            appearance: AppearanceConfig::default(),
        }
    }
}

impl CheckoutConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> CheckoutResult<Self> {
        let config: CheckoutConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> CheckoutResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CheckoutError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Methods actually offered: `payment_methods` if set, else `available_methods`
    pub fn effective_methods(&self) -> &[PaymentMethodType] {
        self.payment_methods
            .as_deref()
            .unwrap_or(&self.available_methods)
    }

    /// Reject configurations the checkout cannot run with
    pub fn validate(&self) -> CheckoutResult<()> {
        if self.effective_methods().is_empty() {
            return Err(CheckoutError::Configuration(
                "availableMethods must list at least one payment method".to_string(),
            ));
        }
        if let Some(amount) = self.amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(CheckoutError::Configuration(format!(
                    "amount must be a non-negative number, got {}",
                    amount
                )));
            }
        }
        Ok(())
    }

    /// Builder: restrict the offered methods
    pub fn with_methods(mut self, methods: impl IntoIterator<Item = PaymentMethodType>) -> Self {
        self.available_methods = methods.into_iter().collect();
        self.payment_methods = None;
        self
    }

    /// Builder: toggle the card email requirement
    pub fn with_require_email(mut self, require: bool) -> Self {
        self.require_email = require;
        self
    }

    /// Builder: set amount and currency
    pub fn with_amount(mut self, amount: f64, currency: impl Into<String>) -> Self {
        self.amount = Some(amount);
        self.currency = Some(currency.into());
        self
    }

    /// Builder: set appearance
    pub fn with_appearance(mut self, appearance: AppearanceConfig) -> Self {
        self.appearance = appearance;
        self
    }
}

/// Visual overrides; never read by validation or the state machine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

impl AppearanceConfig {
    pub fn primary_color(&self) -> &str {
        non_empty(&self.primary_color).unwrap_or(DEFAULT_PRIMARY_COLOR)
    }

    pub fn border_radius(&self) -> &str {
        non_empty(&self.border_radius).unwrap_or(DEFAULT_BORDER_RADIUS)
    }

    pub fn font_family(&self) -> &str {
        non_empty(&self.font_family).unwrap_or(DEFAULT_FONT_FAMILY)
    }

    /// Inline style declaring the CSS custom properties the components read
    pub fn css_variables(&self) -> String {
        format!(
            "--bloque-primary-color: {}; --bloque-border-radius: {}; --bloque-font-family: {};",
            self.primary_color(),
            self.border_radius(),
            self.font_family()
        )
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CheckoutConfig::default();
        assert_eq!(config.available_methods, PaymentMethodType::ALL.to_vec());
        assert!(config.require_email);
        assert!(config.show_method_selector);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config = CheckoutConfig::from_toml_str(
            r##"
availableMethods = ["pse", "cash"]
requireEmail = false
amount = 150000
currency = "COP"

[appearance]
primaryColor = "#0f766e"
"##,
        )
        .unwrap();

        assert_eq!(
            config.available_methods,
            vec![PaymentMethodType::Pse, PaymentMethodType::Cash]
        );
        assert!(!config.require_email);
        assert!(config.show_method_selector);
        assert_eq!(config.amount, Some(150000.0));
        assert_eq!(config.appearance.primary_color(), "#0f766e");
        assert_eq!(config.appearance.border_radius(), DEFAULT_BORDER_RADIUS);
    }

    #[test]
    fn test_payment_methods_override() {
        let config: CheckoutConfig =
            serde_json::from_str(r#"{"payment_methods": ["card"]}"#).unwrap();
        assert_eq!(config.effective_methods(), &[PaymentMethodType::Card]);

        let both: CheckoutConfig = serde_json::from_str(
            r#"{"availableMethods": ["pse", "cash"], "payment_methods": ["cash"]}"#,
        )
        .unwrap();
        assert_eq!(both.available_methods.len(), 2);
        assert_eq!(both.effective_methods(), &[PaymentMethodType::Cash]);

        let camel: CheckoutConfig = serde_json::from_str(
            r#"{"availableMethods": ["card"], "paymentMethods": ["pse"]}"#,
        )
        .unwrap();
        assert_eq!(camel.effective_methods(), &[PaymentMethodType::Pse]);

        let empty_override = CheckoutConfig::from_toml_str(
            r#"
availableMethods = ["card"]
payment_methods = []
"#,
        );
        assert!(matches!(empty_override, Err(CheckoutError::Configuration(_))));
    }

    #[test]
    fn test_empty_methods_rejected() {
        let result = CheckoutConfig::from_toml_str("availableMethods = []");
        assert!(matches!(result, Err(CheckoutError::Configuration(_))));
    }

    #[test]
    fn test_unknown_method_rejected() {
        let result = CheckoutConfig::from_toml_str(r#"availableMethods = ["crypto"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_css_variables() {
        let appearance = AppearanceConfig {
            primary_color: Some("#111111".into()),
            border_radius: Some(String::new()),
            font_family: None,
        };
        let css = appearance.css_variables();
        assert!(css.contains("--bloque-primary-color: #111111;"));
        assert!(css.contains("--bloque-border-radius: 8px;"));
        assert!(css.contains("Cantarell"));
    }
}
