//! # Payment Methods
//!
//! The closed set of payment methods offered by the checkout, with the
//! labels shown in the method selector.

use crate::error::CheckoutError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Payment method offered by the checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethodType {
    /// Credit or debit card
    Card,
    /// PSE bank transfer (Colombia)
    Pse,
    /// Cash voucher paid at a collection point
    Cash,
}

impl PaymentMethodType {
    /// All methods, in selector order
    pub const ALL: [PaymentMethodType; 3] = [
        PaymentMethodType::Card,
        PaymentMethodType::Pse,
        PaymentMethodType::Cash,
    ];

    /// Wire name used in payloads and configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethodType::Card => "card",
            PaymentMethodType::Pse => "pse",
            PaymentMethodType::Cash => "cash",
        }
    }

    /// Selector metadata for this method
    pub fn info(&self) -> PaymentMethod {
        match self {
            PaymentMethodType::Card => PaymentMethod {
                method_type: *self,
                label: "Tarjeta de Crédito/Débito",
                description: "Paga con tu tarjeta de crédito o débito",
            },
            PaymentMethodType::Pse => PaymentMethod {
                method_type: *self,
                label: "PSE",
                description: "Pago seguro en línea con tu banco",
            },
            PaymentMethodType::Cash => PaymentMethod {
                method_type: *self,
                label: "Efectivo",
                description: "Genera un recibo para pagar en efectivo",
            },
        }
    }
}

impl std::fmt::Display for PaymentMethodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethodType {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" => Ok(PaymentMethodType::Card),
            "pse" => Ok(PaymentMethodType::Pse),
            "cash" => Ok(PaymentMethodType::Cash),
            other => Err(CheckoutError::UnknownMethod(other.to_string())),
        }
    }
}

/// Display metadata for a payment method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentMethod {
    #[serde(rename = "type")]
    pub method_type: PaymentMethodType,
    pub label: &'static str,
    pub description: &'static str,
}

/// Metadata for every method, in selector order
pub fn payment_methods() -> Vec<PaymentMethod> {
    PaymentMethodType::ALL.iter().map(|m| m.info()).collect()
}
