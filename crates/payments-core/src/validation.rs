//! # Field Validation
//!
//! Pure per-field rules shared by the card, PSE and cash forms.
//!
//! `validate` maps a field, its (already normalized) value and the form
//! context to an optional customer-facing message. It never mutates
//! anything: the owning form decides what to do with the result.

use crate::error::CheckoutError;
use crate::method::PaymentMethodType;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Minimum number of digits for a card number
pub const MIN_CARD_DIGITS: usize = 13;

/// Minimum number of digits for a CVV
pub const MIN_CVV_DIGITS: usize = 3;

/// Minimum number of digits for an identity document
pub const MIN_DOCUMENT_DIGITS: usize = 5;

/// Every field any of the payment forms can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    CardNumber,
    CardholderName,
    ExpiryMonth,
    ExpiryYear,
    Cvv,
    Email,
    PersonType,
    DocumentType,
    DocumentNumber,
    BankCode,
    FullName,
}

impl Field {
    /// Name used by the presentation layer and in serialized error maps
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::CardNumber => "cardNumber",
            Field::CardholderName => "cardholderName",
            Field::ExpiryMonth => "expiryMonth",
            Field::ExpiryYear => "expiryYear",
            Field::Cvv => "cvv",
            Field::Email => "email",
            Field::PersonType => "personType",
            Field::DocumentType => "documentType",
            Field::DocumentNumber => "documentNumber",
            Field::BankCode => "bankCode",
            Field::FullName => "fullName",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "cardNumber" => Field::CardNumber,
            "cardholderName" => Field::CardholderName,
            "expiryMonth" => Field::ExpiryMonth,
            "expiryYear" => Field::ExpiryYear,
            "cvv" => Field::Cvv,
            "email" => Field::Email,
            "personType" => Field::PersonType,
            "documentType" => Field::DocumentType,
            "documentNumber" => Field::DocumentNumber,
            "bankCode" => Field::BankCode,
            "fullName" => Field::FullName,
            other => return Err(CheckoutError::UnknownField(other.to_string())),
        };
        Ok(field)
    }
}

/// Form-level inputs the rules depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    /// Whether an empty email is an error
    pub require_email: bool,
    /// Two-digit current year, used for the expiry check
    pub current_year: u32,
    /// Form asking, when known; the card form words its messages differently
    pub form: Option<PaymentMethodType>,
}

impl ValidationContext {
    /// Context using today's date
    pub fn new(require_email: bool) -> Self {
        Self {
            require_email,
            current_year: current_two_digit_year(),
            form: None,
        }
    }

    /// Builder: the form these rules run for
    pub fn for_form(mut self, method: PaymentMethodType) -> Self {
        self.form = Some(method);
        self
    }

    /// Builder: pin the current year (for tests and replays)
    pub fn with_current_year(mut self, year: u32) -> Self {
        self.current_year = year % 100;
        self
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Current year modulo 100, as typed on the card
pub fn current_two_digit_year() -> u32 {
    Utc::now().year().rem_euclid(100) as u32
}

/// Validate a single field; `None` means the value is acceptable
pub fn validate(field: Field, value: &str, ctx: &ValidationContext) -> Option<String> {
    let message = match field {
        Field::CardNumber => {
            if value.is_empty() {
                "El número de tarjeta es requerido"
            } else if digit_count(value) < MIN_CARD_DIGITS {
                "Número de tarjeta inválido"
            } else {
                return None;
            }
        }
        Field::CardholderName => {
            if value.trim().is_empty() {
                "El nombre del titular es requerido"
            } else {
                return None;
            }
        }
        Field::ExpiryMonth => {
            if value.is_empty() {
                "Requerido"
            } else {
                match value.trim().parse::<u32>() {
                    Ok(month) if (1..=12).contains(&month) => return None,
                    _ => "Mes inválido",
                }
            }
        }
        Field::ExpiryYear => {
            if value.is_empty() {
                "Requerido"
            } else {
                // No upper bound and no month cross-check.
                match value.trim().parse::<u32>() {
                    Ok(year) if year >= ctx.current_year => return None,
                    _ => "Año inválido",
                }
            }
        }
        Field::Cvv => {
            if value.is_empty() {
                "CVV requerido"
            } else if digit_count(value) < MIN_CVV_DIGITS {
                "CVV inválido"
            } else {
                return None;
            }
        }
        Field::Email => {
            if ctx.require_email && value.trim().is_empty() {
                match ctx.form {
                    Some(PaymentMethodType::Card) => "Email requerido",
                    _ => "El email es requerido",
                }
            } else if !value.is_empty() && !is_email_shaped(value) {
                "Email inválido"
            } else {
                return None;
            }
        }
        Field::DocumentNumber => {
            if value.trim().is_empty() {
                "El número de documento es requerido"
            } else if digit_count(value) < MIN_DOCUMENT_DIGITS {
                "Número de documento inválido"
            } else {
                return None;
            }
        }
        Field::BankCode => {
            if value.is_empty() {
                "Debe seleccionar un banco"
            } else {
                return None;
            }
        }
        Field::FullName => {
            if value.trim().is_empty() {
                "El nombre completo es requerido"
            } else if value.split_whitespace().count() < 2 {
                "Ingresa tu nombre completo"
            } else {
                return None;
            }
        }
        Field::PersonType | Field::DocumentType => return None,
    };

    Some(message.to_string())
}

/// `local@domain.tld` with no whitespace and a single `@`
pub fn is_email_shaped(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Keep ASCII digits only
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn digit_count(value: &str) -> usize {
    value.chars().filter(|c| c.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ValidationContext {
        ValidationContext::new(true).with_current_year(25)
    }

    #[test]
    fn test_card_number_length() {
        let ctx = ctx();
        for len in 1..MIN_CARD_DIGITS {
            let number = "4".repeat(len);
            assert_eq!(
                validate(Field::CardNumber, &number, &ctx).as_deref(),
                Some("Número de tarjeta inválido")
            );
        }
        for len in MIN_CARD_DIGITS..=19 {
            let number = "9".repeat(len);
            assert!(validate(Field::CardNumber, &number, &ctx).is_none());
        }
        assert_eq!(
            validate(Field::CardNumber, "", &ctx).as_deref(),
            Some("El número de tarjeta es requerido")
        );
    }

    #[test]
    fn test_cardholder_name() {
        let ctx = ctx();
        assert!(validate(Field::CardholderName, "   ", &ctx).is_some());
        assert!(validate(Field::CardholderName, "ANA", &ctx).is_none());
    }

    #[test]
    fn test_expiry_month_bounds() {
        let ctx = ctx();
        assert_eq!(validate(Field::ExpiryMonth, "0", &ctx).as_deref(), Some("Mes inválido"));
        assert!(validate(Field::ExpiryMonth, "1", &ctx).is_none());
        assert!(validate(Field::ExpiryMonth, "12", &ctx).is_none());
        assert_eq!(validate(Field::ExpiryMonth, "13", &ctx).as_deref(), Some("Mes inválido"));
        assert_eq!(validate(Field::ExpiryMonth, "", &ctx).as_deref(), Some("Requerido"));
    }

    #[test]
    fn test_expiry_year_against_current() {
        let ctx = ctx();
        assert_eq!(validate(Field::ExpiryYear, "24", &ctx).as_deref(), Some("Año inválido"));
        assert!(validate(Field::ExpiryYear, "25", &ctx).is_none());
        assert!(validate(Field::ExpiryYear, "99", &ctx).is_none());
        assert_eq!(validate(Field::ExpiryYear, "", &ctx).as_deref(), Some("Requerido"));
    }

    #[test]
    fn test_cvv_length() {
        let ctx = ctx();
        assert_eq!(validate(Field::Cvv, "12", &ctx).as_deref(), Some("CVV inválido"));
        assert!(validate(Field::Cvv, "123", &ctx).is_none());
        assert!(validate(Field::Cvv, "1234", &ctx).is_none());
        assert_eq!(validate(Field::Cvv, "", &ctx).as_deref(), Some("CVV requerido"));
    }

    #[test]
    fn test_email_requirement() {
        let optional = ValidationContext::new(false).with_current_year(25);
        assert!(validate(Field::Email, "", &optional).is_none());
        assert!(validate(Field::Email, "nope", &optional).is_some());

        let required = ctx();
        assert_eq!(
            validate(Field::Email, "", &required).as_deref(),
            Some("El email es requerido")
        );
        assert_eq!(
            validate(Field::Email, "", &required.for_form(PaymentMethodType::Card)).as_deref(),
            Some("Email requerido")
        );
        assert_eq!(
            validate(Field::Email, "", &required.for_form(PaymentMethodType::Cash)).as_deref(),
            Some("El email es requerido")
        );
        assert!(validate(Field::Email, "a@b.c", &required).is_none());
        assert_eq!(validate(Field::Email, "a@b", &required).as_deref(), Some("Email inválido"));
    }

    #[test]
    fn test_email_shape() {
        assert!(is_email_shaped("ana@example.com"));
        assert!(is_email_shaped("a@b.c.d"));
        assert!(!is_email_shaped("a@.c"));
        assert!(!is_email_shaped("a@b."));
        assert!(!is_email_shaped("@b.c"));
        assert!(!is_email_shaped("a@@b.c"));
        assert!(!is_email_shaped("a b@c.d"));
    }

    #[test]
    fn test_document_number() {
        let ctx = ctx();
        assert!(validate(Field::DocumentNumber, "1234", &ctx).is_some());
        assert!(validate(Field::DocumentNumber, "12345", &ctx).is_none());
        assert_eq!(
            validate(Field::DocumentNumber, "", &ctx).as_deref(),
            Some("El número de documento es requerido")
        );
    }

    #[test]
    fn test_bank_code() {
        let ctx = ctx();
        assert!(validate(Field::BankCode, "", &ctx).is_some());
        assert!(validate(Field::BankCode, "bancolombia", &ctx).is_none());
    }

    #[test]
    fn test_full_name_tokens() {
        let ctx = ctx();
        assert_eq!(
            validate(Field::FullName, "Juan", &ctx).as_deref(),
            Some("Ingresa tu nombre completo")
        );
        assert!(validate(Field::FullName, "Juan Pérez", &ctx).is_none());
        assert!(validate(Field::FullName, "  Juan   Pérez  ", &ctx).is_none());
    }

    #[test]
    fn test_field_names_round_trip() {
        assert_eq!("bankCode".parse::<Field>().unwrap(), Field::BankCode);
        assert_eq!(Field::CardholderName.to_string(), "cardholderName");
        assert!("card_number".parse::<Field>().is_err());
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("4111 1111-1111 1111"), "4111111111111111");
        assert_eq!(digits_only("abc"), "");
    }
}
