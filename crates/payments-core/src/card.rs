//! # Card Payment Form
//!
//! Card number, holder, expiry, CVV and (optionally required) email.
//! Also hosts the cosmetic helpers used while typing: digit grouping and
//! brand detection. Neither affects validity.

use crate::error::CheckoutResult;
use crate::form::{FieldErrors, FormModel, PaymentSubmitPayload};
use crate::method::PaymentMethodType;
use crate::validation::{digits_only, Field, ValidationContext};
use serde::{Deserialize, Serialize};

/// Digits kept from the card number input
pub const CARD_NUMBER_MAX_DIGITS: usize = 16;

/// Digits kept from the month and year inputs
pub const EXPIRY_MAX_DIGITS: usize = 2;

/// Digits kept from the CVV input
pub const CVV_MAX_DIGITS: usize = 4;

/// Values collected by the card form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPaymentFormData {
    pub card_number: String,
    pub cardholder_name: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
    pub email: String,
}

/// Card form state
#[derive(Debug, Clone)]
pub struct CardPaymentForm {
    data: CardPaymentFormData,
    errors: FieldErrors,
    ctx: ValidationContext,
}

const SUBMIT_FIELDS: &[Field] = &[
    Field::CardNumber,
    Field::CardholderName,
    Field::ExpiryMonth,
    Field::ExpiryYear,
    Field::Cvv,
    // The rule itself decides whether an empty email is acceptable.
    Field::Email,
];

impl CardPaymentForm {
    pub fn new(require_email: bool) -> Self {
        Self::with_context(ValidationContext::new(require_email))
    }

    pub fn with_context(ctx: ValidationContext) -> Self {
        Self {
            data: CardPaymentFormData::default(),
            errors: FieldErrors::new(),
            ctx: ctx.for_form(Self::METHOD),
        }
    }

    pub fn data(&self) -> &CardPaymentFormData {
        &self.data
    }

    pub fn require_email(&self) -> bool {
        self.ctx.require_email
    }

    /// Host toggled `requireEmail` while the form is mounted; values are kept
    pub fn set_require_email(&mut self, require: bool) {
        self.ctx.require_email = require;
        if !require && self.data.email.is_empty() {
            self.errors.record(Field::Email, None);
        }
    }

    /// Card number as displayed in the input
    pub fn display_card_number(&self) -> String {
        format_card_number(&self.data.card_number)
    }

    /// Brand inferred from the digits typed so far
    pub fn brand(&self) -> Option<CardBrand> {
        CardBrand::detect(&self.data.card_number)
    }
}

impl FormModel for CardPaymentForm {
    const METHOD: PaymentMethodType = PaymentMethodType::Card;

    fn submit_fields(&self) -> &'static [Field] {
        SUBMIT_FIELDS
    }

    fn context(&self) -> &ValidationContext {
        &self.ctx
    }

    fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut FieldErrors {
        &mut self.errors
    }

    fn value(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::CardNumber => &self.data.card_number,
            Field::CardholderName => &self.data.cardholder_name,
            Field::ExpiryMonth => &self.data.expiry_month,
            Field::ExpiryYear => &self.data.expiry_year,
            Field::Cvv => &self.data.cvv,
            Field::Email => &self.data.email,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn set_value(&mut self, field: Field, raw: &str) -> CheckoutResult<()> {
        match field {
            Field::CardNumber => self.data.card_number = digits_truncated(raw, CARD_NUMBER_MAX_DIGITS),
            Field::ExpiryMonth => self.data.expiry_month = digits_truncated(raw, EXPIRY_MAX_DIGITS),
            Field::ExpiryYear => self.data.expiry_year = digits_truncated(raw, EXPIRY_MAX_DIGITS),
            Field::Cvv => self.data.cvv = digits_truncated(raw, CVV_MAX_DIGITS),
            Field::CardholderName => self.data.cardholder_name = raw.to_string(),
            Field::Email => self.data.email = raw.to_string(),
            other => return Err(Self::not_in_form(other)),
        }
        Ok(())
    }

    fn payload(&self) -> PaymentSubmitPayload {
        PaymentSubmitPayload::Card(self.data.clone())
    }
}

fn digits_truncated(raw: &str, max: usize) -> String {
    let mut digits = digits_only(raw);
    digits.truncate(max);
    digits
}

/// Group digits in blocks of four: `4111111111111111` → `4111 1111 1111 1111`
pub fn format_card_number(number: &str) -> String {
    let cleaned: Vec<char> = number.chars().filter(|c| !c.is_whitespace()).collect();
    cleaned
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Card network guessed from the leading digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
}

impl CardBrand {
    /// 4 → Visa, 51–55 → Mastercard, 34/37 → Amex
    pub fn detect(number: &str) -> Option<Self> {
        let mut digits = number.chars().filter(|c| !c.is_whitespace());
        match (digits.next(), digits.next()) {
            (Some('4'), _) => Some(CardBrand::Visa),
            (Some('5'), Some('1'..='5')) => Some(CardBrand::Mastercard),
            (Some('3'), Some('4' | '7')) => Some(CardBrand::Amex),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CardBrand::Visa => "visa",
            CardBrand::Mastercard => "mastercard",
            CardBrand::Amex => "amex",
        }
    }

    /// Glyph rendered next to the card number input
    pub fn glyph(&self) -> &'static str {
        "💳"
    }
}
