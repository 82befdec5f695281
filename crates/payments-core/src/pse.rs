//! # PSE Payment Form
//!
//! Bank-transfer form for PSE (Pagos Seguros en Línea). The customer picks a
//! bank and is redirected to it by the host; the core only collects and
//! validates the data needed to start that redirect.

use crate::error::{CheckoutError, CheckoutResult};
use crate::form::{
    DocumentTypeOption, FieldErrors, FormModel, PaymentSubmitPayload, DEFAULT_DOCUMENT_TYPE,
};
use crate::method::PaymentMethodType;
use crate::validation::{digits_only, Field, ValidationContext};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Natural person or legal entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonType {
    #[default]
    Natural,
    Juridica,
}

impl PersonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonType::Natural => "natural",
            PersonType::Juridica => "juridica",
        }
    }
}

impl FromStr for PersonType {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "natural" => Ok(PersonType::Natural),
            "juridica" => Ok(PersonType::Juridica),
            other => Err(CheckoutError::InvalidValue {
                field: Field::PersonType.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Bank participating in PSE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bank {
    pub code: &'static str,
    pub name: &'static str,
}

/// Banks offered in the bank select
pub const BANKS: &[Bank] = &[
    Bank { code: "bancolombia", name: "Bancolombia" },
    Bank { code: "banco_de_bogota", name: "Banco de Bogotá" },
    Bank { code: "banco_davivienda", name: "Davivienda" },
    Bank { code: "bbva", name: "BBVA Colombia" },
    Bank { code: "banco_occidente", name: "Banco de Occidente" },
    Bank { code: "banco_popular", name: "Banco Popular" },
    Bank { code: "banco_av_villas", name: "Banco AV Villas" },
    Bank { code: "colpatria", name: "Scotiabank Colpatria" },
    Bank { code: "banco_caja_social", name: "Banco Caja Social" },
    Bank { code: "banco_agrario", name: "Banco Agrario" },
    Bank { code: "citibank", name: "Citibank" },
    Bank { code: "banco_gnb_sudameris", name: "Banco GNB Sudameris" },
    Bank { code: "itau", name: "Itaú" },
    Bank { code: "bancoomeva", name: "Bancoomeva" },
];

/// Document types accepted for PSE (includes NIT for companies)
pub const PSE_DOCUMENT_TYPES: &[DocumentTypeOption] = &[
    DocumentTypeOption { value: "CC", label: "Cédula de Ciudadanía" },
    DocumentTypeOption { value: "CE", label: "Cédula de Extranjería" },
    DocumentTypeOption { value: "NIT", label: "NIT" },
    DocumentTypeOption { value: "TI", label: "Tarjeta de Identidad" },
    DocumentTypeOption { value: "PP", label: "Pasaporte" },
];

/// Look up a bank by code
pub fn find_bank(code: &str) -> Option<&'static Bank> {
    BANKS.iter().find(|b| b.code == code)
}

/// Values collected by the PSE form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsePaymentFormData {
    pub person_type: PersonType,
    pub document_type: String,
    pub document_number: String,
    pub bank_code: String,
    pub email: String,
}

impl Default for PsePaymentFormData {
    fn default() -> Self {
        Self {
            person_type: PersonType::Natural,
            document_type: DEFAULT_DOCUMENT_TYPE.to_string(),
            document_number: String::new(),
            bank_code: String::new(),
            email: String::new(),
        }
    }
}

/// PSE form state
#[derive(Debug, Clone)]
pub struct PsePaymentForm {
    data: PsePaymentFormData,
    errors: FieldErrors,
    ctx: ValidationContext,
}

const SUBMIT_FIELDS: &[Field] = &[Field::DocumentNumber, Field::BankCode, Field::Email];

impl PsePaymentForm {
    pub fn new() -> Self {
        Self::with_context(ValidationContext::new(true))
    }

    /// Email is always required for PSE, whatever the context says
    pub fn with_context(ctx: ValidationContext) -> Self {
        Self {
            data: PsePaymentFormData::default(),
            errors: FieldErrors::new(),
            ctx: ValidationContext {
                require_email: true,
                form: Some(Self::METHOD),
                ..ctx
            },
        }
    }

    pub fn data(&self) -> &PsePaymentFormData {
        &self.data
    }
}

impl Default for PsePaymentForm {
    fn default() -> Self {
        Self::new()
    }
}

impl FormModel for PsePaymentForm {
    const METHOD: PaymentMethodType = PaymentMethodType::Pse;

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
        match field {
            Field::PersonType => Some(self.data.person_type.as_str()),
            Field::DocumentType => Some(self.data.document_type.as_str()),
            Field::DocumentNumber => Some(self.data.document_number.as_str()),
            Field::BankCode => Some(self.data.bank_code.as_str()),
            Field::Email => Some(self.data.email.as_str()),
            _ => None,
        }
    }

    fn set_value(&mut self, field: Field, raw: &str) -> CheckoutResult<()> {
        match field {
            Field::PersonType => self.data.person_type = raw.parse()?,
            Field::DocumentType => self.data.document_type = raw.to_string(),
            Field::DocumentNumber => self.data.document_number = digits_only(raw),
            Field::BankCode => self.data.bank_code = raw.to_string(),
            Field::Email => self.data.email = raw.to_string(),
            other => return Err(Self::not_in_form(other)),
        }
        Ok(())
    }

    fn payload(&self) -> PaymentSubmitPayload {
        PaymentSubmitPayload::Pse(self.data.clone())
    }
}
