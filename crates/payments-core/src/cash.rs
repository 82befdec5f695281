//! # Cash Payment Form
//!
//! Collects what is needed to issue a cash voucher payable at collection
//! points (Efecty, Baloto, Su Red, banking agents).

use crate::error::CheckoutResult;
use crate::form::{
    DocumentTypeOption, FieldErrors, FormModel, PaymentSubmitPayload, DEFAULT_DOCUMENT_TYPE,
};
use crate::method::PaymentMethodType;
use crate::validation::{digits_only, Field, ValidationContext};
use serde::{Deserialize, Serialize};

/// Document types accepted for cash vouchers
pub const CASH_DOCUMENT_TYPES: &[DocumentTypeOption] = &[
    DocumentTypeOption { value: "CC", label: "Cédula de Ciudadanía" },
    DocumentTypeOption { value: "CE", label: "Cédula de Extranjería" },
    DocumentTypeOption { value: "TI", label: "Tarjeta de Identidad" },
    DocumentTypeOption { value: "PP", label: "Pasaporte" },
];

/// Where a generated voucher can be paid
pub const CASH_COLLECTION_POINTS: &[&str] = &[
    "Puntos Efecty",
    "Baloto",
    "Su Red",
    "Corresponsales bancarios",
];

/// Values collected by the cash form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashPaymentFormData {
    pub email: String,
    pub document_type: String,
    pub document_number: String,
    pub full_name: String,
}

impl Default for CashPaymentFormData {
    fn default() -> Self {
        Self {
            email: String::new(),
            document_type: DEFAULT_DOCUMENT_TYPE.to_string(),
            document_number: String::new(),
            full_name: String::new(),
        }
    }
}

/// Cash form state
#[derive(Debug, Clone)]
pub struct CashPaymentForm {
    data: CashPaymentFormData,
    errors: FieldErrors,
    ctx: ValidationContext,
}

const SUBMIT_FIELDS: &[Field] = &[Field::Email, Field::DocumentNumber, Field::FullName];

impl CashPaymentForm {
    pub fn new() -> Self {
        Self::with_context(ValidationContext::new(true))
    }

    /// Email is always required for cash vouchers
    pub fn with_context(ctx: ValidationContext) -> Self {
        Self {
            data: CashPaymentFormData::default(),
            errors: FieldErrors::new(),
            ctx: ValidationContext {
                require_email: true,
                form: Some(Self::METHOD),
                ..ctx
            },
        }
    }

    pub fn data(&self) -> &CashPaymentFormData {
        &self.data
    }
}

impl Default for CashPaymentForm {
    fn default() -> Self {
        Self::new()
    }
}

impl FormModel for CashPaymentForm {
    const METHOD: PaymentMethodType = PaymentMethodType::Cash;

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
            Field::Email => &self.data.email,
            Field::DocumentType => &self.data.document_type,
            Field::DocumentNumber => &self.data.document_number,
            Field::FullName => &self.data.full_name,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn set_value(&mut self, field: Field, raw: &str) -> CheckoutResult<()> {
        match field {
            Field::Email => self.data.email = raw.to_string(),
            Field::DocumentType => self.data.document_type = raw.to_string(),
            Field::DocumentNumber => self.data.document_number = digits_only(raw),
            Field::FullName => self.data.full_name = raw.to_string(),
            other => return Err(Self::not_in_form(other)),
        }
        Ok(())
    }

    fn payload(&self) -> PaymentSubmitPayload {
        PaymentSubmitPayload::Cash(self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_heuristic() {
        let mut form = CashPaymentForm::new();

        form.update_field(Field::FullName, "Juan").unwrap();
        assert_eq!(
            form.errors().get(Field::FullName),
            Some("Ingresa tu nombre completo")
        );

        form.update_field(Field::FullName, "Juan Pérez").unwrap();
        assert!(form.errors().get(Field::FullName).is_none());
    }

    #[test]
    fn test_submit_rebuilds_errors() {
        let mut form = CashPaymentForm::new();
        form.update_field(Field::Email, "juan@correo.com").unwrap();
        form.update_field(Field::FullName, "Juan Pérez García").unwrap();

        assert!(form.submit().is_none());
        assert_eq!(form.errors().len(), 1);
        assert!(form.errors().contains(Field::DocumentNumber));

        form.update_field(Field::DocumentNumber, "79845123").unwrap();
        let payload = form.submit().expect("valid form");
        assert_eq!(payload.method_type(), PaymentMethodType::Cash);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_rejects_card_fields() {
        let mut form = CashPaymentForm::new();
        assert!(form.update_field(Field::Cvv, "123").is_err());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_document_types_exclude_nit() {
        assert!(!CASH_DOCUMENT_TYPES.iter().any(|d| d.value == "NIT"));
        assert_eq!(CASH_COLLECTION_POINTS.len(), 4);
    }
}
