//! # payments-wasm
//!
//! WebAssembly bindings for the Bloque checkout core.
//!
//! This crate exposes to JavaScript hosts (custom elements, React or Vue
//! wrappers):
//! - `BloqueCheckout`: the checkout orchestrator, driven by UI events
//! - Display helpers for the card form
//! - Standalone field validation
//! - Method and bank catalogs for rendering selects
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { BloqueCheckout } from 'bloque-payments-wasm';
//!
//! await init();
//!
//! const checkout = new BloqueCheckout({ availableMethods: ['card', 'pse'] });
//! checkout.setOnSubmit(async (payload) => api.pay(payload));
//! checkout.addEventListener((event) => console.log(event.event, event));
//!
//! checkout.select('pse');
//! checkout.updateField('bankCode', 'bancolombia');
//! const outcome = await checkout.submit();
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

mod bridge;

use bridge::{js_error, to_js, JsEventListener, JsSubmitHandler};
use payments_core::{
    format_card_number as core_format_card_number, payment_methods as core_payment_methods,
    validate, CardBrand, Checkout, CheckoutConfig, Field, PaymentMethodType, SubmitHandler,
    SubmitOutcome, ValidationContext, BANKS,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

/// Initialize the WASM module (called automatically)
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Checkout orchestrator for JavaScript hosts
#[wasm_bindgen(js_name = BloqueCheckout)]
pub struct WasmCheckout {
    inner: Rc<RefCell<Checkout>>,
    handler: Option<Rc<JsSubmitHandler>>,
}

#[wasm_bindgen(js_class = BloqueCheckout)]
impl WasmCheckout {
    /// Mount a checkout from a config object (`undefined` for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmCheckout, JsValue> {
        let checkout = Checkout::new(parse_config(config)?).map_err(js_error)?;
        Ok(Self {
            inner: Rc::new(RefCell::new(checkout)),
            handler: None,
        })
    }

    /// Apply a new config object
    pub fn configure(&self, config: JsValue) -> Result<(), JsValue> {
        let config = parse_config(config)?;
        self.inner.borrow_mut().configure(config).map_err(js_error)
    }

    /// Set the `onSubmit` callback: `(payload) => Promise<void>`
    #[wasm_bindgen(js_name = setOnSubmit)]
    pub fn set_on_submit(&mut self, callback: js_sys::Function) {
        self.handler = Some(Rc::new(JsSubmitHandler::new(callback)));
    }

    /// Register a listener receiving `{ event, ... }` objects
    #[wasm_bindgen(js_name = addEventListener)]
    pub fn add_event_listener(&self, listener: js_sys::Function) {
        self.inner
            .borrow_mut()
            .subscribe(Rc::new(JsEventListener::new(listener)));
    }

    /// Select `"card"`, `"pse"` or `"cash"`
    pub fn select(&self, method: &str) -> Result<(), JsValue> {
        let method: PaymentMethodType = method.parse().map_err(js_error)?;
        self.inner.borrow_mut().select(method).map_err(js_error)
    }

    /// Input event; returns the field's message or `undefined`
    #[wasm_bindgen(js_name = updateField)]
    pub fn update_field(&self, field: &str, value: &str) -> Result<Option<String>, JsValue> {
        self.inner
            .borrow_mut()
            .update_field_by_name(field, value)
            .map_err(js_error)
    }

    /// Submit event; resolves to `{ outcome: "invalid" | "succeeded" | "failed", ... }`
    pub fn submit(&self) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        let handler = self.handler.clone();

        future_to_promise(async move {
            let begun = inner.borrow_mut().begin_submission().map_err(js_error)?;
            let Some(payload) = begun else {
                return to_js(&SubmitOutcome::Invalid);
            };

            // No borrow is held while the host callback runs.
            let result = match handler {
                Some(handler) => handler.submit(&payload).await,
                None => Ok(()),
            };

            let outcome = inner
                .borrow_mut()
                .complete_submission(payload, result)
                .map_err(js_error)?;
            to_js(&outcome)
        })
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.inner.borrow().state().to_string()
    }

    #[wasm_bindgen(getter, js_name = sessionId)]
    pub fn session_id(&self) -> String {
        self.inner.borrow().session_id().to_string()
    }

    #[wasm_bindgen(getter, js_name = selectedMethod)]
    pub fn selected_method(&self) -> Option<String> {
        self.inner
            .borrow()
            .selected_method()
            .map(|m| m.as_str().to_string())
    }

    #[wasm_bindgen(getter, js_name = availableMethods)]
    pub fn available_methods(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.borrow().available_methods())
    }

    #[wasm_bindgen(getter, js_name = isLoading)]
    pub fn is_loading(&self) -> bool {
        self.inner.borrow().is_loading()
    }

    #[wasm_bindgen(getter, js_name = lastError)]
    pub fn last_error(&self) -> Option<String> {
        self.inner.borrow().last_error().map(String::from)
    }

    #[wasm_bindgen(getter, js_name = showMethodSelector)]
    pub fn show_method_selector(&self) -> bool {
        self.inner.borrow().show_method_selector()
    }

    /// `{ fieldName: message }` for the active form (empty without a form)
    #[wasm_bindgen(getter)]
    pub fn errors(&self) -> Result<JsValue, JsValue> {
        let checkout = self.inner.borrow();
        match checkout.errors() {
            Some(errors) => to_js(errors),
            None => Ok(js_sys::Object::new().into()),
        }
    }

    /// Current values of the active form, `null` without a form
    #[wasm_bindgen(getter, js_name = formData)]
    pub fn form_data(&self) -> Result<JsValue, JsValue> {
        let checkout = self.inner.borrow();
        match checkout.form() {
            Some(form) => to_js(&form.snapshot()),
            None => Ok(JsValue::NULL),
        }
    }

    /// Inline style with the `--bloque-*` custom properties
    #[wasm_bindgen(getter, js_name = cssVariables)]
    pub fn css_variables(&self) -> String {
        self.inner.borrow().config().appearance.css_variables()
    }
}

fn parse_config(config: JsValue) -> Result<CheckoutConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(CheckoutConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid checkout config: {}", e)))
}

/// Group card digits in blocks of four for display
#[wasm_bindgen(js_name = formatCardNumber)]
pub fn format_card_number(number: &str) -> String {
    core_format_card_number(number)
}

/// `"visa"`, `"mastercard"`, `"amex"` or `undefined`
#[wasm_bindgen(js_name = detectCardBrand)]
pub fn detect_card_brand(number: &str) -> Option<String> {
    CardBrand::detect(number).map(|b| b.as_str().to_string())
}

/// Glyph shown beside the card number once a brand is recognised
#[wasm_bindgen(js_name = cardBrandGlyph)]
pub fn card_brand_glyph(number: &str) -> Option<String> {
    CardBrand::detect(number).map(|b| b.glyph().to_string())
}

/// Validate one value outside a checkout; returns the message or `undefined`
#[wasm_bindgen(js_name = validateField)]
pub fn validate_field(field: &str, value: &str, require_email: bool) -> Result<Option<String>, JsValue> {
    let field: Field = field.parse().map_err(js_error)?;
    Ok(validate(field, value, &ValidationContext::new(require_email)))
}

/// `[{ type, label, description }]` in selector order
#[wasm_bindgen(js_name = paymentMethods)]
pub fn payment_methods() -> Result<JsValue, JsValue> {
    to_js(&core_payment_methods())
}

/// `[{ code, name }]` for the PSE bank select
#[wasm_bindgen(js_name = pseBanks)]
pub fn pse_banks() -> Result<JsValue, JsValue> {
    to_js(BANKS)
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_card_number() {
        assert_eq!(format_card_number("5105105105105100"), "5105 1051 0510 5100");
        assert_eq!(format_card_number("41"), "41");
    }

    #[test]
    fn test_detect_card_brand() {
        assert_eq!(detect_card_brand("4111").as_deref(), Some("visa"));
        assert_eq!(detect_card_brand("3714").as_deref(), Some("amex"));
        assert_eq!(detect_card_brand("6011"), None);
    }

    #[test]
    fn test_card_brand_glyph() {
        assert_eq!(card_brand_glyph("5500").as_deref(), Some("💳"));
        assert_eq!(card_brand_glyph(""), None);
    }

    #[test]
    fn test_validate_field() {
        assert_eq!(
            validate_field("cvv", "12", true).unwrap().as_deref(),
            Some("CVV inválido")
        );
        assert_eq!(validate_field("email", "", false).unwrap(), None);
        assert_eq!(validate_field("email", "a@b.c", true).unwrap(), None);
    }

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
