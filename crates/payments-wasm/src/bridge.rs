//! Adapters between the core's host seams and JavaScript functions.

use async_trait::async_trait;
use payments_core::{
    CheckoutError, CheckoutEvent, CheckoutObserver, PaymentMethodType, PaymentSubmitPayload,
    SubmitError,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};

/// Serialize to plain JS objects (maps become objects, not `Map`)
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

/// Name carried by errors the host can retry once the pending submit settles
pub(crate) const BUSY_ERROR_NAME: &str = "CheckoutBusyError";

pub(crate) fn js_error(err: CheckoutError) -> JsValue {
    let error = js_sys::Error::new(&err.to_string());
    if err.is_transient() {
        error.set_name(BUSY_ERROR_NAME);
    }
    error.into()
}

/// `onSubmit` backed by a JS function returning a promise (or a plain value)
pub(crate) struct JsSubmitHandler {
    callback: js_sys::Function,
}

impl JsSubmitHandler {
    pub(crate) fn new(callback: js_sys::Function) -> Self {
        Self { callback }
    }
}

#[async_trait(?Send)]
impl payments_core::SubmitHandler for JsSubmitHandler {
    async fn submit(&self, payload: &PaymentSubmitPayload) -> Result<(), SubmitError> {
        let arg = to_js(payload).map_err(rejection)?;
        let returned = self
            .callback
            .call1(&JsValue::NULL, &arg)
            .map_err(rejection)?;

        JsFuture::from(js_sys::Promise::resolve(&returned))
            .await
            .map(|_| ())
            .map_err(rejection)
    }

    fn name(&self) -> &'static str {
        "js"
    }
}

/// Only `Error` instances carry a usable message
fn rejection(value: JsValue) -> SubmitError {
    SubmitError::from_message(
        value
            .dyn_ref::<js_sys::Error>()
            .map(|err| String::from(err.message())),
    )
}

/// Forwards checkout events to a JS listener.
///
/// Calls are deferred to a microtask: the checkout is still borrowed while
/// it notifies, and listeners commonly read it back.
pub(crate) struct JsEventListener {
    listener: js_sys::Function,
}

impl JsEventListener {
    pub(crate) fn new(listener: js_sys::Function) -> Self {
        Self { listener }
    }

    fn emit(&self, event: CheckoutEvent) {
        let listener = self.listener.clone();
        spawn_local(async move {
            let result = to_js(&event).and_then(|arg| listener.call1(&JsValue::NULL, &arg));
            if let Err(err) = result {
                web_sys::console::error_2(
                    &JsValue::from_str(&format!("{} listener failed:", event.name())),
                    &err,
                );
            }
        });
    }
}

impl CheckoutObserver for JsEventListener {
    fn on_method_selected(&self, method: PaymentMethodType) {
        self.emit(CheckoutEvent::MethodSelected { method });
    }

    fn on_payment_success(&self, payload: &PaymentSubmitPayload) {
        self.emit(CheckoutEvent::PaymentSuccess {
            payload: payload.clone(),
        });
    }

    fn on_payment_error(&self, payload: &PaymentSubmitPayload, error: &str) {
        self.emit(CheckoutEvent::PaymentError {
            payload: payload.clone(),
            error: error.to_string(),
        });
    }
}
