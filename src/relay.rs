use js_sys::{Function, Promise, Reflect, JSON};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::config::RelayConfig;
use crate::contact::{MailClient, MailtoError, RelayError, RelayTransport, TemplateParams};

/// The in-page email relay client (`window.emailjs`) with the credentials
/// published next to it.
pub struct Relay {
    client: JsValue,
    config: RelayConfig,
}

impl Relay {
    /// Credentials alone never enable the relay: the client script must be
    /// loaded too, otherwise the submission goes to the mail client.
    pub fn detect() -> Option<Self> {
        let client = loaded_client();
        let config = RelayConfig::from_window()?.when_client_loaded(client.is_some())?;

        Some(Self {
            client: client?,
            config,
        })
    }
}

impl RelayTransport for Relay {
    async fn send(&self, params: &TemplateParams) -> Result<(), RelayError> {
        if let (Some(user_id), Some(init)) =
            (self.config.user_id.as_deref(), method(&self.client, "init"))
        {
            // The page may already have initialized the client.
            let _ = init.call1(&self.client, &JsValue::from_str(user_id));
        }

        let send = method(&self.client, "send").ok_or(RelayError::SdkMissing)?;
        let params = to_js(params)?;
        let result = send
            .call3(
                &self.client,
                &JsValue::from_str(&self.config.service_id),
                &JsValue::from_str(&self.config.template_id),
                &params,
            )
            .map_err(|error| RelayError::SdkCall(describe_js_error(&error)))?;

        JsFuture::from(Promise::resolve(&result))
            .await
            .map_err(|error| RelayError::Rejected(describe_js_error(&error)))?;

        Ok(())
    }
}

fn loaded_client() -> Option<JsValue> {
    let window = web_sys::window()?;
    let client = Reflect::get(&window, &JsValue::from_str("emailjs")).ok()?;
    if client.is_undefined() || client.is_null() {
        return None;
    }

    method(&client, "send")?;
    Some(client)
}

/// Opens the user's mail client by navigating to a `mailto:` URL.
pub struct LocationMailClient;

impl MailClient for LocationMailClient {
    fn open(&self, href: &str) -> Result<(), MailtoError> {
        let window =
            web_sys::window().ok_or_else(|| MailtoError("window unavailable".to_string()))?;

        window
            .location()
            .set_href(href)
            .map_err(|error| MailtoError(describe_js_error(&error)))
    }
}

fn method(target: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

fn to_js(params: &TemplateParams) -> Result<JsValue, RelayError> {
    let raw =
        serde_json::to_string(params).map_err(|error| RelayError::SdkCall(error.to_string()))?;

    JSON::parse(&raw).map_err(|error| RelayError::SdkCall(describe_js_error(&error)))
}

pub fn describe_js_error(error: &JsValue) -> String {
    if let Some(message) = error.as_string() {
        return message;
    }

    if let Some(error) = error.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }

    JSON::stringify(error)
        .ok()
        .and_then(|value| value.as_string())
        .unwrap_or_else(|| "unknown error".to_string())
}
