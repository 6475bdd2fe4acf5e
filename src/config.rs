use serde::Deserialize;

use crate::logging::LogLevel;

pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;
pub const DEFAULT_CONTACT_RECIPIENT: &str = "abubakarsow111@gmail.com";

/// Page-wide settings read once at boot from attributes on the document.
#[derive(Clone, Debug, PartialEq)]
pub struct PageConfig {
    pub log_level: LogLevel,
    pub contact_recipient: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL,
            contact_recipient: DEFAULT_CONTACT_RECIPIENT.to_string(),
        }
    }
}

impl PageConfig {
    pub fn from_attributes(log_level: Option<&str>, contact_recipient: Option<&str>) -> Self {
        let log_level = log_level
            .and_then(LogLevel::from_str)
            .unwrap_or(DEFAULT_LOG_LEVEL);
        let contact_recipient = contact_recipient
            .map(str::trim)
            .filter(|value| looks_like_address(value))
            .unwrap_or(DEFAULT_CONTACT_RECIPIENT)
            .to_string();

        Self {
            log_level,
            contact_recipient,
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_document() -> Self {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return Self::default();
        };

        let log_level = document
            .document_element()
            .and_then(|root| root.get_attribute("data-log-level"));
        let contact_recipient = document
            .get_element_by_id("contactForm")
            .and_then(|form| form.get_attribute("data-contact-recipient"));

        Self::from_attributes(log_level.as_deref(), contact_recipient.as_deref())
    }
}

fn looks_like_address(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !value.contains(' '),
        None => false,
    }
}

#[derive(Deserialize)]
struct RelayConfigFields {
    #[serde(rename = "serviceID", default)]
    service_id: Option<String>,
    #[serde(rename = "templateID", default)]
    template_id: Option<String>,
    #[serde(rename = "userID", default)]
    user_id: Option<String>,
}

/// Email relay credentials published by the page as `window.__EMAILJS`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayConfig {
    pub service_id: String,
    pub template_id: String,
    pub user_id: Option<String>,
}

impl RelayConfig {
    /// Returns `None` unless both the service and template ids are present.
    pub fn from_json(raw: &str) -> Option<Self> {
        let fields: RelayConfigFields = serde_json::from_str(raw).ok()?;

        Some(Self {
            service_id: non_empty(fields.service_id)?,
            template_id: non_empty(fields.template_id)?,
            user_id: non_empty(fields.user_id),
        })
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_window() -> Option<Self> {
        use js_sys::{Reflect, JSON};
        use wasm_bindgen::JsValue;

        let window = web_sys::window()?;
        let value = Reflect::get(&window, &JsValue::from_str("__EMAILJS")).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }

        let raw = JSON::stringify(&value).ok()?.as_string()?;
        Self::from_json(&raw)
    }

    /// Credentials are only usable once the relay client script has loaded.
    pub fn when_client_loaded(self, loaded: bool) -> Option<Self> {
        loaded.then_some(self)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_config_defaults_when_attributes_missing() {
        let config = PageConfig::from_attributes(None, None);

        assert_eq!(config, PageConfig::default());
    }

    #[test]
    fn page_config_reads_level_and_recipient() {
        let config = PageConfig::from_attributes(Some("debug"), Some(" owner@example.com "));

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.contact_recipient, "owner@example.com");
    }

    #[test]
    fn page_config_rejects_malformed_recipient() {
        let config = PageConfig::from_attributes(Some("loud"), Some("not an address"));

        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.contact_recipient, DEFAULT_CONTACT_RECIPIENT);
    }

    #[test]
    fn relay_config_requires_service_and_template() {
        assert!(RelayConfig::from_json(r#"{"serviceID":"svc"}"#).is_none());
        assert!(RelayConfig::from_json(r#"{"serviceID":"svc","templateID":"  "}"#).is_none());
        assert!(RelayConfig::from_json("null").is_none());
        assert!(RelayConfig::from_json("not json").is_none());
    }

    #[test]
    fn relay_config_keeps_optional_user_id() {
        let config = RelayConfig::from_json(
            r#"{"serviceID":"svc","templateID":"tpl","userID":"pub-key","extra":1}"#,
        )
        .expect("complete config");

        assert_eq!(config.service_id, "svc");
        assert_eq!(config.template_id, "tpl");
        assert_eq!(config.user_id.as_deref(), Some("pub-key"));

        let without_user =
            RelayConfig::from_json(r#"{"serviceID":"svc","templateID":"tpl","userID":""}"#)
                .expect("complete config");
        assert_eq!(without_user.user_id, None);
    }

    #[test]
    fn relay_config_unused_without_loaded_client() {
        let config = RelayConfig::from_json(
            r#"{"serviceID":"svc","templateID":"tpl","userID":"pub-key"}"#,
        )
        .expect("complete config");

        assert_eq!(config.clone().when_client_loaded(false), None);
        assert_eq!(config.clone().when_client_loaded(true), Some(config));
    }
}
