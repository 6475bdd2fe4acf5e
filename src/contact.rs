use std::fmt;

use serde::Serialize;

pub const SUBJECT_SUFFIX: &str = " — via portfolio contact";
pub const SETTLE_DELAY_MS: u32 = 1_500;
pub const ERROR_SETTLE_DELAY_MS: u32 = 2_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactPayload {
    pub fn from_fields(
        name: Option<String>,
        email: Option<String>,
        subject: Option<String>,
        message: Option<String>,
    ) -> Self {
        fn or_default(value: Option<String>, fallback: &str) -> String {
            value
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        }

        Self {
            name: or_default(name, "Anonymous"),
            email: or_default(email, ""),
            subject: or_default(subject, "(no subject)"),
            message: or_default(message, ""),
        }
    }

    pub fn template_params(&self, recipient: &str) -> TemplateParams {
        TemplateParams {
            from_name: self.name.clone(),
            from_email: self.email.clone(),
            to_email: recipient.to_string(),
            subject: self.subject.clone(),
            message: self.message.clone(),
        }
    }

    pub fn mailto_href(&self, recipient: &str) -> String {
        let subject = format!("{}{SUBJECT_SUFFIX}", self.subject);
        let body = format!(
            "Name: {}\nEmail: {}\n\nMessage:\n{}",
            self.name, self.email, self.message
        );

        format!(
            "mailto:{}?subject={}&body={}",
            urlencoding::encode(recipient),
            urlencoding::encode(&subject),
            urlencoding::encode(&body)
        )
    }
}

/// Variables handed to the relay's email template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub to_email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayError {
    SdkMissing,
    SdkCall(String),
    Rejected(String),
}

impl RelayError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SdkMissing => "sdk_missing",
            Self::SdkCall(_) => "sdk_call",
            Self::Rejected(_) => "rejected",
        }
    }
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SdkMissing => write!(f, "relay client is not loaded"),
            Self::SdkCall(detail) => write!(f, "relay client call failed: {detail}"),
            Self::Rejected(detail) => write!(f, "relay rejected the message: {detail}"),
        }
    }
}

impl std::error::Error for RelayError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailtoError(pub String);

impl fmt::Display for MailtoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not open mail client: {}", self.0)
    }
}

impl std::error::Error for MailtoError {}

pub trait RelayTransport {
    async fn send(&self, params: &TemplateParams) -> Result<(), RelayError>;
}

pub trait MailClient {
    fn open(&self, href: &str) -> Result<(), MailtoError>;
}

#[derive(Debug, PartialEq, Eq)]
pub enum Delivery {
    Relayed,
    MailClient { relay_error: Option<RelayError> },
    Failed { relay_error: Option<RelayError>, error: MailtoError },
}

impl Delivery {
    pub fn label(&self) -> SubmitLabel {
        match self {
            Self::Relayed => SubmitLabel::Sent,
            Self::MailClient { .. } => SubmitLabel::OpenedMailClient,
            Self::Failed { .. } => SubmitLabel::Error,
        }
    }

    pub fn settle_delay_ms(&self) -> u32 {
        match self {
            Self::Relayed | Self::MailClient { .. } => SETTLE_DELAY_MS,
            Self::Failed { .. } => ERROR_SETTLE_DELAY_MS,
        }
    }

    pub fn resets_form(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    pub fn relay_error(&self) -> Option<&RelayError> {
        match self {
            Self::Relayed => None,
            Self::MailClient { relay_error } | Self::Failed { relay_error, .. } => {
                relay_error.as_ref()
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relayed => "relayed",
            Self::MailClient { .. } => "mail_client",
            Self::Failed { .. } => "failed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitLabel {
    Idle,
    Sending,
    Sent,
    OpenedMailClient,
    Error,
}

impl SubmitLabel {
    pub fn text(self) -> &'static str {
        match self {
            Self::Idle => "Transmit",
            Self::Sending => "Sending…",
            Self::Sent => "Sent ✔",
            Self::OpenedMailClient => "Opened Mail Client",
            Self::Error => "Error",
        }
    }
}

/// Tries the relay once, then falls back to the user's mail client.
pub async fn deliver<R, M>(
    relay: Option<&R>,
    mail: &M,
    recipient: &str,
    payload: &ContactPayload,
) -> Delivery
where
    R: RelayTransport,
    M: MailClient,
{
    let relay_error = match relay {
        Some(relay) => match relay.send(&payload.template_params(recipient)).await {
            Ok(()) => return Delivery::Relayed,
            Err(error) => Some(error),
        },
        None => None,
    };

    match mail.open(&payload.mailto_href(recipient)) {
        Ok(()) => Delivery::MailClient { relay_error },
        Err(error) => Delivery::Failed { relay_error, error },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    struct FakeRelay {
        result: Result<(), RelayError>,
        calls: Cell<usize>,
        last_params: RefCell<Option<TemplateParams>>,
    }

    impl FakeRelay {
        fn new(result: Result<(), RelayError>) -> Self {
            Self {
                result,
                calls: Cell::new(0),
                last_params: RefCell::new(None),
            }
        }
    }

    impl RelayTransport for FakeRelay {
        async fn send(&self, params: &TemplateParams) -> Result<(), RelayError> {
            self.calls.set(self.calls.get() + 1);
            *self.last_params.borrow_mut() = Some(params.clone());
            self.result.clone()
        }
    }

    struct FakeMail {
        fail: bool,
        opened: RefCell<Vec<String>>,
    }

    impl FakeMail {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                opened: RefCell::new(Vec::new()),
            }
        }
    }

    impl MailClient for FakeMail {
        fn open(&self, href: &str) -> Result<(), MailtoError> {
            self.opened.borrow_mut().push(href.to_string());
            if self.fail {
                Err(MailtoError("navigation blocked".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn sample_payload() -> ContactPayload {
        ContactPayload::from_fields(
            Some("Ada".to_string()),
            Some("ada@example.com".to_string()),
            Some("Hello".to_string()),
            Some("Line one\nLine two".to_string()),
        )
    }

    #[test]
    fn payload_fills_defaults_for_empty_fields() {
        let payload =
            ContactPayload::from_fields(Some(String::new()), None, Some(String::new()), None);

        assert_eq!(payload.name, "Anonymous");
        assert_eq!(payload.email, "");
        assert_eq!(payload.subject, "(no subject)");
        assert_eq!(payload.message, "");
    }

    #[test]
    fn mailto_href_encodes_recipient_subject_and_body() {
        let href = sample_payload().mailto_href("owner@example.com");

        assert_eq!(
            href,
            "mailto:owner%40example.com\
             ?subject=Hello%20%E2%80%94%20via%20portfolio%20contact\
             &body=Name%3A%20Ada%0AEmail%3A%20ada%40example.com%0A%0A\
             Message%3A%0ALine%20one%0ALine%20two"
        );
    }

    #[test]
    fn template_params_carry_recipient() {
        let params = sample_payload().template_params("owner@example.com");

        assert_eq!(params.to_email, "owner@example.com");
        assert_eq!(params.from_name, "Ada");
        let json = serde_json::to_value(&params).expect("serializable params");
        assert_eq!(json["from_email"], "ada@example.com");
    }

    #[tokio::test]
    async fn successful_relay_skips_mail_client() {
        let relay = FakeRelay::new(Ok(()));
        let mail = FakeMail::new(false);

        let delivery = deliver(Some(&relay), &mail, "owner@example.com", &sample_payload()).await;

        assert_eq!(delivery, Delivery::Relayed);
        assert_eq!(delivery.label(), SubmitLabel::Sent);
        assert_eq!(delivery.settle_delay_ms(), SETTLE_DELAY_MS);
        assert!(delivery.resets_form());
        assert_eq!(relay.calls.get(), 1);
        assert!(mail.opened.borrow().is_empty());
        assert_eq!(
            relay.last_params.borrow().as_ref().map(|params| params.subject.as_str()),
            Some("Hello")
        );
    }

    #[tokio::test]
    async fn missing_relay_opens_mail_client() {
        let mail = FakeMail::new(false);

        let delivery =
            deliver::<FakeRelay, _>(None, &mail, "owner@example.com", &sample_payload()).await;

        assert_eq!(delivery, Delivery::MailClient { relay_error: None });
        assert_eq!(delivery.label(), SubmitLabel::OpenedMailClient);
        assert!(delivery.resets_form());
        let opened = mail.opened.borrow();
        assert_eq!(opened.len(), 1);
        assert!(opened[0].starts_with("mailto:owner%40example.com?subject="));
    }

    #[tokio::test]
    async fn failing_relay_falls_back_once() {
        let relay = FakeRelay::new(Err(RelayError::Rejected("invalid template".to_string())));
        let mail = FakeMail::new(false);

        let delivery = deliver(Some(&relay), &mail, "owner@example.com", &sample_payload()).await;

        assert_eq!(
            delivery.relay_error(),
            Some(&RelayError::Rejected("invalid template".to_string()))
        );
        assert_eq!(delivery.label(), SubmitLabel::OpenedMailClient);
        assert_eq!(relay.calls.get(), 1);
        assert_eq!(mail.opened.borrow().len(), 1);
    }

    #[tokio::test]
    async fn mail_client_failure_reports_error_without_reset() {
        let relay = FakeRelay::new(Err(RelayError::SdkCall("boom".to_string())));
        let mail = FakeMail::new(true);

        let delivery = deliver(Some(&relay), &mail, "owner@example.com", &sample_payload()).await;

        assert_eq!(delivery.label(), SubmitLabel::Error);
        assert_eq!(delivery.settle_delay_ms(), ERROR_SETTLE_DELAY_MS);
        assert!(!delivery.resets_form());
        assert_eq!(delivery.as_str(), "failed");
    }

    #[test]
    fn labels_match_button_copy() {
        assert_eq!(SubmitLabel::Idle.text(), "Transmit");
        assert_eq!(SubmitLabel::Sending.text(), "Sending…");
        assert_eq!(SubmitLabel::Sent.text(), "Sent ✔");
    }
}
