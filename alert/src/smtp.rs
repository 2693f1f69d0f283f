use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, instrument};

use crate::message::Alert;
use crate::notifier::{Notifier, NotifyError};

/// Where and how to reach the SMTP relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Upgrade the connection with STARTTLS.
    pub enable_ssl: bool,
}

#[derive(Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Whether `address` can be used as a sender or recipient mailbox.
pub fn is_mailbox(address: &str) -> bool {
    address.parse::<Mailbox>().is_ok()
}

/// Sends alerts as HTML mail to a single recipient.
///
/// The authenticated username doubles as the sender address.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    pub fn new(
        settings: &SmtpSettings,
        credentials: &SmtpCredentials,
        recipient: &str,
    ) -> Result<Self, NotifyError> {
        let builder = if settings.enable_ssl {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
        };

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                credentials.username.clone(),
                credentials.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: credentials.username.parse()?,
            to: recipient.parse()?,
        })
    }

    fn build_message(&self, alert: &Alert) -> Result<Message, NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(alert.subject())
            .header(ContentType::TEXT_HTML)
            .body(alert.html_body())?;
        Ok(message)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    #[instrument(
        skip_all,
        fields(ticker = %alert.ticker, signal = %alert.signal),
        level = "debug"
    )]
    async fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        let message = self.build_message(alert)?;
        let response = self.transport.send(message).await?;

        debug!(code = %response.code(), "smtp relay accepted message");
        Ok(())
    }
}
