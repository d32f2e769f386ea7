//! Outbound email over SMTP.
//!
//! Only one notification exists today: telling a customer their order
//! shipped. Sending is best-effort; callers log failures and move on
//! rather than failing the request.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// Errors from building or sending a message.
#[derive(Debug, Error)]
pub enum EmailError {
    /// The message could not be constructed (bad address, bad header).
    #[error("failed to build email: {0}")]
    Build(#[from] lettre::error::Error),

    /// The recipient or sender address did not parse.
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The SMTP server rejected the message or was unreachable.
    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Sends transactional email through a configured SMTP relay.
#[derive(Clone)]
pub struct EmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Build a STARTTLS transport from the SMTP settings.
    ///
    /// # Errors
    ///
    /// Returns `lettre::transport::smtp::Error` if the relay parameters
    /// are invalid.
    pub fn from_config(config: &EmailConfig) -> Result<Self, lettre::transport::smtp::Error> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_owned(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }

    /// Notify a customer that their order is on the way.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the message cannot be built or handed to
    /// the relay.
    pub async fn send_order_shipped(
        &self,
        to: &str,
        order_number: &str,
        tracking_number: Option<&str>,
    ) -> Result<(), EmailError> {
        let body = match tracking_number {
            Some(tracking) => format!(
                "Good news! Your order {order_number} has shipped.\n\n\
                 Tracking number: {tracking}\n\n\
                 Thank you for shopping with Animart.\n"
            ),
            None => format!(
                "Good news! Your order {order_number} has shipped.\n\n\
                 Thank you for shopping with Animart.\n"
            ),
        };

        let message = Message::builder()
            .from(self.from_address.parse()?)
            .to(to.parse()?)
            .subject(format!("Your order {order_number} has shipped"))
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.transport.send(message).await?;
        Ok(())
    }
}
