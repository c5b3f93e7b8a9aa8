//! Outbound email.
//!
//! Services hand a rendered [`Email`] to whichever [`Mailer`] the application
//! state carries: SMTP in production, a log-only backend in development and an
//! in-memory outbox in tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::config::{AppConfig, MailBackend, SmtpConfig};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("smtp error: {0}")]
    Smtp(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), MailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let mut builder = if config.host == "localhost" || config.host == "127.0.0.1" {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| MailError::Smtp(e.to_string()))?
        };
        builder = builder.port(config.port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }
        Ok(Self {
            transport: builder.build(),
        })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse::<Mailbox>()
        .map_err(|_| MailError::InvalidAddress(address.to_string()))
}

fn to_message(email: &Email) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_PLAIN);
    for recipient in &email.to {
        builder = builder.to(parse_mailbox(recipient)?);
    }
    builder
        .body(email.body.clone())
        .map_err(|e| MailError::Build(e.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        let message = to_message(email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;
        tracing::info!(to = ?email.to, subject = %email.subject, "email sent");
        Ok(())
    }
}

/// Development backend: validates the message and writes it to the log.
pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        to_message(email)?;
        tracing::info!(
            to = ?email.to,
            subject = %email.subject,
            body = %email.body,
            "email (console backend)"
        );
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryMailer {
    outbox: Arc<Mutex<Vec<Email>>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Email> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }

    pub fn sent_to(&self, address: &str) -> Vec<Email> {
        self.sent()
            .into_iter()
            .filter(|email| email.to.iter().any(|to| to == address))
            .collect()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        to_message(email)?;
        if let Ok(mut outbox) = self.outbox.lock() {
            outbox.push(email.clone());
        }
        Ok(())
    }
}

pub fn mailer_from_config(config: &AppConfig) -> Result<Arc<dyn Mailer>, MailError> {
    match config.mail_backend {
        MailBackend::Smtp => Ok(Arc::new(SmtpMailer::new(&config.smtp)?)),
        MailBackend::Console => Ok(Arc::new(ConsoleMailer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(to: &str) -> Email {
        Email {
            from: "School Uniforms <noreply@example.com>".into(),
            to: vec![to.into()],
            subject: "Hello".into(),
            body: "Body".into(),
        }
    }

    #[tokio::test]
    async fn memory_mailer_keeps_sent_messages() {
        let mailer = MemoryMailer::new();
        mailer.send(&email("parent@example.com")).await.unwrap();
        mailer.send(&email("tailor@example.com")).await.unwrap();

        assert_eq!(mailer.sent().len(), 2);
        assert_eq!(mailer.sent_to("tailor@example.com").len(), 1);
    }

    #[tokio::test]
    async fn rejects_invalid_recipient() {
        let mailer = MemoryMailer::new();
        let err = mailer.send(&email("not-an-address")).await.unwrap_err();
        assert!(matches!(err, MailError::InvalidAddress(_)));
        assert!(mailer.sent().is_empty());
    }
}
