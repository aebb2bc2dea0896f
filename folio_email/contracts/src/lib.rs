use std::future::Future;

use folio_models::{email_address::EmailAddressWithName, Sensitive};
use thiserror::Error;

/// Builds transports for the configured smtp server.
#[cfg_attr(feature = "mock", mockall::automock(type Transport = MockEmailTransport;))]
pub trait EmailService: Send + Sync + 'static {
    type Transport: EmailTransport;

    /// Create a transport that authenticates using the given credentials.
    ///
    /// No connection is established before [`EmailTransport::verify`] or
    /// [`EmailTransport::send`] is called.
    fn connect(&self, credentials: &EmailCredentials) -> anyhow::Result<Self::Transport>;
}

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailTransport: Send + Sync + 'static {
    /// Check that the smtp server is reachable and accepts the credentials.
    fn verify(&self) -> impl Future<Output = Result<(), EmailError>> + Send;

    fn send(&self, email: Email) -> impl Future<Output = Result<(), EmailError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailCredentials {
    pub user: String,
    pub password: Sensitive<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: EmailAddressWithName,
    pub recipient: EmailAddressWithName,
    pub subject: String,
    pub body: EmailBody,
    pub reply_to: Option<EmailAddressWithName>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailBody {
    Text(String),
    /// `multipart/alternative` with a plain text and an html representation of
    /// the same content.
    Alternative { text: String, html: String },
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("The smtp server rejected the credentials: {0}")]
    Authentication(anyhow::Error),
    #[error("Failed to communicate with the smtp server: {0}")]
    Network(anyhow::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockEmailService {
    pub fn with_connect(
        mut self,
        credentials: EmailCredentials,
        transport: MockEmailTransport,
    ) -> Self {
        self.expect_connect()
            .once()
            .with(mockall::predicate::eq(credentials))
            .return_once(move |_| Ok(transport));
        self
    }
}

#[cfg(feature = "mock")]
impl MockEmailTransport {
    pub fn with_verify(mut self, result: Result<(), EmailError>) -> Self {
        self.expect_verify()
            .once()
            .return_once(move || Box::pin(std::future::ready(result)));
        self
    }

    pub fn with_send(mut self, email: Email, result: Result<(), EmailError>) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
