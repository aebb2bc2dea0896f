use std::{error::Error as _, time::Duration};

use anyhow::anyhow;
use folio_email_contracts::{
    Email, EmailBody, EmailCredentials, EmailError, EmailService, EmailTransport,
};
use folio_utils::Apply;
use lettre::{
    message::{header, MessageBuilder, MultiPart},
    transport::smtp::{self, authentication::Credentials, PoolConfig},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// Smtp reply codes that indicate rejected credentials.
const AUTHENTICATION_FAILURE_CODES: &[&str] = &["530", "534", "535"];

/// Transports live for a single request. The pool's cleanup task and any
/// parked connection outlive the transport by at most this long.
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    config: EmailServiceConfig,
}

#[derive(Debug, Clone)]
pub struct EmailServiceConfig {
    pub endpoint: SmtpEndpoint,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmtpEndpoint {
    /// Hosted relay using implicit tls, authenticated with the credentials
    /// passed to [`EmailService::connect`].
    Relay { host: String, port: Option<u16> },
    /// Connection url as understood by lettre, e.g. `smtp://localhost:2525`.
    /// Credentials passed to [`EmailService::connect`] are ignored, put them
    /// into the url if the server needs them.
    Url(String),
}

impl EmailServiceImpl {
    pub fn new(config: EmailServiceConfig) -> Self {
        Self { config }
    }

    #[cfg(feature = "dummy")]
    pub fn dummy() -> Self {
        Self::new(EmailServiceConfig {
            endpoint: SmtpEndpoint::Url("smtp://dummy".into()),
            timeout: None,
        })
    }
}

impl EmailService for EmailServiceImpl {
    type Transport = SmtpEmailTransport;

    fn connect(&self, credentials: &EmailCredentials) -> anyhow::Result<Self::Transport> {
        let builder = match &self.config.endpoint {
            SmtpEndpoint::Relay { host, port } => {
                AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
                    .apply_map(*port, |builder, port| builder.port(port))
                    .credentials(Credentials::new(
                        credentials.user.clone(),
                        (*credentials.password).clone(),
                    ))
            }
            SmtpEndpoint::Url(url) => AsyncSmtpTransport::<Tokio1Executor>::from_url(url)?,
        };

        Ok(SmtpEmailTransport {
            transport: builder
                .timeout(self.config.timeout)
                .pool_config(pool_config())
                .build(),
        })
    }
}

fn pool_config() -> PoolConfig {
    PoolConfig::new()
        .max_size(1)
        .idle_timeout(POOL_IDLE_TIMEOUT)
}

#[derive(Debug, Clone)]
pub struct SmtpEmailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailTransport for SmtpEmailTransport {
    async fn verify(&self) -> Result<(), EmailError> {
        self.transport
            .test_connection()
            .await
            .map_err(classify)?
            .then_some(())
            .ok_or_else(|| anyhow!("Smtp server did not accept the connection").into())
    }

    async fn send(&self, email: Email) -> Result<(), EmailError> {
        let message = build_message(email)?;

        let response = self.transport.send(message).await.map_err(classify)?;
        if !response.is_positive() {
            return Err(anyhow!("Smtp server responded with {}", response.code()).into());
        }

        Ok(())
    }
}

fn build_message(email: Email) -> anyhow::Result<Message> {
    let builder = Message::builder()
        .from(email.from.0)
        .to(email.recipient.0)
        .apply_map(email.reply_to.map(|x| x.0), MessageBuilder::reply_to)
        .subject(email.subject);

    let message = match email.body {
        EmailBody::Text(body) => builder.header(header::ContentType::TEXT_PLAIN).body(body),
        EmailBody::Alternative { text, html } => {
            builder.multipart(MultiPart::alternative_plain_html(text, html))
        }
    }?;

    Ok(message)
}

/// Map a lettre error to an [`EmailError`], preferring the smtp reply code and
/// error kind over the error message.
fn classify(err: smtp::Error) -> EmailError {
    let rejected_credentials = err.status().is_some_and(|code| {
        AUTHENTICATION_FAILURE_CODES.contains(&code.to_string().as_str())
    });
    if rejected_credentials {
        return EmailError::Authentication(err.into());
    }

    let io_failure = std::iter::successors(err.source(), |&err| err.source())
        .any(|source| source.is::<std::io::Error>());
    if err.is_timeout() || err.is_tls() || io_failure {
        return EmailError::Network(err.into());
    }

    classify_by_message(err.into())
}

/// Fallback for errors without a reply code or a recognizable kind.
///
/// This depends on the wording of the underlying error and silently stops
/// matching if that wording changes.
fn classify_by_message(err: anyhow::Error) -> EmailError {
    let message = format!("{err:#}");
    if message.contains("Invalid login") {
        EmailError::Authentication(err)
    } else if message.contains("Network") {
        EmailError::Network(err)
    } else {
        EmailError::Other(err)
    }
}
