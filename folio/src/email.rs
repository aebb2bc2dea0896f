use folio_config::EmailConfig;
use folio_email_contracts::EmailCredentials;
use folio_email_impl::{EmailServiceConfig, EmailServiceImpl, SmtpEndpoint};

/// Build the email service for the configured smtp server.
///
/// `smtp_url` takes precedence over the relay profile.
pub fn service(config: &EmailConfig) -> EmailServiceImpl {
    let endpoint = match &config.smtp_url {
        Some(url) => SmtpEndpoint::Url(url.clone()),
        None => SmtpEndpoint::Relay {
            host: config.relay.clone(),
            port: config.port,
        },
    };

    EmailServiceImpl::new(EmailServiceConfig {
        endpoint,
        timeout: config.timeout.map(Into::into),
    })
}

/// The configured mail account, `None` if the user or the password is missing
/// or empty.
pub fn credentials(config: &EmailConfig) -> Option<EmailCredentials> {
    let user = config.user.as_deref().filter(|x| !x.is_empty())?;
    let password = config.password.as_deref().filter(|x| !x.is_empty())?;

    Some(EmailCredentials {
        user: user.into(),
        password: password.clone().into(),
    })
}
