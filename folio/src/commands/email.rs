use anyhow::Context;
use clap::Subcommand;
use folio_config::Config;
use folio_email_contracts::{Email, EmailBody, EmailService, EmailTransport};
use folio_models::email_address::EmailAddressWithName;
use tracing::info;

use crate::email;

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test { recipient: EmailAddressWithName },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: EmailAddressWithName) -> anyhow::Result<()> {
    let credentials =
        email::credentials(&config.email).context("Mail account is not configured")?;
    let from = credentials
        .user
        .parse::<EmailAddressWithName>()
        .context("Mail account user is not a valid email address")?;

    let transport = email::service(&config.email).connect(&credentials)?;
    transport
        .verify()
        .await
        .context("Failed to verify smtp transport")?;

    transport
        .send(Email {
            from,
            recipient,
            subject: "Email Deliverability Test".into(),
            body: EmailBody::Text("Email deliverability seems to be working!".into()),
            reply_to: None,
        })
        .await
        .context("Failed to send email")?;

    info!("Test email sent");

    Ok(())
}
