use std::sync::Arc;

use folio_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use folio_di::Build;
use folio_email_contracts::{
    Email, EmailBody, EmailCredentials, EmailError, EmailService, EmailTransport,
};
use folio_models::{contact::ContactSubmission, email_address::EmailAddressWithName};
use folio_shared_contracts::time::TimeService;
use folio_templates_contracts::{
    ContactMessage, ContactMessageHtmlTemplate, ContactMessageTextTemplate, TemplateService,
};
use folio_utils::trace_instrument;
use tracing::{error, warn};

const SENT_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Debug, Clone, Build)]
pub struct ContactFeatureServiceImpl<Time, Email, Template> {
    time: Time,
    email: Email,
    template: Template,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// The site owner's mail account. Messages are sent from and to this
    /// account. `None` if the account is not fully configured.
    pub credentials: Option<Arc<EmailCredentials>>,
}

impl<Time, EmailS, Template> ContactFeatureService
    for ContactFeatureServiceImpl<Time, EmailS, Template>
where
    Time: TimeService,
    EmailS: EmailService,
    Template: TemplateService,
{
    #[trace_instrument]
    async fn send_message(
        &self,
        submission: ContactSubmission,
    ) -> Result<(), ContactSendMessageError> {
        let Some(credentials) = self.config.credentials.as_deref() else {
            error!("Mail account is not configured");
            return Err(ContactSendMessageError::Configuration);
        };

        let owner = credentials
            .user
            .parse::<EmailAddressWithName>()
            .map_err(|err| {
                error!("Mail account user is not a valid email address: {err}");
                ContactSendMessageError::Configuration
            })?;

        let transport = self.email.connect(credentials).map_err(|err| {
            error!("Failed to create smtp transport: {err:#}");
            ContactSendMessageError::Verification
        })?;

        transport.verify().await.map_err(|err| {
            error!("Smtp transport verification failed: {err:#}");
            ContactSendMessageError::Verification
        })?;

        let email = self.compose(owner, submission)?;

        transport.send(email).await.map_err(|err| {
            error!("Failed to send contact message: {err:#}");
            match err {
                EmailError::Authentication(_) => ContactSendMessageError::Authentication,
                EmailError::Network(_) => ContactSendMessageError::Network,
                EmailError::Other(_) => ContactSendMessageError::Send,
            }
        })
    }
}

impl<Time, EmailS, Template> ContactFeatureServiceImpl<Time, EmailS, Template>
where
    Time: TimeService,
    EmailS: EmailService,
    Template: TemplateService,
{
    fn compose(
        &self,
        owner: EmailAddressWithName,
        submission: ContactSubmission,
    ) -> anyhow::Result<Email> {
        // The address is part of both bodies, so a message without reply-to
        // still reaches the owner.
        let reply_to = submission
            .email
            .parse::<EmailAddressWithName>()
            .inspect_err(|err| warn!("Sending without reply-to, invalid mailbox: {err}"))
            .ok();

        let message = ContactMessage {
            name: submission.name.into_inner(),
            email: submission.email.into_inner(),
            message: submission.message.into_inner(),
            sent_at: self.time.now().format(SENT_AT_FORMAT).to_string(),
        };

        let subject = format!("New Contact Form Message from {}", message.name);
        let text = self
            .template
            .render(&ContactMessageTextTemplate(message.clone()))?;
        let html = self.template.render(&ContactMessageHtmlTemplate(message))?;

        Ok(Email {
            from: owner.clone(),
            recipient: owner,
            subject,
            body: EmailBody::Alternative { text, html },
            reply_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use chrono::{DateTime, Utc};
    use folio_email_contracts::{MockEmailService, MockEmailTransport};
    use folio_shared_contracts::time::MockTimeService;
    use folio_templates_contracts::MockTemplateService;
    use folio_utils::assert_matches;

    use super::*;

    type Sut = ContactFeatureServiceImpl<MockTimeService, MockEmailService, MockTemplateService>;

    #[tokio::test]
    async fn ok() {
        // Arrange
        let transport = MockEmailTransport::new()
            .with_verify(Ok(()))
            .with_send(expected_email(), Ok(()));

        let sut = Sut {
            time: MockTimeService::new().with_now(now()),
            email: MockEmailService::new().with_connect(credentials(), transport),
            template: expect_render(MockTemplateService::new()),
            config: config(),
        };

        // Act
        let result = sut.send_message(submission()).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn ok_without_reply_to() {
        for address in ["a,b@example.com", "a;b@example.com", "a[b]@example.com"] {
            // Arrange
            let transport = MockEmailTransport::new().with_verify(Ok(())).with_send(
                Email {
                    reply_to: None,
                    ..expected_email_from(address)
                },
                Ok(()),
            );

            let sut = Sut {
                time: MockTimeService::new().with_now(now()),
                email: MockEmailService::new().with_connect(credentials(), transport),
                template: expect_render_from(MockTemplateService::new(), address),
                config: config(),
            };

            // Act
            let result = sut.send_message(submission_from(address)).await;

            // Assert
            result.unwrap();
        }
    }

    #[tokio::test]
    async fn not_configured() {
        // Arrange
        let sut = Sut {
            time: MockTimeService::new(),
            email: MockEmailService::new(),
            template: MockTemplateService::new(),
            config: ContactFeatureConfig { credentials: None },
        };

        // Act
        let result = sut.send_message(submission()).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Configuration));
    }

    #[tokio::test]
    async fn invalid_account_user() {
        // Arrange
        let sut = Sut {
            time: MockTimeService::new(),
            email: MockEmailService::new(),
            template: MockTemplateService::new(),
            config: ContactFeatureConfig {
                credentials: Some(
                    EmailCredentials {
                        user: "not an email address".into(),
                        password: "hunter2".to_owned().into(),
                    }
                    .into(),
                ),
            },
        };

        // Act
        let result = sut.send_message(submission()).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Configuration));
    }

    #[tokio::test]
    async fn connect_failed() {
        // Arrange
        let mut email = MockEmailService::new();
        email
            .expect_connect()
            .once()
            .return_once(|_| Err(anyhow!("invalid relay")));

        let sut = Sut {
            time: MockTimeService::new(),
            email,
            template: MockTemplateService::new(),
            config: config(),
        };

        // Act
        let result = sut.send_message(submission()).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Verification));
    }

    #[tokio::test]
    async fn verification_failed() {
        // Arrange
        let transport = MockEmailTransport::new().with_verify(Err(EmailError::Authentication(
            anyhow!("535 5.7.8 Username and Password not accepted"),
        )));

        let sut = Sut {
            time: MockTimeService::new(),
            email: MockEmailService::new().with_connect(credentials(), transport),
            template: MockTemplateService::new(),
            config: config(),
        };

        // Act
        let result = sut.send_message(submission()).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Verification));
    }

    #[tokio::test]
    async fn send_failed() {
        for (error, expected) in [
            (
                EmailError::Authentication(anyhow!("Invalid login")),
                "Authentication",
            ),
            (EmailError::Network(anyhow!("connection reset")), "Network"),
            (EmailError::Other(anyhow!("mailbox unavailable")), "Send"),
        ] {
            // Arrange
            let transport = MockEmailTransport::new()
                .with_verify(Ok(()))
                .with_send(expected_email(), Err(error));

            let sut = Sut {
                time: MockTimeService::new().with_now(now()),
                email: MockEmailService::new().with_connect(credentials(), transport),
                template: expect_render(MockTemplateService::new()),
                config: config(),
            };

            // Act
            let result = sut.send_message(submission()).await;

            // Assert
            match (result, expected) {
                (Err(ContactSendMessageError::Authentication), "Authentication")
                | (Err(ContactSendMessageError::Network), "Network")
                | (Err(ContactSendMessageError::Send), "Send") => {}
                (result, expected) => panic!("expected {expected}, got {result:?}"),
            }
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_790_000_000, 0).unwrap()
    }

    fn credentials() -> EmailCredentials {
        EmailCredentials {
            user: "owner@example.com".into(),
            password: "hunter2".to_owned().into(),
        }
    }

    fn config() -> ContactFeatureConfig {
        ContactFeatureConfig {
            credentials: Some(credentials().into()),
        }
    }

    const ADDRESS: &str = "ada@example.com";

    fn submission() -> ContactSubmission {
        submission_from(ADDRESS)
    }

    fn submission_from(address: &str) -> ContactSubmission {
        ContactSubmission {
            name: "Ada".to_owned().try_into().unwrap(),
            email: address.to_owned().try_into().unwrap(),
            message: "Hello\nWorld".to_owned().try_into().unwrap(),
        }
    }

    fn contact_message(address: &str) -> ContactMessage {
        ContactMessage {
            name: "Ada".into(),
            email: address.into(),
            message: "Hello\nWorld".into(),
            sent_at: now().format(SENT_AT_FORMAT).to_string(),
        }
    }

    fn expect_render(template: MockTemplateService) -> MockTemplateService {
        expect_render_from(template, ADDRESS)
    }

    fn expect_render_from(template: MockTemplateService, address: &str) -> MockTemplateService {
        template
            .with_render(
                ContactMessageTextTemplate(contact_message(address)),
                "rendered text".into(),
            )
            .with_render(
                ContactMessageHtmlTemplate(contact_message(address)),
                "rendered html".into(),
            )
    }

    fn expected_email() -> Email {
        expected_email_from(ADDRESS)
    }

    fn expected_email_from(address: &str) -> Email {
        Email {
            from: "owner@example.com".parse().unwrap(),
            recipient: "owner@example.com".parse().unwrap(),
            subject: "New Contact Form Message from Ada".into(),
            body: EmailBody::Alternative {
                text: "rendered text".into(),
                html: "rendered html".into(),
            },
            reply_to: address.parse().ok(),
        }
    }
}
