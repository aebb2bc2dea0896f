use std::future::Future;

use folio_models::contact::ContactSubmission;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Forward a contact form submission to the site owner's mailbox.
    fn send_message(
        &self,
        submission: ContactSubmission,
    ) -> impl Future<Output = Result<(), ContactSendMessageError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactSendMessageError {
    #[error("The mail account is not configured.")]
    Configuration,
    #[error("The smtp transport could not be verified.")]
    Verification,
    #[error("The smtp server rejected the credentials.")]
    Authentication,
    #[error("Failed to reach the smtp server.")]
    Network,
    #[error("Failed to send message.")]
    Send,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_send_message(
        mut self,
        submission: ContactSubmission,
        result: Result<(), ContactSendMessageError>,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
