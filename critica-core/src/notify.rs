//! Outbound notification port.
//!
//! Delivery is fire-and-forget: a failed send is logged and swallowed, never
//! surfaced to the caller. Signup therefore succeeds even when the mail
//! collaborator is down; the user can re-post signup to get a fresh code.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotifyError>;
}

/// Default notifier: writes the message to the log. Stands in for an SMTP
/// relay in development and tests.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        info!(recipient, subject, body, "outbound notification");
        Ok(())
    }
}

/// Send a confirmation code, swallowing delivery failures.
pub async fn send_confirmation(notifier: &dyn Notifier, recipient: &str, code: &str) {
    let body = format!("Your confirmation code: {code}");
    if let Err(err) = notifier.send(recipient, "Welcome to Critica", &body).await {
        warn!(recipient, error = %err, "confirmation delivery failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivery_failure_is_swallowed() {
        let mut mock = MockNotifier::new();
        mock.expect_send()
            .times(1)
            .returning(|_, _, _| Err(NotifyError("smtp down".to_string())));

        // Must not panic or propagate
        send_confirmation(&mock, "alice@example.com", "abc123").await;
    }

    #[tokio::test]
    async fn confirmation_body_carries_the_code() {
        let mut mock = MockNotifier::new();
        mock.expect_send()
            .withf(|recipient, _, body| {
                recipient == "alice@example.com" && body.contains("abc123")
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        send_confirmation(&mock, "alice@example.com", "abc123").await;
    }
}
