//! Outbound candidate notification.
//!
//! The SMTP notifier looks up the selected candidates' addresses and sends
//! the status email one recipient at a time — a failed send is logged and
//! never blocks the remaining recipients.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use sqlx::PgPool;
use std::future::Future;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

const STATUS_SUBJECT: &str = "Congratulations! You're Selected for the Coding Round";

const STATUS_BODY: &str = "Dear Candidate,

Congratulations! Your resume has been shortlisted and you have been selected for the coding round.

Please prepare for the upcoming coding assessment. Further details will be shared soon.

Best regards,
HR Team
";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("message build failed: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("recipient lookup failed: {0}")]
    Lookup(#[from] sqlx::Error),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends the stage status email to each selected candidate of `job_id`.
    /// Fire-and-forget: delivery failures are logged, not returned.
    async fn notify_candidates(&self, job_id: Uuid, user_ids: &[Uuid]);
}

pub struct SmtpNotifier {
    pool: PgPool,
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(
        pool: PgPool,
        host: &str,
        port: u16,
        user: &str,
        pass: &str,
    ) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
            .port(port)
            .credentials(Credentials::new(user.to_string(), pass.to_string()))
            .build();
        let from: Mailbox = user.parse()?;
        Ok(Self {
            pool,
            transport,
            from,
        })
    }

    async fn send_status_email(&self, to: &str) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(STATUS_SUBJECT)
            .body(STATUS_BODY.to_string())?;
        self.transport.send(message).await?;
        Ok(())
    }

    async fn candidate_emails(&self, user_ids: &[Uuid]) -> Result<Vec<(Uuid, String)>, NotifyError> {
        let rows = sqlx::query_as::<_, (Uuid, String)>(
            "SELECT id, email FROM users WHERE id = ANY($1)",
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify_candidates(&self, job_id: Uuid, user_ids: &[Uuid]) {
        let recipients = match self.candidate_emails(user_ids).await {
            Ok(recipients) => recipients,
            Err(e) => {
                error!("Error sending status emails for job {job_id}: {e}");
                return;
            }
        };

        if recipients.len() < user_ids.len() {
            warn!(
                "No email found for {} of {} selected candidates",
                user_ids.len() - recipients.len(),
                user_ids.len()
            );
        }

        let delivered =
            deliver_all(&recipients, |to| async move { self.send_status_email(&to).await }).await;
        info!("Sent {delivered} of {} status emails for job {job_id}", recipients.len());
    }
}

/// Attempts every recipient regardless of earlier failures; returns how many
/// sends succeeded.
pub async fn deliver_all<F, Fut, E>(recipients: &[(Uuid, String)], send: F) -> usize
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    let mut delivered = 0;
    for (user_id, email) in recipients {
        match send(email.clone()).await {
            Ok(()) => {
                delivered += 1;
                info!("Sent status email to {email}");
            }
            Err(e) => warn!("Failed to send status email to user {user_id}: {e}"),
        }
    }
    delivered
}
