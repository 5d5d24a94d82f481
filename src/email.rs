//! Email notification service using lettre

use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, Message,
    SmtpTransport, Transport,
};
use tracing::info;

use crate::config::EmailConfig;

/// Email service for organizer notifications
#[derive(Clone)]
pub struct EmailService {
    mailer: SmtpTransport,
    from: String,
    organizer_emails: Vec<String>,
    skip_sending: bool,
}

impl EmailService {
    /// Create a new email service from configuration
    pub fn new(config: &EmailConfig) -> anyhow::Result<Self> {
        let mailer = if config.smtp_username.is_empty() || config.smtp_password.is_empty() {
            info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                "SMTP credentials not configured, using unauthenticated connection (e.g., MailDev)"
            );
            SmtpTransport::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        } else {
            info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                from = %config.from_address,
                organizer_count = config.organizer_emails.len(),
                "Email service initialized with authentication and TLS"
            );
            // SmtpTransport::relay() uses STARTTLS, appropriate for port 587
            let creds =
                Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());
            SmtpTransport::relay(&config.smtp_host)?
                .port(config.smtp_port)
                .credentials(creds)
                .build()
        };

        Ok(Self {
            mailer,
            from: config.from_address.clone(),
            organizer_emails: config.organizer_emails.clone(),
            skip_sending: false,
        })
    }

    /// Create a mock email service for testing (skips actual SMTP)
    pub fn new_mock(config: &EmailConfig) -> Self {
        let mailer = SmtpTransport::builder_dangerous("localhost")
            .port(1025)
            .build();

        Self {
            mailer,
            from: config.from_address.clone(),
            organizer_emails: config.organizer_emails.clone(),
            skip_sending: true,
        }
    }

    /// Notify the organizers about a new contact-form submission.
    ///
    /// Blocking SMTP call; run it on the blocking pool from async handlers.
    /// Failures are the caller's to log; a lost notification must never
    /// fail the submission itself.
    pub fn send_contact_notification(
        &self,
        name: &str,
        email: &str,
        subject: &str,
        message: &str,
    ) -> anyhow::Result<()> {
        if self.organizer_emails.is_empty() {
            info!("no organizer emails configured, skipping contact notification");
            return Ok(());
        }

        let body = format!(
            "New contact message\n\nFrom: {name} <{email}>\nSubject: {subject}\n\n{message}\n"
        );

        for recipient in &self.organizer_emails {
            let mail = Message::builder()
                .from(self.from.parse()?)
                .reply_to(email.parse()?)
                .to(recipient.parse()?)
                .subject(format!("[reunionhq] {subject}"))
                .header(ContentType::TEXT_PLAIN)
                .body(body.clone())?;

            if self.skip_sending {
                info!(to = %recipient, "mock email service, skipping send");
                continue;
            }

            self.mailer.send(&mail)?;
            info!(to = %recipient, "contact notification sent");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmailConfig;

    #[test]
    fn test_mock_service_skips_smtp() {
        let config = EmailConfig {
            organizer_emails: vec!["organizer@example.com".to_string()],
            ..EmailConfig::default()
        };
        let service = EmailService::new_mock(&config);

        let result = service.send_contact_notification(
            "Aunt May",
            "may@example.com",
            "Parking",
            "Is there parking at the venue?",
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_no_recipients_is_a_noop() {
        let service = EmailService::new_mock(&EmailConfig::default());
        assert!(service
            .send_contact_notification("A", "a@example.com", "S", "M")
            .is_ok());
    }
}
