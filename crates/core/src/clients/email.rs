use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use reclaim_primitives::error::ApiError;
use reclaim_primitives::models::app_state::SmtpInfo;
use reclaim_primitives::utility::mask_email;
use secrecy::ExposeSecret;
use tracing::{info, warn};

#[derive(Clone)]
pub struct EmailClient {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Option<Mailbox>,
}

impl EmailClient {
    pub fn new(smtp: Option<&SmtpInfo>) -> Result<Self, ApiError> {
        let Some(info) = smtp else {
            warn!("SMTP_HOST not set, outgoing email will be written to the log");
            return Ok(Self::console());
        };

        let builder = if info.smtp_starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&info.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&info.smtp_host)
        };

        let builder = match (&info.smtp_username, &info.smtp_password) {
            (Some(user), Some(password)) => builder.credentials(Credentials::new(
                user.clone(),
                password.expose_secret().to_string(),
            )),
            _ => builder,
        };

        Ok(Self {
            transport: Some(builder.port(info.smtp_port).build()),
            from: Some(info.from_address.parse::<Mailbox>()?),
        })
    }

    /// Logs messages instead of delivering them.
    pub fn console() -> Self {
        Self {
            transport: None,
            from: None,
        }
    }

    pub async fn send_email(&self, to: &str, subject: &str, html: &str) -> Result<(), ApiError> {
        let (Some(transport), Some(from)) = (&self.transport, &self.from) else {
            info!(
                to = %mask_email(to),
                subject,
                body = html,
                "SMTP disabled, email not sent"
            );
            return Ok(());
        };

        let message = Message::builder()
            .from(from.clone())
            .to(to.parse::<Mailbox>()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())?;

        transport.send(message).await?;

        info!(to = %mask_email(to), subject, "Email sent");
        Ok(())
    }
}
