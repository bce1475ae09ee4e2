//! 确认邮件投递服务
//!
//! 通过 HTTP 中继 API 投递预订确认邮件 (JSON POST + Bearer token)。
//! `MAIL_ENABLED=false` (默认) 时渲染后的邮件只写入日志，便于开发
//! 环境不配置中继也能看到完整内容。
//!
//! 投递失败不回滚预订：预订在投递前已落库，失败只记录日志。

use serde::Serialize;

use crate::core::MailConfig;
use crate::db::models::Booking;
use crate::utils::{AppError, AppResult};

/// 渲染后的待投递邮件
#[derive(Debug, Clone, Serialize)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// 确认邮件投递服务
#[derive(Debug, Clone)]
pub struct MailerService {
    client: reqwest::Client,
    config: MailConfig,
}

impl MailerService {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// 渲染预订确认邮件 (纯函数)
    pub fn render_confirmation(&self, booking: &Booking) -> MailMessage {
        let special = booking
            .special_requests
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("None");

        let text = format!(
            "Hi {name},\n\n\
             Your booking for {party} on {date} at {time} has been received.\n\
             Booking reference: {reference}\n\n\
             Special requests: {special}\n\n\
             Cheers! 🍻",
            name = booking.name,
            party = booking.party_size,
            date = booking.date,
            time = booking.time,
            reference = booking.reference,
            special = special,
        );

        MailMessage {
            from: format!("\"{}\" <{}>", self.config.from_name, self.config.from_address),
            to: booking.email.clone(),
            subject: format!("Your booking confirmation ({})", booking.reference),
            text,
        }
    }

    /// 投递预订确认邮件
    pub async fn send_booking_confirmation(&self, booking: &Booking) -> AppResult<()> {
        let message = self.render_confirmation(booking);

        if !self.config.enabled {
            tracing::info!(
                to = %message.to,
                subject = %message.subject,
                "Mail delivery disabled; rendered message:\n{}",
                message.text
            );
            return Ok(());
        }

        self.deliver(&message).await
    }

    /// POST 到邮件中继 API
    async fn deliver(&self, message: &MailMessage) -> AppResult<()> {
        if self.config.relay_url.is_empty() {
            return Err(AppError::with_message(
                crate::utils::ErrorCode::MailDeliveryFailed,
                "MAIL_RELAY_URL is not configured",
            ));
        }

        let response = self
            .client
            .post(&self.config.relay_url)
            .bearer_auth(&self.config.api_token)
            .json(message)
            .send()
            .await
            .map_err(|e| {
                AppError::with_message(
                    crate::utils::ErrorCode::MailDeliveryFailed,
                    format!("Mail relay request failed: {e}"),
                )
            })?;

        if !response.status().is_success() {
            return Err(AppError::with_message(
                crate::utils::ErrorCode::MailDeliveryFailed,
                format!("Mail relay returned {}", response.status()),
            ));
        }

        tracing::info!(to = %message.to, "Confirmation email delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking() -> Booking {
        Booking {
            id: None,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            date: "2025-10-03".into(),
            time: "12:00".into(),
            party_size: 4,
            special_requests: Some("window seat".into()),
            arrived: false,
            reference: "BK-3FA9C12B".into(),
            created_at: 0,
        }
    }

    fn mailer() -> MailerService {
        MailerService::new(MailConfig::default())
    }

    #[test]
    fn test_render_includes_booking_facts() {
        let message = mailer().render_confirmation(&booking());
        assert_eq!(message.to, "ada@example.com");
        assert!(message.subject.contains("BK-3FA9C12B"));
        assert!(message.text.contains("Hi Ada"));
        assert!(message.text.contains("for 4 on 2025-10-03 at 12:00"));
        assert!(message.text.contains("window seat"));
    }

    #[test]
    fn test_render_defaults_special_requests_to_none() {
        let mut b = booking();
        b.special_requests = None;
        let message = mailer().render_confirmation(&b);
        assert!(message.text.contains("Special requests: None"));

        b.special_requests = Some("   ".into());
        let message = mailer().render_confirmation(&b);
        assert!(message.text.contains("Special requests: None"));
    }

    #[tokio::test]
    async fn test_disabled_mailer_never_fails() {
        assert!(
            mailer()
                .send_booking_confirmation(&booking())
                .await
                .is_ok()
        );
    }
}
