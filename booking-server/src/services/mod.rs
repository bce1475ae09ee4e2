//! 服务模块 - 外部协作服务
//!
//! - [`MailerService`] - 预订确认邮件投递

pub mod mailer;

pub use mailer::{MailMessage, MailerService};
