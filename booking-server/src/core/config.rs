use std::path::PathBuf;

use crate::auth::JwtConfig;

/// 服务器配置 - 预订后端的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/snug | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | BOOKING_CAPACITY_PER_SLOT | 24 | 单个时段的最大合计人数 |
/// | BOOKING_SLOT_MINUTES | 15 | 时段粒度(分钟) |
/// | BOOKING_DURATION_MINUTES | 180 | 单个预订占用时长(分钟) |
/// | BOOKING_OPENS | 11:00 | 首个可预订时段 |
/// | BOOKING_LAST_SEATING | 21:00 | 最后可预订时段 |
/// | MAIL_ENABLED | false | 是否实际投递确认邮件 |
/// | MAIL_RELAY_URL | (空) | 邮件中继 HTTP API 地址 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/snug HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 容量准入策略
    pub booking: BookingPolicy,
    /// 确认邮件投递配置
    pub mail: MailConfig,
}

/// 容量准入策略 - 进程启动时固定，不提供运行时修改接口
///
/// 这些值共同决定时段网格与准入判定：
///
/// | 字段 | 效果 |
/// |------|------|
/// | capacity_per_slot | 任一时段允许的最大合计人数；超出即拒绝 |
/// | slot_minutes | 网格粒度；网格标签按此间隔生成 |
/// | duration_minutes | 一个预订占用网格的时长 |
/// | opens / last_seating | 网格首末标签 (含端点) |
///
/// 派生值 `slots_per_booking = duration_minutes / slot_minutes`：
/// 一个预订从其起始时段起连续占用的时段数 (默认 180/15 = 12)。
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    /// 单个时段允许的最大合计人数
    pub capacity_per_slot: u32,
    /// 时段粒度 (分钟)
    pub slot_minutes: u32,
    /// 单个预订占用网格的时长 (分钟)
    pub duration_minutes: u32,
    /// 首个可预订时段标签 "HH:MM"
    pub opens: String,
    /// 最后可预订时段标签 "HH:MM" (含端点)
    pub last_seating: String,
}

impl BookingPolicy {
    /// 一个预订连续占用的时段数
    pub fn slots_per_booking(&self) -> usize {
        (self.duration_minutes / self.slot_minutes) as usize
    }
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            capacity_per_slot: 24,
            slot_minutes: 15,
            duration_minutes: 180,
            opens: "11:00".to_string(),
            last_seating: "21:00".to_string(),
        }
    }
}

/// 确认邮件投递配置
///
/// 邮件通过 HTTP 中继 API 投递 (JSON POST)。`enabled = false` 时
/// 渲染后的邮件只写入日志，不实际发送。
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// 是否实际投递
    pub enabled: bool,
    /// 中继 API 地址
    pub relay_url: String,
    /// 中继 API Bearer token
    pub api_token: String,
    /// 发件人显示名
    pub from_name: String,
    /// 发件人地址
    pub from_address: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            relay_url: String::new(),
            api_token: String::new(),
            from_name: "Snug Booking".to_string(),
            from_address: "bookings@localhost".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let booking_defaults = BookingPolicy::default();
        let mail_defaults = MailConfig::default();

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/snug".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),

            booking: BookingPolicy {
                capacity_per_slot: std::env::var("BOOKING_CAPACITY_PER_SLOT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(booking_defaults.capacity_per_slot),
                slot_minutes: std::env::var("BOOKING_SLOT_MINUTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(booking_defaults.slot_minutes),
                duration_minutes: std::env::var("BOOKING_DURATION_MINUTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(booking_defaults.duration_minutes),
                opens: std::env::var("BOOKING_OPENS").unwrap_or(booking_defaults.opens),
                last_seating: std::env::var("BOOKING_LAST_SEATING")
                    .unwrap_or(booking_defaults.last_seating),
            },

            mail: MailConfig {
                enabled: std::env::var("MAIL_ENABLED")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(mail_defaults.enabled),
                relay_url: std::env::var("MAIL_RELAY_URL").unwrap_or(mail_defaults.relay_url),
                api_token: std::env::var("MAIL_API_TOKEN").unwrap_or(mail_defaults.api_token),
                from_name: std::env::var("MAIL_FROM_NAME").unwrap_or(mail_defaults.from_name),
                from_address: std::env::var("MAIL_FROM").unwrap_or(mail_defaults.from_address),
            },
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        Ok(())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_matches_service_window() {
        let policy = BookingPolicy::default();
        assert_eq!(policy.capacity_per_slot, 24);
        assert_eq!(policy.slots_per_booking(), 12);
        assert_eq!(policy.opens, "11:00");
        assert_eq!(policy.last_seating, "21:00");
    }
}
