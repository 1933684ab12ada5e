//! 新用户注册通知
//!
//! 通知以结构化日志事件输出到 `limsly::notify` 目标，由日志管道负责转发。

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgConnection;

use crate::config::NotificationConfig;
use crate::error::AppResult;
use crate::models::User;
use crate::services::hooks::UserHook;

/// 通知日志目标
pub const NOTIFY_TARGET: &str = "limsly::notify";

/// 注册通知内容
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignupNotice {
    pub from: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// 新用户注册通知钩子，通知失败不影响注册
#[derive(Debug, Clone)]
pub struct SignupNotifier {
    config: NotificationConfig,
}

impl SignupNotifier {
    pub fn new(config: NotificationConfig) -> Self {
        Self { config }
    }

    /// 生成通知；未启用或无收件人时为 None
    pub fn compose(&self, user: &User) -> Option<SignupNotice> {
        if !self.config.signup_notice_enabled || self.config.recipients.is_empty() {
            return None;
        }

        Some(SignupNotice {
            from: self.config.from_address.clone(),
            recipients: self.config.recipients.clone(),
            subject: format!("New Limsly User: {}", user.username),
            body: format!(
                "A new user has registered.\n\nUsername: {}\nEmail: {}",
                user.username, user.email
            ),
        })
    }

    fn deliver(&self, notice: &SignupNotice) -> anyhow::Result<()> {
        let payload = serde_json::to_string(notice)?;
        tracing::info!(
            target: NOTIFY_TARGET,
            subject = %notice.subject,
            recipients = notice.recipients.len(),
            payload = %payload,
            "发送新用户注册通知"
        );
        Ok(())
    }
}

#[async_trait]
impl UserHook for SignupNotifier {
    fn name(&self) -> &'static str {
        "signup_notice"
    }

    async fn on_user_created(&self, _conn: &mut PgConnection, user: &User) -> AppResult<()> {
        let Some(notice) = self.compose(user) else {
            return Ok(());
        };

        if let Err(e) = self.deliver(&notice) {
            tracing::warn!(user_id = %user.id, "注册通知发送失败: {}", e);
        }
        Ok(())
    }
}
