//! 写入后钩子
//!
//! 样本与用户写入后需要执行的副作用以显式、有序的钩子列表表达，
//! 在写入所在的事务中同步执行。任一钩子失败即中止后续钩子，事务随之回滚。

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::config::NotificationConfig;
use crate::error::AppResult;
use crate::models::{Sample, User};
use crate::services::{AuditRecorder, SignupNotifier};

/// 样本写入事件
#[derive(Debug, Clone, Copy)]
pub enum SampleEvent<'a> {
    /// 样本已创建
    Registered { sample: &'a Sample },
    /// 样本已更新，`before` 为锁定后读取的旧值
    Updated {
        before: &'a Sample,
        after: &'a Sample,
    },
}

impl SampleEvent<'_> {
    /// 事件对应的样本（写入后的值）
    pub fn sample(&self) -> &Sample {
        match self {
            SampleEvent::Registered { sample } => sample,
            SampleEvent::Updated { after, .. } => after,
        }
    }
}

/// 样本写入后钩子
#[async_trait]
pub trait SampleHook: Send + Sync {
    /// 钩子名称，用于日志
    fn name(&self) -> &'static str;

    async fn on_sample_event(
        &self,
        conn: &mut PgConnection,
        actor_id: Uuid,
        event: SampleEvent<'_>,
    ) -> AppResult<()>;
}

/// 用户创建后钩子
#[async_trait]
pub trait UserHook: Send + Sync {
    fn name(&self) -> &'static str;

    async fn on_user_created(&self, conn: &mut PgConnection, user: &User) -> AppResult<()>;
}

/// 按注册顺序执行的样本钩子链
#[derive(Default)]
pub struct SampleHookChain {
    hooks: Vec<Arc<dyn SampleHook>>,
}

impl SampleHookChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// 默认钩子链：审计记录
    pub fn with_defaults() -> Self {
        Self::new().register(AuditRecorder)
    }

    /// 追加钩子到链尾
    pub fn register<H: SampleHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.hooks.iter().map(|hook| hook.name()).collect()
    }

    pub async fn run(
        &self,
        conn: &mut PgConnection,
        actor_id: Uuid,
        event: SampleEvent<'_>,
    ) -> AppResult<()> {
        for hook in &self.hooks {
            tracing::debug!(
                hook = hook.name(),
                sample_id = %event.sample().id,
                "执行样本钩子"
            );
            hook.on_sample_event(&mut *conn, actor_id, event).await?;
        }
        Ok(())
    }
}

impl fmt::Debug for SampleHookChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleHookChain")
            .field("hooks", &self.names())
            .finish()
    }
}

/// 按注册顺序执行的用户钩子链
#[derive(Default)]
pub struct UserHookChain {
    hooks: Vec<Arc<dyn UserHook>>,
}

impl UserHookChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// 默认钩子链：新用户注册通知
    pub fn with_defaults(notification: &NotificationConfig) -> Self {
        Self::new().register(SignupNotifier::new(notification.clone()))
    }

    pub fn register<H: UserHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.hooks.iter().map(|hook| hook.name()).collect()
    }

    pub async fn run(&self, conn: &mut PgConnection, user: &User) -> AppResult<()> {
        for hook in &self.hooks {
            tracing::debug!(hook = hook.name(), user_id = %user.id, "执行用户钩子");
            hook.on_user_created(&mut *conn, user).await?;
        }
        Ok(())
    }
}

impl fmt::Debug for UserHookChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserHookChain")
            .field("hooks", &self.names())
            .finish()
    }
}
