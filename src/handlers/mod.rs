pub mod auth;
pub mod samples;
pub mod system;
pub mod work_items;

use std::sync::Arc;

use crate::{
    auth::jwt::JwtConfig,
    config::Config,
    database::Database,
    error::{AppError, AppResult},
    services::{
        AccountService, SampleHookChain, SampleService, UserHookChain, WorkItemService,
    },
};

pub use auth::{current_user, login, register};
pub use samples::{
    create_sample, delete_sample, get_sample, get_sample_audit_logs, list_samples, update_sample,
};
pub use system::{db_health_check, health_check};
pub use work_items::{
    create_work_item, delete_work_item, get_work_item, list_work_items, update_work_item,
};

/// 应用状态
#[derive(Debug, Clone)]
pub struct AppState {
    pub database: Option<Database>,
    pub config: Config,
    pub jwt: JwtConfig,
    pub sample_hooks: Arc<SampleHookChain>,
    pub user_hooks: Arc<UserHookChain>,
}

impl AppState {
    /// 使用默认钩子链创建应用状态
    pub fn new(database: Option<Database>, config: Config) -> Self {
        Self::with_hooks(
            database,
            SampleHookChain::with_defaults(),
            UserHookChain::with_defaults(&config.notification),
            config,
        )
    }

    pub fn with_hooks(
        database: Option<Database>,
        sample_hooks: SampleHookChain,
        user_hooks: UserHookChain,
        config: Config,
    ) -> Self {
        Self {
            database,
            jwt: JwtConfig::from(&config.auth),
            config,
            sample_hooks: Arc::new(sample_hooks),
            user_hooks: Arc::new(user_hooks),
        }
    }

    fn database(&self) -> AppResult<&Database> {
        self.database
            .as_ref()
            .ok_or_else(|| AppError::service_unavailable("数据库服务不可用"))
    }

    pub fn account_service(&self) -> AppResult<AccountService> {
        Ok(AccountService::new(
            self.database()?.clone(),
            self.jwt.clone(),
            self.config.auth.min_password_length,
            self.user_hooks.clone(),
        ))
    }

    pub fn sample_service(&self) -> AppResult<SampleService> {
        Ok(SampleService::new(
            self.database()?.clone(),
            self.sample_hooks.clone(),
        ))
    }

    pub fn work_item_service(&self) -> AppResult<WorkItemService> {
        Ok(WorkItemService::new(self.database()?.clone()))
    }
}
