use crate::{config::DatabaseConfig, error::AppResult};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

/// 数据库连接池
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("pool", &"<PgPool>")
            .finish()
    }
}

impl Database {
    /// 创建数据库连接池
    pub async fn new(config: &DatabaseConfig) -> AppResult<Self> {
        tracing::info!("正在连接数据库: {}", mask_database_url(&config.url));

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&config.url)
            .await?;

        // 测试连接
        sqlx::query("SELECT 1").fetch_one(&pool).await?;

        tracing::info!("数据库连接成功，最大连接数: {}", config.max_connections);

        Ok(Self { pool })
    }

    /// 使用已有连接池（测试环境由 sqlx::test 提供）
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 获取连接池引用
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 数据库初始化验证
    pub async fn verify_connection(&self) -> AppResult<()> {
        let version = sqlx::query_scalar::<_, String>("SELECT version()")
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("数据库版本: {}", version);
        Ok(())
    }

    /// 运行 migrations/ 目录下的数据库迁移
    pub async fn migrate(&self) -> AppResult<()> {
        tracing::info!("正在执行数据库迁移...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("数据库迁移完成");
        Ok(())
    }

    /// 检查数据库健康状态
    pub async fn health_check(&self) -> AppResult<bool> {
        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(result == 1)
    }

    /// 关闭数据库连接池
    pub async fn close(&self) {
        tracing::info!("正在关闭数据库连接池...");
        self.pool.close().await;
        tracing::info!("数据库连接池已关闭");
    }
}

/// 隐藏数据库URL中的敏感信息
fn mask_database_url(url: &str) -> String {
    if let (Some(at_pos), Some(protocol_end)) = (url.rfind('@'), url.find("://")) {
        if at_pos <= protocol_end + 3 {
            return url.to_string();
        }
        let auth_part = &url[protocol_end + 3..at_pos];
        if let Some(colon_pos) = auth_part.find(':') {
            let mut masked = url.to_string();
            let password_start = protocol_end + 3 + colon_pos + 1;
            masked.replace_range(password_start..at_pos, "***");
            return masked;
        }
    }
    url.to_string()
}
