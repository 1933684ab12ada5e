/*
 * Limsly - Laboratory Sample Tracking Backend
 * Copyright (c) 2024 Limsly Project
 *
 * This work is licensed under CC BY-NC-SA 4.0
 * https://creativecommons.org/licenses/by-nc-sa/4.0/
 */

use limsly_backend::{
    config::Config, database::Database, error::AppResult, handlers::AppState,
    routes::create_app,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> AppResult<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "limsly_backend=debug,limsly=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置（文件缺失时写出默认配置，其余错误终止启动）
    let config = Config::load_or_init("config.toml")?;
    let config = config.with_env_overrides()?;

    tracing::info!("服务器配置: {}", config.server_addr());

    // 初始化数据库（如果连接失败则继续启动，但记录警告）
    let database = match Database::new(&config.database).await {
        Ok(db) => {
            // 验证数据库连接和版本
            if let Err(e) = db.verify_connection().await {
                tracing::warn!("数据库验证失败: {}", e);
            }
            db.migrate().await?;
            Some(db)
        }
        Err(e) => {
            tracing::warn!("数据库连接失败，服务将在无数据库模式下启动: {}", e);
            None
        }
    };

    if config.notification.signup_notice_enabled {
        tracing::info!(
            "新用户注册通知已启用，收件人数量: {}",
            config.notification.recipients.len()
        );
    }

    // 创建应用状态
    let app_state = AppState::new(database.clone(), config.clone());
    tracing::debug!(
        sample_hooks = ?app_state.sample_hooks,
        user_hooks = ?app_state.user_hooks,
        "写入后钩子已注册"
    );

    let app = create_app(app_state);

    // 启动服务器
    let listener = tokio::net::TcpListener::bind(&config.server_addr()).await?;
    tracing::info!("服务器启动成功，监听地址: {}", config.server_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = database {
        db.close().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("监听退出信号失败: {}", e);
    }
    tracing::info!("收到退出信号，正在关闭服务...");
}
