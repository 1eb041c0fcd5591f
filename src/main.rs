use std::{net::SocketAddr, sync::Arc};

use rainbow_social::{config::Config, routes, state::AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置
    dotenv::dotenv().ok();
    let config = Config::from_env()?;

    // 初始化日志
    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("rainbow_social=debug,tower_http=debug"));
    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    info!("Starting Rainbow-Social service...");
    info!(
        "Environment: {}, uploads in {}, acting user {}",
        config.environment,
        config.upload_dir.display(),
        config.current_user_id
    );

    // 创建应用状态
    let app_state = Arc::new(AppState::new(config.clone()));
    let app = routes::router(app_state);

    // 启动主服务器
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    info!("Starting server on http://{}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await?;

    Ok(())
}
