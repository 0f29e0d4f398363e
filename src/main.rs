//! 股票日线图表后端服务
//!
//! 从 IEX Cloud 获取日 K 线，转换成均价线 + 高低区间带的图表数据，
//! 并提供三大指数代理的市场概览对比图

mod config;     // 配置加载
mod error;      // 错误类型
mod handlers;   // HTTP 请求处理器
mod middleware; // 中间件
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务
mod state;      // 共享应用状态

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use env_logger::Env;

use crate::config::AppConfig;
use crate::middleware::ApiKeyMiddleware;
use crate::services::iex::IexClient;
use crate::services::render::EmbedRenderer;
use crate::state::AppState;

/// 应用程序入口
///
/// 加载配置、解析访问令牌后启动 HTTP 服务器
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let loaded = AppConfig::load();

    // 初始化日志系统，RUST_LOG 优先于配置文件；配置加载失败时按 info 输出错误
    let level = loaded.as_ref().map_or("info", |(config, _)| config.log.level.as_str());
    env_logger::init_from_env(Env::default().default_filter_or(level));

    let (config, source) = loaded.map_err(|e| {
        log::error!("{:#}", e);
        e
    })?;
    match source {
        Some(path) => log::info!("从 {} 加载配置成功", path.display()),
        None => log::info!("未找到配置文件，使用默认配置"),
    }

    let token = config.provider.resolve_token().context("未找到 IEX 访问令牌")?;
    let client = IexClient::from_config(&config.provider, token)?;
    let state = web::Data::new(AppState::new(
        Arc::new(client),
        Arc::new(EmbedRenderer::new()),
        &config.market,
    )?);

    let api_key = config.api.api_key.clone();
    if !ApiKeyMiddleware::new(api_key.clone()).is_enabled() {
        log::warn!("未设置 API_KEY，接口不启用认证");
    }

    let bind_addr = config.bind_addr();
    log::info!("启动图表服务，监听 {}", bind_addr);

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(ApiKeyMiddleware::new(api_key.clone()))  // API Key 认证
            .wrap(Logger::default())  // 添加请求日志中间件
            .configure(handlers::config)  // 配置路由
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_addr)?.run().await?;
    Ok(())
}
