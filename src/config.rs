//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，部分字段可由环境变量覆盖

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

use crate::models::{Benchmark, DateRange};
use crate::services::iex::{Secret, IEX_BASE_URL};

/// 令牌环境变量
pub const TOKEN_ENV: &str = "IEX_TOKEN";
/// 入站 API Key 环境变量
pub const API_KEY_ENV: &str = "API_KEY";
/// 配置文件查找路径
const CONFIG_PATHS: [&str; 2] = ["config.json", "config/config.json"];

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// 入站 API 配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API Key（为空则不启用认证）
    #[serde(default)]
    pub api_key: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 行情接口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// 接口根地址
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 访问令牌（优先级低于环境变量）
    #[serde(default)]
    pub token: Option<String>,
    /// 令牌文件路径
    #[serde(default = "default_token_file")]
    pub token_file: String,
    /// 请求超时时间（秒），不设置则使用 HTTP 客户端默认值
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// 额外的状态码 → 错误说明
    #[serde(default)]
    pub error_codes: BTreeMap<u16, String>,
}

/// 市场概览配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// 默认日期范围
    #[serde(default)]
    pub range: DateRange,
    /// 悬浮提示是否包含最高价、最低价
    #[serde(default = "default_detailed_tooltips")]
    pub detailed_tooltips: bool,
    /// 对比基准，必须是三个
    #[serde(default = "default_benchmarks")]
    pub benchmarks: Vec<Benchmark>,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// API 配置
    #[serde(default)]
    pub api: ApiConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
    /// 行情接口配置
    #[serde(default)]
    pub provider: ProviderConfig,
    /// 市场概览配置
    #[serde(default)]
    pub market: MarketConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_log_level() -> String { "info".to_string() }
fn default_base_url() -> String { IEX_BASE_URL.to_string() }
fn default_token_file() -> String { "token.txt".to_string() }
fn default_detailed_tooltips() -> bool { true }

fn default_benchmarks() -> Vec<Benchmark> {
    vec![
        Benchmark::new("S&P 500", "spy", "#1f77b4"),
        Benchmark::new("Dow Jones", "dia", "#ff7f0e"),
        Benchmark::new("Nasdaq 100", "qqq", "#2ca02c"),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            token_file: default_token_file(),
            timeout_secs: None,
            error_codes: BTreeMap::new(),
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            range: DateRange::default(),
            detailed_tooltips: default_detailed_tooltips(),
            benchmarks: default_benchmarks(),
        }
    }
}

impl ProviderConfig {
    /// 解析访问令牌
    ///
    /// 依次读取环境变量 `IEX_TOKEN`、配置中的 `token`、`token_file` 指向的文件
    pub fn resolve_token(&self) -> anyhow::Result<Secret> {
        if let Ok(token) = env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                return Ok(Secret::new(token.trim()));
            }
        }
        self.resolve_token_without_env()
    }

    fn resolve_token_without_env(&self) -> anyhow::Result<Secret> {
        if let Some(token) = self.token.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            return Ok(Secret::new(token));
        }

        let content = fs::read_to_string(&self.token_file)
            .with_context(|| format!("读取令牌文件 {} 失败", self.token_file))?;
        let token = content.trim();
        if token.is_empty() {
            return Err(anyhow!("令牌文件 {} 为空", self.token_file));
        }
        Ok(Secret::new(token))
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 加载配置：依次查找默认路径，再应用 `API_KEY` 环境变量
    ///
    /// 返回配置和实际读取的文件（未找到时为 `None`）
    pub fn load() -> anyhow::Result<(Self, Option<PathBuf>)> {
        let (mut config, source) = Self::load_from(&CONFIG_PATHS[..])?;
        if let Ok(api_key) = env::var(API_KEY_ENV) {
            config.api.api_key = api_key;
        }
        Ok((config, source))
    }

    /// 按顺序查找配置文件，使用第一个存在的文件
    ///
    /// 文件存在但无法解析或校验失败时返回错误，不回退到默认值；
    /// 所有路径都不存在时使用默认配置
    pub fn load_from<P: AsRef<Path>>(paths: &[P]) -> anyhow::Result<(Self, Option<PathBuf>)> {
        for path in paths {
            let path = path.as_ref();
            if path.exists() {
                let config = Self::from_file(path)
                    .with_context(|| format!("加载配置文件 {} 失败", path.display()))?;
                return Ok((config, Some(path.to_path_buf())));
            }
        }
        Ok((Self::default(), None))
    }

    /// 校验配置
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.market.benchmarks.len() != 3 {
            return Err(anyhow!(
                "market.benchmarks 需要 3 个基准，当前 {} 个",
                self.market.benchmarks.len()
            ));
        }
        Ok(())
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
