//! IEX Cloud 行情接口实现
//!
//! 对接 `GET {base_url}/stock/{ticker}/chart/{range}?token=<token>`，
//! 返回按日期排列的单日 K 线数组。

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::config::ProviderConfig;
use crate::error::ChartError;
use crate::models::{DailyBar, DateRange, Ticker};

/// IEX Cloud 默认地址
pub const IEX_BASE_URL: &str = "https://cloud.iexapis.com/stable";

/// 历史 K 线数据源
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// 获取指定股票、指定范围内的日 K 线
    ///
    /// 股票代码先校验，校验失败时不发起网络请求
    async fn fetch_series(&self, ticker: &str, range: &DateRange) -> Result<Vec<DailyBar>, ChartError>;
}

/// API 访问令牌，Debug 输出时隐藏内容
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// 行情 API 状态码 → 错误说明
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorCodeTable {
    entries: BTreeMap<u16, String>,
}

impl Default for ErrorCodeTable {
    fn default() -> Self {
        let entries = [
            (400, "INVALID REQUEST"),
            (401, "INVALID API TOKEN"),
            (402, "EXCEEDED API CALLS"),
            (403, "PERMISSION DENIED"),
            (404, "INVALID TICKER"),
            (429, "EXCEEDED API CALLS"),
        ]
        .into_iter()
        .map(|(code, message)| (code, message.to_string()))
        .collect();

        Self { entries }
    }
}

impl ErrorCodeTable {
    /// 在默认表基础上追加或覆盖条目
    pub fn with_overrides(overrides: &BTreeMap<u16, String>) -> Self {
        let mut table = Self::default();
        for (code, message) in overrides {
            table.entries.insert(*code, message.clone());
        }
        table
    }

    pub fn message(&self, code: u16) -> Option<&str> {
        self.entries.get(&code).map(String::as_str)
    }

    /// 把失败的状态码归类为已知或未知的行情错误
    pub fn classify(&self, code: u16) -> ChartError {
        match self.message(code) {
            Some(message) => ChartError::Provider {
                code,
                message: message.to_string(),
            },
            None => ChartError::UnknownProvider { code },
        }
    }
}

/// IEX Cloud 行情客户端
///
/// 令牌和错误码表在构造时传入，客户端本身无可变状态
pub struct IexClient {
    /// HTTP 客户端
    client: Client,
    /// 接口根地址
    base_url: Url,
    token: Secret,
    errors: ErrorCodeTable,
}

impl IexClient {
    pub fn new(
        base_url: &str,
        token: Secret,
        errors: ErrorCodeTable,
        timeout: Option<Duration>,
    ) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url).with_context(|| format!("无效的行情接口地址: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("行情接口地址不能作为根路径: {}", base_url));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("创建 HTTP 客户端失败")?;

        Ok(Self {
            client,
            base_url,
            token,
            errors,
        })
    }

    /// 根据配置创建客户端，令牌需已解析
    pub fn from_config(config: &ProviderConfig, token: Secret) -> anyhow::Result<Self> {
        Self::new(
            &config.base_url,
            token,
            ErrorCodeTable::with_overrides(&config.error_codes),
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    /// 拼接不含令牌的请求地址
    pub fn chart_url(&self, ticker: &Ticker, range: &DateRange) -> Result<Url, ChartError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ChartError::Transport("行情接口地址无效".to_string()))?;
            segments.pop_if_empty();
            segments.push("stock").push(ticker.as_str()).push("chart");
            segments.extend(range.segments());
        }
        Ok(url)
    }

    /// 附加令牌，结果不得写入日志
    fn authorize(&self, mut url: Url) -> Url {
        url.query_pairs_mut().append_pair("token", self.token.expose());
        url
    }
}

#[async_trait]
impl QuoteSource for IexClient {
    async fn fetch_series(&self, ticker: &str, range: &DateRange) -> Result<Vec<DailyBar>, ChartError> {
        let ticker = Ticker::parse(ticker)?;

        let url = self.chart_url(&ticker, range)?;
        log::info!("📡 请求日K线数据 URL: {}", url);

        let response = self.client.get(self.authorize(url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            let err = self.errors.classify(status.as_u16());
            log::warn!("获取 {} 历史数据失败: {}", ticker, err);
            return Err(err);
        }

        let text = response.text().await?;
        let bars: Vec<DailyBar> = serde_json::from_str(&text)
            .map_err(|e| ChartError::MalformedData(format!("解析 {} 历史数据失败: {}", ticker, e)))?;

        log::info!("获取 {} 历史数据成功，共 {} 条", ticker, bars.len());
        Ok(bars)
    }
}
