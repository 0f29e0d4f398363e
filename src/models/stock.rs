//! 股票数据模型
//!
//! 定义行情请求参数和单日 K 线数据结构

use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// 股票代码最大长度
pub const MAX_TICKER_LEN: usize = 5;

/// 股票代码中不允许出现的字符
pub const DISALLOWED_CHARS: &str = "~!@#$%^&*()_+`1234567890-=[]\\{}|;':,./<>?";

/// 单日 K 线数据
///
/// 对应行情 API 返回数组中的一个元素，只保留 OHLCV 字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// 日期（YYYY/MM/DD 或 YYYY-MM-DD，转换时解析）
    pub date: String,
    /// 开盘价
    pub open: f64,
    /// 最高价
    pub high: f64,
    /// 最低价
    pub low: f64,
    /// 收盘价
    pub close: f64,
    /// 成交量
    pub volume: u64,
}

/// 经过校验的股票代码（小写）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// 校验并规范化股票代码
    ///
    /// 去掉首尾空白后必须是 1~5 个 ASCII 字母，且不含禁用字符
    pub fn parse(input: &str) -> Result<Self, InputError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(InputError::EmptyTicker);
        }

        let len = trimmed.chars().count();
        if len > MAX_TICKER_LEN {
            return Err(InputError::TickerTooLong { len, max: MAX_TICKER_LEN });
        }

        for (index, ch) in trimmed.chars().enumerate() {
            if DISALLOWED_CHARS.contains(ch) {
                return Err(InputError::DisallowedChar { ch, index });
            }
            if !ch.is_ascii_alphabetic() {
                return Err(InputError::NotAlphabetic { ch, index });
            }
        }

        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 页面标题用的大写形式
    pub fn display_name(&self) -> String {
        self.0.to_ascii_uppercase()
    }
}

impl Display for Ticker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Ticker {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(value: Ticker) -> Self {
        value.0
    }
}

fn range_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(max|5y|2y|1y|ytd|6m|3m|1m|1mm|5d|5dm|dynamic|date/\d{8})$")
            .expect("range pattern is valid")
    })
}

/// 历史行情日期范围（如 ytd、1y、date/20240102）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateRange(String);

impl DateRange {
    pub fn parse(input: &str) -> Result<Self, InputError> {
        let normalized = input.trim().trim_matches('/').to_ascii_lowercase();
        if !range_pattern().is_match(&normalized) {
            return Err(InputError::InvalidRange { value: input.to_string() });
        }
        Ok(Self(normalized))
    }

    pub fn ytd() -> Self {
        Self("ytd".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 拼接到 URL 路径时使用的各段（date/20240102 为两段）
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::ytd()
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DateRange {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DateRange> for String {
    fn from(value: DateRange) -> Self {
        value.0
    }
}

/// 图表请求：股票代码 + 日期范围
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub ticker: Ticker,
    pub range: DateRange,
}

impl ChartRequest {
    /// 校验股票代码和日期范围，未指定范围时使用 `default_range`
    pub fn new(ticker: &str, range: Option<&str>, default_range: &DateRange) -> Result<Self, InputError> {
        let ticker = Ticker::parse(ticker)?;
        let range = match range {
            Some(value) => DateRange::parse(value)?,
            None => default_range.clone(),
        };
        Ok(Self { ticker, range })
    }
}

/// 图表查询参数
#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    /// 日期范围，缺省使用配置中的默认值
    pub range: Option<String>,
}

/// 股票查询表单
#[derive(Debug, Deserialize)]
pub struct LookupForm {
    pub ticker: String,
}
