//! 错误类型
//!
//! 行情获取、序列转换和图表渲染共用的错误分类。
//! 所有错误的显示文本都以 `Error` 开头，Web 层据此判断是否为失败结果。

use thiserror::Error;

/// 请求参数（股票代码、日期范围）校验失败的具体原因
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker contains disallowed character '{ch}' at index {index}")]
    DisallowedChar { ch: char, index: usize },
    #[error("ticker must be alphabetic, found '{ch}' at index {index}")]
    NotAlphabetic { ch: char, index: usize },
    #[error("unsupported range '{value}'")]
    InvalidRange { value: String },
}

/// 图表流水线错误
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartError {
    /// 输入未通过校验，未发起任何网络请求
    #[error("Error, INVALID INPUT: {0}")]
    InvalidInput(#[from] InputError),

    /// 行情 API 返回了错误码表中已知的状态码
    #[error("Error {code}, {message}")]
    Provider { code: u16, message: String },

    /// 行情 API 返回的状态码不在错误码表中
    #[error("Error {code}, UNKNOWN PROVIDER ERROR")]
    UnknownProvider { code: u16 },

    /// 连接、TLS 或读取响应体失败
    #[error("Error, TRANSPORT FAILURE: {0}")]
    Transport(String),

    #[error("Error, MALFORMED DATA: {0}")]
    MalformedData(String),

    #[error("Error, NO DATA TO CHART")]
    EmptyDataset,

    #[error("Error, RENDER FAILURE: {0}")]
    Render(String),
}

impl ChartError {
    /// 稳定的错误分类名，随响应一起返回
    pub fn kind(&self) -> &'static str {
        match self {
            ChartError::InvalidInput(_) => "INVALID_INPUT",
            ChartError::Provider { .. } => "PROVIDER_ERROR",
            ChartError::UnknownProvider { .. } => "UNKNOWN_PROVIDER_ERROR",
            ChartError::Transport(_) => "TRANSPORT_ERROR",
            ChartError::MalformedData(_) => "MALFORMED_DATA",
            ChartError::EmptyDataset => "EMPTY_DATASET",
            ChartError::Render(_) => "RENDER_ERROR",
        }
    }
}

impl From<reqwest::Error> for ChartError {
    fn from(err: reqwest::Error) -> Self {
        // 请求 URL 里带着 token，不能出现在错误文本中
        ChartError::Transport(err.without_url().to_string())
    }
}
