//! 通用 API 响应模型
//!
//! 定义统一的 API 响应格式

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChartError;

/// 当前 UTC 时间（RFC 3339，精确到秒）
fn get_utc_time() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// 统一 API 响应结构
///
/// 所有接口返回统一格式，包含：
/// - success: 请求是否成功
/// - data: 响应数据（成功时有值）
/// - message: 响应消息，失败时以 `Error` 开头
/// - code: 失败时的错误分类
/// - timestamp: 响应时间戳（UTC）
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self::success_with_message(data, "Success".to_string())
    }

    /// 创建带提示信息的成功响应
    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            message,
            code: None,
            timestamp: get_utc_time(),
        }
    }

    /// 创建错误响应
    ///
    /// # 参数
    /// - message: 错误信息
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message,
            code: None,
            timestamp: get_utc_time(),
        }
    }
}

impl<T> From<&ChartError> for ApiResponse<T> {
    fn from(err: &ChartError) -> Self {
        let mut response = Self::error(err.to_string());
        response.code = Some(err.kind().to_string());
        response
    }
}
