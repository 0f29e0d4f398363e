//! 业务逻辑服务模块
//!
//! 封装行情获取、序列转换和图表组装逻辑

pub mod format;  // 悬浮提示格式化
pub mod iex;     // IEX Cloud 行情接口
pub mod render;  // 图表组装与渲染
pub mod series;  // K 线序列转换
pub mod summary; // 市场概览对比
