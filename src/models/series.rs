//! 图表序列模型
//!
//! 由单日 K 线转换得到的按列存放的序列数据

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::services::format::{format_currency, format_date, format_thousands};

/// 单只股票的图表序列
///
/// 所有数组长度相同，顺序与输入的 K 线一致
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub dates: Vec<NaiveDate>,
    /// 均价 (low + high) / 2，图表主线
    pub avg_price: Vec<f64>,
    pub open: Vec<f64>,
    pub close: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub volume: Vec<u64>,
}

/// 悬浮提示中的一行（已格式化）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipRow {
    pub date: String,
    pub price: String,
    pub volume: String,
    pub open: String,
    pub close: String,
    pub high: String,
    pub low: String,
}

impl Series {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// 生成每天的悬浮提示文本
    ///
    /// 价格格式 `$0.00`，成交量带千分位，日期 `YYYY-MM-DD`
    pub fn tooltip_rows(&self) -> Vec<TooltipRow> {
        (0..self.len())
            .map(|i| TooltipRow {
                date: format_date(self.dates[i]),
                price: format_currency(self.avg_price[i]),
                volume: format_thousands(self.volume[i]),
                open: format_currency(self.open[i]),
                close: format_currency(self.close[i]),
                high: format_currency(self.high[i]),
                low: format_currency(self.low[i]),
            })
            .collect()
    }
}

/// 对比基准（指数代理 ETF）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    /// 显示名称
    pub name: String,
    /// 股票代码
    pub ticker: String,
    /// 折线颜色
    pub color: String,
}

impl Benchmark {
    pub fn new(name: &str, ticker: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            ticker: ticker.to_string(),
            color: color.to_string(),
        }
    }
}

/// 对比图中的一条均价线
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSeries {
    pub name: String,
    pub ticker: String,
    pub color: String,
    pub avg_price: Vec<f64>,
}

/// 市场概览对比序列，三条均价线共享同一日期轴
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSeries {
    pub dates: Vec<NaiveDate>,
    pub lines: Vec<NamedSeries>,
}
