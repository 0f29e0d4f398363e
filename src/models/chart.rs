//! 图表渲染数据契约
//!
//! 描述交给渲染器的图表：数据列、折线、区间带和悬浮提示。
//! 渲染器只依赖这里的结构，不关心具体的绘图库。

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::series::{ComparisonSeries, Series, TooltipRow};
use super::stock::DateRange;

/// 一列图表数据
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Column {
    Dates(Vec<NaiveDate>),
    Prices(Vec<f64>),
    Counts(Vec<u64>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Dates(v) => v.len(),
            Column::Prices(v) => v.len(),
            Column::Counts(v) => v.len(),
        }
    }
}

/// 悬浮提示字段的格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFormat {
    /// 货币，如 $12.30
    Currency,
    /// 千分位整数，如 1,234,567
    Integer,
    /// 日期，如 2024-01-02
    Date,
}

impl FieldFormat {
    /// 渲染器使用的格式说明符
    pub fn specifier(&self) -> &'static str {
        match self {
            FieldFormat::Currency => "$0.00",
            FieldFormat::Integer => "0,0",
            FieldFormat::Date => "%F",
        }
    }
}

/// 悬浮提示中的一个字段
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipField {
    pub label: String,
    pub column: String,
    pub format: FieldFormat,
    pub specifier: &'static str,
}

impl TooltipField {
    pub fn new(label: &str, column: &str, format: FieldFormat) -> Self {
        Self {
            label: label.to_string(),
            column: column.to_string(),
            format,
            specifier: format.specifier(),
        }
    }
}

/// 折线
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub x: String,
    pub y: String,
    pub color: String,
    pub width: u32,
}

/// 区间带（lower..upper 之间填充）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandSeries {
    pub base: String,
    pub lower: String,
    pub upper: String,
    pub fill_color: String,
    pub fill_alpha: f64,
}

/// 悬浮提示工具
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverTool {
    /// 绑定的折线名称，None 表示作用于整张图
    pub line: Option<String>,
    pub fields: Vec<TooltipField>,
    /// 竖线模式
    pub mode: &'static str,
}

/// 完整的图表描述
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis_label: String,
    pub y_axis_label: String,
    pub x_axis_type: &'static str,
    pub columns: BTreeMap<String, Column>,
    pub lines: Vec<LineSeries>,
    pub band: Option<BandSeries>,
    pub hover_tools: Vec<HoverTool>,
}

/// 渲染结果：可嵌入页面的脚本和容器片段
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddedChart {
    pub script: String,
    pub div: String,
}

/// 单只股票图表接口的返回数据
#[derive(Debug, Clone, Serialize)]
pub struct StockChart {
    /// 大写股票代码
    pub ticker: String,
    pub range: DateRange,
    pub series: Series,
    pub tooltips: Vec<TooltipRow>,
    pub chart: EmbeddedChart,
}

/// 市场概览接口的返回数据
#[derive(Debug, Clone, Serialize)]
pub struct MarketSummary {
    pub range: DateRange,
    pub comparison: ComparisonSeries,
    pub chart: EmbeddedChart,
}
