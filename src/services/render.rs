//! 图表渲染
//!
//! 把序列组装成 [`ChartSpec`]，再交给渲染器生成可嵌入页面的片段

use std::collections::BTreeMap;

use crate::error::ChartError;
use crate::models::{
    BandSeries, ChartSpec, Column, ComparisonSeries, EmbeddedChart, FieldFormat, HoverTool,
    LineSeries, Series, TooltipField,
};

/// 主线颜色
const PRIMARY_LINE_COLOR: &str = "#1f77b4";
/// 区间带填充色
const BAND_FILL_COLOR: &str = "#55FF88";
const BAND_FILL_ALPHA: f64 = 0.2;

/// 图表渲染器
pub trait ChartRenderer: Send + Sync {
    fn render(&self, spec: &ChartSpec) -> Result<EmbeddedChart, ChartError>;
}

/// 单只股票图表选项
#[derive(Debug, Clone, Copy)]
pub struct ChartOptions {
    /// 悬浮提示是否包含最高价、最低价
    pub detailed_tooltips: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self { detailed_tooltips: true }
    }
}

/// 单只股票的价格图
///
/// 一条均价线，一条 low..high 区间带，一个竖线模式的悬浮提示
pub fn price_chart(title: &str, series: &Series, options: ChartOptions) -> ChartSpec {
    let mut columns = BTreeMap::new();
    columns.insert("dates".to_string(), Column::Dates(series.dates.clone()));
    columns.insert("avg_prices".to_string(), Column::Prices(series.avg_price.clone()));
    columns.insert("open".to_string(), Column::Prices(series.open.clone()));
    columns.insert("close".to_string(), Column::Prices(series.close.clone()));
    columns.insert("high".to_string(), Column::Prices(series.high.clone()));
    columns.insert("low".to_string(), Column::Prices(series.low.clone()));
    columns.insert("volume".to_string(), Column::Counts(series.volume.clone()));

    let mut fields = vec![
        TooltipField::new("Date", "dates", FieldFormat::Date),
        TooltipField::new("Price", "avg_prices", FieldFormat::Currency),
        TooltipField::new("Volume", "volume", FieldFormat::Integer),
        TooltipField::new("Open", "open", FieldFormat::Currency),
        TooltipField::new("Close", "close", FieldFormat::Currency),
    ];
    if options.detailed_tooltips {
        fields.push(TooltipField::new("High", "high", FieldFormat::Currency));
        fields.push(TooltipField::new("Low", "low", FieldFormat::Currency));
    }

    ChartSpec {
        title: title.to_string(),
        x_axis_label: "date".to_string(),
        y_axis_label: "$".to_string(),
        x_axis_type: "datetime",
        columns,
        lines: vec![LineSeries {
            name: title.to_string(),
            x: "dates".to_string(),
            y: "avg_prices".to_string(),
            color: PRIMARY_LINE_COLOR.to_string(),
            width: 3,
        }],
        band: Some(BandSeries {
            base: "dates".to_string(),
            lower: "low".to_string(),
            upper: "high".to_string(),
            fill_color: BAND_FILL_COLOR.to_string(),
            fill_alpha: BAND_FILL_ALPHA,
        }),
        hover_tools: vec![HoverTool {
            line: None,
            fields,
            mode: "vline",
        }],
    }
}

/// 市场概览对比图
///
/// 每个基准一条线，各自颜色和悬浮提示（日期 + 该线均价）
pub fn comparison_chart(title: &str, comparison: &ComparisonSeries) -> ChartSpec {
    let mut columns = BTreeMap::new();
    columns.insert("dates".to_string(), Column::Dates(comparison.dates.clone()));

    let mut lines = Vec::with_capacity(comparison.lines.len());
    let mut hover_tools = Vec::with_capacity(comparison.lines.len());

    for line in &comparison.lines {
        let column = format!("{}_avg_prices", line.ticker);
        columns.insert(column.clone(), Column::Prices(line.avg_price.clone()));

        lines.push(LineSeries {
            name: line.name.clone(),
            x: "dates".to_string(),
            y: column.clone(),
            color: line.color.clone(),
            width: 2,
        });
        hover_tools.push(HoverTool {
            line: Some(line.name.clone()),
            fields: vec![
                TooltipField::new("Date", "dates", FieldFormat::Date),
                TooltipField::new(&line.name, &column, FieldFormat::Currency),
            ],
            mode: "vline",
        });
    }

    ChartSpec {
        title: title.to_string(),
        x_axis_label: "date".to_string(),
        y_axis_label: "$".to_string(),
        x_axis_type: "datetime",
        columns,
        lines,
        band: None,
        hover_tools,
    }
}

/// 嵌入式渲染器
///
/// 输出一个图表容器 `<div>` 和一个 `application/json` 脚本块，
/// 由页面上的绘图脚本读取后绘制
#[derive(Debug, Clone, Default)]
pub struct EmbedRenderer;

impl EmbedRenderer {
    pub fn new() -> Self {
        Self
    }

    fn element_id(title: &str) -> String {
        let slug: String = title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        let slug = slug
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        if slug.is_empty() {
            "chart".to_string()
        } else {
            format!("chart-{}", slug)
        }
    }
}

impl ChartRenderer for EmbedRenderer {
    fn render(&self, spec: &ChartSpec) -> Result<EmbeddedChart, ChartError> {
        let lengths: Vec<usize> = spec.columns.values().map(Column::len).collect();
        if lengths.windows(2).any(|w| w[0] != w[1]) {
            return Err(ChartError::Render(format!("{} 的数据列长度不一致", spec.title)));
        }

        let json = serde_json::to_string(spec).map_err(|e| ChartError::Render(e.to_string()))?;
        // 防止数据中的 </script> 提前结束脚本块
        let json = json.replace("</", "<\\/");

        let id = Self::element_id(&spec.title);
        Ok(EmbeddedChart {
            script: format!(
                r#"<script type="application/json" data-chart-target="{}">{}</script>"#,
                id, json
            ),
            div: format!(r#"<div id="{}" class="chart"></div>"#, id),
        })
    }
}
