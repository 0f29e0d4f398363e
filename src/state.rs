//! 共享应用状态
//!
//! 启动时构建一次，各请求只读访问

use std::sync::Arc;

use anyhow::anyhow;

use crate::config::MarketConfig;
use crate::models::{Benchmark, DateRange};
use crate::services::iex::QuoteSource;
use crate::services::render::{ChartOptions, ChartRenderer};

pub struct AppState {
    /// 行情数据源
    pub source: Arc<dyn QuoteSource>,
    /// 图表渲染器
    pub renderer: Arc<dyn ChartRenderer>,
    /// 市场概览的三个基准
    pub benchmarks: [Benchmark; 3],
    /// 未指定 range 时使用的日期范围
    pub default_range: DateRange,
    pub chart_options: ChartOptions,
}

impl AppState {
    pub fn new(
        source: Arc<dyn QuoteSource>,
        renderer: Arc<dyn ChartRenderer>,
        market: &MarketConfig,
    ) -> anyhow::Result<Self> {
        let benchmarks: [Benchmark; 3] = market
            .benchmarks
            .clone()
            .try_into()
            .map_err(|v: Vec<Benchmark>| anyhow!("需要 3 个对比基准，当前 {} 个", v.len()))?;

        Ok(Self {
            source,
            renderer,
            benchmarks,
            default_range: market.range.clone(),
            chart_options: ChartOptions {
                detailed_tooltips: market.detailed_tooltips,
            },
        })
    }
}
