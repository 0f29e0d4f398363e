//! 市场概览
//!
//! 获取三个指数代理的日 K 线，计算均价并对齐到同一日期轴

use crate::error::ChartError;
use crate::models::{Benchmark, ComparisonSeries, DateRange, NamedSeries, Series};

use super::iex::QuoteSource;
use super::series::build_series;

/// 构建三条基准的对比序列
///
/// 依次获取每个基准的数据，任一失败则整体失败。
/// 三条序列的长度和每一天的日期都必须与第一条一致，否则返回 `MalformedData`。
pub async fn build_comparison(
    source: &dyn QuoteSource,
    benchmarks: &[Benchmark; 3],
    range: &DateRange,
) -> Result<ComparisonSeries, ChartError> {
    let mut fetched: Vec<(&Benchmark, Series)> = Vec::with_capacity(benchmarks.len());

    for benchmark in benchmarks {
        let bars = source.fetch_series(&benchmark.ticker, range).await?;
        let series = build_series(&bars)?;
        fetched.push((benchmark, series));
    }

    let dates = fetched[0].1.dates.clone();
    for (benchmark, series) in &fetched[1..] {
        check_alignment(&fetched[0].0.name, &dates, benchmark, series)?;
    }

    let lines = fetched
        .into_iter()
        .map(|(benchmark, series)| NamedSeries {
            name: benchmark.name.clone(),
            ticker: benchmark.ticker.clone(),
            color: benchmark.color.clone(),
            avg_price: series.avg_price,
        })
        .collect();

    Ok(ComparisonSeries { dates, lines })
}

fn check_alignment(
    reference: &str,
    dates: &[chrono::NaiveDate],
    benchmark: &Benchmark,
    series: &Series,
) -> Result<(), ChartError> {
    if series.dates.len() != dates.len() {
        return Err(ChartError::MalformedData(format!(
            "{} 有 {} 条记录，与 {} 的 {} 条不一致",
            benchmark.name,
            series.dates.len(),
            reference,
            dates.len()
        )));
    }

    if let Some(index) = dates.iter().zip(&series.dates).position(|(a, b)| a != b) {
        return Err(ChartError::MalformedData(format!(
            "{} 第 {} 条日期 {} 与 {} 的 {} 不一致",
            benchmark.name, index, series.dates[index], reference, dates[index]
        )));
    }

    Ok(())
}
