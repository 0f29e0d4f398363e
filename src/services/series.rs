//! K 线序列转换
//!
//! 把行情 API 返回的单日 K 线数组转换成按列存放的图表序列

use chrono::NaiveDate;

use crate::error::ChartError;
use crate::models::{DailyBar, Series};

/// 支持的日期格式，依次尝试
const DATE_FORMATS: [&str; 2] = ["%Y/%m/%d", "%Y-%m-%d"];

/// 解析 K 线日期
pub fn parse_bar_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value.trim(), fmt).ok())
}

/// 构建图表序列
///
/// 均价取 (low + high) / 2。任意一条记录的日期无法解析时整体失败，不返回部分结果。
///
/// # 错误
/// - 输入为空：`EmptyDataset`
/// - 日期格式错误：`MalformedData`
pub fn build_series(bars: &[DailyBar]) -> Result<Series, ChartError> {
    if bars.is_empty() {
        return Err(ChartError::EmptyDataset);
    }

    let mut series = Series {
        dates: Vec::with_capacity(bars.len()),
        avg_price: Vec::with_capacity(bars.len()),
        open: Vec::with_capacity(bars.len()),
        close: Vec::with_capacity(bars.len()),
        high: Vec::with_capacity(bars.len()),
        low: Vec::with_capacity(bars.len()),
        volume: Vec::with_capacity(bars.len()),
    };

    for (index, bar) in bars.iter().enumerate() {
        let date = parse_bar_date(&bar.date).ok_or_else(|| {
            ChartError::MalformedData(format!("第 {} 条记录日期无法解析: {:?}", index, bar.date))
        })?;

        series.dates.push(date);
        series.avg_price.push((bar.low + bar.high) / 2.0);
        series.open.push(bar.open);
        series.close.push(bar.close);
        series.high.push(bar.high);
        series.low.push(bar.low);
        series.volume.push(bar.volume);
    }

    log::debug!("构建序列完成，共 {} 条", series.len());
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, low: f64, high: f64) -> DailyBar {
        DailyBar {
            date: date.to_string(),
            open: low,
            high,
            low,
            close: high,
            volume: 1_000,
        }
    }

    fn sample_bars() -> Vec<DailyBar> {
        vec![
            bar("2024/01/02", 10.0, 12.0),
            bar("2024/01/03", 11.0, 13.0),
            bar("2024/01/04", 9.0, 11.0),
            bar("2024/01/05", 10.0, 10.0),
            bar("2024/01/08", 12.0, 14.0),
        ]
    }

    #[test]
    fn test_average_price_from_low_high() {
        let series = build_series(&sample_bars()).unwrap();
        let expected = [11.0, 12.0, 10.0, 10.0, 13.0];

        assert_eq!(series.avg_price.len(), expected.len());
        for (got, want) in series.avg_price.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-9, "{} != {}", got, want);
        }
    }

    #[test]
    fn test_arrays_aligned_and_ordered() {
        let bars = sample_bars();
        let series = build_series(&bars).unwrap();
        let n = bars.len();

        assert_eq!(series.len(), n);
        assert_eq!(series.open.len(), n);
        assert_eq!(series.close.len(), n);
        assert_eq!(series.high.len(), n);
        assert_eq!(series.low.len(), n);
        assert_eq!(series.volume.len(), n);

        for (i, b) in bars.iter().enumerate() {
            assert_eq!(series.low[i], b.low);
            assert_eq!(series.high[i], b.high);
            assert!((series.avg_price[i] - (b.low + b.high) / 2.0).abs() < 1e-9);
        }
        assert_eq!(series.dates[0], NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(series.dates[4], NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    }

    #[test]
    fn test_input_order_is_kept_even_if_not_sorted() {
        let bars = vec![bar("2024/01/05", 1.0, 3.0), bar("2024/01/02", 2.0, 4.0)];
        let series = build_series(&bars).unwrap();
        assert_eq!(series.dates[0], NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(series.avg_price, vec![2.0, 3.0]);
    }

    #[test]
    fn test_empty_input_is_empty_dataset() {
        assert_eq!(build_series(&[]), Err(ChartError::EmptyDataset));
    }

    #[test]
    fn test_iso_dates_accepted() {
        let bars = vec![bar("2024-01-02", 10.0, 12.0)];
        let series = build_series(&bars).unwrap();
        assert_eq!(series.dates[0], NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_bad_date_fails_whole_transform() {
        let mut bars = sample_bars();
        bars[3].date = "Jan 5, 24".to_string();

        match build_series(&bars) {
            Err(ChartError::MalformedData(msg)) => assert!(msg.contains("第 3 条")),
            other => panic!("应返回 MalformedData，实际: {:?}", other),
        }
    }

    #[test]
    fn test_impossible_calendar_date_rejected() {
        let bars = vec![bar("2024/02/30", 1.0, 2.0)];
        assert!(matches!(build_series(&bars), Err(ChartError::MalformedData(_))));
    }
}
