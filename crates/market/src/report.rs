use bourse_core::feed::entity::Series;
use bourse_core::report::entity::{DailyReport, DailySummary, Snapshot};
use chrono::NaiveDateTime;

/// # Summary
/// 获取序列中的最新快照。
///
/// # Logic
/// 1. 序列非空时原样返回最后一条观测。
/// 2. 序列为空时返回全部字段不可用的快照。
///
/// # Arguments
/// * `series`: 有序观测序列。
///
/// # Returns
/// 最新快照。
pub fn latest(series: &Series) -> Snapshot {
    series
        .last()
        .map(Snapshot::from)
        .unwrap_or_else(Snapshot::unavailable)
}

/// # Summary
/// 计算 `now` 所在自然日的日报。
///
/// # Logic
/// 1. 过滤出日期与 `now` 相同且价格可用的观测，序列已有序，无需再次排序。
/// 2. 子集为空时返回 `DailyReport::NoData`。
/// 3. 开盘取第一条价格，收盘取最后一条价格，波动为最高价减最低价。
/// 4. 涨跌幅按 `(close - open) / open * 100` 计算，开盘价为 0 时记为 0。
///
/// 是否处于截止时刻之后由调用方判断，这里不读取任何时钟。
///
/// # Arguments
/// * `series`: 有序观测序列。
/// * `now`: 参考时刻，只使用其日期部分。
///
/// # Returns
/// 日报计算结果。
pub fn daily_report(series: &Series, now: NaiveDateTime) -> DailyReport {
    let date = now.date();
    let mut prices = series
        .iter()
        .filter(|o| o.timestamp.date() == date)
        .filter_map(|o| o.price);

    let Some(open) = prices.next() else {
        return DailyReport::NoData;
    };

    let (close, low, high, samples) = prices.fold(
        (open, open, open, 1usize),
        |(_, low, high, n), price| (price, low.min(price), high.max(price), n + 1),
    );

    DailyReport::Ready(DailySummary {
        date,
        open,
        close,
        volatility: high - low,
        evolution_percent: evolution_percent(open, close),
        samples,
    })
}

/// 开盘到收盘的涨跌幅（百分比），开盘价为 0 时返回 0
pub fn evolution_percent(open: f64, close: f64) -> f64 {
    if open == 0.0 {
        return 0.0;
    }
    (close - open) / open * 100.0
}
