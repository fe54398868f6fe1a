use bourse_core::feed::entity::{ColumnLayout, Delimiter, NumberFormat};
use bourse_core::feed::port::FeedSource;
use bourse_core::report::entity::{DailyReport, Trend};
use bourse_feed::loader::FileFeed;
use bourse_market::report::{daily_report, latest};
use chrono::NaiveDate;
use std::fs;
use tempfile::tempdir;

/// # Summary
/// 从行情文件到日报的完整链路。
///
/// # Logic
/// 1. 写入前一日收盘、当日四个价格、一条价格缺失的记录与一条错误行。
/// 2. 加载序列并计算当日日报。
/// 3. 断言开盘、收盘、波动与涨跌幅的渲染结果。
#[test]
fn test_feed_to_daily_report() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("cac40_data.txt");
    fs::write(
        &path,
        "\
2026-03-02 17:30:00;101,0;+0,30%;;;;;;;;
2026-03-02 09:00:00;100,0;-0,10%;;;;;;;;
2026-03-01 17:30:00;95,0;+1,00%;;;;;;;;
2026-03-02 12:00:00;98,0;(0,40%);;;;;;;;
not-a-date;100,5;;;;;;;;;
2026-03-02 10:00:00;102,5;+0,20%;;;;;;;;
2026-03-02 13:00:00;--;;;;;;;;;
",
    )?;

    let feed = FileFeed::new(
        &path,
        Delimiter::Semicolon,
        NumberFormat::Continental,
        ColumnLayout::Standard,
    );
    let series = feed.load();
    assert_eq!(series.len(), 6);

    let now = NaiveDate::from_ymd_opt(2026, 3, 2)
        .and_then(|d| d.and_hms_opt(20, 15, 0))
        .expect("valid date");
    let report = daily_report(&series, now);
    let DailyReport::Ready(summary) = report else {
        panic!("expected a ready report, got {:?}", report);
    };
    assert_eq!(summary.samples, 4);

    let fields = report.render();
    assert_eq!(fields.open, "100.00");
    assert_eq!(fields.close, "101.00");
    assert_eq!(fields.volatility, "4.50");
    assert_eq!(fields.evolution, "1.00%");

    let snapshot = latest(&series);
    assert_eq!(snapshot.price_display(), "101,0");
    assert_eq!(snapshot.trend(), Trend::Up);
    Ok(())
}

/// # Summary
/// 当日没有任何记录时日报为 N/A，而不是报错。
#[test]
fn test_report_for_day_without_data() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("cac40_data.txt");
    fs::write(&path, "2026-03-01 17:30:00;95,0;+1,00%;;;;;;;;\n")?;

    let feed = FileFeed::new(
        &path,
        Delimiter::Semicolon,
        NumberFormat::Continental,
        ColumnLayout::Standard,
    );
    let now = NaiveDate::from_ymd_opt(2026, 3, 2)
        .and_then(|d| d.and_hms_opt(21, 0, 0))
        .expect("valid date");
    let report = daily_report(&feed.load(), now);
    assert_eq!(report, DailyReport::NoData);
    assert_eq!(report.render().open, "N/A");
    Ok(())
}
