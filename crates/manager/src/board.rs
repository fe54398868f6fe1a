use bourse_core::feed::entity::Series;
use bourse_core::report::entity::{Board, ReportView};
use bourse_market::report::{daily_report, latest};
use chrono::{NaiveDateTime, Timelike};

/// # Summary
/// 按截止时刻决定日报视图。
///
/// # Logic
/// 1. 当前小时早于 `cutover_hour` 时返回 `Pending`，不调用日报计算。
/// 2. 否则计算 `now` 当日的日报。
pub fn report_view(series: &Series, now: NaiveDateTime, cutover_hour: u32) -> ReportView {
    if before_cutover(now, cutover_hour) {
        ReportView::Pending { cutover_hour }
    } else {
        ReportView::Ready(daily_report(series, now))
    }
}

/// 当前时刻是否早于日报截止小时
pub fn before_cutover(now: NaiveDateTime, cutover_hour: u32) -> bool {
    now.hour() < cutover_hour
}

/// 合成某一时刻的看板数据
pub fn compose_board(
    series: &Series,
    now: NaiveDateTime,
    cutover_hour: u32,
    last_fresh: Option<NaiveDateTime>,
) -> Board {
    Board {
        snapshot: latest(series),
        report: report_view(series, now, cutover_hour),
        computed_at: now,
        last_fresh,
    }
}
