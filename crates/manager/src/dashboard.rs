use crate::board::{before_cutover, compose_board};
use crate::scheduler::RefreshScheduler;
use bourse_core::feed::entity::PricePoint;
use bourse_core::feed::port::FeedSource;
use bourse_core::refresh::entity::RefreshOutcome;
use bourse_core::report::entity::{Board, ReportView, Snapshot};
use bourse_market::report::{daily_report, latest};
use chrono::NaiveDateTime;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// # Summary
/// 展示层使用的拉取式门面 (Facade)。
///
/// # Invariants
/// - 每次读取都重新加载行情文件，不缓存任何计算结果。
/// - 截止时刻判断在此处完成，日报计算本身保持纯函数。
/// - 持有自己的看板订阅，调度循环先消费掉的文件变更仍会在下一次轮询中报告。
pub struct Dashboard {
    // 行情数据源
    feed: Arc<dyn FeedSource>,
    // 刷新调度器
    scheduler: Arc<RefreshScheduler>,
    // 本门面已看到的看板版本
    boards: Mutex<watch::Receiver<Board>>,
}

impl Dashboard {
    pub fn new(feed: Arc<dyn FeedSource>, scheduler: Arc<RefreshScheduler>) -> Self {
        let boards = Mutex::new(scheduler.subscribe());
        Self {
            feed,
            scheduler,
            boards,
        }
    }

    /// 最新快照，无数据时全部字段为 N/A
    pub fn snapshot(&self) -> Snapshot {
        latest(&self.feed.load())
    }

    /// # Summary
    /// 获取日报视图。
    ///
    /// # Logic
    /// 1. `now` 早于截止小时直接返回 `Pending`，不读取行情文件。
    /// 2. 否则重新加载序列并计算当日日报。
    pub fn daily_report(&self, now: NaiveDateTime) -> ReportView {
        let cutover_hour = self.scheduler.cutover_hour();
        if before_cutover(now, cutover_hour) {
            return ReportView::Pending { cutover_hour };
        }
        ReportView::Ready(daily_report(&self.feed.load(), now))
    }

    /// 距离下一次周期刷新的剩余时间
    pub fn countdown_remaining(&self, now: NaiveDateTime) -> Duration {
        self.scheduler.countdown_remaining(now)
    }

    /// # Summary
    /// 自上次轮询以来是否有新数据。
    ///
    /// # Logic
    /// 1. 先让调度器检查一次文件变更，有变更时会重新发布看板。
    /// 2. 再检查本门面的订阅是否收到了未读的看板，包括调度循环在后台发布的版本。
    /// 3. 将最新看板标记为已读。
    ///
    /// # Returns
    /// 存在未读的新看板时返回 true，每个版本只报告一次。
    pub fn poll_for_change(&self) -> bool {
        let detected = self.scheduler.check_for_change();

        let mut boards = self.boards.lock().unwrap_or_else(|e| e.into_inner());
        let published = boards.has_changed().unwrap_or(false);
        if published {
            drop(boards.borrow_and_update());
        }
        detected || published
    }

    /// 手动刷新，返回的结果可直接渲染为状态文本
    pub async fn trigger_manual_refresh(&self) -> RefreshOutcome {
        self.scheduler.trigger_manual().await
    }

    /// 价格曲线数据
    pub fn price_history(&self) -> Vec<PricePoint> {
        self.feed.load().price_points()
    }

    /// # Summary
    /// 一次加载合成完整看板，避免快照与日报来自不同版本的文件。
    pub fn board(&self, now: NaiveDateTime) -> Board {
        compose_board(
            &self.feed.load(),
            now,
            self.scheduler.cutover_hour(),
            self.scheduler.last_fresh(),
        )
    }
}
