use crate::board::compose_board;
use crate::detector::ChangeDetector;
use bourse_core::common::time::TimeProvider;
use bourse_core::config::ScheduleConfig;
use bourse_core::feed::port::FeedSource;
use bourse_core::refresh::entity::{RefreshOutcome, RefreshState, RefreshTrigger};
use bourse_core::refresh::error::RefreshError;
use bourse_core::refresh::port::Acquirer;
use bourse_core::report::entity::Board;
use chrono::NaiveDateTime;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// # Summary
/// 刷新调度器：决定何时调用外部采集、何时重新计算看板。
///
/// # Invariants
/// - 三种触发源：周期到期、文件变更、手动触发。
/// - 同一时刻最多只有一次外部采集在执行，重叠的请求直接丢弃。
/// - 外部采集受超时约束，无论成功、失败还是超时都会释放执行权。
/// - 周期采集在后台任务中运行，不阻塞 tick 循环。
pub struct RefreshScheduler {
    // 行情数据源
    feed: Arc<dyn FeedSource>,
    // 外部采集协作者
    acquirer: Arc<dyn Acquirer>,
    // 时钟
    clock: Arc<dyn TimeProvider>,
    // 调度参数
    config: ScheduleConfig,
    // 进程级刷新状态
    state: Arc<Mutex<RefreshState>>,
    // 变更检测器，与调度器共享 state
    detector: ChangeDetector,
    // 采集执行权
    in_flight: tokio::sync::Mutex<()>,
    // 最新看板
    board_tx: watch::Sender<Board>,
}

impl RefreshScheduler {
    /// # Summary
    /// 创建调度器并初始化刷新状态。
    ///
    /// # Logic
    /// 1. 以当前时刻作为启动时刻。
    /// 2. 读取行情文件修改时间作为变更检测基线，读取失败按文件缺失处理。
    /// 3. 加载一次序列并合成初始看板。
    ///
    /// # Arguments
    /// * `feed`: 行情数据源。
    /// * `acquirer`: 外部采集协作者。
    /// * `clock`: 时钟。
    /// * `config`: 调度参数。
    ///
    /// # Returns
    /// 调度器的共享指针。
    pub fn new(
        feed: Arc<dyn FeedSource>,
        acquirer: Arc<dyn Acquirer>,
        clock: Arc<dyn TimeProvider>,
        config: ScheduleConfig,
    ) -> Arc<Self> {
        let started_at = clock.now();
        let baseline = feed.modified_at().unwrap_or_else(|e| {
            warn!("Cannot read feed modification time at startup: {}", e);
            None
        });
        let state = Arc::new(Mutex::new(RefreshState::new(
            started_at,
            baseline,
            config.refresh_period(),
        )));
        let detector = ChangeDetector::new(feed.clone(), state.clone());
        let board = compose_board(&feed.load(), started_at, config.cutover_hour, None);
        let (board_tx, _) = watch::channel(board);

        Arc::new(Self {
            feed,
            acquirer,
            clock,
            config,
            state,
            detector,
            in_flight: tokio::sync::Mutex::new(()),
            board_tx,
        })
    }

    /// 订阅看板更新，只保证读到最新值
    pub fn subscribe(&self) -> watch::Receiver<Board> {
        self.board_tx.subscribe()
    }

    /// 最近一次合成的看板
    pub fn board(&self) -> Board {
        self.board_tx.borrow().clone()
    }

    pub fn cutover_hour(&self) -> u32 {
        self.config.cutover_hour
    }

    pub fn started_at(&self) -> NaiveDateTime {
        self.lock_state().started_at()
    }

    pub fn last_fresh(&self) -> Option<NaiveDateTime> {
        self.lock_state().last_fresh()
    }

    /// 距离下一次周期采集的剩余时间
    pub fn countdown_remaining(&self, now: NaiveDateTime) -> Duration {
        self.lock_state().countdown(now)
    }

    /// 是否有采集正在执行
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// # Summary
    /// 检查行情文件是否有新数据，有则标记新鲜并重新合成看板。
    ///
    /// # Returns
    /// 是否检测到变更。
    pub fn check_for_change(&self) -> bool {
        if !self.detector.has_changed() {
            return false;
        }
        self.on_fresh_data(RefreshTrigger::FeedChanged);
        true
    }

    /// # Summary
    /// 手动触发一次采集并等待结果。
    ///
    /// # Returns
    /// 刷新结果，`Display` 为返回给调用方的状态文本。
    pub async fn trigger_manual(&self) -> RefreshOutcome {
        self.refresh(RefreshTrigger::Manual).await
    }

    /// # Summary
    /// 执行一次调度判断。
    ///
    /// # Logic
    /// 1. 周期到期时在后台任务中启动采集，tick 本身不等待。
    /// 2. 检查文件变更。
    ///
    /// # Returns
    /// 本次启动的后台采集任务句柄（如有）。
    pub fn tick(self: &Arc<Self>) -> Option<JoinHandle<RefreshOutcome>> {
        let now = self.clock.now();
        let due = self.lock_state().poll_due(now);

        let handle = due.then(|| {
            let this = Arc::clone(self);
            tokio::spawn(async move { this.refresh(RefreshTrigger::Periodic).await })
        });

        self.check_for_change();
        handle
    }

    /// # Summary
    /// 启动调度循环。
    ///
    /// # Logic
    /// 1. 按配置的 tick 间隔驱动 `tick`，错过的 tick 直接跳过。
    /// 2. 周期采集任务脱离循环独立运行。
    ///
    /// # Returns
    /// 循环任务句柄，调用方通过 abort 停止。
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            info!(
                "Refresh scheduler started (period {:?}, tick {:?})",
                this.config.refresh_period(),
                this.config.tick()
            );
            let mut interval = tokio::time::interval(this.config.tick());
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                drop(this.tick());
            }
        })
    }

    /// # Summary
    /// 在执行权保护下调用外部采集。
    ///
    /// # Logic
    /// 1. 尝试获取执行权，已被占用则丢弃本次请求并返回 `Skipped`。
    /// 2. 在超时限制内等待采集结束，超时视为失败。
    /// 3. 成功后吸收采集造成的文件变更，标记新鲜并重新合成看板。
    /// 4. 执行权随守卫离开作用域释放。
    async fn refresh(&self, trigger: RefreshTrigger) -> RefreshOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            info!("Skipping {} refresh: another refresh is in flight", trigger);
            return RefreshOutcome::Skipped;
        };

        let limit = self.config.acquisition_timeout();
        info!("Starting {} refresh", trigger);
        let result = match tokio::time::timeout(limit, self.acquirer.acquire()).await {
            Ok(result) => result,
            Err(_) => Err(RefreshError::Timeout(limit)),
        };

        match result {
            Ok(()) => {
                if self.detector.has_changed() {
                    debug!("Acquisition appended new data");
                }
                self.on_fresh_data(trigger);
                RefreshOutcome::Completed
            }
            Err(e) => {
                warn!("{} refresh failed: {}", trigger, e);
                RefreshOutcome::Failed(e.to_string())
            }
        }
    }

    /// 标记数据新鲜并重新计算看板
    fn on_fresh_data(&self, trigger: RefreshTrigger) {
        let now = self.clock.now();
        self.lock_state().mark_fresh(now);

        let series = self.feed.load();
        let board = compose_board(&series, now, self.config.cutover_hour, Some(now));
        debug!(
            "Board recomputed after {} ({} observations)",
            trigger,
            series.len()
        );
        self.board_tx.send_replace(board);
    }

    fn lock_state(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
