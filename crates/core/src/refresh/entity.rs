use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime};

/// # Summary
/// 触发一次刷新的来源。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshTrigger {
    // 固定周期到期
    Periodic,
    // 行情文件发生变化
    FeedChanged,
    // 使用方手动触发
    Manual,
}

impl fmt::Display for RefreshTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshTrigger::Periodic => write!(f, "periodic"),
            RefreshTrigger::FeedChanged => write!(f, "feed-changed"),
            RefreshTrigger::Manual => write!(f, "manual"),
        }
    }
}

/// # Summary
/// 单次刷新请求的结果，`Display` 即为返回给手动触发方的状态文本。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RefreshOutcome {
    // 采集成功，数据已确认新鲜
    Completed,
    // 已有刷新在执行，本次请求被丢弃
    Skipped,
    // 采集失败或超时
    Failed(String),
}

impl RefreshOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RefreshOutcome::Completed)
    }
}

impl fmt::Display for RefreshOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshOutcome::Completed => write!(f, "Data refreshed"),
            RefreshOutcome::Skipped => write!(f, "Refresh already in progress"),
            RefreshOutcome::Failed(reason) => write!(f, "Refresh failed: {}", reason),
        }
    }
}

/// # Summary
/// 进程级刷新状态，记录启动时间、行情文件最后修改时间、最后确认新鲜时间以及下一次周期刷新时间。
///
/// # Invariants
/// - 进程启动时初始化，仅由变更检测器与刷新调度器修改，进程重启前不会重置。
/// - 调用方必须通过同一把锁访问。
/// - `period` 恒在 [1 秒, 1 天] 区间内。
#[derive(Debug, Clone)]
pub struct RefreshState {
    started_at: NaiveDateTime,
    last_modified: Option<SystemTime>,
    last_fresh: Option<NaiveDateTime>,
    next_due: NaiveDateTime,
    period: TimeDelta,
}

impl RefreshState {
    /// # Summary
    /// 创建刷新状态。
    ///
    /// # Logic
    /// 1. 以启动时刻为基准，首次周期刷新安排在 `started_at + period`。
    /// 2. 周期限制在 1 秒到 1 天之间。
    /// 3. 记录启动时观察到的文件修改时间作为基线，基线本身不会被视为变化。
    ///
    /// # Arguments
    /// * `started_at`: 进程启动时刻。
    /// * `baseline_modified`: 启动时的文件修改时间（文件缺失为 None）。
    /// * `period`: 周期刷新间隔。
    pub fn new(
        started_at: NaiveDateTime,
        baseline_modified: Option<SystemTime>,
        period: Duration,
    ) -> Self {
        let period = TimeDelta::from_std(period)
            .unwrap_or(TimeDelta::MAX)
            .clamp(TimeDelta::seconds(1), TimeDelta::days(1));
        Self {
            started_at,
            last_modified: baseline_modified,
            last_fresh: None,
            next_due: started_at + period,
            period,
        }
    }

    pub fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    pub fn last_modified(&self) -> Option<SystemTime> {
        self.last_modified
    }

    pub fn last_fresh(&self) -> Option<NaiveDateTime> {
        self.last_fresh
    }

    pub fn next_due(&self) -> NaiveDateTime {
        self.next_due
    }

    /// # Summary
    /// 判断周期刷新是否到期，到期则推进下一次到期时间。
    ///
    /// # Logic
    /// 1. `now < next_due` 时未到期；若时钟回拨超过一个周期则以 `now` 重新定基。
    /// 2. 到期后按整周期推进 `next_due` 直到其晚于 `now`，错过的多个周期只触发一次。
    ///
    /// # Arguments
    /// * `now`: 当前时刻。
    ///
    /// # Returns
    /// 本次是否到期。
    pub fn poll_due(&mut self, now: NaiveDateTime) -> bool {
        if now < self.next_due {
            if self.next_due - now > self.period {
                self.next_due = now + self.period;
            }
            return false;
        }
        while self.next_due <= now {
            self.next_due += self.period;
        }
        true
    }

    /// 距离下一次周期刷新的剩余时间，已逾期时为零
    pub fn countdown(&self, now: NaiveDateTime) -> Duration {
        (self.next_due - now).to_std().unwrap_or(Duration::ZERO)
    }

    /// # Summary
    /// 记录新观察到的文件修改时间。
    ///
    /// # Returns
    /// 修改时间晚于已记录值（或此前从未观察到文件）时返回 true。
    pub fn record_modified(&mut self, modified: SystemTime) -> bool {
        match self.last_modified {
            Some(previous) if modified <= previous => false,
            _ => {
                self.last_modified = Some(modified);
                true
            }
        }
    }

    /// 标记数据已确认新鲜
    pub fn mark_fresh(&mut self, now: NaiveDateTime) {
        self.last_fresh = Some(now);
    }
}
