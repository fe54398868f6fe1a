use bourse_core::feed::port::FeedSource;
use bourse_core::refresh::entity::RefreshState;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// # Summary
/// 行情文件变更检测器。
///
/// # Invariants
/// - 与刷新调度器共享同一个 `RefreshState`，通过同一把锁访问。
/// - 启动时记录的修改时间作为基线，基线本身不会产生变更信号。
/// - 读取修改时间失败视为无变化。
pub struct ChangeDetector {
    // 行情数据源
    feed: Arc<dyn FeedSource>,
    // 共享刷新状态
    state: Arc<Mutex<RefreshState>>,
}

impl ChangeDetector {
    pub fn new(feed: Arc<dyn FeedSource>, state: Arc<Mutex<RefreshState>>) -> Self {
        Self { feed, state }
    }

    /// # Summary
    /// 判断自上次检查以来是否有新数据落盘。
    ///
    /// # Logic
    /// 1. 读取行情文件当前修改时间，文件缺失或读取失败时返回 false。
    /// 2. 加锁后与记录值比较，更新则写回并返回 true。
    ///
    /// # Returns
    /// 是否检测到变更。
    pub fn has_changed(&self) -> bool {
        let modified = match self.feed.modified_at() {
            Ok(Some(modified)) => modified,
            Ok(None) => return false,
            Err(e) => {
                debug!("Cannot read feed modification time: {}", e);
                return false;
            }
        };

        let changed = self
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .record_modified(modified);
        if changed {
            info!("Feed modification detected");
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bourse_core::feed::entity::Series;
    use bourse_core::feed::error::FeedError;
    use chrono::NaiveDate;
    use std::time::{Duration, SystemTime};

    struct StubFeed {
        modified: Mutex<Result<Option<SystemTime>, FeedError>>,
    }

    impl StubFeed {
        fn new(modified: Result<Option<SystemTime>, FeedError>) -> Arc<Self> {
            Arc::new(Self {
                modified: Mutex::new(modified),
            })
        }

        fn set(&self, modified: Result<Option<SystemTime>, FeedError>) {
            *self.modified.lock().unwrap() = modified;
        }
    }

    impl FeedSource for StubFeed {
        fn load(&self) -> Series {
            Series::empty()
        }

        fn modified_at(&self) -> Result<Option<SystemTime>, FeedError> {
            self.modified.lock().unwrap().clone()
        }
    }

    fn detector(feed: Arc<StubFeed>, baseline: Option<SystemTime>) -> ChangeDetector {
        let started = NaiveDate::from_ymd_opt(2026, 3, 2)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .unwrap();
        let state = RefreshState::new(started, baseline, Duration::from_secs(300));
        ChangeDetector::new(feed, Arc::new(Mutex::new(state)))
    }

    #[test]
    fn test_baseline_is_not_a_change() {
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(10_000);
        let feed = StubFeed::new(Ok(Some(t0)));
        let detector = detector(feed.clone(), Some(t0));
        assert!(!detector.has_changed());

        feed.set(Ok(Some(t0 + Duration::from_secs(60))));
        assert!(detector.has_changed());
        assert!(!detector.has_changed());
    }

    #[test]
    fn test_feed_appearing_after_start() {
        let feed = StubFeed::new(Ok(None));
        let detector = detector(feed.clone(), None);
        assert!(!detector.has_changed());

        feed.set(Ok(Some(SystemTime::UNIX_EPOCH)));
        assert!(detector.has_changed());
    }

    #[test]
    fn test_read_fault_is_no_change() {
        let feed = StubFeed::new(Err(FeedError::ResourceUnavailable("denied".into())));
        let detector = detector(feed, None);
        assert!(!detector.has_changed());
    }
}
