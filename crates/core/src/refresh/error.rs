use std::time::Duration;
use thiserror::Error;

/// # Summary
/// 外部刷新动作的错误枚举。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 超时与失败在调度层被同等对待，均不影响读取路径。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RefreshError {
    // 采集进程返回失败或无法启动
    #[error("Acquisition failed: {0}")]
    Failed(String),
    // 采集进程在限定时间内未完成
    #[error("Acquisition timed out after {0:?}")]
    Timeout(Duration),
}
