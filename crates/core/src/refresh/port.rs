use crate::refresh::error::RefreshError;
use async_trait::async_trait;

/// # Summary
/// 外部数据采集协作者接口。
///
/// # Invariants
/// - 实现者负责向行情文件追加新数据，失败时不得破坏已可读的数据。
/// - 调用可能耗时数秒，超时由调度层统一施加。
#[async_trait]
pub trait Acquirer: Send + Sync {
    /// # Summary
    /// 执行一次数据采集。
    ///
    /// # Logic
    /// 1. 启动外部采集动作。
    /// 2. 等待其结束并将退出状态映射为成功或失败。
    ///
    /// # Returns
    /// 成功返回 Ok，失败返回 `RefreshError::Failed`。
    async fn acquire(&self) -> Result<(), RefreshError>;
}
