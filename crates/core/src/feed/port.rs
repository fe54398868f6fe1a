use crate::feed::entity::Series;
use crate::feed::error::FeedError;
use std::time::SystemTime;

/// # Summary
/// 行情序列数据源接口（只读）。
///
/// # Invariants
/// - `load` 每次调用都从头读取并解析，不持有跨调用的可变状态。
/// - 任何读取故障都必须降级为空序列，不得向调用方传播。
pub trait FeedSource: Send + Sync {
    /// # Summary
    /// 读取完整行情并返回按时间排序的序列。
    ///
    /// # Logic
    /// 1. 定位行情资源，缺失或为空时返回空序列。
    /// 2. 逐行解析并归一化价格，丢弃格式错误的行。
    /// 3. 按时间戳稳定排序。
    ///
    /// # Returns
    /// 不可变的有序序列。
    fn load(&self) -> Series;

    /// # Summary
    /// 获取行情资源的最后修改时间。
    ///
    /// # Returns
    /// 资源存在时返回 `Some(时间)`，资源不存在时返回 `None`，
    /// 读取元数据失败时返回 `FeedError::ResourceUnavailable`。
    fn modified_at(&self) -> Result<Option<SystemTime>, FeedError>;
}
