use thiserror::Error;

/// # Summary
/// 行情文件域错误枚举，覆盖读取、行解析与数值归一化三类故障。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 所有变体均可降级处理，不会导致进程退出。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedError {
    // 行情文件缺失或不可读
    #[error("Feed resource unavailable: {0}")]
    ResourceUnavailable(String),
    // 单行格式错误（列数不足、时间戳无法解析等）
    #[error("Malformed row: {0}")]
    MalformedRow(String),
    // 价格或百分比文本无法转换为数值
    #[error("Numeric normalization failed: {0}")]
    NumericNormalization(String),
}
