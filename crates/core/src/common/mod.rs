pub mod time;

/// 缺失值在展示层统一使用的占位文本。
pub const UNAVAILABLE: &str = "N/A";

/// # Summary
/// 将可选的展示字段渲染为文本，缺失时返回 `UNAVAILABLE`。
///
/// # Arguments
/// * `value`: 可选字段引用。
///
/// # Returns
/// 字段文本或占位文本。
pub fn or_unavailable(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(UNAVAILABLE)
}

/// # Summary
/// 按两位小数渲染数值，缺失时返回 `UNAVAILABLE`。
pub fn fmt_price(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => UNAVAILABLE.to_string(),
    }
}
