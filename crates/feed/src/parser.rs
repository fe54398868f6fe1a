use bourse_core::feed::entity::{ColumnLayout, MIN_COLUMNS, TIMESTAMP_FORMAT};
use bourse_core::feed::error::FeedError;
use chrono::NaiveDateTime;

/// # Summary
/// 通过行解析得到、尚未做数值归一化的候选记录。
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub timestamp: NaiveDateTime,
    pub price: Option<String>,
    pub variation: Option<String>,
    pub previous_close: Option<String>,
    pub open: Option<String>,
    pub variation_1y: Option<String>,
    pub volume: Option<String>,
    pub avg_volume_3m: Option<String>,
    pub day_range: Option<String>,
    pub week52_range: Option<String>,
    pub sentiment: Option<String>,
}

/// # Summary
/// 行解析器：把已按分隔符切分的字段转换为候选记录。
///
/// # Invariants
/// - 纯函数，无副作用。
/// - 列数不足或时间戳非法时拒绝，多余的列被忽略。
#[derive(Debug, Clone, Copy)]
pub struct RecordParser {
    layout: ColumnLayout,
}

impl RecordParser {
    pub fn new(layout: ColumnLayout) -> Self {
        Self { layout }
    }

    /// # Summary
    /// 解析一行字段。
    ///
    /// # Logic
    /// 1. 校验列数不少于 `MIN_COLUMNS`。
    /// 2. 去除时间戳两侧空白后按固定格式解析。
    /// 3. 其余字段去除空白后原样保留，空字段视为缺失。
    /// 4. 按列布局决定价格列与涨跌幅列的位置。
    ///
    /// # Arguments
    /// * `fields`: 切分后的字段。
    ///
    /// # Returns
    /// 成功返回 `RawRecord`，失败返回 `FeedError::MalformedRow`。
    pub fn parse(&self, fields: &[&str]) -> Result<RawRecord, FeedError> {
        if fields.len() < MIN_COLUMNS {
            return Err(FeedError::MalformedRow(format!(
                "expected at least {} columns, got {}",
                MIN_COLUMNS,
                fields.len()
            )));
        }

        let raw_ts = fields[0].trim();
        let timestamp = NaiveDateTime::parse_from_str(raw_ts, TIMESTAMP_FORMAT)
            .map_err(|e| FeedError::MalformedRow(format!("bad timestamp {:?}: {}", raw_ts, e)))?;

        let (price_col, variation_col) = self.layout.price_variation_columns();

        Ok(RawRecord {
            timestamp,
            price: text(fields, price_col),
            variation: text(fields, variation_col),
            previous_close: text(fields, 3),
            open: text(fields, 4),
            variation_1y: text(fields, 5),
            volume: text(fields, 6),
            avg_volume_3m: text(fields, 7),
            day_range: text(fields, 8),
            week52_range: text(fields, 9),
            sentiment: text(fields, 10),
        })
    }
}

fn text(fields: &[&str], index: usize) -> Option<String> {
    fields
        .get(index)
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .map(str::to_string)
}
