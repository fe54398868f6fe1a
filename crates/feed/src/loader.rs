use crate::normalizer::normalize;
use crate::parser::{RawRecord, RecordParser};
use bourse_core::config::FeedConfig;
use bourse_core::feed::entity::{ColumnLayout, Delimiter, LoadStats, NumberFormat, Observation, Series};
use bourse_core::feed::error::FeedError;
use bourse_core::feed::port::FeedSource;
use std::borrow::Cow;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, warn};

/// # Summary
/// 基于本地分隔文本文件的行情序列加载器。
///
/// # Invariants
/// - 每次 `load` 都完整读取并重新解析文件，不做任何缓存。
/// - 文件缺失、为空或读取失败均返回空序列，不向调用方传播错误。
/// - 同一份文件内容多次加载得到完全相同的序列。
#[derive(Debug, Clone)]
pub struct FileFeed {
    // 行情文件路径
    path: PathBuf,
    // 列分隔符
    delimiter: Delimiter,
    // 数值区域规则
    format: NumberFormat,
    // 行解析器
    parser: RecordParser,
}

impl FileFeed {
    /// # Summary
    /// 创建文件加载器。
    ///
    /// # Arguments
    /// * `path`: 行情文件路径。
    /// * `delimiter`: 列分隔符。
    /// * `format`: 数值区域规则。
    /// * `layout`: 价格列与涨跌幅列的排列方式。
    pub fn new(
        path: impl Into<PathBuf>,
        delimiter: Delimiter,
        format: NumberFormat,
        layout: ColumnLayout,
    ) -> Self {
        Self {
            path: path.into(),
            delimiter,
            format,
            parser: RecordParser::new(layout),
        }
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(
            &config.path,
            config.delimiter,
            config.number_format,
            config.layout,
        )
    }

    /// # Summary
    /// 解析一段完整的文件内容。
    ///
    /// # Logic
    /// 1. 以无表头、可变列数、不识别引号的方式按分隔符切分每一行，并去除字段两侧空白。
    /// 2. 字段按字节读取后有损解码为 UTF-8，展示字段中的非法字节不会导致整行被丢弃。
    /// 3. 跳过空行，其余每行计入 `rows`。
    /// 4. 行解析失败计入 `rejected` 并丢弃。
    /// 5. 价格归一化失败的行保留，价格记为不可用并计入 `unpriced`。
    /// 6. 按时间戳稳定排序后返回。
    ///
    /// # Arguments
    /// * `bytes`: 文件内容。
    ///
    /// # Returns
    /// 有序序列。
    pub fn parse_bytes(&self, bytes: &[u8]) -> Series {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter.as_byte())
            .quoting(false)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let mut stats = LoadStats::default();
        let mut observations = Vec::new();

        for result in reader.byte_records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    stats.rows += 1;
                    stats.rejected += 1;
                    debug!("Dropping unreadable feed row: {}", e);
                    continue;
                }
            };

            if record.iter().all(<[u8]>::is_empty) {
                continue;
            }
            stats.rows += 1;

            let decoded: Vec<Cow<'_, str>> = record.iter().map(String::from_utf8_lossy).collect();
            let fields: Vec<&str> = decoded.iter().map(AsRef::as_ref).collect();
            match self.parser.parse(&fields) {
                Ok(raw) => {
                    let observation = self.observe(raw);
                    if observation.price.is_none() {
                        stats.unpriced += 1;
                    }
                    observations.push(observation);
                }
                Err(e) => {
                    stats.rejected += 1;
                    let line = record.position().map_or(0, |p| p.line());
                    debug!("Dropping feed line {}: {}", line, e);
                }
            }
        }

        let series = Series::new(observations, stats);
        debug!(
            "Loaded {} observations from {} ({} rows, {} rejected, {} without price)",
            series.len(),
            self.path.display(),
            stats.rows,
            stats.rejected,
            stats.unpriced
        );
        series
    }

    /// 将候选记录归一化为观测记录
    fn observe(&self, raw: RawRecord) -> Observation {
        let price = raw
            .price
            .as_deref()
            .and_then(|t| normalize(t, self.format).ok());
        let variation_value = raw
            .variation
            .as_deref()
            .and_then(|t| normalize(t, self.format).ok());

        Observation {
            timestamp: raw.timestamp,
            price,
            price_text: raw.price,
            variation: raw.variation,
            variation_value,
            previous_close: raw.previous_close,
            open: raw.open,
            variation_1y: raw.variation_1y,
            volume: raw.volume,
            avg_volume_3m: raw.avg_volume_3m,
            day_range: raw.day_range,
            week52_range: raw.week52_range,
            sentiment: raw.sentiment,
        }
    }

    /// 读取文件内容，文件不存在时返回 None
    fn read_bytes(&self) -> Result<Option<Vec<u8>>, FeedError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FeedError::ResourceUnavailable(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

impl FeedSource for FileFeed {
    fn load(&self) -> Series {
        match self.read_bytes() {
            Ok(Some(bytes)) if !bytes.is_empty() => self.parse_bytes(&bytes),
            Ok(_) => {
                debug!("Feed {} is absent or empty", self.path.display());
                Series::empty()
            }
            Err(e) => {
                warn!("Failed to read feed, serving empty series: {}", e);
                Series::empty()
            }
        }
    }

    fn modified_at(&self) -> Result<Option<SystemTime>, FeedError> {
        match fs::metadata(&self.path) {
            Ok(meta) => meta
                .modified()
                .map(Some)
                .map_err(|e| FeedError::ResourceUnavailable(e.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FeedError::ResourceUnavailable(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
