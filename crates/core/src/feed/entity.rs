use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 行情文件中时间戳字段的固定格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 每行至少需要的列数
pub const MIN_COLUMNS: usize = 11;

/// # Summary
/// 行情文件的列分隔符，通过配置显式指定，不做自动探测。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Comma,
    Semicolon,
}

impl Delimiter {
    /// 返回分隔符对应的单字节
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
        }
    }
}

/// # Summary
/// 数值文本的区域格式规则。
///
/// # Invariants
/// - `Continental`：点号为千分位、逗号为小数点（例如 `7.512,30`）。
/// - `Plain`：点号为小数点，文本直接交给数值解析。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberFormat {
    Plain,
    Continental,
}

impl NumberFormat {
    /// # Summary
    /// 按当前规则渲染数值，渲染结果再次归一化后得到同一数值。
    pub fn render(self, value: f64) -> String {
        match self {
            NumberFormat::Plain => value.to_string(),
            NumberFormat::Continental => value.to_string().replace('.', ","),
        }
    }
}

/// # Summary
/// 价格列与涨跌幅列的排列方式。
///
/// # Invariants
/// - 上游采集脚本的不同版本对这两列的顺序不一致，必须由配置显式选择。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnLayout {
    // timestamp, price, variation, ...
    Standard,
    // timestamp, variation, price, ...
    SwappedPriceVariation,
}

impl ColumnLayout {
    /// 返回 (价格列下标, 涨跌幅列下标)
    pub fn price_variation_columns(self) -> (usize, usize) {
        match self {
            ColumnLayout::Standard => (1, 2),
            ColumnLayout::SwappedPriceVariation => (2, 1),
        }
    }
}

/// # Summary
/// 单条行情观测记录。
///
/// # Invariants
/// - `timestamp` 必然合法，无法解析时间戳的行不会生成 Observation。
/// - `price` 为 `None` 表示原始价格无法归一化，该记录不参与价格计算。
/// - 其余展示字段原样透传，缺失以 `None` 表示。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    // 观测时间（本地挂钟时间）
    pub timestamp: NaiveDateTime,
    // 归一化后的价格
    pub price: Option<f64>,
    // 原始价格文本
    pub price_text: Option<String>,
    // 原始涨跌幅文本，例如 "+0,45%" 或 "(0,45%)"
    pub variation: Option<String>,
    // 归一化后的涨跌幅，仅用于判断方向
    pub variation_value: Option<f64>,
    // 前收盘价
    pub previous_close: Option<String>,
    // 开盘价
    pub open: Option<String>,
    // 一年涨跌幅
    pub variation_1y: Option<String>,
    // 成交量
    pub volume: Option<String>,
    // 三个月平均成交量
    pub avg_volume_3m: Option<String>,
    // 日内区间
    pub day_range: Option<String>,
    // 52 周区间
    pub week52_range: Option<String>,
    // 技术面情绪
    pub sentiment: Option<String>,
}

/// # Summary
/// 单次加载的统计信息。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    // 读取到的非空行数
    pub rows: usize,
    // 因格式错误被丢弃的行数
    pub rejected: usize,
    // 保留但价格不可用的行数
    pub unpriced: usize,
}

/// 图表使用的价格点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub price: f64,
}

/// # Summary
/// 按时间排序的不可变观测序列。
///
/// # Invariants
/// - 构造时按 `timestamp` 稳定排序，之后不再修改。
/// - 每次加载都整体重建，不做增量更新。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    observations: Vec<Observation>,
    stats: LoadStats,
}

impl Series {
    /// # Summary
    /// 由任意顺序的观测记录构造序列。
    ///
    /// # Logic
    /// 1. 使用稳定排序按时间戳升序排列，相同时间戳保持原始文件顺序。
    ///
    /// # Arguments
    /// * `observations`: 解析得到的观测记录。
    /// * `stats`: 本次加载的统计信息。
    ///
    /// # Returns
    /// 有序序列。
    pub fn new(mut observations: Vec<Observation>, stats: LoadStats) -> Self {
        observations.sort_by_key(|o| o.timestamp);
        Self {
            observations,
            stats,
        }
    }

    /// 空序列（冷启动或读取失败时使用）
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    /// 最新的一条观测
    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    /// # Summary
    /// 提取所有价格可用的观测，作为价格曲线数据。
    pub fn price_points(&self) -> Vec<PricePoint> {
        self.observations
            .iter()
            .filter_map(|o| {
                o.price.map(|price| PricePoint {
                    timestamp: o.timestamp,
                    price,
                })
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}
