use crate::common::{UNAVAILABLE, fmt_price, or_unavailable};
use crate::feed::entity::Observation;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// # Summary
/// 涨跌方向，由涨跌幅的符号决定，供展示层着色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
    Flat,
    Unknown,
}

impl Trend {
    /// 根据归一化后的涨跌幅判断方向
    pub fn from_variation(value: Option<f64>) -> Self {
        match value {
            Some(v) if v > 0.0 => Trend::Up,
            Some(v) if v < 0.0 => Trend::Down,
            Some(_) => Trend::Flat,
            None => Trend::Unknown,
        }
    }
}

/// # Summary
/// 最新行情快照，即序列中最后一条观测。
///
/// # Invariants
/// - 序列为空时所有字段均为 `None`，渲染为 `N/A`。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: Option<NaiveDateTime>,
    pub price: Option<f64>,
    pub price_text: Option<String>,
    pub variation: Option<String>,
    pub variation_value: Option<f64>,
    pub previous_close: Option<String>,
    pub open: Option<String>,
    pub variation_1y: Option<String>,
    pub volume: Option<String>,
    pub avg_volume_3m: Option<String>,
    pub day_range: Option<String>,
    pub week52_range: Option<String>,
    pub sentiment: Option<String>,
}

impl Snapshot {
    /// 全部字段不可用的快照
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn is_available(&self) -> bool {
        self.timestamp.is_some()
    }

    pub fn trend(&self) -> Trend {
        Trend::from_variation(self.variation_value)
    }

    /// 价格展示文本：优先使用原始文本
    pub fn price_display(&self) -> String {
        match &self.price_text {
            Some(text) => text.clone(),
            None => fmt_price(self.price),
        }
    }

    pub fn variation_display(&self) -> &str {
        or_unavailable(&self.variation)
    }

    pub fn timestamp_display(&self) -> String {
        self.timestamp
            .map(|t| t.to_string())
            .unwrap_or_else(|| UNAVAILABLE.to_string())
    }
}

impl From<&Observation> for Snapshot {
    fn from(o: &Observation) -> Self {
        Self {
            timestamp: Some(o.timestamp),
            price: o.price,
            price_text: o.price_text.clone(),
            variation: o.variation.clone(),
            variation_value: o.variation_value,
            previous_close: o.previous_close.clone(),
            open: o.open.clone(),
            variation_1y: o.variation_1y.clone(),
            volume: o.volume.clone(),
            avg_volume_3m: o.avg_volume_3m.clone(),
            day_range: o.day_range.clone(),
            week52_range: o.week52_range.clone(),
            sentiment: o.sentiment.clone(),
        }
    }
}

/// # Summary
/// 单日行情汇总。
///
/// # Invariants
/// - `volatility >= 0`。
/// - `open == 0` 时 `evolution_percent == 0`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    // 统计日期
    pub date: NaiveDate,
    // 当日第一条可用价格
    pub open: f64,
    // 当日最后一条可用价格
    pub close: f64,
    // 当日最高价与最低价之差
    pub volatility: f64,
    // (close - open) / open * 100
    pub evolution_percent: f64,
    // 参与计算的观测数
    pub samples: usize,
}

/// # Summary
/// 日报计算结果：当日无可用价格时为 `NoData`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DailyReport {
    NoData,
    Ready(DailySummary),
}

/// # Summary
/// 日报展示视图：截止时刻之前为 `Pending`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReportView {
    Pending { cutover_hour: u32 },
    Ready(DailyReport),
}

/// 渲染后的日报文本字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFields {
    pub open: String,
    pub close: String,
    pub volatility: String,
    pub evolution: String,
}

impl ReportFields {
    fn uniform(text: &str) -> Self {
        Self {
            open: text.to_string(),
            close: text.to_string(),
            volatility: text.to_string(),
            evolution: text.to_string(),
        }
    }
}

impl DailyReport {
    /// # Summary
    /// 将日报渲染为展示文本。
    ///
    /// # Logic
    /// 1. 数值保留两位小数，涨跌幅追加 `%`。
    /// 2. `NoData` 的每个字段都渲染为 `N/A`。
    pub fn render(&self) -> ReportFields {
        match self {
            DailyReport::NoData => ReportFields::uniform(UNAVAILABLE),
            DailyReport::Ready(s) => ReportFields {
                open: format!("{:.2}", s.open),
                close: format!("{:.2}", s.close),
                volatility: format!("{:.2}", s.volatility),
                evolution: format!("{:.2}%", s.evolution_percent),
            },
        }
    }
}

impl ReportView {
    pub fn render(&self) -> ReportFields {
        match self {
            ReportView::Pending { cutover_hour } => {
                ReportFields::uniform(&format!("Pending ({:02}:00)", cutover_hour))
            }
            ReportView::Ready(report) => report.render(),
        }
    }
}

/// # Summary
/// 某一时刻合成的完整看板数据：快照、日报视图与最近一次确认新鲜的时间。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub snapshot: Snapshot,
    pub report: ReportView,
    pub computed_at: NaiveDateTime,
    pub last_fresh: Option<NaiveDateTime>,
}
