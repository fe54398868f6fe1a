use crate::feed::entity::{ColumnLayout, Delimiter, NumberFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub schedule: ScheduleConfig,
    pub acquisition: AcquisitionConfig,
    pub logging: LoggingConfig,
}

/// 行情文件的位置与格式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub path: String,
    pub delimiter: Delimiter,
    pub number_format: NumberFormat,
    pub layout: ColumnLayout,
}

/// 刷新调度参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    // 周期刷新间隔（秒）
    pub refresh_period_secs: u64,
    // 调度循环的 tick 间隔（毫秒）
    pub tick_millis: u64,
    // 单次采集的超时时间（秒）
    pub acquisition_timeout_secs: u64,
    // 日报截止小时（本地时间），之前显示 Pending
    pub cutover_hour: u32,
}

impl ScheduleConfig {
    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_period_secs)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(1))
    }

    pub fn acquisition_timeout(&self) -> Duration {
        Duration::from_secs(self.acquisition_timeout_secs)
    }
}

/// 外部采集脚本
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<String>,
}

/// 日志输出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    // 默认过滤规则，可被 RUST_LOG 覆盖
    pub filter: String,
    // 滚动日志目录，未设置时只输出到标准输出
    pub dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig {
                path: "cac40_data.txt".to_string(),
                delimiter: Delimiter::Semicolon,
                number_format: NumberFormat::Continental,
                layout: ColumnLayout::Standard,
            },
            schedule: ScheduleConfig {
                refresh_period_secs: 300,
                tick_millis: 1000,
                acquisition_timeout_secs: 120,
                cutover_hour: 20,
            },
            acquisition: AcquisitionConfig {
                program: "./fetch_cac40.sh".to_string(),
                args: Vec::new(),
                working_dir: None,
            },
            logging: LoggingConfig {
                filter: "info".to_string(),
                dir: None,
            },
        }
    }
}
