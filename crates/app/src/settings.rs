use bourse_core::config::AppConfig;
use config::{Config, ConfigError, Environment, File, FileFormat};
use std::path::{Path, PathBuf};

// 配置文件路径的环境变量
pub const CONFIG_PATH_VAR: &str = "BOURSE_CONFIG";
// 未指定路径时读取的配置文件
pub const DEFAULT_CONFIG_FILE: &str = "bourse.toml";
// 覆盖配置项的环境变量前缀
pub const ENV_PREFIX: &str = "BOURSE";

/// 配置文件路径：`BOURSE_CONFIG` 优先，否则为工作目录下的 `bourse.toml`
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// # Summary
/// 分层加载应用配置。
///
/// # Logic
/// 1. 以 `AppConfig::default()` 作为最底层。
/// 2. 叠加 TOML 配置文件，文件不存在时跳过。
/// 3. 叠加 `BOURSE__` 前缀的环境变量，层级以 `__` 分隔，例如
///    `BOURSE__SCHEDULE__REFRESH_PERIOD_SECS=60`。
///
/// # Arguments
/// * `path`: 配置文件路径。
///
/// # Returns
/// 合并后的配置，文件格式错误、字段类型不符或取值越界时返回错误。
pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = Config::builder()
        .add_source(Config::try_from(&AppConfig::default())?)
        .add_source(File::from(path).format(FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;
    validate(&config)?;
    Ok(config)
}

/// # Summary
/// 校验无法由类型表达的取值范围。
///
/// # Invariants
/// - `cutover_hour` 必须在 0..=23 之内，否则日报永远停留在 Pending。
/// - `acquisition_timeout_secs` 必须大于 0，否则每次采集都会立即超时。
fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let schedule = &config.schedule;
    if schedule.cutover_hour > 23 {
        return Err(ConfigError::Message(format!(
            "schedule.cutover_hour must be between 0 and 23, got {}",
            schedule.cutover_hour
        )));
    }
    if schedule.acquisition_timeout_secs == 0 {
        return Err(ConfigError::Message(
            "schedule.acquisition_timeout_secs must be greater than 0".to_string(),
        ));
    }
    Ok(())
}
