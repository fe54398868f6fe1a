use async_trait::async_trait;
use bourse_core::config::AcquisitionConfig;
use bourse_core::refresh::error::RefreshError;
use bourse_core::refresh::port::Acquirer;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// # Summary
/// 通过外部脚本完成数据采集的实现。
///
/// # Invariants
/// - 子进程以 `kill_on_drop` 方式启动，调用方放弃等待（例如超时）时子进程随之终止。
/// - 仅依据退出状态判断成功与否，脚本输出只用于诊断。
#[derive(Debug, Clone)]
pub struct ScriptAcquirer {
    // 可执行程序
    program: String,
    // 命令行参数
    args: Vec<String>,
    // 工作目录
    working_dir: Option<PathBuf>,
}

impl ScriptAcquirer {
    pub fn new(program: impl Into<String>, args: Vec<String>, working_dir: Option<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir,
        }
    }

    pub fn from_config(config: &AcquisitionConfig) -> Self {
        Self::new(
            config.program.clone(),
            config.args.clone(),
            config.working_dir.as_ref().map(PathBuf::from),
        )
    }
}

#[async_trait]
impl Acquirer for ScriptAcquirer {
    /// # Summary
    /// 运行采集脚本并等待其结束。
    ///
    /// # Logic
    /// 1. 以空标准输入启动子进程，捕获标准输出与标准错误。
    /// 2. 启动失败映射为 `RefreshError::Failed`。
    /// 3. 非零退出状态映射为 `RefreshError::Failed`，附带标准错误的最后一行。
    ///
    /// # Returns
    /// 退出状态为成功时返回 Ok。
    async fn acquire(&self) -> Result<(), RefreshError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        info!("Running acquisition script {}", self.program);
        let output = command
            .output()
            .await
            .map_err(|e| RefreshError::Failed(format!("cannot start {}: {}", self.program, e)))?;

        if output.status.success() {
            debug!("Acquisition script {} finished", self.program);
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr.lines().rev().find(|l| !l.trim().is_empty());
        Err(RefreshError::Failed(match detail {
            Some(line) => format!("{} exited with {}: {}", self.program, output.status, line.trim()),
            None => format!("{} exited with {}", self.program, output.status),
        }))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str) -> ScriptAcquirer {
        ScriptAcquirer::new("sh", vec!["-c".to_string(), script.to_string()], None)
    }

    #[tokio::test]
    async fn test_successful_script() {
        assert_eq!(shell("exit 0").acquire().await, Ok(()));
    }

    #[tokio::test]
    async fn test_failing_script_reports_stderr() {
        let result = shell("echo 'quote page unreachable' >&2; exit 3").acquire().await;
        match result {
            Err(RefreshError::Failed(reason)) => {
                assert!(reason.contains("quote page unreachable"), "{}", reason);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_program() {
        let acquirer = ScriptAcquirer::new("./definitely-not-here.sh", Vec::new(), None);
        assert!(matches!(
            acquirer.acquire().await,
            Err(RefreshError::Failed(_))
        ));
    }
}
