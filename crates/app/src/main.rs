mod settings;
mod telemetry;

use std::sync::Arc;

use bourse_core::common::time::RealTimeProvider;
use bourse_core::report::entity::Board;
use bourse_feed::loader::FileFeed;
use bourse_feed::script::ScriptAcquirer;
use bourse_manager::dashboard::Dashboard;
use bourse_manager::scheduler::RefreshScheduler;
use tracing::{info, warn};

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化具体的行情文件、采集脚本与时钟，并通过 Arc<dyn Trait> 注入到调度器。
///
/// # Logic
/// 1. 分层加载配置。
/// 2. 初始化全局日志。
/// 3. 实例化基础设施层（FileFeed、ScriptAcquirer、RealTimeProvider）。
/// 4. 构造应用服务层（RefreshScheduler、Dashboard）并启动调度循环。
/// 5. 每次看板更新时以 JSON 记录日志，直到收到退出信号。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 加载配置
    let config_path = settings::config_path();
    let config = settings::load(&config_path)?;

    // 2. 初始化日志，守卫需存活到进程结束
    let _log_guard = telemetry::init(&config.logging);
    info!("Bourse starting (config {})", config_path.display());

    // 3. 实例化基础设施层
    let feed = Arc::new(FileFeed::from_config(&config.feed));
    let acquirer = Arc::new(ScriptAcquirer::from_config(&config.acquisition));
    let clock = Arc::new(RealTimeProvider);

    // 4. 构造应用服务层
    let scheduler = RefreshScheduler::new(
        feed.clone(),
        acquirer,
        clock,
        config.schedule,
    );
    let dashboard = Dashboard::new(feed, scheduler.clone());
    log_board(&scheduler.board());
    info!(
        "Next periodic refresh in {:?}",
        dashboard.countdown_remaining(scheduler.started_at())
    );

    let mut boards = scheduler.subscribe();
    let scheduler_task = scheduler.spawn();
    info!("Refresh scheduler running. Waiting for signals...");

    // 5. 挂起主线程，记录看板更新直到退出信号
    loop {
        tokio::select! {
            changed = boards.changed() => {
                if changed.is_err() {
                    warn!("Board channel closed");
                    break;
                }
                let board = boards.borrow_and_update().clone();
                log_board(&board);
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Shutdown signal received. Exiting...");
                break;
            }
        }
    }

    scheduler_task.abort();
    Ok(())
}

fn log_board(board: &Board) {
    match serde_json::to_string(board) {
        Ok(json) => info!("Board: {}", json),
        Err(e) => warn!("Cannot serialize board: {}", e),
    }
}
