//! 日志工具
//!
//! subscriber 初始化，以及运行各阶段打印的横幅信息

use crate::config::{Config, ScheduleMode};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 安装全局 fmt subscriber
///
/// 设置了 `RUST_LOG` 时以其为准；否则为 `info`，verbose 时为 `debug`。
pub fn init(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // 重复初始化（例如测试中）不会出错
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 Company directory scraper starting");
    info!("🌐 Directory: {}", config.entry_url);
    info!(
        "📊 Max concurrent pages: {} ({})",
        config.max_concurrent_pages,
        schedule_label(config.schedule_mode)
    );
    info!("{}", "=".repeat(60));
}

/// # 参数
/// - `total`: 发现的公司数
/// - `max_concurrent`: 并发上限
/// - `mode`: 调度模式
pub fn log_listings_loaded(total: usize, max_concurrent: usize, mode: ScheduleMode) {
    info!("✓ {} companies queued for founder lookup", total);
    match mode {
        ScheduleMode::Windowed => {
            info!("📋 Processing in windows of {}", max_concurrent);
            info!("💡 Each window finishes before the next one starts\n");
        }
        ScheduleMode::Pool => {
            info!("📋 Processing with up to {} pages open at once\n", max_concurrent);
        }
    }
}

/// # 参数
/// - `window_num`: 窗口序号（从 1 开始）
/// - `total_windows`: 窗口总数
/// - `start` / `end`: 窗口覆盖的记录序号（从 1 开始）
/// - `total`: 记录总数
pub fn log_window_start(window_num: usize, total_windows: usize, start: usize, end: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 Window {}/{}", window_num, total_windows);
    info!("📄 Companies {}-{} of {}", start, end, total);
    info!("{}", "=".repeat(60));
}

pub fn log_window_complete(window_num: usize, success: usize, total: usize) {
    info!("{}", "─".repeat(60));
    info!("✓ Window {} done: {}/{} enriched", window_num, success, total);
    info!("{}", "─".repeat(60));
}

/// # 参数
/// - `succeeded` / `failed` / `total`: 记录数
/// - `output_path`: 结果写入位置
pub fn print_final_stats(succeeded: usize, failed: usize, total: usize, output_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 Run complete");
    info!("Finished at: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("{}", "=".repeat(60));
    info!("✅ Enriched: {}/{}", succeeded, total);
    info!("❌ Failed: {}", failed);
    info!("{}", "=".repeat(60));
    info!("✅ Saved to {}", output_path);
}

/// 截断日志中的长文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

fn schedule_label(mode: ScheduleMode) -> &'static str {
    match mode {
        ScheduleMode::Pool => "pool",
        ScheduleMode::Windowed => "windowed",
    }
}
