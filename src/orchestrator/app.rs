//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **启动**: 打印启动信息，获取浏览器（启动或连接）
//! 2. **运行**: 把浏览器交给 `run_pipeline`
//! 3. **清理**: 无论成功与否都关闭浏览器
//! 4. **统计**: 打印最终统计
//!
//! 只有本模块持有 chromium 会话。

use crate::browser::{self, ChromiumSession};
use crate::config::Config;
use crate::orchestrator::pipeline::{run_pipeline, RunReport};
use crate::utils::logging::{log_startup, print_final_stats};
use anyhow::{Context, Result};
use tracing::{error, info};

/// 应用主状态
pub struct App {
    config: Config,
    session: ChromiumSession,
}

impl App {
    /// 启动或连接浏览器
    ///
    /// 没有可用浏览器时在抓取前失败，错误信息
    /// 中带有安装提示。
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let session = browser::open_session(&config).await.map_err(|e| {
            error!("❌ {}", e);
            e
        })?;

        Ok(Self { config, session })
    }

    /// 执行一次抓取并关闭浏览器
    pub async fn run(self) -> Result<RunReport> {
        let App { config, session } = self;

        let result = run_pipeline(&session, &config).await;
        session.shutdown().await;

        let report = result
            .map_err(|e| {
                error!("❌ Run aborted: {}", e);
                e
            })
            .context("scrape failed")?;

        print_final_stats(
            report.schedule.succeeded,
            report.schedule.failed,
            report.schedule.total,
            &report.output_path.display().to_string(),
        );
        info!("⏱️ Elapsed: {:.1}s", report.elapsed.as_secs_f64());

        Ok(report)
    }
}
