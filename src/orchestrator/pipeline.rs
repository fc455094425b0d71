//! 一次完整抓取：发现、补全、写出
//!
//! 对浏览器泛型，生产环境跑 chromium，
//! 测试中跑内存浏览器，走同一条路径。

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::CompanyRecord;
use crate::orchestrator::batch_scheduler::{BatchScheduler, ScheduleReport};
use crate::services::{DetailEnricher, ListingDiscoverer, ResultSink};
use crate::utils::logging::log_listings_loaded;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// 一次运行的全部产出
#[derive(Debug)]
pub struct RunReport {
    /// 按发现顺序
    pub records: Vec<CompanyRecord>,
    pub schedule: ScheduleReport,
    pub output_path: PathBuf,
    pub elapsed: Duration,
}

/// 用 `session` 执行整个抓取
///
/// 只在致命情况下返回错误：配置错误、列表页
/// 加载失败或输出文件写入失败。发现阶段失败时
/// 不写任何文件。
pub async fn run_pipeline<S: BrowserSession>(session: &S, config: &Config) -> AppResult<RunReport> {
    let started = Instant::now();

    let discoverer = ListingDiscoverer::new(config);
    let enricher = DetailEnricher::new(config)?;
    let scheduler = BatchScheduler::from_config(config);
    let sink = ResultSink::from_config(config);

    // 记录列表只属于本次运行
    let mut records = discoverer.discover(session).await?;
    if records.is_empty() {
        warn!("⚠️ No companies found on the directory page");
    }

    log_listings_loaded(records.len(), config.max_concurrent_pages, config.schedule_mode);
    info!("👥 Scraping founder details concurrently...");
    let schedule = scheduler.run(&enricher, session, &mut records).await;

    let output_path = sink.write(&records)?;

    Ok(RunReport {
        records,
        schedule,
        output_path,
        elapsed: started.elapsed(),
    })
}
