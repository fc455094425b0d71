//! 批量调度器 - 编排层
//!
//! ## 职责
//!
//! 对每条记录执行一次 `DetailEnricher::enrich`，同时最多打开 N 个页面，
//! 最后汇报成功数量。
//!
//! ## 模式
//!
//! - **Pool**: 每条记录等待 N 个信号量许可之一；记录完成后
//!   立即把许可让给下一条
//! - **Windowed**: 记录按 N 条切成连续窗口；窗口内全部并发，
//!   整个窗口结束后才开始下一个窗口
//!
//! 所有 enricher 都是在调用方任务上 join 的 future，不 spawn。每个
//! 只拿到自己记录的 `&mut`，记录无需加锁。

use crate::browser::BrowserSession;
use crate::config::{Config, ScheduleMode};
use crate::models::{CompanyRecord, EnrichmentStatus};
use crate::services::DetailEnricher;
use crate::utils::logging::{log_window_complete, log_window_start};
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::error;

/// 一次调度的结果统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScheduleReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// 仍为 `Pending` 的记录数；`run` 之后恒为 0
    pub unfinished: usize,
    /// 使用的窗口数（仅 windowed 模式）
    pub windows: usize,
}

impl ScheduleReport {
    fn tally(records: &[CompanyRecord], windows: usize) -> Self {
        let mut report = ScheduleReport {
            total: records.len(),
            windows,
            ..Default::default()
        };
        for record in records {
            match record.status {
                EnrichmentStatus::Succeeded { .. } => report.succeeded += 1,
                EnrichmentStatus::Failed { .. } => report.failed += 1,
                EnrichmentStatus::Pending => report.unfinished += 1,
            }
        }
        report
    }
}

pub struct BatchScheduler {
    mode: ScheduleMode,
    max_concurrent: usize,
}

impl BatchScheduler {
    /// `max_concurrent` 小于 1 时按 1 处理
    pub fn new(mode: ScheduleMode, max_concurrent: usize) -> Self {
        Self {
            mode,
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.schedule_mode, config.max_concurrent_pages)
    }

    /// 处理所有记录；返回时每条记录都处于终态
    pub async fn run<S: BrowserSession>(
        &self,
        enricher: &DetailEnricher,
        session: &S,
        records: &mut [CompanyRecord],
    ) -> ScheduleReport {
        let windows = match self.mode {
            ScheduleMode::Windowed => self.run_windowed(enricher, session, records).await,
            ScheduleMode::Pool => {
                self.run_pool(enricher, session, records).await;
                0
            }
        };

        let report = ScheduleReport::tally(records, windows);
        if report.unfinished > 0 {
            error!("{} records were left unprocessed", report.unfinished);
        }
        report
    }

    async fn run_windowed<S: BrowserSession>(
        &self,
        enricher: &DetailEnricher,
        session: &S,
        records: &mut [CompanyRecord],
    ) -> usize {
        let total = records.len();
        let total_windows = total.div_ceil(self.max_concurrent);

        for (window_idx, window) in records.chunks_mut(self.max_concurrent).enumerate() {
            let window_start = window_idx * self.max_concurrent;
            let window_len = window.len();
            log_window_start(
                window_idx + 1,
                total_windows,
                window_start + 1,
                window_start + window_len,
                total,
            );

            join_all(
                window
                    .iter_mut()
                    .enumerate()
                    .map(|(offset, record)| enricher.enrich(session, record, window_start + offset)),
            )
            .await;

            let success = window
                .iter()
                .filter(|r| matches!(r.status, EnrichmentStatus::Succeeded { .. }))
                .count();
            log_window_complete(window_idx + 1, success, window_len);
        }

        total_windows
    }

    async fn run_pool<S: BrowserSession>(
        &self,
        enricher: &DetailEnricher,
        session: &S,
        records: &mut [CompanyRecord],
    ) {
        let semaphore = Semaphore::new(self.max_concurrent);
        let semaphore = &semaphore;

        let tasks = records.iter_mut().enumerate().map(|(index, record)| async move {
            let _permit = match semaphore.acquire().await {
                Ok(permit) => permit,
                Err(e) => {
                    record.mark_failed(format!("scheduler unavailable: {}", e));
                    return;
                }
            };
            enricher.enrich(session, record, index).await;
        });

        join_all(tasks).await;
    }
}
