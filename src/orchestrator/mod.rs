//! 编排层
//!
//! ## 模块
//!
//! ### `app`
//! - 在进程生命周期内持有 chromium 会话
//! - 打印启动信息和最终统计
//!
//! ### `pipeline`
//! - 一次运行：发现 → 补全 → 写出
//! - 持有该次运行的记录列表
//!
//! ### `batch_scheduler`
//! - 在并发上限内对所有记录执行详情补全
//!
//! ## 分层
//!
//! ```text
//! app (ChromiumSession)
//!     ↓
//! pipeline (Vec<CompanyRecord>)
//!     ↓
//! batch_scheduler (&mut [CompanyRecord])
//!     ↓
//! services (一次一条记录 / 一个页面)
//!     ↓
//! browser (能力 trait)
//! ```

pub mod app;
pub mod batch_scheduler;
pub mod pipeline;

pub use app::App;
pub use batch_scheduler::{BatchScheduler, ScheduleReport};
pub use pipeline::{run_pipeline, RunReport};
