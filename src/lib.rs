//! # Founder Scraper
//!
//! 抓取懒加载的公司目录，再访问每家公司的
//! 详情页，收集创始人及其 LinkedIn 主页。
//!
//! ## 架构
//!
//! ### ① 浏览器层
//! - `browser/` - 能力 trait（`BrowserSession`、`PageContext`、`DomElement`）
//!   及其 chromiumoxide 实现
//!
//! ### ② 服务层
//! - `ListingDiscoverer` - 滚动目录页并读取列表卡片
//! - `DetailEnricher` - 读取单家公司的创始人，从不向外报错
//! - `ResultSink` - 写出最终的 csv / json 文件
//!
//! ### ③ 编排层
//! - `BatchScheduler` - 对所有记录做有上限的并发处理
//! - `run_pipeline` - 一次运行的发现 → 补全 → 写出
//! - `App` - 浏览器生命周期和控制台统计

pub mod browser;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

pub use browser::{BrowserSession, DomElement, PageContext};
pub use config::{Config, OutputFormat, ScheduleMode, ScrollMode, Selectors};
pub use error::{AppError, AppResult, BrowserError};
pub use models::{CompanyRecord, CompanySummary, EnrichmentStatus, Founder};
pub use orchestrator::{run_pipeline, App, BatchScheduler, RunReport, ScheduleReport};
pub use services::{DetailEnricher, ListingDiscoverer, ResultSink};
pub use utils::logging;
