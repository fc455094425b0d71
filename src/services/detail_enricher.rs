//! 创始人补全 - 服务层
//!
//! ## 职责
//!
//! - 用独立页面访问一家公司的详情页
//! - 每个创始人区块读取一个 `Founder`（姓名和主页链接保持配对）
//! - 无论发生什么，记录最终都处于终态
//!
//! `enrich` 不返回错误。所有失败都会记录日志并保存到
//! 记录上，任何路径都会关闭页面。

use crate::browser::{text_or_empty, BrowserSession, DomElement, PageContext};
use crate::config::{Config, Selectors};
use crate::error::{BrowserError, ConfigError};
use crate::models::{CompanyRecord, Founder};
use crate::utils::logging::truncate_text;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct DetailEnricher {
    selectors: Selectors,
    link_pattern: Regex,
    navigation_timeout: Duration,
    settle: Duration,
}

impl DetailEnricher {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            selectors: config.selectors.clone(),
            link_pattern: config.link_regex()?,
            navigation_timeout: config.navigation_timeout(),
            settle: config.detail_settle(),
        })
    }

    /// 原地补全 `record`
    ///
    /// `index` 是记录的发现序号，仅用于日志。
    pub async fn enrich<S: BrowserSession>(&self, session: &S, record: &mut CompanyRecord, index: usize) {
        let position = index + 1;

        if record.url().is_empty() {
            warn!("[{}] ⚠️ Failed to scrape {}: missing detail url", position, record.name());
            record.mark_failed("missing detail url");
            return;
        }

        let outcome = self.fetch_founders(session, record.url()).await;
        match outcome {
            Ok(founders) => {
                let count = founders.len();
                record.mark_succeeded(founders);
                info!("[{}] ✅ {} | Founders: {}", position, record.name(), count);
            }
            Err(e) => {
                let reason = e.to_string();
                warn!(
                    "[{}] ⚠️ Failed to scrape {}: {}",
                    position,
                    record.name(),
                    truncate_text(&reason, 200)
                );
                record.mark_failed(reason);
            }
        }
    }

    async fn fetch_founders<S: BrowserSession>(&self, session: &S, url: &str) -> Result<Vec<Founder>, BrowserError> {
        let page = session.open_page().await?;
        let outcome = self.read_founders(&page, url).await;
        if let Err(e) = page.close().await {
            debug!("closing detail page {} failed: {}", url, e);
        }
        outcome
    }

    async fn read_founders<P: PageContext>(&self, page: &P, url: &str) -> Result<Vec<Founder>, BrowserError> {
        page.navigate(url, self.navigation_timeout).await?;
        page.wait(self.settle).await;

        let blocks = page.query_all(&self.selectors.founder_block).await?;
        let mut founders = Vec::new();
        for block in &blocks {
            let founder = self.read_founder(block).await;
            if !founder.is_empty() {
                founders.push(founder);
            }
        }
        Ok(founders)
    }

    async fn read_founder<E: DomElement>(&self, block: &E) -> Founder {
        let name = text_or_empty(block, &self.selectors.founder_name).await;
        let link = self.profile_link(block).await;
        Founder::new(Some(name), link)
    }

    /// 区块内第一个 href 符合链接规则的主页链接
    async fn profile_link<E: DomElement>(&self, block: &E) -> Option<String> {
        let anchors = block.query_all(&self.selectors.founder_link).await.ok()?;
        for anchor in &anchors {
            if let Ok(Some(href)) = anchor.attribute("href").await {
                let href = href.trim();
                if self.link_pattern.is_match(href) {
                    return Some(href.to_string());
                }
            }
        }
        None
    }
}
