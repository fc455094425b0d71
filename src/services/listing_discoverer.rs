//! 列表发现 - 服务层
//!
//! 加载目录页，滚动直到懒加载列表渲染完成，
//! 再把每张卡片转换为 `CompanyRecord`。只有本模块会访问
//! 列表页，并在返回前关闭页面。

use crate::browser::{text_or_empty, BrowserSession, DomElement, PageContext};
use crate::config::{Config, ScrollMode, Selectors};
use crate::error::{AppError, AppResult, BrowserError, ConfigError};
use crate::models::{CompanyRecord, CompanySummary};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// 在 debug 级别输出的前几个 url 数量
const URL_PREVIEW_COUNT: usize = 2;

pub struct ListingDiscoverer {
    entry_url: String,
    selectors: Selectors,
    scroll_mode: ScrollMode,
    max_scroll_cycles: usize,
    quiet_scroll_cycles: usize,
    scroll_delta: f64,
    scroll_dwell: Duration,
    navigation_timeout: Duration,
    max_listings: usize,
}

impl ListingDiscoverer {
    pub fn new(config: &Config) -> Self {
        Self {
            entry_url: config.entry_url.clone(),
            selectors: config.selectors.clone(),
            scroll_mode: config.scroll_mode,
            max_scroll_cycles: config.max_scroll_cycles,
            quiet_scroll_cycles: config.quiet_scroll_cycles,
            scroll_delta: config.scroll_delta,
            scroll_dwell: config.scroll_dwell(),
            navigation_timeout: config.navigation_timeout(),
            max_listings: config.max_listings,
        }
    }

    /// 按页面顺序收集最多 `max_listings` 家公司
    ///
    /// 列表页打开或加载失败是致命错误；单张卡片
    /// 缺少的部分只会留空该字段。
    pub async fn discover<S: BrowserSession>(&self, session: &S) -> AppResult<Vec<CompanyRecord>> {
        let base = Url::parse(&self.entry_url).map_err(|e| ConfigError::InvalidEntryUrl {
            url: self.entry_url.clone(),
            reason: e.to_string(),
        })?;

        let page = session.open_page().await?;
        let result = self.discover_on(&page, &base).await;
        if let Err(e) = page.close().await {
            debug!("closing listing page failed: {}", e);
        }
        result
    }

    async fn discover_on<P: PageContext>(&self, page: &P, base: &Url) -> AppResult<Vec<CompanyRecord>> {
        info!("🌐 Opening directory: {}", self.entry_url);
        page.navigate(&self.entry_url, self.navigation_timeout)
            .await
            .map_err(|source| AppError::EntryNavigation {
                url: self.entry_url.clone(),
                source,
            })?;

        info!("📜 Scrolling and loading companies...");
        let cycles = self.load_lazy_cards(page).await;
        debug!("scrolling finished after {} cycles", cycles);

        info!("🔎 Extracting company cards...");
        let cards = page.query_all(&self.selectors.card).await?;
        info!("✓ Found {} companies", cards.len());
        if cards.len() > self.max_listings {
            info!("✂️ Keeping the first {}", self.max_listings);
        }

        let mut records = Vec::with_capacity(cards.len().min(self.max_listings));
        for (index, card) in cards.iter().take(self.max_listings).enumerate() {
            let summary = self.read_card(card, base).await;
            if index < URL_PREVIEW_COUNT {
                debug!("[{}] Scraping: {}", index + 1, summary.url);
            }
            records.push(CompanyRecord::new(summary));
        }

        Ok(records)
    }

    /// 滚动以触发懒加载；返回实际滚动轮数
    ///
    /// 滚动或计数失败会提前停止滚动；仍对
    /// 已渲染的内容进行提取。
    async fn load_lazy_cards<P: PageContext>(&self, page: &P) -> usize {
        let mut rendered = match self.scroll_mode {
            ScrollMode::Fixed => 0,
            ScrollMode::Converge => self.count_cards(page).await.unwrap_or(0),
        };
        let mut quiet = 0;

        for cycle in 1..=self.max_scroll_cycles {
            if let Err(e) = page.scroll_by(self.scroll_delta).await {
                warn!("⚠️ Scroll failed on cycle {}: {}", cycle, e);
                return cycle;
            }
            page.wait(self.scroll_dwell).await;

            if self.scroll_mode == ScrollMode::Fixed {
                continue;
            }

            let count = match self.count_cards(page).await {
                Ok(count) => count,
                Err(e) => {
                    warn!("⚠️ Counting cards failed on cycle {}: {}", cycle, e);
                    return cycle;
                }
            };
            if count > rendered {
                rendered = count;
                quiet = 0;
            } else {
                quiet += 1;
            }
            debug!("cycle {}: {} cards rendered", cycle, rendered);

            if rendered >= self.max_listings || quiet >= self.quiet_scroll_cycles {
                return cycle;
            }
        }

        self.max_scroll_cycles
    }

    async fn count_cards<P: PageContext>(&self, page: &P) -> Result<usize, BrowserError> {
        Ok(page.query_all(&self.selectors.card).await?.len())
    }

    async fn read_card<E: DomElement>(&self, card: &E, base: &Url) -> CompanySummary {
        let name = text_or_empty(card, &self.selectors.card_name).await;
        let description = text_or_empty(card, &self.selectors.card_description).await;
        let batch = text_or_empty(card, &self.selectors.card_batch).await;
        let href = card.attribute("href").await.ok().flatten();

        CompanySummary {
            name,
            batch,
            description,
            url: resolve_detail_url(base, href.as_deref()),
        }
    }
}

/// 卡片链接的绝对 url；缺失或无法解析时为 ""
pub fn resolve_detail_url(base: &Url, href: Option<&str>) -> String {
    match href.map(str::trim) {
        Some(href) if !href.is_empty() => base.join(href).map(|u| u.to_string()).unwrap_or_default(),
        _ => String::new(),
    }
}
