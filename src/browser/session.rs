//! 浏览器能力边界
//!
//! 抓取逻辑只通过这三个 trait 访问浏览器。
//! `chromium.rs` 中的 chromiumoxide 适配器用于真实运行；测试
//! 提供内存实现。
//!
//! ## 资源规则
//!
//! - 一个 `PageContext` 只属于一个调用方，不共享
//! - `open_page` 返回的每个页面都必须通过 `close` 归还

use crate::error::BrowserError;
use async_trait::async_trait;
use std::time::Duration;

/// 可分配独立页面的浏览器
#[async_trait]
pub trait BrowserSession: Send + Sync {
    type Page: PageContext;

    /// 打开一个没有导航历史的新页面
    async fn open_page(&self) -> Result<Self::Page, BrowserError>;
}

/// 一个浏览器标签页
#[async_trait]
pub trait PageContext: Sized + Send + Sync {
    type Element: DomElement;

    /// 导航并等待文档加载；超过 `timeout` 放弃
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), BrowserError>;

    /// 所有匹配 `selector` 的元素，按文档顺序
    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, BrowserError>;

    /// 视口滚动 `delta_y` 像素
    async fn scroll_by(&self, delta_y: f64) -> Result<(), BrowserError>;

    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn close(self) -> Result<(), BrowserError>;
}

/// 已渲染元素的句柄
#[async_trait]
pub trait DomElement: Sized + Send + Sync {
    /// 所有匹配 `selector` 的后代元素，按文档顺序
    async fn query_all(&self, selector: &str) -> Result<Vec<Self>, BrowserError>;

    /// 第一个匹配 `selector` 的后代元素
    async fn query_one(&self, selector: &str) -> Result<Option<Self>, BrowserError> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    /// 渲染后的文本，没有时为空
    async fn inner_text(&self) -> Result<String, BrowserError>;

    async fn attribute(&self, name: &str) -> Result<Option<String>, BrowserError>;
}

/// `scope` 下第一个 `selector` 匹配的文本，任何部分缺失时为 ""
pub async fn text_or_empty<E: DomElement>(scope: &E, selector: &str) -> String {
    match scope.query_one(selector).await {
        Ok(Some(el)) => el.inner_text().await.map(|t| t.trim().to_string()).unwrap_or_default(),
        _ => String::new(),
    }
}
