//! 浏览器能力 trait 的 chromiumoxide 实现

use crate::browser::session::{BrowserSession, DomElement, PageContext};
use crate::error::BrowserError;
use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, Page};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// 运行中的浏览器及其 CDP 事件处理任务
pub struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    /// 进程由本会话启动，也由本会话关闭
    launched: bool,
}

impl ChromiumSession {
    pub(crate) fn new(browser: Browser, handler_task: JoinHandle<()>, launched: bool) -> Self {
        Self {
            browser,
            handler_task,
            launched,
        }
    }

    /// 停止事件循环；浏览器由本会话启动时一并关闭
    pub async fn shutdown(mut self) {
        if self.launched {
            if let Err(e) = self.browser.close().await {
                debug!("closing browser failed: {}", e);
            }
            if let Err(e) = self.browser.wait().await {
                debug!("waiting for browser exit failed: {}", e);
            }
        }
        self.handler_task.abort();
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    type Page = ChromiumPage;

    async fn open_page(&self) -> Result<ChromiumPage, BrowserError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::PageOpenFailed(e.to_string()))?;
        Ok(ChromiumPage { page })
    }
}

pub struct ChromiumPage {
    page: Page,
}

impl ChromiumPage {
    /// 执行 JS 表达式，忽略返回值
    async fn eval(&self, js_code: String) -> Result<(), BrowserError> {
        self.page
            .evaluate(js_code)
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::ScriptFailed(e.to_string()))
    }
}

#[async_trait]
impl PageContext for ChromiumPage {
    type Element = ChromiumElement;

    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), BrowserError> {
        debug!("navigating to {}", url);
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            // CDP handler 先放弃了这次导航
            Ok(Err(CdpError::Timeout)) => Err(BrowserError::NavigationTimeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
            Ok(Err(e)) => Err(BrowserError::NavigationFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(BrowserError::NavigationTimeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ChromiumElement>, BrowserError> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| BrowserError::query_failed(selector, e))?;
        Ok(elements.into_iter().map(|element| ChromiumElement { element }).collect())
    }

    async fn scroll_by(&self, delta_y: f64) -> Result<(), BrowserError> {
        self.eval(format!("window.scrollBy(0, {})", delta_y)).await
    }

    async fn close(self) -> Result<(), BrowserError> {
        self.page.close().await.map_err(|e| {
            warn!("closing page failed: {}", e);
            BrowserError::PageClosed
        })
    }
}

pub struct ChromiumElement {
    element: Element,
}

#[async_trait]
impl DomElement for ChromiumElement {
    async fn query_all(&self, selector: &str) -> Result<Vec<ChromiumElement>, BrowserError> {
        let found = self
            .element
            .find_elements(selector)
            .await
            .map_err(|e| BrowserError::query_failed(selector, e))?;
        Ok(found.into_iter().map(|element| ChromiumElement { element }).collect())
    }

    async fn inner_text(&self) -> Result<String, BrowserError> {
        let text = self
            .element
            .inner_text()
            .await
            .map_err(|e| BrowserError::query_failed("innerText", e))?;
        Ok(text.unwrap_or_default())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, BrowserError> {
        self.element
            .attribute(name)
            .await
            .map_err(|e| BrowserError::query_failed(name, e))
    }
}
