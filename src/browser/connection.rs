use crate::browser::chromium::ChromiumSession;
use crate::config::Config;
use crate::error::BrowserError;
use chromiumoxide::handler::HandlerConfig;
use chromiumoxide::Browser;
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 连接已有浏览器时的 CDP handler 配置
pub fn handler_config(config: &Config) -> HandlerConfig {
    HandlerConfig {
        request_timeout: config.browser_request_timeout(),
        ..HandlerConfig::default()
    }
}

/// 连接以 `--remote-debugging-port` 启动的浏览器
pub async fn connect_to_browser(port: u16, config: &Config) -> Result<ChromiumSession, BrowserError> {
    let browser_url = format!("http://localhost:{}", port);
    info!("🔌 Connecting to browser: {}", browser_url);

    let (browser, mut handler) = Browser::connect_with_config(&browser_url, handler_config(config))
        .await
        .map_err(|e| {
            error!("Connecting to browser failed: {}", e);
            BrowserError::connection_failed(port, e.to_string())
        })?;
    debug!("Browser connected");

    // 在后台处理 CDP 事件
    let handler_task = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 等待浏览器同步 target 状态
    sleep(tokio::time::Duration::from_millis(300)).await;

    Ok(ChromiumSession::new(browser, handler_task, false))
}
