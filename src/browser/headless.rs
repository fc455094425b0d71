use std::path::Path;

use crate::browser::chromium::ChromiumSession;
use crate::config::Config;
use crate::error::BrowserError;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 为本次运行启动本地 Chrome/Chromium
pub async fn launch_headless_browser(config: &Config) -> Result<ChromiumSession, BrowserError> {
    info!("🚀 Launching browser (headless: {})...", config.headless);

    let mut builder = BrowserConfig::builder()
        .args(vec!["--disable-gpu", "--no-sandbox", "--disable-dev-shm-usage"])
        .request_timeout(config.browser_request_timeout());
    if config.headless {
        builder = builder.new_headless_mode();
    } else {
        builder = builder.with_head();
    }
    if let Some(exe) = &config.chrome_executable {
        debug!("Using browser executable: {}", exe);
        builder = builder.chrome_executable(Path::new(exe));
    }

    // 找不到可执行文件时 build() 失败，即未安装的情况
    let browser_config = builder.build().map_err(|e| {
        error!("Browser configuration failed: {}", e);
        BrowserError::unavailable(e)
    })?;

    let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
        error!("Launching browser failed: {}", e);
        BrowserError::unavailable(e.to_string())
    })?;
    debug!("Browser launched");

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

    Ok(ChromiumSession::new(browser, handler_task, true))
}
