//! 浏览器层
//!
//! - `session` - 抓取逻辑依赖的能力 trait
//! - `chromium` - 这些 trait 的 chromiumoxide 实现
//! - `connection` / `headless` - 获取 `ChromiumSession` 的两种方式

pub mod chromium;
pub mod connection;
pub mod headless;
pub mod session;

pub use chromium::{ChromiumElement, ChromiumPage, ChromiumSession};
pub use connection::connect_to_browser;
pub use headless::launch_headless_browser;
pub use session::{text_or_empty, BrowserSession, DomElement, PageContext};

use crate::config::Config;
use crate::error::BrowserError;

/// 配置了调试端口则连接，否则启动
pub async fn open_session(config: &Config) -> Result<ChromiumSession, BrowserError> {
    match config.browser_debug_port {
        Some(port) => connect_to_browser(port, config).await,
        None => launch_headless_browser(config).await,
    }
}
