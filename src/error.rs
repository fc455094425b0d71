//! 错误类型，每层一个枚举。
//!
//! - `BrowserError`: 浏览器能力边界上的所有错误
//! - `ConfigError`: 加载和校验 `Config`
//! - `OutputError`: 写结果文件
//! - `AppError`: 流水线返回的总错误类型

use thiserror::Error;

/// 无法启动或连接浏览器时打印的处理提示
pub const BROWSER_INSTALL_HINT: &str = "Install Google Chrome or Chromium, or point \
CHROME_EXECUTABLE at an existing binary, or start Chrome with \
--remote-debugging-port=<port> and set BROWSER_DEBUG_PORT=<port>";

/// 连接已运行浏览器失败时打印的处理提示
pub const ATTACH_HINT: &str = "Start Chrome with --remote-debugging-port=<port> \
and make sure BROWSER_DEBUG_PORT matches, or unset BROWSER_DEBUG_PORT to \
launch a local Chrome/Chromium instead";

/// 浏览器能力错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 没有可用的浏览器程序
    #[error("browser unavailable: {reason}\n  hint: {hint}")]
    Unavailable { reason: String, hint: &'static str },

    /// 连接已运行的浏览器失败
    #[error("could not connect to browser on port {port}: {reason}\n  hint: {hint}")]
    ConnectionFailed {
        port: u16,
        reason: String,
        hint: &'static str,
    },

    #[error("failed to open page: {0}")]
    PageOpenFailed(String),

    #[error("navigation to {url} failed: {reason}")]
    NavigationFailed { url: String, reason: String },

    #[error("navigation to {url} timed out after {timeout_ms}ms")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    #[error("query `{selector}` failed: {reason}")]
    QueryFailed { selector: String, reason: String },

    #[error("script evaluation failed: {0}")]
    ScriptFailed(String),

    #[error("page is closed")]
    PageClosed,
}

impl BrowserError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        BrowserError::Unavailable {
            reason: reason.into(),
            hint: BROWSER_INSTALL_HINT,
        }
    }

    pub fn connection_failed(port: u16, reason: impl Into<String>) -> Self {
        BrowserError::ConnectionFailed {
            port,
            reason: reason.into(),
            hint: ATTACH_HINT,
        }
    }

    pub fn query_failed(selector: &str, reason: impl ToString) -> Self {
        BrowserError::QueryFailed {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {var_name}: value '{value}' is not a valid {expected}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected: &'static str,
    },

    #[error("cannot read config file {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("entry url '{url}' is invalid: {reason}")]
    InvalidEntryUrl { url: String, reason: String },

    #[error("founder link pattern is not a valid regex: {0}")]
    InvalidLinkPattern(#[from] regex::Error),

    #[error("{field} must be at least 1")]
    ZeroLimit { field: &'static str },
}

/// 结果文件错误
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// 整次运行的总错误
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Output(#[from] OutputError),

    /// 目录列表页本身无法加载，始终致命
    #[error("could not load directory listing {url}: {source}")]
    EntryNavigation {
        url: String,
        #[source]
        source: BrowserError,
    },
}

pub type AppResult<T> = Result<T, AppError>;
