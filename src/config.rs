use crate::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// 指定可选 TOML 配置文件的环境变量
pub const CONFIG_FILE_ENV: &str = "SCRAPER_CONFIG";

/// 未设置时 chromiumoxide 自带的单命令超时
const CDP_DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// 余量，保证导航超时总是先于 CDP 超时触发
const CDP_REQUEST_MARGIN: Duration = Duration::from_secs(5);

/// 详情页调度方式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleMode {
    /// 信号量池：任一许可释放后立即开始新页面
    Pool,
    /// 固定窗口依次处理
    Windowed,
}

impl FromStr for ScheduleMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pool" => Ok(ScheduleMode::Pool),
            "windowed" | "window" | "batch" => Ok(ScheduleMode::Windowed),
            _ => Err(()),
        }
    }
}

/// 列表页触发懒加载的滚动方式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollMode {
    /// 卡片数量不再增长时停止
    Converge,
    /// 总是滚动 `max_scroll_cycles` 轮
    Fixed,
}

impl FromStr for ScrollMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "converge" => Ok(ScrollMode::Converge),
            "fixed" => Ok(ScrollMode::Fixed),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(()),
        }
    }
}

/// 目录页和详情页的 CSS 选择器
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Selectors {
    /// 每家公司一张列表卡片
    pub card: String,
    pub card_name: String,
    pub card_description: String,
    /// 批次标签，位于卡片内部
    pub card_batch: String,
    /// 详情页上每位创始人一个区块
    pub founder_block: String,
    pub founder_name: String,
    pub founder_link: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            card: "a[class*='_company']".to_string(),
            card_name: "span[class*='_coName']".to_string(),
            card_description: "span[class*='_coDescription']".to_string(),
            card_batch: "a[href*='?batch='] span".to_string(),
            founder_block: "div[class*='min-w-0']".to_string(),
            founder_name: "div[class*='font-bold']".to_string(),
            founder_link: "a[href*='linkedin.com/in']".to_string(),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// 目录列表页
    pub entry_url: String,
    /// 同时打开的详情页数量
    pub max_concurrent_pages: usize,
    pub schedule_mode: ScheduleMode,
    pub scroll_mode: ScrollMode,
    /// 滚动轮数上限（fixed 模式下为精确轮数）
    pub max_scroll_cycles: usize,
    /// converge 模式下连续无新卡片多少轮后停止
    pub quiet_scroll_cycles: usize,
    /// 每轮滚动距离（像素）
    pub scroll_delta: f64,
    pub scroll_dwell_ms: u64,
    /// 从列表中最多取多少家公司
    pub max_listings: usize,
    pub navigation_timeout_ms: u64,
    /// 详情页加载后等待客户端渲染的时间
    pub detail_settle_ms: u64,
    pub founder_link_pattern: String,
    pub output_path: String,
    pub output_format: OutputFormat,
    /// 连接已运行的浏览器而不是启动新的
    pub browser_debug_port: Option<u16>,
    pub chrome_executable: Option<String>,
    pub headless: bool,
    pub verbose_logging: bool,
    pub selectors: Selectors,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entry_url: "https://www.ycombinator.com/companies".to_string(),
            max_concurrent_pages: 5,
            schedule_mode: ScheduleMode::Pool,
            scroll_mode: ScrollMode::Converge,
            max_scroll_cycles: 32,
            quiet_scroll_cycles: 3,
            scroll_delta: 10_000.0,
            scroll_dwell_ms: 1500,
            max_listings: 500,
            navigation_timeout_ms: 60_000,
            detail_settle_ms: 1500,
            founder_link_pattern: r"linkedin\.com/in/".to_string(),
            output_path: "yc_startups.csv".to_string(),
            output_format: OutputFormat::Csv,
            browser_debug_port: None,
            chrome_executable: None,
            headless: true,
            verbose_logging: false,
            selectors: Selectors::default(),
        }
    }
}

impl Config {
    /// 默认值，然后 `$SCRAPER_CONFIG`（如已设置），最后环境变量覆盖
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_toml_file(Path::new(&path))?,
            _ => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用 `lookup` 返回的变量覆盖字段
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("ENTRY_URL") {
            self.entry_url = v;
        }
        if let Some(v) = parse_var(&lookup, "MAX_CONCURRENT_PAGES", "positive integer")? {
            self.max_concurrent_pages = v;
        }
        if let Some(v) = parse_var(&lookup, "SCHEDULE_MODE", "schedule mode (pool|windowed)")? {
            self.schedule_mode = v;
        }
        if let Some(v) = parse_var(&lookup, "SCROLL_MODE", "scroll mode (converge|fixed)")? {
            self.scroll_mode = v;
        }
        if let Some(v) = parse_var(&lookup, "MAX_SCROLL_CYCLES", "positive integer")? {
            self.max_scroll_cycles = v;
        }
        if let Some(v) = parse_var(&lookup, "QUIET_SCROLL_CYCLES", "integer")? {
            self.quiet_scroll_cycles = v;
        }
        if let Some(v) = parse_var(&lookup, "SCROLL_DELTA", "number")? {
            self.scroll_delta = v;
        }
        if let Some(v) = parse_var(&lookup, "SCROLL_DWELL_MS", "integer")? {
            self.scroll_dwell_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "MAX_LISTINGS", "positive integer")? {
            self.max_listings = v;
        }
        if let Some(v) = parse_var(&lookup, "NAVIGATION_TIMEOUT_MS", "integer")? {
            self.navigation_timeout_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "DETAIL_SETTLE_MS", "integer")? {
            self.detail_settle_ms = v;
        }
        if let Some(v) = lookup("OUTPUT_PATH") {
            self.output_path = v;
        }
        if let Some(v) = parse_var(&lookup, "OUTPUT_FORMAT", "output format (csv|json)")? {
            self.output_format = v;
        }
        if let Some(v) = parse_var(&lookup, "BROWSER_DEBUG_PORT", "port number")? {
            self.browser_debug_port = Some(v);
        }
        if let Some(v) = lookup("CHROME_EXECUTABLE") {
            self.chrome_executable = Some(v);
        }
        if let Some(v) = parse_var(&lookup, "HEADLESS", "boolean")? {
            self.headless = v;
        }
        if let Some(v) = parse_var(&lookup, "VERBOSE_LOGGING", "boolean")? {
            self.verbose_logging = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_pages == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_concurrent_pages",
            });
        }
        if self.max_listings == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_listings",
            });
        }
        if self.max_scroll_cycles == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_scroll_cycles",
            });
        }

        let entry = url::Url::parse(&self.entry_url).map_err(|e| ConfigError::InvalidEntryUrl {
            url: self.entry_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(entry.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEntryUrl {
                url: self.entry_url.clone(),
                reason: format!("unsupported scheme '{}'", entry.scheme()),
            });
        }

        self.link_regex()?;
        Ok(())
    }

    pub fn link_regex(&self) -> Result<Regex, ConfigError> {
        Ok(Regex::new(&self.founder_link_pattern)?)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// 传给 CDP handler 的单命令超时
    ///
    /// 必须长于 `navigation_timeout`，否则进行中的导航会在
    /// 我们自己的超时报告之前被 handler 丢弃。
    pub fn browser_request_timeout(&self) -> Duration {
        (self.navigation_timeout() + CDP_REQUEST_MARGIN).max(CDP_DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn scroll_dwell(&self) -> Duration {
        Duration::from_millis(self.scroll_dwell_ms)
    }

    pub fn detail_settle(&self) -> Duration {
        Duration::from_millis(self.detail_settle_ms)
    }
}

fn parse_var<T, F>(lookup: &F, name: &str, expected: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: name.to_string(),
                value: raw,
                expected,
            }),
    }
}
