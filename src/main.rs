use anyhow::Result;
use founder_scraper::{logging, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（文件 + 环境变量）
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            logging::init(false);
            tracing::error!("❌ Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    // 初始化日志
    logging::init(config.verbose_logging);

    // 启动浏览器并运行
    App::initialize(config).await?.run().await?;

    Ok(())
}
