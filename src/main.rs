use std::path::PathBuf;

use anyhow::Result;
use exam_practice_qna::utils::logging;
use exam_practice_qna::{App, Config};

/// 默认配置文件（不存在时使用默认值）
const DEFAULT_CONFIG_FILE: &str = "exam_practice.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config_path = std::env::var("EXAM_PRACTICE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = Config::load(&config_path)?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
