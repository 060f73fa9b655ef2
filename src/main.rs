// ==========================================
// NAF 事故统计系统 - 命令行入口
// ==========================================
// 用法:
//   naf-risk-stats [config.json]
// 未指定配置时: NAF_RISK_STATS_CONFIG → 用户配置目录 → 内置默认
// 设置 NAF_RISK_STATS_LOG_JSON=1 输出 JSON 日志
// ==========================================

use anyhow::Context;
use naf_risk_stats::{logging, PipelineConfig, RefreshOrchestrator};

const JSON_LOG_ENV_VAR: &str = "NAF_RISK_STATS_LOG_JSON";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var(JSON_LOG_ENV_VAR).is_ok_and(|v| v == "1") {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("==================================================");
    tracing::info!("{} - 全量刷新", naf_risk_stats::APP_NAME);
    tracing::info!("系统版本: {}", naf_risk_stats::VERSION);
    tracing::info!("==================================================");

    let config = match std::env::args().nth(1) {
        Some(path) => PipelineConfig::load(&path)
            .with_context(|| format!("无法加载配置文件 {}", path))?,
        None => PipelineConfig::resolve().context("无法解析默认配置")?,
    };

    let written = RefreshOrchestrator::new(config)
        .run()
        .await
        .context("全量刷新失败")?;

    for path in &written {
        tracing::info!(path = %path.display(), "已生成");
    }
    tracing::info!(files = written.len(), "刷新完成");
    Ok(())
}
