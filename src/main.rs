//! chainprobe 命令行入口
//!
//! 从 stdin 读取密文（每行一条），结果以 JSON 写到 stdout，日志写到 stderr。

use std::sync::Arc;

use anyhow::{Context, Result};
use chainprobe::{
    config::{CatalogConfig, Config},
    domain::{parse_secret_batch, Network},
    error::CatalogFetchError,
    infrastructure::{logging, HttpRpcClient},
    service::{BalanceOrchestrator, CatalogLoader, UpdateEvent},
};
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. 加载环境变量与配置
    dotenvy::dotenv().ok();

    let config = match std::env::var("CONFIG_PATH") {
        Ok(path) => Config::from_env_and_file(Some(path.as_str()))?,
        Err(_) => Config::from_env()?,
    };
    config.validate()?;

    // 2. 初始化日志
    if let Err(e) = logging::init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // 3. 读取密文
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("Failed to read secrets from stdin")?;

    let records = parse_secret_batch(&input);
    if records.is_empty() {
        anyhow::bail!("no secrets supplied on stdin");
    }
    let invalid = records.iter().filter(|r| !r.is_derived()).count();
    tracing::info!(secrets = records.len(), invalid, "secret batch parsed");

    // 4. 加载端点目录，失败则不启动批次
    let networks = match load_catalog(&config.catalog).await {
        Ok(networks) => networks,
        Err(e) => {
            // 只报告一次，随后以非零状态退出
            tracing::error!(code = e.code(), error = %e, "catalog load failed, batch not started");
            std::process::exit(1);
        }
    };
    if networks.is_empty() {
        tracing::warn!("catalog contains no usable networks");
    }

    // 5. 运行批次
    let probe_timeout = config.resolver.probe_timeout();
    let transport =
        Arc::new(HttpRpcClient::new(probe_timeout).context("Failed to build RPC HTTP client")?);
    let orchestrator = Arc::new(BalanceOrchestrator::new(transport, networks, probe_timeout));
    let mut batch = orchestrator.start(records);

    let abort = batch.abort_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping after the current secret");
            abort.abort();
        }
    });

    while let Some(update) = batch.next_update().await {
        match &update.event {
            UpdateEvent::Balance(entry) if !entry.is_zero() => {
                tracing::info!(
                    secret_index = update.secret_index,
                    chain_id = entry.network_id,
                    network = %entry.network_display_name,
                    amount = %entry.amount,
                    "balance found"
                );
            }
            UpdateEvent::StatusChanged => {
                tracing::debug!(
                    secret_index = update.secret_index,
                    status = %update.status,
                    checked = update.checked_endpoint_count,
                    total = update.total_endpoint_count,
                    "status changed"
                );
            }
            _ => {}
        }
    }

    let states = batch.join().await.context("balance batch task failed")?;

    // 6. 输出结果
    println!("{}", serde_json::to_string_pretty(&states)?);
    Ok(())
}

async fn load_catalog(config: &CatalogConfig) -> Result<Vec<Network>, CatalogFetchError> {
    CatalogLoader::new(config.clone())?.load().await
}
