pub mod shared;
pub mod usecases;

use contracts::usecases::u601_sync_marketplace::report::SyncStatus;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Создаем директорию для логов
    let log_dir = std::path::Path::new("logs");
    std::fs::create_dir_all(log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("stock_sync.log"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,reqwest=warn,hyper=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    let config = shared::config::load_config()
        .map_err(|e| anyhow::anyhow!("config load failed: {e}"))?;

    let reports = match usecases::u600_run_sync::run_sync(&config).await {
        Ok(reports) => reports,
        Err(e) if e.is_timeout() => {
            tracing::error!("Превышено время ожидания: {}", e);
            return Err(e.into());
        }
        Err(e) => {
            tracing::error!("Sync aborted: {}", e);
            return Err(e.into());
        }
    };

    let failed = reports.iter().filter(|r| !r.is_success()).count();
    for report in &reports {
        let status = match report.status {
            SyncStatus::Completed => "ok",
            SyncStatus::TimedOut => "timeout",
            SyncStatus::Failed => "failed",
        };
        println!(
            "{:<14} {:<6} {:<7} {:>6} {}",
            report.marketplace.display_name(),
            report.label,
            report.operation,
            report.total,
            status
        );
    }

    if failed > 0 {
        anyhow::bail!("{} of {} sync passes failed", failed, reports.len());
    }
    Ok(())
}
