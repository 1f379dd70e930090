use chrono::Utc;
use contracts::domain::inventory::InventoryRecord;
use contracts::usecases::u601_sync_marketplace::report::{SyncOperation, SyncReport, SyncStatus};
use std::time::Duration;

use crate::shared::config::Config;
use crate::shared::error::{SyncError, SyncResult};
use crate::shared::inventory::InventoryLoader;
use crate::shared::logger::ApiRequestLog;
use crate::shared::marketplaces::MarketplaceUploader;
use crate::usecases::u601_sync_ozon::{OzonApiClient, OzonSyncExecutor};
use crate::usecases::u602_sync_yandex::{YandexApiClient, YandexSyncExecutor};

/// Полный прогон: скачать остатки один раз, затем по каждому кабинету
/// выгрузить остатки и цены. Проходы независимы: ошибка в одном
/// попадает в отчёт и не останавливает остальные.
pub async fn run_sync(config: &Config) -> SyncResult<Vec<SyncReport>> {
    let timeout = Duration::from_secs(config.http.timeout_secs);
    let uploaders = build_uploaders(config)?;
    if uploaders.is_empty() {
        tracing::warn!("No marketplaces enabled, nothing to do");
        return Ok(Vec::new());
    }

    let loader = InventoryLoader::new(config.inventory.clone(), timeout)?;
    let inventory = loader.load().await?;

    Ok(run_passes(&uploaders, &inventory).await)
}

/// Создать выгрузчики по конфигурации (Ozon + каждая кампания Яндекса)
pub fn build_uploaders(config: &Config) -> SyncResult<Vec<Box<dyn MarketplaceUploader>>> {
    let timeout = Duration::from_secs(config.http.timeout_secs);
    let log_dir = config.logging.api_log_dir.as_deref();
    let mut uploaders: Vec<Box<dyn MarketplaceUploader>> = Vec::new();

    if config.ozon.enabled {
        let client = OzonApiClient::new(
            &config.ozon,
            timeout,
            ApiRequestLog::new(log_dir, "ozon_api_requests.log"),
        )?;
        uploaders.push(Box::new(OzonSyncExecutor::new(client, &config.ozon)));
    }

    if config.yandex.enabled {
        for campaign in &config.yandex.campaigns {
            let client = YandexApiClient::new(
                &config.yandex,
                &campaign.campaign_id,
                timeout,
                ApiRequestLog::new(log_dir, "yandex_api_requests.log"),
            )?;
            uploaders.push(Box::new(YandexSyncExecutor::new(
                client,
                &config.yandex,
                campaign.clone(),
            )));
        }
    }

    Ok(uploaders)
}

/// Последовательно прогнать остатки и цены по всем выгрузчикам
pub async fn run_passes(
    uploaders: &[Box<dyn MarketplaceUploader>],
    inventory: &[InventoryRecord],
) -> Vec<SyncReport> {
    let mut reports = Vec::with_capacity(uploaders.len() * 2);

    for uploader in uploaders {
        let started_at = Utc::now();
        let result = uploader.upload_stocks(inventory).await;
        let (total, not_empty) = match &result {
            Ok((not_empty, all)) => (all.len(), Some(not_empty.len())),
            Err(_) => (0, None),
        };
        reports.push(make_report(
            &**uploader,
            SyncOperation::Stocks,
            started_at,
            total,
            not_empty,
            result.err(),
        ));

        let started_at = Utc::now();
        let result = uploader.upload_prices(inventory).await;
        let total = result.as_ref().map(Vec::len).unwrap_or(0);
        reports.push(make_report(
            &**uploader,
            SyncOperation::Prices,
            started_at,
            total,
            None,
            result.err(),
        ));
    }

    reports
}

fn make_report(
    uploader: &dyn MarketplaceUploader,
    operation: SyncOperation,
    started_at: chrono::DateTime<Utc>,
    total: usize,
    not_empty: Option<usize>,
    error: Option<SyncError>,
) -> SyncReport {
    let marketplace = uploader.marketplace();
    let label = uploader.label().to_string();

    let status = match &error {
        None => {
            tracing::info!(
                "{} [{}] {}: sent {} updates{}",
                marketplace,
                label,
                operation,
                total,
                not_empty
                    .map(|n| format!(", {} in stock", n))
                    .unwrap_or_default()
            );
            SyncStatus::Completed
        }
        Some(e) if e.is_timeout() => {
            tracing::error!("{} [{}] {}: request timed out: {}", marketplace, label, operation, e);
            SyncStatus::TimedOut
        }
        Some(e) => {
            tracing::error!("{} [{}] {} failed: {}", marketplace, label, operation, e);
            SyncStatus::Failed
        }
    };

    SyncReport {
        marketplace,
        label,
        operation,
        status,
        started_at,
        completed_at: Utc::now(),
        total,
        not_empty,
        error: error.map(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::parse_config;
    use async_trait::async_trait;
    use contracts::domain::offer_update::{PriceUpdate, StockUpdate};
    use contracts::enums::marketplace_type::MarketplaceType;

    /// Выгрузчик без сети: остатки/цены считаются, ошибки задаются заранее
    struct FakeUploader {
        listed: Vec<String>,
        stocks_error: Option<fn() -> SyncError>,
    }

    #[async_trait]
    impl MarketplaceUploader for FakeUploader {
        fn marketplace(&self) -> MarketplaceType {
            MarketplaceType::Ozon
        }

        fn label(&self) -> &str {
            "fake"
        }

        async fn fetch_offer_ids(&self) -> SyncResult<Vec<String>> {
            Ok(self.listed.clone())
        }

        async fn upload_stocks(
            &self,
            inventory: &[InventoryRecord],
        ) -> SyncResult<(Vec<StockUpdate>, Vec<StockUpdate>)> {
            if let Some(make_error) = self.stocks_error {
                return Err(make_error());
            }
            let ids = self.fetch_offer_ids().await?;
            let stocks = crate::shared::reconcile::build_stock_updates(inventory, &ids, None, None)?;
            Ok(crate::shared::reconcile::split_not_empty(stocks))
        }

        async fn upload_prices(
            &self,
            inventory: &[InventoryRecord],
        ) -> SyncResult<Vec<PriceUpdate>> {
            let ids = self.fetch_offer_ids().await?;
            crate::shared::reconcile::build_price_updates(inventory, &ids, "RUB")
        }
    }

    fn timeout_error() -> SyncError {
        SyncError::Timeout("deadline".into())
    }

    fn server_error() -> SyncError {
        SyncError::Api {
            status: 500,
            body: "boom".into(),
        }
    }

    fn inventory() -> Vec<InventoryRecord> {
        vec![InventoryRecord::new("1001", ">10", "1'500.00 р.")]
    }

    #[tokio::test]
    async fn test_passes_report_totals() {
        let uploaders: Vec<Box<dyn MarketplaceUploader>> = vec![Box::new(FakeUploader {
            listed: vec!["1001".into(), "1002".into()],
            stocks_error: None,
        })];

        let reports = run_passes(&uploaders, &inventory()).await;
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].operation, SyncOperation::Stocks);
        assert_eq!(reports[0].total, 2);
        assert_eq!(reports[0].not_empty, Some(1));
        assert_eq!(reports[1].operation, SyncOperation::Prices);
        assert_eq!(reports[1].total, 1);
        assert!(reports.iter().all(SyncReport::is_success));
    }

    #[tokio::test]
    async fn test_failed_stock_pass_does_not_stop_prices() {
        let uploaders: Vec<Box<dyn MarketplaceUploader>> = vec![
            Box::new(FakeUploader {
                listed: vec!["1001".into()],
                stocks_error: Some(timeout_error as fn() -> SyncError),
            }),
            Box::new(FakeUploader {
                listed: vec!["1001".into()],
                stocks_error: Some(server_error as fn() -> SyncError),
            }),
        ];

        let reports = run_passes(&uploaders, &inventory()).await;
        assert_eq!(reports.len(), 4);
        assert_eq!(reports[0].status, SyncStatus::TimedOut);
        assert_eq!(reports[1].status, SyncStatus::Completed);
        assert_eq!(reports[2].status, SyncStatus::Failed);
        assert!(reports[2].error.as_deref().unwrap().contains("500"));
        assert_eq!(reports[3].status, SyncStatus::Completed);
    }

    #[test]
    fn test_build_uploaders_per_campaign() {
        let mut config = parse_config(
            r#"
            [inventory]
            archive_url = "http://localhost/ostatki.zip"
            sheet_file = "ostatki.xls"
            header_row = 17

            [ozon]
            enabled = false
            base_url = "http://localhost"
            page_limit = 1000
            stock_batch = 100
            price_batch = 1000

            [yandex]
            enabled = true
            base_url = "http://localhost"
            token = "t"
            page_limit = 200
            stock_batch = 2000
            price_batch = 500

            [[yandex.campaigns]]
            name = "FBS"
            campaign_id = "1"
            warehouse_id = "10"

            [[yandex.campaigns]]
            name = "DBS"
            campaign_id = "2"
            warehouse_id = "20"
            "#,
        )
        .unwrap();

        let uploaders = build_uploaders(&config).unwrap();
        let labels: Vec<&str> = uploaders.iter().map(|u| u.label()).collect();
        assert_eq!(labels, vec!["FBS", "DBS"]);

        config.yandex.token.clear();
        assert!(matches!(build_uploaders(&config), Err(SyncError::Config(_))));
    }
}
