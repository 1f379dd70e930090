use async_trait::async_trait;
use contracts::domain::inventory::InventoryRecord;
use contracts::domain::offer_update::{PriceUpdate, StockUpdate};
use contracts::enums::marketplace_type::MarketplaceType;

use super::ozon_api_client::{OzonApiClient, OzonPrice, OzonStock};
use crate::shared::batch::batches;
use crate::shared::config::OzonConfig;
use crate::shared::error::SyncResult;
use crate::shared::marketplaces::MarketplaceUploader;
use crate::shared::reconcile::{build_price_updates, build_stock_updates, split_not_empty};

pub const OZON_CURRENCY: &str = "RUB";

/// Выгрузка остатков и цен в кабинет Ozon
pub struct OzonSyncExecutor {
    api_client: OzonApiClient,
    page_limit: u32,
    stock_batch: usize,
    price_batch: usize,
}

impl OzonSyncExecutor {
    pub fn new(api_client: OzonApiClient, config: &OzonConfig) -> Self {
        Self {
            api_client,
            page_limit: config.page_limit,
            stock_batch: config.stock_batch,
            price_batch: config.price_batch,
        }
    }
}

impl From<&StockUpdate> for OzonStock {
    fn from(s: &StockUpdate) -> Self {
        OzonStock {
            offer_id: s.offer_id.clone(),
            stock: s.quantity,
        }
    }
}

impl From<&PriceUpdate> for OzonPrice {
    fn from(p: &PriceUpdate) -> Self {
        OzonPrice {
            auto_action_enabled: "UNKNOWN".to_string(),
            currency_code: p.currency.clone(),
            offer_id: p.offer_id.clone(),
            old_price: "0".to_string(),
            price: p.price_value.to_string(),
        }
    }
}

#[async_trait]
impl MarketplaceUploader for OzonSyncExecutor {
    fn marketplace(&self) -> MarketplaceType {
        MarketplaceType::Ozon
    }

    fn label(&self) -> &str {
        "Ozon"
    }

    /// Пагинация по `last_id`, пока не набрали `total` товаров
    async fn fetch_offer_ids(&self) -> SyncResult<Vec<String>> {
        let mut last_id = String::new();
        let mut offer_ids: Vec<String> = Vec::new();

        loop {
            let page = self
                .api_client
                .fetch_product_list(&last_id, self.page_limit)
                .await?;

            tracing::debug!(
                "OZON product list page: items={}, total={}, last_id={}",
                page.items.len(),
                page.total,
                page.last_id
            );

            if page.items.is_empty() {
                if offer_ids.len() != page.total {
                    tracing::warn!(
                        "OZON returned an empty page with {} of {} products collected, stopping",
                        offer_ids.len(),
                        page.total
                    );
                }
                break;
            }

            offer_ids.extend(page.items.into_iter().map(|item| item.offer_id));
            last_id = page.last_id;

            if offer_ids.len() == page.total {
                break;
            }
        }

        tracing::info!("OZON listed offers: {}", offer_ids.len());
        Ok(offer_ids)
    }

    async fn upload_stocks(
        &self,
        inventory: &[InventoryRecord],
    ) -> SyncResult<(Vec<StockUpdate>, Vec<StockUpdate>)> {
        let offer_ids = self.fetch_offer_ids().await?;
        let stocks = build_stock_updates(inventory, &offer_ids, None, None)?;

        for (i, batch) in batches(&stocks, self.stock_batch).enumerate() {
            let payload: Vec<OzonStock> = batch.iter().map(OzonStock::from).collect();
            tracing::info!("OZON stocks batch {}: {} items", i + 1, payload.len());
            self.api_client.update_stocks(&payload).await?;
        }

        Ok(split_not_empty(stocks))
    }

    async fn upload_prices(&self, inventory: &[InventoryRecord]) -> SyncResult<Vec<PriceUpdate>> {
        let offer_ids = self.fetch_offer_ids().await?;
        let prices = build_price_updates(inventory, &offer_ids, OZON_CURRENCY)?;

        for (i, batch) in batches(&prices, self.price_batch).enumerate() {
            let payload: Vec<OzonPrice> = batch.iter().map(OzonPrice::from).collect();
            tracing::info!("OZON prices batch {}: {} items", i + 1, payload.len());
            self.api_client.update_prices(&payload).await?;
        }

        Ok(prices)
    }
}
