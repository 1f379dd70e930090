use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use contracts::domain::inventory::InventoryRecord;
use contracts::domain::offer_update::{PriceUpdate, StockUpdate};
use contracts::enums::marketplace_type::MarketplaceType;

use super::yandex_api_client::{
    YandexApiClient, YandexOfferPrice, YandexPriceValue, YandexSkuStock, YandexStockItem,
};
use crate::shared::batch::batches;
use crate::shared::config::{YandexCampaign, YandexConfig};
use crate::shared::error::SyncResult;
use crate::shared::marketplaces::MarketplaceUploader;
use crate::shared::reconcile::{build_price_updates, build_stock_updates, split_not_empty};

pub const YANDEX_CURRENCY: &str = "RUR";
/// Тип остатка: доступный к продаже
const STOCK_TYPE_FIT: &str = "FIT";

/// Выгрузка остатков и цен в одну кампанию Яндекс Маркета (FBS, DBS, ...)
pub struct YandexSyncExecutor {
    api_client: YandexApiClient,
    campaign: YandexCampaign,
    page_limit: u32,
    stock_batch: usize,
    price_batch: usize,
}

impl YandexSyncExecutor {
    pub fn new(api_client: YandexApiClient, config: &YandexConfig, campaign: YandexCampaign) -> Self {
        Self {
            api_client,
            campaign,
            page_limit: config.page_limit,
            stock_batch: config.stock_batch,
            price_batch: config.price_batch,
        }
    }
}

/// Формат updatedAt: "2025-01-01T12:00:00Z"
pub fn format_updated_at(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn to_sku_stock(stock: &StockUpdate, fallback_at: &str) -> YandexSkuStock {
    YandexSkuStock {
        sku: stock.offer_id.clone(),
        warehouse_id: stock.warehouse_id.clone().unwrap_or_default(),
        items: vec![YandexStockItem {
            count: stock.quantity,
            kind: STOCK_TYPE_FIT.to_string(),
            updated_at: stock
                .updated_at
                .map(format_updated_at)
                .unwrap_or_else(|| fallback_at.to_string()),
        }],
    }
}

impl From<&PriceUpdate> for YandexOfferPrice {
    fn from(p: &PriceUpdate) -> Self {
        YandexOfferPrice {
            id: p.offer_id.clone(),
            price: YandexPriceValue {
                value: p.price_value,
                currency_id: p.currency.clone(),
            },
        }
    }
}

#[async_trait]
impl MarketplaceUploader for YandexSyncExecutor {
    fn marketplace(&self) -> MarketplaceType {
        MarketplaceType::YandexMarket
    }

    fn label(&self) -> &str {
        &self.campaign.name
    }

    /// Пагинация по `nextPageToken`, пока он не пустой
    async fn fetch_offer_ids(&self) -> SyncResult<Vec<String>> {
        let mut page_token = String::new();
        let mut offer_ids: Vec<String> = Vec::new();

        loop {
            let page = self
                .api_client
                .fetch_product_list(&page_token, self.page_limit)
                .await?;

            tracing::debug!(
                "Yandex Market [{}] page: items={}, nextPageToken={:?}",
                self.campaign.name,
                page.offer_mapping_entries.len(),
                page.paging.next_page_token
            );

            offer_ids.extend(
                page.offer_mapping_entries
                    .into_iter()
                    .map(|entry| entry.offer.shop_sku),
            );

            match page.paging.next_page_token {
                Some(token) if !token.is_empty() => page_token = token,
                _ => break,
            }
        }

        tracing::info!(
            "Yandex Market [{}] listed offers: {}",
            self.campaign.name,
            offer_ids.len()
        );
        Ok(offer_ids)
    }

    async fn upload_stocks(
        &self,
        inventory: &[InventoryRecord],
    ) -> SyncResult<(Vec<StockUpdate>, Vec<StockUpdate>)> {
        let offer_ids = self.fetch_offer_ids().await?;
        let updated_at = Utc::now().trunc_subsecs(0);
        let stocks = build_stock_updates(
            inventory,
            &offer_ids,
            Some(self.campaign.warehouse_id.as_str()),
            Some(updated_at),
        )?;

        let fallback_at = format_updated_at(updated_at);
        for (i, batch) in batches(&stocks, self.stock_batch).enumerate() {
            let payload: Vec<YandexSkuStock> =
                batch.iter().map(|s| to_sku_stock(s, &fallback_at)).collect();
            tracing::info!(
                "Yandex Market [{}] stocks batch {}: {} items",
                self.campaign.name,
                i + 1,
                payload.len()
            );
            self.api_client.update_stocks(&payload).await?;
        }

        Ok(split_not_empty(stocks))
    }

    async fn upload_prices(&self, inventory: &[InventoryRecord]) -> SyncResult<Vec<PriceUpdate>> {
        let offer_ids = self.fetch_offer_ids().await?;
        let prices = build_price_updates(inventory, &offer_ids, YANDEX_CURRENCY)?;

        for (i, batch) in batches(&prices, self.price_batch).enumerate() {
            let payload: Vec<YandexOfferPrice> = batch.iter().map(YandexOfferPrice::from).collect();
            tracing::info!(
                "Yandex Market [{}] prices batch {}: {} items",
                self.campaign.name,
                i + 1,
                payload.len()
            );
            self.api_client.update_prices(&payload).await?;
        }

        Ok(prices)
    }
}
