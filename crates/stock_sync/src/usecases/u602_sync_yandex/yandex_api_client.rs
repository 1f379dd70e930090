use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::shared::config::YandexConfig;
use crate::shared::error::{SyncError, SyncResult};
use crate::shared::logger::{preview, ApiRequestLog};

/// HTTP-клиент для работы с Yandex Market Partner API (одна кампания)
pub struct YandexApiClient {
    client: reqwest::Client,
    base_url: String,
    campaign_id: String,
    token: String,
    log: ApiRequestLog,
}

impl YandexApiClient {
    pub fn new(
        config: &YandexConfig,
        campaign_id: &str,
        timeout: std::time::Duration,
        log: ApiRequestLog,
    ) -> SyncResult<Self> {
        if config.token.trim().is_empty() {
            return Err(SyncError::Config(
                "Bearer token (API Key) is required for Yandex Market API".into(),
            ));
        }
        if campaign_id.trim().is_empty() {
            return Err(SyncError::Config(
                "Campaign ID is required for Yandex Market API".into(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Io(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            campaign_id: campaign_id.to_string(),
            token: config.token.clone(),
            log,
        })
    }

    /// Получить страницу товаров кампании
    /// Endpoint: GET /campaigns/{campaignId}/offer-mapping-entries
    pub async fn fetch_product_list(
        &self,
        page_token: &str,
        limit: u32,
    ) -> SyncResult<YandexOfferMappingResult> {
        #[derive(Serialize)]
        struct YandexListQueryParams<'a> {
            page_token: &'a str,
            limit: u32,
        }

        let path = format!("/campaigns/{}/offer-mapping-entries", self.campaign_id);
        let query = YandexListQueryParams { page_token, limit };

        let response: YandexOfferMappingResponse = self
            .send_json::<_, (), _>(Method::GET, &path, Some(&query), None)
            .await?;
        Ok(response.result)
    }

    /// Обновить остатки: PUT /campaigns/{campaignId}/offers/stocks
    pub async fn update_stocks(&self, skus: &[YandexSkuStock]) -> SyncResult<YandexStatusResponse> {
        let path = format!("/campaigns/{}/offers/stocks", self.campaign_id);
        let response: YandexStatusResponse = self
            .send_json::<(), _, _>(Method::PUT, &path, None, Some(&YandexStocksRequest { skus }))
            .await?;
        response.warn_if_not_ok("stocks");
        Ok(response)
    }

    /// Обновить цены: POST /campaigns/{campaignId}/offer-prices/updates
    pub async fn update_prices(
        &self,
        offers: &[YandexOfferPrice],
    ) -> SyncResult<YandexStatusResponse> {
        let path = format!("/campaigns/{}/offer-prices/updates", self.campaign_id);
        let response: YandexStatusResponse = self
            .send_json::<(), _, _>(Method::POST, &path, None, Some(&YandexPricesRequest { offers }))
            .await?;
        response.warn_if_not_ok("prices");
        Ok(response)
    }

    async fn send_json<Q, B, R>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        request_body: Option<&B>,
    ) -> SyncResult<R>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json");
        if let Some(query) = query {
            request = request.query(query);
        }
        let body_text = match request_body {
            Some(b) => {
                let text = serde_json::to_string(b)?;
                request = request
                    .header("Content-Type", "application/json")
                    .body(text.clone());
                text
            }
            None => String::new(),
        };

        self.log.write(&format!(
            "=== REQUEST ===\n{} {}\nAuthorization: Bearer ****\nBody: {}",
            method,
            url,
            preview(&body_text)
        ));

        let response = request.send().await?;

        let status = response.status();
        self.log.write(&format!("Response status: {}", status));

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            self.log.write(&format!("ERROR Response body:\n{}", body));
            tracing::error!("Yandex Market API request {} failed: {}", path, body);
            return Err(SyncError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        self.log.write(&format!("=== RESPONSE BODY ===\n{}\n", body));

        serde_json::from_str::<R>(&body).map_err(|e| {
            tracing::error!("Failed to parse Yandex Market API response. Error: {}", e);
            SyncError::Format(format!(
                "Failed to parse Yandex Market API JSON: {}. Response: {}",
                e,
                preview(&body)
            ))
        })
    }
}

// ============================================================================
// Request/Response structures
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct YandexOfferMappingResponse {
    pub result: YandexOfferMappingResult,
}

#[derive(Debug, Deserialize)]
pub struct YandexOfferMappingResult {
    #[serde(rename = "offerMappingEntries", default)]
    pub offer_mapping_entries: Vec<YandexOfferMappingEntry>,
    #[serde(default)]
    pub paging: YandexPaging,
}

#[derive(Debug, Deserialize)]
pub struct YandexOfferMappingEntry {
    pub offer: YandexOffer,
}

#[derive(Debug, Deserialize)]
pub struct YandexOffer {
    #[serde(rename = "shopSku")]
    pub shop_sku: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct YandexPaging {
    #[serde(rename = "nextPageToken", default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct YandexStocksRequest<'a> {
    skus: &'a [YandexSkuStock],
}

#[derive(Debug, Serialize)]
struct YandexPricesRequest<'a> {
    offers: &'a [YandexOfferPrice],
}

/// Остаток одного SKU на складе
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YandexSkuStock {
    pub sku: String,
    #[serde(rename = "warehouseId")]
    pub warehouse_id: String,
    pub items: Vec<YandexStockItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YandexStockItem {
    pub count: u32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YandexOfferPrice {
    pub id: String,
    pub price: YandexPriceValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YandexPriceValue {
    pub value: u64,
    #[serde(rename = "currencyId")]
    pub currency_id: String,
}

#[derive(Debug, Deserialize)]
pub struct YandexStatusResponse {
    #[serde(default)]
    pub status: Option<String>,
}

impl YandexStatusResponse {
    fn warn_if_not_ok(&self, what: &str) {
        if self.status.as_deref() != Some("OK") {
            tracing::warn!("Yandex Market {} update returned status {:?}", what, self.status);
        }
    }
}
