use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::shared::config::OzonConfig;
use crate::shared::error::{SyncError, SyncResult};
use crate::shared::logger::{preview, ApiRequestLog};

/// HTTP-клиент для работы с OZON Seller API
pub struct OzonApiClient {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    api_key: String,
    log: ApiRequestLog,
}

impl OzonApiClient {
    pub fn new(
        config: &OzonConfig,
        timeout: std::time::Duration,
        log: ApiRequestLog,
    ) -> SyncResult<Self> {
        if config.client_id.trim().is_empty() {
            return Err(SyncError::Config("Client-Id is required for OZON API".into()));
        }
        if config.seller_token.trim().is_empty() {
            return Err(SyncError::Config("Api-Key is required for OZON API".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Io(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            api_key: config.seller_token.clone(),
            log,
        })
    }

    /// Получить страницу списка товаров через POST /v2/product/list
    pub async fn fetch_product_list(
        &self,
        last_id: &str,
        limit: u32,
    ) -> SyncResult<OzonProductListResult> {
        let request_body = OzonProductListRequest {
            filter: OzonProductListFilter {
                visibility: "ALL".to_string(),
            },
            last_id: last_id.to_string(),
            limit,
        };

        let response: OzonProductListResponse =
            self.post_json("/v2/product/list", &request_body).await?;
        Ok(response.result)
    }

    /// Обновить остатки через POST /v1/product/import/stocks
    pub async fn update_stocks(&self, stocks: &[OzonStock]) -> SyncResult<OzonImportResponse> {
        let response: OzonImportResponse = self
            .post_json("/v1/product/import/stocks", &OzonStocksRequest { stocks })
            .await?;
        response.warn_rejected("stocks");
        Ok(response)
    }

    /// Обновить цены через POST /v1/product/import/prices
    pub async fn update_prices(&self, prices: &[OzonPrice]) -> SyncResult<OzonImportResponse> {
        let response: OzonImportResponse = self
            .post_json("/v1/product/import/prices", &OzonPricesRequest { prices })
            .await?;
        response.warn_rejected("prices");
        Ok(response)
    }

    async fn post_json<B, R>(&self, path: &str, request_body: &B) -> SyncResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let body = serde_json::to_string(request_body)?;
        self.log.write(&format!(
            "=== REQUEST ===\nPOST {}\nClient-Id: {}\nApi-Key: ****\nBody: {}",
            url,
            self.client_id,
            preview(&body)
        ));

        let response = self
            .client
            .post(&url)
            .header("Client-Id", &self.client_id)
            .header("Api-Key", &self.api_key)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        self.log.write(&format!("Response status: {}", status));

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            self.log.write(&format!("ERROR Response body:\n{}", body));
            tracing::error!("OZON API request {} failed: {}", path, body);
            return Err(SyncError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        self.log.write(&format!("=== RESPONSE BODY ===\n{}\n", body));

        serde_json::from_str::<R>(&body).map_err(|e| {
            tracing::error!("Failed to parse OZON API response. Error: {}", e);
            SyncError::Format(format!(
                "Failed to parse OZON API JSON: {}. Response: {}",
                e,
                preview(&body)
            ))
        })
    }
}

// ============================================================================
// Request/Response structures
// ============================================================================

#[derive(Debug, Serialize)]
pub struct OzonProductListRequest {
    pub filter: OzonProductListFilter,
    pub last_id: String,
    pub limit: u32,
}

#[derive(Debug, Serialize)]
pub struct OzonProductListFilter {
    pub visibility: String,
}

#[derive(Debug, Deserialize)]
pub struct OzonProductListResponse {
    pub result: OzonProductListResult,
}

#[derive(Debug, Deserialize)]
pub struct OzonProductListResult {
    #[serde(default)]
    pub items: Vec<OzonProductItem>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub last_id: String,
}

#[derive(Debug, Deserialize)]
pub struct OzonProductItem {
    pub offer_id: String,
}

#[derive(Debug, Serialize)]
struct OzonStocksRequest<'a> {
    stocks: &'a [OzonStock],
}

#[derive(Debug, Serialize)]
struct OzonPricesRequest<'a> {
    prices: &'a [OzonPrice],
}

/// Остаток в формате /v1/product/import/stocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OzonStock {
    pub offer_id: String,
    pub stock: u32,
}

/// Цена в формате /v1/product/import/prices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OzonPrice {
    pub auto_action_enabled: String,
    pub currency_code: String,
    pub offer_id: String,
    pub old_price: String,
    pub price: String,
}

#[derive(Debug, Deserialize)]
pub struct OzonImportResponse {
    #[serde(default)]
    pub result: Vec<OzonImportResult>,
}

#[derive(Debug, Deserialize)]
pub struct OzonImportResult {
    #[serde(default)]
    pub offer_id: String,
    #[serde(default)]
    pub updated: bool,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

impl OzonImportResponse {
    /// Ozon отвечает 200 даже если часть позиций не принята
    fn warn_rejected(&self, what: &str) {
        let rejected: Vec<&OzonImportResult> =
            self.result.iter().filter(|r| !r.updated).collect();
        if rejected.is_empty() {
            return;
        }
        tracing::warn!(
            "OZON rejected {} of {} {} updates, first: {} {:?}",
            rejected.len(),
            self.result.len(),
            what,
            rejected[0].offer_id,
            rejected[0].errors
        );
    }
}
