use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Обновление остатка одного предложения на маркетплейсе
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUpdate {
    pub offer_id: String,
    pub quantity: u32,
    /// Склад (нужен только Яндекс Маркету)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<String>,
    /// Момент актуальности остатка (нужен только Яндекс Маркету)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StockUpdate {
    pub fn is_empty(&self) -> bool {
        self.quantity == 0
    }
}

/// Обновление цены одного предложения на маркетплейсе
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub offer_id: String,
    /// Целая часть цены, без копеек
    pub price_value: u64,
    /// Код валюты в нотации конкретного маркетплейса ("RUB", "RUR")
    pub currency: String,
}
