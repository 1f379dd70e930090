use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::marketplace_type::MarketplaceType;

/// Вид прохода синхронизации
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOperation {
    Stocks,
    Prices,
}

impl std::fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncOperation::Stocks => f.pad("stocks"),
            SyncOperation::Prices => f.pad("prices"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Все пакеты отправлены
    Completed,

    /// Запрос не уложился в таймаут
    TimedOut,

    /// Проход прерван ошибкой
    Failed,
}

/// Итог одного прохода (остатки или цены) для одного маркетплейса/кампании
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub marketplace: MarketplaceType,
    /// Метка кампании или кабинета, например "FBS"
    pub label: String,
    pub operation: SyncOperation,
    pub status: SyncStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,

    /// Сколько записей отправлено
    pub total: usize,
    /// Сколько из них с ненулевым остатком (только для остатков)
    pub not_empty: Option<usize>,

    pub error: Option<String>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.status == SyncStatus::Completed
    }
}
