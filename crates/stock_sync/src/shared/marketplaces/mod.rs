use async_trait::async_trait;
use contracts::domain::inventory::InventoryRecord;
use contracts::domain::offer_update::{PriceUpdate, StockUpdate};
use contracts::enums::marketplace_type::MarketplaceType;

use crate::shared::error::SyncResult;

/// Трейт для выгрузки остатков и цен в маркетплейс.
///
/// Реализация хранит свою конфигурацию (ключи, кампанию, склад, размеры
/// пакетов) и получает её при создании.
#[async_trait]
pub trait MarketplaceUploader: Send + Sync {
    fn marketplace(&self) -> MarketplaceType;

    /// Метка кабинета/кампании для логов и отчёта
    fn label(&self) -> &str;

    /// Все артикулы, выставленные в кабинете (проход по всем страницам)
    async fn fetch_offer_ids(&self) -> SyncResult<Vec<String>>;

    /// Выгрузить остатки. Возвращает (ненулевые остатки, все остатки).
    async fn upload_stocks(
        &self,
        inventory: &[InventoryRecord],
    ) -> SyncResult<(Vec<StockUpdate>, Vec<StockUpdate>)>;

    /// Выгрузить цены. Возвращает все отправленные цены.
    async fn upload_prices(&self, inventory: &[InventoryRecord]) -> SyncResult<Vec<PriceUpdate>>;
}
