use chrono::{DateTime, Utc};
use contracts::domain::inventory::InventoryRecord;
use contracts::domain::offer_update::{PriceUpdate, StockUpdate};
use std::collections::HashSet;

use super::error::SyncResult;
use super::normalize::{normalize_quantity, parse_price};

/// Собрать остатки для всех товаров, выставленных на маркетплейсе.
///
/// Сначала идут товары, найденные в файле поставщика (в порядке файла),
/// затем оставшиеся артикулы магазина с нулевым остатком (в порядке списка).
/// Каждый артикул попадает в результат ровно один раз. Входные данные не
/// изменяются, так что повторный вызов даёт тот же результат.
pub fn build_stock_updates(
    inventory: &[InventoryRecord],
    listed_ids: &[String],
    warehouse_id: Option<&str>,
    updated_at: Option<DateTime<Utc>>,
) -> SyncResult<Vec<StockUpdate>> {
    let mut remaining: HashSet<&str> = listed_ids.iter().map(String::as_str).collect();
    let mut stocks = Vec::with_capacity(remaining.len());

    let make = |offer_id: &str, quantity: u32| StockUpdate {
        offer_id: offer_id.to_string(),
        quantity,
        warehouse_id: warehouse_id.map(str::to_string),
        updated_at,
    };

    for record in inventory {
        if remaining.remove(record.code.as_str()) {
            let quantity = normalize_quantity(&record.quantity_text)?;
            stocks.push(make(&record.code, quantity));
        }
    }

    // Добавим недостающее из выставленного
    for offer_id in listed_ids {
        if remaining.remove(offer_id.as_str()) {
            stocks.push(make(offer_id, 0));
        }
    }

    Ok(stocks)
}

/// Собрать цены для товаров из файла, которые выставлены на маркетплейсе.
/// Артикулы без строки в файле в результат не попадают.
pub fn build_price_updates(
    inventory: &[InventoryRecord],
    listed_ids: &[String],
    currency: &str,
) -> SyncResult<Vec<PriceUpdate>> {
    let listed: HashSet<&str> = listed_ids.iter().map(String::as_str).collect();

    inventory
        .iter()
        .filter(|record| listed.contains(record.code.as_str()))
        .map(|record| {
            Ok(PriceUpdate {
                offer_id: record.code.clone(),
                price_value: parse_price(&record.price_text)?,
                currency: currency.to_string(),
            })
        })
        .collect()
}

/// Разделить остатки на ненулевые и полный список
pub fn split_not_empty(stocks: Vec<StockUpdate>) -> (Vec<StockUpdate>, Vec<StockUpdate>) {
    let not_empty = stocks.iter().filter(|s| !s.is_empty()).cloned().collect();
    (not_empty, stocks)
}
