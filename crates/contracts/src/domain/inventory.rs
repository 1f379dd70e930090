use serde::{Deserialize, Serialize};

/// Строка файла остатков поставщика.
///
/// Все поля хранятся как текст в том виде, в каком они записаны в таблице:
/// пустая ячейка превращается в пустую строку, а не в отсутствие значения.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Код товара поставщика (колонка "Код")
    pub code: String,
    /// Количество (колонка "Количество"), например "5", ">10"
    pub quantity_text: String,
    /// Цена (колонка "Цена"), например "5'990.00 руб."
    pub price_text: String,
}

impl InventoryRecord {
    pub fn new(
        code: impl Into<String>,
        quantity_text: impl Into<String>,
        price_text: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            quantity_text: quantity_text.into(),
            price_text: price_text.into(),
        }
    }
}
