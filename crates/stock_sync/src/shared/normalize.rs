use super::error::{SyncError, SyncResult};

/// Остаток, который выставляется для "больше 10"
pub const MANY_ITEMS_STOCK: u32 = 100;

/// Переводит текстовое количество из файла поставщика в остаток маркетплейса.
///
/// Правила жёсткие и не являются общим парсером:
/// - `">10"` → 100
/// - `"1"` → 0 (последний экземпляр на маркетплейс не выставляем)
/// - всё остальное — целое число в десятичной записи
///
/// # Примеры
/// ```ignore
/// assert_eq!(normalize_quantity(">10")?, 100);
/// assert_eq!(normalize_quantity("42")?, 42);
/// ```
pub fn normalize_quantity(text: &str) -> SyncResult<u32> {
    match text {
        ">10" => Ok(MANY_ITEMS_STOCK),
        "1" => Ok(0),
        other => other
            .trim()
            .parse::<u32>()
            .map_err(|e| SyncError::Format(format!("invalid quantity '{}': {}", text, e))),
    }
}

/// Оставляет от цены только цифры целой части.
///
/// `"5'990.00 руб."` → `"5990"`, `"Ошибка"` → `""`.
/// Пустая строка означает, что цену получить не удалось.
pub fn normalize_price(text: &str) -> String {
    let integer_part = text.split('.').next().unwrap_or_default();
    integer_part.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Цена как число; пустой результат [`normalize_price`] считается ошибкой формата
pub fn parse_price(text: &str) -> SyncResult<u64> {
    let digits = normalize_price(text);
    if digits.is_empty() {
        return Err(SyncError::Format(format!("price '{}' has no digits", text)));
    }
    digits
        .parse::<u64>()
        .map_err(|e| SyncError::Format(format!("invalid price '{}': {}", text, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_sentinels() {
        assert_eq!(normalize_quantity(">10").unwrap(), 100);
        assert_eq!(normalize_quantity("1").unwrap(), 0);
        assert_eq!(normalize_quantity("42").unwrap(), 42);
        assert_eq!(normalize_quantity("0").unwrap(), 0);
    }

    #[test]
    fn test_quantity_is_exact_match_only() {
        // " 1" не совпадает с сентинелом, но разбирается как число
        assert_eq!(normalize_quantity(" 1").unwrap(), 1);
        assert!(normalize_quantity(">5").is_err());
    }

    #[test]
    fn test_quantity_rejects_garbage() {
        assert!(matches!(normalize_quantity("abc"), Err(SyncError::Format(_))));
        assert!(matches!(normalize_quantity(""), Err(SyncError::Format(_))));
        assert!(matches!(normalize_quantity("-3"), Err(SyncError::Format(_))));
    }

    #[test]
    fn test_normalize_price() {
        assert_eq!(normalize_price("5'990.00 руб."), "5990");
        assert_eq!(normalize_price("1'500.00 р."), "1500");
        assert_eq!(normalize_price("12 345"), "12345");
        assert_eq!(normalize_price("Ошибка"), "");
        assert_eq!(normalize_price(""), "");
        assert_eq!(normalize_price(".99"), "");
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("5'990.00 руб.").unwrap(), 5990);
        assert!(matches!(parse_price("Ошибка"), Err(SyncError::Format(_))));
    }
}
