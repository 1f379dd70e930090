use calamine::{open_workbook_auto, Data, Range, Reader};
use contracts::domain::inventory::InventoryRecord;
use std::path::Path;

use crate::shared::error::{SyncError, SyncResult};

pub const CODE_COLUMN: &str = "Код";
pub const QUANTITY_COLUMN: &str = "Количество";
pub const PRICE_COLUMN: &str = "Цена";

/// Прочитать первый лист таблицы остатков
pub fn read_sheet(path: &Path, header_row: u32) -> SyncResult<Vec<InventoryRecord>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SyncError::Format("workbook has no sheets".into()))??;
    parse_range(&range, header_row)
}

/// Разобрать лист: заголовок в строке `header_row` (абсолютный номер с нуля),
/// данные — во всех строках ниже.
pub fn parse_range(range: &Range<Data>, header_row: u32) -> SyncResult<Vec<InventoryRecord>> {
    let (Some(start), Some(end)) = (range.start(), range.end()) else {
        return Err(SyncError::Format("inventory sheet is empty".into()));
    };
    if header_row < start.0 || header_row > end.0 {
        return Err(SyncError::Format(format!(
            "header row {} is outside of the sheet (rows {}..={})",
            header_row, start.0, end.0
        )));
    }

    let find_column = |title: &str| -> SyncResult<u32> {
        (start.1..=end.1)
            .find(|col| cell_text(range.get_value((header_row, *col))).trim() == title)
            .ok_or_else(|| {
                SyncError::Format(format!(
                    "column '{}' not found in header row {}",
                    title, header_row
                ))
            })
    };
    let code_col = find_column(CODE_COLUMN)?;
    let quantity_col = find_column(QUANTITY_COLUMN)?;
    let price_col = find_column(PRICE_COLUMN)?;

    let mut records = Vec::new();
    for row in (header_row + 1)..=end.0 {
        let record = InventoryRecord {
            code: cell_text(range.get_value((row, code_col))),
            quantity_text: cell_text(range.get_value((row, quantity_col))),
            price_text: cell_text(range.get_value((row, price_col))),
        };
        if record.code.is_empty() && record.quantity_text.is_empty() && record.price_text.is_empty()
        {
            continue;
        }
        records.push(record);
    }

    tracing::debug!("Parsed {} inventory rows", records.len());
    Ok(records)
}

/// Текст ячейки. Пустая ячейка — пустая строка; целые числа, сохранённые
/// как float, пишутся без дробной части ("1001.0" → "1001").
pub fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.clone(),
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Float(f)) if is_whole_i64(*f) => format!("{}", *f as i64),
        Some(other) => other.to_string(),
    }
}

/// Целое число, которое помещается в i64 без насыщения
fn is_whole_i64(f: f64) -> bool {
    f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

/// Книга xlsx с листом остатков: заголовок в строке 17, как у поставщика
#[cfg(test)]
pub(crate) fn write_test_workbook(path: &Path) {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "Остатки на складе").unwrap();
    worksheet.write_string(17, 0, "Наименование").unwrap();
    worksheet.write_string(17, 1, CODE_COLUMN).unwrap();
    worksheet.write_string(17, 2, QUANTITY_COLUMN).unwrap();
    worksheet.write_string(17, 3, PRICE_COLUMN).unwrap();

    worksheet.write_string(18, 0, "Часы настенные").unwrap();
    worksheet.write_number(18, 1, 1001.0).unwrap();
    worksheet.write_string(18, 2, ">10").unwrap();
    worksheet.write_string(18, 3, "1'500.00 р.").unwrap();

    worksheet.write_string(19, 0, "Часы наручные").unwrap();
    worksheet.write_number(19, 1, 1002.0).unwrap();
    worksheet.write_number(19, 2, 1.0).unwrap();

    worksheet.write_string(21, 0, "Будильник").unwrap();
    worksheet.write_string(21, 1, "GA-100").unwrap();
    worksheet.write_string(21, 2, "3").unwrap();
    worksheet.write_string(21, 3, "700 р.").unwrap();

    workbook.save(path).unwrap();
}

#[cfg(test)]
pub(crate) fn expected_test_records() -> Vec<InventoryRecord> {
    vec![
        InventoryRecord::new("1001", ">10", "1'500.00 р."),
        InventoryRecord::new("1002", "1", ""),
        InventoryRecord::new("GA-100", "3", "700 р."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(header_row: u32, rows: &[[Data; 3]]) -> Range<Data> {
        let last_row = header_row + rows.len() as u32;
        let mut range = Range::new((0, 0), (last_row, 3));
        range.set_value((0, 0), Data::String("Остатки на складе".into()));
        range.set_value((header_row, 0), Data::String("Наименование".into()));
        range.set_value((header_row, 1), Data::String(CODE_COLUMN.into()));
        range.set_value((header_row, 2), Data::String(QUANTITY_COLUMN.into()));
        range.set_value((header_row, 3), Data::String(PRICE_COLUMN.into()));
        for (i, row) in rows.iter().enumerate() {
            let r = header_row + 1 + i as u32;
            range.set_value((r, 0), Data::String(format!("Часы {}", i)));
            for (c, value) in row.iter().enumerate() {
                range.set_value((r, 1 + c as u32), value.clone());
            }
        }
        range
    }

    #[test]
    fn test_parse_rows_after_header() {
        let range = sheet(
            3,
            &[
                [
                    Data::Float(1001.0),
                    Data::String(">10".into()),
                    Data::String("1'500.00 р.".into()),
                ],
                [Data::String("GA-100".into()), Data::Int(4), Data::Empty],
            ],
        );

        let records = parse_range(&range, 3).unwrap();
        assert_eq!(
            records,
            vec![
                InventoryRecord::new("1001", ">10", "1'500.00 р."),
                InventoryRecord::new("GA-100", "4", ""),
            ]
        );
    }

    #[test]
    fn test_blank_rows_skipped() {
        let range = sheet(
            1,
            &[
                [Data::Empty, Data::Empty, Data::Empty],
                [Data::Int(7), Data::Int(2), Data::String("100".into())],
            ],
        );
        let records = parse_range(&range, 1).unwrap();
        assert_eq!(records, vec![InventoryRecord::new("7", "2", "100")]);
    }

    #[test]
    fn test_missing_column_is_format_error() {
        let mut range = sheet(2, &[]);
        range.set_value((2, 3), Data::String("Стоимость".into()));
        assert!(matches!(parse_range(&range, 2), Err(SyncError::Format(_))));
    }

    #[test]
    fn test_header_outside_sheet() {
        let range = sheet(2, &[]);
        assert!(matches!(parse_range(&range, 40), Err(SyncError::Format(_))));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(None), "");
        assert_eq!(cell_text(Some(&Data::Empty)), "");
        assert_eq!(cell_text(Some(&Data::Float(12.0))), "12");
        assert_eq!(cell_text(Some(&Data::Float(12.5))), "12.5");
        assert_eq!(cell_text(Some(&Data::Int(-3))), "-3");
    }

    #[test]
    fn test_cell_text_large_float_not_saturated() {
        let text = cell_text(Some(&Data::Float(1e19)));
        assert_ne!(text, i64::MAX.to_string());
        assert_eq!(text, Data::Float(1e19).to_string());
        assert_eq!(cell_text(Some(&Data::Float(-1e19))), Data::Float(-1e19).to_string());
    }

    #[test]
    fn test_read_sheet_from_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ostatki.xlsx");
        write_test_workbook(&path);

        let records = read_sheet(&path, 17).unwrap();
        assert_eq!(records, expected_test_records());
    }

    #[test]
    fn test_read_sheet_wrong_header_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ostatki.xlsx");
        write_test_workbook(&path);

        assert!(matches!(read_sheet(&path, 18), Err(SyncError::Format(_))));
    }
}
