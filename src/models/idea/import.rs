//! Spreadsheet import for the idea tank.
//!
//! Reading the workbook (`read_workbook`) is kept apart from interpreting
//! its rows (`parse_rows`) so the column and row rules work on plain
//! string grids.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use sqlx::PgPool;

use crate::errors::AppError;
use super::queries;
use super::types::{IdeaInput, ImportResult, TEXT_FIELDS};

/// Header cells every sheet must have.
pub const REQUIRED_COLUMNS: [&str; 15] = [
    "idea_code",
    "category_idea_type1",
    "idea_inno_type",
    "idea_name",
    "idea_subject",
    "idea_source",
    "customer_target",
    "idea_detail",
    "idea_finance_impact",
    "idea_nonfinance_impact",
    "idea_status",
    "idea_owner_empcode",
    "idea_owner_empname",
    "idea_owner_deposit",
    "idea_owner_contacts",
];

pub const OPTIONAL_COLUMNS: [&str; 2] = ["idea_keywords", "idea_comment"];

/// The first worksheet as a grid of trimmed strings.
#[derive(Debug, Clone, Default)]
pub struct SheetRows {
    /// 1-based sheet row number of `rows[0]`.
    pub first_row: usize,
    pub rows: Vec<Vec<String>>,
}

/// A data row that passed validation.
#[derive(Debug, Clone)]
pub struct ParsedRow {
    pub row_number: usize,
    pub idea: IdeaInput,
}

#[derive(Debug, Default)]
pub struct ParsedSheet {
    pub rows: Vec<ParsedRow>,
    pub errors: Vec<String>,
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    }
}

/// Load the first sheet of an `.xlsx`/`.xls` upload.
pub fn read_workbook(bytes: Vec<u8>) -> Result<SheetRows, AppError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| AppError::Import(format!("Could not read spreadsheet: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::Import("Spreadsheet has no worksheets".to_string()))?
        .map_err(|e| AppError::Import(format!("Could not read first worksheet: {e}")))?;

    let first_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
    let rows = range
        .rows()
        .map(|r| r.iter().map(cell_text).collect())
        .collect();
    Ok(SheetRows { first_row, rows })
}

/// Validate the header and turn data rows into idea inputs.
///
/// A missing required column fails the whole sheet. Blank rows are
/// skipped; rows without a name or detail are reported by sheet row number.
pub fn parse_rows(sheet: &SheetRows) -> Result<ParsedSheet, AppError> {
    let header = sheet
        .rows
        .first()
        .ok_or_else(|| AppError::Import("Spreadsheet is empty".to_string()))?;

    let columns: HashMap<&str, usize> = header
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim(), i))
        .filter(|(name, _)| !name.is_empty())
        .collect();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !columns.contains_key(c))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Import(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )));
    }

    let wanted: Vec<(&str, usize)> = REQUIRED_COLUMNS
        .iter()
        .chain(OPTIONAL_COLUMNS.iter())
        .filter_map(|name| columns.get(name).map(|&i| (*name, i)))
        .collect();

    let mut parsed = ParsedSheet::default();
    for (offset, row) in sheet.rows.iter().enumerate().skip(1) {
        let row_number = sheet.first_row + offset;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut idea = IdeaInput::default();
        for (name, index) in &wanted {
            if let Some(value) = row.get(*index).map(|v| v.trim()).filter(|v| !v.is_empty()) {
                idea.set(name, value.to_string());
            }
        }

        if idea.idea_name.is_none() {
            parsed.errors.push(format!("Row {row_number}: idea_name is required"));
            continue;
        }
        if idea.idea_detail.is_none() {
            parsed.errors.push(format!("Row {row_number}: idea_detail is required"));
            continue;
        }
        parsed.rows.push(ParsedRow { row_number, idea });
    }
    Ok(parsed)
}

/// Insert every parsed row independently; failures are recorded, not fatal.
pub async fn import_rows(pool: &PgPool, parsed: ParsedSheet) -> ImportResult {
    let mut result = ImportResult {
        imported_count: 0,
        errors: parsed.errors,
    };
    for row in parsed.rows {
        match queries::create(pool, &row.idea).await {
            Ok(_) => result.imported_count += 1,
            Err(e) => {
                log::warn!("Import row {} failed: {e}", row.row_number);
                result.errors.push(format!("Row {}: could not be saved", row.row_number));
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn sheet(rows: Vec<Vec<String>>) -> SheetRows {
        SheetRows { first_row: 1, rows }
    }

    fn full_header() -> Vec<String> {
        REQUIRED_COLUMNS
            .iter()
            .chain(OPTIONAL_COLUMNS.iter())
            .map(|c| c.to_string())
            .collect()
    }

    fn data_row(name: &str, detail: &str) -> Vec<String> {
        let mut row = vec![String::new(); 17];
        row[0] = "IDX-1".to_string();
        row[3] = name.to_string();
        row[7] = detail.to_string();
        row[15] = "fintech".to_string();
        row
    }

    #[test]
    fn import_columns_are_stored_fields() {
        for c in REQUIRED_COLUMNS.iter().chain(OPTIONAL_COLUMNS.iter()) {
            assert!(TEXT_FIELDS.contains(c), "{c}");
        }
    }

    #[test]
    fn missing_required_column_rejects_sheet() {
        let mut header = full_header();
        header.retain(|c| c != "idea_status");
        let err = parse_rows(&sheet(vec![header])).unwrap_err();
        assert!(err.to_string().contains("idea_status"));
    }

    #[test]
    fn empty_sheet_is_rejected() {
        assert!(parse_rows(&sheet(vec![])).is_err());
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let header = strings(&REQUIRED_COLUMNS);
        let mut row = vec![String::new(); 15];
        row[3] = "Name".to_string();
        row[7] = "Detail".to_string();
        let parsed = parse_rows(&sheet(vec![header, row])).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert!(parsed.rows[0].idea.idea_keywords.is_none());
    }

    #[test]
    fn blank_rows_skipped_and_malformed_rows_reported() {
        let rows = vec![
            full_header(),
            data_row("Smart kiosk", "Self-service loan kiosk"),
            vec![String::new(); 17],
            data_row("Orphan", ""),
            data_row("", "Some detail"),
        ];
        let parsed = parse_rows(&sheet(rows)).unwrap();

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].row_number, 2);
        assert_eq!(parsed.rows[0].idea.idea_keywords.as_deref(), Some("fintech"));
        assert_eq!(
            parsed.errors,
            vec![
                "Row 4: idea_detail is required".to_string(),
                "Row 5: idea_name is required".to_string(),
            ]
        );
    }

    #[test]
    fn row_numbers_follow_sheet_offset() {
        let rows = vec![full_header(), data_row("", "x")];
        let parsed = parse_rows(&SheetRows { first_row: 3, rows }).unwrap();
        assert_eq!(parsed.errors, vec!["Row 4: idea_name is required".to_string()]);
    }

    #[test]
    fn header_order_does_not_matter() {
        let mut header = full_header();
        header.reverse();
        let mut row = data_row("N", "D");
        row.reverse();
        let parsed = parse_rows(&sheet(vec![header, row])).unwrap();
        assert_eq!(parsed.rows[0].idea.idea_name.as_deref(), Some("N"));
        assert_eq!(parsed.rows[0].idea.idea_code.as_deref(), Some("IDX-1"));
    }

    #[test]
    fn whole_number_cells_lose_decimal_point() {
        assert_eq!(cell_text(&Data::Float(1234.0)), "1234");
        assert_eq!(cell_text(&Data::String("  x ".into())), "x");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn real_workbook_keeps_sheet_row_numbers() {
        let bytes = include_bytes!("../../../tests/fixtures/ideas.xlsx").to_vec();
        let sheet = read_workbook(bytes).unwrap();
        // Row 1 of the fixture is blank, so the header sits on row 2.
        assert_eq!(sheet.first_row, 2);

        let parsed = parse_rows(&sheet).unwrap();
        assert_eq!(parsed.errors, vec!["Row 4: idea_detail is required"]);
        let numbers: Vec<usize> = parsed.rows.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![3, 5]);
        assert_eq!(parsed.rows[0].idea.idea_owner_empcode.as_deref(), Some("1001"));
    }
}
