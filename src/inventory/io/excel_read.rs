use std::path::Path;
use std::str::FromStr;

use calamine::{DataType, Range, Reader, open_workbook_auto};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::{debug, instrument};

use crate::inventory::error::{Result, SyncError};
use crate::inventory::model::{ReadMode, Row};

const AVAILABLE_COLUMN: usize = 0;
const TOTAL_COLUMN: usize = 1;
const PRICE_COLUMN: usize = 2;
const PART_COLUMN: usize = 3;

const EXPECTED_COUNT: &str = "a non-negative integer";
const EXPECTED_PRICE: &str = "a decimal number";
const EXPECTED_PART: &str = "a part number";

/// Which sheet to read and how its first row is treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetOptions {
    /// Zero-based position of the sheet in the workbook.
    pub sheet_index: usize,
    /// Skip the first row of the used range as a header.
    pub skip_header: bool,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            sheet_index: 0,
            skip_header: true,
        }
    }
}

/// Reads the inventory rows from one sheet of a workbook.
///
/// Columns are addressed by position: available stock, total stock, unit
/// price, internal part number. Fully blank rows are ignored. In
/// [`ReadMode::Single`] only the first data row is coerced and returned.
/// Either every requested row is returned or an error is.
#[instrument(
    level = "info",
    skip_all,
    fields(path = %path.display(), sheet = options.sheet_index, %mode)
)]
pub fn read_rows(path: &Path, options: &SheetOptions, mode: ReadMode) -> Result<Vec<Row>> {
    if !path.exists() {
        return Err(SyncError::NotFound(path.to_path_buf()));
    }

    let mut workbook = open_workbook_auto(path).map_err(|error| match error {
        calamine::Error::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
            SyncError::NotFound(path.to_path_buf())
        }
        other => SyncError::from(other),
    })?;

    let available = workbook.sheet_names().len();
    let range = workbook
        .worksheet_range_at(options.sheet_index)
        .ok_or(SyncError::SheetOutOfRange {
            index: options.sheet_index,
            available,
        })??;

    let rows = collect_rows(&range, options.skip_header, mode)?;
    if rows.is_empty() {
        return Err(SyncError::EmptySheet);
    }
    debug!(row_count = rows.len(), "rows read from sheet");
    Ok(rows)
}

fn collect_rows(range: &Range<DataType>, skip_header: bool, mode: ReadMode) -> Result<Vec<Row>> {
    let (Some((first_row, _)), Some((last_row, _))) = (range.start(), range.end()) else {
        return Ok(Vec::new());
    };
    let first_data_row = if skip_header { first_row + 1 } else { first_row };

    let mut rows = Vec::new();
    for row_idx in first_data_row..=last_row {
        let cell = |column: usize| range.get_value((row_idx, column as u32));
        if (AVAILABLE_COLUMN..=PART_COLUMN).all(|column| is_blank(cell(column))) {
            continue;
        }

        let line = row_idx + 1;
        rows.push(Row {
            available_stock: coerce_count(cell(AVAILABLE_COLUMN), line, AVAILABLE_COLUMN)?,
            total_stock: coerce_count(cell(TOTAL_COLUMN), line, TOTAL_COLUMN)?,
            unit_price: coerce_price(cell(PRICE_COLUMN), line)?,
            internal_part_number: coerce_part(cell(PART_COLUMN), line)?,
        });

        if mode == ReadMode::Single {
            break;
        }
    }

    Ok(rows)
}

fn coerce_count(cell: Option<&DataType>, line: u32, column: usize) -> Result<u64> {
    let parsed = match cell {
        Some(DataType::Int(value)) => u64::try_from(*value).ok(),
        Some(DataType::Float(value)) if value.is_finite() && value.trunc() >= 0.0 => {
            Some(value.trunc() as u64)
        }
        Some(DataType::String(value)) => value.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| invalid(cell, line, column, EXPECTED_COUNT))
}

fn coerce_price(cell: Option<&DataType>, line: u32) -> Result<Decimal> {
    let parsed = match cell {
        Some(DataType::Int(value)) => Some(Decimal::from(*value)),
        Some(DataType::Float(value)) => Decimal::from_f64(*value),
        Some(DataType::String(value)) => Decimal::from_str(value.trim()).ok(),
        _ => None,
    };
    parsed.ok_or_else(|| invalid(cell, line, PRICE_COLUMN, EXPECTED_PRICE))
}

fn coerce_part(cell: Option<&DataType>, line: u32) -> Result<String> {
    match cell {
        Some(DataType::String(_) | DataType::Int(_) | DataType::Float(_)) => {
            let value = cell_to_string(cell);
            if value.trim().is_empty() {
                Err(invalid(cell, line, PART_COLUMN, EXPECTED_PART))
            } else {
                Ok(value)
            }
        }
        _ => Err(invalid(cell, line, PART_COLUMN, EXPECTED_PART)),
    }
}

fn invalid(cell: Option<&DataType>, row: u32, column: usize, expected: &'static str) -> SyncError {
    SyncError::InvalidCell {
        row,
        column,
        value: cell_to_string(cell),
        expected,
    }
}

fn is_blank(cell: Option<&DataType>) -> bool {
    match cell {
        Some(DataType::Empty) | None => true,
        Some(DataType::String(value)) => value.trim().is_empty(),
        Some(_) => false,
    }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
