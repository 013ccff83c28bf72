use crate::core::dataset::Table;
use crate::core::{HistoricalRecord, Storage};
use crate::utils::error::Result;
use chrono::NaiveDate;

pub const SUCCESS_COLUMN: &str = "success";
pub const CLASS_COLUMN: &str = "Class";

/// Loads the processed history, deriving and persisting it from the raw file when needed.
pub async fn load_history<S: Storage>(
    storage: &S,
    raw_path: &str,
    processed_path: &str,
) -> Result<Vec<HistoricalRecord>> {
    let table = load_history_table(storage, raw_path, processed_path).await?;
    Ok(records_from_table(&table))
}

pub async fn load_history_table<S: Storage>(
    storage: &S,
    raw_path: &str,
    processed_path: &str,
) -> Result<Table> {
    if storage.exists(processed_path).await {
        match read_table(storage, processed_path).await {
            Ok(table) => {
                tracing::info!("Loaded {} history rows from {}", table.len(), processed_path);
                return Ok(table);
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable processed dataset {}: {}", processed_path, e);
            }
        }
    }

    if !storage.exists(raw_path).await {
        tracing::warn!(
            "No dataset at {} or {}; serving an empty history",
            processed_path,
            raw_path
        );
        return Ok(Table::default());
    }

    let mut table = read_table(storage, raw_path).await?;
    ensure_success_column(&mut table);
    storage
        .write_file(processed_path, &table.to_csv_bytes()?)
        .await?;
    tracing::info!(
        "Derived {} history rows from {} and saved {}",
        table.len(),
        raw_path,
        processed_path
    );
    Ok(table)
}

async fn read_table<S: Storage>(storage: &S, path: &str) -> Result<Table> {
    let bytes = storage.read_file(path).await?;
    Table::from_csv_bytes(&bytes)
}

/// Adds `success` from `Class`, or as an all-unknown column when there is no label.
pub fn ensure_success_column(table: &mut Table) {
    if table.has_column(SUCCESS_COLUMN) {
        return;
    }
    match table.column_index(CLASS_COLUMN) {
        Some(class_idx) => table.push_column(SUCCESS_COLUMN, |row| {
            row.get(class_idx).cloned().unwrap_or_default()
        }),
        None => {
            tracing::warn!("Dataset has no {} column; success is unknown for every row", CLASS_COLUMN);
            table.push_column(SUCCESS_COLUMN, |_| String::new());
        }
    }
}

pub fn records_from_table(table: &Table) -> Vec<HistoricalRecord> {
    let flight = table.column_index("FlightNumber");
    let date = table.column_index("Date");
    let payload = table.column_index("PayloadMass");
    let outcome = table.column_index("Outcome");
    let success = table.column_index(SUCCESS_COLUMN);

    table
        .rows
        .iter()
        .map(|row| HistoricalRecord {
            flight_number: table.cell(row, flight).and_then(parse_integer),
            date: table.cell(row, date).and_then(parse_date),
            payload_mass: table.cell(row, payload).and_then(|v| v.parse::<f64>().ok()),
            outcome: table.cell(row, outcome).map(str::to_string),
            success: table.cell(row, success).and_then(parse_label),
        })
        .collect()
}

fn parse_integer(value: &str) -> Option<i64> {
    value
        .parse::<i64>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().filter(|f| f.fract() == 0.0).map(|f| f as i64))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let day = value.split(['T', ' ']).next().unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// 1/1.0/true → landed, 0/0.0/false → did not land, anything else is unknown.
pub fn parse_label(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Some(true),
        "0" | "0.0" | "false" => Some(false),
        _ => None,
    }
}
