use crate::utils::error::{ForecastError, Result};

/// A CSV file held as strings, header order preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ForecastError::dataset("CSV has no header row"));
        }

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() > headers.len() {
                tracing::warn!(
                    "CSV row {} has {} fields but the header has {}; extra fields dropped",
                    index + 1,
                    record.len(),
                    headers.len()
                );
            }
            // every row matches the header width: short rows padded, long rows cut
            let mut row: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| ForecastError::dataset(format!("Failed to flush CSV writer: {}", e)))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell value, `None` for a missing column or an empty cell.
    pub fn cell<'a>(&'a self, row: &'a [String], column: Option<usize>) -> Option<&'a str> {
        column
            .and_then(|idx| row.get(idx))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Appends a column computed from each row.
    pub fn push_column<F>(&mut self, name: &str, mut value: F)
    where
        F: FnMut(&[String]) -> String,
    {
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            let v = value(row);
            row.push(v);
        }
    }
}
