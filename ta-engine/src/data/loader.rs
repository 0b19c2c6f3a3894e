use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use common::{Bar, IndicatorError, Result};
use tracing::debug;

use crate::frame::{Column, Table, SYMBOL};

/// Header names recognised as the ordering key
const TIMESTAMP_HEADERS: [&str; 4] = ["timestamp", "datetime", "date", "time"];

/// Cell values read as undefined
const NA_TOKENS: [&str; 5] = ["", "na", "nan", "null", "none"];

/// Load a table from a CSV file
///
/// The header row names the columns. `symbol` is read as text and a
/// `timestamp`/`datetime`/`date`/`time` column as timestamps. Any other column
/// is numeric when all its cells parse, with empty or `NA`-like cells
/// undefined, and text otherwise.
pub fn load_csv(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|e| IndicatorError::DataLoadError(e.to_string()))?;
    read_csv(BufReader::new(file))
}

/// Parse CSV from any reader; see [`load_csv`]
pub fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| IndicatorError::CsvError(e.to_string()))?
        .iter()
        .map(|h| h.to_lowercase())
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in csv_reader.records() {
        let record = result.map_err(|e| IndicatorError::CsvError(e.to_string()))?;
        for (j, column) in cells.iter_mut().enumerate() {
            column.push(record.get(j).unwrap_or("").to_string());
        }
    }

    let mut columns = Vec::with_capacity(headers.len());
    for (name, raw) in headers.into_iter().zip(cells) {
        let column = if name == SYMBOL {
            Column::Text(raw)
        } else if TIMESTAMP_HEADERS.contains(&name.as_str()) {
            Column::Timestamp(
                raw.iter()
                    .map(|s| parse_timestamp(s))
                    .collect::<Result<Vec<_>>>()?,
            )
        } else {
            infer_column(raw)
        };
        columns.push((name, column));
    }

    let table = Table::from_columns(columns)?;
    debug!(rows = table.len(), columns = ?table.column_names(), "loaded csv");
    Ok(table)
}

/// Load bars from JSON file
pub fn load_json(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|e| IndicatorError::DataLoadError(e.to_string()))?;
    let reader = BufReader::new(file);
    let bars: Vec<Bar> = serde_json::from_reader(reader)?;
    Ok(Table::from_bars(&bars))
}

/// Numeric when every cell is a number or an NA token, text otherwise
fn infer_column(raw: Vec<String>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = raw.iter().map(|s| parse_number(s)).collect();
    match parsed {
        Some(values) => Column::Numeric(values),
        None => Column::Text(raw),
    }
}

/// `Some(None)` for NA cells, `None` when the cell is not a number
fn parse_number(s: &str) -> Option<Option<f64>> {
    if NA_TOKENS.contains(&s.to_lowercase().as_str()) {
        return Some(None);
    }
    let value: f64 = s.parse().ok()?;
    Some(value.is_finite().then_some(value))
}

/// Parse timestamp from various formats
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    // Try ISO 8601 format first
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Try common formats
    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d",
    ];

    for fmt in &formats {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&dt));
        }
        if let Ok(date) = chrono::NaiveDate::parse_from_str(s, fmt) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return Ok(Utc.from_utc_datetime(&dt));
            }
        }
    }

    // Try Unix timestamp (seconds)
    if let Ok(ts) = s.parse::<i64>() {
        if let Some(dt) = DateTime::from_timestamp(ts, 0) {
            return Ok(dt);
        }
    }

    Err(IndicatorError::CsvError(format!(
        "Unable to parse timestamp: {}",
        s
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augment::{add_sma, AddOptions};
    use crate::frame::{CLOSE, TIMESTAMP};
    use crate::partition::GroupBy;
    use chrono::{Datelike, Timelike};
    use std::io::Write;

    #[test]
    fn test_parse_timestamp_iso() {
        let ts = parse_timestamp("2024-01-15T09:30:00Z").unwrap();
        assert_eq!(ts.year(), 2024);
        assert_eq!(ts.month(), 1);
        assert_eq!(ts.day(), 15);
    }

    #[test]
    fn test_parse_timestamp_common() {
        let ts = parse_timestamp("2024-01-15 09:30:00").unwrap();
        assert_eq!(ts.year(), 2024);
    }

    #[test]
    fn test_parse_timestamp_date_only() {
        let ts = parse_timestamp("2024-01-15").unwrap();
        assert_eq!(ts.year(), 2024);
        assert_eq!(ts.hour(), 0);
    }

    #[test]
    fn test_parse_timestamp_unix() {
        let ts = parse_timestamp("1705312200").unwrap();
        assert!(ts.year() >= 2024);
    }

    #[test]
    fn test_read_csv_with_gaps_and_symbols() {
        let data = "Date,Symbol,Close,Volume\n\
                    2024-01-02,AAA,10.5,100\n\
                    2024-01-02,BBB,NA,200\n\
                    2024-01-03,AAA,,300\n";
        let table = read_csv(data.as_bytes()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.column_names(), vec!["date", "symbol", "close", "volume"]);
        assert_eq!(table.numeric(CLOSE).unwrap(), &[Some(10.5), None, None]);
        assert_eq!(table.text(SYMBOL).unwrap()[1], "BBB");
        assert!(matches!(table.column("date"), Some(Column::Timestamp(_))));
    }

    #[test]
    fn test_non_numeric_columns_become_text() {
        let data = "ticker,sector,close\n\
                    AAA,tech,1.0\n\
                    BBB,NA,2.0\n";
        let table = read_csv(data.as_bytes()).unwrap();

        assert_eq!(table.text("ticker").unwrap(), &["AAA".to_string(), "BBB".to_string()]);
        // NA stays literal once the column is text
        assert_eq!(table.text("sector").unwrap()[1], "NA");
        assert_eq!(table.numeric(CLOSE).unwrap(), &[Some(1.0), Some(2.0)]);
    }

    #[test]
    fn test_group_by_loaded_text_key() {
        let data = "ticker,close\n\
                    AAA,1.0\n\
                    BBB,10.0\n\
                    AAA,3.0\n\
                    BBB,30.0\n";
        let table = read_csv(data.as_bytes()).unwrap();
        let opts = AddOptions::new().group_by(GroupBy::column("ticker"));

        let out = add_sma(&table, 2, &opts).unwrap();
        assert_eq!(out.numeric("sma_2").unwrap(), &[None, None, Some(2.0), Some(20.0)]);
    }

    #[test]
    fn test_duplicate_headers_rejected() {
        let data = "Close,close\n1.0,2.0\n";
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidParameter(_)));
    }

    #[test]
    fn test_load_json_bars() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"timestamp":"2024-01-02T00:00:00Z","symbol":"AAA","open":1.0,"high":2.0,"low":0.5,"close":1.5,"volume":10.0}}]"#
        )
        .unwrap();

        let table = load_json(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.contains(TIMESTAMP));
        assert_eq!(table.text(SYMBOL).unwrap(), &["AAA".to_string()]);
    }
}
