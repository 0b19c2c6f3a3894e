use std::io::Write;

use common::{IndicatorError, Result};
use serde_json::{Map, Value};

use crate::frame::{Column, Table};

fn cell_text(column: &Column, row: usize) -> String {
    match column {
        Column::Numeric(v) => v[row].map(|x| x.to_string()).unwrap_or_default(),
        Column::Flag(v) => v[row].to_string(),
        Column::Text(v) => v[row].clone(),
        Column::Timestamp(v) => v[row].to_rfc3339(),
    }
}

fn cell_json(column: &Column, row: usize) -> Value {
    match column {
        Column::Numeric(v) => v[row].map_or(Value::Null, Value::from),
        Column::Flag(v) => Value::Bool(v[row]),
        Column::Text(v) => Value::String(v[row].clone()),
        Column::Timestamp(v) => Value::String(v[row].to_rfc3339()),
    }
}

/// Write the table as CSV; undefined values become empty cells
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let csv_err = |e: csv::Error| IndicatorError::CsvError(e.to_string());

    csv_writer.write_record(table.column_names()).map_err(csv_err)?;
    for row in 0..table.len() {
        let record: Vec<String> = table.columns().map(|(_, col)| cell_text(col, row)).collect();
        csv_writer.write_record(&record).map_err(csv_err)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// One JSON object per row, keyed by column name; undefined values are null
pub fn to_records(table: &Table) -> Vec<Value> {
    (0..table.len())
        .map(|row| {
            let object: Map<String, Value> = table
                .columns()
                .map(|(name, col)| (name.to_string(), cell_json(col, row)))
                .collect();
            Value::Object(object)
        })
        .collect()
}

pub fn write_json<W: Write>(table: &Table, writer: W, pretty: bool) -> Result<()> {
    let records = to_records(table);
    if pretty {
        serde_json::to_writer_pretty(writer, &records)?;
    } else {
        serde_json::to_writer(writer, &records)?;
    }
    Ok(())
}
