use std::collections::HashSet;

use chrono::{DateTime, Utc};
use common::{Bar, IndicatorError, Result, Series};

pub const TIMESTAMP: &str = "timestamp";
pub const SYMBOL: &str = "symbol";
pub const OPEN: &str = "open";
pub const HIGH: &str = "high";
pub const LOW: &str = "low";
pub const CLOSE: &str = "close";
pub const VOLUME: &str = "volume";
pub const VWAP: &str = "vwap";

/// One named column of a [`Table`]
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Series),
    Flag(Vec<bool>),
    Text(Vec<String>),
    Timestamp(Vec<DateTime<Utc>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Flag(v) => v.len(),
            Column::Text(v) => v.len(),
            Column::Timestamp(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Column::Numeric(_) => "numeric",
            Column::Flag(_) => "flag",
            Column::Text(_) => "text",
            Column::Timestamp(_) => "timestamp",
        }
    }

    /// Rows at `indices`, in that order
    pub fn take(&self, indices: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(indices.iter().map(|&i| v[i]).collect()),
            Column::Flag(v) => Column::Flag(indices.iter().map(|&i| v[i]).collect()),
            Column::Text(v) => Column::Text(indices.iter().map(|&i| v[i].clone()).collect()),
            Column::Timestamp(v) => Column::Timestamp(indices.iter().map(|&i| v[i]).collect()),
        }
    }

    /// Rebuild a full-length column from per-group pieces.
    ///
    /// Each part pairs the original row indices of a group with the column
    /// computed for that group; together the parts must cover `len` rows.
    pub(crate) fn assemble(parts: &[(&[usize], &Column)], len: usize) -> Result<Column> {
        let Some((_, first)) = parts.first() else {
            return Err(IndicatorError::InvalidParameter(
                "cannot assemble a column from zero parts".to_string(),
            ));
        };

        let mut out = match first {
            Column::Numeric(_) => Column::Numeric(vec![None; len]),
            Column::Flag(_) => Column::Flag(vec![false; len]),
            Column::Text(_) => Column::Text(vec![String::new(); len]),
            Column::Timestamp(_) => Column::Timestamp(vec![DateTime::<Utc>::default(); len]),
        };

        for (indices, part) in parts {
            if indices.len() != part.len() {
                return Err(IndicatorError::LengthMismatch {
                    column: part.kind().to_string(),
                    expected: indices.len(),
                    actual: part.len(),
                });
            }
            match (&mut out, part) {
                (Column::Numeric(dst), Column::Numeric(src)) => scatter(dst, indices, src),
                (Column::Flag(dst), Column::Flag(src)) => scatter(dst, indices, src),
                (Column::Text(dst), Column::Text(src)) => scatter(dst, indices, src),
                (Column::Timestamp(dst), Column::Timestamp(src)) => scatter(dst, indices, src),
                (dst, src) => {
                    return Err(IndicatorError::InvalidParameter(format!(
                        "group results disagree on column type: {} vs {}",
                        dst.kind(),
                        src.kind()
                    )))
                }
            }
        }

        Ok(out)
    }
}

fn scatter<T: Clone>(dst: &mut [T], indices: &[usize], src: &[T]) {
    for (&row, value) in indices.iter().zip(src) {
        dst[row] = value.clone();
    }
}

/// Equal-length named columns sharing one row index
///
/// Tables are values: adding columns produces a new table and leaves the
/// original untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    len: usize,
    columns: Vec<(String, Column)>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from named columns; names must be distinct
    pub fn from_columns(columns: Vec<(String, Column)>) -> Result<Self> {
        let mut seen = HashSet::new();
        if let Some((name, _)) = columns.iter().find(|(name, _)| !seen.insert(name.as_str())) {
            return Err(IndicatorError::InvalidParameter(format!(
                "duplicate column name '{}'",
                name
            )));
        }
        Table::new().with_columns(columns)
    }

    /// OHLCV columns from bars; `symbol` and `vwap` only when some bar has them
    pub fn from_bars(bars: &[Bar]) -> Self {
        let mut columns = vec![
            (
                TIMESTAMP.to_string(),
                Column::Timestamp(bars.iter().map(|b| b.timestamp).collect()),
            ),
        ];
        if bars.iter().any(|b| b.symbol.is_some()) {
            columns.push((
                SYMBOL.to_string(),
                Column::Text(bars.iter().map(|b| b.symbol.clone().unwrap_or_default()).collect()),
            ));
        }
        let numeric = |f: fn(&Bar) -> f64| Column::Numeric(bars.iter().map(|b| Some(f(b))).collect());
        columns.push((OPEN.to_string(), numeric(|b| b.open)));
        columns.push((HIGH.to_string(), numeric(|b| b.high)));
        columns.push((LOW.to_string(), numeric(|b| b.low)));
        columns.push((CLOSE.to_string(), numeric(|b| b.close)));
        columns.push((VOLUME.to_string(), numeric(|b| b.volume)));
        if bars.iter().any(|b| b.vwap.is_some()) {
            columns.push((
                VWAP.to_string(),
                Column::Numeric(bars.iter().map(|b| b.vwap).collect()),
            ));
        }

        Self {
            len: bars.len(),
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(name, col)| (name.as_str(), col))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    fn get(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| IndicatorError::missing([name]))
    }

    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>]> {
        match self.get(name)? {
            Column::Numeric(v) => Ok(v),
            other => Err(wrong_kind(name, "numeric", other)),
        }
    }

    pub fn flags(&self, name: &str) -> Result<&[bool]> {
        match self.get(name)? {
            Column::Flag(v) => Ok(v),
            other => Err(wrong_kind(name, "flag", other)),
        }
    }

    pub fn text(&self, name: &str) -> Result<&[String]> {
        match self.get(name)? {
            Column::Text(v) => Ok(v),
            other => Err(wrong_kind(name, "text", other)),
        }
    }

    /// Fails with every absent name at once
    pub fn require(&self, names: &[&str]) -> Result<()> {
        let mut seen = HashSet::new();
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| !self.contains(name) && seen.insert(*name))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(IndicatorError::missing(missing))
        }
    }

    /// Append `column`, or replace an existing column of the same name in place
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        let name = name.into();
        if self.columns.is_empty() {
            self.len = column.len();
        } else if column.len() != self.len {
            return Err(IndicatorError::LengthMismatch {
                column: name,
                expected: self.len,
                actual: column.len(),
            });
        }

        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = column,
            None => self.columns.push((name, column)),
        }
        Ok(self)
    }

    pub fn with_columns(self, columns: Vec<(String, Column)>) -> Result<Self> {
        columns
            .into_iter()
            .try_fold(self, |table, (name, column)| table.with_column(name, column))
    }

    /// Sub-table of the rows at `indices`, in that order
    pub fn take(&self, indices: &[usize]) -> Table {
        Table {
            len: indices.len(),
            columns: self
                .columns
                .iter()
                .map(|(name, col)| (name.clone(), col.take(indices)))
                .collect(),
        }
    }
}

fn wrong_kind(name: &str, expected: &str, actual: &Column) -> IndicatorError {
    IndicatorError::InvalidParameter(format!(
        "column '{}' is {}, expected {}",
        name,
        actual.kind(),
        expected
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use common::series;

    fn bars() -> Vec<Bar> {
        (0..3)
            .map(|i| {
                let ts = Utc.with_ymd_and_hms(2024, 1, 1 + i, 0, 0, 0).unwrap();
                Bar::new(ts, 10.0, 11.0, 9.0, 10.0 + i as f64, 100.0).with_symbol("AAA")
            })
            .collect()
    }

    #[test]
    fn test_from_bars() {
        let table = Table::from_bars(&bars());

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.column_names(),
            vec!["timestamp", "symbol", "open", "high", "low", "close", "volume"]
        );
        assert_eq!(table.numeric(CLOSE).unwrap(), &[Some(10.0), Some(11.0), Some(12.0)]);
        assert_eq!(table.text(SYMBOL).unwrap()[0], "AAA");
    }

    #[test]
    fn test_with_column_leaves_original_untouched() {
        let original = Table::from_bars(&bars());
        let augmented = original
            .clone()
            .with_column("extra", Column::Numeric(series(&[1.0, 2.0, 3.0])))
            .unwrap();

        assert!(!original.contains("extra"));
        assert!(augmented.contains("extra"));
        assert_eq!(augmented.numeric(CLOSE).unwrap(), original.numeric(CLOSE).unwrap());
    }

    #[test]
    fn test_with_column_overwrites_in_place() {
        let table = Table::from_bars(&bars())
            .with_column(OPEN, Column::Numeric(vec![None; 3]))
            .unwrap();
        assert_eq!(table.column_names()[2], OPEN);
        assert_eq!(table.numeric(OPEN).unwrap(), &[None, None, None]);
    }

    #[test]
    fn test_length_mismatch() {
        let err = Table::from_bars(&bars())
            .with_column("short", Column::Flag(vec![true]))
            .unwrap_err();
        assert!(matches!(err, IndicatorError::LengthMismatch { expected: 3, actual: 1, .. }));
    }

    #[test]
    fn test_from_columns_rejects_duplicate_names() {
        let err = Table::from_columns(vec![
            (CLOSE.to_string(), Column::Numeric(series(&[1.0]))),
            (CLOSE.to_string(), Column::Numeric(series(&[2.0]))),
        ])
        .unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidParameter(ref m) if m.contains("close")));
    }

    #[test]
    fn test_require_lists_all_missing() {
        let table = Table::from_columns(vec![(CLOSE.to_string(), Column::Numeric(series(&[1.0])))])
            .unwrap();
        match table.require(&[HIGH, CLOSE, LOW]) {
            Err(IndicatorError::MissingColumn { columns }) => assert_eq!(columns, vec!["high", "low"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_wrong_kind() {
        let table = Table::from_bars(&bars());
        assert!(matches!(table.numeric(SYMBOL), Err(IndicatorError::InvalidParameter(_))));
        assert!(matches!(table.numeric("nope"), Err(IndicatorError::MissingColumn { .. })));
    }

    #[test]
    fn test_take_and_assemble() {
        let col = Column::Numeric(series(&[1.0, 2.0, 3.0, 4.0]));
        let evens: &[usize] = &[0, 2];
        let odds: &[usize] = &[1, 3];
        let a = col.take(evens);
        let b = col.take(odds);

        let rebuilt = Column::assemble(&[(evens, &a), (odds, &b)], 4).unwrap();
        assert_eq!(rebuilt, col);
    }
}
