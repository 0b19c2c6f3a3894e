use std::collections::HashMap;

use common::{IndicatorError, Result};
use rayon::prelude::*;
use tracing::debug;

use crate::frame::{Column, Table};

/// How rows are partitioned before an indicator runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GroupBy {
    /// The whole table is one group
    #[default]
    None,
    /// Rows sharing a value of this text column form a group
    Column(String),
}

impl GroupBy {
    pub fn column(name: impl Into<String>) -> Self {
        GroupBy::Column(name.into())
    }

    pub fn key_column(&self) -> Option<&str> {
        match self {
            GroupBy::None => None,
            GroupBy::Column(name) => Some(name),
        }
    }
}

impl From<Option<String>> for GroupBy {
    fn from(column: Option<String>) -> Self {
        column.map_or(GroupBy::None, GroupBy::Column)
    }
}

/// Row indices of each group, groups in order of first appearance
pub fn group_indices(table: &Table, group_by: &GroupBy) -> Result<Vec<Vec<usize>>> {
    let GroupBy::Column(key) = group_by else {
        return Ok(vec![(0..table.len()).collect()]);
    };
    let keys = table.text(key)?;

    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (row, value) in keys.iter().enumerate() {
        let slot = *slots.entry(value.as_str()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(row);
    }

    Ok(groups)
}

/// Check the grouping key before any computation starts
pub fn validate_group_by(table: &Table, group_by: &GroupBy) -> Result<()> {
    match group_by {
        GroupBy::None => Ok(()),
        GroupBy::Column(key) => table.text(key).map(|_| ()),
    }
}

/// Run `compute` on each group's rows and append its columns in original row order
///
/// `compute` sees a sub-table holding only one group's rows, in their original
/// relative order, and returns the new columns for those rows. Groups run in
/// parallel; results are placed back by row index.
pub fn apply_grouped<F>(table: &Table, group_by: &GroupBy, compute: F) -> Result<Table>
where
    F: Fn(&Table) -> Result<Vec<(String, Column)>> + Sync,
{
    if matches!(group_by, GroupBy::None) || table.is_empty() {
        validate_group_by(table, group_by)?;
        let columns = compute(table)?;
        return table.clone().with_columns(columns);
    }

    let groups = group_indices(table, group_by)?;
    debug!(groups = groups.len(), rows = table.len(), "computing per group");

    let results: Vec<Vec<(String, Column)>> = groups
        .par_iter()
        .map(|rows| compute(&table.take(rows)))
        .collect::<Result<_>>()?;

    let Some(first) = results.first() else {
        return Ok(table.clone());
    };

    let mut assembled = Vec::with_capacity(first.len());
    for (j, (name, _)) in first.iter().enumerate() {
        let mut parts = Vec::with_capacity(groups.len());
        for (rows, columns) in groups.iter().zip(&results) {
            match columns.get(j) {
                Some((n, col)) if n == name => parts.push((rows.as_slice(), col)),
                _ => {
                    return Err(IndicatorError::InvalidParameter(format!(
                        "groups produced different output columns at '{}'",
                        name
                    )))
                }
            }
        }
        assembled.push((name.clone(), Column::assemble(&parts, table.len())?));
    }

    table.clone().with_columns(assembled)
}
