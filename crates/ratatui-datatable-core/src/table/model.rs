//! Row pipeline: search, column filters, sorting. Pagination is applied by the view.

use crate::config::ColumnConfig;
use crate::config::ColumnType;
use crate::config::SortSpec;
use crate::filter::ColumnFilters;
use serde_json::Value;
use std::borrow::Cow;
use std::cmp::Ordering;

/// Text of the cell at `key`. Dotted keys (`address.city`) reach into nested objects; missing
/// and null values are empty.
pub fn cell_text<'a>(row: &'a Value, key: &str) -> Cow<'a, str> {
    let mut v = row;
    for part in key.split('.') {
        match v.get(part) {
            Some(next) => v = next,
            None => return Cow::Borrowed(""),
        }
    }
    match v {
        Value::Null => Cow::Borrowed(""),
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

fn numeric(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Orders two cells of `column`. Number columns compare numerically, with unparsable cells
/// after every number; other columns compare case-insensitively.
pub fn compare_cells(a: &str, b: &str, column_type: ColumnType) -> Ordering {
    if column_type == ColumnType::Number {
        match (numeric(a), numeric(b)) {
            (Some(x), Some(y)) => return x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => {}
        }
    }
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Inputs to [`process_rows`].
#[derive(Clone, Copy, Debug)]
pub struct RowQuery<'a> {
    /// Global search term; matched against every visible column.
    pub search: &'a str,
    pub filters: &'a ColumnFilters,
    pub sort: Option<&'a SortSpec>,
}

/// Whether any visible column of `row` contains `term`, ignoring case.
pub fn matches_search(row: &Value, columns: &[ColumnConfig], term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    columns
        .iter()
        .filter(|c| !c.hidden)
        .any(|c| cell_text(row, &c.accessor_key).to_lowercase().contains(&needle))
}

/// Returns the indices into `rows` that pass search and filters, in display order.
///
/// Sorting is stable, so rows that compare equal keep their input order.
pub fn process_rows(rows: &[Value], columns: &[ColumnConfig], query: &RowQuery<'_>) -> Vec<usize> {
    let mut out: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| matches_search(row, columns, query.search))
        .filter(|(_, row)| query.filters.matches_row(|key| Some(cell_text(row, key))))
        .map(|(i, _)| i)
        .collect();

    let Some(sort) = query.sort else {
        return out;
    };
    if let Some(column) = columns.iter().find(|c| c.accessor_key == sort.id) {
        out.sort_by(|&a, &b| {
            let ord = compare_cells(
                &cell_text(&rows[a], &column.accessor_key),
                &cell_text(&rows[b], &column.accessor_key),
                column.column_type,
            );
            if sort.desc { ord.reverse() } else { ord }
        });
    }
    out
}
