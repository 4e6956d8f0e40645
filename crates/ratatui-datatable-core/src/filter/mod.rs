//! Per-column filters.
//!
//! The widget a column gets is decided by its declared [`ColumnType`], never by its name.

pub mod panel;
pub mod popover;

use crate::config::ColumnConfig;
use crate::config::ColumnType;
use std::collections::BTreeMap;

pub use panel::FilterPanel;
pub use panel::FilterPanelAction;
pub use popover::FilterMode;
pub use popover::FilterPopover;
pub use popover::FilterPopoverAction;
pub use popover::FilterPopoverBindings;

/// Filter widget variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterKind {
    /// Free text, matched as a case-insensitive substring.
    Text,
    /// Inclusive `from`/`to` bounds on ISO dates; either bound may be empty.
    DateRange,
    /// Exact match against one of `options`.
    Select { options: Vec<String> },
}

impl FilterKind {
    pub fn for_type(column_type: ColumnType, options: &[String]) -> Self {
        match column_type {
            ColumnType::Text | ColumnType::Number => FilterKind::Text,
            ColumnType::Date => FilterKind::DateRange,
            ColumnType::Category => FilterKind::Select {
                options: options.to_vec(),
            },
        }
    }

    pub fn for_column(column: &ColumnConfig) -> Self {
        Self::for_type(column.column_type, &column.filter_options)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Choice(String),
    DateRange { from: String, to: String },
}

impl FilterValue {
    /// An empty value of the right shape for `kind`.
    pub fn empty_for(kind: &FilterKind) -> Self {
        match kind {
            FilterKind::Text => FilterValue::Text(String::new()),
            FilterKind::Select { .. } => FilterValue::Choice(String::new()),
            FilterKind::DateRange => FilterValue::DateRange {
                from: String::new(),
                to: String::new(),
            },
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            FilterValue::Text(s) | FilterValue::Choice(s) => !s.trim().is_empty(),
            FilterValue::DateRange { from, to } => {
                !from.trim().is_empty() || !to.trim().is_empty()
            }
        }
    }

    /// Whether a cell passes this filter. Inactive filters pass everything.
    pub fn matches(&self, cell: &str) -> bool {
        if !self.is_active() {
            return true;
        }
        match self {
            FilterValue::Text(needle) => cell
                .to_lowercase()
                .contains(&needle.trim().to_lowercase()),
            FilterValue::Choice(choice) => cell == choice,
            FilterValue::DateRange { from, to } => {
                // ISO dates order lexicographically; compare on the date part only.
                let day = cell.get(..10).unwrap_or(cell);
                let from = from.trim();
                let to = to.trim();
                (from.is_empty() || day >= from) && (to.is_empty() || day <= to)
            }
        }
    }
}

/// Filter values keyed by column accessor key. Inactive values are never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnFilters {
    values: BTreeMap<String, FilterValue>,
}

impl ColumnFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    /// Stores `value`, or clears the column if `value` is inactive. Returns `true` on change.
    pub fn set(&mut self, key: impl Into<String>, value: FilterValue) -> bool {
        let key = key.into();
        if !value.is_active() {
            return self.values.remove(&key).is_some();
        }
        self.values.insert(key, value.clone()) != Some(value)
    }

    pub fn clear(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    /// Clears every filter. Returns `true` if any was active.
    pub fn reset_all(&mut self) -> bool {
        let had_any = !self.values.is_empty();
        self.values.clear();
        #[cfg(feature = "tracing")]
        if had_any {
            tracing::debug!("column filters reset");
        }
        had_any
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn active_count(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether a row passes every active filter. `cell` looks up a row's text by column key.
    pub fn matches_row<'a, F>(&self, mut cell: F) -> bool
    where
        F: FnMut(&str) -> Option<std::borrow::Cow<'a, str>>,
    {
        self.values.iter().all(|(key, value)| {
            let text = cell(key.as_str()).unwrap_or_default();
            value.matches(&text)
        })
    }
}
