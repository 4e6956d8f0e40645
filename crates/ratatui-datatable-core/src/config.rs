//! Declarative table configuration.
//!
//! Everything here deserializes from JSON (camelCase keys), so a whole table can be described
//! by a [`TableSpec`] document:
//!
//! ```
//! use ratatui_datatable_core::config::TableSpec;
//!
//! let spec = TableSpec::from_json(r#"{
//!     "columns": [
//!         { "accessorKey": "name", "header": "Name" },
//!         { "accessorKey": "status", "header": "Status", "type": "category",
//!           "filterOptions": ["Received", "Pending", "Rejected"] }
//!     ],
//!     "features": { "defaultPageSize": 20 }
//! }"#)?;
//! assert_eq!(spec.features.default_page_size, 20);
//! assert!(spec.features.enable_search);
//! # Ok::<(), ratatui_datatable_core::error::ConfigError>(())
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashSet;

/// Toolbar and behavior switches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    pub enable_row_selection: bool,
    pub enable_column_pinning: bool,
    pub enable_hiding: bool,
    pub enable_row_actions: bool,
    pub enable_search: bool,
    pub enable_add_item: bool,
    pub enable_export: bool,
    pub enable_column_visibility: bool,
    pub enable_filters: bool,
    pub enable_density_toggle: bool,
    pub enable_full_screen: bool,
    pub enable_pagination: bool,
    pub enable_sorting: bool,
    pub enable_sticky: bool,
    pub enable_column_ordering: bool,
    pub default_page_size: usize,
    pub page_size_options: Vec<usize>,
    pub custom_buttons: Vec<CustomButton>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            enable_row_selection: false,
            enable_column_pinning: true,
            enable_hiding: false,
            enable_row_actions: false,
            enable_search: true,
            enable_add_item: false,
            enable_export: true,
            enable_column_visibility: true,
            enable_filters: true,
            enable_density_toggle: true,
            enable_full_screen: true,
            enable_pagination: true,
            enable_sorting: true,
            enable_sticky: true,
            enable_column_ordering: true,
            default_page_size: 10,
            page_size_options: vec![5, 10, 20, 30, 40, 50],
            custom_buttons: Vec::new(),
        }
    }
}

impl TableConfig {
    /// Checks the pagination settings against each other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size_options.is_empty() {
            return Err(ConfigError::EmptyPageSizeOptions);
        }
        if self.default_page_size == 0 || self.page_size_options.contains(&0) {
            return Err(ConfigError::ZeroPageSize);
        }
        if !self.page_size_options.contains(&self.default_page_size) {
            return Err(ConfigError::DefaultPageSizeNotOffered {
                default: self.default_page_size,
                options: self.page_size_options.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    #[default]
    Default,
    Destructive,
    Outline,
    Secondary,
    Ghost,
    Link,
}

/// An app-defined toolbar button. Activating it (by hotkey) yields
/// [`TableAction::CustomButtonPressed`](crate::table::TableAction::CustomButtonPressed).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomButton {
    pub label: String,
    #[serde(default)]
    pub hotkey: Option<char>,
    #[serde(default)]
    pub variant: ButtonVariant,
}

impl CustomButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            hotkey: None,
            variant: ButtonVariant::Default,
        }
    }

    pub fn with_hotkey(mut self, hotkey: char) -> Self {
        self.hotkey = Some(hotkey);
        self
    }
}

/// Declared data type of a column. Drives sorting and the filter widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    /// ISO-8601 `YYYY-MM-DD` strings.
    Date,
    /// One of a fixed set of values, listed in `filter_options`.
    Category,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnConfig {
    pub accessor_key: String,
    pub header: String,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    #[serde(default)]
    pub size: Option<u16>,
    #[serde(default)]
    pub filter_options: Vec<String>,
    #[serde(default = "default_true")]
    pub sortable: bool,
    #[serde(default = "default_true")]
    pub filterable: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub pinned: bool,
}

fn default_true() -> bool {
    true
}

impl ColumnConfig {
    pub fn new(accessor_key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            accessor_key: accessor_key.into(),
            header: header.into(),
            column_type: ColumnType::Text,
            size: None,
            filter_options: Vec::new(),
            sortable: true,
            filterable: true,
            hidden: false,
            pinned: false,
        }
    }

    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.filter_options = options;
        self
    }

    pub fn with_size(mut self, size: u16) -> Self {
        self.size = Some(size);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub id: String,
    #[serde(default)]
    pub desc: bool,
}

/// A complete JSON-describable table: columns, feature switches, initial sorting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSpec {
    pub columns: Vec<ColumnConfig>,
    #[serde(default)]
    pub features: TableConfig,
    #[serde(default)]
    pub default_sorting: Vec<SortSpec>,
}

impl TableSpec {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let spec: TableSpec = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.features.validate()?;

        let mut seen = HashSet::new();
        for c in &self.columns {
            if !seen.insert(c.accessor_key.as_str()) {
                return Err(ConfigError::DuplicateColumn(c.accessor_key.clone()));
            }
        }
        if let Some(s) = self
            .default_sorting
            .iter()
            .find(|s| !seen.contains(s.id.as_str()))
        {
            return Err(ConfigError::UnknownColumn(s.id.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(TableConfig::default().validate().is_ok());
    }

    #[test]
    fn default_page_size_must_be_offered() {
        let cfg = TableConfig {
            default_page_size: 25,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::DefaultPageSizeNotOffered { default: 25, .. })
        ));
    }

    #[test]
    fn empty_and_zero_page_sizes_are_rejected() {
        let empty = TableConfig {
            page_size_options: vec![],
            ..Default::default()
        };
        assert!(matches!(empty.validate(), Err(ConfigError::EmptyPageSizeOptions)));

        let zero = TableConfig {
            page_size_options: vec![0, 10],
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(ConfigError::ZeroPageSize)));
    }

    #[test]
    fn table_json_parses_camel_case_and_column_defaults() {
        let spec = TableSpec::from_json(
            r#"{
                "columns": [
                    { "accessorKey": "email", "header": "Email", "size": 28 },
                    { "accessorKey": "createdAt", "header": "Created", "type": "date",
                      "sortable": false }
                ],
                "features": { "enablePagination": false, "customButtons": [
                    { "label": "Refresh", "hotkey": "R", "variant": "outline" }
                ] },
                "defaultSorting": [{ "id": "email" }]
            }"#,
        )
        .unwrap();
        assert_eq!(spec.columns[0].size, Some(28));
        assert!(spec.columns[0].sortable);
        assert_eq!(spec.columns[1].column_type, ColumnType::Date);
        assert!(!spec.columns[1].sortable);
        assert!(!spec.features.enable_pagination);
        assert_eq!(spec.features.default_page_size, 10);
        assert_eq!(spec.features.custom_buttons[0].hotkey, Some('R'));
        assert_eq!(
            spec.features.custom_buttons[0].variant,
            ButtonVariant::Outline
        );
        assert!(!spec.default_sorting[0].desc);
    }

    #[test]
    fn table_json_rejects_duplicates_and_unknown_sort_columns() {
        let dup = r#"{ "columns": [
            { "accessorKey": "a", "header": "A" },
            { "accessorKey": "a", "header": "A2" } ] }"#;
        assert!(matches!(
            TableSpec::from_json(dup),
            Err(ConfigError::DuplicateColumn(k)) if k == "a"
        ));

        let unknown = r#"{ "columns": [ { "accessorKey": "a", "header": "A" } ],
            "defaultSorting": [ { "id": "b", "desc": true } ] }"#;
        assert!(matches!(
            TableSpec::from_json(unknown),
            Err(ConfigError::UnknownColumn(k)) if k == "b"
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = TableSpec::from_json("{ not json").unwrap_err();
        assert!(err.to_string().starts_with("invalid table spec JSON"));
    }
}
