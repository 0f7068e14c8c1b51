//! Tabular data engine
//!
//! A [`TableEngine`] owns a grid of cells ([`TableGrid`]) and keeps it in step
//! with a list of [`RowEntity`] records:
//!
//! - [`TableEngine::set_table_data`] replaces the grid from records,
//! - [`TableEngine::update_pojos`] writes the grid's live cells back into
//!   records, growing the list when the grid has more rows.
//!
//! It also derives the table's preferred pixel size from a [`SizingPolicy`]
//! per axis.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FormError, FormResult};
use crate::row::RowEntity;
use crate::value::Value;

/// How one axis of a table derives its preferred size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingPolicy {
    /// The scroll container's natural size
    #[default]
    Default,
    /// Inner grid width, or `row_height × rows` vertically
    DataDriven,
    /// Data size multiplied by an explicit scale factor
    ExplicitDataScale,
    /// An explicit pixel value
    ExplicitExact,
}

impl SizingPolicy {
    /// Whether the policy needs an explicit number for its axis
    #[must_use]
    pub const fn requires_explicit(self) -> bool {
        matches!(self, Self::ExplicitDataScale | Self::ExplicitExact)
    }
}

impl fmt::Display for SizingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Default => "DEFAULT",
            Self::DataDriven => "DATA_DRIVEN",
            Self::ExplicitDataScale => "EXPLICIT_DATA_SCALE",
            Self::ExplicitExact => "EXPLICIT_EXACT",
        })
    }
}

/// A table axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Horizontal => "Horizontal",
            Self::Vertical => "Vertical",
        })
    }
}

/// Natural sizes used by the sizing policies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableMetrics {
    pub row_height: f32,
    pub column_width: f32,
    /// Natural width of the scroll container
    pub viewport_width: f32,
    /// Natural height of the scroll container
    pub viewport_height: f32,
}

impl Default for TableMetrics {
    fn default() -> Self {
        Self {
            row_height: 16.0,
            column_width: 75.0,
            viewport_width: 450.0,
            viewport_height: 400.0,
        }
    }
}

/// Editor installed on a column
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellEditor {
    /// Free text, parsed back to the cell's value type
    #[default]
    Text,
    /// Choose one of a fixed list
    PickList { options: Vec<String> },
    /// Boolean toggle
    CheckBox,
}

impl CellEditor {
    #[must_use]
    pub fn pick_list<S: Into<String>>(options: impl IntoIterator<Item = S>) -> Self {
        Self::PickList {
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// The grid-of-rows widget state: columns, cells, per-column editors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableGrid {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    editors: HashMap<usize, CellEditor>,
}

impl TableGrid {
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row)?.get(col)
    }

    /// Column index of `key`
    #[must_use]
    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == key)
    }

    /// Editor of a column; `Text` unless one was installed
    #[must_use]
    pub fn editor(&self, col: usize) -> &CellEditor {
        static TEXT: CellEditor = CellEditor::Text;
        self.editors.get(&col).unwrap_or(&TEXT)
    }

    fn reset(&mut self, columns: Vec<String>) {
        self.columns = columns;
        self.rows.clear();
        self.editors.clear();
    }

    fn push_row(&mut self, mut cells: Vec<Value>) {
        cells.resize(self.columns.len(), Value::Null);
        self.rows.push(cells);
    }

    fn set_cell(&mut self, row: usize, col: usize, value: Value) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// First non-null value in a column, used as the parse template for edits
    fn column_sample(&self, col: usize) -> Option<&Value> {
        self.rows
            .iter()
            .filter_map(|r| r.get(col))
            .find(|v| !v.is_null())
    }
}

/// Table configuration: columns, editors and sizing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSpec {
    /// Explicit column order; when absent the first row's key order is used
    pub key_order: Option<Vec<String>>,
    pub column_definitions: Vec<(String, CellEditor)>,
    pub horizontal_policy: SizingPolicy,
    pub vertical_policy: SizingPolicy,
    /// Scale factor or pixel width, per the horizontal policy
    pub width: Option<f32>,
    /// Scale factor or pixel height, per the vertical policy
    pub height: Option<f32>,
    pub metrics: TableMetrics,
}

impl TableSpec {
    /// Check every axis, reporting all violations together
    pub fn validate(&self) -> FormResult<()> {
        let errors: Vec<String> = [
            (Axis::Horizontal, self.horizontal_policy, self.width, "width"),
            (Axis::Vertical, self.vertical_policy, self.height, "height"),
        ]
        .into_iter()
        .filter_map(|(axis, policy, explicit, what)| {
            (policy.requires_explicit() && explicit.is_none()).then(|| {
                let needed = match policy {
                    SizingPolicy::ExplicitDataScale => format!("a {what} scale factor"),
                    _ => format!("an explicit {what}"),
                };
                format!("{axis} sizing policy {policy} requires {needed}")
            })
        })
        .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(FormError::configuration(errors))
        }
    }
}

/// Builder for a standalone [`TableEngine`]
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    spec: TableSpec,
    rows: Option<Vec<RowEntity>>,
}

impl TableBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rows(mut self, rows: Vec<RowEntity>) -> Self {
        self.rows = Some(rows);
        self
    }

    #[must_use]
    pub fn key_order<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.spec.key_order = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn column_definition(mut self, key: impl Into<String>, editor: CellEditor) -> Self {
        self.spec.column_definitions.push((key.into(), editor));
        self
    }

    #[must_use]
    pub fn horizontal_policy(mut self, policy: SizingPolicy) -> Self {
        self.spec.horizontal_policy = policy;
        self
    }

    #[must_use]
    pub fn vertical_policy(mut self, policy: SizingPolicy) -> Self {
        self.spec.vertical_policy = policy;
        self
    }

    #[must_use]
    pub fn width(mut self, width: f32) -> Self {
        self.spec.width = Some(width);
        self
    }

    #[must_use]
    pub fn height(mut self, height: f32) -> Self {
        self.spec.height = Some(height);
        self
    }

    #[must_use]
    pub fn metrics(mut self, metrics: TableMetrics) -> Self {
        self.spec.metrics = metrics;
        self
    }

    /// Validate the sizing configuration and build the engine
    pub fn build(self) -> FormResult<TableEngine> {
        self.spec.validate()?;
        Ok(TableEngine::from_spec(self.spec, self.rows))
    }
}

/// Messages produced by table cell editors
#[derive(Debug, Clone, PartialEq)]
pub enum TableMessage {
    CellEdited { row: usize, col: usize, text: String },
    CellToggled { row: usize, col: usize, checked: bool },
    CellSelected { row: usize, col: usize, option: String },
}

/// Grid widget plus the records it was filled from
#[derive(Debug, Clone, PartialEq)]
pub struct TableEngine {
    spec: TableSpec,
    grid: TableGrid,
    source: Vec<RowEntity>,
}

impl TableEngine {
    /// Create an engine and fill it from `rows`. Does not validate sizing;
    /// use [`TableBuilder::build`] for that.
    #[must_use]
    pub fn from_spec(spec: TableSpec, rows: Option<Vec<RowEntity>>) -> Self {
        let mut engine = Self {
            spec,
            grid: TableGrid::default(),
            source: Vec::new(),
        };
        engine.set_table_data(rows);
        engine
    }

    /// Column keys currently shown by the grid
    #[must_use]
    pub fn key_order(&self) -> &[String] {
        self.grid.columns()
    }

    /// The grid widget
    #[must_use]
    pub fn grid(&self) -> &TableGrid {
        &self.grid
    }

    #[must_use]
    pub fn spec(&self) -> &TableSpec {
        &self.spec
    }

    /// Records the grid was last filled from
    #[must_use]
    pub fn source_rows(&self) -> &[RowEntity] {
        &self.source
    }

    /// Replace columns and rows.
    ///
    /// Columns come from the explicit key order, else the first record's key
    /// order, else there are none. A record missing a key gets an empty cell.
    pub fn set_table_data(&mut self, rows: Option<Vec<RowEntity>>) {
        let rows = rows.unwrap_or_default();
        let key_order = self
            .spec
            .key_order
            .clone()
            .or_else(|| rows.first().map(|r| r.key_order().to_vec()))
            .unwrap_or_default();

        self.grid.reset(key_order);
        if !self.grid.columns.is_empty() {
            for row in &rows {
                let cells = row.cells(&self.grid.columns);
                self.grid.push_row(cells);
            }
        }
        self.source = rows;
        self.install_editors();

        tracing::debug!(
            columns = self.grid.column_count(),
            rows = self.grid.row_count(),
            "table data set"
        );
    }

    fn install_editors(&mut self) {
        let index: HashMap<&str, usize> = self
            .grid
            .columns
            .iter()
            .enumerate()
            .map(|(i, k)| (k.as_str(), i))
            .collect();

        let mut editors = HashMap::new();
        for (key, editor) in &self.spec.column_definitions {
            match index.get(key.as_str()) {
                Some(&col) => {
                    editors.insert(col, editor.clone());
                }
                None => tracing::debug!(column = %key, "column definition has no matching column"),
            }
        }
        self.grid.editors = editors;
    }

    /// Write the grid's cells into `rows`, in place.
    ///
    /// `rows[i]` is updated for every grid row `i` it covers; when the grid
    /// has more rows, new records with the grid's key order are appended.
    /// Records past the grid's row count are left untouched. An empty cell
    /// clears the record's value for that column.
    pub fn update_pojos_in_place(&self, rows: &mut Vec<RowEntity>) {
        reconcile(&self.grid, rows);
    }

    /// Owning form of [`update_pojos_in_place`](Self::update_pojos_in_place):
    /// returns the same vector it was given, updated and possibly extended.
    /// `None` is treated as an empty list.
    #[must_use]
    pub fn update_pojos(&self, rows: Option<Vec<RowEntity>>) -> Vec<RowEntity> {
        let mut rows = rows.unwrap_or_default();
        self.update_pojos_in_place(&mut rows);
        rows
    }

    /// Reconcile the grid into the engine's own source records and return them
    pub fn reconcile_source(&mut self) -> &[RowEntity] {
        reconcile(&self.grid, &mut self.source);
        &self.source
    }

    /// Append a grid row filled from `row` by column key
    pub fn add_row(&mut self, row: &RowEntity) {
        let cells = row.cells(&self.grid.columns);
        self.grid.push_row(cells);
    }

    /// Append a grid row of empty cells
    pub fn add_empty_row(&mut self) {
        self.grid.push_row(Vec::new());
    }

    /// Overwrite one cell; `false` when out of range
    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<Value>) -> bool {
        self.grid.set_cell(row, col, value.into())
    }

    /// Overwrite one cell from editor text, keeping the column's value type
    pub fn set_cell_text(&mut self, row: usize, col: usize, text: &str) -> bool {
        let template = match self.grid.cell(row, col) {
            Some(Value::Null) => self.grid.column_sample(col).cloned().unwrap_or_default(),
            Some(current) => current.clone(),
            None => return false,
        };
        self.grid.set_cell(row, col, template.parse_like(text))
    }

    /// Apply an editor message; `true` when a cell changed
    pub fn update(&mut self, message: TableMessage) -> bool {
        match message {
            TableMessage::CellEdited { row, col, text } => self.set_cell_text(row, col, &text),
            TableMessage::CellToggled { row, col, checked } => self.set_cell(row, col, checked),
            TableMessage::CellSelected { row, col, option } => self.set_cell(row, col, option),
        }
    }

    #[must_use]
    pub fn horizontal_policy(&self) -> SizingPolicy {
        self.spec.horizontal_policy
    }

    #[must_use]
    pub fn vertical_policy(&self) -> SizingPolicy {
        self.spec.vertical_policy
    }

    #[must_use]
    pub fn explicit_width(&self) -> Option<f32> {
        self.spec.width
    }

    #[must_use]
    pub fn explicit_height(&self) -> Option<f32> {
        self.spec.height
    }

    #[must_use]
    pub fn metrics(&self) -> &TableMetrics {
        &self.spec.metrics
    }

    /// Natural width of the inner grid
    #[must_use]
    pub fn inner_width(&self) -> f32 {
        self.grid.column_count() as f32 * self.spec.metrics.column_width
    }

    #[must_use]
    pub fn preferred_width(&self) -> f32 {
        let metrics = &self.spec.metrics;
        match self.spec.horizontal_policy {
            SizingPolicy::Default => metrics.viewport_width,
            SizingPolicy::DataDriven => self.inner_width(),
            SizingPolicy::ExplicitDataScale => self.inner_width() * self.spec.width.unwrap_or(1.0),
            SizingPolicy::ExplicitExact => self.spec.width.unwrap_or(metrics.viewport_width),
        }
    }

    #[must_use]
    pub fn preferred_height(&self) -> f32 {
        let metrics = &self.spec.metrics;
        match self.spec.vertical_policy {
            SizingPolicy::Default => metrics.viewport_height,
            SizingPolicy::DataDriven if self.grid.row_count() > 0 => {
                metrics.row_height * self.grid.row_count() as f32
            }
            SizingPolicy::DataDriven => metrics.viewport_height,
            SizingPolicy::ExplicitDataScale => {
                metrics.row_height * self.spec.height.unwrap_or(1.0)
            }
            SizingPolicy::ExplicitExact => self.spec.height.unwrap_or(metrics.viewport_height),
        }
    }

    #[must_use]
    pub fn preferred_size(&self) -> iced::Size {
        iced::Size::new(self.preferred_width(), self.preferred_height())
    }
}

fn reconcile(grid: &TableGrid, rows: &mut Vec<RowEntity>) {
    let columns = grid.columns();
    let existing = rows.len();

    for (i, cells) in grid.rows().iter().enumerate() {
        if i >= rows.len() {
            rows.push(RowEntity::new(columns.iter().cloned()));
        }
        let Some(target) = rows.get_mut(i) else {
            continue;
        };
        for (key, cell) in columns.iter().zip(cells) {
            target.set(key.clone(), cell.clone());
        }
    }

    tracing::debug!(
        grid_rows = grid.row_count(),
        given = existing,
        returned = rows.len(),
        "reconciled table rows"
    );
}
