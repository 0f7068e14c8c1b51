//! formgrid - declarative forms and data binding for iced
//!
//! A form is declared as a list of typed field descriptors. Each descriptor
//! knows its key, default value, label style and grid position; the form
//! materializes a widget per descriptor, places widgets and labels on a grid
//! and binds widget state to a key/value map.
//!
//! # Architecture
//!
//! - **Descriptors** are immutable values built with [`FieldBuilder`]; one
//!   generic builder serves every field kind.
//! - **Forms** register descriptors, create widgets once and keep a
//!   [`ValueMap`] snapshot that only [`Form::save_values`] refreshes.
//! - **Tables** reconcile an editable grid back into a list of
//!   [`RowEntity`] values and size themselves by [`SizingPolicy`].
//! - **Rendering** turns a live form into an iced element tree;
//!   [`run_form`] hosts it in a window.
//!
//! # Core Components
//!
//! - [`Form`]: field registration, widget creation and value binding
//! - [`GridLayout`]: label and field placement on the grid
//! - [`TableEngine`]: tabular editing and row reconciliation
//! - [`ThemeProperties`]: look-and-feel defaults keyed by component
//! - [`FormConfig`]: TOML configuration of the above

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error types
pub mod error;

/// Field values and their types
pub mod value;

/// Key/value store bound to a form
pub mod value_map;

/// Row entities shown by tables
pub mod row;

/// Look-and-feel properties and widget styles
pub mod theme;

/// Button actions
pub mod action;

/// Font lookup
pub mod font;

/// Grid placement of fields and labels
pub mod layout;

/// Tabular data engine
pub mod table;

/// Materialized widget state
pub mod widget;

/// Field descriptors and builders
pub mod field;

/// Concrete field kinds
pub mod kinds;

/// Engine configuration
pub mod config;

/// Forms
pub mod form;

mod render;

/// Running a form in a window
pub mod runtime;

// Re-exports for convenience
pub use action::{Action, ActionId, ActionRegistry};
pub use config::{FontsConfig, FormConfig, ThemeConfig};
pub use error::{FontError, FormError, FormResult};
pub use field::{BuildContext, Field, FieldBuilder, FieldCommon, FieldDescriptor, FieldKind, LabelStyle};
pub use font::{DirectoryFontLoader, FontConfig, FontEnvironment, FontHandle, FontLoader, SystemFontLoader};
pub use form::{Form, FormBuilder, FormFields, FormHandle, FormMessage, FormPhase};
pub use kinds::{
    BooleanField, ButtonField, CustomField, DateField, DoubleField, DropDownField, FloatField, FormField,
    IntField, LongField, ShortField, StringField, StringStyle, TableField,
};
pub use layout::{FieldPlacement, FieldPosition, GridLayout, GridPlacement, HAlign, LabelMode, LabelOrientation, VAlign};
pub use row::RowEntity;
pub use runtime::{run_form, WindowSettings};
pub use table::{Axis, CellEditor, SizingPolicy, TableBuilder, TableEngine, TableMessage, TableMetrics, TableSpec};
pub use theme::{BorderSpec, Color, FontSpec, LookAndFeel, Shape, ThemePreset, ThemeProperties, WidgetStyle};
pub use value::{FieldType, Number, Value};
pub use value_map::ValueMap;
pub use widget::{Widget, WidgetEdit};
