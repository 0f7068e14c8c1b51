//! Field descriptors and their builder
//!
//! A descriptor is split into what every field has ([`FieldCommon`]: key,
//! default, label and grid settings, font and style overrides) and what its
//! kind adds ([`FieldKind`]). One generic [`FieldBuilder`] serves every kind:
//! shared setters are defined once and return the concrete builder type, and
//! kind-specific setters live in `impl FieldBuilder<SomeKind>` blocks.
//!
//! Forms hold descriptors type-erased as `Box<dyn Field>`.

use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::FontsConfig;
use crate::error::FormResult;
use crate::font::{FontConfig, FontEnvironment, FontLoader};
use crate::layout::{FieldPosition, LabelMode};
use crate::table::TableMetrics;
use crate::theme::{BorderSpec, Color, FontSpec, LookAndFeel, Shape, WidgetStyle};
use crate::value::{FieldType, Value};
use crate::widget::Widget;

static GENERATED_KEYS: AtomicU64 = AtomicU64::new(1);

/// Overrides for a field's label or titled border
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelStyle {
    pub paint: Option<Color>,
    pub font: Option<FontSpec>,
    pub shape: Option<Shape>,
    pub border: Option<BorderSpec>,
}

impl LabelStyle {
    /// As widget overrides, for resolution against the theme
    #[must_use]
    pub fn to_overrides(&self) -> WidgetStyle {
        WidgetStyle {
            foreground: self.paint,
            font: self.font.clone(),
            shape: self.shape,
            border: self.border,
            ..WidgetStyle::default()
        }
    }
}

/// Settings shared by every field kind
#[derive(Debug, Clone)]
pub struct FieldCommon<V> {
    pub key: String,
    pub default_value: V,
    pub label_mode: LabelMode,
    pub label_style: LabelStyle,
    pub position: FieldPosition,
    pub font: FontConfig,
    /// Widget overrides; unset properties come from the look-and-feel
    pub style: WidgetStyle,
}

/// What a descriptor sees while materializing its widget
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    pub look_and_feel: &'a dyn LookAndFeel,
    /// Metrics for table fields that set none of their own
    pub table_metrics: TableMetrics,
}

impl<'a> BuildContext<'a> {
    #[must_use]
    pub fn new(look_and_feel: &'a dyn LookAndFeel) -> Self {
        Self {
            look_and_feel,
            table_metrics: TableMetrics::default(),
        }
    }

    #[must_use]
    pub fn with_table_metrics(mut self, metrics: TableMetrics) -> Self {
        self.table_metrics = metrics;
        self
    }

    /// Resolve `overrides` against the theme defaults of `component`
    #[must_use]
    pub fn style(&self, component: &str, overrides: &WidgetStyle) -> WidgetStyle {
        overrides.resolve(component, self.look_and_feel)
    }
}

impl fmt::Debug for BuildContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("table_metrics", &self.table_metrics)
            .finish_non_exhaustive()
    }
}

/// Kind-specific parameters and behavior of a field
pub trait FieldKind: fmt::Debug + 'static {
    /// The typed default value
    type Value: Clone + fmt::Debug + Into<Value>;

    fn field_type(&self) -> FieldType;

    /// Default carried by a fresh builder
    fn initial_value(&self) -> Self::Value;

    fn default_label_mode() -> LabelMode {
        LabelMode::InlineLabel
    }

    /// Whether an empty key deserves a warning
    fn requires_key() -> bool {
        true
    }

    /// Kind-specific checks run by `build()`
    fn validate(&self, _common: &FieldCommon<Self::Value>) -> FormResult<()> {
        Ok(())
    }

    /// Create a new widget showing the default value
    fn materialize(&self, common: &FieldCommon<Self::Value>, ctx: &BuildContext<'_>) -> Widget;

    /// Read the widget's value; `Value::Null` for a widget of another kind.
    /// Receives the widget with titled frames already unwrapped.
    fn extract(&self, widget: &mut Widget) -> Value;
}

/// Parameter accumulator for a [`FieldDescriptor`]
#[derive(Debug, Clone)]
pub struct FieldBuilder<K: FieldKind> {
    kind: K,
    common: FieldCommon<K::Value>,
}

impl<K: FieldKind> FieldBuilder<K> {
    /// Start a builder for `kind` with its default value and label mode
    pub fn with_kind(kind: K) -> Self {
        let default_value = kind.initial_value();
        Self {
            kind,
            common: FieldCommon {
                key: String::new(),
                default_value,
                label_mode: K::default_label_mode(),
                label_style: LabelStyle::default(),
                position: FieldPosition::default(),
                font: FontConfig::default(),
                style: WidgetStyle::default(),
            },
        }
    }

    pub(crate) fn kind_mut(&mut self) -> &mut K {
        &mut self.kind
    }

    pub(crate) fn style_mut(&mut self) -> &mut WidgetStyle {
        &mut self.common.style
    }

    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.common.key = key.into();
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<K::Value>) -> Self {
        self.common.default_value = value.into();
        self
    }

    #[must_use]
    pub fn label_mode(mut self, mode: LabelMode) -> Self {
        self.common.label_mode = mode;
        self
    }

    #[must_use]
    pub fn label_paint(mut self, paint: Color) -> Self {
        self.common.label_style.paint = Some(paint);
        self
    }

    #[must_use]
    pub fn label_font(mut self, font: FontSpec) -> Self {
        self.common.label_style.font = Some(font);
        self
    }

    #[must_use]
    pub fn label_shape(mut self, shape: Shape) -> Self {
        self.common.label_style.shape = Some(shape);
        self
    }

    #[must_use]
    pub fn label_border(mut self, border: BorderSpec) -> Self {
        self.common.label_style.border = Some(border);
        self
    }

    /// Set row and column
    #[must_use]
    pub fn position(mut self, row: usize, col: usize) -> Self {
        self.common.position.row = row;
        self.common.position.col = col;
        self
    }

    #[must_use]
    pub fn row_pos(mut self, row: usize) -> Self {
        self.common.position.row = row;
        self
    }

    #[must_use]
    pub fn col_pos(mut self, col: usize) -> Self {
        self.common.position.col = col;
        self
    }

    #[must_use]
    pub fn row_span(mut self, span: usize) -> Self {
        self.common.position.row_span = span;
        self
    }

    #[must_use]
    pub fn col_span(mut self, span: usize) -> Self {
        self.common.position.col_span = span;
        self
    }

    /// Set both spans
    #[must_use]
    pub fn span(self, row_span: usize, col_span: usize) -> Self {
        self.row_span(row_span).col_span(col_span)
    }

    #[must_use]
    pub fn log_font_warnings(mut self, enabled: bool) -> Self {
        self.common.font.log_warnings = enabled;
        self
    }

    /// `tracing` target recorded with font warnings
    #[must_use]
    pub fn font_log_target(mut self, target: impl Into<String>) -> Self {
        self.common.font.log_target = Some(target.into());
        self
    }

    #[must_use]
    pub fn font_environment(mut self, environment: FontEnvironment) -> Self {
        self.common.font.environment = environment;
        self
    }

    #[must_use]
    pub fn font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.common.font.font_dir = Some(dir.into());
        self
    }

    /// Font family resolved at build time
    #[must_use]
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.common.font.family = Some(family.into());
        self
    }

    #[must_use]
    pub fn font_loader(mut self, loader: Rc<dyn FontLoader>) -> Self {
        self.common.font.loader = Some(loader);
        self
    }

    /// Apply a form's font lookup settings
    #[must_use]
    pub fn font_settings(mut self, settings: &FontsConfig) -> Self {
        self.common.font.environment = settings.environment;
        self.common.font.font_dir.clone_from(&settings.dir);
        self.common.font.log_warnings = settings.log_warnings;
        self
    }

    #[must_use]
    pub fn foreground(mut self, paint: Color) -> Self {
        self.common.style.foreground = Some(paint);
        self
    }

    #[must_use]
    pub fn background(mut self, paint: Color) -> Self {
        self.common.style.background = Some(paint);
        self
    }

    #[must_use]
    pub fn font(mut self, font: FontSpec) -> Self {
        self.common.style.font = Some(font);
        self
    }

    #[must_use]
    pub fn border(mut self, border: BorderSpec) -> Self {
        self.common.style.border = Some(border);
        self
    }

    #[must_use]
    pub fn shape(mut self, shape: Shape) -> Self {
        self.common.style.shape = Some(shape);
        self
    }

    /// Resolve the font and validate.
    ///
    /// Fails only when font resolution fails or the kind rejects its
    /// parameters. An empty key is replaced by a generated one.
    pub fn build(self) -> FormResult<FieldDescriptor<K>> {
        let Self { kind, mut common } = self;
        let field_type = kind.field_type();

        if common.key.is_empty() {
            let generated = format!(
                "{}_{}",
                field_type.name().to_lowercase(),
                GENERATED_KEYS.fetch_add(1, Ordering::Relaxed)
            );
            if K::requires_key() {
                tracing::warn!(field_type = %field_type, key = %generated, "field built without a key");
            } else {
                tracing::debug!(field_type = %field_type, key = %generated, "generated field key");
            }
            common.key = generated;
        }

        common.position = FieldPosition::new(
            common.position.row,
            common.position.col,
            common.position.row_span,
            common.position.col_span,
        );

        common.font.resolve(&common.key)?;
        if common.style.font.is_none() {
            if let Some(handle) = common.font.resolved() {
                common.style.font = Some(FontSpec::family(handle.family()));
            }
        }

        kind.validate(&common)?;

        tracing::debug!(key = %common.key, field_type = %field_type, "built field");
        Ok(FieldDescriptor { kind, common })
    }
}

/// An immutable, validated field
#[derive(Debug, Clone)]
pub struct FieldDescriptor<K: FieldKind> {
    kind: K,
    common: FieldCommon<K::Value>,
}

impl<K: FieldKind + Default> FieldDescriptor<K> {
    /// Builder with the kind's defaults
    #[must_use]
    pub fn builder() -> FieldBuilder<K> {
        FieldBuilder::with_kind(K::default())
    }
}

impl<K: FieldKind> FieldDescriptor<K> {
    #[must_use]
    pub fn kind(&self) -> &K {
        &self.kind
    }

    #[must_use]
    pub fn common(&self) -> &FieldCommon<K::Value> {
        &self.common
    }

    /// The typed default value
    #[must_use]
    pub fn typed_default(&self) -> &K::Value {
        &self.common.default_value
    }

    #[must_use]
    pub fn font(&self) -> &FontConfig {
        &self.common.font
    }

    #[must_use]
    pub fn style(&self) -> &WidgetStyle {
        &self.common.style
    }
}

/// A type-erased field, as held by a form
pub trait Field: fmt::Debug {
    fn key(&self) -> &str;

    fn field_type(&self) -> FieldType;

    fn label_mode(&self) -> LabelMode;

    fn label_style(&self) -> &LabelStyle;

    fn position(&self) -> FieldPosition;

    fn default_value(&self) -> Value;

    /// A newly materialized widget reflecting the default value and styling
    fn component(&self, ctx: &BuildContext<'_>) -> Widget;

    /// The widget's current value, `Value::Null` for a widget of the wrong
    /// kind.
    ///
    /// Not pure: extracting a nested form's value saves that form first.
    fn extract_value(&self, widget: &mut Widget) -> Value;
}

impl<K: FieldKind> Field for FieldDescriptor<K> {
    fn key(&self) -> &str {
        &self.common.key
    }

    fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    fn label_mode(&self) -> LabelMode {
        self.common.label_mode
    }

    fn label_style(&self) -> &LabelStyle {
        &self.common.label_style
    }

    fn position(&self) -> FieldPosition {
        self.common.position
    }

    fn default_value(&self) -> Value {
        self.common.default_value.clone().into()
    }

    fn component(&self, ctx: &BuildContext<'_>) -> Widget {
        self.kind.materialize(&self.common, ctx)
    }

    fn extract_value(&self, widget: &mut Widget) -> Value {
        self.kind.extract(widget.content_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use crate::error::{FontError, FormError};
    use crate::kinds::{BooleanField, ButtonField, StringField};
    use crate::theme::ThemeProperties;

    #[derive(Debug)]
    struct FailingLoader;

    impl FontLoader for FailingLoader {
        fn resolve_font(&self, family: &str) -> Result<crate::font::FontHandle, FontError> {
            Err(FontError::NotFound {
                family: family.to_string(),
                dir: PathBuf::from("nowhere"),
            })
        }
    }

    #[test]
    fn test_builder_chains_keep_concrete_type() {
        let field = StringField::builder()
            .key("name")
            .position(2, 1)
            .span(0, 3)
            .default_value("Ada")
            .columns(10)
            .build()
            .unwrap();

        assert_eq!(field.key(), "name");
        assert_eq!(field.position(), FieldPosition::new(2, 1, 1, 3));
        assert_eq!(field.typed_default(), "Ada");
        assert_eq!(field.kind().columns, Some(10));
    }

    #[test]
    fn test_empty_key_is_generated() {
        let field = BooleanField::builder().build().unwrap();
        assert!(field.key().starts_with("boolean_"));

        let other = BooleanField::builder().build().unwrap();
        assert_ne!(field.key(), other.key());
    }

    #[test]
    fn test_font_failure_fails_build() {
        let err = StringField::builder()
            .key("name")
            .font_family("Inter")
            .font_loader(Rc::new(FailingLoader))
            .log_font_warnings(false)
            .build()
            .unwrap_err();
        assert!(matches!(err, FormError::Font(FontError::NotFound { .. })));
    }

    #[test]
    fn test_resolved_font_becomes_style_font() {
        let field = StringField::builder()
            .key("name")
            .font_family("Inter")
            .build()
            .unwrap();
        assert_eq!(field.style().font.as_ref().and_then(|f| f.family.as_deref()), Some("Inter"));
        assert!(field.font().resolved().is_some());
    }

    #[test]
    fn test_font_settings_resolve_from_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("Inter.ttf"), [0x00, 0x01, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x80]).unwrap();
        let settings = FontsConfig {
            environment: FontEnvironment::Directory,
            dir: Some(dir.path().to_path_buf()),
            log_warnings: false,
        };

        let field = StringField::builder()
            .key("name")
            .font_settings(&settings)
            .font_family("inter")
            .build()
            .unwrap();
        let handle = field.font().resolved().unwrap();
        assert_eq!(handle.family(), "inter");
        assert_eq!(handle.path(), Some(dir.path().join("Inter.ttf").as_path()));
        assert!(!field.font().log_warnings);

        let err = StringField::builder()
            .key("title")
            .font_settings(&settings)
            .font_family("Missing")
            .build()
            .unwrap_err();
        assert!(matches!(err, FormError::Font(FontError::NotFound { .. })));
    }

    #[test]
    fn test_erased_field_reports_defaults() {
        let field: Box<dyn Field> = Box::new(BooleanField::builder().key("ok").default_value(true).build().unwrap());
        assert_eq!(field.field_type(), FieldType::Boolean);
        assert_eq!(field.label_mode(), LabelMode::InlineLabel);
        assert_eq!(field.default_value(), Value::Bool(true));
    }

    #[test]
    fn test_button_label_mode_defaults_to_none() {
        let button = ButtonField::builder().key("go").build().unwrap();
        assert_eq!(button.label_mode(), LabelMode::None);
    }

    #[test]
    fn test_extract_unwraps_titled_frame() {
        let theme = ThemeProperties::empty();
        let ctx = BuildContext::new(&theme);
        let field = BooleanField::builder().key("ok").default_value(true).build().unwrap();

        let mut framed = Widget::Titled(crate::widget::TitledFrame {
            title: "ok".into(),
            title_style: WidgetStyle::default(),
            border: None,
            content: Box::new(field.component(&ctx)),
        });
        assert_eq!(field.extract_value(&mut framed), Value::Bool(true));
    }
}
