//! The concrete field kinds
//!
//! Each kind decides which widget it materializes and how to read a value
//! back from it. Type aliases such as [`StringField`] or [`IntField`] name the
//! resulting descriptors.

use std::fmt;
use std::rc::Rc;

use chrono::NaiveDate;

use crate::action::ActionId;
use crate::error::FormResult;
use crate::field::{BuildContext, FieldBuilder, FieldCommon, FieldDescriptor, FieldKind};
use crate::form::FormHandle;
use crate::layout::LabelMode;
use crate::row::RowEntity;
use crate::table::{CellEditor, SizingPolicy, TableEngine, TableMetrics, TableSpec};
use crate::theme::{component, Color};
use crate::value::{FieldType, Number, Value};
use crate::widget::{
    ButtonWidget, CheckBoxWidget, CustomWidget, DatePickerWidget, DropDownWidget, LabelWidget,
    SpinnerWidget, TextInputWidget, Widget,
};

pub type BooleanField = FieldDescriptor<BooleanKind>;
pub type ShortField = FieldDescriptor<NumericKind<i16>>;
pub type IntField = FieldDescriptor<NumericKind<i32>>;
pub type LongField = FieldDescriptor<NumericKind<i64>>;
pub type FloatField = FieldDescriptor<NumericKind<f32>>;
pub type DoubleField = FieldDescriptor<NumericKind<f64>>;
pub type StringField = FieldDescriptor<StringKind>;
pub type DateField = FieldDescriptor<DateKind>;
pub type DropDownField = FieldDescriptor<DropDownKind>;
pub type ButtonField = FieldDescriptor<ButtonKind>;
pub type FormField = FieldDescriptor<FormKind>;
pub type TableField = FieldDescriptor<TableKind>;
pub type CustomField = FieldDescriptor<CustomKind>;

/// Check box field
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanKind;

impl FieldKind for BooleanKind {
    type Value = bool;

    fn field_type(&self) -> FieldType {
        FieldType::Boolean
    }

    fn initial_value(&self) -> bool {
        false
    }

    fn materialize(&self, common: &FieldCommon<bool>, ctx: &BuildContext<'_>) -> Widget {
        Widget::CheckBox(CheckBoxWidget {
            checked: common.default_value,
            style: ctx.style(component::CHECK_BOX, &common.style),
        })
    }

    fn extract(&self, widget: &mut Widget) -> Value {
        match widget {
            Widget::CheckBox(check) => Value::Bool(check.checked),
            _ => Value::Null,
        }
    }
}

/// A primitive numeric type a spinner field can hold
pub trait NumericValue: Copy + fmt::Debug + Into<Value> + 'static {
    const FIELD_TYPE: FieldType;
    const ZERO: Self;
    const ONE: Self;

    fn widen(self) -> Number;

    /// Convert the spinner's generic number back to this type
    fn narrow(number: Number) -> Self;
}

impl NumericValue for i16 {
    const FIELD_TYPE: FieldType = FieldType::Short;
    const ZERO: Self = 0;
    const ONE: Self = 1;

    fn widen(self) -> Number {
        Number::Integer(i64::from(self))
    }

    fn narrow(number: Number) -> Self {
        number.short_value()
    }
}

impl NumericValue for i32 {
    const FIELD_TYPE: FieldType = FieldType::Int;
    const ZERO: Self = 0;
    const ONE: Self = 1;

    fn widen(self) -> Number {
        Number::Integer(i64::from(self))
    }

    fn narrow(number: Number) -> Self {
        number.int_value()
    }
}

impl NumericValue for i64 {
    const FIELD_TYPE: FieldType = FieldType::Long;
    const ZERO: Self = 0;
    const ONE: Self = 1;

    fn widen(self) -> Number {
        Number::Integer(self)
    }

    fn narrow(number: Number) -> Self {
        number.long_value()
    }
}

impl NumericValue for f32 {
    const FIELD_TYPE: FieldType = FieldType::Float;
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn widen(self) -> Number {
        Number::Real(f64::from(self))
    }

    fn narrow(number: Number) -> Self {
        number.float_value()
    }
}

impl NumericValue for f64 {
    const FIELD_TYPE: FieldType = FieldType::Double;
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn widen(self) -> Number {
        Number::Real(self)
    }

    fn narrow(number: Number) -> Self {
        number.double_value()
    }
}

/// Bounded step-wise numeric field
#[derive(Debug, Clone, Copy)]
pub struct NumericKind<T: NumericValue> {
    pub step: T,
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: NumericValue> Default for NumericKind<T> {
    fn default() -> Self {
        Self {
            step: T::ONE,
            min: None,
            max: None,
        }
    }
}

impl<T: NumericValue> FieldKind for NumericKind<T> {
    type Value = T;

    fn field_type(&self) -> FieldType {
        T::FIELD_TYPE
    }

    fn initial_value(&self) -> T {
        T::ZERO
    }

    fn materialize(&self, common: &FieldCommon<T>, ctx: &BuildContext<'_>) -> Widget {
        let mut spinner = SpinnerWidget::new(
            common.default_value.widen(),
            self.step.widen(),
            self.min.map(T::widen),
            self.max.map(T::widen),
        );
        spinner.style = ctx.style(component::SPINNER, &common.style);
        Widget::Spinner(spinner)
    }

    fn extract(&self, widget: &mut Widget) -> Value {
        match widget {
            Widget::Spinner(spinner) => T::narrow(spinner.value).into(),
            _ => Value::Null,
        }
    }
}

impl<T: NumericValue> FieldBuilder<NumericKind<T>> {
    #[must_use]
    pub fn step(mut self, step: T) -> Self {
        self.kind_mut().step = step;
        self
    }

    #[must_use]
    pub fn min(mut self, min: T) -> Self {
        self.kind_mut().min = Some(min);
        self
    }

    #[must_use]
    pub fn max(mut self, max: T) -> Self {
        self.kind_mut().max = Some(max);
        self
    }

    /// Set both bounds
    #[must_use]
    pub fn bounds(self, min: T, max: T) -> Self {
        self.min(min).max(max)
    }
}

/// Width in characters given to blank text fields without an explicit width
pub const DEFAULT_TEXT_COLUMNS: u16 = 25;

/// What a string field shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringStyle {
    /// Editable text
    #[default]
    Plain,
    /// Display-only text
    Title,
    /// Masked input
    Secret,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StringKind {
    pub style: StringStyle,
    /// Explicit width in characters
    pub columns: Option<u16>,
}

impl StringKind {
    /// Width for a given default: explicit, else 25 for a blank default,
    /// else none so the widget sizes to its content
    #[must_use]
    pub fn effective_columns(&self, default_value: &str) -> Option<u16> {
        self.columns.or_else(|| {
            default_value
                .trim()
                .is_empty()
                .then_some(DEFAULT_TEXT_COLUMNS)
        })
    }
}

impl FieldKind for StringKind {
    type Value = String;

    fn field_type(&self) -> FieldType {
        FieldType::String
    }

    fn initial_value(&self) -> String {
        String::new()
    }

    fn materialize(&self, common: &FieldCommon<String>, ctx: &BuildContext<'_>) -> Widget {
        if self.style == StringStyle::Title {
            let mut label = LabelWidget::new(common.default_value.clone());
            label.style = ctx.style(component::LABEL, &common.style);
            return Widget::Label(label);
        }

        let secure = self.style == StringStyle::Secret;
        let class = if secure {
            component::PASSWORD_FIELD
        } else {
            component::TEXT_FIELD
        };
        Widget::TextInput(TextInputWidget {
            value: common.default_value.clone(),
            secure,
            editable: true,
            columns: self.effective_columns(&common.default_value),
            style: ctx.style(class, &common.style),
        })
    }

    fn extract(&self, widget: &mut Widget) -> Value {
        match widget {
            Widget::TextInput(input) => Value::String(input.value.clone()),
            Widget::Label(label) if self.style == StringStyle::Title => {
                Value::String(label.text.clone())
            }
            _ => Value::Null,
        }
    }
}

impl FieldBuilder<StringKind> {
    #[must_use]
    pub fn string_style(mut self, style: StringStyle) -> Self {
        self.kind_mut().style = style;
        self
    }

    /// Display-only text
    #[must_use]
    pub fn title(self) -> Self {
        self.string_style(StringStyle::Title)
    }

    /// Masked input
    #[must_use]
    pub fn secret(self) -> Self {
        self.string_style(StringStyle::Secret)
    }

    #[must_use]
    pub fn columns(mut self, columns: u16) -> Self {
        self.kind_mut().columns = Some(columns);
        self
    }
}

pub const DEFAULT_MIN_YEAR: i32 = 1900;
pub const DEFAULT_MAX_YEAR: i32 = 2100;

/// Day/month/year entry bounded by an inclusive year range
#[derive(Debug, Clone, Copy)]
pub struct DateKind {
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for DateKind {
    fn default() -> Self {
        Self {
            min_year: DEFAULT_MIN_YEAR,
            max_year: DEFAULT_MAX_YEAR,
        }
    }
}

impl FieldKind for DateKind {
    type Value = NaiveDate;

    fn field_type(&self) -> FieldType {
        FieldType::Date
    }

    /// Today, local time
    fn initial_value(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    fn materialize(&self, common: &FieldCommon<NaiveDate>, ctx: &BuildContext<'_>) -> Widget {
        let mut picker = DatePickerWidget::new(common.default_value, self.min_year, self.max_year);
        picker.style = ctx.style(component::DATE_PICKER, &common.style);
        Widget::DatePicker(picker)
    }

    fn extract(&self, widget: &mut Widget) -> Value {
        match widget {
            Widget::DatePicker(picker) => picker.date().into(),
            _ => Value::Null,
        }
    }
}

impl FieldBuilder<DateKind> {
    #[must_use]
    pub fn min_year(mut self, year: i32) -> Self {
        self.kind_mut().min_year = year;
        self
    }

    #[must_use]
    pub fn max_year(mut self, year: i32) -> Self {
        self.kind_mut().max_year = year;
        self
    }

    /// Set the inclusive year range
    #[must_use]
    pub fn year_range(self, min: i32, max: i32) -> Self {
        self.min_year(min).max_year(max)
    }
}

/// Selection from a fixed list of options
#[derive(Debug, Clone, Default)]
pub struct DropDownKind {
    pub options: Vec<String>,
    pub editable: bool,
}

impl FieldKind for DropDownKind {
    type Value = String;

    fn field_type(&self) -> FieldType {
        FieldType::DropDown
    }

    fn initial_value(&self) -> String {
        String::new()
    }

    fn materialize(&self, common: &FieldCommon<String>, ctx: &BuildContext<'_>) -> Widget {
        let default = &common.default_value;
        let selected = self.options.contains(default).then(|| default.clone());
        let edit_text = if self.editable || selected.is_some() {
            default.clone()
        } else {
            String::new()
        };
        Widget::DropDown(DropDownWidget {
            options: self.options.clone(),
            selected,
            editable: self.editable,
            edit_text,
            style: ctx.style(component::COMBO_BOX, &common.style),
        })
    }

    fn extract(&self, widget: &mut Widget) -> Value {
        match widget {
            Widget::DropDown(drop) => drop.current().into(),
            _ => Value::Null,
        }
    }
}

impl FieldBuilder<DropDownKind> {
    #[must_use]
    pub fn options<S: Into<String>>(mut self, options: impl IntoIterator<Item = S>) -> Self {
        self.kind_mut().options = options.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn editable(mut self, editable: bool) -> Self {
        self.kind_mut().editable = editable;
        self
    }
}

/// Push button; stores no value. The default value is the caption.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonKind {
    pub action: Option<ActionId>,
}

impl FieldKind for ButtonKind {
    type Value = String;

    fn field_type(&self) -> FieldType {
        FieldType::Button
    }

    fn initial_value(&self) -> String {
        String::new()
    }

    fn default_label_mode() -> LabelMode {
        LabelMode::None
    }

    fn requires_key() -> bool {
        false
    }

    fn materialize(&self, common: &FieldCommon<String>, ctx: &BuildContext<'_>) -> Widget {
        let text = if common.default_value.is_empty() {
            common.key.clone()
        } else {
            common.default_value.clone()
        };
        Widget::Button(ButtonWidget {
            text,
            action: self.action,
            style: ctx.style(component::BUTTON, &common.style),
        })
    }

    fn extract(&self, _widget: &mut Widget) -> Value {
        Value::Null
    }
}

impl FieldBuilder<ButtonKind> {
    /// Action run when the button is pressed
    #[must_use]
    pub fn action(mut self, action: ActionId) -> Self {
        self.kind_mut().action = Some(action);
        self
    }

    #[must_use]
    pub fn select_paint(mut self, paint: Color) -> Self {
        self.style_mut().select = Some(paint);
        self
    }

    #[must_use]
    pub fn focus_paint(mut self, paint: Color) -> Self {
        self.style_mut().focus = Some(paint);
        self
    }
}

/// A nested form shown in place
#[derive(Debug, Clone, Copy, Default)]
pub struct FormKind;

/// Text of the placeholder shown when a form field has no form
pub const NO_FORM_PLACEHOLDER: &str = "No value";

impl FieldKind for FormKind {
    type Value = Option<FormHandle>;

    fn field_type(&self) -> FieldType {
        FieldType::Form
    }

    fn initial_value(&self) -> Option<FormHandle> {
        None
    }

    fn materialize(&self, common: &FieldCommon<Option<FormHandle>>, ctx: &BuildContext<'_>) -> Widget {
        match &common.default_value {
            Some(handle) => Widget::Form(handle.clone()),
            None => {
                let mut label = LabelWidget::new(NO_FORM_PLACEHOLDER);
                label.style = ctx.style(component::LABEL, &common.style);
                Widget::Label(label)
            }
        }
    }

    /// Saves the nested form, then returns it
    fn extract(&self, widget: &mut Widget) -> Value {
        match widget {
            Widget::Form(handle) => {
                match handle.try_borrow_mut() {
                    Ok(mut nested) => nested.save_values(),
                    Err(_) => tracing::warn!("nested form is borrowed; values not saved"),
                }
                Value::Form(handle.clone())
            }
            _ => Value::Null,
        }
    }
}

impl FieldBuilder<FormKind> {
    /// The nested form
    #[must_use]
    pub fn form(self, form: FormHandle) -> Self {
        self.default_value(form)
    }
}

/// Table of row entities backed by a [`TableEngine`]
#[derive(Debug, Clone, Default)]
pub struct TableKind {
    pub spec: TableSpec,
    /// Row and column metrics; the form's configured metrics when unset
    pub metrics: Option<TableMetrics>,
}

impl FieldKind for TableKind {
    type Value = Vec<RowEntity>;

    fn field_type(&self) -> FieldType {
        FieldType::Table
    }

    fn initial_value(&self) -> Vec<RowEntity> {
        Vec::new()
    }

    fn validate(&self, _common: &FieldCommon<Vec<RowEntity>>) -> FormResult<()> {
        self.spec.validate()
    }

    fn materialize(&self, common: &FieldCommon<Vec<RowEntity>>, ctx: &BuildContext<'_>) -> Widget {
        let spec = TableSpec {
            metrics: self.metrics.unwrap_or(ctx.table_metrics),
            ..self.spec.clone()
        };
        Widget::Table(Box::new(TableEngine::from_spec(spec, Some(common.default_value.clone()))))
    }

    /// Reconciles the grid into the engine's rows
    fn extract(&self, widget: &mut Widget) -> Value {
        match widget {
            Widget::Table(engine) => Value::Table(engine.reconcile_source().to_vec()),
            _ => Value::Null,
        }
    }
}

impl FieldBuilder<TableKind> {
    #[must_use]
    pub fn key_order<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.kind_mut().spec.key_order = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn column_definition(mut self, key: impl Into<String>, editor: CellEditor) -> Self {
        self.kind_mut().spec.column_definitions.push((key.into(), editor));
        self
    }

    #[must_use]
    pub fn horizontal_policy(mut self, policy: SizingPolicy) -> Self {
        self.kind_mut().spec.horizontal_policy = policy;
        self
    }

    #[must_use]
    pub fn vertical_policy(mut self, policy: SizingPolicy) -> Self {
        self.kind_mut().spec.vertical_policy = policy;
        self
    }

    /// Scale factor or pixel width, per the horizontal policy
    #[must_use]
    pub fn width(mut self, width: f32) -> Self {
        self.kind_mut().spec.width = Some(width);
        self
    }

    /// Scale factor or pixel height, per the vertical policy
    #[must_use]
    pub fn height(mut self, height: f32) -> Self {
        self.kind_mut().spec.height = Some(height);
        self
    }

    #[must_use]
    pub fn metrics(mut self, metrics: TableMetrics) -> Self {
        self.kind_mut().metrics = Some(metrics);
        self
    }
}

type Factory = Rc<dyn Fn(&str, &Value) -> Widget>;
type Extractor = Rc<dyn Fn(&mut Widget) -> Value>;

/// Caller-defined widget and extraction
#[derive(Clone)]
pub struct CustomKind {
    pub tag: String,
    factory: Factory,
    extractor: Extractor,
}

impl CustomKind {
    /// A custom kind that stores its value in a [`CustomWidget`] tagged `tag`
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            factory: Rc::new(|tag, value| {
                Widget::Custom(CustomWidget {
                    tag: tag.to_string(),
                    value: value.clone(),
                })
            }),
            extractor: Rc::new(|widget| match widget {
                Widget::Custom(custom) => custom.value.clone(),
                _ => Value::Null,
            }),
        }
    }
}

impl fmt::Debug for CustomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomKind")
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

impl FieldKind for CustomKind {
    type Value = Value;

    fn field_type(&self) -> FieldType {
        FieldType::Custom
    }

    fn initial_value(&self) -> Value {
        Value::Null
    }

    fn materialize(&self, common: &FieldCommon<Value>, _ctx: &BuildContext<'_>) -> Widget {
        (self.factory)(&self.tag, &common.default_value)
    }

    fn extract(&self, widget: &mut Widget) -> Value {
        (self.extractor)(widget)
    }
}

impl CustomField {
    #[must_use]
    pub fn custom(tag: impl Into<String>) -> FieldBuilder<CustomKind> {
        FieldBuilder::with_kind(CustomKind::new(tag))
    }
}

impl FieldBuilder<CustomKind> {
    /// Widget factory, given the tag and the default value
    #[must_use]
    pub fn factory(mut self, factory: impl Fn(&str, &Value) -> Widget + 'static) -> Self {
        self.kind_mut().factory = Rc::new(factory);
        self
    }

    #[must_use]
    pub fn extractor(mut self, extractor: impl Fn(&mut Widget) -> Value + 'static) -> Self {
        self.kind_mut().extractor = Rc::new(extractor);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::theme::{ThemePreset, ThemeProperties};
    use crate::widget::WidgetEdit;

    fn theme() -> ThemeProperties {
        ThemeProperties::from_preset(ThemePreset::Light)
    }

    fn label() -> Widget {
        Widget::Label(LabelWidget::new("stray"))
    }

    #[test]
    fn test_numeric_defaults_and_narrowing() {
        let theme = theme();
        let ctx = BuildContext::new(&theme);

        let field = FloatField::builder().key("ratio").build().unwrap();
        assert_eq!(field.default_value(), Value::Float(0.0));
        assert_eq!(field.kind().step, 1.0);

        let mut widget = field.component(&ctx);
        if let Widget::Spinner(spinner) = &mut widget {
            spinner.value = Number::Real(2.75);
        }
        assert_eq!(field.extract_value(&mut widget), Value::Float(2.75));

        let int = IntField::builder().key("count").build().unwrap();
        assert_eq!(int.extract_value(&mut widget), Value::Int(2));
    }

    #[test]
    fn test_numeric_without_bounds_is_unbounded() {
        let theme = theme();
        let ctx = BuildContext::new(&theme);
        let field = LongField::builder().key("n").default_value(5_i64).step(10).build().unwrap();

        let mut widget = field.component(&ctx);
        for _ in 0..3 {
            widget.apply(WidgetEdit::Decrement);
        }
        assert_eq!(field.extract_value(&mut widget), Value::Long(-25));
    }

    #[test]
    fn test_numeric_bounds_clamp_steps() {
        let theme = theme();
        let ctx = BuildContext::new(&theme);
        let field = ShortField::builder().key("n").bounds(0, 2).build().unwrap();
        let mut widget = field.component(&ctx);
        for _ in 0..5 {
            widget.apply(WidgetEdit::Increment);
        }
        assert_eq!(field.extract_value(&mut widget), Value::Short(2));
    }

    #[test]
    fn test_string_width_rule() {
        let blank = StringKind::default();
        assert_eq!(blank.effective_columns(""), Some(DEFAULT_TEXT_COLUMNS));
        assert_eq!(blank.effective_columns("   "), Some(DEFAULT_TEXT_COLUMNS));
        assert_eq!(blank.effective_columns("Ada"), None);

        let explicit = StringKind {
            columns: Some(8),
            ..StringKind::default()
        };
        assert_eq!(explicit.effective_columns(""), Some(8));
        assert_eq!(explicit.effective_columns("Ada"), Some(8));
    }

    #[test]
    fn test_string_styles_materialize() {
        let theme = theme();
        let ctx = BuildContext::new(&theme);

        let title = StringField::builder().key("t").default_value("Header").title().build().unwrap();
        let mut widget = title.component(&ctx);
        assert!(matches!(widget, Widget::Label(_)));
        assert_eq!(title.extract_value(&mut widget), Value::from("Header"));

        let secret = StringField::builder().key("pw").secret().build().unwrap();
        assert!(matches!(secret.component(&ctx), Widget::TextInput(t) if t.secure));

        let plain = StringField::builder().key("name").build().unwrap();
        let mut stray = label();
        assert_eq!(plain.extract_value(&mut stray), Value::Null);
    }

    #[test]
    fn test_date_field() {
        let theme = theme();
        let ctx = BuildContext::new(&theme);
        let day = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        let field = DateField::builder().key("born").default_value(day).build().unwrap();
        assert_eq!(field.kind().min_year, 1900);
        assert_eq!(field.kind().max_year, 2100);

        let mut widget = field.component(&ctx);
        assert_eq!(field.extract_value(&mut widget), Value::Date(day));
        assert_eq!(field.extract_value(&mut label()), Value::Null);
    }

    #[test]
    fn test_date_default_is_today() {
        let field = DateField::builder().key("d").build().unwrap();
        assert_eq!(*field.typed_default(), chrono::Local::now().date_naive());
    }

    #[test]
    fn test_drop_down_default_selection() {
        let theme = theme();
        let ctx = BuildContext::new(&theme);

        let known = DropDownField::builder()
            .key("color")
            .options(["red", "green"])
            .default_value("green")
            .build()
            .unwrap();
        let mut widget = known.component(&ctx);
        assert!(matches!(&widget, Widget::DropDown(d) if d.selected.as_deref() == Some("green")));
        assert_eq!(known.extract_value(&mut widget), Value::from("green"));

        let unknown = DropDownField::builder()
            .key("color")
            .options(["red", "green"])
            .default_value("blue")
            .build()
            .unwrap();
        let mut widget = unknown.component(&ctx);
        assert!(matches!(&widget, Widget::DropDown(d) if d.selected.is_none()));
        assert_eq!(unknown.extract_value(&mut widget), Value::Null);
    }

    #[test]
    fn test_button_never_stores() {
        let theme = theme();
        let ctx = BuildContext::new(&theme);
        let red = Color::rgb(200, 0, 0);
        let button = ButtonField::builder()
            .key("submit")
            .default_value("Send")
            .action(ActionId::new(3))
            .select_paint(red)
            .build()
            .unwrap();

        let mut widget = button.component(&ctx);
        let Widget::Button(b) = &widget else {
            panic!("expected button");
        };
        assert_eq!(b.text, "Send");
        assert_eq!(b.action, Some(ActionId::new(3)));
        assert_eq!(b.style.select, Some(red));
        assert!(b.style.foreground.is_some(), "theme supplies unset paints");
        assert_eq!(button.extract_value(&mut widget), Value::Null);
    }

    #[test]
    fn test_form_field_without_form_shows_placeholder() {
        let theme = theme();
        let ctx = BuildContext::new(&theme);
        let field = FormField::builder().key("address").build().unwrap();
        let mut widget = field.component(&ctx);
        assert!(matches!(&widget, Widget::Label(l) if l.text == NO_FORM_PLACEHOLDER));
        assert_eq!(field.extract_value(&mut widget), Value::Null);
    }

    #[test]
    fn test_table_field_validation_surfaces_at_build() {
        let err = TableField::builder()
            .key("rows")
            .horizontal_policy(SizingPolicy::ExplicitExact)
            .build()
            .unwrap_err();
        assert_eq!(err.violations().len(), 1);
    }

    #[test]
    fn test_custom_field_round_trips_through_widget() {
        let theme = theme();
        let ctx = BuildContext::new(&theme);
        let field = CustomField::custom("rating")
            .key("stars")
            .default_value(Value::Int(3))
            .build()
            .unwrap();

        let mut widget = field.component(&ctx);
        assert!(widget.apply(WidgetEdit::Replace("5".into())));
        assert_eq!(field.extract_value(&mut widget), Value::Int(5));
    }

    #[test]
    fn test_custom_extractor_override() {
        let theme = theme();
        let ctx = BuildContext::new(&theme);
        let field = CustomField::custom("flag")
            .key("f")
            .factory(|_, _| Widget::CheckBox(CheckBoxWidget {
                checked: true,
                style: crate::theme::WidgetStyle::default(),
            }))
            .extractor(|w| match w {
                Widget::CheckBox(c) => Value::from(if c.checked { "yes" } else { "no" }),
                _ => Value::Null,
            })
            .build()
            .unwrap();
        let mut widget = field.component(&ctx);
        assert_eq!(field.extract_value(&mut widget), Value::from("yes"));
    }
}
