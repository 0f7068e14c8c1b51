//! Forms: field registration, widget creation and value binding
//!
//! A form is built in two phases. While [`FormPhase::Constructing`], the
//! caller's [`FormFields::set_default_fields`] registers descriptors with
//! [`Form::add_field`], each registration seeding the value map with the
//! field's default. Then [`Form::create_components`] materializes and places
//! every widget and the form becomes [`FormPhase::Live`] for good.
//!
//! The value map is a snapshot: widget edits reach it only through an
//! explicit [`Form::save_values`].

use std::cell::{BorrowError, BorrowMutError, Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::action::ActionRegistry;
use crate::config::FormConfig;
use crate::error::FormResult;
use crate::field::{BuildContext, Field};
use crate::layout::{warn_overlap, FieldPlacement, GridLayout, LabelMode, LabelOrientation};
use crate::theme::{component, LookAndFeel};
use crate::value::Value;
use crate::value_map::ValueMap;
use crate::widget::{LabelWidget, TitledFrame, Widget, WidgetEdit};

/// Lifecycle phase of a form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// Fields are being registered
    Constructing,
    /// Widgets exist and can be looked up and saved
    Live,
}

/// Caller-supplied field registration, run once while the form is built
pub trait FormFields {
    fn set_default_fields(&self, form: &mut Form) -> FormResult<()>;
}

impl<F> FormFields for F
where
    F: Fn(&mut Form) -> FormResult<()>,
{
    fn set_default_fields(&self, form: &mut Form) -> FormResult<()> {
        self(form)
    }
}

/// Messages a live form reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum FormMessage {
    /// A user edit to the widget registered under `key`
    Edit { key: String, edit: WidgetEdit },
    ButtonPressed { key: String },
    /// A message for the nested form registered under `key`
    Nested { key: String, message: Box<FormMessage> },
}

/// A declarative form
pub struct Form {
    phase: FormPhase,
    values: ValueMap,
    fields: Vec<Box<dyn Field>>,
    widgets: HashMap<String, Widget>,
    labels: HashMap<String, LabelWidget>,
    placements: Vec<FieldPlacement>,
    layout: GridLayout,
    look_and_feel: Rc<dyn LookAndFeel>,
    actions: ActionRegistry,
    config: FormConfig,
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("phase", &self.phase)
            .field("fields", &self.fields)
            .field("values", &self.values)
            .field("layout", &self.layout)
            .field("actions", &self.actions.len())
            .finish_non_exhaustive()
    }
}

impl Form {
    /// Build a form with the default configuration
    pub fn new(fields: &impl FormFields) -> FormResult<Self> {
        FormBuilder::new().build(fields)
    }

    pub fn with_config(fields: &impl FormFields, config: FormConfig) -> FormResult<Self> {
        FormBuilder::new().config(config).build(fields)
    }

    /// Build a form whose value map starts from `seed`
    pub fn with_values(
        fields: &impl FormFields,
        seed: ValueMap,
        config: FormConfig,
    ) -> FormResult<Self> {
        FormBuilder::new().config(config).values(seed).build(fields)
    }

    #[must_use]
    pub fn builder() -> FormBuilder {
        FormBuilder::new()
    }

    #[must_use]
    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    #[must_use]
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    #[must_use]
    pub fn look_and_feel(&self) -> &dyn LookAndFeel {
        self.look_and_feel.as_ref()
    }

    /// Registered fields in registration order
    pub fn fields(&self) -> impl Iterator<Item = &dyn Field> {
        self.fields.iter().map(|f| f.as_ref())
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&dyn Field> {
        self.fields.iter().find(|f| f.key() == key).map(|f| f.as_ref())
    }

    /// Register a field and seed its default value.
    ///
    /// A field with an already registered key replaces the old one in place.
    /// On a live form the field's widget is created right away.
    pub fn add_field(&mut self, field: impl Field + 'static) {
        let field: Box<dyn Field> = Box::new(field);
        let key = field.key().to_string();
        self.values.set_item(key.clone(), field.default_value());

        match self.fields.iter().position(|f| f.key() == key) {
            Some(index) => {
                tracing::warn!(key = %key, "replacing field registered under the same key");
                self.widgets.remove(&key);
                self.labels.remove(&key);
                self.placements.retain(|p| p.key != key);
                self.fields[index] = field;
            }
            None => {
                tracing::debug!(key = %key, field_type = %field.field_type(), "registered field");
                self.fields.push(field);
            }
        }

        if self.phase == FormPhase::Live {
            self.materialize_pending();
        }
    }

    /// Materialize and place every registered field, then go live.
    ///
    /// Runs once during construction; later calls only log.
    pub fn create_components(&mut self) {
        if self.phase == FormPhase::Live {
            tracing::debug!("components already created");
            return;
        }
        self.materialize_pending();
        self.phase = FormPhase::Live;
        tracing::debug!(
            widgets = self.widgets.len(),
            labels = self.labels.len(),
            "form is live"
        );
    }

    /// Create widgets for fields that have none yet, in registration order
    fn materialize_pending(&mut self) {
        let look_and_feel = Rc::clone(&self.look_and_feel);
        let ctx = BuildContext::new(look_and_feel.as_ref()).with_table_metrics(self.config.table);

        for field in &self.fields {
            let key = field.key();
            if self.widgets.contains_key(key) {
                continue;
            }

            let placement = self.layout.place(key, field.position(), field.label_mode());
            warn_overlap(&self.placements, &placement);
            let mut widget = field.component(&ctx);
            let label_overrides = field.label_style().to_overrides();

            match field.label_mode() {
                LabelMode::InlineLabel => {
                    if let Some(cell) = placement.label {
                        let mut label = LabelWidget::new(key);
                        label.style = ctx.style(component::LABEL, &label_overrides);
                        label.align_x = cell.align_x;
                        label.align_y = cell.align_y;
                        label.padding = cell.padding;
                        self.labels.insert(key.to_string(), label);
                    }
                }
                LabelMode::TitledBorder => {
                    let title_style = ctx.style(component::TITLED_BORDER, &label_overrides);
                    widget = Widget::Titled(TitledFrame {
                        title: key.to_string(),
                        border: title_style.border,
                        title_style,
                        content: Box::new(widget),
                    });
                }
                LabelMode::None => {}
            }

            tracing::debug!(
                key,
                widget = widget.content().kind_name(),
                row = placement.field.row,
                col = placement.field.col,
                "placed field"
            );
            self.widgets.insert(key.to_string(), widget);
            self.placements.push(placement);
        }
    }

    /// Pull every widget's value into the value map.
    ///
    /// The only path from widgets to values. Widgets of an unexpected kind
    /// store `Value::Null` rather than failing.
    pub fn save_values(&mut self) {
        for field in &self.fields {
            let Some(widget) = self.widgets.get_mut(field.key()) else {
                continue;
            };
            let value = field.extract_value(widget);
            self.values.set_item(field.key(), value);
        }
        tracing::debug!(fields = self.fields.len(), "saved form values");
    }

    #[must_use]
    pub fn component_by_key(&self, key: &str) -> Option<&Widget> {
        self.widgets.get(key)
    }

    pub fn component_by_key_mut(&mut self, key: &str) -> Option<&mut Widget> {
        self.widgets.get_mut(key)
    }

    /// Inline label widget of a field, if it has one
    #[must_use]
    pub fn label_by_key(&self, key: &str) -> Option<&LabelWidget> {
        self.labels.get(key)
    }

    #[must_use]
    pub fn placement_by_key(&self, key: &str) -> Option<&FieldPlacement> {
        self.placements.iter().find(|p| p.key == key)
    }

    /// Placements in registration order
    #[must_use]
    pub fn placements(&self) -> &[FieldPlacement] {
        &self.placements
    }

    /// Number of widgets, labels included
    #[must_use]
    pub fn widget_count(&self) -> usize {
        self.widgets.len() + self.labels.len()
    }

    #[must_use]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn actions_mut(&mut self) -> &mut ActionRegistry {
        &mut self.actions
    }

    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.values.has_key(key)
    }

    #[must_use]
    pub fn has_item(&self, key: &str) -> bool {
        self.values.has_item(key)
    }

    #[must_use]
    pub fn item(&self, key: &str) -> Option<&Value> {
        self.values.item(key)
    }

    pub fn set_item(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.set_item(key, value)
    }

    pub fn remove_item(&mut self, key: &str) -> Option<Value> {
        self.values.remove_item(key)
    }

    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.values.keys()
    }

    /// The value map
    #[must_use]
    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    /// Apply a message; `true` when something changed
    pub fn update(&mut self, message: FormMessage) -> bool {
        match message {
            FormMessage::Edit { key, edit } => match self.widgets.get_mut(&key) {
                Some(widget) => widget.apply(edit),
                None => {
                    tracing::debug!(key = %key, "edit for unknown widget");
                    false
                }
            },
            FormMessage::ButtonPressed { key } => {
                let action = match self.widgets.get(&key).map(Widget::content) {
                    Some(Widget::Button(button)) => button.action,
                    _ => None,
                };
                match action {
                    Some(id) => self.actions.invoke(id, &mut self.values),
                    None => false,
                }
            }
            FormMessage::Nested { key, message } => {
                let handle = match self.widgets.get(&key).map(Widget::content) {
                    Some(Widget::Form(handle)) => handle.clone(),
                    _ => return false,
                };
                let changed = match handle.try_borrow_mut() {
                    Ok(mut nested) => nested.update(*message),
                    Err(_) => {
                        tracing::warn!(key = %key, "nested form is borrowed; message dropped");
                        false
                    }
                };
                changed
            }
        }
    }

    /// Wrap in a shareable handle, e.g. to nest it in another form
    #[must_use]
    pub fn into_handle(self) -> FormHandle {
        FormHandle::new(self)
    }
}

/// Options for building a [`Form`]
#[derive(Default)]
pub struct FormBuilder {
    config: FormConfig,
    values: Option<ValueMap>,
    orientation: Option<LabelOrientation>,
    look_and_feel: Option<Rc<dyn LookAndFeel>>,
}

impl FormBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    /// Seed the value map from an external source
    #[must_use]
    pub fn values(mut self, values: ValueMap) -> Self {
        self.values = Some(values);
        self
    }

    /// Override the configured label orientation
    #[must_use]
    pub fn orientation(mut self, orientation: LabelOrientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Use this look-and-feel instead of the configured theme
    #[must_use]
    pub fn look_and_feel(mut self, look_and_feel: Rc<dyn LookAndFeel>) -> Self {
        self.look_and_feel = Some(look_and_feel);
        self
    }

    /// Register the fields, create the widgets and return the live form.
    ///
    /// Fails when a field fails to build; no partial form is returned.
    pub fn build(self, fields: &impl FormFields) -> FormResult<Form> {
        let Self {
            mut config,
            values,
            orientation,
            look_and_feel,
        } = self;

        if let Some(orientation) = orientation {
            config.label_orientation = orientation;
        }
        let look_and_feel: Rc<dyn LookAndFeel> = match look_and_feel {
            Some(laf) => laf,
            None => Rc::new(config.look_and_feel()?),
        };
        let values = values.unwrap_or_else(|| {
            if config.ordered_values {
                ValueMap::ordered()
            } else {
                ValueMap::new()
            }
        });

        let mut form = Form {
            phase: FormPhase::Constructing,
            values,
            fields: Vec::new(),
            widgets: HashMap::new(),
            labels: HashMap::new(),
            placements: Vec::new(),
            layout: config.grid_layout(),
            look_and_feel,
            actions: ActionRegistry::new(),
            config,
        };

        fields.set_default_fields(&mut form)?;
        form.create_components();
        Ok(form)
    }
}

/// Shared handle to a form, used for nesting
#[derive(Clone)]
pub struct FormHandle(Rc<RefCell<Form>>);

impl FormHandle {
    #[must_use]
    pub fn new(form: Form) -> Self {
        Self(Rc::new(RefCell::new(form)))
    }

    /// Borrow the form; panics if it is mutably borrowed
    #[must_use]
    pub fn borrow(&self) -> Ref<'_, Form> {
        self.0.borrow()
    }

    pub fn try_borrow(&self) -> Result<Ref<'_, Form>, BorrowError> {
        self.0.try_borrow()
    }

    /// Borrow the form mutably; panics if it is borrowed
    #[must_use]
    pub fn borrow_mut(&self) -> RefMut<'_, Form> {
        self.0.borrow_mut()
    }

    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, Form>, BorrowMutError> {
        self.0.try_borrow_mut()
    }

    /// Whether both handles point at the same form
    #[must_use]
    pub fn ptr_eq(&self, other: &FormHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for FormHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for FormHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(form) => f
                .debug_struct("FormHandle")
                .field("fields", &form.fields.len())
                .field("phase", &form.phase)
                .finish(),
            Err(_) => f.write_str("FormHandle(<borrowed>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{BooleanField, ButtonField, IntField, StringField};

    fn person(form: &mut Form) -> FormResult<()> {
        form.add_field(StringField::builder().key("name").default_value("Ada").build()?);
        form.add_field(IntField::builder().key("age").default_value(36).position(0, 1).build()?);
        form.add_field(
            BooleanField::builder()
                .key("admin")
                .position(1, 0)
                .label_mode(LabelMode::None)
                .build()?,
        );
        Ok(())
    }

    #[test]
    fn test_construction_goes_live_with_defaults() {
        let form = Form::new(&person).unwrap();
        assert_eq!(form.phase(), FormPhase::Live);
        assert_eq!(form.item("name"), Some(&Value::from("Ada")));
        assert_eq!(form.item("age"), Some(&Value::Int(36)));
        assert_eq!(form.item("admin"), Some(&Value::Bool(false)));
        assert_eq!(form.keys(), vec!["name", "age", "admin"]);
    }

    #[test]
    fn test_labels_follow_label_mode() {
        let form = Form::new(&person).unwrap();
        assert!(form.label_by_key("name").is_some());
        assert!(form.label_by_key("admin").is_none());
        assert_eq!(form.widget_count(), 5);
        assert_eq!(form.label_by_key("age").map(|l| l.text.as_str()), Some("age"));
    }

    #[test]
    fn test_edits_reach_values_only_on_save() {
        let mut form = Form::new(&person).unwrap();
        assert!(form.update(FormMessage::Edit {
            key: "name".into(),
            edit: WidgetEdit::Text("Grace".into()),
        }));
        assert_eq!(form.item("name"), Some(&Value::from("Ada")));

        form.save_values();
        assert_eq!(form.item("name"), Some(&Value::from("Grace")));
        assert_eq!(form.item("age"), Some(&Value::Int(36)));
    }

    #[test]
    fn test_second_create_components_is_noop() {
        let mut form = Form::new(&person).unwrap();
        let before = form.placements().to_vec();
        form.create_components();
        assert_eq!(form.placements(), before.as_slice());
    }

    #[test]
    fn test_failing_fields_abort_construction() {
        let result = Form::new(&|_: &mut Form| -> FormResult<()> {
            Err(crate::error::FormError::configuration(vec!["bad".into()]))
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_button_invokes_registered_action() {
        let fields = |form: &mut Form| -> FormResult<()> {
            let id = form.actions_mut().register_fn(|values| {
                values.set_item("submitted", true);
            });
            form.add_field(ButtonField::builder().key("submit").action(id).build()?);
            Ok(())
        };
        let mut form = Form::new(&fields).unwrap();
        assert_eq!(form.item("submit"), Some(&Value::from("")));

        assert!(form.update(FormMessage::ButtonPressed { key: "submit".into() }));
        assert_eq!(form.item("submitted"), Some(&Value::Bool(true)));

        form.save_values();
        assert_eq!(form.item("submit"), Some(&Value::Null));
    }

    #[test]
    fn test_add_field_on_live_form_creates_widget() {
        let mut form = Form::new(&person).unwrap();
        form.add_field(StringField::builder().key("email").position(2, 0).build().unwrap());
        assert!(form.component_by_key("email").is_some());
        assert!(form.placement_by_key("email").is_some());
    }

    #[test]
    fn test_duplicate_key_replaces_field() {
        let mut form = Form::new(&person).unwrap();
        form.add_field(StringField::builder().key("age").default_value("old").build().unwrap());
        assert_eq!(form.fields().count(), 3);
        assert_eq!(form.item("age"), Some(&Value::from("old")));
        assert!(matches!(form.component_by_key("age"), Some(Widget::TextInput(_))));
        assert_eq!(form.placements().iter().filter(|p| p.key == "age").count(), 1);
    }

    #[test]
    fn test_handle_equality_is_identity() {
        let a = Form::new(&person).unwrap().into_handle();
        let b = Form::new(&person).unwrap().into_handle();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
