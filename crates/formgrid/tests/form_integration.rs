//! Integration tests for form construction, placement and value binding

use std::cell::Cell;
use std::rc::Rc;

use chrono::NaiveDate;
use formgrid::{
    BooleanField, ButtonField, CustomField, DateField, DoubleField, DropDownField, Form, FormConfig, FormField,
    FormMessage, FormPhase, FormResult, GridPlacement, IntField, LabelMode, LabelOrientation, RowEntity,
    StringField, TableField, TableMetrics, Value, ValueMap, Widget, WidgetEdit,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn contact(form: &mut Form) -> FormResult<()> {
    form.add_field(StringField::builder().key("name").default_value("Ada").build()?);
    form.add_field(IntField::builder().key("age").default_value(36).min(0).max(150).position(0, 1).build()?);
    form.add_field(
        DoubleField::builder()
            .key("score")
            .default_value(4.5)
            .position(1, 0)
            .label_mode(LabelMode::TitledBorder)
            .build()?,
    );
    form.add_field(
        BooleanField::builder()
            .key("subscribed")
            .default_value(true)
            .position(1, 1)
            .label_mode(LabelMode::None)
            .build()?,
    );
    form.add_field(
        DateField::builder()
            .key("born")
            .default_value(date(1990, 12, 10))
            .position(2, 0)
            .build()?,
    );
    form.add_field(
        DropDownField::builder()
            .key("role")
            .options(["admin", "user"])
            .default_value("user")
            .position(2, 1)
            .build()?,
    );
    Ok(())
}

#[test]
fn test_defaults_seeded_before_save() {
    let form = Form::new(&contact).unwrap();

    assert_eq!(form.phase(), FormPhase::Live);
    assert_eq!(form.item("name"), Some(&Value::from("Ada")));
    assert_eq!(form.item("age"), Some(&Value::Int(36)));
    assert_eq!(form.item("score"), Some(&Value::Double(4.5)));
    assert_eq!(form.item("subscribed"), Some(&Value::Bool(true)));
    assert_eq!(form.item("born"), Some(&Value::Date(date(1990, 12, 10))));
    assert_eq!(form.item("role"), Some(&Value::from("user")));
    assert_eq!(form.item("missing"), None);
}

#[test]
fn test_save_without_edits_keeps_defaults() {
    let mut form = Form::new(&contact).unwrap();
    let before = form.values().clone();
    form.save_values();
    assert_eq!(form.values(), &before);
}

#[test]
fn test_unlabeled_field_has_one_widget_and_no_label() {
    let form = Form::new(&contact).unwrap();

    let placement = form.placement_by_key("subscribed").unwrap();
    assert!(placement.label.is_none());
    assert!(form.label_by_key("subscribed").is_none());
    assert!(matches!(form.component_by_key("subscribed"), Some(Widget::CheckBox(_))));
}

#[test]
fn test_titled_border_takes_no_extra_cell() {
    let form = Form::new(&contact).unwrap();

    let placement = form.placement_by_key("score").unwrap();
    assert!(placement.label.is_none());
    assert!(form.label_by_key("score").is_none());
    assert_eq!(placement.field, GridPlacement::new(3, 0, 1, 1));

    match form.component_by_key("score") {
        Some(Widget::Titled(frame)) => {
            assert_eq!(frame.title, "score");
            assert!(matches!(*frame.content, Widget::Spinner(_)));
        }
        other => panic!("expected titled frame, got {other:?}"),
    }
}

#[test]
fn test_top_labels_sit_above_fields() {
    let form = Form::new(&contact).unwrap();

    let name = form.placement_by_key("name").unwrap();
    let label = name.label.unwrap();
    assert_eq!(label.cell, GridPlacement::new(0, 0, 1, 1));
    assert_eq!(name.field, GridPlacement::new(1, 0, 1, 1));
    assert_eq!(form.label_by_key("name").unwrap().text, "name");
}

#[test]
fn test_side_labels_sit_before_fields() {
    let config = FormConfig {
        label_orientation: LabelOrientation::Side,
        ..FormConfig::default()
    };
    let form = Form::with_config(&contact, config).unwrap();

    let age = form.placement_by_key("age").unwrap();
    assert_eq!(age.label.unwrap().cell, GridPlacement::new(0, 2, 1, 1));
    assert_eq!(age.field, GridPlacement::new(0, 3, 1, 1));
}

#[test]
fn test_save_pulls_widget_edits() {
    let mut form = Form::new(&contact).unwrap();

    form.update(FormMessage::Edit {
        key: "name".into(),
        edit: WidgetEdit::Text("Grace".into()),
    });
    form.update(FormMessage::Edit {
        key: "age".into(),
        edit: WidgetEdit::Increment,
    });
    form.update(FormMessage::Edit {
        key: "score".into(),
        edit: WidgetEdit::Text("9.25".into()),
    });
    form.update(FormMessage::Edit {
        key: "subscribed".into(),
        edit: WidgetEdit::Toggle(false),
    });
    form.update(FormMessage::Edit {
        key: "role".into(),
        edit: WidgetEdit::Select("admin".into()),
    });

    assert_eq!(form.item("name"), Some(&Value::from("Ada")));
    form.save_values();

    assert_eq!(form.item("name"), Some(&Value::from("Grace")));
    assert_eq!(form.item("age"), Some(&Value::Int(37)));
    assert_eq!(form.item("score"), Some(&Value::Double(9.25)));
    assert_eq!(form.item("subscribed"), Some(&Value::Bool(false)));
    assert_eq!(form.item("role"), Some(&Value::from("admin")));
}

#[test]
fn test_mismatched_widget_saves_null() {
    let mut form = Form::new(&contact).unwrap();

    if let Some(widget) = form.component_by_key_mut("subscribed") {
        *widget = Widget::Label(formgrid::widget::LabelWidget::new("stray"));
    }
    form.save_values();

    assert_eq!(form.item("subscribed"), Some(&Value::Null));
    assert_eq!(form.item("name"), Some(&Value::from("Ada")));
}

#[test]
fn test_seed_values_are_overwritten_by_defaults() {
    let seed = ValueMap::from_pairs([("name", Value::from("Seeded")), ("extra", Value::Int(1))], true);
    let form = Form::with_values(&contact, seed, FormConfig::default()).unwrap();

    assert_eq!(form.item("name"), Some(&Value::from("Ada")));
    assert_eq!(form.item("extra"), Some(&Value::Int(1)));
}

#[test]
fn test_button_action_mutates_values() {
    let fields = |form: &mut Form| -> FormResult<()> {
        form.add_field(IntField::builder().key("count").build()?);
        let id = form.actions_mut().register_fn(|values| {
            let next = values.item("count").and_then(Value::as_number).map_or(0, |n| n.int_value()) + 1;
            values.set_item("count", next);
        });
        form.add_field(ButtonField::builder().key("bump").action(id).position(1, 0).build()?);
        Ok(())
    };
    let mut form = Form::new(&fields).unwrap();

    assert!(form.label_by_key("bump").is_none());
    form.update(FormMessage::ButtonPressed { key: "bump".into() });
    form.update(FormMessage::ButtonPressed { key: "bump".into() });
    assert_eq!(form.item("count"), Some(&Value::Int(2)));
}

#[test]
fn test_nested_form_saved_once_per_extraction() {
    let saves = Rc::new(Cell::new(0));
    let counter = Rc::clone(&saves);

    let inner_fields = move |form: &mut Form| -> FormResult<()> {
        let counter = Rc::clone(&counter);
        form.add_field(
            CustomField::custom("counter")
                .key("probe")
                .default_value(Value::from("x"))
                .extractor(move |widget| {
                    counter.set(counter.get() + 1);
                    match widget {
                        Widget::Custom(custom) => custom.value.clone(),
                        _ => Value::Null,
                    }
                })
                .build()?,
        );
        form.add_field(StringField::builder().key("street").position(1, 0).build()?);
        Ok(())
    };
    let inner = Form::new(&inner_fields).unwrap().into_handle();

    let outer_inner = inner.clone();
    let outer_fields = move |form: &mut Form| -> FormResult<()> {
        form.add_field(FormField::builder().key("address").form(outer_inner.clone()).build()?);
        Ok(())
    };
    let mut outer = Form::new(&outer_fields).unwrap();
    assert_eq!(saves.get(), 0);

    outer.update(FormMessage::Nested {
        key: "address".into(),
        message: Box::new(FormMessage::Edit {
            key: "street".into(),
            edit: WidgetEdit::Text("Main St".into()),
        }),
    });

    outer.save_values();
    assert_eq!(saves.get(), 1);
    assert_eq!(inner.borrow().item("street"), Some(&Value::from("Main St")));
    assert!(matches!(outer.item("address"), Some(Value::Form(handle)) if handle.ptr_eq(&inner)));

    outer.save_values();
    assert_eq!(saves.get(), 2);
}

#[test]
fn test_form_field_without_form_extracts_null() {
    let fields = |form: &mut Form| -> FormResult<()> {
        form.add_field(FormField::builder().key("address").build()?);
        Ok(())
    };
    let mut form = Form::new(&fields).unwrap();
    assert_eq!(form.item("address"), Some(&Value::Null));

    form.save_values();
    assert_eq!(form.item("address"), Some(&Value::Null));
}

#[test]
fn test_table_field_reconciles_on_save() {
    let rows = vec![
        RowEntity::new(["Test", "Derp"]).with("Test", 1).with("Derp", "a"),
        RowEntity::new(["Test", "Derp"]).with("Test", 2),
    ];
    let seeded = rows.clone();
    let fields = move |form: &mut Form| -> FormResult<()> {
        form.add_field(TableField::builder().key("items").default_value(seeded.clone()).build()?);
        Ok(())
    };
    let mut form = Form::new(&fields).unwrap();
    assert_eq!(form.item("items"), Some(&Value::Table(rows.clone())));

    form.update(FormMessage::Edit {
        key: "items".into(),
        edit: WidgetEdit::Cell(formgrid::TableMessage::CellEdited {
            row: 1,
            col: 1,
            text: "b".into(),
        }),
    });
    form.save_values();

    let saved = form.item("items").and_then(Value::as_table).unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0], rows[0]);
    assert_eq!(saved[1].get("Derp"), Some(&Value::from("b")));
}

#[test]
fn test_table_field_validation_aborts_form() {
    let fields = |form: &mut Form| -> FormResult<()> {
        form.add_field(
            TableField::builder()
                .key("items")
                .horizontal_policy(formgrid::SizingPolicy::ExplicitExact)
                .build()?,
        );
        Ok(())
    };
    let err = Form::new(&fields).unwrap_err();
    assert_eq!(err.violations().len(), 1);
}

#[test]
fn test_cleared_editable_drop_down_saves_empty_text() {
    let fields = |form: &mut Form| -> FormResult<()> {
        form.add_field(
            DropDownField::builder()
                .key("size")
                .options(["a", "b"])
                .editable(true)
                .default_value("a")
                .build()?,
        );
        Ok(())
    };
    let mut form = Form::new(&fields).unwrap();

    form.update(FormMessage::Edit {
        key: "size".into(),
        edit: WidgetEdit::Text(String::new()),
    });
    form.save_values();
    assert_eq!(form.item("size"), Some(&Value::from("")));
}

#[test]
fn test_table_fields_use_form_table_metrics() {
    let fields = |form: &mut Form| -> FormResult<()> {
        form.add_field(
            TableField::builder()
                .key("items")
                .key_order(["a", "b"])
                .vertical_policy(formgrid::SizingPolicy::ExplicitDataScale)
                .height(5.0)
                .build()?,
        );
        form.add_field(
            TableField::builder()
                .key("own")
                .key_order(["a"])
                .metrics(TableMetrics {
                    row_height: 10.0,
                    ..TableMetrics::default()
                })
                .position(1, 0)
                .build()?,
        );
        Ok(())
    };
    let mut config = FormConfig::default();
    config.table.row_height = 40.0;
    let form = Form::with_config(&fields, config).unwrap();

    match form.component_by_key("items") {
        Some(Widget::Table(engine)) => {
            assert_eq!(engine.metrics().row_height, 40.0);
            assert_eq!(engine.preferred_height(), 200.0);
        }
        other => panic!("expected table, got {other:?}"),
    }
    match form.component_by_key("own") {
        Some(Widget::Table(engine)) => assert_eq!(engine.metrics().row_height, 10.0),
        other => panic!("expected table, got {other:?}"),
    }
}

#[test]
fn test_value_map_protocol_on_form() {
    let mut form = Form::new(&contact).unwrap();

    assert!(form.has_key("name"));
    assert!(form.has_item("name"));
    form.set_item("note", Value::Null);
    assert!(form.has_key("note"));
    assert!(!form.has_item("note"));

    assert_eq!(form.remove_item("note"), Some(Value::Null));
    assert!(!form.has_key("note"));
    assert_eq!(form.keys(), vec!["name", "age", "score", "subscribed", "born", "role"]);
}
