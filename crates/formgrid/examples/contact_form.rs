//! Contact form demo
//!
//! Run with `RUST_LOG=formgrid=debug` to see placement and binding logs.

use formgrid::{
    run_form, BooleanField, ButtonField, CellEditor, DateField, DropDownField, Form, FormResult, IntField,
    LabelMode, RowEntity, SizingPolicy, StringField, TableField, ThemePreset, WindowSettings,
};
use tracing_subscriber::EnvFilter;

fn contact(form: &mut Form) -> FormResult<()> {
    form.add_field(StringField::builder().key("name").build()?);
    form.add_field(StringField::builder().key("password").secret().position(0, 1).build()?);
    form.add_field(IntField::builder().key("age").bounds(0, 150).position(1, 0).build()?);
    form.add_field(DateField::builder().key("born").position(1, 1).build()?);
    form.add_field(
        DropDownField::builder()
            .key("role")
            .options(["admin", "editor", "viewer"])
            .default_value("viewer")
            .position(2, 0)
            .build()?,
    );
    form.add_field(
        BooleanField::builder()
            .key("newsletter")
            .label_mode(LabelMode::TitledBorder)
            .position(2, 1)
            .build()?,
    );

    let keys = ["item", "qty", "shipped"];
    form.add_field(
        TableField::builder()
            .key("orders")
            .default_value(vec![
                RowEntity::new(keys).with("item", "Keyboard").with("qty", 1).with("shipped", true),
                RowEntity::new(keys).with("item", "Mouse").with("qty", 2).with("shipped", false),
            ])
            .column_definition("shipped", CellEditor::CheckBox)
            .horizontal_policy(SizingPolicy::DataDriven)
            .vertical_policy(SizingPolicy::ExplicitDataScale)
            .height(6.0)
            .position(3, 0)
            .col_span(2)
            .build()?,
    );

    let save = form.actions_mut().register_fn(|values| {
        for (key, value) in values.iter() {
            tracing::info!(key = %key, value = %value.to_display_string(), "form value");
        }
    });
    form.add_field(ButtonField::builder().key("save").default_value("Log values").action(save).position(4, 0).build()?);
    Ok(())
}

fn main() -> FormResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let form = Form::new(&contact)?.into_handle();
    run_form(
        form.clone(),
        WindowSettings::new("Contact")
            .with_size(720.0, 640.0)
            .with_theme(ThemePreset::Nord),
    )?;

    let mut live = form.borrow_mut();
    live.save_values();
    for (key, value) in live.values().iter() {
        tracing::info!(key = %key, value = %value.to_display_string(), "final value");
    }
    Ok(())
}
