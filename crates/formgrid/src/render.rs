//! iced rendering of forms
//!
//! [`Form::view`] lays the placed widgets out on a row-major grid: each grid
//! row becomes an iced row whose cells take `FillPortion(col_span)` of the
//! width, and empty cells are filled with spaces. A cell spanning several
//! rows is drawn in its first row.
//!
//! Elements own their text, so a view does not borrow the form. Nested
//! forms are viewed through a temporary borrow of their handle.

use std::collections::HashMap;

use iced::widget::{button, checkbox, column, container, pick_list, row, scrollable, text, text_input, Row, Space, Text};
use iced::{Background, Border, Element, Fill, Length, Theme};

use crate::form::{Form, FormMessage};
use crate::kinds::NO_FORM_PLACEHOLDER;
use crate::layout::{GridLayout, GridPlacement};
use crate::table::{CellEditor, TableEngine, TableMessage};
use crate::theme::WidgetStyle;
use crate::widget::{DatePart, DatePickerWidget, LabelWidget, TitledFrame, Widget, WidgetEdit};

const SPACING: f32 = 4.0;
const MONTHS: [u32; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

impl Form {
    /// Render the form
    pub fn view(&self) -> Element<'static, FormMessage> {
        let mut cells: HashMap<(usize, usize), (GridPlacement, Element<'static, FormMessage>)> =
            HashMap::new();

        for placement in self.placements() {
            if let (Some(cell), Some(label)) = (placement.label, self.label_by_key(&placement.key)) {
                cells.insert((cell.cell.row, cell.cell.col), (cell.cell, view_label(label)));
            }
            if let Some(widget) = self.component_by_key(&placement.key) {
                let field = placement.field;
                cells.insert((field.row, field.col), (field, view_widget(&placement.key, widget)));
            }
        }

        let (rows, cols) = GridLayout::dimensions(self.placements());
        let mut grid = column![].spacing(SPACING);

        for r in 0..rows {
            let mut line = row![].spacing(SPACING);
            let mut c = 0;
            while c < cols {
                if let Some((cell, element)) = cells.remove(&(r, c)) {
                    line = line.push(
                        container(element).width(Length::FillPortion(cell.col_span.max(1) as u16)),
                    );
                    c += cell.col_span.max(1);
                } else {
                    // covered by a cell from an earlier row, or empty
                    line = line.push(Space::new().width(Length::FillPortion(1)).height(Length::Shrink));
                    c += 1;
                }
            }
            grid = grid.push(line);
        }

        if !cells.is_empty() {
            tracing::debug!(dropped = cells.len(), "cells outside the grid were not drawn");
        }

        grid.into()
    }
}

/// Text with the foreground color and font of `style`
fn styled_text(content: String, style: &WidgetStyle) -> Text<'static> {
    let mut label = text(content);
    if let Some(color) = style.foreground {
        label = label.color(color.to_iced());
    }
    if let Some(font) = &style.font {
        label = label.font(font.to_iced());
        if let Some(size) = font.size {
            label = label.size(size);
        }
    }
    label
}

fn frame_style(style: &WidgetStyle) -> impl Fn(&Theme) -> container::Style + 'static {
    let background = style.background.map(|c| Background::Color(c.to_iced()));
    let border = style.border;
    let radius = style.shape.map_or(0.0, |s| s.corner_radius);
    move |_theme: &Theme| container::Style {
        background,
        border: Border {
            color: border.map_or(iced::Color::TRANSPARENT, |b| b.color.to_iced()),
            width: border.map_or(0.0, |b| b.width),
            radius: radius.into(),
        },
        ..container::Style::default()
    }
}

fn view_label(label: &LabelWidget) -> Element<'static, FormMessage> {
    container(styled_text(label.text.clone(), &label.style))
        .align_x(label.align_x.to_iced())
        .align_y(label.align_y.to_iced())
        .padding(label.padding)
        .width(Fill)
        .into()
}

fn edit(key: &str) -> impl Fn(WidgetEdit) -> FormMessage + Clone + 'static {
    let key = key.to_string();
    move |edit| FormMessage::Edit {
        key: key.clone(),
        edit,
    }
}

fn view_widget(key: &str, widget: &Widget) -> Element<'static, FormMessage> {
    let on_edit = edit(key);

    match widget {
        Widget::Label(label) => view_label(label),
        Widget::TextInput(input) => {
            let mut field = text_input("", &input.value).secure(input.secure);
            if input.editable {
                let on_edit = on_edit.clone();
                field = field.on_input(move |t| on_edit(WidgetEdit::Text(t)));
            }
            if let Some(font) = &input.style.font {
                field = field.font(font.to_iced());
            }
            if let Some(columns) = input.columns {
                // roughly one em per column
                field = field.width(f32::from(columns) * 8.0);
            }
            container(field).style(frame_style(&input.style)).into()
        }
        Widget::Spinner(spinner) => {
            let typing = on_edit.clone();
            let down = on_edit(WidgetEdit::Decrement);
            let up = on_edit(WidgetEdit::Increment);
            row![
                text_input("", &spinner.text).on_input(move |t| typing(WidgetEdit::Text(t))),
                button(text("-")).on_press(down),
                button(text("+")).on_press(up),
            ]
            .spacing(2)
            .into()
        }
        Widget::CheckBox(check) => checkbox(check.checked)
            .on_toggle(move |checked| on_edit(WidgetEdit::Toggle(checked)))
            .into(),
        Widget::DatePicker(picker) => view_date_picker(picker, on_edit),
        Widget::DropDown(drop) => {
            let select = on_edit.clone();
            let list = pick_list(drop.options.clone(), drop.selected.clone(), move |option| {
                select(WidgetEdit::Select(option))
            })
            .placeholder("Select...");
            if drop.editable {
                row![
                    text_input("", &drop.edit_text).on_input(move |t| on_edit(WidgetEdit::Text(t))),
                    list,
                ]
                .spacing(2)
                .into()
            } else {
                list.into()
            }
        }
        Widget::Button(widget) => {
            let background = widget.style.background.map(|c| Background::Color(c.to_iced()));
            let foreground = widget.style.foreground.map(|c| c.to_iced());
            button(styled_text(widget.text.clone(), &widget.style))
                .on_press(FormMessage::ButtonPressed { key: key.to_string() })
                .style(move |theme: &Theme, status| {
                    let mut style = button::primary(theme, status);
                    if background.is_some() {
                        style.background = background;
                    }
                    if let Some(color) = foreground {
                        style.text_color = color;
                    }
                    style
                })
                .into()
        }
        Widget::Form(handle) => {
            let key = key.to_string();
            match handle.try_borrow() {
                Ok(nested) => nested.view().map(move |message| FormMessage::Nested {
                    key: key.clone(),
                    message: Box::new(message),
                }),
                Err(_) => text(NO_FORM_PLACEHOLDER).into(),
            }
        }
        Widget::Table(engine) => {
            view_table(engine).map(move |message| on_edit(WidgetEdit::Cell(message)))
        }
        Widget::Titled(frame) => view_titled(key, frame),
        Widget::Custom(custom) => text(custom.value.to_display_string()).into(),
    }
}

fn view_titled(key: &str, frame: &TitledFrame) -> Element<'static, FormMessage> {
    let mut style = frame.title_style.clone();
    style.border = frame.border.or(style.border);

    let content = column![
        styled_text(frame.title.clone(), &frame.title_style),
        view_widget(key, &frame.content),
    ]
    .spacing(SPACING)
    .padding(6);

    container(content).style(frame_style(&style)).width(Fill).into()
}

fn view_date_picker(
    picker: &DatePickerWidget,
    on_edit: impl Fn(WidgetEdit) -> FormMessage + Clone + 'static,
) -> Element<'static, FormMessage> {
    let days: Vec<u32> = (1..=crate::widget::days_in_month(picker.year(), picker.month())).collect();
    let years: Vec<i32> = (picker.min_year..=picker.max_year).collect();
    let on_day = on_edit.clone();
    let on_month = on_edit.clone();

    row![
        pick_list(days, Some(picker.day()), move |d| on_day(WidgetEdit::DatePart(DatePart::Day, d as i32))),
        pick_list(MONTHS.to_vec(), Some(picker.month()), move |m| {
            on_month(WidgetEdit::DatePart(DatePart::Month, m as i32))
        }),
        pick_list(years, Some(picker.year()), move |y| on_edit(WidgetEdit::DatePart(DatePart::Year, y))),
    ]
    .spacing(2)
    .into()
}

fn view_table(engine: &TableEngine) -> Element<'static, TableMessage> {
    let grid = engine.grid();
    let width = Length::Fixed(engine.metrics().column_width);
    let row_height = engine.metrics().row_height;

    let header: Row<'static, TableMessage> = grid.columns().iter().fold(row![], |line, name| {
        line.push(
            container(text(name.clone()).font(iced::Font {
                weight: iced::font::Weight::Bold,
                ..iced::Font::default()
            }))
            .width(width),
        )
    });

    let mut body = column![header];
    for (r, cells) in grid.rows().iter().enumerate() {
        let mut line = row![];
        for (c, cell) in cells.iter().enumerate() {
            let editor: Element<'static, TableMessage> = match grid.editor(c) {
                CellEditor::Text => text_input("", &cell.to_display_string())
                    .on_input(move |value| TableMessage::CellEdited { row: r, col: c, text: value })
                    .into(),
                CellEditor::CheckBox => checkbox(cell.as_bool().unwrap_or(false))
                    .on_toggle(move |checked| TableMessage::CellToggled { row: r, col: c, checked })
                    .into(),
                CellEditor::PickList { options } => pick_list(
                    options.clone(),
                    cell.as_str().map(str::to_string),
                    move |option| TableMessage::CellSelected { row: r, col: c, option },
                )
                .into(),
            };
            line = line.push(container(editor).width(width).height(Length::Fixed(row_height.max(24.0))));
        }
        body = body.push(line);
    }

    let size = engine.preferred_size();
    scrollable(body)
        .width(Length::Fixed(size.width))
        .height(Length::Fixed(size.height))
        .into()
}
