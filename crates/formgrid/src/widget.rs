//! Live widget state materialized from field descriptors
//!
//! [`Widget`] is a closed set of widget kinds. Descriptors extract values by
//! matching on the kind they produce and return `Value::Null` for any other
//! kind, so a mismatched widget never aborts a save.

use chrono::{Datelike, NaiveDate};
use iced::Padding;

use crate::action::ActionId;
use crate::form::FormHandle;
use crate::layout::{HAlign, VAlign};
use crate::table::{TableEngine, TableMessage};
use crate::theme::{BorderSpec, WidgetStyle};
use crate::value::{Number, Value};

/// A materialized widget
#[derive(Debug, Clone)]
pub enum Widget {
    Label(LabelWidget),
    TextInput(TextInputWidget),
    Spinner(SpinnerWidget),
    CheckBox(CheckBoxWidget),
    DatePicker(DatePickerWidget),
    DropDown(DropDownWidget),
    Button(ButtonWidget),
    /// A nested form shown in place
    Form(FormHandle),
    Table(Box<TableEngine>),
    /// Another widget wrapped in a titled border
    Titled(TitledFrame),
    Custom(CustomWidget),
}

impl Widget {
    /// Kind name used in logs
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Label(_) => "label",
            Self::TextInput(_) => "text_input",
            Self::Spinner(_) => "spinner",
            Self::CheckBox(_) => "check_box",
            Self::DatePicker(_) => "date_picker",
            Self::DropDown(_) => "drop_down",
            Self::Button(_) => "button",
            Self::Form(_) => "form",
            Self::Table(_) => "table",
            Self::Titled(_) => "titled",
            Self::Custom(_) => "custom",
        }
    }

    /// The widget inside any titled frames
    #[must_use]
    pub fn content(&self) -> &Widget {
        match self {
            Self::Titled(frame) => frame.content.content(),
            other => other,
        }
    }

    pub fn content_mut(&mut self) -> &mut Widget {
        match self {
            Self::Titled(frame) => frame.content.content_mut(),
            other => other,
        }
    }

    /// Apply a user edit. Returns `false` when the edit does not fit the
    /// widget kind or changes nothing.
    pub fn apply(&mut self, edit: WidgetEdit) -> bool {
        match (self.content_mut(), edit) {
            (Self::TextInput(input), WidgetEdit::Text(text)) if input.editable => {
                input.value = text;
                true
            }
            (Self::Spinner(spinner), WidgetEdit::Text(text)) => spinner.set_text(text),
            (Self::Spinner(spinner), WidgetEdit::Increment) => {
                spinner.step_by(true);
                true
            }
            (Self::Spinner(spinner), WidgetEdit::Decrement) => {
                spinner.step_by(false);
                true
            }
            (Self::CheckBox(check), WidgetEdit::Toggle(checked)) => {
                check.checked = checked;
                true
            }
            (Self::DropDown(drop), WidgetEdit::Select(option)) => drop.select(option),
            (Self::DropDown(drop), WidgetEdit::Text(text)) if drop.editable => {
                drop.edit_text = text;
                true
            }
            (Self::DatePicker(picker), WidgetEdit::DatePart(part, value)) => {
                picker.set_part(part, value);
                true
            }
            (Self::Table(engine), WidgetEdit::Cell(message)) => engine.update(message),
            (Self::Custom(custom), WidgetEdit::Replace(text)) => {
                custom.value = custom.value.parse_like(&text);
                true
            }
            (widget, edit) => {
                tracing::debug!(widget = widget.kind_name(), ?edit, "edit ignored");
                false
            }
        }
    }
}

/// A user edit addressed to one widget
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEdit {
    /// New text for text inputs, spinners and editable drop-downs
    Text(String),
    Toggle(bool),
    Select(String),
    Increment,
    Decrement,
    DatePart(DatePart, i32),
    Cell(TableMessage),
    /// New text for a custom widget, parsed like the value it holds
    Replace(String),
}

/// Read-only text
#[derive(Debug, Clone, PartialEq)]
pub struct LabelWidget {
    pub text: String,
    pub style: WidgetStyle,
    pub align_x: HAlign,
    pub align_y: VAlign,
    pub padding: Padding,
}

impl LabelWidget {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: WidgetStyle::default(),
            align_x: HAlign::Start,
            align_y: VAlign::Center,
            padding: Padding::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextInputWidget {
    pub value: String,
    /// Mask the input
    pub secure: bool,
    pub editable: bool,
    /// Preferred width in characters; `None` sizes to the content
    pub columns: Option<u16>,
    pub style: WidgetStyle,
}

/// Numeric entry with step buttons
#[derive(Debug, Clone, PartialEq)]
pub struct SpinnerWidget {
    pub value: Number,
    pub min: Option<Number>,
    pub max: Option<Number>,
    pub step: Number,
    /// Text being typed; may not parse yet
    pub text: String,
    pub style: WidgetStyle,
}

impl SpinnerWidget {
    #[must_use]
    pub fn new(value: Number, step: Number, min: Option<Number>, max: Option<Number>) -> Self {
        Self {
            value,
            min,
            max,
            step,
            text: value.to_string(),
            style: WidgetStyle::default(),
        }
    }

    fn step_by(&mut self, up: bool) {
        let next = if up {
            self.value.increment(self.step)
        } else {
            self.value.decrement(self.step)
        };
        self.value = next.clamp_to(self.min, self.max);
        self.text = self.value.to_string();
    }

    fn set_text(&mut self, text: String) -> bool {
        if let Some(parsed) = self.value.parse_like(&text) {
            self.value = parsed.clamp_to(self.min, self.max);
        }
        self.text = text;
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckBoxWidget {
    pub checked: bool,
    pub style: WidgetStyle,
}

/// Part of a date edited by a [`DatePickerWidget`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

/// Composite day/month/year entry bounded by an inclusive year range
#[derive(Debug, Clone, PartialEq)]
pub struct DatePickerWidget {
    year: i32,
    month: u32,
    day: u32,
    pub min_year: i32,
    pub max_year: i32,
    pub style: WidgetStyle,
}

impl DatePickerWidget {
    /// Picker showing `date`, its year clamped into `[min_year, max_year]`
    #[must_use]
    pub fn new(date: NaiveDate, min_year: i32, max_year: i32) -> Self {
        let (min_year, max_year) = if min_year <= max_year {
            (min_year, max_year)
        } else {
            (max_year, min_year)
        };
        let (first, last) = (NaiveDate::MIN.year(), NaiveDate::MAX.year());
        let (min_year, max_year) = (min_year.clamp(first, last), max_year.clamp(first, last));
        let mut picker = Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            min_year,
            max_year,
            style: WidgetStyle::default(),
        };
        picker.set_part(DatePart::Year, date.year());
        picker
    }

    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Set one part; the result is always a valid date within the year range
    pub fn set_part(&mut self, part: DatePart, value: i32) {
        match part {
            DatePart::Year => self.year = value.clamp(self.min_year, self.max_year),
            DatePart::Month => self.month = value.clamp(1, 12) as u32,
            DatePart::Day => self.day = value.max(1) as u32,
        }
        self.day = self.day.clamp(1, days_in_month(self.year, self.month));
    }
}

/// Number of days in a month of the proleptic Gregorian calendar
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month >= 12 {
        year.checked_add(1).map(|y| (y, 1))
    } else {
        Some((year, month + 1))
    };
    next.and_then(|(y, m)| NaiveDate::from_ymd_opt(y, m, 1))
        .and_then(|d| d.pred_opt())
        .map_or(31, |d| d.day())
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropDownWidget {
    pub options: Vec<String>,
    pub selected: Option<String>,
    /// Free text entry allowed besides the options
    pub editable: bool,
    pub edit_text: String,
    pub style: WidgetStyle,
}

impl DropDownWidget {
    fn select(&mut self, option: String) -> bool {
        if !self.editable && !self.options.contains(&option) {
            return false;
        }
        self.edit_text.clone_from(&option);
        self.selected = Some(option);
        true
    }

    /// Current value: typed text for editable drop-downs, else the selection
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        if self.editable {
            Some(&self.edit_text)
        } else {
            self.selected.as_deref()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonWidget {
    pub text: String,
    pub action: Option<ActionId>,
    pub style: WidgetStyle,
}

/// A widget inside a border titled with the field key
#[derive(Debug, Clone)]
pub struct TitledFrame {
    pub title: String,
    pub title_style: WidgetStyle,
    pub border: Option<BorderSpec>,
    pub content: Box<Widget>,
}

/// State of a caller-defined widget
#[derive(Debug, Clone, PartialEq)]
pub struct CustomWidget {
    pub tag: String,
    pub value: Value,
}
