//! Running a form as an iced application

use iced::Task;

use crate::error::{FormError, FormResult};
use crate::form::{FormHandle, FormMessage};
use crate::theme::ThemePreset;

/// Window settings for [`run_form`]
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSettings {
    pub title: String,
    pub size: (f32, f32),
    pub theme: ThemePreset,
}

impl WindowSettings {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = (width, height);
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: ThemePreset) -> Self {
        self.theme = theme;
        self
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Form".to_string(),
            size: (640.0, 480.0),
            theme: ThemePreset::default(),
        }
    }
}

/// Open a window showing the form and block until it is closed.
///
/// Edits go to the widgets; call [`crate::Form::save_values`] on the handle
/// afterwards to read them.
pub fn run_form(form: FormHandle, settings: WindowSettings) -> FormResult<()> {
    let WindowSettings { title, size, theme } = settings;
    tracing::info!(title = %title, "running form");

    iced::application(
        move || (form.clone(), Task::none()),
        update,
        view,
    )
    .title(move |_: &FormHandle| title.clone())
    .theme(move |_: &FormHandle| theme.to_iced_theme())
    .window_size(size)
    .run()
    .map_err(|e| FormError::Iced(e.to_string()))
}

fn view(form: &FormHandle) -> iced::Element<'_, FormMessage> {
    form.borrow().view()
}

fn update(form: &mut FormHandle, message: FormMessage) -> Task<FormMessage> {
    match form.try_borrow_mut() {
        Ok(mut form) => {
            form.update(message);
        }
        Err(_) => tracing::warn!("form is borrowed; message dropped"),
    }
    Task::none()
}
