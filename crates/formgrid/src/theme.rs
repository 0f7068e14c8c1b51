//! Look-and-feel properties for formgrid widgets
//!
//! The engine never paints anything itself. It reads theme defaults by string
//! key, following the `"<Component>.<property>[.paint]"` schema (for example
//! `Button.foreground.paint` or `TitledBorder.font`), and lets per-field
//! overrides win whenever they are set.
//!
//! [`ThemeProperties`] is the stock [`LookAndFeel`]: a flat property table
//! seeded from one of iced's built-in palettes and optionally patched from a
//! TOML file.

use std::collections::HashMap;
use std::path::Path;

use iced::Theme;
use serde::{Deserialize, Serialize};

use crate::error::{FormError, FormResult};

/// Component class names used as the first segment of property keys
pub mod component {
    pub const LABEL: &str = "Label";
    pub const TITLED_BORDER: &str = "TitledBorder";
    pub const BUTTON: &str = "Button";
    pub const TEXT_FIELD: &str = "TextField";
    pub const PASSWORD_FIELD: &str = "PasswordField";
    pub const SPINNER: &str = "Spinner";
    pub const CHECK_BOX: &str = "CheckBox";
    pub const COMBO_BOX: &str = "ComboBox";
    pub const DATE_PICKER: &str = "DatePicker";
    pub const TABLE: &str = "Table";

    /// Every component the stock theme defines properties for
    pub const ALL: &[&str] = &[
        LABEL,
        TITLED_BORDER,
        BUTTON,
        TEXT_FIELD,
        PASSWORD_FIELD,
        SPINNER,
        CHECK_BOX,
        COMBO_BOX,
        DATE_PICKER,
        TABLE,
    ];
}

/// A color in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
    /// Alpha component (0-255, 255 = opaque)
    pub a: u8,
}

impl Color {
    /// Create a new color from RGBA values
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new color from RGB values (alpha = 255)
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color from a hex string (e.g., "#FF5733" or "FF5733")
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Format as `#RRGGBB`, or `#RRGGBBAA` when not opaque
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Same color with a different alpha
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Convert to iced Color
    #[must_use]
    pub fn to_iced(self) -> iced::Color {
        iced::Color::from_rgba8(self.r, self.g, self.b, f32::from(self.a) / 255.0)
    }

    /// Create from iced Color
    #[must_use]
    pub fn from_iced(color: iced::Color) -> Self {
        Self {
            r: (color.r * 255.0) as u8,
            g: (color.g * 255.0) as u8,
            b: (color.b * 255.0) as u8,
            a: (color.a * 255.0) as u8,
        }
    }

    /// Black color
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// White color
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Transparent color
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid hex color '{value}'"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Font request: family, size and weight
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontSpec {
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub size: Option<f32>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl FontSpec {
    #[must_use]
    pub fn sized(size: f32) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn family(family: impl Into<String>) -> Self {
        Self {
            family: Some(family.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Convert to an iced font.
    ///
    /// Named families are resolved by the font loader when the field is built;
    /// at render time only the generic monospace family is distinguished.
    #[must_use]
    pub fn to_iced(&self) -> iced::Font {
        let base = match self.family.as_deref() {
            Some("monospace") => iced::Font::MONOSPACE,
            _ => iced::Font::DEFAULT,
        };
        iced::Font {
            weight: if self.bold {
                iced::font::Weight::Bold
            } else {
                iced::font::Weight::Normal
            },
            style: if self.italic {
                iced::font::Style::Italic
            } else {
                iced::font::Style::Normal
            },
            ..base
        }
    }
}

/// Border drawn around a widget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BorderSpec {
    pub color: Color,
    pub width: f32,
}

impl BorderSpec {
    #[must_use]
    pub const fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

/// Outline shape of a widget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Shape {
    pub corner_radius: f32,
}

impl Shape {
    #[must_use]
    pub const fn rounded(corner_radius: f32) -> Self {
        Self { corner_radius }
    }
}

/// A single theme property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeValue {
    Paint(Color),
    Border(BorderSpec),
    Shape(Shape),
    Font(FontSpec),
}

/// Read-only theme lookup by property key
pub trait LookAndFeel {
    /// Raw property lookup
    fn property(&self, key: &str) -> Option<&ThemeValue>;

    fn paint(&self, key: &str) -> Option<Color> {
        match self.property(key) {
            Some(ThemeValue::Paint(color)) => Some(*color),
            _ => None,
        }
    }

    fn font(&self, key: &str) -> Option<FontSpec> {
        match self.property(key) {
            Some(ThemeValue::Font(font)) => Some(font.clone()),
            _ => None,
        }
    }

    fn border(&self, key: &str) -> Option<BorderSpec> {
        match self.property(key) {
            Some(ThemeValue::Border(border)) => Some(*border),
            _ => None,
        }
    }

    fn shape(&self, key: &str) -> Option<Shape> {
        match self.property(key) {
            Some(ThemeValue::Shape(shape)) => Some(*shape),
            _ => None,
        }
    }
}

/// Key of a plain property, e.g. `TitledBorder.font`
#[must_use]
pub fn property_key(component: &str, property: &str) -> String {
    format!("{component}.{property}")
}

/// Key of a paint property, e.g. `Button.foreground.paint`
#[must_use]
pub fn paint_key(component: &str, state: &str) -> String {
    format!("{component}.{state}.paint")
}

/// Built-in theme presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemePreset {
    Light,
    #[default]
    Dark,
    Dracula,
    Nord,
    SolarizedLight,
    SolarizedDark,
}

impl ThemePreset {
    /// Parse a preset from a string name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('-', "_").as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "dracula" => Some(Self::Dracula),
            "nord" => Some(Self::Nord),
            "solarized_light" => Some(Self::SolarizedLight),
            "solarized_dark" => Some(Self::SolarizedDark),
            _ => None,
        }
    }

    /// Convert to iced Theme
    #[must_use]
    pub fn to_iced_theme(self) -> Theme {
        match self {
            Self::Light => Theme::Light,
            Self::Dark => Theme::Dark,
            Self::Dracula => Theme::Dracula,
            Self::Nord => Theme::Nord,
            Self::SolarizedLight => Theme::SolarizedLight,
            Self::SolarizedDark => Theme::SolarizedDark,
        }
    }
}

/// Stock look-and-feel: a flat table of theme properties
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeProperties {
    properties: HashMap<String, ThemeValue>,
}

impl ThemeProperties {
    /// An empty table; every lookup misses
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Defaults derived from an iced preset palette
    #[must_use]
    pub fn from_preset(preset: ThemePreset) -> Self {
        let palette = preset.to_iced_theme().palette();
        let background = Color::from_iced(palette.background);
        let text = Color::from_iced(palette.text);
        let primary = Color::from_iced(palette.primary);
        let success = Color::from_iced(palette.success);

        let mut theme = Self::empty();
        for name in component::ALL {
            theme.set(paint_key(name, "foreground"), ThemeValue::Paint(text));
            theme.set(paint_key(name, "background"), ThemeValue::Paint(background));
            theme.set(paint_key(name, "focus"), ThemeValue::Paint(primary));
            theme.set(
                paint_key(name, "disabled"),
                ThemeValue::Paint(text.with_alpha(128)),
            );
            theme.set(property_key(name, "font"), ThemeValue::Font(FontSpec::sized(14.0)));
        }

        theme.set(
            paint_key(component::BUTTON, "background"),
            ThemeValue::Paint(primary),
        );
        theme.set(
            paint_key(component::BUTTON, "foreground"),
            ThemeValue::Paint(background),
        );
        theme.set(
            paint_key(component::BUTTON, "select"),
            ThemeValue::Paint(success),
        );
        theme.set(
            property_key(component::BUTTON, "shape"),
            ThemeValue::Shape(Shape::rounded(4.0)),
        );
        theme.set(
            property_key(component::TITLED_BORDER, "font"),
            ThemeValue::Font(FontSpec::sized(12.0).bold()),
        );
        theme.set(
            property_key(component::TITLED_BORDER, "border"),
            ThemeValue::Border(BorderSpec::new(text.with_alpha(96), 1.0)),
        );
        theme.set(
            property_key(component::TABLE, "border"),
            ThemeValue::Border(BorderSpec::new(text.with_alpha(64), 1.0)),
        );
        theme
    }

    /// Parse a property file: a flat TOML table keyed by property key.
    ///
    /// ```toml
    /// "Button.foreground.paint" = "#FFFFFF"
    /// "TitledBorder.font" = { size = 13.0, bold = true }
    /// "Table.border" = { color = "#333333", width = 1.0 }
    /// ```
    pub fn from_toml_str(source: &str) -> FormResult<Self> {
        let properties: HashMap<String, ThemeValue> =
            toml::from_str(source).map_err(|e| FormError::Config(e.to_string()))?;
        Ok(Self { properties })
    }

    /// Load a property file from disk
    pub fn load(path: &Path) -> FormResult<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| FormError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Overlay another table; its properties win
    pub fn merge(&mut self, other: &ThemeProperties) {
        for (key, value) in &other.properties {
            self.properties.insert(key.clone(), value.clone());
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: ThemeValue) {
        self.properties.insert(key.into(), value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl LookAndFeel for ThemeProperties {
    fn property(&self, key: &str) -> Option<&ThemeValue> {
        self.properties.get(key)
    }
}

/// Styling of one widget: per-field overrides or the resolved result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetStyle {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub focus: Option<Color>,
    pub select: Option<Color>,
    pub disabled: Option<Color>,
    pub font: Option<FontSpec>,
    pub border: Option<BorderSpec>,
    pub shape: Option<Shape>,
}

impl WidgetStyle {
    /// Create a new empty widget style
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill every unset property from the theme defaults of `component`.
    ///
    /// Properties already set on `self` take precedence.
    #[must_use]
    pub fn resolve(&self, component: &str, laf: &dyn LookAndFeel) -> WidgetStyle {
        WidgetStyle {
            foreground: self
                .foreground
                .or_else(|| laf.paint(&paint_key(component, "foreground"))),
            background: self
                .background
                .or_else(|| laf.paint(&paint_key(component, "background"))),
            focus: self.focus.or_else(|| laf.paint(&paint_key(component, "focus"))),
            select: self
                .select
                .or_else(|| laf.paint(&paint_key(component, "select"))),
            disabled: self
                .disabled
                .or_else(|| laf.paint(&paint_key(component, "disabled"))),
            font: self
                .font
                .clone()
                .or_else(|| laf.font(&property_key(component, "font"))),
            border: self
                .border
                .or_else(|| laf.border(&property_key(component, "border"))),
            shape: self
                .shape
                .or_else(|| laf.shape(&property_key(component, "shape"))),
        }
    }

    /// Check if any styling is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
