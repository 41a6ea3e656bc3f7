//! Colour theme for the typeahead TUI.
//!
//! Themes are defined as TOML files. The default theme is embedded in the
//! binary via [`include_str!`] so the application works without any files on
//! disk. Call [`Theme::load_default`] at startup and pass the result through
//! the application as a shared reference.

use anyhow::{anyhow, Context};
use config::{Config, File, FileFormat};
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

const DEFAULT_THEME_SRC: &str = include_str!("themes/default.toml");

// ---------------------------------------------------------------------------
// Raw (serde) types — mirror the TOML structure
// ---------------------------------------------------------------------------

/// One style entry: `{ fg = "...", bg = "...", modifiers = ["bold"] }`.
#[derive(Debug, Default, Deserialize)]
struct RawStyle {
    fg: Option<String>,
    bg: Option<String>,
    #[serde(default)]
    modifiers: Vec<String>,
}

impl RawStyle {
    fn resolve(self) -> anyhow::Result<Style> {
        let color = |name: &str| {
            name.parse::<Color>().map_err(|_| anyhow!("unknown colour `{name}`"))
        };
        let mut style = Style::default();
        if let Some(fg) = &self.fg {
            style = style.fg(color(fg)?);
        }
        if let Some(bg) = &self.bg {
            style = style.bg(color(bg)?);
        }
        for name in &self.modifiers {
            let modifier = Modifier::from_name(&name.to_ascii_uppercase())
                .ok_or_else(|| anyhow!("unknown modifier `{name}`"))?;
            style = style.add_modifier(modifier);
        }
        Ok(style)
    }
}

#[derive(Debug, Deserialize)]
struct RawBorders {
    focused: RawStyle,
    unfocused: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawInput {
    text: RawStyle,
    placeholder: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawDropdown {
    section: RawStyle,
    #[serde(default)]
    item: RawStyle,
    focused: RawStyle,
    empty: RawStyle,
    divider: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    route: RawStyle,
    error: RawStyle,
    hint: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    borders: RawBorders,
    input: RawInput,
    dropdown: RawDropdown,
    status: RawStatus,
}

// ---------------------------------------------------------------------------
// Public Theme type
// ---------------------------------------------------------------------------

/// Application colour theme. All styles are pre-resolved ratatui [`Style`]
/// values.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Border of the search box while the dropdown is open.
    pub border_focused: Style,
    pub border_unfocused: Style,

    pub input_text: Style,
    pub placeholder: Style,

    /// "최근 검색어" / "추천 검색어" headings.
    pub section_label: Style,
    pub item: Style,
    /// Keyboard-highlighted suggestion.
    pub item_focused: Style,
    pub empty: Style,
    pub divider: Style,

    pub status_route: Style,
    pub status_error: Style,
    pub status_hint: Style,
}

impl Theme {
    /// Load and parse the embedded default theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_default() -> Self {
        Self::from_toml_str(DEFAULT_THEME_SRC).expect("embedded default theme must be valid TOML")
    }

    /// Parse a theme from a TOML string. Unknown keys are ignored; an
    /// unknown colour or modifier is an error.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        let raw: RawTheme = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        let style = |raw: RawStyle, slot: &str| {
            raw.resolve().with_context(|| format!("theme style `{slot}`"))
        };
        Ok(Self {
            border_focused: style(raw.borders.focused, "borders.focused")?,
            border_unfocused: style(raw.borders.unfocused, "borders.unfocused")?,
            input_text: style(raw.input.text, "input.text")?,
            placeholder: style(raw.input.placeholder, "input.placeholder")?,
            section_label: style(raw.dropdown.section, "dropdown.section")?,
            item: style(raw.dropdown.item, "dropdown.item")?,
            item_focused: style(raw.dropdown.focused, "dropdown.focused")?,
            empty: style(raw.dropdown.empty, "dropdown.empty")?,
            divider: style(raw.dropdown.divider, "dropdown.divider")?,
            status_route: style(raw.status.route, "status.route")?,
            status_error: style(raw.status.error, "status.error")?,
            status_hint: style(raw.status.hint, "status.hint")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
