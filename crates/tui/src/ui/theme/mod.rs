//! Theme styling module for the TUI UI layer.
//!
//! Defines the Dracula palettes, an ANSI 256-color fallback, semantic theme
//! roles, and helper builders for Ratatui widgets. Prefer these helpers over
//! hard-coding colors.

use std::env;

use tracing::debug;

pub mod ansi256;
pub mod catalog;
pub mod dracula;
pub mod roles;
pub mod theme_helpers;

pub use ansi256::Ansi256Theme;
pub use catalog::ThemeDefinition;
pub use dracula::{DraculaTheme, DraculaThemeHighContrast};
pub use roles::Theme;

/// Theme plus the definition it was built from.
pub struct LoadedTheme {
    pub definition: &'static ThemeDefinition,
    pub theme: Box<dyn Theme>,
}

impl LoadedTheme {
    fn from_definition(definition: &'static ThemeDefinition) -> Self {
        Self {
            definition,
            theme: definition.build(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorCapability {
    Truecolor,
    Ansi256,
}

/// Selects a theme from `TUI_THEME`, the settings file, and terminal capabilities.
pub fn load(preferred_theme: Option<&str>) -> LoadedTheme {
    if matches!(detect_color_capability(), ColorCapability::Ansi256) {
        debug!("ANSI-only terminal detected; using the fallback palette");
        return LoadedTheme::from_definition(catalog::default_ansi());
    }

    if let Ok(theme_name) = env::var("TUI_THEME")
        && let Some(definition) = catalog::resolve(theme_name.trim())
    {
        return LoadedTheme::from_definition(definition);
    }

    if let Some(name) = preferred_theme
        && let Some(definition) = catalog::resolve(name.trim())
    {
        return LoadedTheme::from_definition(definition);
    }

    LoadedTheme::from_definition(catalog::default_truecolor())
}

fn detect_color_capability() -> ColorCapability {
    if let Some(mode) = env::var("TUI_COLOR_MODE").ok().and_then(|value| parse_color_mode(value.trim())) {
        return mode;
    }

    if env::var("TUI_FORCE_TRUECOLOR").ok().is_some_and(|value| is_truthy(value.trim())) {
        return ColorCapability::Truecolor;
    }

    let color_term = env::var("COLORTERM").unwrap_or_default().to_ascii_lowercase();
    if color_term.contains("truecolor") || color_term.contains("24bit") {
        return ColorCapability::Truecolor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term.contains("truecolor") {
        return ColorCapability::Truecolor;
    }

    ColorCapability::Ansi256
}

fn parse_color_mode(value: &str) -> Option<ColorCapability> {
    match value.to_ascii_lowercase().as_str() {
        "truecolor" | "24bit" => Some(ColorCapability::Truecolor),
        "ansi256" | "256" | "8bit" => Some(ColorCapability::Ansi256),
        _ => None,
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_theme_beats_the_settings_file() {
        temp_env::with_vars(
            [
                ("TUI_COLOR_MODE", Some("truecolor")),
                ("TUI_THEME", Some("dracula_hc")),
            ],
            || {
                assert_eq!(load(Some("dracula")).definition.id, "dracula_hc");
            },
        );
    }

    #[test]
    fn settings_theme_applies_without_env_override() {
        temp_env::with_vars([("TUI_COLOR_MODE", Some("24bit")), ("TUI_THEME", None)], || {
            assert_eq!(load(Some("dracula-hc")).definition.id, "dracula_hc");
            assert_eq!(load(Some("unknown")).definition.id, "dracula");
        });
    }

    #[test]
    fn ansi_terminals_force_the_fallback() {
        temp_env::with_vars([("TUI_COLOR_MODE", Some("256")), ("TUI_THEME", Some("dracula"))], || {
            assert!(load(None).definition.is_ansi_fallback);
        });
    }
}
