use super::{Ansi256Theme, DraculaTheme, DraculaThemeHighContrast, Theme};

/// Describes a selectable theme.
#[derive(Clone, Copy, Debug)]
pub struct ThemeDefinition {
    /// Canonical identifier used in settings and `TUI_THEME`.
    pub id: &'static str,
    /// Human-friendly display name.
    pub label: &'static str,
    /// Theme aliases that map back to this definition.
    pub aliases: &'static [&'static str],
    /// Whether the palette targets ANSI/8-bit terminals.
    pub is_ansi_fallback: bool,
    factory: fn() -> Box<dyn Theme>,
}

impl ThemeDefinition {
    /// Instantiate the theme represented by this definition.
    pub fn build(&self) -> Box<dyn Theme> {
        (self.factory)()
    }
}

pub const THEME_DEFINITIONS: &[ThemeDefinition] = &[
    ThemeDefinition {
        id: "dracula",
        label: "Dracula",
        aliases: &["dracula"],
        is_ansi_fallback: false,
        factory: || Box::new(DraculaTheme::new()),
    },
    ThemeDefinition {
        id: "dracula_hc",
        label: "Dracula High Contrast",
        aliases: &["dracula_hc", "dracula-high-contrast", "dracula-hc", "draculahc"],
        is_ansi_fallback: false,
        factory: || Box::new(DraculaThemeHighContrast::new()),
    },
    ThemeDefinition {
        id: "ansi256",
        label: "ANSI 256",
        aliases: &["ansi256", "ansi", "256"],
        is_ansi_fallback: true,
        factory: || Box::new(Ansi256Theme::new()),
    },
];

/// Looks up a definition by id or alias, ignoring case.
pub fn resolve(name: &str) -> Option<&'static ThemeDefinition> {
    let name = name.to_ascii_lowercase();
    THEME_DEFINITIONS
        .iter()
        .find(|definition| definition.id == name || definition.aliases.contains(&name.as_str()))
}

pub fn default_truecolor() -> &'static ThemeDefinition {
    &THEME_DEFINITIONS[0]
}

pub fn default_ansi() -> &'static ThemeDefinition {
    &THEME_DEFINITIONS[2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_ids_and_aliases() {
        assert_eq!(resolve("DRACULA").map(|d| d.id), Some("dracula"));
        assert_eq!(resolve("dracula-high-contrast").map(|d| d.id), Some("dracula_hc"));
        assert!(resolve("solarized").is_none());
        assert!(default_ansi().is_ansi_fallback);
        assert!(!default_truecolor().is_ansi_fallback);
    }
}
