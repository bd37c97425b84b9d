//! Indexed-color palette for terminals that only speak 256 colors.
//!
//! `load` picks this theme when `COLORTERM` does not advertise truecolor
//! (or `TUI_COLOR_MODE=256` forces it). The picks below are the nearest
//! xterm cube/grayscale slots to the Dracula hues used by the form.

use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

const GRAY_DARK: Color = Color::Indexed(236);
const GRAY_LINE: Color = Color::Indexed(239);
const GRAY_MID: Color = Color::Indexed(247);
const GRAY_LIGHT: Color = Color::Indexed(250);
const WHITE: Color = Color::Indexed(255);
const BLACK_OVERLAY: Color = Color::Indexed(232);

const PINK: Color = Color::Indexed(212);
const SKY: Color = Color::Indexed(117);
const MINT: Color = Color::Indexed(84);
const SALMON: Color = Color::Indexed(203);
const PALE_YELLOW: Color = Color::Indexed(229);

#[derive(Debug, Clone)]
pub struct Ansi256Theme {
    roles: ThemeRoles,
}

impl Ansi256Theme {
    pub fn new() -> Self {
        let roles = ThemeRoles {
            background: GRAY_DARK,
            surface: GRAY_DARK,
            surface_muted: GRAY_LINE,
            border: GRAY_LINE,
            text: WHITE,
            text_secondary: GRAY_LIGHT,
            text_muted: GRAY_MID,
            accent_primary: PINK,
            accent_secondary: SKY,
            info: SKY,
            success: MINT,
            error: SALMON,
            selection_bg: GRAY_LINE,
            selection_fg: WHITE,
            focus: SKY,
            directory: PINK,
            selectable_file: PALE_YELLOW,
            modal_bg: BLACK_OVERLAY,
        };
        Self { roles }
    }
}

impl Theme for Ansi256Theme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}
