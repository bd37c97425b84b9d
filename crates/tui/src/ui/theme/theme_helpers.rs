use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, theme.text_secondary_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Style for panel-like containers (set background on widget using `.style`).
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    Style::default().bg(surface).fg(text)
}

/// Style for input text; invalid inputs are drawn in the error color.
pub fn input_style<T: Theme + ?Sized>(theme: &T, valid: bool, focused: bool) -> Style {
    let ThemeRoles {
        surface_muted, text, error, ..
    } = *theme.roles();
    let mut style = Style::default().bg(surface_muted).fg(if valid { text } else { error });
    if focused {
        style = style.add_modifier(Modifier::BOLD);
    }
    style
}

/// Secondary button style (outline-like, rely on border color in Block).
pub fn button_secondary_style<T: Theme + ?Sized>(theme: &T, enabled: bool, selected: bool) -> Style {
    if !enabled {
        return theme.text_muted_style();
    }
    let ThemeRoles {
        accent_secondary,
        selection_bg,
        ..
    } = *theme.roles();
    let style = Style::default().fg(accent_secondary);
    if selected { style.bg(selection_bg) } else { style }
}

/// Primary button style (filled accent background).
pub fn button_primary_style<T: Theme + ?Sized>(theme: &T, enabled: bool) -> Style {
    let roles = theme.roles();
    if enabled {
        Style::default()
            .bg(roles.accent_primary)
            .fg(roles.background)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(roles.surface_muted).fg(roles.text_muted)
    }
}

/// Render flags for [`render_button`].
#[derive(Debug, Clone, Copy)]
pub struct ButtonRenderOptions {
    pub enabled: bool,
    pub focused: bool,
    pub selected: bool,
    pub borders: Borders,
    pub primary: bool,
}

impl ButtonRenderOptions {
    pub fn new(enabled: bool, focused: bool, selected: bool, borders: Borders, primary: bool) -> Self {
        Self {
            enabled,
            focused,
            selected,
            borders,
            primary,
        }
    }
}

/// Renders a standard button
pub fn render_button<T: Theme + ?Sized>(frame: &mut Frame, area: Rect, label: &str, theme: &T, options: ButtonRenderOptions) {
    let border_style = if options.enabled {
        theme.border_style(options.focused)
    } else {
        theme.text_muted_style()
    };

    let button_style = if options.primary {
        button_primary_style(theme, options.enabled)
    } else {
        button_secondary_style(theme, options.enabled, options.selected)
    };

    // Unbordered buttons get padding so they match the bordered height.
    let padding = if options.borders.is_empty() {
        Padding::uniform(1)
    } else {
        Padding::uniform(0)
    };

    frame.render_widget(
        Paragraph::new(label)
            .centered()
            .block(
                Block::bordered()
                    .borders(options.borders)
                    .border_style(border_style)
                    .padding(padding),
            )
            .style(button_style),
        area,
    );
}

/// Builds `key description` pairs for the hint bar.
pub fn build_hint_spans<T: Theme + ?Sized>(theme: &T, hints: &[(&str, &str)]) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, description) in hints {
        spans.push(Span::styled(key.to_string(), theme.accent_emphasis_style()));
        spans.push(Span::styled(description.to_string(), theme.text_muted_style()));
    }
    spans
}
