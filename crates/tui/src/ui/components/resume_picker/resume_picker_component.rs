use coverletter_types::RESUME_EXTENSION;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Borders, Paragraph},
};

use crate::app::{App, Effect, Modal};
use crate::ui::components::Component;
use crate::ui::theme::theme_helpers::{ButtonRenderOptions, build_hint_spans, render_button};

const BUTTON_LABEL: &str = "Choose Resume PDF";

/// Button that opens the file picker plus the chosen file's name.
#[derive(Debug, Clone, Default)]
pub struct ResumePickerComponent {
    button_area: Rect,
}

fn open_picker() -> Vec<Effect> {
    vec![Effect::ShowModal(Modal::FilePicker(vec![RESUME_EXTENSION]))]
}

impl Component for ResumePickerComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if !app.form_view.resume_picker.f_button.get() {
            return Vec::new();
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => open_picker(),
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) || !self.button_area.contains(Position::new(mouse.column, mouse.row)) {
            return Vec::new();
        }
        app.focus.focus(&app.form_view.resume_picker.f_button);
        open_picker()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let [button_area, _, label_area] = self.get_preferred_layout(app, rect)[..] else {
            return;
        };
        let theme = &*app.ctx.theme;
        let state = &app.form_view.resume_picker;
        let focused = state.f_button.get();
        let enabled = !app.form.is_busy();
        render_button(
            frame,
            button_area,
            BUTTON_LABEL,
            theme,
            ButtonRenderOptions::new(enabled, focused, false, Borders::ALL, false),
        );

        let label = match state.file_name() {
            Some(name) => Span::styled(name.to_string(), theme.selectable_file_style()),
            None => Span::styled("No file chosen", theme.text_muted_style()),
        };
        // Vertically centre the label against the bordered button.
        let label_rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(label_area);
        frame.render_widget(Paragraph::new(Line::from(label)), label_rows[1]);

        self.button_area = button_area;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        build_hint_spans(&*app.ctx.theme, &[(" Enter", " Choose resume")])
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::horizontal([
            Constraint::Length(BUTTON_LABEL.len() as u16 + 4),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(area)
        .to_vec()
    }
}
