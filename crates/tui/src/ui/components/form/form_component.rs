//! The submission form: mode toggle, contact grid, letter body, resume
//! trigger, and the generate button.
//!
//! Every edit is mirrored into [`SubmissionForm`](coverletter_engine::SubmissionForm)
//! immediately, so the engine always holds exactly what is on screen.

use coverletter_engine::FieldName;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Borders, Paragraph},
};
use tracing::debug;

use super::state::FieldInput;
use crate::app::{App, Effect};
use crate::ui::components::{Component, ResumePickerComponent};
use crate::ui::theme::theme_helpers::{ButtonRenderOptions, block, build_hint_spans, input_style, render_button};

const TITLE: &str = "AI Cover Letter Generator";
const TOGGLE_LABEL: &str = "Use AI to Generate Cover Letter";
const SUBMIT_LABEL: &str = "Generate Cover Letter";
const SUBMITTING_LABEL: &str = "Generating...";

fn placeholder(field: FieldName) -> &'static str {
    match field {
        FieldName::Name => "Your Name",
        FieldName::Email => "Your Email",
        FieldName::Phone => "Phone Number",
        FieldName::Linkedin => "LinkedIn URL (optional)",
        FieldName::Github => "GitHub URL (optional)",
        FieldName::Portfolio => "Portfolio URL (optional)",
        FieldName::Employer => "Employer Name",
        FieldName::JobTitle => "Job Title",
        FieldName::CustomContent => "Paste your custom cover letter content here",
        FieldName::JobDescription => "Paste the Job Description here (no word limit)",
    }
}

/// The body inputs are always required for the active mode.
fn is_required(field: FieldName) -> bool {
    field.is_required_contact() || field.is_multiline()
}

/// Hit-test rectangles captured during the last render.
#[derive(Debug, Clone, Default)]
struct FormLayout {
    toggle_area: Rect,
    field_areas: Vec<(FieldName, Rect)>,
    resume_area: Rect,
    submit_area: Rect,
}

#[derive(Debug, Default)]
pub struct FormComponent {
    layout: FormLayout,
    resume_picker: ResumePickerComponent,
}

impl FormComponent {
    fn focused_input(app: &App) -> Option<&FieldInput> {
        app.form_view.inputs().iter().find(|input| input.focus.get())
    }

    /// Applies `edit` to the focused input and copies the result into the form.
    fn edit_focused_input(app: &mut App, edit: impl FnOnce(&mut FieldInput)) -> bool {
        let Some(input) = app.form_view.focused_input_mut() else {
            return false;
        };
        edit(input);
        let field = input.field;
        let value = input.input.input().to_string();
        app.form.set_field(field, value);
        true
    }

    /// The generate button is disabled while a request is in flight.
    fn submit_effects(app: &App) -> Vec<Effect> {
        if app.form.is_busy() {
            debug!("submit ignored while a request is in flight");
            return Vec::new();
        }
        vec![Effect::SubmitRequested]
    }

    fn handle_input_key(app: &mut App, key: KeyEvent, multiline: bool) -> Vec<Effect> {
        match key.code {
            KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
                Self::edit_focused_input(app, |input| input.input.insert_char(c));
            }
            KeyCode::Enter if multiline => {
                Self::edit_focused_input(app, |input| input.input.insert_char('\n'));
            }
            KeyCode::Enter => return Self::submit_effects(app),
            KeyCode::Backspace => {
                Self::edit_focused_input(app, |input| input.input.backspace());
            }
            KeyCode::Delete => {
                Self::edit_focused_input(app, |input| input.input.delete());
            }
            KeyCode::Left => {
                Self::edit_focused_input(app, |input| input.input.move_left());
            }
            KeyCode::Right => {
                Self::edit_focused_input(app, |input| input.input.move_right());
            }
            KeyCode::Home => {
                Self::edit_focused_input(app, |input| input.input.move_home());
            }
            KeyCode::End => {
                Self::edit_focused_input(app, |input| input.input.move_end());
            }
            KeyCode::Up if multiline => {
                Self::edit_focused_input(app, |input| input.input.move_up());
            }
            KeyCode::Down if multiline => {
                Self::edit_focused_input(app, |input| input.input.move_down());
            }
            KeyCode::Up => {
                app.focus.prev();
            }
            KeyCode::Down => {
                app.focus.next();
            }
            _ => {}
        }
        Vec::new()
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let line = Line::from(vec![
            Span::styled("POST ", theme.text_muted_style()),
            Span::styled(app.ctx.endpoint.clone(), theme.text_secondary_style()),
            Span::styled("  saving to ", theme.text_muted_style()),
            Span::styled(app.ctx.output_dir.display().to_string(), theme.text_secondary_style()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_toggle(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let focused = app.form_view.f_mode_toggle.get();
        let checkbox = if app.form.mode().is_ai() { "[x] " } else { "[ ] " };
        let label_style = if focused {
            theme.selection_style().add_modifier(Modifier::BOLD)
        } else {
            theme.text_primary_style()
        };
        let line = Line::from(vec![
            Span::styled(checkbox, theme.accent_primary_style()),
            Span::styled(TOGGLE_LABEL, label_style),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_error(&self, frame: &mut Frame, area: Rect, app: &App) {
        let Some(message) = app.error_message() else {
            return;
        };
        let theme = &*app.ctx.theme;
        let line = Line::from(vec![
            Span::styled("Error! ", theme.status_error().add_modifier(Modifier::BOLD)),
            Span::styled(message, theme.status_error()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    /// Renders a label row plus a single-line input row.
    fn render_single_line(&self, frame: &mut Frame, area: Rect, input: &FieldInput, app: &App) {
        let theme = &*app.ctx.theme;
        let focused = input.focus.get();
        let [label_area, input_area] = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

        let label_style = if focused {
            theme.accent_primary_style().add_modifier(Modifier::BOLD)
        } else {
            theme.text_secondary_style()
        };
        let mut label = vec![Span::styled(input.field.label(), label_style)];
        if is_required(input.field) {
            label.push(Span::styled(" *", theme.status_error()));
        }
        frame.render_widget(Paragraph::new(Line::from(label)), label_area);

        let state = &input.input;
        let style = input_style(theme, true, focused);
        let content = if state.is_empty() {
            Span::styled(placeholder(input.field), style.fg(theme.roles().text_muted))
        } else {
            Span::raw(state.input().to_string())
        };
        let width = input_area.width.saturating_sub(1) as usize;
        let offset = state.cursor_columns().saturating_sub(width) as u16;
        frame.render_widget(Paragraph::new(Line::from(content)).style(style).scroll((0, offset)), input_area);

        if focused {
            let x = input_area.x + (state.cursor_columns() as u16).saturating_sub(offset);
            frame.set_cursor_position((x, input_area.y));
        }
    }

    /// Renders the letter body as a bordered, scrolling text area.
    fn render_multiline(&self, frame: &mut Frame, area: Rect, input: &FieldInput, app: &App) {
        let theme = &*app.ctx.theme;
        let focused = input.focus.get();
        let title = format!("{} *", input.field.label());
        let block = block(theme, Some(&title), focused);
        let inner = block.inner(area);
        let state = &input.input;

        let paragraph = if state.is_empty() {
            Paragraph::new(Span::styled(placeholder(input.field), theme.text_muted_style()))
        } else {
            Paragraph::new(state.input().to_string()).style(theme.text_primary_style())
        };
        let visible_rows = inner.height.max(1) as usize;
        let row_offset = state.cursor_line().saturating_sub(visible_rows - 1) as u16;
        let col_offset = state.cursor_columns().saturating_sub(inner.width.saturating_sub(1) as usize) as u16;
        frame.render_widget(paragraph.block(block).scroll((row_offset, col_offset)), area);

        if focused {
            let x = inner.x + (state.cursor_columns() as u16).saturating_sub(col_offset);
            let y = inner.y + (state.cursor_line() as u16).saturating_sub(row_offset);
            frame.set_cursor_position((x, y));
        }
    }

    fn render_submit(&self, frame: &mut Frame, area: Rect, app: &App) {
        let busy = app.form.is_busy();
        let label = if busy {
            format!("{} {SUBMITTING_LABEL}", app.throbber())
        } else {
            SUBMIT_LABEL.to_string()
        };
        let focused = app.form_view.f_submit.get();
        let options = ButtonRenderOptions::new(!busy, focused, false, Borders::ALL, true);
        render_button(frame, area, &label, &*app.ctx.theme, options);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let line = if app.form.is_busy() {
            Line::from(Span::styled("Waiting for the generation service...", theme.status_info()))
        } else if let Some(path) = app.form.last_delivery() {
            Line::from(vec![
                Span::styled("Saved to ", theme.status_success()),
                Span::styled(path.display().to_string(), theme.text_primary_style()),
            ])
        } else {
            return;
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

impl Component for FormComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('g') {
            return Self::submit_effects(app);
        }
        match key.code {
            KeyCode::Tab => {
                app.focus.next();
                return Vec::new();
            }
            KeyCode::BackTab => {
                app.focus.prev();
                return Vec::new();
            }
            _ => {}
        }

        if let Some(multiline) = Self::focused_input(app).map(|input| input.field.is_multiline()) {
            return Self::handle_input_key(app, key, multiline);
        }

        if app.form_view.resume_picker.f_button.get() {
            let effects = self.resume_picker.handle_key_events(app, key);
            if !effects.is_empty() {
                return effects;
            }
        }

        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') if app.form_view.f_mode_toggle.get() => vec![Effect::ToggleMode],
            KeyCode::Enter | KeyCode::Char(' ') if app.form_view.f_submit.get() => Self::submit_effects(app),
            KeyCode::Up | KeyCode::Left => {
                app.focus.prev();
                Vec::new()
            }
            KeyCode::Down | KeyCode::Right => {
                app.focus.next();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let pos = Position::new(mouse.column, mouse.row);

        if self.layout.toggle_area.contains(pos) {
            app.focus.focus(&app.form_view.f_mode_toggle);
            return vec![Effect::ToggleMode];
        }
        if self.layout.submit_area.contains(pos) {
            app.focus.focus(&app.form_view.f_submit);
            return Self::submit_effects(app);
        }
        if app.form.mode().is_ai() && self.layout.resume_area.contains(pos) {
            return self.resume_picker.handle_mouse_events(app, mouse);
        }

        let Some((field, area)) = self.layout.field_areas.iter().copied().find(|(_, area)| area.contains(pos)) else {
            return Vec::new();
        };
        if let Some(input) = app.form_view.input(field) {
            app.focus.focus(&input.focus);
        }
        if !field.is_multiline()
            && let Some(input) = app.form_view.input_mut(field)
        {
            // The input row sits below the label row.
            if pos.y > area.y {
                let index = input.input.cursor_index_for_column(pos.x.saturating_sub(area.x));
                input.input.set_cursor(index);
            }
        }
        Vec::new()
    }

    fn handle_paste(&mut self, app: &mut App, text: &str) -> Vec<Effect> {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        Self::edit_focused_input(app, |input| {
            if input.field.is_multiline() {
                input.input.insert_str(&text);
            } else {
                input.input.insert_str(&text.replace('\n', " "));
            }
        });
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let outer = block(&*app.ctx.theme, Some(TITLE), false);
        let inner = outer.inner(rect);
        frame.render_widget(outer, rect);

        let areas = self.get_preferred_layout(app, inner);
        let [header, toggle, error, grid, body, resume, submit, status] = areas[..] else {
            return;
        };

        self.render_header(frame, header, app);
        self.render_toggle(frame, toggle, app);
        self.render_error(frame, error, app);

        let mut field_areas = Vec::new();
        let rows = Layout::vertical([Constraint::Length(2); 4]).spacing(0).split(grid);
        let contact: Vec<&FieldInput> = app.form_view.inputs().iter().filter(|i| !i.field.is_multiline()).collect();
        for (row_idx, pair) in contact.chunks(2).enumerate() {
            let Some(row) = rows.get(row_idx) else { break };
            let columns = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .spacing(2)
                .split(*row);
            for (input, area) in pair.iter().zip(columns.iter()) {
                self.render_single_line(frame, *area, input, app);
                field_areas.push((input.field, *area));
            }
        }

        if let Some(input) = app.form_view.inputs().iter().find(|i| i.field.is_multiline()) {
            self.render_multiline(frame, body, input, app);
            field_areas.push((input.field, body));
        }

        self.render_submit(frame, submit, app);
        self.render_status(frame, status, app);
        if app.form.mode().is_ai() {
            self.resume_picker.render(frame, resume, app);
        }

        self.layout = FormLayout {
            toggle_area: toggle,
            field_areas,
            resume_area: resume,
            submit_area: Rect { width: submit.width.min(SUBMIT_LABEL.len() as u16 + 8), ..submit },
        };
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut hints = vec![(" Tab/Shift-Tab", " Move"), (" Ctrl+G", " Generate")];
        match Self::focused_input(app) {
            Some(input) if input.field.is_multiline() => hints.push((" Enter", " New line")),
            Some(_) => hints.push((" Enter", " Generate")),
            None if app.form_view.f_mode_toggle.get() => hints.push((" Space", " Toggle AI")),
            None if app.form_view.resume_picker.f_button.get() => hints.push((" Enter", " Choose resume")),
            None => {}
        }
        hints.push((" Ctrl+C", " Quit"));
        build_hint_spans(&*app.ctx.theme, &hints)
    }

    fn get_preferred_layout(&self, app: &App, area: Rect) -> Vec<Rect> {
        let error_height = u16::from(app.error_message().is_some());
        let resume_height = if app.form.mode().is_ai() { 3 } else { 0 };
        Layout::vertical([
            Constraint::Length(1),             // Endpoint
            Constraint::Length(1),             // Mode toggle
            Constraint::Length(error_height),  // Error banner
            Constraint::Length(8),             // Contact grid
            Constraint::Min(3),                // Letter body
            Constraint::Length(resume_height), // Resume trigger
            Constraint::Length(3),             // Generate button
            Constraint::Length(1),             // Status
        ])
        .split(area)
        .to_vec()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::{KeyEventKind, KeyEventState};

    use super::*;
    use crate::app::test_support::{FakeService, app, app_with};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn focus_field(app: &mut App, field: FieldName) {
        let input = app.form_view.input(field).expect("field is visible");
        app.focus.focus(&input.focus);
    }

    #[test]
    fn typing_updates_the_form_state() {
        let mut app = app();
        focus_field(&mut app, FieldName::Name);
        let mut form = FormComponent::default();
        for c in "Ada".chars() {
            form.handle_key_events(&mut app, key(KeyCode::Char(c)));
        }
        form.handle_key_events(&mut app, key(KeyCode::Backspace));

        assert_eq!(app.form.state().value(FieldName::Name), Some("Ad"));
        assert_eq!(app.form_view.input(FieldName::Name).map(|i| i.input.input()), Some("Ad"));
    }

    #[test]
    fn enter_adds_a_newline_in_the_letter_body() {
        let mut app = app();
        focus_field(&mut app, FieldName::CustomContent);
        let mut form = FormComponent::default();
        form.handle_key_events(&mut app, key(KeyCode::Char('a')));
        let effects = form.handle_key_events(&mut app, key(KeyCode::Enter));
        form.handle_key_events(&mut app, key(KeyCode::Char('b')));

        assert!(effects.is_empty());
        assert_eq!(app.form.state().value(FieldName::CustomContent), Some("a\nb"));
    }

    #[test]
    fn enter_in_a_single_line_field_submits() {
        let mut app = app();
        focus_field(&mut app, FieldName::Email);
        let effects = FormComponent::default().handle_key_events(&mut app, key(KeyCode::Enter));
        assert_eq!(effects, vec![Effect::SubmitRequested]);
    }

    #[test]
    fn space_on_the_toggle_switches_modes() {
        let mut app = app();
        app.focus.focus(&app.form_view.f_mode_toggle);
        let effects = FormComponent::default().handle_key_events(&mut app, key(KeyCode::Char(' ')));
        assert_eq!(effects, vec![Effect::ToggleMode]);
    }

    #[test]
    fn submit_is_ignored_while_busy() {
        let mut app = app_with(Arc::new(FakeService::pdf()));
        for (field, value) in [
            (FieldName::Name, "Ada"),
            (FieldName::Email, "ada@example.com"),
            (FieldName::Phone, "555"),
            (FieldName::Employer, "Initech"),
            (FieldName::JobTitle, "Engineer"),
            (FieldName::CustomContent, "Dear team"),
        ] {
            app.form.set_field(field, value);
        }
        app.form.begin_submit().expect("valid form");
        app.focus.focus(&app.form_view.f_submit);

        let mut form = FormComponent::default();
        assert!(form.handle_key_events(&mut app, key(KeyCode::Enter)).is_empty());
        let ctrl_g = KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char('g'))
        };
        assert!(form.handle_key_events(&mut app, ctrl_g).is_empty());
    }

    #[test]
    fn pasted_newlines_become_spaces_in_single_line_fields() {
        let mut app = app();
        focus_field(&mut app, FieldName::JobTitle);
        FormComponent::default().handle_paste(&mut app, "Senior\r\nEngineer");
        assert_eq!(app.form.state().value(FieldName::JobTitle), Some("Senior Engineer"));
    }
}
