use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use rat_focus::FocusBuilder;
use ratatui::{
    prelude::*,
    widgets::{Block, Clear, Paragraph},
};

use super::components::common::{FilePickerModal, FilePickerState};
use super::components::{Component, FormComponent};
use super::utils::centered_min_max;
use crate::app::{App, Effect, Modal, Msg};

pub struct ModalLayout(Box<dyn Fn(Rect) -> Rect>);

impl std::fmt::Debug for ModalLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ModalLayout")
    }
}

type ModalView = (Box<dyn Component>, ModalLayout);

/// Root view: the form, the hint bar, and at most one modal on top.
#[derive(Default)]
pub struct MainView {
    pub content_view: FormComponent,
    /// Currently open modal component
    pub modal_view: Option<ModalView>,
    /// the widget_id of the focus just before a modal is opened
    transient_focus_id: Option<usize>,
}

impl MainView {
    /// Opens `modal` (or closes the current one with `None`).
    pub fn set_open_modal_kind(&mut self, app: &mut App, modal: Option<Modal>) {
        match modal.as_ref() {
            Some(Modal::FilePicker(extensions)) => {
                // save the current focus to restore when the modal is closed
                self.transient_focus_id = app.focus.focused().map(|focus| focus.widget_id());
                app.file_picker = Some(FilePickerState::new(extensions.to_owned()));
                self.modal_view = Some((
                    Box::new(FilePickerModal::default()),
                    ModalLayout(Box::new(|rect| {
                        centered_min_max(75, 90, Rect::new(0, 0, 70, 15), Rect::new(0, 0, 140, 40), rect)
                    })),
                ));
            }
            None => {
                self.modal_view = None;
                app.file_picker = None;
            }
        }
        app.open_modal_kind = modal;

        app.focus = FocusBuilder::build_for(app);
        if let Some(file_picker) = app.file_picker.as_ref() {
            app.focus.focus(&file_picker.f_list);
        }
    }

    pub fn restore_focus(&mut self, app: &mut App) {
        if let Some(id) = self.transient_focus_id.take()
            && app.open_modal_kind.is_none()
        {
            app.focus.by_widget_id(id);
        } else if app.open_modal_kind.is_none() {
            app.focus.first();
        }
    }
}

impl Component for MainView {
    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        let mut effects = app.update(&msg);
        match self.modal_view.as_mut() {
            Some((modal, _)) => effects.extend(modal.handle_message(app, msg)),
            None => effects.extend(self.content_view.handle_message(app, msg)),
        }
        effects
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Effect::Quit];
        }
        if let Some((modal, _)) = self.modal_view.as_mut() {
            return modal.handle_key_events(app, key);
        }
        self.content_view.handle_key_events(app, key)
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if let Some((modal, _)) = self.modal_view.as_mut() {
            return modal.handle_mouse_events(app, mouse);
        }
        self.content_view.handle_mouse_events(app, mouse)
    }

    fn handle_paste(&mut self, app: &mut App, text: &str) -> Vec<Effect> {
        if let Some((modal, _)) = self.modal_view.as_mut() {
            return modal.handle_paste(app, text);
        }
        self.content_view.handle_paste(app, text)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        // Fill the entire background with the theme's background color for consistency
        let bg_fill = Paragraph::new("").style(Style::default().bg(app.ctx.theme.roles().background));
        frame.render_widget(bg_fill, area);

        let layout = self.get_preferred_layout(app, area);
        self.content_view.render(frame, layout[0], app);

        let hints_widget = Paragraph::new(Line::from(self.get_hint_spans(app))).style(app.ctx.theme.text_muted_style());
        frame.render_widget(hints_widget, layout[1]);

        if let Some((modal, position)) = self.modal_view.as_mut() {
            render_overlay(frame, app);
            let modal_area = position.0(area);
            frame.render_widget(Clear, modal_area);

            let modal_hints = modal.get_hint_spans(app);
            if modal_hints.is_empty() {
                modal.render(frame, modal_area, app);
            } else {
                let [body, hints] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(modal_area);
                let hints_widget = Paragraph::new(Line::from(modal_hints))
                    .style(app.ctx.theme.text_muted_style())
                    .bg(app.ctx.theme.roles().background);
                frame.render_widget(hints_widget, hints);
                modal.render(frame, body, app);
            }
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut hint_spans = vec![Span::styled("Hints: ", app.ctx.theme.text_muted_style())];
        if self.modal_view.is_none() {
            hint_spans.extend(self.content_view.get_hint_spans(app));
        }
        hint_spans
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::vertical([
            Constraint::Fill(1),   // Form
            Constraint::Length(1), // Hints bar
        ])
        .split(area)
        .to_vec()
    }
}

/// Dims everything behind an open modal.
fn render_overlay(frame: &mut Frame, app: &App) {
    frame.render_widget(Block::default().style(app.ctx.theme.modal_background_style()).dim(), frame.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::app;

    #[test]
    fn closing_the_picker_restores_focus_to_the_trigger() {
        let mut app = app();
        app.toggle_mode();
        app.focus = FocusBuilder::build_for(&app);
        app.focus.focus(&app.form_view.resume_picker.f_button);
        let mut main = MainView::default();

        main.set_open_modal_kind(&mut app, Some(Modal::FilePicker(vec!["pdf"])));
        assert!(main.modal_view.is_some());
        assert_eq!(app.open_modal_kind, Some(Modal::FilePicker(vec!["pdf"])));
        assert!(app.file_picker.as_ref().is_some_and(|picker| picker.f_list.get()));

        main.set_open_modal_kind(&mut app, None);
        main.restore_focus(&mut app);
        assert!(app.file_picker.is_none());
        assert!(app.form_view.resume_picker.f_button.get());
    }

    #[test]
    fn ctrl_c_quits_from_the_form_and_from_a_modal() {
        let mut app = app();
        let mut main = MainView::default();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        assert_eq!(main.handle_key_events(&mut app, ctrl_c), vec![Effect::Quit]);

        app.toggle_mode();
        main.set_open_modal_kind(&mut app, Some(Modal::FilePicker(vec!["pdf"])));
        assert_eq!(main.handle_key_events(&mut app, ctrl_c), vec![Effect::Quit]);
        assert!(app.file_picker.is_some());
    }
}
