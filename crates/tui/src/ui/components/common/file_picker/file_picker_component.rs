//! Modal that lets the user browse for a resume PDF.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use coverletter_types::SelectedFile;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, List, Paragraph},
};
use tracing::debug;

use crate::{
    app::{App, Effect, ExecOutcome, Msg},
    ui::{
        components::{
            Component,
            common::file_picker::state::{PathInputTarget, Shortcut},
            find_target_index_by_mouse_position,
        },
        theme::theme_helpers::{ButtonRenderOptions, block, build_hint_spans, render_button},
    },
};

const ONLY_PDF_MESSAGE: &str = "Only PDF files can be selected";
const INVALID_PATH_MESSAGE: &str = "Invalid path";

/// Resolved rectangles for each render region.
#[derive(Debug, Clone, Default)]
pub struct FilePickerLayout {
    shortcut_bar_area: Rect,
    header_area: Rect,
    header_inner_area: Rect,
    file_list_area: Rect,
    error_message_area: Rect,
    cancel_button_area: Rect,
    open_button_area: Rect,
}

impl From<&[Rect]> for FilePickerLayout {
    fn from(layout: &[Rect]) -> Self {
        FilePickerLayout {
            shortcut_bar_area: layout[0],
            header_area: layout[1],
            header_inner_area: Rect::default(),
            file_list_area: layout[2],
            error_message_area: layout[3],
            cancel_button_area: layout[4],
            open_button_area: layout[5],
        }
    }
}

/// Controller and renderer for the resume file picker.
///
/// Choosing a PDF closes the modal and reports the file; cancelling reports
/// `None` so the form drops any earlier choice.
#[derive(Debug, Clone, Default)]
pub struct FilePickerModal {
    layout: FilePickerLayout,
    shortcut_rects: Vec<Rect>,
}

impl FilePickerModal {
    fn render_shortcuts(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) -> Option<()> {
        let theme = &*app.ctx.theme;
        let block = Block::bordered().style(theme.border_style(false));
        let inner = block.inner(rect);

        frame.render_widget(block, rect);
        self.shortcut_rects.clear();
        let file_picker = app.file_picker.as_ref()?;
        let selected_idx = file_picker.selected_shortcut_idx();
        for (index, Shortcut { name, .. }) in file_picker.shortcuts().iter().enumerate() {
            let is_focused = file_picker.shortcuts_focus.get(index).is_some_and(|f| f.get());
            let is_selected = selected_idx == Some(index);
            let area = Rect {
                x: inner.x,
                y: inner.y + (3 * index as u16),
                width: inner.width,
                height: 3,
            };
            if area.y + area.height > inner.y + inner.height {
                continue;
            }
            let borders = if is_focused { Borders::ALL } else { Borders::NONE };
            let options = ButtonRenderOptions::new(true, is_focused, is_selected, borders, false);
            render_button(frame, area, name, theme, options);
            self.shortcut_rects.push(area);
        }

        Some(())
    }

    fn render_header(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) -> Option<Rect> {
        let file_picker = app.file_picker.as_ref()?;
        let is_focused = file_picker.f_path_input.get();
        let theme = &*app.ctx.theme;
        let title = Line::from(Span::styled("Path", theme.text_secondary_style().add_modifier(Modifier::BOLD)));
        let input_block = block(theme, None, is_focused).title(title);
        let inner_area = input_block.inner(rect);

        let path_input_state = file_picker.path_input_state();
        let content_line = if is_focused || !path_input_state.is_empty() {
            Line::from(Span::styled(path_input_state.input().to_string(), theme.text_primary_style()))
        } else {
            let cur_dir = file_picker
                .cur_dir()
                .map(|dir| dir.display().to_string())
                .unwrap_or_default();
            Line::from(Span::styled(cur_dir, theme.text_muted_style()))
        };
        frame.render_widget(Paragraph::new(content_line).block(input_block), rect);
        if is_focused {
            let cursor_x = inner_area.x.saturating_add(path_input_state.cursor_columns() as u16);
            frame.set_cursor_position((cursor_x, inner_area.y));
        }

        Some(inner_area)
    }

    fn render_list(&self, frame: &mut Frame, rect: Rect, app: &mut App) -> Option<()> {
        let file_picker = app.file_picker.as_mut()?;
        let theme = &*app.ctx.theme;

        let mut list_items = file_picker.list_items().to_vec();
        if let Some(idx) = file_picker.mouse_over_idx()
            && let Some(item) = list_items.get_mut(idx)
        {
            *item = item.clone().style(theme.selection_style().add_modifier(Modifier::BOLD));
        }

        let list_block = Block::new()
            .borders(Borders::LEFT)
            .border_style(theme.border_style(file_picker.f_list.get()));
        let list = List::new(list_items).block(list_block).highlight_style(theme.selection_style());
        frame.render_stateful_widget(list, rect, file_picker.list_state_mut());
        Some(())
    }

    fn render_error_message(&self, frame: &mut Frame, area: Rect, app: &App) -> Option<()> {
        let error_message = app.file_picker.as_ref()?.user_input_error()?;
        frame.render_widget(Paragraph::new(error_message).style(app.ctx.theme.status_error()), area);
        Some(())
    }

    fn render_buttons(&self, frame: &mut Frame, layout: &FilePickerLayout, app: &App) -> Option<()> {
        let file_picker = app.file_picker.as_ref()?;
        let options = ButtonRenderOptions::new(true, file_picker.f_cancel.get(), false, Borders::ALL, false);
        render_button(frame, layout.cancel_button_area, "Cancel", &*app.ctx.theme, options);

        let can_open = file_picker.selected_file().is_some()
            || matches!(
                file_picker.path_input_target(),
                Some((_, PathInputTarget::Directory | PathInputTarget::AllowedFile))
            );
        let options = ButtonRenderOptions::new(can_open, file_picker.f_confirm.get(), false, Borders::ALL, true);
        render_button(frame, layout.open_button_area, "Open", &*app.ctx.theme, options);

        Some(())
    }

    fn handle_maybe_button_click(&mut self, pos: Position, app: &mut App) -> Option<Vec<Effect>> {
        let file_picker = app.file_picker.as_mut()?;
        let shortcut_area = &self.layout.shortcut_bar_area;
        if let Some(shortcut_idx) = find_target_index_by_mouse_position(shortcut_area, &self.shortcut_rects, pos.x, pos.y) {
            let path = file_picker.shortcut_pressed(shortcut_idx)?;
            app.focus.focus(file_picker.shortcuts_focus.get(shortcut_idx)?);
            return Some(vec![Effect::ListDirectoryContents(path)]);
        }

        if self.layout.cancel_button_area.contains(pos) {
            return Some(cancel_effects());
        }

        if self.layout.open_button_area.contains(pos) {
            return self.maybe_commit_selection(app);
        }
        None
    }

    /// Opens the highlighted directory or reports the highlighted PDF.
    ///
    /// A typed path takes precedence over the list when present.
    fn maybe_commit_selection(&mut self, app: &mut App) -> Option<Vec<Effect>> {
        let file_picker = app.file_picker.as_mut()?;

        if let Some((path, target)) = file_picker.path_input_target() {
            return match target {
                PathInputTarget::Directory => {
                    file_picker.path_input_state_mut().clear();
                    file_picker.set_cur_dir(Some(path.clone()));
                    Some(vec![Effect::ListDirectoryContents(path)])
                }
                PathInputTarget::AllowedFile => Some(select_effects(SelectedFile::from_path(path))),
                PathInputTarget::OtherFile => {
                    file_picker.set_user_input_error(Some(ONLY_PDF_MESSAGE.to_string()));
                    None
                }
                PathInputTarget::Missing => {
                    file_picker.set_user_input_error(Some(INVALID_PATH_MESSAGE.to_string()));
                    None
                }
            };
        }

        let selected_file = file_picker.selected_file().cloned()?;
        if selected_file.is_directory {
            file_picker.set_cur_dir(Some(selected_file.path.clone()));
            return Some(vec![Effect::ListDirectoryContents(selected_file.path)]);
        }
        Some(select_effects(SelectedFile::from_path(selected_file.path)))
    }
}

fn select_effects(file: Option<SelectedFile>) -> Vec<Effect> {
    vec![Effect::CloseModal, Effect::ResumeSelected(file)]
}

fn cancel_effects() -> Vec<Effect> {
    vec![Effect::CloseModal, Effect::ResumeSelected(None)]
}

impl Component for FilePickerModal {
    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        let (Msg::ExecCompleted(outcome), Some(file_picker)) = (msg, app.file_picker.as_mut()) else {
            return Vec::new();
        };

        match *outcome {
            ExecOutcome::DirectoryContents { entries, root_path } if file_picker.cur_dir() == Some(&root_path) => {
                file_picker.set_dir_contents(Some(entries));
                file_picker.rebuild_list_items(&*app.ctx.theme);
            }
            ExecOutcome::DirectoryError { root_path, message } if file_picker.cur_dir() == Some(&root_path) => {
                debug!(path = %root_path.display(), %message, "directory listing failed");
                file_picker.set_dir_contents(None);
                file_picker.rebuild_list_items(&*app.ctx.theme);
                file_picker.set_user_input_error(Some(message));
            }
            _ => {}
        }

        Vec::new()
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let Some(file_picker) = app.file_picker.as_mut() else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Esc => return cancel_effects(),

            KeyCode::Enter if file_picker.f_list.get() || file_picker.f_confirm.get() || file_picker.f_path_input.get() => {
                return self.maybe_commit_selection(app).unwrap_or_default();
            }

            KeyCode::Char(' ') if file_picker.f_list.get() || file_picker.f_confirm.get() => {
                return self.maybe_commit_selection(app).unwrap_or_default();
            }

            KeyCode::Enter | KeyCode::Char(' ') if file_picker.f_cancel.get() => return cancel_effects(),

            KeyCode::Enter | KeyCode::Char(' ') if !file_picker.f_path_input.get() => {
                if let Some(idx) = file_picker.shortcuts_focus.iter().position(|flag| flag.get())
                    && let Some(path) = file_picker.shortcut_pressed(idx)
                {
                    return vec![Effect::ListDirectoryContents(path)];
                }
            }

            KeyCode::Char(character)
                if file_picker.f_path_input.get()
                    && !character.is_control()
                    && (key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT) =>
            {
                file_picker.insert_path_char(character);
            }

            KeyCode::Backspace if file_picker.f_path_input.get() => file_picker.backspace_path_char(),
            KeyCode::Delete if file_picker.f_path_input.get() => file_picker.delete_path_char(),
            KeyCode::Right if file_picker.f_path_input.get() => file_picker.path_input_state_mut().move_right(),
            KeyCode::Left if file_picker.f_path_input.get() => file_picker.path_input_state_mut().move_left(),
            KeyCode::Home if file_picker.f_path_input.get() => file_picker.path_input_state_mut().move_home(),
            KeyCode::End if file_picker.f_path_input.get() => file_picker.path_input_state_mut().move_end(),

            KeyCode::Down if file_picker.f_list.get() => {
                file_picker.select_next();
            }
            KeyCode::Up if file_picker.f_list.get() => {
                file_picker.select_previous();
            }

            KeyCode::Tab => {
                app.focus.next();
            }
            KeyCode::BackTab => {
                app.focus.prev();
            }

            _ => {}
        }

        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let Some(file_picker) = app.file_picker.as_mut() else {
            return Vec::new();
        };
        let pos = Position::new(mouse.column, mouse.row);
        let list_area = &self.layout.file_list_area;
        let hit_test_list = list_area.contains(pos);
        let hit_test_path_input = self.layout.header_area.contains(pos);
        let idx = hit_test_list.then(|| (pos.y - list_area.y) as usize + file_picker.list_state_offset());

        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Up(MouseButton::Left) => {
                file_picker.set_mouse_over_idx(idx);
            }
            MouseEventKind::ScrollDown if hit_test_list => {
                file_picker.list_state_mut().scroll_down_by(1);
            }
            MouseEventKind::ScrollUp if hit_test_list => {
                file_picker.list_state_mut().scroll_up_by(1);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(idx) = idx {
                    app.focus.focus(&file_picker.f_list);
                    let opened_dir = file_picker
                        .set_selected_index(idx)
                        .filter(|entry| entry.is_directory)
                        .map(|entry| entry.path.clone());
                    if let Some(dir) = opened_dir {
                        file_picker.set_cur_dir(Some(dir.clone()));
                        return vec![Effect::ListDirectoryContents(dir)];
                    }
                } else if hit_test_path_input {
                    let relative_column = mouse.column.saturating_sub(self.layout.header_inner_area.x);
                    let path_input_state = file_picker.path_input_state_mut();
                    let cursor_index = path_input_state.cursor_index_for_column(relative_column);
                    path_input_state.set_cursor(cursor_index);
                    app.focus.focus(&file_picker.f_path_input);
                } else {
                    return self.handle_maybe_button_click(pos, app).unwrap_or_default();
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_paste(&mut self, app: &mut App, text: &str) -> Vec<Effect> {
        if let Some(file_picker) = app.file_picker.as_mut()
            && file_picker.f_path_input.get()
        {
            file_picker.insert_path_str(text);
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let block = block(&*app.ctx.theme, Some("Choose Resume PDF"), true);

        let mut layout = FilePickerLayout::from(self.get_preferred_layout(app, block.inner(rect)).as_slice());
        frame.render_widget(block, rect);
        self.render_shortcuts(frame, layout.shortcut_bar_area, app);
        if let Some(inner_area) = self.render_header(frame, layout.header_area, app) {
            layout.header_inner_area = inner_area;
        }
        self.render_list(frame, layout.file_list_area, app);
        self.render_error_message(frame, layout.error_message_area, app);
        self.render_buttons(frame, &layout, app);

        self.layout = layout;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let Some(file_picker) = app.file_picker.as_ref() else {
            return vec![];
        };
        let mut hints = vec![(" Esc", " Cancel"), (" Tab", " Next")];
        if file_picker.f_list.get() {
            hints.push((" ↑/↓", " Navigate"));
        }
        if file_picker.f_list.get() || file_picker.f_confirm.get() || file_picker.f_path_input.get() {
            hints.push((" Enter", " Open"));
        }
        build_hint_spans(&*app.ctx.theme, &hints)
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        let outer_areas = Layout::horizontal([
            Constraint::Length(13), // Shortcuts
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

        let inner_areas = Layout::vertical([
            Constraint::Length(3), // Path input
            Constraint::Min(5),    // Directory listing
            Constraint::Length(3), // Buttons
        ])
        .split(outer_areas[2]);

        let button_areas = Layout::horizontal([
            Constraint::Min(10),
            Constraint::Length(10),
            Constraint::Length(1),
            Constraint::Length(10),
        ])
        .split(inner_areas[2]);

        // Pin the error message to the button baseline.
        let error_message = Layout::vertical([Constraint::Length(2), Constraint::Length(1)]).split(button_areas[0]);

        vec![
            outer_areas[0],
            inner_areas[0],
            inner_areas[1],
            error_message[1],
            button_areas[1],
            button_areas[3],
        ]
    }

    /// Requests the initial directory listing when the modal becomes visible.
    fn on_route_enter(&mut self, app: &mut App) -> Vec<Effect> {
        app.file_picker
            .as_ref()
            .and_then(|file_picker| file_picker.cur_dir().cloned())
            .map(|dir| vec![Effect::ListDirectoryContents(dir)])
            .unwrap_or_default()
    }
}
