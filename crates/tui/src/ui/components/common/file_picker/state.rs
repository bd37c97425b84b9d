//! State container for the resume file picker modal.

use std::path::{Path, PathBuf};

use coverletter_types::DirectoryEntry;
use dirs_next::{desktop_dir, document_dir, download_dir, home_dir};
use rat_focus::{FocusFlag, HasFocus};
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{ListItem, ListState},
};

use crate::ui::{components::common::TextInputState, theme::Theme};

/// Quick access shortcut displayed in the file picker sidebar.
#[derive(Debug, Clone)]
pub struct Shortcut {
    /// Label rendered in the shortcut button.
    pub name: String,
    /// Directory opened when the shortcut is selected.
    pub path: PathBuf,
}

/// What the typed path currently points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathInputTarget {
    Directory,
    AllowedFile,
    OtherFile,
    Missing,
}

/// UI state backing the file picker modal.
///
/// Tracks the active directory, the highlighted entry, and the focus graph
/// used for keyboard navigation. Only directories and files with an allowed
/// extension can be selected; other files are listed but dimmed.
#[derive(Debug, Clone, Default)]
pub struct FilePickerState {
    cur_dir: Option<PathBuf>,
    dir_contents: Option<Vec<DirectoryEntry>>,

    allowed_extensions: Vec<&'static str>,
    shortcuts: Vec<Shortcut>,
    list_state: ListState,
    list_items: Vec<ListItem<'static>>,

    path_input_state: TextInputState,

    mouse_over_idx: Option<usize>,
    selected_shortcut_idx: Option<usize>,
    selected_file_idx: Option<usize>,
    user_input_error: Option<String>,
    // Focus
    container_focus: FocusFlag,
    pub f_path_input: FocusFlag,
    pub f_list: FocusFlag,
    pub f_cancel: FocusFlag,
    pub f_confirm: FocusFlag,
    pub shortcuts_focus: Vec<FocusFlag>,
}

impl FilePickerState {
    /// Builds a new state instance that accepts the provided file extensions.
    pub fn new(allowed_extensions: Vec<&'static str>) -> Self {
        let shortcuts: Vec<Shortcut> = [home_dir(), desktop_dir(), document_dir(), download_dir()]
            .into_iter()
            .flatten()
            .filter_map(|path| {
                let name = path.file_name()?.to_string_lossy().into_owned();
                Some(Shortcut { name, path })
            })
            .collect();

        let shortcuts_focus = shortcuts
            .iter()
            .map(|s| FocusFlag::new().with_name(&format!("filepicker.shortcut.{}", &s.name)))
            .collect();

        Self {
            cur_dir: home_dir(),
            allowed_extensions,
            shortcuts,
            shortcuts_focus,
            container_focus: FocusFlag::new().with_name("filepicker.container"),
            f_path_input: FocusFlag::new().with_name("filepicker.path"),
            f_list: FocusFlag::new().with_name("filepicker.list"),
            f_cancel: FocusFlag::new().with_name("filepicker.cancel"),
            f_confirm: FocusFlag::new().with_name("filepicker.confirm"),
            ..Default::default()
        }
    }

    pub fn path_input_state(&self) -> &TextInputState {
        &self.path_input_state
    }

    pub fn path_input_state_mut(&mut self) -> &mut TextInputState {
        &mut self.path_input_state
    }

    /// Inserts a character into the path input and drops the list selection.
    pub fn insert_path_char(&mut self, c: char) {
        self.path_input_state.insert_char(c);
        self.user_input_error = None;
        self.clear_selection();
    }

    pub fn insert_path_str(&mut self, text: &str) {
        self.path_input_state.insert_str(text.trim_end_matches(['\r', '\n']));
        self.user_input_error = None;
        self.clear_selection();
    }

    pub fn backspace_path_char(&mut self) {
        self.path_input_state.backspace();
        self.user_input_error = None;
    }

    pub fn delete_path_char(&mut self) {
        self.path_input_state.delete();
        self.user_input_error = None;
    }

    /// Classifies the typed path, expanding a leading `~`.
    pub fn path_input_target(&self) -> Option<(PathBuf, PathInputTarget)> {
        let input = self.path_input_state.input().trim();
        if input.is_empty() {
            return None;
        }
        let path = coverletter_util::expand_tilde(input);
        let target = if path.is_dir() {
            PathInputTarget::Directory
        } else if path.is_file() {
            if self.is_allowed_path(&path) {
                PathInputTarget::AllowedFile
            } else {
                PathInputTarget::OtherFile
            }
        } else {
            PathInputTarget::Missing
        };
        Some((path, target))
    }

    /// Shows or clears the inline error rendered beside the buttons.
    pub fn set_user_input_error(&mut self, error: Option<String>) {
        self.user_input_error = error;
    }

    pub fn user_input_error(&self) -> Option<&str> {
        self.user_input_error.as_deref()
    }

    /// Sets the active directory, defaulting to the user's home directory.
    pub fn set_cur_dir(&mut self, maybe_dir: Option<PathBuf>) {
        self.cur_dir = maybe_dir.or_else(home_dir);
        self.set_dir_contents(None);
    }

    pub fn cur_dir(&self) -> Option<&PathBuf> {
        self.cur_dir.as_ref()
    }

    /// Replaces the displayed directory entries and clears the current selection.
    pub fn set_dir_contents(&mut self, maybe_contents: Option<Vec<DirectoryEntry>>) {
        self.dir_contents = maybe_contents;
        self.clear_selection();
    }

    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    pub fn list_state_mut(&mut self) -> &mut ListState {
        &mut self.list_state
    }

    pub fn list_state_offset(&self) -> usize {
        self.list_state.offset()
    }

    /// Returns the directory entry currently highlighted in the list.
    pub fn selected_file(&self) -> Option<&DirectoryEntry> {
        let idx = self.selected_file_idx?;
        self.dir_contents.as_ref()?.get(idx)
    }

    fn clear_selection(&mut self) {
        self.list_state.select(None);
        self.selected_file_idx = None;
    }

    /// Highlights entry `idx` when it is selectable and returns it.
    ///
    /// Highlighting never changes the current directory; opening one is a
    /// separate, explicit step.
    pub fn set_selected_index(&mut self, idx: usize) -> Option<&DirectoryEntry> {
        if !self.can_select_idx(idx) {
            return None;
        }
        self.user_input_error = None;
        self.list_state.select(Some(idx));
        self.selected_file_idx = Some(idx);
        self.path_input_state.clear();
        self.dir_contents.as_ref()?.get(idx)
    }

    /// Returns `true` when `path` carries one of the allowed extensions (case-insensitive).
    pub fn is_allowed_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.allowed_extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
    }

    pub fn set_mouse_over_idx(&mut self, maybe_idx: Option<usize>) {
        self.mouse_over_idx = maybe_idx;
    }

    pub fn mouse_over_idx(&self) -> Option<usize> {
        self.mouse_over_idx
    }

    pub fn list_items(&self) -> &[ListItem<'static>] {
        &self.list_items
    }

    /// Handles activation of a shortcut button and returns the directory to open.
    pub fn shortcut_pressed(&mut self, idx: usize) -> Option<PathBuf> {
        let path = self.shortcuts.get(idx)?.path.clone();
        self.set_cur_dir(Some(path.clone()));
        self.selected_shortcut_idx = Some(idx);
        Some(path)
    }

    pub fn selected_shortcut_idx(&self) -> Option<usize> {
        self.selected_shortcut_idx
    }

    /// Advances selection to the next selectable entry, wrapping as needed.
    pub fn select_next(&mut self) -> Option<&DirectoryEntry> {
        let len = self.entry_count();
        if len == 0 {
            return None;
        }
        let start = self.list_state.selected().map_or(0, |i| i + 1);
        let idx = (start..start + len).map(|i| i % len).find(|&i| self.can_select_idx(i))?;
        self.set_selected_index(idx)
    }

    /// Moves selection to the previous selectable entry, wrapping when necessary.
    pub fn select_previous(&mut self) -> Option<&DirectoryEntry> {
        let len = self.entry_count();
        if len == 0 {
            return None;
        }
        let start = self.list_state.selected().unwrap_or(0) + len;
        let idx = (start - len..start)
            .rev()
            .map(|i| i % len)
            .find(|&i| self.can_select_idx(i))?;
        self.set_selected_index(idx)
    }

    fn entry_count(&self) -> usize {
        self.dir_contents.as_ref().map_or(0, Vec::len)
    }

    fn can_select_idx(&self, idx: usize) -> bool {
        self.dir_contents
            .as_ref()
            .and_then(|paths| paths.get(idx))
            .is_some_and(|entry| entry.is_directory || self.is_allowed_path(&entry.path))
    }

    /// Recomputes the list rows from the directory contents and selects the first selectable row.
    pub fn rebuild_list_items(&mut self, theme: &dyn Theme) {
        self.list_items = match self.dir_contents.as_ref() {
            None => vec![ListItem::new(Line::from(Span::styled(
                "Directory contents unavailable",
                theme.status_error(),
            )))],
            Some(contents) => self.build_list_items(contents, theme),
        };

        self.clear_selection();
        self.select_next();
    }

    fn build_list_items(&self, entries: &[DirectoryEntry], theme: &dyn Theme) -> Vec<ListItem<'static>> {
        let parent = self.cur_dir.as_deref().and_then(Path::parent);
        entries
            .iter()
            .map(|entry| {
                if parent.is_some_and(|parent| parent == entry.path) {
                    return ListItem::new(Line::from(Span::styled("/..", theme.directory_style())));
                }
                let name = entry
                    .path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let span = if entry.is_directory {
                    Span::styled(format!("/{name}"), theme.directory_style())
                } else if self.is_allowed_path(&entry.path) {
                    Span::styled(name, theme.selectable_file_style())
                } else {
                    Span::styled(name, theme.text_secondary_style().add_modifier(Modifier::DIM))
                };
                ListItem::new(Line::from(span))
            })
            .collect()
    }
}

impl HasFocus for FilePickerState {
    fn build(&self, builder: &mut rat_focus::FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.f_list);
        builder.leaf_widget(&self.f_path_input);
        builder.leaf_widget(&self.f_cancel);
        builder.leaf_widget(&self.f_confirm);

        for shortcut in &self.shortcuts_focus {
            builder.leaf_widget(shortcut);
        }
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::DraculaTheme;
    use std::fs;

    fn picker_in(dir: &Path) -> FilePickerState {
        let mut picker = FilePickerState::new(vec!["pdf"]);
        picker.set_cur_dir(Some(dir.to_path_buf()));
        let entries = coverletter_util::list_directory(dir).expect("listing");
        picker.set_dir_contents(Some(entries));
        picker.rebuild_list_items(&DraculaTheme::new());
        picker
    }

    #[test]
    fn only_directories_and_pdfs_are_selectable() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("notes.txt"), b"x").expect("file");
        fs::write(dir.path().join("Resume.PDF"), b"%PDF").expect("file");

        let mut picker = picker_in(dir.path());
        // Parent directory first, then Resume.PDF; notes.txt is skipped.
        assert!(picker.selected_file().is_some_and(|entry| entry.is_directory));
        let next = picker.select_next().map(|entry| entry.path.clone());
        assert_eq!(next, Some(dir.path().join("Resume.PDF")));
        let wrapped = picker.select_next().map(|entry| entry.is_directory);
        assert_eq!(wrapped, Some(true));
        let back = picker.select_previous().map(|entry| entry.path.clone());
        assert_eq!(back, Some(dir.path().join("Resume.PDF")));
        assert_eq!(picker.list_items().len(), 3);
    }

    #[test]
    fn typed_paths_are_classified() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("resume.pdf"), b"%PDF").expect("file");
        fs::write(dir.path().join("resume.docx"), b"x").expect("file");
        let mut picker = picker_in(dir.path());

        let mut classify = |input: &str| {
            picker.path_input_state_mut().clear();
            picker.insert_path_str(input);
            picker.path_input_target().map(|(_, target)| target)
        };
        let base = dir.path().display().to_string();
        assert_eq!(classify(&format!("{base}/resume.pdf\n")), Some(PathInputTarget::AllowedFile));
        assert_eq!(classify(&format!("{base}/resume.docx")), Some(PathInputTarget::OtherFile));
        assert_eq!(classify(&base), Some(PathInputTarget::Directory));
        assert_eq!(classify(&format!("{base}/missing.pdf")), Some(PathInputTarget::Missing));
        assert_eq!(classify("  "), None);
    }

    #[test]
    fn typing_clears_the_list_selection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut picker = picker_in(dir.path());
        assert!(picker.selected_file().is_some());
        picker.insert_path_char('/');
        assert!(picker.selected_file().is_none());
    }
}
