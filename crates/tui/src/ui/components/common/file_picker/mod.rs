//! Resume file picker: directory browsing restricted to allowed extensions.

mod file_picker_component;
mod state;

pub use file_picker_component::FilePickerModal;
pub use state::FilePickerState;
