mod file_picker;

pub mod text_input;

pub use file_picker::{FilePickerModal, FilePickerState};
pub use text_input::TextInputState;
