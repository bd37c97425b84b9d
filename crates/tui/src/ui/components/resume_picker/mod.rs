//! Trigger that opens the file picker and shows the chosen resume.

mod resume_picker_component;
mod state;

pub use resume_picker_component::ResumePickerComponent;
pub use state::ResumePickerState;
