//! UI components: the submission form, the resume trigger, and the file picker.

pub mod common;
pub mod component;
pub mod form;
pub mod resume_picker;

pub use component::*;
pub use form::FormComponent;
pub use resume_picker::ResumePickerComponent;
