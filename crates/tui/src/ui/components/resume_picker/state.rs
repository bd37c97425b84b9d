use rat_focus::FocusFlag;

/// Local state of the resume trigger: the chosen file name, for display only.
///
/// The form holds the actual selection. This state is re-created whenever the
/// mode changes, which drops the label along with the form's resume.
#[derive(Debug, Clone)]
pub struct ResumePickerState {
    file_name: Option<String>,
    pub f_button: FocusFlag,
}

impl Default for ResumePickerState {
    fn default() -> Self {
        Self {
            file_name: None,
            f_button: FocusFlag::new().with_name("form.resume"),
        }
    }
}

impl ResumePickerState {
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn set_file_name(&mut self, file_name: Option<String>) {
        self.file_name = file_name;
    }
}
