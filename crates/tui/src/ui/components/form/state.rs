//! View state for the submission form: one text input per visible field plus
//! the focus flags of the toggle, the resume trigger, and the submit button.

use coverletter_engine::{FieldName, FormState};
use coverletter_types::ContentMode;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

use crate::ui::components::common::TextInputState;
use crate::ui::components::resume_picker::ResumePickerState;

/// Editable buffer and focus handle for one form field.
#[derive(Debug, Clone)]
pub struct FieldInput {
    pub field: FieldName,
    pub input: TextInputState,
    pub focus: FocusFlag,
}

impl FieldInput {
    fn new(field: FieldName, value: &str) -> Self {
        let mut input = TextInputState::new();
        input.set_input(value);
        Self {
            field,
            input,
            focus: FocusFlag::new().with_name(&format!("form.{}", field.as_str())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormViewState {
    mode: ContentMode,
    inputs: Vec<FieldInput>,
    pub resume_picker: ResumePickerState,
    pub f_mode_toggle: FocusFlag,
    pub f_submit: FocusFlag,
    container_focus: FocusFlag,
}

impl FormViewState {
    pub fn new(state: &FormState) -> Self {
        Self {
            mode: state.mode(),
            inputs: build_inputs(state),
            resume_picker: ResumePickerState::default(),
            f_mode_toggle: FocusFlag::new().with_name("form.use_ai"),
            f_submit: FocusFlag::new().with_name("form.submit"),
            container_focus: FocusFlag::new().with_name("form"),
        }
    }

    /// Rebuilds inputs for the form's current mode and re-creates the resume picker.
    pub fn reset_for(&mut self, state: &FormState) {
        self.mode = state.mode();
        self.inputs = build_inputs(state);
        self.resume_picker = ResumePickerState::default();
    }

    pub fn mode(&self) -> ContentMode {
        self.mode
    }

    pub fn inputs(&self) -> &[FieldInput] {
        &self.inputs
    }

    pub fn input(&self, field: FieldName) -> Option<&FieldInput> {
        self.inputs.iter().find(|input| input.field == field)
    }

    /// The input that currently holds focus, if any.
    pub fn focused_input_mut(&mut self) -> Option<&mut FieldInput> {
        self.inputs.iter_mut().find(|input| input.focus.get())
    }

    pub fn input_mut(&mut self, field: FieldName) -> Option<&mut FieldInput> {
        self.inputs.iter_mut().find(|input| input.field == field)
    }
}

fn build_inputs(state: &FormState) -> Vec<FieldInput> {
    state
        .active_fields()
        .map(|field| FieldInput::new(field, state.value(field).unwrap_or_default()))
        .collect()
}

impl HasFocus for FormViewState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.f_mode_toggle);
        for input in &self.inputs {
            builder.leaf_widget(&input.focus);
        }
        if self.mode.is_ai() {
            builder.leaf_widget(&self.resume_picker.f_button);
        }
        builder.leaf_widget(&self.f_submit);
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

    #[test]
    fn inputs_mirror_the_active_fields() {
        let mut state = FormState::new(ContentMode::Custom);
        state.name = "Ada".into();
        let mut view = FormViewState::new(&state);
        assert_eq!(view.inputs().len(), 9);
        assert_eq!(view.input(FieldName::Name).map(|i| i.input.input()), Some("Ada"));

        view.resume_picker.set_file_name(Some("resume.pdf".into()));
        state.toggle_mode();
        view.reset_for(&state);
        assert_eq!(view.mode(), ContentMode::Ai);
        assert!(view.input(FieldName::JobDescription).is_some());
        assert!(view.input(FieldName::CustomContent).is_none());
        assert!(view.resume_picker.file_name().is_none());
        assert_eq!(view.input(FieldName::Name).map(|i| i.input.input()), Some("Ada"));
    }
}
