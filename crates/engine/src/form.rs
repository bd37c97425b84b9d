//! Form state with a mode-tagged content path.
//!
//! Contact details are always present. The letter body is either custom text
//! or an AI request (job description plus resume); the two never coexist, so
//! stale data from an abandoned path cannot be submitted.

use coverletter_types::{ContentMode, SelectedFile};

/// Every input of the form, named as it appears in the multipart body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Name,
    Email,
    Phone,
    Linkedin,
    Github,
    Portfolio,
    Employer,
    JobTitle,
    CustomContent,
    JobDescription,
}

impl FieldName {
    /// All fields in form order.
    pub const ALL: [FieldName; 10] = [
        FieldName::Name,
        FieldName::Email,
        FieldName::Phone,
        FieldName::Linkedin,
        FieldName::Github,
        FieldName::Portfolio,
        FieldName::Employer,
        FieldName::JobTitle,
        FieldName::CustomContent,
        FieldName::JobDescription,
    ];

    /// Contact and job fields shown regardless of mode.
    pub const CONTACT: [FieldName; 8] = [
        FieldName::Name,
        FieldName::Email,
        FieldName::Phone,
        FieldName::Linkedin,
        FieldName::Github,
        FieldName::Portfolio,
        FieldName::Employer,
        FieldName::JobTitle,
    ];

    /// Multipart field name.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Name => "name",
            FieldName::Email => "email",
            FieldName::Phone => "phone",
            FieldName::Linkedin => "linkedin",
            FieldName::Github => "github",
            FieldName::Portfolio => "portfolio",
            FieldName::Employer => "employer",
            FieldName::JobTitle => "job_title",
            FieldName::CustomContent => "custom_content",
            FieldName::JobDescription => "job_description",
        }
    }

    /// Human readable label used in prompts and messages.
    pub fn label(self) -> &'static str {
        match self {
            FieldName::Name => "Name",
            FieldName::Email => "Email",
            FieldName::Phone => "Phone",
            FieldName::Linkedin => "LinkedIn URL",
            FieldName::Github => "GitHub URL",
            FieldName::Portfolio => "Portfolio URL",
            FieldName::Employer => "Employer",
            FieldName::JobTitle => "Job Title",
            FieldName::CustomContent => "Cover Letter Content",
            FieldName::JobDescription => "Job Description",
        }
    }

    /// Contact fields the user must fill before submitting.
    pub fn is_required_contact(self) -> bool {
        matches!(
            self,
            FieldName::Name | FieldName::Email | FieldName::Phone | FieldName::Employer | FieldName::JobTitle
        )
    }

    /// Multi-line fields (the letter body inputs).
    pub fn is_multiline(self) -> bool {
        matches!(self, FieldName::CustomContent | FieldName::JobDescription)
    }
}

/// The active content path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LetterContent {
    Custom { custom_content: String },
    Ai {
        job_description: String,
        resume: Option<SelectedFile>,
    },
}

impl LetterContent {
    /// An empty variant for `mode`.
    pub fn empty(mode: ContentMode) -> Self {
        match mode {
            ContentMode::Custom => LetterContent::Custom {
                custom_content: String::new(),
            },
            ContentMode::Ai => LetterContent::Ai {
                job_description: String::new(),
                resume: None,
            },
        }
    }

    pub fn mode(&self) -> ContentMode {
        match self {
            LetterContent::Custom { .. } => ContentMode::Custom,
            LetterContent::Ai { .. } => ContentMode::Ai,
        }
    }
}

impl Default for LetterContent {
    fn default() -> Self {
        LetterContent::empty(ContentMode::default())
    }
}

/// Everything the user has entered so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub employer: String,
    pub job_title: String,
    pub content: LetterContent,
}

impl FormState {
    pub fn new(mode: ContentMode) -> Self {
        Self {
            content: LetterContent::empty(mode),
            ..Default::default()
        }
    }

    pub fn mode(&self) -> ContentMode {
        self.content.mode()
    }

    /// Current value of `field`, or `None` when it belongs to the inactive path.
    pub fn value(&self, field: FieldName) -> Option<&str> {
        let value = match (field, &self.content) {
            (FieldName::Name, _) => &self.name,
            (FieldName::Email, _) => &self.email,
            (FieldName::Phone, _) => &self.phone,
            (FieldName::Linkedin, _) => &self.linkedin,
            (FieldName::Github, _) => &self.github,
            (FieldName::Portfolio, _) => &self.portfolio,
            (FieldName::Employer, _) => &self.employer,
            (FieldName::JobTitle, _) => &self.job_title,
            (FieldName::CustomContent, LetterContent::Custom { custom_content }) => custom_content,
            (FieldName::JobDescription, LetterContent::Ai { job_description, .. }) => job_description,
            (FieldName::CustomContent | FieldName::JobDescription, _) => return None,
        };
        Some(value.as_str())
    }

    /// Mutable access to `field`, or `None` when it belongs to the inactive path.
    pub fn value_mut(&mut self, field: FieldName) -> Option<&mut String> {
        let value = match (field, &mut self.content) {
            (FieldName::Name, _) => &mut self.name,
            (FieldName::Email, _) => &mut self.email,
            (FieldName::Phone, _) => &mut self.phone,
            (FieldName::Linkedin, _) => &mut self.linkedin,
            (FieldName::Github, _) => &mut self.github,
            (FieldName::Portfolio, _) => &mut self.portfolio,
            (FieldName::Employer, _) => &mut self.employer,
            (FieldName::JobTitle, _) => &mut self.job_title,
            (FieldName::CustomContent, LetterContent::Custom { custom_content }) => custom_content,
            (FieldName::JobDescription, LetterContent::Ai { job_description, .. }) => job_description,
            (FieldName::CustomContent | FieldName::JobDescription, _) => return None,
        };
        Some(value)
    }

    /// Replaces the value of `field`. Returns `false` when the field is inactive.
    pub fn set_value(&mut self, field: FieldName, value: impl Into<String>) -> bool {
        match self.value_mut(field) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Fields visible in the current mode, in form order.
    pub fn active_fields(&self) -> impl Iterator<Item = FieldName> + '_ {
        FieldName::ALL.into_iter().filter(|field| self.value(*field).is_some())
    }

    pub fn resume(&self) -> Option<&SelectedFile> {
        match &self.content {
            LetterContent::Ai { resume, .. } => resume.as_ref(),
            LetterContent::Custom { .. } => None,
        }
    }

    /// Attaches or clears the resume. Returns `false` outside AI mode.
    pub fn set_resume(&mut self, file: Option<SelectedFile>) -> bool {
        match &mut self.content {
            LetterContent::Ai { resume, .. } => {
                *resume = file;
                true
            }
            LetterContent::Custom { .. } => false,
        }
    }

    /// Switches to the other content path, discarding everything entered on the current one.
    pub fn toggle_mode(&mut self) {
        self.content = LetterContent::empty(self.mode().toggled());
    }
}
